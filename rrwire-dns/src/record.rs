//! Resource records and their field accessors.
//!
//! Every accessor takes a [`RecordField`] and returns `None` when the field
//! does not belong to the record's decoded payload or when the accessor does
//! not match the field's [`FieldKind`](crate::grammar::FieldKind).

use std::net::{Ipv4Addr, Ipv6Addr};

use rrwire::alloc::AllocGate;
use rrwire::error::{Error, ErrorKind, Result};

use sawp_flags::{Flag, Flags};
use tracing::trace;

use crate::cursor::Cursor;
use crate::edns::EdnsOption;
use crate::enums::{RecordClass, RecordType};
use crate::grammar::{grammar, RecordField, RAW_FIELDS};
use crate::name::parse_name;
use crate::rdata::RDataType;
use crate::ErrorFlags;

#[cfg(feature = "ffi")]
use sawp_ffi::GenerateFFI;

/// Smallest possible record: root name, fixed fields and empty rdata
pub const MIN_RECORD_LEN: usize = 11;

/// Which decodable record types a section keeps as raw rdata anyway
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawPolicy {
    /// Types defined by RFC 1035
    pub base: bool,
    /// Every other decodable type except OPT
    pub extended: bool,
}

impl RawPolicy {
    pub fn keeps_raw(self, rtype: RecordType) -> bool {
        match grammar(rtype) {
            None => true,
            Some(_) if rtype == RecordType::OPT => false,
            Some(grammar) if grammar.base => self.base,
            Some(_) => self.extended,
        }
    }
}

/// A parsed resource record
#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    #[cfg_attr(feature = "ffi", sawp_ffi(copy))]
    pub rtype: RecordType,
    pub rtype_raw: u16,
    #[cfg_attr(feature = "ffi", sawp_ffi(copy))]
    pub rclass: RecordClass,
    pub rclass_raw: u16,
    pub ttl: u32,
    /// Declared rdata length
    pub rdlength: u16,
    pub data: RDataType,
}

/// An over-read inside the rdata bound means the declared length was too short.
fn overrun(err: Error, declared: usize) -> Error {
    match err.kind {
        ErrorKind::Incomplete(nom::Needed::Size(needed)) => {
            Error::mismatch(declared, declared + needed.get())
        }
        _ => err,
    }
}

impl Record {
    pub fn parse(
        cursor: &mut Cursor,
        gate: &dyn AllocGate,
        policy: RawPolicy,
    ) -> Result<(Record, Flags<ErrorFlags>)> {
        let mut error_flags = ErrorFlags::none();

        let name = parse_name(cursor, gate)?;

        let rtype_raw = cursor.read_u16_be()?;
        let rtype = RecordType::from_raw(rtype_raw);
        if rtype == RecordType::UNKNOWN {
            error_flags |= ErrorFlags::UnknownRtype;
        }

        // OPT carries the UDP payload size in the class field
        let rclass_raw = cursor.read_u16_be()?;
        let rclass = RecordClass::from_raw(rclass_raw);
        if rclass == RecordClass::UNKNOWN && rtype != RecordType::OPT {
            error_flags |= ErrorFlags::UnknownRclass;
        }

        let ttl = cursor.read_u32_be()?;
        let rdlength = cursor.read_u16_be()?;
        let declared = usize::from(rdlength);
        let mut rdata = cursor.sub(declared)?;

        let data = if policy.keeps_raw(rtype) {
            RDataType::parse_raw(&mut rdata, gate, rtype_raw)
        } else {
            RDataType::parse(&mut rdata, gate, rtype_raw, rclass_raw, ttl)
        }
        .map_err(|err| overrun(err, declared))?;

        if !rdata.is_empty() {
            return Err(Error::mismatch(declared, declared - rdata.remaining()));
        }

        trace!(name = %name, rtype = ?rtype, rdlength, "decoded record");

        Ok((
            Record {
                name,
                rtype,
                rtype_raw,
                rclass,
                rclass_raw,
                ttl,
                rdlength,
                data,
            },
            error_flags,
        ))
    }

    pub fn record_type(&self) -> RecordType {
        self.rtype
    }

    /// Fields readable on this record, in wire order.
    pub fn fields(&self) -> &'static [RecordField] {
        match (&self.data, grammar(self.rtype)) {
            (RDataType::RAW(_), _) | (_, None) => RAW_FIELDS,
            (_, Some(grammar)) => grammar.fields,
        }
    }

    pub fn get_u8(&self, field: RecordField) -> Option<u8> {
        match (field, &self.data) {
            (RecordField::OptVersion, RDataType::OPT(opt)) => Some(opt.version),
            (RecordField::TlsaCertUsage, RDataType::TLSA(tlsa)) => Some(tlsa.cert_usage),
            (RecordField::TlsaSelector, RDataType::TLSA(tlsa)) => Some(tlsa.selector),
            (RecordField::TlsaMatchingType, RDataType::TLSA(tlsa)) => Some(tlsa.matching_type),
            (RecordField::CaaCritical, RDataType::CAA(caa)) => Some(caa.critical),
            _ => None,
        }
    }

    pub fn get_u16(&self, field: RecordField) -> Option<u16> {
        match (field, &self.data) {
            (RecordField::MxPreference, RDataType::MX(mx)) => Some(mx.preference),
            (RecordField::SrvPriority, RDataType::SRV(srv)) => Some(srv.priority),
            (RecordField::SrvWeight, RDataType::SRV(srv)) => Some(srv.weight),
            (RecordField::SrvPort, RDataType::SRV(srv)) => Some(srv.port),
            (RecordField::NaptrOrder, RDataType::NAPTR(naptr)) => Some(naptr.order),
            (RecordField::NaptrPreference, RDataType::NAPTR(naptr)) => Some(naptr.preference),
            (RecordField::OptUdpSize, RDataType::OPT(opt)) => Some(opt.udp_payload_size),
            (RecordField::OptFlags, RDataType::OPT(opt)) => Some(opt.flags),
            (RecordField::UriPriority, RDataType::URI(uri)) => Some(uri.priority),
            (RecordField::UriWeight, RDataType::URI(uri)) => Some(uri.weight),
            (RecordField::RawRrType, RDataType::RAW(raw)) => Some(raw.rtype),
            _ => None,
        }
    }

    pub fn get_u32(&self, field: RecordField) -> Option<u32> {
        match (field, &self.data) {
            (RecordField::SoaSerial, RDataType::SOA(soa)) => Some(soa.serial),
            (RecordField::SoaRefresh, RDataType::SOA(soa)) => Some(soa.refresh),
            (RecordField::SoaRetry, RDataType::SOA(soa)) => Some(soa.retry),
            (RecordField::SoaExpire, RDataType::SOA(soa)) => Some(soa.expire),
            (RecordField::SoaMinimum, RDataType::SOA(soa)) => Some(soa.minimum),
            _ => None,
        }
    }

    pub fn get_addr(&self, field: RecordField) -> Option<Ipv4Addr> {
        match (field, &self.data) {
            (RecordField::AAddr, RDataType::A(addr)) => Some(*addr),
            _ => None,
        }
    }

    pub fn get_addr6(&self, field: RecordField) -> Option<Ipv6Addr> {
        match (field, &self.data) {
            (RecordField::AaaaAddr, RDataType::AAAA(addr)) => Some(*addr),
            _ => None,
        }
    }

    /// Domain name field in presentation form
    pub fn get_name(&self, field: RecordField) -> Option<&str> {
        let name = match (field, &self.data) {
            (RecordField::NsNsdname, RDataType::NS(name))
            | (RecordField::CnameCname, RDataType::CNAME(name))
            | (RecordField::PtrDname, RDataType::PTR(name)) => name,
            (RecordField::SoaMname, RDataType::SOA(soa)) => &soa.mname,
            (RecordField::SoaRname, RDataType::SOA(soa)) => &soa.rname,
            (RecordField::MxExchange, RDataType::MX(mx)) => &mx.exchange,
            (RecordField::SrvTarget, RDataType::SRV(srv)) => &srv.target,
            (RecordField::NaptrReplacement, RDataType::NAPTR(naptr)) => &naptr.replacement,
            _ => return None,
        };
        Some(name.as_str())
    }

    /// Printable character-string field
    pub fn get_str(&self, field: RecordField) -> Option<&str> {
        let text = match (field, &self.data) {
            (RecordField::HinfoCpu, RDataType::HINFO(hinfo)) => &hinfo.cpu,
            (RecordField::HinfoOs, RDataType::HINFO(hinfo)) => &hinfo.os,
            (RecordField::NaptrFlags, RDataType::NAPTR(naptr)) => &naptr.flags,
            (RecordField::NaptrServices, RDataType::NAPTR(naptr)) => &naptr.services,
            (RecordField::NaptrRegexp, RDataType::NAPTR(naptr)) => &naptr.regexp,
            (RecordField::CaaTag, RDataType::CAA(caa)) => &caa.tag,
            _ => return None,
        };
        Some(text.as_str())
    }

    /// Binary field, or every string of a string-array field concatenated.
    pub fn get_bin(&self, field: RecordField) -> Option<&[u8]> {
        match (field, &self.data) {
            (RecordField::TxtData, RDataType::TXT(strings)) => Some(strings.concat()),
            (RecordField::TlsaData, RDataType::TLSA(tlsa)) => Some(&tlsa.data),
            (RecordField::UriTarget, RDataType::URI(uri)) => Some(&uri.target),
            (RecordField::CaaValue, RDataType::CAA(caa)) => Some(&caa.value),
            (RecordField::RawRrData, RDataType::RAW(raw)) => Some(&raw.data),
            _ => None,
        }
    }

    /// One string of a string-array field.
    pub fn get_abin(&self, field: RecordField, idx: usize) -> Option<&[u8]> {
        match (field, &self.data) {
            (RecordField::TxtData, RDataType::TXT(strings)) => strings.get(idx),
            _ => None,
        }
    }

    /// Number of strings in a string-array field, zero if the field does not apply.
    pub fn get_abin_count(&self, field: RecordField) -> usize {
        match (field, &self.data) {
            (RecordField::TxtData, RDataType::TXT(strings)) => strings.len(),
            _ => 0,
        }
    }

    fn options(&self, field: RecordField) -> Option<&[EdnsOption]> {
        match (field, &self.data) {
            (RecordField::OptOptions, RDataType::OPT(opt)) => Some(&opt.options),
            _ => None,
        }
    }

    pub fn get_opt_count(&self, field: RecordField) -> usize {
        self.options(field).map_or(0, |options| options.len())
    }

    /// Raw code and data of one EDNS option.
    pub fn get_opt(&self, field: RecordField, idx: usize) -> Option<(u16, &[u8])> {
        let option = self.options(field)?.get(idx)?;
        Some((option.code_raw, option.data.as_slice()))
    }
}
