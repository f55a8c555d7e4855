//! Extended DNS
//! [RFC6891](https://tools.ietf.org/html/rfc6891)
//!
//! The OPT pseudo record reuses the fixed record fields: the class carries the
//! requestor's UDP payload size and the TTL packs the extended rcode, the EDNS
//! version and the flags. The rdata is a list of (code, length, data) options.

use num_enum::TryFromPrimitive;

use rrwire::alloc::{try_copy, try_vec, AllocGate};
use rrwire::error::Result;

use std::convert::TryFrom;

use crate::cursor::Cursor;
#[cfg(feature = "ffi")]
use sawp_ffi::GenerateFFI;

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
pub enum OptionCode {
    /// Long-Lived Queries
    LLQ = 1,
    /// Update Leases
    UL = 2,
    /// Name Server Identifier
    NSID = 3,
    /// DNSSEC Algorithm Understood
    DAU = 5,
    /// DS Hash Understood
    DHU = 6,
    /// NSEC3 Hash Understood
    N3U = 7,
    /// Client Subnet
    ECS = 8,
    /// Zone expiry
    EXPIRE = 9,
    COOKIE = 10,
    TCPKEEPALIVE = 11,
    PADDING = 12,
    CHAIN = 13,
    KEYTAG = 14,
    /// Extended DNS errors
    EDE = 15,
    UNKNOWN,
}

impl OptionCode {
    pub fn from_raw(val: u16) -> Self {
        OptionCode::try_from(val).unwrap_or(OptionCode::UNKNOWN)
    }
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct EdnsOption {
    #[cfg_attr(feature = "ffi", sawp_ffi(copy))]
    pub code: OptionCode,
    pub code_raw: u16,
    pub data: Vec<u8>,
}

impl EdnsOption {
    fn parse(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<EdnsOption> {
        let code_raw = rdata.read_u16_be()?;
        let len = rdata.read_u16_be()?;
        let data = try_copy(gate, rdata.read(usize::from(len))?)?;
        Ok(EdnsOption {
            code: OptionCode::from_raw(code_raw),
            code_raw,
            data,
        })
    }

    /// Options up to the end of `rdata`, allocated once at their exact count.
    pub fn parse_options(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<Vec<EdnsOption>> {
        let mut scan = rdata.clone();
        let mut count = 0;
        while !scan.is_empty() {
            scan.skip(2)?;
            let len = scan.read_u16_be()?;
            scan.skip(usize::from(len))?;
            count += 1;
        }

        let mut options = try_vec(gate, count)?;
        while !rdata.is_empty() {
            options.push(EdnsOption::parse(rdata, gate)?);
        }
        Ok(options)
    }
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataOPT {
    /// Requestor's UDP payload size
    pub udp_payload_size: u16,
    /// Upper 8 bits of the 12 bit response code
    pub extended_rcode: u8,
    pub version: u8,
    /// Bit 15 is DO, the rest are reserved
    pub flags: u16,
    pub options: Vec<EdnsOption>,
}

impl RDataOPT {
    pub fn parse(
        rdata: &mut Cursor,
        gate: &dyn AllocGate,
        rclass_raw: u16,
        ttl: u32,
    ) -> Result<RDataOPT> {
        let options = EdnsOption::parse_options(rdata, gate)?;
        Ok(RDataOPT {
            udp_payload_size: rclass_raw,
            extended_rcode: (ttl >> 24) as u8,
            version: (ttl >> 16) as u8,
            flags: ttl as u16,
            options,
        })
    }

    /// DNSSEC answer OK
    pub fn dnssec_ok(&self) -> bool {
        self.flags & 0x8000 != 0
    }
}
