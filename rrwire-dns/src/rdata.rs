use std::convert::TryFrom;
use std::net::{Ipv4Addr, Ipv6Addr};

use rrwire::alloc::{try_copy, try_string, try_vec, AllocGate};
use rrwire::error::{Error, ErrorKind, Result};

use crate::cursor::Cursor;
use crate::edns::RDataOPT;
use crate::enums::RecordType;
use crate::name::parse_name;
#[cfg(feature = "ffi")]
use sawp_ffi::GenerateFFI;

/// Sequence of character-strings stored back to back.
///
/// Keeps the original segmentation, so the strings can be read one by one
/// or as a single concatenated blob.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BinArray {
    data: Vec<u8>,
    ends: Vec<usize>,
}

impl BinArray {
    /// Number of strings
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&[u8]> {
        let end = *self.ends.get(idx)?;
        let start = match idx {
            0 => 0,
            _ => self.ends[idx - 1],
        };
        self.data.get(start..end)
    }

    /// All strings concatenated
    pub fn concat(&self) -> &[u8] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.len()).filter_map(move |idx| self.get(idx))
    }
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataSoa {
    /// Primary NS for this zone
    pub mname: String,
    /// Authority's mailbox
    pub rname: String,
    /// Serial version number
    pub serial: u32,
    /// Refresh interval in seconds
    pub refresh: u32,
    /// Retry interval in seconds
    pub retry: u32,
    /// Upper time limit until zone is no longer authoritative in seconds
    pub expire: u32,
    /// Minimum ttl for records in this zone in seconds
    pub minimum: u32,
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataHINFO {
    pub cpu: String,
    pub os: String,
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataMX {
    pub preference: u16,
    pub exchange: String,
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataSRV {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataNAPTR {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub services: String,
    pub regexp: String,
    pub replacement: String,
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataTLSA {
    pub cert_usage: u8,
    pub selector: u8,
    pub matching_type: u8,
    pub data: Vec<u8>,
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataURI {
    pub priority: u16,
    pub weight: u16,
    pub target: Vec<u8>,
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataCAA {
    /// Issuer critical flag
    pub critical: u8,
    pub tag: String,
    pub value: Vec<u8>,
}

/// Rdata kept undecoded
#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct RDataRaw {
    pub rtype: u16,
    pub data: Vec<u8>,
}

#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns", type_only))]
#[derive(Debug, PartialEq, Eq)]
pub enum RDataType {
    /// Addresses
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    /// Domain names
    NS(String),
    CNAME(String),
    PTR(String),
    /// Text
    TXT(BinArray),
    /// Multiple field records
    SOA(RDataSoa),
    HINFO(RDataHINFO),
    MX(RDataMX),
    SRV(RDataSRV),
    NAPTR(RDataNAPTR),
    OPT(RDataOPT),
    TLSA(RDataTLSA),
    URI(RDataURI),
    CAA(RDataCAA),
    RAW(RDataRaw),
}

/// Single character-string restricted to printable ASCII.
fn parse_character_string(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<String> {
    let len = rdata.read_u8()?;
    let bytes = rdata.read(usize::from(len))?;
    if !bytes.iter().all(|b| (0x20..=0x7e).contains(b)) {
        return Err(Error::new(ErrorKind::InvalidData));
    }
    let text = std::str::from_utf8(bytes).map_err(|_| Error::new(ErrorKind::InvalidData))?;
    let mut string = try_string(gate, text.len())?;
    string.push_str(text);
    Ok(string)
}

impl RDataType {
    /// Decode a payload with the grammar of `rtype_raw`.
    ///
    /// `rdata` is bounded to the declared rdata length. Types without a
    /// grammar are kept raw.
    pub fn parse(
        rdata: &mut Cursor,
        gate: &dyn AllocGate,
        rtype_raw: u16,
        rclass_raw: u16,
        ttl: u32,
    ) -> Result<RDataType> {
        match RecordType::from_raw(rtype_raw) {
            RecordType::A => RDataType::parse_rdata_a(rdata),
            RecordType::AAAA => RDataType::parse_rdata_aaaa(rdata),
            RecordType::NS => Ok(RDataType::NS(parse_name(rdata, gate)?)),
            RecordType::CNAME => Ok(RDataType::CNAME(parse_name(rdata, gate)?)),
            RecordType::PTR => Ok(RDataType::PTR(parse_name(rdata, gate)?)),
            RecordType::SOA => RDataType::parse_rdata_soa(rdata, gate),
            RecordType::HINFO => RDataType::parse_rdata_hinfo(rdata, gate),
            RecordType::MX => RDataType::parse_rdata_mx(rdata, gate),
            RecordType::TXT => RDataType::parse_rdata_txt(rdata, gate),
            RecordType::SRV => RDataType::parse_rdata_srv(rdata, gate),
            RecordType::NAPTR => RDataType::parse_rdata_naptr(rdata, gate),
            RecordType::OPT => Ok(RDataType::OPT(RDataOPT::parse(
                rdata, gate, rclass_raw, ttl,
            )?)),
            RecordType::TLSA => RDataType::parse_rdata_tlsa(rdata, gate),
            RecordType::URI => RDataType::parse_rdata_uri(rdata, gate),
            RecordType::CAA => RDataType::parse_rdata_caa(rdata, gate),
            _ => RDataType::parse_raw(rdata, gate, rtype_raw),
        }
    }

    pub fn parse_raw(rdata: &mut Cursor, gate: &dyn AllocGate, rtype_raw: u16) -> Result<RDataType> {
        let data = try_copy(gate, rdata.read_rest())?;
        Ok(RDataType::RAW(RDataRaw {
            rtype: rtype_raw,
            data,
        }))
    }

    fn parse_rdata_a(rdata: &mut Cursor) -> Result<RDataType> {
        let octets = rdata.read(4)?;
        Ok(RDataType::A(Ipv4Addr::new(
            octets[0], octets[1], octets[2], octets[3],
        )))
    }

    fn parse_rdata_aaaa(rdata: &mut Cursor) -> Result<RDataType> {
        let octets = <[u8; 16]>::try_from(rdata.read(16)?)
            .map_err(|_| Error::new(ErrorKind::InvalidData))?;
        Ok(RDataType::AAAA(Ipv6Addr::from(octets)))
    }

    fn parse_rdata_soa(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<RDataType> {
        let mname = parse_name(rdata, gate)?;
        let rname = parse_name(rdata, gate)?;
        Ok(RDataType::SOA(RDataSoa {
            mname,
            rname,
            serial: rdata.read_u32_be()?,
            refresh: rdata.read_u32_be()?,
            retry: rdata.read_u32_be()?,
            expire: rdata.read_u32_be()?,
            minimum: rdata.read_u32_be()?,
        }))
    }

    fn parse_rdata_hinfo(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<RDataType> {
        let cpu = parse_character_string(rdata, gate)?;
        let os = parse_character_string(rdata, gate)?;
        Ok(RDataType::HINFO(RDataHINFO { cpu, os }))
    }

    fn parse_rdata_mx(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<RDataType> {
        let preference = rdata.read_u16_be()?;
        let exchange = parse_name(rdata, gate)?;
        Ok(RDataType::MX(RDataMX {
            preference,
            exchange,
        }))
    }

    /// Two passes: count and size the strings, then copy them into storage
    /// allocated at its exact size.
    fn parse_rdata_txt(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<RDataType> {
        let mut scan = rdata.clone();
        let mut count = 0;
        let mut total = 0;
        while !scan.is_empty() {
            let len = usize::from(scan.read_u8()?);
            scan.skip(len)?;
            count += 1;
            total += len;
        }
        // at least one string, possibly empty
        if count == 0 {
            return Err(Error::new(ErrorKind::InvalidData));
        }

        let mut data = try_vec(gate, total)?;
        let mut ends = try_vec(gate, count)?;
        while !rdata.is_empty() {
            let len = rdata.read_u8()?;
            data.extend_from_slice(rdata.read(usize::from(len))?);
            ends.push(data.len());
        }
        Ok(RDataType::TXT(BinArray { data, ends }))
    }

    fn parse_rdata_srv(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<RDataType> {
        let priority = rdata.read_u16_be()?;
        let weight = rdata.read_u16_be()?;
        let port = rdata.read_u16_be()?;
        let target = parse_name(rdata, gate)?;
        Ok(RDataType::SRV(RDataSRV {
            priority,
            weight,
            port,
            target,
        }))
    }

    fn parse_rdata_naptr(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<RDataType> {
        let order = rdata.read_u16_be()?;
        let preference = rdata.read_u16_be()?;
        let flags = parse_character_string(rdata, gate)?;
        let services = parse_character_string(rdata, gate)?;
        let regexp = parse_character_string(rdata, gate)?;
        let replacement = parse_name(rdata, gate)?;
        Ok(RDataType::NAPTR(RDataNAPTR {
            order,
            preference,
            flags,
            services,
            regexp,
            replacement,
        }))
    }

    fn parse_rdata_tlsa(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<RDataType> {
        let cert_usage = rdata.read_u8()?;
        let selector = rdata.read_u8()?;
        let matching_type = rdata.read_u8()?;
        let data = try_copy(gate, rdata.read_rest())?;
        Ok(RDataType::TLSA(RDataTLSA {
            cert_usage,
            selector,
            matching_type,
            data,
        }))
    }

    fn parse_rdata_uri(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<RDataType> {
        let priority = rdata.read_u16_be()?;
        let weight = rdata.read_u16_be()?;
        let target = try_copy(gate, rdata.read_rest())?;
        Ok(RDataType::URI(RDataURI {
            priority,
            weight,
            target,
        }))
    }

    fn parse_rdata_caa(rdata: &mut Cursor, gate: &dyn AllocGate) -> Result<RDataType> {
        let critical = rdata.read_u8()?;
        let tag = parse_character_string(rdata, gate)?;
        let value = try_copy(gate, rdata.read_rest())?;
        Ok(RDataType::CAA(RDataCAA {
            critical,
            tag,
            value,
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rrwire::alloc::{FailingGate, Unlimited};
    use rstest::rstest;

    fn decode(input: &[u8], rtype: RecordType) -> Result<(RDataType, usize)> {
        let mut rdata = Cursor::new(input);
        let data = RDataType::parse(&mut rdata, &Unlimited, rtype as u16, 1, 0)?;
        Ok((data, rdata.remaining()))
    }

    #[rstest(
        input,
        rtype,
        expected,
        case::a(
            &[0xc0, 0x00, 0x02, 0x01],
            RecordType::A,
            Ok((RDataType::A(Ipv4Addr::new(192, 0, 2, 1)), 0))
        ),
        case::a_short(&[0xc0, 0x00, 0x02], RecordType::A, Err(Error::incomplete_needed(1))),
        case::a_long(
            &[0xc0, 0x00, 0x02, 0x01, 0x00],
            RecordType::A,
            Ok((RDataType::A(Ipv4Addr::new(192, 0, 2, 1)), 1))
        ),
        case::aaaa(
            &[
                0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
            ],
            RecordType::AAAA,
            Ok((RDataType::AAAA("2001:db8::1".parse().unwrap()), 0))
        ),
        case::mx(
            &[
                0x00, 0x0a, // Preference: 10
                0x02, b'm', b'x', 0x00,
            ],
            RecordType::MX,
            Ok((
                RDataType::MX(RDataMX {
                    preference: 10,
                    exchange: "mx".to_string(),
                }),
                0
            ))
        ),
        case::hinfo(
            &[0x03, b'x', b'8', b'6', 0x05, b'L', b'i', b'n', b'u', b'x'],
            RecordType::HINFO,
            Ok((
                RDataType::HINFO(RDataHINFO {
                    cpu: "x86".to_string(),
                    os: "Linux".to_string(),
                }),
                0
            ))
        ),
        case::hinfo_not_printable(
            &[0x03, b'x', 0x00, b'6', 0x00],
            RecordType::HINFO,
            Err(Error::new(ErrorKind::InvalidData))
        ),
        case::srv(
            &[
                0x00, 0x01, // Priority: 1
                0x00, 0x05, // Weight: 5
                0x13, 0xc4, // Port: 5060
                0x03, b's', b'i', b'p', 0x00,
            ],
            RecordType::SRV,
            Ok((
                RDataType::SRV(RDataSRV {
                    priority: 1,
                    weight: 5,
                    port: 5060,
                    target: "sip".to_string(),
                }),
                0
            ))
        ),
        case::naptr(
            &[
                0x00, 0x64, // Order: 100
                0x00, 0x0a, // Preference: 10
                0x01, b'u', // Flags: u
                0x07, b'E', b'2', b'U', b'+', b's', b'i', b'p', // Services: E2U+sip
                0x03, b'!', b'x', b'!', // Regexp: !x!
                0x00, // Replacement: root
            ],
            RecordType::NAPTR,
            Ok((
                RDataType::NAPTR(RDataNAPTR {
                    order: 100,
                    preference: 10,
                    flags: "u".to_string(),
                    services: "E2U+sip".to_string(),
                    regexp: "!x!".to_string(),
                    replacement: "".to_string(),
                }),
                0
            ))
        ),
        case::tlsa(
            &[0x03, 0x01, 0x01, 0xde, 0xad],
            RecordType::TLSA,
            Ok((
                RDataType::TLSA(RDataTLSA {
                    cert_usage: 3,
                    selector: 1,
                    matching_type: 1,
                    data: vec![0xde, 0xad],
                }),
                0
            ))
        ),
        case::uri(
            &[0x00, 0x01, 0x00, 0x02, b'h', b't', b't', b'p'],
            RecordType::URI,
            Ok((
                RDataType::URI(RDataURI {
                    priority: 1,
                    weight: 2,
                    target: b"http".to_vec(),
                }),
                0
            ))
        ),
        case::caa(
            &[
                0x80, // Critical
                0x05, b'i', b's', b's', b'u', b'e',
                b'c', b'a', b'.', b'o', b'r', b'g',
            ],
            RecordType::CAA,
            Ok((
                RDataType::CAA(RDataCAA {
                    critical: 0x80,
                    tag: "issue".to_string(),
                    value: b"ca.org".to_vec(),
                }),
                0
            ))
        ),
        case::caa_truncated_tag(
            &[0x00, 0x05, b'i', b's'],
            RecordType::CAA,
            Err(Error::incomplete_needed(3))
        ),
        case::raw(
            &[0x01, 0x02, 0x03],
            RecordType::SVCB,
            Ok((
                RDataType::RAW(RDataRaw {
                    rtype: 64,
                    data: vec![0x01, 0x02, 0x03],
                }),
                0
            ))
        ),
    )]
    fn rdata(input: &[u8], rtype: RecordType, expected: Result<(RDataType, usize)>) {
        assert_eq!(decode(input, rtype), expected);
    }

    #[rstest(
        input,
        expected,
        case::single(&[0x03, b'A', b'B', b'C'], Ok(vec![b"ABC".as_ref()])),
        case::embedded_nul(
            &[0x03, b'A', 0x00, b'C', 0x02, b'x', b'y'],
            Ok(vec![b"A\0C".as_ref(), b"xy".as_ref()])
        ),
        case::empty_string(&[0x00], Ok(vec![b"".as_ref()])),
        case::empty_between(
            &[0x01, b'a', 0x00, 0x01, b'b'],
            Ok(vec![b"a".as_ref(), b"".as_ref(), b"b".as_ref()])
        ),
        case::no_strings(&[], Err(Error::new(ErrorKind::InvalidData))),
        case::overrun(&[0x01, b'a', 0x05, b'b'], Err(Error::incomplete_needed(4))),
    )]
    fn txt(input: &[u8], expected: Result<Vec<&[u8]>>) {
        let strings = decode(input, RecordType::TXT).map(|(data, _)| match data {
            RDataType::TXT(strings) => strings.iter().map(|s| s.to_vec()).collect::<Vec<_>>(),
            other => panic!("unexpected rdata {:?}", other),
        });
        assert_eq!(
            strings,
            expected.map(|chunks| chunks.iter().map(|s| s.to_vec()).collect::<Vec<_>>())
        );
    }

    #[test]
    fn txt_concat_agrees_with_chunks() {
        let input = [0x03, b'A', 0x00, b'C', 0x00, 0x02, b'x', b'y'];
        let (data, _) = decode(&input, RecordType::TXT).unwrap();
        let strings = match data {
            RDataType::TXT(strings) => strings,
            other => panic!("unexpected rdata {:?}", other),
        };
        assert_eq!(strings.len(), 3);
        assert_eq!(strings.concat(), b"A\0Cxy");
        assert_eq!(
            strings.iter().map(|s| s.len()).sum::<usize>(),
            strings.concat().len()
        );
        assert_eq!(strings.get(1), Some(b"".as_ref()));
        assert_eq!(strings.get(3), None);
    }

    #[test]
    fn txt_allocates_data_and_boundaries() {
        let gate = FailingGate::counting();
        let mut rdata = Cursor::new(&[0x01, b'a', 0x01, b'b']);
        RDataType::parse(&mut rdata, &gate, RecordType::TXT as u16, 1, 0).unwrap();
        assert_eq!(gate.seen(), 2);

        let gate = FailingGate::fail_at(2);
        let mut rdata = Cursor::new(&[0x01, b'a', 0x01, b'b']);
        assert_eq!(
            RDataType::parse(&mut rdata, &gate, RecordType::TXT as u16, 1, 0),
            Err(Error::out_of_memory())
        );
    }

    #[test]
    fn name_pointer_reaches_outside_rdata() {
        let input = [
            0x02, b'm', b'x', 0x00, // 0: mx
            0x00, 0x0a, 0xc0, 0x00, // 4: MX 10 -> mx
        ];
        let mut message = Cursor::new(&input);
        message.skip(4).unwrap();
        let mut rdata = message.sub(4).unwrap();
        let data = RDataType::parse(&mut rdata, &Unlimited, RecordType::MX as u16, 1, 0);
        assert_eq!(
            data,
            Ok(RDataType::MX(RDataMX {
                preference: 10,
                exchange: "mx".to_string(),
            }))
        );
        assert!(rdata.is_empty());
    }
}
