use rrwire::error::Result;

use sawp_flags::{BitFlags, Flag, Flags};

use crate::cursor::Cursor;
use crate::enums::{OpCode, QueryResponse, ResponseCode};

use crate::ErrorFlags;
#[cfg(feature = "ffi")]
use sawp_ffi::GenerateFFI;

/// Length of the fixed message header
pub const HEADER_LEN: usize = 12;

/// Masks for extracting DNS header flags
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, BitFlags)]
#[repr(u16)]
pub enum header_masks {
    QUERY_RESPONSE = 0b1000_0000_0000_0000,
    OPCODE = 0b0111_1000_0000_0000,
    AUTH = 0b0000_0100_0000_0000,
    TRUNC = 0b0000_0010_0000_0000,
    RECUR_DESIRED = 0b0000_0001_0000_0000,
    RECUR_AVAIL = 0b0000_0000_1000_0000,
    Z = 0b0000_0000_0100_0000,
    AUTH_DATA = 0b0000_0000_0010_0000,
    CHECK_DISABLED = 0b0000_0000_0001_0000,
    RCODE = 0b0000_0000_0000_1111,
}

/// A parsed DNS header
#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct Header {
    /// Transaction ID
    pub transaction_id: u16,
    /// Raw header flags
    pub flags: u16,
    #[cfg_attr(feature = "ffi", sawp_ffi(copy))]
    /// QueryResponse::Query or QueryResponse::Response
    pub query_response: QueryResponse,
    #[cfg_attr(feature = "ffi", sawp_ffi(copy))]
    /// Type of query
    pub opcode: OpCode,
    /// Is the name server an authority for this domain name?
    pub authoritative: bool,
    /// Was this msg truncated?
    pub truncated: bool,
    /// Should the name server pursue the query recursively?
    pub recursion_desired: bool,
    /// Can the name server pursue the query recursively?
    pub recursion_available: bool,
    /// Z flag is set?
    pub zflag: bool,

    /// All data authenticated by the server
    pub authenticated_data: bool,

    pub check_disabled: bool,
    #[cfg_attr(feature = "ffi", sawp_ffi(copy))]
    /// Name server success/error state
    pub rcode: ResponseCode,
    /// Number of questions provided
    pub qdcount: u16,
    /// Number of answers provided
    pub ancount: u16,
    /// Number of name server resource records in the auth records
    pub nscount: u16,
    /// Number of resource records in the additional records section
    pub arcount: u16,
}

impl Header {
    pub fn parse(cursor: &mut Cursor) -> Result<(Header, Flags<ErrorFlags>)> {
        let mut error_flags = ErrorFlags::none();

        let txid = cursor.read_u16_be()?;
        let flags = cursor.read_u16_be()?;
        let wrapped_flags = Flags::<header_masks>::from_bits(flags);
        let query = if wrapped_flags.intersects(header_masks::QUERY_RESPONSE) {
            QueryResponse::Response
        } else {
            QueryResponse::Query
        };
        let opcode = OpCode::from_raw((wrapped_flags & header_masks::OPCODE).bits() >> 11);
        if opcode == OpCode::UNKNOWN {
            error_flags |= ErrorFlags::UnknownOpcode;
        }
        let rcode = ResponseCode::from_raw((wrapped_flags & header_masks::RCODE).bits());
        if rcode == ResponseCode::UNKNOWN {
            error_flags |= ErrorFlags::UnknownRcode;
        }

        Ok((
            Header {
                transaction_id: txid,
                flags,
                query_response: query,
                opcode,
                authoritative: wrapped_flags.intersects(header_masks::AUTH),
                truncated: wrapped_flags.intersects(header_masks::TRUNC),
                recursion_desired: wrapped_flags.intersects(header_masks::RECUR_DESIRED),
                recursion_available: wrapped_flags.intersects(header_masks::RECUR_AVAIL),
                zflag: wrapped_flags.intersects(header_masks::Z),
                authenticated_data: wrapped_flags.intersects(header_masks::AUTH_DATA),
                check_disabled: wrapped_flags.intersects(header_masks::CHECK_DISABLED),
                rcode,
                qdcount: cursor.read_u16_be()?,
                ancount: cursor.read_u16_be()?,
                nscount: cursor.read_u16_be()?,
                arcount: cursor.read_u16_be()?,
            },
            error_flags,
        ))
    }
}
