use rrwire::alloc::{try_copy, AllocGate, Unlimited};
use rrwire_dns::{RecordField, RecordType};

use crate::{adapt, ReplyChain, ReplyError, Result};

/// Certification authority authorization
/// [RFC8659](https://tools.ietf.org/html/rfc8659)
#[derive(Debug, PartialEq, Eq)]
pub struct CaaReply {
    /// Issuer critical flag
    pub critical: u8,
    pub property: Vec<u8>,
    pub value: Vec<u8>,
}

pub fn parse_caa_reply(buf: &[u8], len: isize) -> Result<ReplyChain<CaaReply>> {
    parse_caa_reply_with(buf, len, &Unlimited)
}

pub fn parse_caa_reply_with(
    buf: &[u8],
    len: isize,
    gate: &dyn AllocGate,
) -> Result<ReplyChain<CaaReply>> {
    adapt(buf, len, gate, RecordType::CAA, |_| 1, |_, record, chain| {
        let critical = record
            .get_u8(RecordField::CaaCritical)
            .ok_or(ReplyError::BadResponse)?;
        let tag = record
            .get_str(RecordField::CaaTag)
            .ok_or(ReplyError::BadResponse)?;
        let value = record
            .get_bin(RecordField::CaaValue)
            .ok_or(ReplyError::BadResponse)?;
        let property = try_copy(gate, tag.as_bytes())?;
        let value = try_copy(gate, value)?;
        chain.push(
            gate,
            CaaReply {
                critical,
                property,
                value,
            },
        )?;
        Ok(())
    })
}
