use rrwire::alloc::{AllocGate, Unlimited};
use rrwire_dns::{RecordField, RecordType};

use crate::{adapt, copy_str, ReplyChain, ReplyError, Result};

/// Service location
/// [RFC2782](https://tools.ietf.org/html/rfc2782)
#[derive(Debug, PartialEq, Eq)]
pub struct SrvReply {
    pub host: String,
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
}

pub fn parse_srv_reply(buf: &[u8], len: isize) -> Result<ReplyChain<SrvReply>> {
    parse_srv_reply_with(buf, len, &Unlimited)
}

pub fn parse_srv_reply_with(
    buf: &[u8],
    len: isize,
    gate: &dyn AllocGate,
) -> Result<ReplyChain<SrvReply>> {
    adapt(buf, len, gate, RecordType::SRV, |_| 1, |_, record, chain| {
        let field = |field| record.get_u16(field).ok_or(ReplyError::BadResponse);
        let priority = field(RecordField::SrvPriority)?;
        let weight = field(RecordField::SrvWeight)?;
        let port = field(RecordField::SrvPort)?;
        let target = record
            .get_name(RecordField::SrvTarget)
            .ok_or(ReplyError::BadResponse)?;
        let host = copy_str(gate, target)?;
        chain.push(
            gate,
            SrvReply {
                host,
                priority,
                weight,
                port,
            },
        )?;
        Ok(())
    })
}
