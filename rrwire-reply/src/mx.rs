use rrwire::alloc::{AllocGate, Unlimited};
use rrwire_dns::{RecordField, RecordType};

use crate::{adapt, copy_str, ReplyChain, ReplyError, Result};

/// Mail exchanger
#[derive(Debug, PartialEq, Eq)]
pub struct MxReply {
    pub host: String,
    pub priority: u16,
}

pub fn parse_mx_reply(buf: &[u8], len: isize) -> Result<ReplyChain<MxReply>> {
    parse_mx_reply_with(buf, len, &Unlimited)
}

pub fn parse_mx_reply_with(
    buf: &[u8],
    len: isize,
    gate: &dyn AllocGate,
) -> Result<ReplyChain<MxReply>> {
    adapt(buf, len, gate, RecordType::MX, |_| 1, |_, record, chain| {
        let priority = record
            .get_u16(RecordField::MxPreference)
            .ok_or(ReplyError::BadResponse)?;
        let exchange = record
            .get_name(RecordField::MxExchange)
            .ok_or(ReplyError::BadResponse)?;
        let host = copy_str(gate, exchange)?;
        chain.push(gate, MxReply { host, priority })?;
        Ok(())
    })
}
