use rrwire::alloc::{try_copy, AllocGate, Unlimited};
use rrwire_dns::{RecordField, RecordType};

use crate::{adapt, ReplyChain, Result};

/// One character-string of a TXT answer
#[derive(Debug, PartialEq, Eq)]
pub struct TxtReply {
    pub txt: Vec<u8>,
}

/// One character-string of a TXT answer, with the record it came from
#[derive(Debug, PartialEq, Eq)]
pub struct TxtExt {
    pub txt: Vec<u8>,
    /// Set on the first string of each TXT record
    pub record_start: bool,
    /// Ordinal of the source record in the answer section
    pub answer_index: usize,
}

fn strings(record: &rrwire_dns::Record) -> usize {
    record.get_abin_count(RecordField::TxtData)
}

pub fn parse_txt_reply(buf: &[u8], len: isize) -> Result<ReplyChain<TxtReply>> {
    parse_txt_reply_with(buf, len, &Unlimited)
}

pub fn parse_txt_reply_with(
    buf: &[u8],
    len: isize,
    gate: &dyn AllocGate,
) -> Result<ReplyChain<TxtReply>> {
    adapt(buf, len, gate, RecordType::TXT, strings, |_, record, chain| {
        for idx in 0..strings(record) {
            let data = record.get_abin(RecordField::TxtData, idx).unwrap_or_default();
            let txt = try_copy(gate, data)?;
            chain.push(gate, TxtReply { txt })?;
        }
        Ok(())
    })
}

pub fn parse_txt_reply_ext(buf: &[u8], len: isize) -> Result<ReplyChain<TxtExt>> {
    parse_txt_reply_ext_with(buf, len, &Unlimited)
}

pub fn parse_txt_reply_ext_with(
    buf: &[u8],
    len: isize,
    gate: &dyn AllocGate,
) -> Result<ReplyChain<TxtExt>> {
    adapt(buf, len, gate, RecordType::TXT, strings, |ordinal, record, chain| {
        for idx in 0..strings(record) {
            let data = record.get_abin(RecordField::TxtData, idx).unwrap_or_default();
            let txt = try_copy(gate, data)?;
            chain.push(
                gate,
                TxtExt {
                    txt,
                    record_start: idx == 0,
                    answer_index: ordinal,
                },
            )?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ReplyError;
    use rstest::rstest;

    const CNAME_AND_TXT: &[u8] = &[
        0x12, 0x34, // Transaction ID
        0x84, 0x00, // Flags: response, authoritative
        0x00, 0x01, // QDCOUNT: 1
        0x00, 0x03, // ANCOUNT: 3
        0x00, 0x00, // NSCOUNT: 0
        0x00, 0x00, // ARCOUNT: 0
        0x03, b'f', b'o', b'o', 0x00, // Name: foo
        0x00, 0x10, // Type: TXT
        0x00, 0x01, // Class: IN
        0xc0, 0x0c, // Name: foo
        0x00, 0x05, // Type: CNAME
        0x00, 0x01, // Class: IN
        0x00, 0x00, 0x01, 0x2c, // TTL: 300
        0x00, 0x04, // RDLENGTH: 4
        0x01, b'c', 0xc0, 0x0c, // c.foo
        0xc0, 0x21, // Name: c.foo
        0x00, 0x10, // Type: TXT
        0x00, 0x01, // Class: IN
        0x00, 0x00, 0x00, 0x64, // TTL: 100
        0x00, 0x06, // RDLENGTH: 6
        0x02, b'a', b'b', 0x02, b'c', b'd',
        0xc0, 0x21, // Name: c.foo
        0x00, 0x10, // Type: TXT
        0x00, 0x03, // Class: CH
        0x00, 0x00, 0x00, 0x64, // TTL: 100
        0x00, 0x03, // RDLENGTH: 3
        0x02, b'e', b'f',
    ];

    #[test]
    fn cname_and_foreign_class_skipped() {
        let chain = parse_txt_reply_ext(CNAME_AND_TXT, CNAME_AND_TXT.len() as isize).unwrap();
        assert_eq!(
            chain.into_vec(),
            vec![
                TxtExt {
                    txt: b"ab".to_vec(),
                    record_start: true,
                    answer_index: 1,
                },
                TxtExt {
                    txt: b"cd".to_vec(),
                    record_start: false,
                    answer_index: 1,
                },
            ]
        );
    }

    #[test]
    fn simple_variant_keeps_chunks() {
        let chain = parse_txt_reply(CNAME_AND_TXT, CNAME_AND_TXT.len() as isize).unwrap();
        let txt: Vec<&[u8]> = chain.iter().map(|node| node.txt.as_slice()).collect();
        assert_eq!(txt, vec![b"ab".as_ref(), b"cd".as_ref()]);
    }

    #[rstest(
        len,
        expected,
        case::negative(-1, ReplyError::BadResponse),
        case::empty(0, ReplyError::BadResponse),
        case::header_only(12, ReplyError::BadResponse),
    )]
    fn rejected(len: isize, expected: ReplyError) {
        assert_eq!(parse_txt_reply(CNAME_AND_TXT, len), Err(expected));
        assert_eq!(parse_txt_reply_ext(CNAME_AND_TXT, len), Err(expected));
    }
}
