//! A DNS message decoder. Given the bytes of a response received from a
//! nameserver, it returns a [`Message`] holding the header, the questions and
//! the three resource record sections, or an error explaining why the whole
//! message was rejected. There are no partial results.
//!
//! Records are decoded with the grammar of their type (see [`grammar`]) and
//! read through the typed accessors on [`Record`]. Types without a grammar are
//! kept as raw rdata.
//!
//! The following protocol references were used to create this module:
//!
//! [RFC1035](https://tools.ietf.org/html/rfc1035)
//! [RFC2782](https://tools.ietf.org/html/rfc2782)
//! [RFC3403](https://tools.ietf.org/html/rfc3403)
//! [RFC3596](https://tools.ietf.org/html/rfc3596)
//! [RFC6698](https://tools.ietf.org/html/rfc6698)
//! [RFC6891](https://tools.ietf.org/html/rfc6891)
//! [RFC7553](https://tools.ietf.org/html/rfc7553)
//! [RFC8659](https://tools.ietf.org/html/rfc8659)
//! [DNS Parameters](https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml)
//!
//! # Example
//! ```
//! use rrwire_dns::{RecordField, Section};
//!
//! let response = [
//!     0x12, 0x34, // Transaction ID
//!     0x81, 0x80, // Flags: response, RD, RA
//!     0x00, 0x01, // QDCOUNT: 1
//!     0x00, 0x01, // ANCOUNT: 1
//!     0x00, 0x00, // NSCOUNT: 0
//!     0x00, 0x00, // ARCOUNT: 0
//!     0x03, b'f', b'o', b'o', 0x00, // Name: foo
//!     0x00, 0x10, // Type: TXT
//!     0x00, 0x01, // Class: IN
//!     0xc0, 0x0c, // Name: foo
//!     0x00, 0x10, // Type: TXT
//!     0x00, 0x01, // Class: IN
//!     0x00, 0x00, 0x00, 0x3c, // TTL: 60
//!     0x00, 0x04, // RDLENGTH: 4
//!     0x03, b'b', b'a', b'r',
//! ];
//!
//! let message = rrwire_dns::parse(&response, response.len() as isize).unwrap();
//! assert_eq!(message.rr_count(Section::Answer), 1);
//! let record = message.rr_at(Section::Answer, 0).unwrap();
//! assert_eq!(record.name, "foo");
//! assert_eq!(record.get_abin(RecordField::TxtData, 0), Some(b"bar".as_ref()));
//! ```

use rrwire::alloc::{try_vec, AllocGate, Unlimited};
use rrwire::error::{Error, NomError, Result};
use rrwire::parser::{bounded_input, Parse};
use rrwire::protocol::Protocol;
use sawp_flags::{BitFlags, Flags};
use tracing::debug;

/// FFI structs and Accessors
#[cfg(feature = "ffi")]
pub mod ffi;

#[cfg(feature = "ffi")]
use sawp_ffi::GenerateFFI;

pub mod cursor;
use cursor::Cursor;

pub mod edns;

pub mod enums;
pub use enums::*;

pub mod grammar;
pub use grammar::{FieldKind, RecordField};

pub mod header;
pub use header::*;

pub mod name;

pub mod question;
pub use question::*;

pub mod rdata;
pub use rdata::{BinArray, RDataType};

pub mod record;
pub use record::{RawPolicy, Record};

// This is a helper type for the module since the input will always be
// &'a [u8] and the error will always be NomError<&'a [u8]>
type IResult<'a, O> = nom::IResult<&'a [u8], O, NomError<&'a [u8]>>;

/// Error flags raised while parsing DNS - to be used in the returned Message
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, BitFlags)]
pub enum ErrorFlags {
    /// more than one pseudo-RR exists - EDNS specs limit OPT RRs to <=1
    ExtraOptRr = 0b0000_0000_0000_0001,
    /// invalid opcode
    UnknownOpcode = 0b0000_0000_0000_0010,
    /// invalid response code
    UnknownRcode = 0b0000_0000_0000_0100,
    /// invalid record class
    UnknownRclass = 0b0000_0000_0000_1000,
    /// invalid record type
    UnknownRtype = 0b0000_0000_0001_0000,
}

/// Per section switches that keep decodable records as raw rdata
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, BitFlags)]
pub enum ParseFlags {
    AnswerBaseRaw = 0b0000_0001,
    AuthorityBaseRaw = 0b0000_0010,
    AdditionalBaseRaw = 0b0000_0100,
    AnswerExtRaw = 0b0000_1000,
    AuthorityExtRaw = 0b0001_0000,
    AdditionalExtRaw = 0b0010_0000,
}

/// Breakdown of the parsed dns bytes
#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<Record>,
    pub authority: Vec<Record>,
    pub additional: Vec<Record>,
    #[cfg_attr(feature = "ffi", sawp_ffi(flag = "u16"))]
    pub error_flags: Flags<ErrorFlags>,
}

impl Message {
    pub fn records(&self, section: Section) -> &[Record] {
        match section {
            Section::Answer => &self.answers,
            Section::Authority => &self.authority,
            Section::Additional => &self.additional,
        }
    }

    pub fn rr_count(&self, section: Section) -> usize {
        self.records(section).len()
    }

    pub fn rr_at(&self, section: Section, idx: usize) -> Option<&Record> {
        self.records(section).get(idx)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, idx: usize) -> Option<&Question> {
        self.questions.get(idx)
    }

    /// The EDNS pseudo record, if the additional section carries one.
    pub fn opt(&self) -> Option<&Record> {
        self.additional
            .iter()
            .find(|record| record.rtype == RecordType::OPT)
    }

    /// Response code with the EDNS extended bits applied.
    pub fn rcode(&self) -> ResponseCode {
        let ext = self
            .opt()
            .and_then(|opt| match &opt.data {
                RDataType::OPT(opt) => Some(opt.extended_rcode),
                _ => None,
            })
            .unwrap_or(0);
        let low = Flags::<header_masks>::from_bits(self.header.flags) & header_masks::RCODE;
        ResponseCode::from_raw(u16::from(ext) << 4 | low.bits())
    }
}

/// Decoding progress through a message. Stages are only ever left forwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Header,
    Questions,
    Answers,
    Authority,
    Additional,
    Done,
}

/// Fail before allocating when `count` entries of at least `min_len` bytes
/// cannot fit in what is left of the message.
fn check_fits(cursor: &Cursor, count: u16, min_len: usize) -> Result<()> {
    let needed = usize::from(count) * min_len;
    let remaining = cursor.remaining();
    if needed > remaining {
        return Err(Error::incomplete_needed(needed - remaining));
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct Dns {
    pub flags: Flags<ParseFlags>,
}

impl Protocol for Dns {
    type Message = Message;

    fn name() -> &'static str {
        "dns"
    }
}

impl Dns {
    pub fn new(flags: Flags<ParseFlags>) -> Self {
        Dns { flags }
    }

    fn policy(&self, section: Section) -> RawPolicy {
        let (base, extended) = match section {
            Section::Answer => (ParseFlags::AnswerBaseRaw, ParseFlags::AnswerExtRaw),
            Section::Authority => (ParseFlags::AuthorityBaseRaw, ParseFlags::AuthorityExtRaw),
            Section::Additional => (ParseFlags::AdditionalBaseRaw, ParseFlags::AdditionalExtRaw),
        };
        RawPolicy {
            base: self.flags.intersects(base),
            extended: self.flags.intersects(extended),
        }
    }

    fn parse_records(
        &self,
        cursor: &mut Cursor,
        gate: &dyn AllocGate,
        section: Section,
        count: u16,
        error_flags: &mut Flags<ErrorFlags>,
    ) -> Result<Vec<Record>> {
        check_fits(cursor, count, record::MIN_RECORD_LEN)?;
        let policy = self.policy(section);
        let mut records = try_vec(gate, usize::from(count))?;
        for _ in 0..count {
            let (record, inner_error_flags) = Record::parse(cursor, gate, policy)?;
            *error_flags |= inner_error_flags;
            records.push(record);
        }
        Ok(records)
    }

    fn decode(&self, cursor: &mut Cursor, gate: &dyn AllocGate, stage: &mut Stage) -> Result<Message> {
        *stage = Stage::Header;
        let (header, mut error_flags) = Header::parse(cursor)?;

        *stage = Stage::Questions;
        check_fits(cursor, header.qdcount, question::MIN_QUESTION_LEN)?;
        let mut questions = try_vec(gate, usize::from(header.qdcount))?;
        for _ in 0..header.qdcount {
            let (question, inner_error_flags) = Question::parse(cursor, gate)?;
            error_flags |= inner_error_flags;
            questions.push(question);
        }

        *stage = Stage::Answers;
        let answers =
            self.parse_records(cursor, gate, Section::Answer, header.ancount, &mut error_flags)?;

        *stage = Stage::Authority;
        let authority =
            self.parse_records(cursor, gate, Section::Authority, header.nscount, &mut error_flags)?;

        *stage = Stage::Additional;
        let additional = self.parse_records(
            cursor,
            gate,
            Section::Additional,
            header.arcount,
            &mut error_flags,
        )?;
        let opt_count = additional
            .iter()
            .filter(|record| record.rtype == RecordType::OPT)
            .count();
        if opt_count > 1 {
            error_flags |= ErrorFlags::ExtraOptRr;
        }

        *stage = Stage::Done;
        Ok(Message {
            header,
            questions,
            answers,
            authority,
            additional,
            error_flags,
        })
    }
}

impl Parse for Dns {
    fn parse_with<'a>(
        &self,
        input: &'a [u8],
        gate: &dyn AllocGate,
    ) -> Result<(&'a [u8], Self::Message)> {
        let mut cursor = Cursor::new(input);
        let mut stage = Stage::Header;
        match self.decode(&mut cursor, gate, &mut stage) {
            Ok(message) => Ok((&input[cursor.position()..], message)),
            Err(err) => {
                debug!(
                    ?stage,
                    truncated = err.is_truncation(),
                    structural = err.is_structural(),
                    "rejected DNS message: {}",
                    err
                );
                Err(err)
            }
        }
    }
}

/// Parse the first `len` bytes of `buf` as a single DNS message.
///
/// A negative `len`, or one longer than `buf`, is rejected before any byte is
/// read. Bytes after the message are ignored.
pub fn parse(buf: &[u8], len: isize) -> Result<Message> {
    parse_with(buf, len, &Unlimited)
}

pub fn parse_with(buf: &[u8], len: isize, gate: &dyn AllocGate) -> Result<Message> {
    let input = bounded_input(buf, len)?;
    let (_, message) = Dns::default().parse_with(input, gate)?;
    Ok(message)
}
