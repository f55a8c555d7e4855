//! Legacy reply adapters.
//!
//! Each adapter parses a complete DNS response with [`rrwire_dns`], checks
//! that it is a single question reply with at least one answer, and projects
//! the answers of one record type into a caller owned [`ReplyChain`].
//!
//! Answers are selected by class IN and type alone. CNAME records and other
//! answers of a different type are skipped without error, and owner names are
//! not compared against the question.
//!
//! # Example
//! ```
//! use rrwire_reply::{parse_txt_reply_ext, ReplyError};
//!
//! let response = [
//!     0x12, 0x34, // Transaction ID
//!     0x84, 0x00, // Flags: response, authoritative
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
//!     0x00, 0x00, 0x00, 0x64, // TTL: 100
//!     0x00, 0x06, // RDLENGTH: 6
//!     0x02, b'h', b'i', 0x02, b'y', b'o',
//! ];
//!
//! let chain = parse_txt_reply_ext(&response, response.len() as isize).unwrap();
//! let first = chain.first().unwrap();
//! assert_eq!(first.txt, b"hi");
//! assert!(first.record_start);
//! let second = first.next().unwrap();
//! assert_eq!(second.txt, b"yo");
//! assert!(!second.record_start);
//! assert!(second.next().is_none());
//!
//! assert_eq!(
//!     parse_txt_reply_ext(&response, -1).unwrap_err(),
//!     ReplyError::BadResponse
//! );
//! ```

use rrwire::alloc::{try_string, AllocGate};
use rrwire::error::{Error, ErrorKind};
use rrwire_dns::{Message, Record, RecordClass, RecordType, Section};
use tracing::debug;

pub mod caa;
pub mod chain;
pub mod mx;
pub mod srv;
pub mod txt;

/// FFI structs and Accessors
#[cfg(feature = "ffi")]
pub mod ffi;

pub use caa::{parse_caa_reply, parse_caa_reply_with, CaaReply};
pub use chain::{free_data, Link, ReplyChain};
pub use mx::{parse_mx_reply, parse_mx_reply_with, MxReply};
pub use srv::{parse_srv_reply, parse_srv_reply_with, SrvReply};
pub use txt::{
    parse_txt_reply, parse_txt_reply_ext, parse_txt_reply_ext_with, parse_txt_reply_with,
    TxtExt, TxtReply,
};

/// Outcome of a reply adapter that produced no chain
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyError {
    /// The response is malformed or does not carry exactly one question
    BadResponse = 1,
    /// The response is well formed but has no answer of the requested type
    NoData = 2,
    /// An allocation was refused
    OutOfMemory = 3,
}

impl std::fmt::Display for ReplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ReplyError::BadResponse => write!(f, "bad response"),
            ReplyError::NoData => write!(f, "no data"),
            ReplyError::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl std::error::Error for ReplyError {}

impl From<Error> for ReplyError {
    fn from(err: Error) -> Self {
        match err.kind {
            ErrorKind::OutOfMemory => ReplyError::OutOfMemory,
            _ => ReplyError::BadResponse,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReplyError>;

/// Parse `buf` and check the shape every legacy reply shares.
fn prepare(buf: &[u8], len: isize, gate: &dyn AllocGate) -> Result<Message> {
    let message = rrwire_dns::parse_with(buf, len, gate)?;
    if message.question_count() != 1 {
        debug!(
            questions = message.question_count(),
            "reply must carry exactly one question"
        );
        return Err(ReplyError::BadResponse);
    }
    if message.rr_count(Section::Answer) == 0 {
        debug!("reply has no answers");
        return Err(ReplyError::NoData);
    }
    Ok(message)
}

/// Answers of class IN and type `rtype`, with their ordinal in the answer
/// section.
fn matching(message: &Message, rtype: RecordType) -> impl Iterator<Item = (usize, &Record)> {
    message
        .records(Section::Answer)
        .iter()
        .enumerate()
        .filter(move |(_, record)| record.rclass == RecordClass::IN && record.rtype == rtype)
}

/// Build a chain from the answers of type `rtype`.
///
/// `nodes` reports how many nodes a record yields so the chain is allocated
/// once. `emit` appends them.
fn adapt<T, N, E>(
    buf: &[u8],
    len: isize,
    gate: &dyn AllocGate,
    rtype: RecordType,
    nodes: N,
    mut emit: E,
) -> Result<ReplyChain<T>>
where
    N: Fn(&Record) -> usize,
    E: FnMut(usize, &Record, &mut ReplyChain<T>) -> Result<()>,
{
    let message = prepare(buf, len, gate)?;
    let total: usize = matching(&message, rtype).map(|(_, record)| nodes(record)).sum();
    if matching(&message, rtype).next().is_none() {
        debug!(?rtype, "reply has no answer of the requested type");
        return Err(ReplyError::NoData);
    }

    let mut chain = ReplyChain::with_capacity(gate, total)?;
    for (ordinal, record) in matching(&message, rtype) {
        emit(ordinal, record, &mut chain)?;
    }
    Ok(chain)
}

/// Owned copy of a decoded name, asking `gate` first.
fn copy_str(gate: &dyn AllocGate, text: &str) -> Result<String> {
    let mut copy = try_string(gate, text.len())?;
    copy.push_str(text);
    Ok(copy)
}
