use rrwire::alloc::AllocGate;
use rrwire::error::Result;

use sawp_flags::{Flag, Flags};

use crate::cursor::Cursor;
use crate::enums::{RecordClass, RecordType};
use crate::name::parse_name;
use crate::ErrorFlags;

#[cfg(feature = "ffi")]
use sawp_ffi::GenerateFFI;

/// Smallest possible question: root name, type and class
pub const MIN_QUESTION_LEN: usize = 5;

/// A parsed DNS question
#[cfg_attr(feature = "ffi", derive(GenerateFFI))]
#[cfg_attr(feature = "ffi", sawp_ffi(prefix = "rrwire_dns"))]
#[derive(Debug, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    #[cfg_attr(feature = "ffi", sawp_ffi(copy))]
    pub record_type: RecordType,
    pub record_type_raw: u16,
    #[cfg_attr(feature = "ffi", sawp_ffi(copy))]
    pub record_class: RecordClass,
    pub record_class_raw: u16,
}

impl Question {
    pub fn parse(cursor: &mut Cursor, gate: &dyn AllocGate) -> Result<(Question, Flags<ErrorFlags>)> {
        let mut error_flags = ErrorFlags::none();

        let name = parse_name(cursor, gate)?;
        let working_qtype = cursor.read_u16_be()?;
        let qtype = RecordType::from_raw(working_qtype);
        if qtype == RecordType::UNKNOWN {
            error_flags |= ErrorFlags::UnknownRtype;
        }

        let working_qclass = cursor.read_u16_be()?;
        let qclass = RecordClass::from_raw(working_qclass);
        if qclass == RecordClass::UNKNOWN {
            error_flags |= ErrorFlags::UnknownRclass;
        }

        Ok((
            Question {
                name,
                record_type: qtype,
                record_type_raw: working_qtype,
                record_class: qclass,
                record_class_raw: working_qclass,
            },
            error_flags,
        ))
    }
}
