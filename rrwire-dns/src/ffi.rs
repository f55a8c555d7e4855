#![allow(dead_code)]
use super::*;
use rrwire::error::Error;
use sawp_ffi::*;
use std::convert::TryFrom;

#[repr(C)]
pub struct ParseResult {
    message: *mut Message,
    size_read: usize,
    error: *mut Error,
}

#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_create(flags: u8) -> *mut Dns {
    let parser = Dns::new(Flags::<ParseFlags>::from_bits(flags));
    parser.into_ffi_ptr()
}

#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_destroy(d: *mut Dns) {
    if !d.is_null() {
        drop(Box::from_raw(d));
    }
}

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_parse(
    parser: *const Dns,
    data: *const u8,
    length: isize,
) -> *mut ParseResult {
    let input = if data.is_null() || length <= 0 {
        &[][..]
    } else {
        std::slice::from_raw_parts(data, length as usize)
    };
    let result = bounded_input(input, length).and_then(|input| deref!(parser).parse(input));
    match result {
        Ok((sl, message)) => ParseResult {
            message: message.into_ffi_ptr(),
            size_read: input.len() - sl.len(),
            error: std::ptr::null_mut(),
        }
        .into_ffi_ptr(),
        Err(e) => ParseResult {
            message: std::ptr::null_mut(),
            size_read: 0,
            error: e.into_ffi_ptr(),
        }
        .into_ffi_ptr(),
    }
}

impl Drop for ParseResult {
    fn drop(&mut self) {
        unsafe {
            rrwire_dns_message_destroy(self.message);
            if !self.error.is_null() {
                drop(Box::from_raw(self.error));
            }
        }
    }
}

/// Free ParseResult
/// Will also destroy contained message and error
#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_parse_result_destroy(d: *mut ParseResult) {
    if !d.is_null() {
        drop(Box::from_raw(d));
    }
}

#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_message_destroy(d: *mut Message) {
    if !d.is_null() {
        drop(Box::from_raw(d));
    }
}

/// Number of records in a section, zero for an unknown section
///
/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_message_rr_cnt(msg: *const Message, section: u8) -> usize {
    match Section::try_from(section) {
        Ok(section) => deref!(msg).rr_count(section),
        Err(_) => 0,
    }
}

/// Borrowed record, or null when out of range
///
/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_message_rr_at(
    msg: *const Message,
    section: u8,
    idx: usize,
) -> *const Record {
    Section::try_from(section)
        .ok()
        .and_then(|section| deref!(msg).rr_at(section, idx))
        .map_or(std::ptr::null(), |record| record as *const Record)
}

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_record_get_type(record: *const Record) -> u16 {
    deref!(record).rtype_raw
}

unsafe fn export_bytes(bytes: Option<&[u8]>, len: *mut usize) -> *const u8 {
    match bytes {
        Some(bytes) => {
            if !len.is_null() {
                *len = bytes.len();
            }
            bytes.as_ptr()
        }
        None => {
            if !len.is_null() {
                *len = 0;
            }
            std::ptr::null()
        }
    }
}

/// Binary field of a record. Null with `len` zero when the field does not
/// apply to the record's type.
///
/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_record_get_bin(
    record: *const Record,
    field: u32,
    len: *mut usize,
) -> *const u8 {
    let bytes = RecordField::try_from(field)
        .ok()
        .and_then(|field| deref!(record).get_bin(field));
    export_bytes(bytes, len)
}

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_record_get_abin(
    record: *const Record,
    field: u32,
    idx: usize,
    len: *mut usize,
) -> *const u8 {
    let bytes = RecordField::try_from(field)
        .ok()
        .and_then(|field| deref!(record).get_abin(field, idx));
    export_bytes(bytes, len)
}

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_dns_record_get_abin_cnt(record: *const Record, field: u32) -> usize {
    RecordField::try_from(field).map_or(0, |field| deref!(record).get_abin_count(field))
}
