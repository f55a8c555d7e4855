#![allow(dead_code)]
use super::*;
use sawp_ffi::*;

/// Status code returned across the C boundary, zero on success
unsafe fn status<T>(result: Result<ReplyChain<T>>, out: *mut *mut ReplyChain<T>) -> u32 {
    match result {
        Ok(chain) => {
            if !out.is_null() {
                *out = chain.into_ffi_ptr();
            }
            0
        }
        Err(err) => err as u32,
    }
}

unsafe fn input<'a>(data: *const u8, length: isize) -> &'a [u8] {
    if data.is_null() || length <= 0 {
        &[]
    } else {
        std::slice::from_raw_parts(data, length as usize)
    }
}

/// `out` is written only on success
///
/// # Safety
/// `data` must point at `length` readable bytes
#[no_mangle]
pub unsafe extern "C" fn rrwire_reply_parse_txt(
    data: *const u8,
    length: isize,
    out: *mut *mut ReplyChain<TxtReply>,
) -> u32 {
    status(parse_txt_reply(input(data, length), length), out)
}

/// `out` is written only on success
///
/// # Safety
/// `data` must point at `length` readable bytes
#[no_mangle]
pub unsafe extern "C" fn rrwire_reply_parse_txt_ext(
    data: *const u8,
    length: isize,
    out: *mut *mut ReplyChain<TxtExt>,
) -> u32 {
    status(parse_txt_reply_ext(input(data, length), length), out)
}

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_reply_txt_cnt(chain: *const ReplyChain<TxtReply>) -> usize {
    deref!(chain).len()
}

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_reply_txt_at(
    chain: *const ReplyChain<TxtReply>,
    idx: usize,
    len: *mut usize,
) -> *const u8 {
    match deref!(chain).get(idx) {
        Some(node) => {
            *len = node.txt.len();
            node.txt.as_ptr()
        }
        None => {
            *len = 0;
            std::ptr::null()
        }
    }
}

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_reply_txt_ext_cnt(chain: *const ReplyChain<TxtExt>) -> usize {
    deref!(chain).len()
}

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_reply_txt_ext_at(
    chain: *const ReplyChain<TxtExt>,
    idx: usize,
    len: *mut usize,
    record_start: *mut bool,
) -> *const u8 {
    match deref!(chain).get(idx) {
        Some(node) => {
            *len = node.txt.len();
            *record_start = node.record_start;
            node.txt.as_ptr()
        }
        None => {
            *len = 0;
            *record_start = false;
            std::ptr::null()
        }
    }
}

#[no_mangle]
pub unsafe extern "C" fn rrwire_reply_txt_free(chain: *mut ReplyChain<TxtReply>) {
    if !chain.is_null() {
        free_data(Some(*Box::from_raw(chain)));
    }
}

#[no_mangle]
pub unsafe extern "C" fn rrwire_reply_txt_ext_free(chain: *mut ReplyChain<TxtExt>) {
    if !chain.is_null() {
        free_data(Some(*Box::from_raw(chain)));
    }
}
