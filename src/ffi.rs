use crate::error::Error;
use sawp_ffi::deref;

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_error_is_truncation(err: *const Error) -> bool {
    deref!(err).is_truncation()
}

/// # Safety
/// function will panic if called with null
#[no_mangle]
pub unsafe extern "C" fn rrwire_error_is_out_of_memory(err: *const Error) -> bool {
    deref!(err).is_out_of_memory()
}

/// # Safety
/// `err` must be null or a pointer handed out by this library
#[no_mangle]
pub unsafe extern "C" fn rrwire_error_destroy(err: *mut Error) {
    if !err.is_null() {
        drop(Box::from_raw(err));
    }
}
