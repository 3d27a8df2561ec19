// C ABI over the converter. Callers own an opaque handle; nothing is global.
// Panics are caught at the boundary so they never unwind into C.
use crate::core::engine::Converter;
use crate::core::types::ConvertOptions;
use libc::c_char;
use std::ffi::{CStr, CString};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

/// Returns a converter over the built-in table, or null on failure.
#[no_mangle]
pub extern "C" fn preeti_converter_new() -> *mut Converter {
    match catch_unwind(Converter::new) {
        Ok(converter) => Box::into_raw(Box::new(converter)),
        Err(_) => {
            log::error!("panic while creating converter");
            ptr::null_mut()
        }
    }
}

/// # Safety
/// `handle` must come from `preeti_converter_new` and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn preeti_converter_free(handle: *mut Converter) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Converts a NUL-terminated UTF-8 string. Returns a new string the caller
/// must release with `preeti_free_string`, or null if the input is not UTF-8.
///
/// # Safety
/// `handle` must be a live converter and `text` a valid C string.
#[no_mangle]
pub unsafe extern "C" fn preeti_convert(
    handle: *const Converter,
    text: *const c_char,
    convert_numbers: bool,
) -> *mut c_char {
    if handle.is_null() || text.is_null() {
        return ptr::null_mut();
    }
    let Ok(input) = CStr::from_ptr(text).to_str() else {
        return ptr::null_mut();
    };
    let converter = &*handle;

    let result = catch_unwind(AssertUnwindSafe(|| {
        converter
            .convert_with(input, ConvertOptions { convert_numbers })
            .text
    }));
    match result {
        // Converted text can only contain NUL if the input did, and CStr input cannot.
        Ok(converted) => CString::new(converted)
            .map(CString::into_raw)
            .unwrap_or(ptr::null_mut()),
        Err(_) => {
            log::error!("panic in preeti_convert");
            ptr::null_mut()
        }
    }
}

/// # Safety
/// `s` must come from `preeti_convert` and be freed once.
#[no_mangle]
pub unsafe extern "C" fn preeti_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_through_the_c_abi() {
        let handle = preeti_converter_new();
        assert!(!handle.is_null());
        let input = CString::new("g]kfn @)").unwrap();
        unsafe {
            let out = preeti_convert(handle, input.as_ptr(), false);
            assert!(!out.is_null());
            assert_eq!(CStr::from_ptr(out).to_str().unwrap(), "नेपाल 20");
            preeti_free_string(out);
            preeti_converter_free(handle);
        }
    }

    #[test]
    fn null_arguments_give_null() {
        unsafe {
            assert!(preeti_convert(ptr::null(), ptr::null(), true).is_null());
        }
    }
}
