//! Argument and string handling at the C boundary.
//!
//! Strings handed to the caller are allocated here with [`CString`] and must
//! come back through [`rawjpeg_release_string`] exactly once.

use std::any::Any;
use std::ffi::{c_char, c_int, CStr, CString};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::ptr;

use rawjpeg_core::{RawError, TranscodeError};
use thiserror::Error;

/// Status returned on success.
pub const STATUS_OK: c_int = 0;
/// Status returned on any failure.
pub const STATUS_FAILED: c_int = 1;

/// Why a boundary call failed.
#[derive(Debug, Error)]
pub(crate) enum FfiError {
    #[error("{0} is null")]
    Null(&'static str),

    #[error("Invalid buffer length: {0}")]
    InvalidLength(c_int),

    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("{0} is not valid UTF-8")]
    NotUtf8(&'static str),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Raw(#[from] RawError),

    #[error("Internal panic: {0}")]
    Panic(String),
}

/// Run `op`, turning a panic into an error so it never unwinds into C.
pub(crate) fn guarded<T>(op: impl FnOnce() -> Result<T, FfiError>) -> Result<T, FfiError> {
    panic::catch_unwind(AssertUnwindSafe(op))
        .unwrap_or_else(|payload| Err(FfiError::Panic(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown".to_string()
    }
}

/// Borrow a caller buffer.
///
/// # Safety
/// When non-null, `buf` must point to at least `len` readable bytes that
/// stay valid for `'a`.
pub(crate) unsafe fn buffer_arg<'a>(buf: *const u8, len: c_int) -> Result<&'a [u8], FfiError> {
    if buf.is_null() {
        return Err(FfiError::Null("buffer"));
    }
    if len <= 0 {
        return Err(FfiError::InvalidLength(len));
    }
    Ok(unsafe { std::slice::from_raw_parts(buf, len as usize) })
}

/// Read a NUL-terminated UTF-8 path argument.
///
/// # Safety
/// When non-null, `s` must point to a NUL-terminated string.
pub(crate) unsafe fn path_arg(s: *const c_char, name: &'static str) -> Result<PathBuf, FfiError> {
    if s.is_null() {
        return Err(FfiError::Null(name));
    }
    let text = unsafe { CStr::from_ptr(s) }
        .to_str()
        .map_err(|_| FfiError::NotUtf8(name))?;
    if text.is_empty() {
        return Err(FfiError::Empty(name));
    }
    Ok(PathBuf::from(text))
}

/// Hand a string to the caller. Interior NULs are replaced with spaces.
pub(crate) fn into_c_string(s: impl Into<String>) -> *mut c_char {
    let s = s.into().replace('\0', " ");
    CString::new(s).unwrap_or_default().into_raw()
}

/// Store `value` through `out` when `out` is non-null.
///
/// # Safety
/// When non-null, `out` must be valid for a pointer write.
pub(crate) unsafe fn store_string(out: *mut *mut c_char, value: impl Into<String>) {
    if !out.is_null() {
        unsafe { *out = into_c_string(value) };
    }
}

/// Clear `out` when non-null so callers never see a stale pointer.
///
/// # Safety
/// When non-null, `out` must be valid for a pointer write.
pub(crate) unsafe fn clear_out(out: *mut *mut c_char) {
    if !out.is_null() {
        unsafe { *out = ptr::null_mut() };
    }
}

/// Release a string previously returned by this library.
///
/// Null is a no-op.
///
/// # Safety
/// `s` must be null or a pointer returned by this library that has not been
/// released yet. Any other pointer, or a second release, is undefined
/// behaviour.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rawjpeg_release_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}
