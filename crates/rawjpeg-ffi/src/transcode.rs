//! JPEG transcode entry points.
//!
//! ```c
//! int status = rawjpeg_transcode(buf, len, 85, "/tmp/out.jpg");
//! ```

use std::ffi::{c_char, c_int};

use log::warn;
use rawjpeg_core::transcode::transcode;

use crate::strings::{
    buffer_arg, clear_out, guarded, path_arg, store_string, FfiError, STATUS_FAILED, STATUS_OK,
};

/// # Safety
/// See [`rawjpeg_transcode`].
unsafe fn run(buf: *const u8, len: c_int, quality: c_int, path: *const c_char) -> Result<(), FfiError> {
    guarded(|| {
        let bytes = unsafe { buffer_arg(buf, len)? };
        let output = unsafe { path_arg(path, "output path")? };
        transcode(bytes, quality, &output)?;
        Ok(())
    })
}

/// Decode `len` bytes of JPEG at `buf` and write them to `path` re-encoded
/// at `quality` (clamped to 1-100).
///
/// Returns 0 on success and 1 on any failure. No file is created when
/// the call fails.
///
/// # Safety
/// `buf` must be null or point to `len` readable bytes. `path` must be null
/// or a NUL-terminated string. Neither is retained after the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rawjpeg_transcode(
    buf: *const u8,
    len: c_int,
    quality: c_int,
    path: *const c_char,
) -> c_int {
    match unsafe { run(buf, len, quality, path) } {
        Ok(()) => STATUS_OK,
        Err(e) => {
            warn!("rawjpeg_transcode: {}", e);
            STATUS_FAILED
        }
    }
}

/// Like [`rawjpeg_transcode`], and on failure stores a description of the
/// error in `*error_out` when `error_out` is non-null. The message must be
/// freed with `rawjpeg_release_string`. On success `*error_out` is set to
/// null.
///
/// # Safety
/// As for [`rawjpeg_transcode`]; `error_out` must be null or valid for a
/// pointer write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rawjpeg_transcode_detailed(
    buf: *const u8,
    len: c_int,
    quality: c_int,
    path: *const c_char,
    error_out: *mut *mut c_char,
) -> c_int {
    unsafe { clear_out(error_out) };
    match unsafe { run(buf, len, quality, path) } {
        Ok(()) => STATUS_OK,
        Err(e) => {
            warn!("rawjpeg_transcode_detailed: {}", e);
            unsafe { store_string(error_out, e.to_string()) };
            STATUS_FAILED
        }
    }
}
