//! Raw preview extraction entry point.

use std::ffi::{c_char, c_int};

use log::warn;
use rawjpeg_core::raw::{RawFileInfo, RawParsers};

use crate::strings::{clear_out, guarded, path_arg, store_string, STATUS_FAILED, STATUS_OK};

/// Extract the embedded JPEG preview of the raw file at `path` and write it
/// to `<dest_dir>/<file name>_extracted.jpg` at `quality`.
///
/// The parser is chosen by file extension (CR2, NEF, ARW). On success the
/// written path is stored in `*jpeg_path_out` when it is non-null; free it
/// with `rawjpeg_release_string`. On failure `*jpeg_path_out` is null.
///
/// # Safety
/// `path` and `dest_dir` must be null or NUL-terminated strings.
/// `jpeg_path_out` must be null or valid for a pointer write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rawjpeg_process_raw(
    path: *const c_char,
    dest_dir: *const c_char,
    quality: c_int,
    jpeg_path_out: *mut *mut c_char,
) -> c_int {
    unsafe { clear_out(jpeg_path_out) };

    let result = guarded(|| {
        let file = unsafe { path_arg(path, "raw path")? };
        let dest_dir = unsafe { path_arg(dest_dir, "destination directory")? };
        let info = RawFileInfo::new(file, dest_dir, quality);
        Ok(RawParsers::with_defaults().process(&info)?)
    });

    match result {
        Ok(raw) => {
            unsafe { store_string(jpeg_path_out, raw.jpeg_path.to_string_lossy()) };
            STATUS_OK
        }
        Err(e) => {
            warn!("rawjpeg_process_raw: {}", e);
            STATUS_FAILED
        }
    }
}
