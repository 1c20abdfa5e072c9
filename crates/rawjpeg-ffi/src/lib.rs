//! rawjpeg - C bindings for rawjpeg-core.
//!
//! Every exported function returns a status code (0 success, 1 failure) or
//! a string that the caller releases with [`rawjpeg_release_string`]. Calls
//! are independent; the library keeps no state between them and never
//! installs a logger. Panics are caught at the boundary and reported as
//! failures.
//!
//! # Module Structure
//!
//! - `transcode` - JPEG decode and re-encode to a file
//! - `raw` - camera raw preview extraction
//! - `strings` - argument checking and string ownership
//!
//! # Usage
//!
//! ```c
//! char *err = NULL;
//! if (rawjpeg_transcode_detailed(buf, len, 90, "out.jpg", &err) != 0) {
//!     fprintf(stderr, "%s\n", err);
//!     rawjpeg_release_string(err);
//! }
//! ```

use std::ffi::c_char;

mod raw;
mod strings;
mod transcode;

#[cfg(test)]
mod test_util;

pub use raw::rawjpeg_process_raw;
pub use strings::{rawjpeg_release_string, STATUS_FAILED, STATUS_OK};
pub use transcode::{rawjpeg_transcode, rawjpeg_transcode_detailed};

/// Library version as a newly allocated string; release it with
/// [`rawjpeg_release_string`].
#[unsafe(no_mangle)]
pub extern "C" fn rawjpeg_version() -> *mut c_char {
    strings::into_c_string(rawjpeg_core::VERSION)
}
