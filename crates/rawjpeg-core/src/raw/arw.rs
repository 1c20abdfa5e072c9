//! Sony ARW and other TIFF-based raw files without a dedicated parser.
//!
//! ARW stores a full-size preview in a SubIFD and a small thumbnail in
//! IFD1; the generic search in [`super::preview`] prefers the former.

use super::preview::{find_preview, PreviewLocation};
use super::RawParser;
use crate::decode::DecodeError;

/// Registry key for Sony ARW files.
pub const ARW_PARSER_KEY: &str = "ARW";

/// Heuristic preview finder for TIFF-based raw files.
#[derive(Debug, Clone)]
pub struct TiffPreviewParser {
    key: &'static str,
}

impl TiffPreviewParser {
    /// A parser registered under `key` (an upper-case file extension).
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl Default for TiffPreviewParser {
    fn default() -> Self {
        Self::new(ARW_PARSER_KEY)
    }
}

impl RawParser for TiffPreviewParser {
    fn key(&self) -> &'static str {
        self.key
    }

    fn locate_preview(&self, bytes: &[u8]) -> Result<PreviewLocation, DecodeError> {
        find_preview(bytes)
    }
}
