//! Camera raw preview extraction.
//!
//! TIFF-based raw files (Canon CR2, Nikon NEF, Sony ARW, ...) carry a
//! camera-rendered JPEG preview next to the sensor data. This module finds
//! that preview, reads the capture orientation and date, and re-encodes the
//! preview to `<dest_dir>/<file name>_extracted.jpg` through
//! [`crate::transcode`].
//!
//! Parsers are looked up by upper-case file extension in a [`RawParsers`]
//! registry.
//!
//! # Examples
//!
//! ```ignore
//! use rawjpeg_core::raw::{RawFileInfo, RawParsers};
//!
//! let parsers = RawParsers::with_defaults();
//! let info = RawFileInfo::new("IMG_0001.CR2", "/tmp/out", 85);
//! let raw = parsers.process(&info)?;
//! println!("wrote {}", raw.jpeg_path.display());
//! ```

mod arw;
mod cr2;
mod metadata;
mod nef;
mod preview;
mod tiff;

#[cfg(test)]
pub(crate) mod fixtures;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{DecodeError, Orientation};
use crate::transcode::{transcode, Quality, TranscodeError};

pub use arw::{TiffPreviewParser, ARW_PARSER_KEY};
pub use cr2::{Cr2Parser, Cr2Version, CR2_PARSER_KEY};
pub use nef::{NefParser, NEF_PARSER_KEY};
pub use preview::PreviewLocation;
pub use tiff::is_raw_file;

/// Suffix appended to the raw file name to form the output JPEG name.
pub const EXTRACTED_SUFFIX: &str = "_extracted.jpg";

/// Errors from processing a raw file.
#[derive(Debug, Error)]
pub enum RawError {
    /// The raw file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No parser is registered for this file type.
    #[error("Unsupported raw file type: {0}")]
    Unsupported(String),

    /// The raw container or its preview is malformed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The preview could not be re-encoded or written.
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

/// What to process and where to put the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFileInfo {
    /// Raw file to read.
    pub file: PathBuf,
    /// Directory receiving the extracted JPEG.
    pub dest_dir: PathBuf,
    /// Re-encode quality for the preview.
    #[serde(default)]
    pub quality: Quality,
}

impl RawFileInfo {
    pub fn new(file: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>, quality: impl Into<Quality>) -> Self {
        Self {
            file: file.into(),
            dest_dir: dest_dir.into(),
            quality: quality.into(),
        }
    }
}

/// Result of processing one raw file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFile {
    /// The raw file that was processed.
    pub file_name: PathBuf,
    /// The JPEG written from its preview.
    pub jpeg_path: PathBuf,
    /// Capture time (ISO 8601, camera local time), if recorded.
    pub create_date: Option<String>,
    /// Orientation the preview should be displayed with.
    pub orientation: Orientation,
}

/// A camera-specific raw parser.
pub trait RawParser: Send + Sync {
    /// Upper-case file extension this parser handles, e.g. `"CR2"`.
    fn key(&self) -> &'static str;

    /// Find the embedded JPEG preview in a complete raw file.
    fn locate_preview(&self, bytes: &[u8]) -> Result<PreviewLocation, DecodeError>;

    /// Extract the preview of `info.file`, re-encode it into
    /// `info.dest_dir`, and report what was found.
    fn process_file(&self, info: &RawFileInfo) -> Result<RawFile, RawError> {
        let bytes = fs::read(&info.file).map_err(|source| RawError::Io {
            path: info.file.clone(),
            source,
        })?;

        let location = self.locate_preview(&bytes)?;
        let preview = location.slice(&bytes)?;
        debug!(
            "{}: preview at {} ({} bytes)",
            info.file.display(),
            location.offset,
            location.length
        );

        let meta = metadata::read_metadata(&bytes);
        let jpeg_path = extracted_jpeg_path(&info.file, &info.dest_dir)?;

        info!("creating {}", jpeg_path.display());
        transcode(preview, info.quality, &jpeg_path)?;
        info!("processed {}", info.file.display());

        Ok(RawFile {
            file_name: info.file.clone(),
            jpeg_path,
            create_date: meta.create_date,
            orientation: meta.orientation,
        })
    }
}

/// Output location for the preview of `raw_file`: the raw file's name,
/// extension included, plus [`EXTRACTED_SUFFIX`], inside `dest_dir`.
pub fn extracted_jpeg_path(raw_file: &Path, dest_dir: &Path) -> Result<PathBuf, RawError> {
    let name = raw_file
        .file_name()
        .ok_or_else(|| RawError::Unsupported(raw_file.display().to_string()))?;
    let mut out = name.to_os_string();
    out.push(EXTRACTED_SUFFIX);
    Ok(dest_dir.join(out))
}

/// Registered raw parsers keyed by upper-case file extension.
#[derive(Default)]
pub struct RawParsers {
    parsers: HashMap<String, Box<dyn RawParser>>,
}

impl RawParsers {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the CR2, NEF and ARW parsers.
    pub fn with_defaults() -> Self {
        let mut parsers = Self::new();
        parsers.register(Box::new(Cr2Parser::new()));
        parsers.register(Box::new(NefParser::new()));
        parsers.register(Box::new(TiffPreviewParser::default()));
        parsers
    }

    /// Add a parser under its key, returning any parser it replaces.
    pub fn register(&mut self, parser: Box<dyn RawParser>) -> Option<Box<dyn RawParser>> {
        self.parsers.insert(parser.key().to_ascii_uppercase(), parser)
    }

    /// Parser for `key`, compared case-insensitively.
    pub fn get(&self, key: &str) -> Option<&dyn RawParser> {
        self.parsers.get(&key.to_ascii_uppercase()).map(|p| p.as_ref())
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn RawParser>> {
        self.parsers.remove(&key.to_ascii_uppercase())
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Parser for a path, chosen by its extension.
    pub fn for_path(&self, path: &Path) -> Option<&dyn RawParser> {
        self.get(path.extension()?.to_str()?)
    }

    /// Process `info.file` with the parser registered for its extension.
    pub fn process(&self, info: &RawFileInfo) -> Result<RawFile, RawError> {
        let parser = self.for_path(&info.file).ok_or_else(|| {
            RawError::Unsupported(
                info.file
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_else(|| info.file.display().to_string()),
            )
        })?;
        parser
            .process_file(info)
            .inspect_err(|e| warn!("{}: {}", info.file.display(), e))
    }
}
