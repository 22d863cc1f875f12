// this_file: backends/midashi-core/src/error.rs

//! Error types for midashi.
//!
//! The first three variants are the user-facing failures of a generation
//! request; the rest cover writing the result to disk.

use crate::types::{MAX_TEXT_LEN, MIN_TEXT_LEN};
use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for midashi operations.
#[derive(Error, Debug)]
pub enum MidashiError {
    /// Text is empty or longer than the canvas allows
    #[error("Text must be {} to {} characters long, got {len}", MIN_TEXT_LEN, MAX_TEXT_LEN)]
    InvalidLength { len: usize },

    /// The font pool is empty
    #[error("No font selected: add at least one font file")]
    NoFontSelected,

    /// A font chosen for a glyph could not be read or parsed
    #[error("Failed to load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },

    /// Filesystem failure while saving output
    #[error("Failed to write {path}: {source}")]
    ExportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Raster encoder failure
    #[error("Image encoding error: {0}")]
    ImageEncode(#[from] image::ImageError),

    /// Drawing surface could not be allocated
    #[error("Canvas error: {0}")]
    Canvas(String),

    /// Malformed colour, format name or request value
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl MidashiError {
    pub fn font_load(path: impl Into<PathBuf>, reason: impl Display) -> Self {
        Self::FontLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn export_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ExportIo {
            path: path.into(),
            source,
        }
    }

    pub fn canvas(message: impl Into<String>) -> Self {
        Self::Canvas(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// True for the failures that block a request before anything is drawn.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::InvalidLength { .. } | Self::NoFontSelected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_length_message_names_bounds() {
        let msg = MidashiError::InvalidLength { len: 21 }.to_string();
        assert!(msg.contains("1 to 20"));
        assert!(msg.contains("21"));
    }

    #[test]
    fn test_font_load_names_path() {
        let err = MidashiError::font_load("/fonts/broken.ttf", "malformed font");
        let msg = err.to_string();
        assert!(msg.contains("/fonts/broken.ttf"));
        assert!(msg.contains("malformed font"));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_preconditions() {
        assert!(MidashiError::NoFontSelected.is_precondition());
        assert!(MidashiError::InvalidLength { len: 0 }.is_precondition());
    }
}
