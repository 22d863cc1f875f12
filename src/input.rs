// this_file: src/input.rs

//! Request files: a JSON description of a headline job that the CLI can load
//! instead of (or underneath) its flags.
//!
//! ```json
//! {
//!   "text": "号外",
//!   "fonts": ["/fonts/a.ttf", "/fonts/b.otf"],
//!   "style": {"bold": true, "underline": true},
//!   "format": "pdf",
//!   "ink": "#202020",
//!   "seed": 7
//! }
//! ```

use anyhow::{bail, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use midashi_core::{Color, ExportKind, FontPool, Palette, RenderRequest, StyleFlags};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Request files larger than this are refused before parsing.
pub const MAX_REQUEST_BYTES: u64 = 64 * 1024;

/// Everything a request file (or the command line) may set. All fields optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RequestFile {
    pub text: Option<String>,
    pub fonts: Vec<Utf8PathBuf>,
    pub style: StyleFlags,
    pub format: Option<ExportKind>,
    pub ink: Option<String>,
    pub shadow_ink: Option<String>,
    pub seed: Option<u64>,
}

/// Fully resolved settings for one CLI run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub text: String,
    pub fonts: Vec<PathBuf>,
    pub style: StyleFlags,
    pub kind: ExportKind,
    pub palette: Palette,
    pub seed: Option<u64>,
}

impl RequestFile {
    /// Parse a request from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            bail!("Request file is empty");
        }
        let request = serde_json::from_str(json).context("Invalid request JSON")?;
        Ok(request)
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Scalar values from `overrides` win when present. Fonts are appended
    /// after the file's fonts and style flags are combined, since a flag can
    /// only switch a style on.
    pub fn overlay(self, overrides: RequestFile) -> RequestFile {
        let mut fonts = self.fonts;
        fonts.extend(overrides.fonts);
        RequestFile {
            text: overrides.text.or(self.text),
            fonts,
            style: StyleFlags {
                bold: self.style.bold || overrides.style.bold,
                italic: self.style.italic || overrides.style.italic,
                underline: self.style.underline || overrides.style.underline,
                strikethrough: self.style.strikethrough || overrides.style.strikethrough,
            },
            format: overrides.format.or(self.format),
            ink: overrides.ink.or(self.ink),
            shadow_ink: overrides.shadow_ink.or(self.shadow_ink),
            seed: overrides.seed.or(self.seed),
        }
    }

    /// Resolve colours and defaults.
    pub fn into_settings(self) -> Result<Settings> {
        let mut palette = Palette::default();
        if let Some(ink) = &self.ink {
            palette.primary = ink
                .parse::<Color>()
                .with_context(|| format!("Invalid ink colour '{ink}'"))?;
        }
        if let Some(shadow) = &self.shadow_ink {
            palette.secondary = shadow
                .parse::<Color>()
                .with_context(|| format!("Invalid shadow ink colour '{shadow}'"))?;
        }

        Ok(Settings {
            text: self.text.unwrap_or_default(),
            fonts: self.fonts.into_iter().map(Utf8PathBuf::into_std_path_buf).collect(),
            style: self.style,
            kind: self.format.unwrap_or_default(),
            palette,
            seed: self.seed,
        })
    }
}

impl Settings {
    /// The render request these settings describe. Fonts past pool capacity are dropped.
    pub fn render_request(&self) -> RenderRequest {
        RenderRequest::new(
            self.text.clone(),
            FontPool::from_paths(self.fonts.iter()),
            self.style,
        )
        .with_palette(self.palette)
    }
}

/// Read and parse a request file from disk.
pub fn load_request_file(path: &Utf8Path) -> Result<RequestFile> {
    let size = std::fs::metadata(path.as_std_path())
        .with_context(|| format!("Cannot read request file {path}"))?
        .len();
    if size > MAX_REQUEST_BYTES {
        bail!(
            "Request file {} is too large ({} bytes, max {})",
            path,
            size,
            MAX_REQUEST_BYTES
        );
    }

    let json = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("Cannot read request file {path}"))?;
    RequestFile::from_json(&json).with_context(|| format!("In request file {path}"))
}
