// this_file: backends/midashi-core/src/types.rs

//! Core types shared by the compositor, the export adapter and the front end.

use crate::{utils, MidashiError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Canvas width in pixels (and PDF page units)
pub const CANVAS_WIDTH: u32 = 1000;
/// Canvas height in pixels (and PDF page units)
pub const CANVAS_HEIGHT: u32 = 200;
/// Point size every glyph is rasterized at
pub const FONT_SIZE: f32 = 48.0;
/// Maximum number of fonts in a pool
pub const MAX_FONTS: usize = 10;
/// Shortest accepted text, in characters
pub const MIN_TEXT_LEN: usize = 1;
/// Longest accepted text, in characters
pub const MAX_TEXT_LEN: usize = 20;
/// Number of outputs produced by one batch action
pub const BATCH_SIZE: usize = 10;
/// Gap between the bottom of a glyph box and its underline
pub const UNDERLINE_GAP: i32 = 5;

/// Ordered, capacity-bounded list of font files.
///
/// Append-only and never deduplicated: adding the same file twice doubles its
/// chance of being picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontPool {
    paths: Vec<PathBuf>,
}

impl FontPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from paths, dropping everything past capacity.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut pool = Self::new();
        pool.extend(paths);
        pool
    }

    /// Append one path. Returns `false` when the pool is already full.
    pub fn push(&mut self, path: impl Into<PathBuf>) -> bool {
        if self.is_full() {
            return false;
        }
        self.paths.push(path.into());
        true
    }

    /// Append paths until the pool is full; returns how many were accepted.
    pub fn extend<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut accepted = 0;
        for path in paths {
            if !self.push(path) {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.paths.len() >= MAX_FONTS
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Pick one path uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Path> {
        self.paths.choose(rng).map(PathBuf::as_path)
    }
}

/// Faux style decorations. All four are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleFlags {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl StyleFlags {
    pub fn all() -> Self {
        Self {
            bold: true,
            italic: true,
            underline: true,
            strikethrough: true,
        }
    }

    /// Short label used in logs, e.g. `bold+underline` or `plain`.
    pub fn label(&self) -> String {
        let names: Vec<&str> = [
            (self.bold, "bold"),
            (self.italic, "italic"),
            (self.underline, "underline"),
            (self.strikethrough, "strikethrough"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();

        if names.is_empty() {
            "plain".to_string()
        } else {
            names.join("+")
        }
    }
}

/// Straight (non-premultiplied) RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = MidashiError;

    fn from_str(s: &str) -> Result<Self> {
        utils::parse_color(s)
    }
}

/// Ink used by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Base glyph, bold redraws and decoration lines
    pub primary: Color,
    /// Italic offset redraw
    pub secondary: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color::BLACK,
            secondary: Color::GRAY,
        }
    }
}

/// Tight ink box of one glyph at [`FONT_SIZE`], in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub width: u32,
    pub height: u32,
    /// First ink row below the top of the line box
    pub top: i32,
}

impl GlyphMetrics {
    pub fn new(width: u32, height: u32, top: i32) -> Self {
        Self { width, height, top }
    }
}

/// Where one character ended up on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphPlacement {
    pub ch: char,
    /// Font the character was drawn with
    pub font: PathBuf,
    /// Cursor x (left edge of the glyph box and decoration lines)
    pub x: i32,
    /// Cursor y (top of the line box)
    pub y: i32,
    pub metrics: GlyphMetrics,
}

impl GlyphPlacement {
    /// First canvas row of the glyph's ink.
    pub fn ink_top(&self) -> i32 {
        self.y + self.metrics.top
    }

    /// Row the underline is drawn on: [`UNDERLINE_GAP`] below the ink bottom.
    pub fn underline_y(&self) -> i32 {
        self.ink_top() + self.metrics.height as i32 + UNDERLINE_GAP
    }

    /// Row the strikethrough is drawn on: halfway down the ink.
    pub fn strikethrough_y(&self) -> i32 {
        self.ink_top() + (self.metrics.height / 2) as i32
    }
}

/// Everything one generation needs, snapshotted when the user presses go.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub text: String,
    pub fonts: FontPool,
    pub style: StyleFlags,
    pub palette: Palette,
}

impl RenderRequest {
    pub fn new(text: impl Into<String>, fonts: FontPool, style: StyleFlags) -> Self {
        Self {
            text: text.into(),
            fonts,
            style,
            palette: Palette::default(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Check length first, then the pool, matching the order users see warnings in.
    pub fn validate(&self) -> Result<()> {
        utils::validate_text(&self.text)?;
        if self.fonts.is_empty() {
            return Err(MidashiError::NoFontSelected);
        }
        Ok(())
    }
}

/// Output file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Pdf,
}

impl ExportKind {
    pub const ALL: [ExportKind; 3] = [ExportKind::Png, ExportKind::Jpeg, ExportKind::Pdf];

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Png => "png",
            ExportKind::Jpeg => "jpeg",
            ExportKind::Pdf => "pdf",
        }
    }
}

impl Default for ExportKind {
    fn default() -> Self {
        ExportKind::Png
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExportKind::Png => "PNG",
            ExportKind::Jpeg => "JPEG",
            ExportKind::Pdf => "PDF",
        };
        f.write_str(label)
    }
}

impl FromStr for ExportKind {
    type Err = MidashiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportKind::Png),
            "jpeg" | "jpg" => Ok(ExportKind::Jpeg),
            "pdf" => Ok(ExportKind::Pdf),
            other => Err(MidashiError::invalid_request(format!(
                "unknown output format '{other}' (expected png, jpeg or pdf)"
            ))),
        }
    }
}
