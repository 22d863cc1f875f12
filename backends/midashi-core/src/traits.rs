// this_file: backends/midashi-core/src/traits.rs

//! Seams between the compositor and its collaborators.

use crate::surface::Canvas;
use crate::types::{Color, ExportKind, GlyphMetrics};
use crate::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads font files into drawable faces.
pub trait FontRasterizer {
    type Face: GlyphFace;

    /// Load `path` at `size` pixels per em.
    ///
    /// Any read or parse failure must surface as [`crate::MidashiError::FontLoad`].
    fn load(&self, path: &Path, size: f32) -> Result<Self::Face>;

    /// Rasterizer name for diagnostics
    fn name(&self) -> &str;
}

/// One loaded font at a fixed size.
pub trait GlyphFace {
    /// Tight ink box of `ch`, its top given relative to the line box drawn by
    /// [`GlyphFace::draw`]. Characters without ink measure `0×0`.
    fn measure(&self, ch: char) -> GlyphMetrics;

    /// Draw `ch` with the top of its line box at `(x, y)`.
    fn draw(&self, canvas: &mut Canvas, ch: char, x: f32, y: f32, color: Color);
}

impl<T: GlyphFace + ?Sized> GlyphFace for Arc<T> {
    fn measure(&self, ch: char) -> GlyphMetrics {
        (**self).measure(ch)
    }

    fn draw(&self, canvas: &mut Canvas, ch: char, x: f32, y: f32, color: Color) {
        (**self).draw(canvas, ch, x, y, color)
    }
}

/// Destination for a batch: a folder plus the file name the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchTarget {
    pub folder: PathBuf,
    /// Only the stem is used; directory and extension are dropped
    pub name: PathBuf,
}

/// File pickers. `None` means the user cancelled.
pub trait SaveDialog {
    /// Font files to append to the pool (may be empty).
    fn pick_fonts(&mut self) -> Vec<PathBuf>;

    /// Path for a single export.
    fn pick_save_path(&mut self, kind: ExportKind) -> Option<PathBuf>;

    /// Folder and base name for a batch export.
    fn pick_batch_target(&mut self, kind: ExportKind) -> Option<BatchTarget>;
}
