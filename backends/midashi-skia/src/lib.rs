// this_file: backends/midashi-skia/src/lib.rs

//! Font rasterizer backed by ttf-parser outlines filled with tiny-skia.

use log::debug;
use lru::LruCache;
use midashi_core::types::MAX_FONTS;
use midashi_core::{Canvas, Color, FontRasterizer, GlyphFace, GlyphMetrics, MidashiError, Result};
use owned_ttf_parser::{AsFaceRef, OwnedFace};
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_skia::{PathBuilder, Transform};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

/// Maximum accepted font file size (50MB)
pub const MAX_FONT_BYTES: u64 = 50 * 1024 * 1024;

/// Loads fonts from disk and keeps the parsed faces of the current pool.
pub struct SkiaRasterizer {
    faces: Mutex<LruCache<PathBuf, Arc<OwnedFace>>>,
}

/// Face cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub capacity: usize,
    pub entries: usize,
}

impl SkiaRasterizer {
    /// Cache sized to hold a full font pool.
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(MAX_FONTS).unwrap_or(NonZeroUsize::MIN);
        Self {
            faces: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let faces = self.faces.lock();
        CacheStats {
            capacity: faces.cap().get(),
            entries: faces.len(),
        }
    }

    fn load_owned_face(&self, path: &Path) -> Result<Arc<OwnedFace>> {
        if let Some(face) = self.faces.lock().get(path) {
            return Ok(face.clone());
        }

        let meta = std::fs::metadata(path).map_err(|e| MidashiError::font_load(path, e))?;
        if meta.len() > MAX_FONT_BYTES {
            return Err(MidashiError::font_load(
                path,
                format!(
                    "file too large: {} bytes (max: {} bytes)",
                    meta.len(),
                    MAX_FONT_BYTES
                ),
            ));
        }

        let data = std::fs::read(path).map_err(|e| MidashiError::font_load(path, e))?;
        let face = OwnedFace::from_vec(data, 0).map_err(|e| MidashiError::font_load(path, e))?;
        let face = Arc::new(face);
        debug!("Loaded font {} ({} bytes)", path.display(), meta.len());

        self.faces.lock().put(path.to_owned(), face.clone());
        Ok(face)
    }
}

impl Default for SkiaRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRasterizer for SkiaRasterizer {
    type Face = SkiaFace;

    fn load(&self, path: &Path, size: f32) -> Result<SkiaFace> {
        let font = self.load_owned_face(path)?;
        let (scale, ascender) = {
            let face = font.as_face_ref();
            let units_per_em = face.units_per_em();
            if units_per_em == 0 {
                return Err(MidashiError::font_load(path, "units per em is zero"));
            }
            let scale = size / units_per_em as f32;
            (scale, (face.ascender() as f32 * scale).round())
        };
        Ok(SkiaFace {
            font,
            scale,
            ascender,
        })
    }

    fn name(&self) -> &str {
        "ttf-parser+tiny-skia"
    }
}

/// A parsed font at one pixel size.
pub struct SkiaFace {
    font: Arc<OwnedFace>,
    scale: f32,
    /// Baseline distance below the top of the line box, in pixels
    ascender: f32,
}

impl SkiaFace {
    fn face(&self) -> &Face<'_> {
        self.font.as_face_ref()
    }

    /// Missing characters fall back to `.notdef`, which most fonts draw as a box.
    fn glyph_id(&self, ch: char) -> GlyphId {
        self.face().glyph_index(ch).unwrap_or(GlyphId(0))
    }

    pub fn ascender(&self) -> f32 {
        self.ascender
    }
}

impl GlyphFace for SkiaFace {
    fn measure(&self, ch: char) -> GlyphMetrics {
        let Some(bbox) = self.face().glyph_bounding_box(self.glyph_id(ch)) else {
            return GlyphMetrics::default();
        };
        let left = (bbox.x_min as f32 * self.scale).floor();
        let right = (bbox.x_max as f32 * self.scale).ceil();
        let bottom = (bbox.y_min as f32 * self.scale).floor();
        let top = (bbox.y_max as f32 * self.scale).ceil();
        GlyphMetrics::new(
            (right - left).max(0.0) as u32,
            (top - bottom).max(0.0) as u32,
            // baseline sits `ascender` below the line top, ink rises `top` above it
            (self.ascender - top) as i32,
        )
    }

    fn draw(&self, canvas: &mut Canvas, ch: char, x: f32, y: f32, color: Color) {
        let mut builder = SkiaOutlineBuilder {
            builder: PathBuilder::new(),
            scale: self.scale,
        };

        if self
            .face()
            .outline_glyph(self.glyph_id(ch), &mut builder)
            .is_none()
        {
            return;
        }
        if let Some(path) = builder.builder.finish() {
            let transform = Transform::from_translate(x, y + self.ascender);
            canvas.fill_path(&path, transform, color);
        }
    }
}

/// Outline builder for converting TrueType outlines to tiny-skia paths
struct SkiaOutlineBuilder {
    builder: PathBuilder,
    scale: f32,
}

impl OutlineBuilder for SkiaOutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x * self.scale, -y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x * self.scale, -y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            x1 * self.scale,
            -y1 * self.scale,
            x * self.scale,
            -y * self.scale,
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            x1 * self.scale,
            -y1 * self.scale,
            x2 * self.scale,
            -y2 * self.scale,
            x * self.scale,
            -y * self.scale,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
