// this_file: crates/midashi-render/src/testing.rs

//! Deterministic rasterizer for unit tests: every glyph is a solid box.

use midashi_core::{Canvas, Color, FontRasterizer, GlyphFace, GlyphMetrics, MidashiError, Result};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tiny_skia::{PathBuilder, Rect, Transform};

pub const GOOD_FONT: &str = "good.ttf";
pub const BAD_FONT: &str = "bad.ttf";

/// Box height shared by every visible glyph
pub const BOX_HEIGHT: u32 = 30;
/// Gap between the line top and the top of each box
pub const BOX_TOP: i32 = 8;

/// Loads anything except [`BAD_FONT`] and records every load attempt.
pub struct BoxRasterizer {
    visible: bool,
    loads: RefCell<Vec<PathBuf>>,
}

impl BoxRasterizer {
    pub fn new() -> Self {
        Self {
            visible: true,
            loads: RefCell::new(Vec::new()),
        }
    }

    /// Glyphs measure normally but draw nothing, leaving only decorations.
    pub fn invisible() -> Self {
        Self {
            visible: false,
            ..Self::new()
        }
    }

    pub fn loads(&self) -> Vec<PathBuf> {
        self.loads.borrow().clone()
    }
}

impl FontRasterizer for BoxRasterizer {
    type Face = BoxFace;

    fn load(&self, path: &Path, _size: f32) -> Result<BoxFace> {
        self.loads.borrow_mut().push(path.to_path_buf());
        if path == Path::new(BAD_FONT) {
            return Err(MidashiError::font_load(path, "not a font"));
        }
        Ok(BoxFace {
            visible: self.visible,
        })
    }

    fn name(&self) -> &str {
        "box"
    }
}

pub struct BoxFace {
    visible: bool,
}

impl GlyphFace for BoxFace {
    fn measure(&self, ch: char) -> GlyphMetrics {
        if ch.is_whitespace() {
            return GlyphMetrics::default();
        }
        GlyphMetrics::new(10 + ch as u32 % 17, BOX_HEIGHT, BOX_TOP)
    }

    fn draw(&self, canvas: &mut Canvas, ch: char, x: f32, y: f32, color: Color) {
        let metrics = self.measure(ch);
        if !self.visible || metrics.width == 0 {
            return;
        }
        let Some(rect) = Rect::from_xywh(0.0, 0.0, metrics.width as f32, metrics.height as f32)
        else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        canvas.fill_path(&path, Transform::from_translate(x, y + BOX_TOP as f32), color);
    }
}
