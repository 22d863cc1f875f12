// this_file: backends/midashi-core/src/surface.rs

//! The drawing surface used during one compositing pass and the immutable
//! image it turns into afterwards.

use crate::types::{Color, GlyphPlacement};
use crate::{MidashiError, Result};
use image::{Rgb, RgbImage, RgbaImage};
use tiny_skia::{FillRule, Paint, Path, Pixmap, Rect, Transform};

/// Transparent RGBA surface that glyph faces and decoration strokes draw on.
#[derive(Debug)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| MidashiError::canvas(format!("cannot allocate {width}x{height}")))?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill an outline (anti-aliased, non-zero winding).
    pub fn fill_path(&mut self, path: &Path, transform: Transform, color: Color) {
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        self.pixmap
            .fill_path(path, &paint, FillRule::Winding, transform, None);
    }

    /// Draw a horizontal segment covering columns `x..=x + length`.
    ///
    /// The stroke is centred on row `y`: a 2px stroke covers rows `y - 1` and `y`.
    /// Zero-length segments draw nothing.
    pub fn hline(&mut self, x: i32, y: i32, length: u32, stroke: u32, color: Color) {
        if length == 0 || stroke == 0 {
            return;
        }
        let top = y - (stroke / 2) as i32;
        let Some(rect) = Rect::from_xywh(
            x as f32,
            top as f32,
            (length + 1) as f32,
            stroke as f32,
        ) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Freeze the canvas together with the placements that produced it.
    pub fn into_image(self, placements: Vec<GlyphPlacement>) -> RenderedImage {
        RenderedImage {
            pixmap: self.pixmap,
            placements,
        }
    }
}

/// Output of one compositing pass. Read-only.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pixmap: Pixmap,
    placements: Vec<GlyphPlacement>,
}

impl RenderedImage {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// One entry per input character, in drawing order.
    pub fn placements(&self) -> &[GlyphPlacement] {
        &self.placements
    }

    /// Straight-alpha colour at `(x, y)`, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let px = self.pixmap.pixel(x, y)?;
        let mut rgba = [px.red(), px.green(), px.blue(), px.alpha()];
        unpremultiply(&mut rgba);
        Some(Color::rgba(rgba[0], rgba[1], rgba[2], rgba[3]))
    }

    /// Straight-alpha RGBA copy for raster encoders.
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        let mut data = self.pixmap.data().to_vec();
        unpremultiply(&mut data);
        RgbaImage::from_raw(self.width(), self.height(), data)
            .ok_or_else(|| MidashiError::canvas("pixel buffer does not match canvas size"))
    }

    /// Opaque RGB copy with the canvas composited over `background`.
    pub fn to_rgb_image(&self, background: Color) -> Result<RgbImage> {
        let rgba = self.to_rgba_image()?;
        let mut rgb = RgbImage::new(self.width(), self.height());
        for (dst, src) in rgb.pixels_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = Rgb([
                blend(r, background.r, a),
                blend(g, background.g, a),
                blend(b, background.b, a),
            ]);
        }
        Ok(rgb)
    }

    /// Bounding box `(x, y, w, h)` of every non-transparent pixel.
    pub fn ink_bbox(&self) -> Option<(u32, u32, u32, u32)> {
        let width = self.width();
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;

        for (idx, px) in self.pixmap.pixels().iter().enumerate() {
            if px.alpha() == 0 {
                continue;
            }
            let x = idx as u32 % width;
            let y = idx as u32 / width;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        if min_x > max_x {
            return None;
        }
        Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    }
}

fn blend(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((src as u32 * a + dst as u32 * (255 - a) + 127) / 255) as u8
}

fn unpremultiply(data: &mut [u8]) {
    for chunk in data.chunks_exact_mut(4) {
        let alpha = chunk[3];
        if alpha == 0 || alpha == 255 {
            continue;
        }
        let alpha_f = alpha as f32 / 255.0;
        for channel in &mut chunk[..3] {
            let unpremultiplied = ((*channel as f32) / alpha_f).round().clamp(0.0, 255.0);
            *channel = unpremultiplied as u8;
        }
    }
}
