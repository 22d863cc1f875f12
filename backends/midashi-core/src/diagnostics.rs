// this_file: backends/midashi-core/src/diagnostics.rs

//! Rendering diagnostics helpers used for structured debug logging.

use crate::types::{GlyphPlacement, RenderRequest};
use crate::utils::char_count;
use log::{debug, log_enabled, trace, Level};

/// Lightweight snapshot of the effective render request.
#[derive(Debug)]
pub struct RenderDiagnostics<'a> {
    rasterizer: &'a str,
    glyph_count: usize,
    font_count: usize,
    style: String,
    primary: [u8; 4],
    secondary: [u8; 4],
}

impl<'a> RenderDiagnostics<'a> {
    /// Capture the diagnostic snapshot for the provided rasterizer/request.
    pub fn new(rasterizer: &'a str, request: &'a RenderRequest) -> Self {
        let ink = |c: crate::Color| [c.r, c.g, c.b, c.a];
        Self {
            rasterizer,
            glyph_count: char_count(&request.text),
            font_count: request.fonts.len(),
            style: request.style.label(),
            primary: ink(request.palette.primary),
            secondary: ink(request.palette.secondary),
        }
    }

    /// Emit the snapshot at debug level when logging is enabled.
    pub fn log(&self) {
        if log_enabled!(Level::Debug) {
            debug!(
                target: "midashi::render",
                "rasterizer={rasterizer} glyphs={glyphs} fonts={fonts} style={style} primary={primary:?} secondary={secondary:?}",
                rasterizer = self.rasterizer,
                glyphs = self.glyph_count,
                fonts = self.font_count,
                style = self.style,
                primary = self.primary,
                secondary = self.secondary,
            );
        }
    }
}

/// Trace one placed glyph.
pub fn log_placement(placement: &GlyphPlacement) {
    trace!(
        target: "midashi::render",
        "glyph={ch:?} font={font} x={x} y={y} w={w} h={h} top={top}",
        ch = placement.ch,
        font = placement.font.display(),
        x = placement.x,
        y = placement.y,
        w = placement.metrics.width,
        h = placement.metrics.height,
        top = placement.metrics.top,
    );
}
