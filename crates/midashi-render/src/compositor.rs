// this_file: crates/midashi-render/src/compositor.rs

//! Per-character glyph compositing.
//!
//! Every character gets its own randomly chosen font, is measured, and is
//! drawn with faux styles at an advancing cursor on a fixed-size canvas.
//! Layout is a single line, left to right, with no kerning.

use midashi_core::diagnostics::log_placement;
use midashi_core::types::{CANVAS_HEIGHT, CANVAS_WIDTH, FONT_SIZE};
use midashi_core::{
    Canvas, FontRasterizer, GlyphFace, GlyphPlacement, MidashiError, Palette, RenderDiagnostics,
    RenderRequest, RenderedImage, Result, StyleFlags,
};
use rand::Rng;

/// Cursor x of the first glyph
pub const LEFT_MARGIN: i32 = 10;
/// Cursor y (top of the line box), fixed for the whole line
pub const TOP_OFFSET: i32 = 60;
/// Space added after each glyph's ink width
pub const ADVANCE_GAP: i32 = 5;
/// Underline/strikethrough thickness
pub const STROKE_WIDTH: u32 = 2;
/// Extra draws for faux bold
pub const BOLD_OFFSETS: [(i32, i32); 3] = [(1, 0), (0, 1), (1, 1)];
/// Offset of the faux italic shadow draw
pub const ITALIC_OFFSET: (i32, i32) = (2, -2);

/// Renders request text onto a fresh canvas through a font rasterizer.
pub struct Compositor<R> {
    rasterizer: R,
}

impl<R: FontRasterizer> Compositor<R> {
    pub fn new(rasterizer: R) -> Self {
        Self { rasterizer }
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Render `request` with fonts picked from `rng`.
    ///
    /// A font that fails to load aborts the whole render; no partial image is
    /// returned.
    pub fn render<G: Rng + ?Sized>(
        &self,
        request: &RenderRequest,
        rng: &mut G,
    ) -> Result<RenderedImage> {
        request.validate()?;
        RenderDiagnostics::new(self.rasterizer.name(), request).log();

        let mut canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT)?;
        let mut placements = Vec::with_capacity(request.text.len());
        let mut x = LEFT_MARGIN;
        let y = TOP_OFFSET;

        for ch in request.text.chars() {
            let font = request
                .fonts
                .choose(rng)
                .ok_or(MidashiError::NoFontSelected)?;
            let face = self.rasterizer.load(font, FONT_SIZE)?;
            let metrics = face.measure(ch);

            let placement = GlyphPlacement {
                ch,
                font: font.to_path_buf(),
                x,
                y,
                metrics,
            };
            compose_glyph(
                &mut canvas,
                &face,
                &placement,
                request.style,
                request.palette,
            );
            log_placement(&placement);
            placements.push(placement);

            x += metrics.width as i32 + ADVANCE_GAP;
        }

        Ok(canvas.into_image(placements))
    }
}

/// Draw one glyph and its decorations. Order matters: the base draw lands on
/// top of the bold and italic redraws, and lines go on last.
fn compose_glyph<F: GlyphFace>(
    canvas: &mut Canvas,
    face: &F,
    placement: &GlyphPlacement,
    style: StyleFlags,
    palette: Palette,
) {
    let GlyphPlacement { ch, x, y, metrics, .. } = *placement;
    let draw_at = |canvas: &mut Canvas, dx: i32, dy: i32, color| {
        face.draw(canvas, ch, (x + dx) as f32, (y + dy) as f32, color)
    };

    if style.bold {
        for (dx, dy) in BOLD_OFFSETS {
            draw_at(canvas, dx, dy, palette.primary);
        }
    }

    if style.italic {
        let (dx, dy) = ITALIC_OFFSET;
        draw_at(canvas, dx, dy, palette.secondary);
    }

    draw_at(canvas, 0, 0, palette.primary);

    if style.underline {
        canvas.hline(
            x,
            placement.underline_y(),
            metrics.width,
            STROKE_WIDTH,
            palette.primary,
        );
    }

    if style.strikethrough {
        canvas.hline(
            x,
            placement.strikethrough_y(),
            metrics.width,
            STROKE_WIDTH,
            palette.primary,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BoxRasterizer, BAD_FONT, BOX_TOP, GOOD_FONT};
    use midashi_core::types::UNDERLINE_GAP;
    use midashi_core::{Color, FontPool, GlyphMetrics};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    fn request(text: &str, fonts: &[&str], style: StyleFlags) -> RenderRequest {
        RenderRequest::new(text, FontPool::from_paths(fonts.iter().copied()), style)
    }

    #[test]
    fn test_canvas_size_is_fixed() {
        let compositor = Compositor::new(BoxRasterizer::new());
        let mut rng = StdRng::seed_from_u64(7);
        for text in ["A", "Hello", "a b c", &"W".repeat(20)] {
            let image = compositor
                .render(&request(text, &[GOOD_FONT], StyleFlags::all()), &mut rng)
                .unwrap();
            assert_eq!((image.width(), image.height()), (1000, 200), "{text:?}");
            assert_eq!(image.placements().len(), text.chars().count());
        }
    }

    #[test]
    fn test_cursor_advances_by_width_plus_gap() {
        let compositor = Compositor::new(BoxRasterizer::new());
        let mut rng = StdRng::seed_from_u64(1);
        let image = compositor
            .render(&request("Hi there", &[GOOD_FONT], StyleFlags::default()), &mut rng)
            .unwrap();

        let placements = image.placements();
        assert_eq!(placements[0].x, LEFT_MARGIN);
        for pair in placements.windows(2) {
            let expected = pair[0].x + pair[0].metrics.width as i32 + ADVANCE_GAP;
            assert_eq!(pair[1].x, expected);
            assert!(pair[1].x > pair[0].x);
        }
        assert!(placements.iter().all(|p| p.y == TOP_OFFSET));
    }

    #[test]
    fn test_whitespace_still_advances() {
        let compositor = Compositor::new(BoxRasterizer::new());
        let mut rng = StdRng::seed_from_u64(3);
        let style = StyleFlags {
            underline: true,
            strikethrough: true,
            ..Default::default()
        };
        let image = compositor
            .render(&request("a b", &[GOOD_FONT], style), &mut rng)
            .unwrap();

        let space = &image.placements()[1];
        assert_eq!(space.metrics, GlyphMetrics::default());
        assert_eq!(image.placements()[2].x, space.x + ADVANCE_GAP);
        // zero-length decorations leave nothing behind
        let row = space.underline_y() as u32;
        assert_eq!(image.pixel(space.x as u32, row), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_underline_spans_glyph_width() {
        let compositor = Compositor::new(BoxRasterizer::new());
        let mut rng = StdRng::seed_from_u64(11);
        let style = StyleFlags {
            underline: true,
            ..Default::default()
        };
        let image = compositor
            .render(&request("Ab", &[GOOD_FONT], style), &mut rng)
            .unwrap();

        for placement in image.placements() {
            let row = placement.underline_y() as u32;
            let left = placement.x as u32;
            let right = left + placement.metrics.width;
            for col in left..=right {
                assert_eq!(image.pixel(col, row), Some(Color::BLACK), "col {col}");
            }
            assert_eq!(image.pixel(right + 1, row), Some(Color::TRANSPARENT));
            assert_eq!(image.pixel(left, row + 1), Some(Color::TRANSPARENT));
        }
    }

    #[test]
    fn test_decorations_follow_ink_box() {
        let compositor = Compositor::new(BoxRasterizer::new());
        let plain = compositor
            .render(
                &request("H", &[GOOD_FONT], StyleFlags::default()),
                &mut StdRng::seed_from_u64(4),
            )
            .unwrap();
        let (_, ink_y, _, ink_h) = plain.ink_bbox().unwrap();
        let placement = &plain.placements()[0];
        assert_eq!(placement.ink_top(), ink_y as i32);

        let ink_bottom = (ink_y + ink_h) as i32;
        assert_eq!(placement.underline_y(), ink_bottom + UNDERLINE_GAP);
        assert_eq!(
            placement.strikethrough_y(),
            ink_y as i32 + ink_h as i32 / 2
        );

        let underlined = compositor
            .render(
                &request(
                    "H",
                    &[GOOD_FONT],
                    StyleFlags {
                        underline: true,
                        ..Default::default()
                    },
                ),
                &mut StdRng::seed_from_u64(4),
            )
            .unwrap();
        let col = placement.x as u32 + 2;
        for row in ink_bottom as u32..placement.underline_y() as u32 - 1 {
            assert_eq!(underlined.pixel(col, row), Some(Color::TRANSPARENT), "row {row}");
        }
    }

    #[test]
    fn test_strikethrough_at_vertical_midpoint() {
        let compositor = Compositor::new(BoxRasterizer::invisible());
        let mut rng = StdRng::seed_from_u64(5);
        let style = StyleFlags {
            strikethrough: true,
            ..Default::default()
        };
        let image = compositor
            .render(&request("H", &[GOOD_FONT], style), &mut rng)
            .unwrap();

        let placement = &image.placements()[0];
        let row = placement.strikethrough_y() as u32;
        assert_eq!(
            row as i32,
            TOP_OFFSET + BOX_TOP + placement.metrics.height as i32 / 2
        );
        let (x, y, w, h) = image.ink_bbox().unwrap();
        assert_eq!((x, y + 1, w, h), (placement.x as u32, row, placement.metrics.width + 1, 2));
    }

    #[test]
    fn test_no_decorations_without_flags() {
        let compositor = Compositor::new(BoxRasterizer::invisible());
        let mut rng = StdRng::seed_from_u64(5);
        let image = compositor
            .render(&request("Hello", &[GOOD_FONT], StyleFlags::default()), &mut rng)
            .unwrap();
        assert_eq!(image.ink_bbox(), None);
    }

    #[test]
    fn test_bold_thickens_by_one_pixel() {
        let compositor = Compositor::new(BoxRasterizer::new());
        let mut rng = StdRng::seed_from_u64(2);
        let plain = compositor
            .render(&request("H", &[GOOD_FONT], StyleFlags::default()), &mut rng)
            .unwrap();
        let bold_style = StyleFlags {
            bold: true,
            ..Default::default()
        };
        let bold = compositor
            .render(&request("H", &[GOOD_FONT], bold_style), &mut rng)
            .unwrap();

        let (_, _, pw, ph) = plain.ink_bbox().unwrap();
        let (_, _, bw, bh) = bold.ink_bbox().unwrap();
        assert_eq!((bw, bh), (pw + 1, ph + 1));
    }

    #[test]
    fn test_italic_shadow_is_secondary_ink() {
        let compositor = Compositor::new(BoxRasterizer::new());
        let mut rng = StdRng::seed_from_u64(2);
        let style = StyleFlags {
            italic: true,
            ..Default::default()
        };
        let image = compositor
            .render(&request("H", &[GOOD_FONT], style), &mut rng)
            .unwrap();

        let placement = &image.placements()[0];
        let right = (placement.x + placement.metrics.width as i32) as u32;
        let top = placement.ink_top() as u32;
        // only the shadow reaches past the base box to the upper right
        assert_eq!(image.pixel(right + 1, top - 2), Some(Color::GRAY));
        // the base draw sits on top of the shadow
        assert_eq!(image.pixel(placement.x as u32 + 3, top + 3), Some(Color::BLACK));
    }

    #[test]
    fn test_font_choice_follows_seeded_rng() {
        let fonts = ["a.ttf", "b.ttf", "c.ttf", "d.ttf"];
        let compositor = Compositor::new(BoxRasterizer::new());
        let text = "newspaper";

        let mut rng = StdRng::seed_from_u64(99);
        let image = compositor
            .render(&request(text, &fonts, StyleFlags::default()), &mut rng)
            .unwrap();

        let pool = FontPool::from_paths(fonts);
        let mut replay = StdRng::seed_from_u64(99);
        let expected: Vec<PathBuf> = text
            .chars()
            .map(|_| pool.choose(&mut replay).unwrap().to_path_buf())
            .collect();
        let used: Vec<PathBuf> = image.placements().iter().map(|p| p.font.clone()).collect();
        assert_eq!(used, expected);
        assert_eq!(compositor.rasterizer().loads(), expected);
    }

    #[test]
    fn test_font_load_failure_aborts_render() {
        let text = "Hello";
        for seed in 0..32 {
            let compositor = Compositor::new(BoxRasterizer::new());
            let mut rng = StdRng::seed_from_u64(seed);
            let result =
                compositor.render(&request(text, &[GOOD_FONT, BAD_FONT], StyleFlags::default()), &mut rng);

            let pool = FontPool::from_paths([GOOD_FONT, BAD_FONT]);
            let mut replay = StdRng::seed_from_u64(seed);
            let picks: Vec<PathBuf> = text
                .chars()
                .map(|_| pool.choose(&mut replay).unwrap().to_path_buf())
                .collect();

            match picks.iter().position(|p| p == &PathBuf::from(BAD_FONT)) {
                Some(first_bad) => {
                    match result {
                        Err(MidashiError::FontLoad { path, .. }) => {
                            assert_eq!(path, PathBuf::from(BAD_FONT))
                        }
                        Err(other) => panic!("seed {seed}: unexpected error {other}"),
                        Ok(_) => panic!("seed {seed}: render should have failed"),
                    }
                    // nothing past the failing draw was attempted
                    assert_eq!(compositor.rasterizer().loads().len(), first_bad + 1);
                }
                None => assert!(result.is_ok(), "seed {seed}"),
            }
        }
    }

    #[test]
    fn test_length_boundaries() {
        let compositor = Compositor::new(BoxRasterizer::new());
        let mut rng = StdRng::seed_from_u64(0);
        for bad in [String::new(), "x".repeat(21)] {
            let result =
                compositor.render(&request(&bad, &[GOOD_FONT], StyleFlags::default()), &mut rng);
            assert!(matches!(result, Err(MidashiError::InvalidLength { .. })));
        }
        assert!(compositor.rasterizer().loads().is_empty());

        for good in ["x".to_string(), "x".repeat(20)] {
            assert!(compositor
                .render(&request(&good, &[GOOD_FONT], StyleFlags::default()), &mut rng)
                .is_ok());
        }
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        let compositor = Compositor::new(BoxRasterizer::new());
        let mut rng = StdRng::seed_from_u64(0);
        let result = compositor.render(&request("Hello", &[], StyleFlags::default()), &mut rng);
        assert!(matches!(result, Err(MidashiError::NoFontSelected)));
    }
}
