// this_file: backends/midashi-core/src/lib.rs

//! Core traits and types for the midashi headline renderer.

pub mod diagnostics;
pub mod error;
pub mod surface;
pub mod traits;
pub mod types;
pub mod utils;

pub use diagnostics::RenderDiagnostics;
pub use error::MidashiError;
pub use surface::{Canvas, RenderedImage};
pub use traits::{BatchTarget, FontRasterizer, GlyphFace, SaveDialog};
pub use types::{
    Color, ExportKind, FontPool, GlyphMetrics, GlyphPlacement, Palette, RenderRequest,
    StyleFlags,
};

/// Result type for midashi operations
pub type Result<T> = std::result::Result<T, MidashiError>;
