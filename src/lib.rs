// this_file: src/lib.rs

//! midashi: headline images where every character is drawn in a font picked at
//! random from a small pool, with faux bold, italic, underline and
//! strikethrough, saved as PNG, JPEG or PDF.
//!
//! The rendering pieces live in the workspace crates:
//! - `midashi-core`: shared types, errors, the canvas and the seams
//! - `midashi-skia`: TrueType/OpenType loading and glyph drawing
//! - `midashi-render`: layout, export and batch runs
//!
//! This crate ties them into a [`Session`] and the `midashi` command line.

pub mod dialog;
pub mod input;
pub mod session;

pub use dialog::ArgsDialog;
pub use input::{load_request_file, RequestFile, Settings};
pub use session::{Notice, NoticeLevel, Session};

pub use midashi_core::{ExportKind, MidashiError, Palette, StyleFlags};
pub use midashi_render::{export, BatchPlan, BatchRenderer, Compositor};
pub use midashi_skia::SkiaRasterizer;
