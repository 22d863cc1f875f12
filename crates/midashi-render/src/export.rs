// this_file: crates/midashi-render/src/export.rs

//! Writing rendered images to disk.

use crate::pdf;
use image::{ImageError, ImageFormat};
use log::debug;
use midashi_core::{Color, ExportKind, MidashiError, RenderedImage, Result};
use std::path::Path;

/// Persist `image` at `destination` in the requested format.
pub fn export(image: &RenderedImage, kind: ExportKind, destination: &Path) -> Result<()> {
    match kind {
        ExportKind::Png => write_png(image, destination)?,
        ExportKind::Jpeg => write_jpeg(image, destination)?,
        ExportKind::Pdf => pdf::write_pdf(image, destination)?,
    }
    debug!("Exported {kind} to {}", destination.display());
    Ok(())
}

/// Lossless RGBA, transparency preserved.
pub fn write_png(image: &RenderedImage, destination: &Path) -> Result<()> {
    image
        .to_rgba_image()?
        .save_with_format(destination, ImageFormat::Png)
        .map_err(|e| map_image_error(destination, e))
}

/// JPEG cannot carry alpha, so the canvas is flattened over white first.
pub fn write_jpeg(image: &RenderedImage, destination: &Path) -> Result<()> {
    image
        .to_rgb_image(Color::WHITE)?
        .save_with_format(destination, ImageFormat::Jpeg)
        .map_err(|e| map_image_error(destination, e))
}

pub(crate) fn map_image_error(path: &Path, err: ImageError) -> MidashiError {
    match err {
        ImageError::IoError(source) => MidashiError::export_io(path, source),
        other => MidashiError::ImageEncode(other),
    }
}
