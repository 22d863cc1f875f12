// this_file: crates/midashi-render/src/pdf.rs

//! Single-page PDF output.
//!
//! The image is first written as a temporary PNG next to the destination,
//! read back, and embedded as an image XObject filling a page the size of the
//! canvas. The temporary file is removed when [`TempRaster`] drops, whether the
//! export succeeded or not. Files that already exist are never reused as the
//! temporary raster.

use crate::export::{map_image_error, write_png};
use log::{debug, trace, warn};
use midashi_core::{MidashiError, RenderedImage, Result};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const IMAGE_NAME: Name<'static> = Name(b"Im1");

/// Write `image` as a one-page PDF at `destination`.
pub fn write_pdf(image: &RenderedImage, destination: &Path) -> Result<()> {
    let raster = TempRaster::beside(destination)?;
    write_png(image, raster.path())?;

    let document = build_document(raster.path(), image.width(), image.height())?;
    std::fs::write(destination, document)
        .map_err(|e| MidashiError::export_io(destination, e))?;
    Ok(())
}

/// Temporary raster path: the destination with its extension swapped to `png`.
///
/// A destination that already ends in `.png` gets `.raster.png` instead so the
/// PDF never overwrites its own source.
pub fn raster_path_for(destination: &Path) -> PathBuf {
    let swapped = destination.with_extension("png");
    if swapped == destination {
        destination.with_extension("raster.png")
    } else {
        swapped
    }
}

/// Deletes the wrapped file on drop. A failed delete is only logged.
pub struct TempRaster {
    path: PathBuf,
}

impl TempRaster {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reserve an unused raster path next to `destination`.
    ///
    /// [`raster_path_for`] is taken when nothing exists there yet, otherwise a
    /// uniquely named `<stem>.*.png` sibling is created.
    pub fn beside(destination: &Path) -> Result<Self> {
        let preferred = raster_path_for(destination);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&preferred)
        {
            Ok(_) => return Ok(Self::new(preferred)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => return Err(MidashiError::export_io(preferred, e)),
        }

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let stem = destination
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "raster".to_string());
        let path = tempfile::Builder::new()
            .prefix(&format!("{stem}."))
            .suffix(".png")
            .tempfile_in(dir)
            .and_then(|file| file.into_temp_path().keep().map_err(|e| e.error))
            .map_err(|e| MidashiError::export_io(destination, e))?;
        debug!(
            "{} exists, using {} as temporary raster",
            preferred.display(),
            path.display()
        );
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempRaster {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => trace!("Removed temporary raster {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Could not remove temporary raster {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Build a PDF with one `width`×`height` page showing the raster at `raster_path`.
fn build_document(raster_path: &Path, width: u32, height: u32) -> Result<Vec<u8>> {
    let raster = image::open(raster_path)
        .map_err(|e| map_image_error(raster_path, e))?
        .to_rgba8();

    let pixel_count = (raster.width() * raster.height()) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for px in raster.pixels() {
        let [r, g, b, a] = px.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let mask_id = Ref::new(5);
    let content_id = Ref::new(6);

    let page_width = width as f32;
    let page_height = height as f32;

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, page_width, page_height));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(IMAGE_NAME, image_id);
    page.finish();

    let mut xobject = pdf.image_xobject(image_id, &rgb);
    xobject.width(raster.width() as i32);
    xobject.height(raster.height() as i32);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    xobject.s_mask(mask_id);
    xobject.finish();

    let mut s_mask = pdf.image_xobject(mask_id, &alpha);
    s_mask.width(raster.width() as i32);
    s_mask.height(raster.height() as i32);
    s_mask.color_space().device_gray();
    s_mask.bits_per_component(8);
    s_mask.finish();

    // Image space is the unit square; scale it up to cover the page.
    let mut content = Content::new();
    content.save_state();
    content.transform([page_width, 0.0, 0.0, page_height, 0.0, 0.0]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    Ok(pdf.finish())
}
