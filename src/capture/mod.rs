//! Export of the current page with its annotations flattened on top
//!
//! This module consolidates:
//! - Compositing of the page and annotation layers plus the watermark
//! - PNG encoding and the export file name (export.rs)

pub mod export;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tiny_skia::{Paint, Pixmap, PixmapPaint, Transform};

use crate::domain::Point;
use crate::domain::bounds::text_width;
use crate::error::ViewerError;
use crate::render::text;

pub use export::{encode_png, export_file_name, write_png};

/// Watermark glyph height in pixels
const WATERMARK_SIZE: f32 = 14.0;
/// Distance of the watermark from the right and bottom edges
const WATERMARK_MARGIN: f32 = 12.0;
/// Slate grey at roughly 55% opacity
const WATERMARK_RGBA: [u8; 4] = [100, 116, 139, 140];

/// An encoded capture, ready to be written out
#[derive(Debug, Clone)]
pub struct CaptureArtifact {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl CaptureArtifact {
    /// Write the PNG into `dir`, creating it if needed
    pub fn save_in(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.png)
            .with_context(|| format!("Failed to write capture to {}", path.display()))?;
        log::info!("Saved capture to {}", path.display());
        Ok(path)
    }
}

/// Flatten `annotations` over `page` at native resolution and stamp the
/// watermark in the bottom-right corner. Neither source is modified.
pub fn compose(page: &Pixmap, annotations: &Pixmap, watermark: &str) -> Result<Pixmap, ViewerError> {
    if (page.width(), page.height()) != (annotations.width(), annotations.height()) {
        return Err(ViewerError::CaptureFailure(format!(
            "layer size mismatch: page is {}x{}, annotations are {}x{}",
            page.width(),
            page.height(),
            annotations.width(),
            annotations.height()
        )));
    }

    let mut output = page.clone();
    let paint = PixmapPaint::default();
    output.draw_pixmap(0, 0, annotations.as_ref(), &paint, Transform::identity(), None);

    let watermark = watermark.trim();
    if !watermark.is_empty() {
        draw_watermark(&mut output, watermark);
    }
    Ok(output)
}

/// Right-aligned, baseline `WATERMARK_MARGIN` above the bottom edge
fn draw_watermark(pixmap: &mut Pixmap, watermark: &str) {
    let width = text_width(watermark, WATERMARK_SIZE);
    let x = (pixmap.width() as f32 - WATERMARK_MARGIN - width).max(0.0);
    let y = pixmap.height() as f32 - WATERMARK_MARGIN;

    let [r, g, b, a] = WATERMARK_RGBA;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    text::draw_text(pixmap, watermark, Point::new(x, y), WATERMARK_SIZE, &paint);
}
