//! PNG encoding and export file naming

use std::io;
use std::path::Path;

use image::RgbaImage;

use crate::error::ViewerError;

/// Suffix marking an exported page as annotated
const ANNOTATED_MARKER: &str = "annotated";

/// `<document-base-name>_page_<N>_annotated.png`
pub fn export_file_name(document_name: &str, page: u32) -> String {
    let base = Path::new(document_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .unwrap_or("document");
    format!("{base}_page_{page}_{ANNOTATED_MARKER}.png")
}

pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// Encode on the blocking pool so large pages do not stall the event loop
pub async fn encode_png(image: RgbaImage) -> Result<Vec<u8>, ViewerError> {
    let encoded = tokio::task::spawn_blocking(move || {
        let mut bytes = Vec::new();
        write_png(&mut bytes, &image).map(|()| bytes)
    })
    .await
    .map_err(|e| ViewerError::CaptureFailure(format!("encoder task failed: {e}")))?;
    encoded.map_err(|e| ViewerError::CaptureFailure(format!("PNG encoding failed: {e}")))
}
