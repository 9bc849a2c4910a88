//! Built-in engine that treats a single raster image as a one-page document

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::{Document, DocumentEngine, EngineError, Rotation, Viewport, check_page};

/// Decodes PNG/JPEG/... bytes with the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterEngine;

impl DocumentEngine for RasterEngine {
    fn load(&self, bytes: &[u8]) -> Result<Arc<dyn Document>, EngineError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| EngineError::Decode(e.to_string()))?;
        let page = decoded.to_rgba8();
        log::debug!("Raster document decoded: {}x{}", page.width(), page.height());
        Ok(Arc::new(RasterDocument { page }))
    }
}

/// One decoded image, rendered at any scale and rotation
pub struct RasterDocument {
    page: RgbaImage,
}

impl RasterDocument {
    pub fn new(page: RgbaImage) -> Self {
        Self { page }
    }
}

impl Document for RasterDocument {
    fn page_count(&self) -> u32 {
        1
    }

    fn render_page(&self, page: u32, viewport: Viewport) -> Result<RgbaImage, EngineError> {
        check_page(page, 1)?;
        if !(viewport.scale.is_finite() && viewport.scale > 0.0) {
            return Err(EngineError::Rasterize(format!(
                "invalid scale {}",
                viewport.scale
            )));
        }

        let unrotated = Viewport {
            rotation: Rotation::Deg0,
            ..viewport
        };
        let (w, h) = unrotated.pixel_size(self.page.width(), self.page.height());
        let scaled = if (w, h) == self.page.dimensions() {
            self.page.clone()
        } else {
            imageops::resize(&self.page, w, h, FilterType::Triangle)
        };

        Ok(match viewport.rotation {
            Rotation::Deg0 => scaled,
            Rotation::Deg90 => imageops::rotate90(&scaled),
            Rotation::Deg180 => imageops::rotate180(&scaled),
            Rotation::Deg270 => imageops::rotate270(&scaled),
        })
    }
}
