//! Narrow contract to the external document engine
//!
//! The viewer only needs a page count and the ability to rasterize one page
//! at a given viewport. Decoding and layout stay inside the engine.

pub mod raster;

use std::sync::Arc;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use raster::RasterEngine;

/// Errors reported by a document engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Failed to decode document: {0}")]
    Decode(String),

    #[error("Page {page} is out of range (document has {count} pages)")]
    PageOutOfRange { page: u32, count: u32 },

    #[error("Rasterization failed: {0}")]
    Rasterize(String),
}

/// Page rotation, clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Next rotation in the cycle (wraps from 270 to 0)
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Whether width and height swap at this rotation
    pub fn is_sideways(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Scale and rotation a page is rasterized at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f32,
    pub rotation: Rotation,
}

impl Viewport {
    /// Pixel size of a page of `width` x `height` units at this viewport
    pub fn pixel_size(&self, width: u32, height: u32) -> (u32, u32) {
        let w = ((width as f32) * self.scale).round().max(1.0) as u32;
        let h = ((height as f32) * self.scale).round().max(1.0) as u32;
        if self.rotation.is_sideways() {
            (h, w)
        } else {
            (w, h)
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: Rotation::Deg0,
        }
    }
}

/// A loaded document
pub trait Document: Send + Sync {
    fn page_count(&self) -> u32;

    /// Rasterize a 1-based page at the given viewport
    fn render_page(&self, page: u32, viewport: Viewport) -> Result<RgbaImage, EngineError>;
}

/// Decoder that turns raw bytes into a document
pub trait DocumentEngine: Send + Sync {
    fn load(&self, bytes: &[u8]) -> Result<Arc<dyn Document>, EngineError>;
}

/// Check a 1-based page index against a page count
pub(crate) fn check_page(page: u32, count: u32) -> Result<(), EngineError> {
    if page == 0 || page > count {
        return Err(EngineError::PageOutOfRange { page, count });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_cycles_and_wraps() {
        let mut rotation = Rotation::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(rotation.degrees());
            rotation = rotation.next();
        }
        assert_eq!(seen, vec![0, 90, 180, 270, 0]);
    }

    #[test]
    fn sideways_viewport_swaps_dimensions() {
        let viewport = Viewport {
            scale: 2.0,
            rotation: Rotation::Deg270,
        };
        assert_eq!(viewport.pixel_size(100, 50), (100, 200));
        assert_eq!(Viewport::default().pixel_size(100, 50), (100, 50));
    }

    #[test]
    fn page_bounds_are_one_based() {
        assert!(check_page(1, 3).is_ok());
        assert!(check_page(3, 3).is_ok());
        assert_eq!(
            check_page(0, 3),
            Err(EngineError::PageOutOfRange { page: 0, count: 3 })
        );
        assert!(check_page(4, 3).is_err());
    }
}
