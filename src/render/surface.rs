//! Drawing surfaces shared by the page, committed and live layers

use image::RgbaImage;
use tiny_skia::{ColorU8, IntSize, Pixmap};

/// Allocate a transparent pixmap, never smaller than 1x1. `None` when the
/// size overflows tiny-skia's limits.
pub fn blank_pixmap(width: u32, height: u32) -> Option<Pixmap> {
    Pixmap::new(width.max(1), height.max(1))
}

/// Convert a straight-alpha RGBA image into a premultiplied pixmap
pub fn pixmap_from_rgba(img: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(img.width(), img.height())?;
    let data = img
        .pixels()
        .flat_map(|src| {
            let [r, g, b, a] = src.0;
            let c = ColorU8::from_rgba(r, g, b, a).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

/// Convert a premultiplied pixmap back into a straight-alpha RGBA image
pub fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// The three coordinated layers of the viewer. They always share one pixel size.
pub struct Surfaces {
    /// Rasterized document page
    pub page: Pixmap,
    /// Committed annotations of the current page
    pub annotations: Pixmap,
    /// Scratch layer for the stroke being drawn
    pub live: Pixmap,
}

impl Surfaces {
    /// Allocate every layer at the size of a rendered page, with the page
    /// painted onto the page layer
    pub fn for_page(page: &RgbaImage) -> Option<Self> {
        let (width, height) = page.dimensions();
        log::debug!("Allocating surfaces at {width}x{height}");
        Some(Self {
            page: pixmap_from_rgba(page)?,
            annotations: blank_pixmap(width, height)?,
            live: blank_pixmap(width, height)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.page.width()
    }

    pub fn height(&self) -> u32 {
        self.page.height()
    }

    pub fn clear_live(&mut self) {
        self.live.fill(tiny_skia::Color::TRANSPARENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_clamped() {
        let pixmap = blank_pixmap(0, 0).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (1, 1));
    }

    #[test]
    fn rgba_conversion_round_trips_opaque_pixels() {
        let img = RgbaImage::from_fn(4, 3, |x, y| image::Rgba([x as u8 * 60, y as u8 * 80, 7, 255]));
        let back = rgba_from_pixmap(&pixmap_from_rgba(&img).unwrap());
        assert_eq!(back, img);
    }

    #[test]
    fn layers_match_the_page_size() {
        let page = RgbaImage::from_pixel(40, 25, image::Rgba([255, 255, 255, 255]));
        let surfaces = Surfaces::for_page(&page).unwrap();
        assert_eq!((surfaces.width(), surfaces.height()), (40, 25));
        assert_eq!(surfaces.annotations.width(), 40);
        assert_eq!(surfaces.live.height(), 25);
        assert_eq!(surfaces.page.pixel(10, 10).map(|p| p.alpha()), Some(255));
    }

    #[test]
    fn oversized_page_is_not_allocated() {
        assert!(blank_pixmap(u32::MAX, u32::MAX).is_none());
        let empty = RgbaImage::new(0, 0);
        assert!(Surfaces::for_page(&empty).is_none());
    }
}
