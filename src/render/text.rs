//! Bitmap-font text rasterization onto tiny-skia pixmaps

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::domain::Point;
use crate::domain::bounds::TEXT_ADVANCE;

/// Glyph grid size of the bitmap font
const GLYPH_CELLS: f32 = 8.0;

fn glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
}

/// Build a fill path covering the lit glyph cells of `text`.
///
/// `origin` is the left end of the baseline; each glyph cell is
/// `size * TEXT_ADVANCE` wide and `size` tall, so the drawn text lines up
/// with the estimated text bounds.
pub fn text_path(text: &str, origin: Point, size: f32) -> Option<tiny_skia::Path> {
    let advance = size * TEXT_ADVANCE;
    let cell_w = advance / GLYPH_CELLS;
    let cell_h = size / GLYPH_CELLS;
    let top = origin.y - size;

    let mut pb = PathBuilder::new();
    for (index, ch) in text.chars().enumerate() {
        let Some(rows) = glyph(ch) else {
            continue;
        };
        let left = origin.x + index as f32 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..8u8 {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                if let Some(rect) = tiny_skia::Rect::from_xywh(
                    left + f32::from(col) * cell_w,
                    top + row as f32 * cell_h,
                    cell_w,
                    cell_h,
                ) {
                    pb.push_rect(rect);
                }
            }
        }
    }
    pb.finish()
}

/// Draw `text` with its baseline starting at `origin`
pub fn draw_text(pixmap: &mut Pixmap, text: &str, origin: Point, size: f32, paint: &Paint) {
    if let Some(path) = text_path(text, origin, size) {
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}
