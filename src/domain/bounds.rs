//! Bounding boxes for annotations, used for hit-testing and selection outlines

use super::annotation::{AnnotationKind, Stroke, TextNote};
use super::geometry::Rect;

/// Minimum padding around ink strokes
pub const INK_PADDING: f32 = 10.0;
/// Minimum padding around highlighter strokes (they are drawn wider)
pub const HIGHLIGHT_PADDING: f32 = 15.0;
/// Padding around text notes on every side
pub const TEXT_PADDING: f32 = 5.0;
/// Approximate glyph advance as a fraction of the font size
pub const TEXT_ADVANCE: f32 = 0.6;

/// Compute the axis-aligned bounding box of an annotation
pub fn compute_bounds(kind: &AnnotationKind) -> Rect {
    match kind {
        AnnotationKind::Ink(strokes) => stroke_bounds(strokes, INK_PADDING),
        AnnotationKind::Highlight(strokes) => stroke_bounds(strokes, HIGHLIGHT_PADDING),
        AnnotationKind::Text(note) => text_bounds(note),
    }
}

/// Approximate rendered width of a text run
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * TEXT_ADVANCE
}

/// Text grows upward from its baseline, so the box sits above-left of the
/// insertion point.
fn text_bounds(note: &TextNote) -> Rect {
    Rect {
        x: note.at.x - TEXT_PADDING,
        y: note.at.y - note.size - TEXT_PADDING,
        width: text_width(&note.text, note.size) + TEXT_PADDING * 2.0,
        height: note.size + TEXT_PADDING * 2.0,
    }
}

/// Min/max extent over every point of every stroke.
///
/// Produces a zero-size box at the origin when there are no points at all.
fn stroke_bounds(strokes: &[Stroke], min_padding: f32) -> Rect {
    let mut points = strokes.iter().flat_map(|stroke| stroke.points.iter());
    let Some(first) = points.next() else {
        return Rect::default();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let stroke_width = strokes.first().map(|s| s.width).unwrap_or(0.0);
    Rect::from_extents(min_x, min_y, max_x, max_y, min_padding.max(stroke_width))
}
