//! Annotation types drawn on top of document pages
//!
//! All annotation types store coordinates in canvas pixel space.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bounds::compute_bounds;
use super::geometry::{Point, Rect};
use crate::config::Color;

/// Identifier that stays stable for the lifetime of an annotation
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnnotationId(pub u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One freehand stroke: raw pointer samples plus paint settings
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            points: self.points.iter().map(|p| p.translate(dx, dy)).collect(),
            color: self.color,
            width: self.width,
        }
    }
}

/// Text note anchored at its baseline start point
#[derive(Clone, Debug, PartialEq)]
pub struct TextNote {
    /// Insertion point (left end of the baseline)
    pub at: Point,
    pub text: String,
    pub color: Color,
    /// Font size in canvas pixels
    pub size: f32,
}

/// Geometry and paint of an annotation
#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationKind {
    /// Opaque freehand ink
    Ink(Vec<Stroke>),
    /// Translucent highlighter strokes
    Highlight(Vec<Stroke>),
    Text(TextNote),
}

impl AnnotationKind {
    /// Strokes of an ink or highlight annotation
    pub fn strokes(&self) -> Option<&[Stroke]> {
        match self {
            AnnotationKind::Ink(strokes) | AnnotationKind::Highlight(strokes) => Some(strokes),
            AnnotationKind::Text(_) => None,
        }
    }

    fn translated(&self, dx: f32, dy: f32) -> Self {
        let shift = |strokes: &[Stroke]| strokes.iter().map(|s| s.translated(dx, dy)).collect();
        match self {
            AnnotationKind::Ink(strokes) => AnnotationKind::Ink(shift(strokes)),
            AnnotationKind::Highlight(strokes) => AnnotationKind::Highlight(shift(strokes)),
            AnnotationKind::Text(note) => AnnotationKind::Text(TextNote {
                at: note.at.translate(dx, dy),
                ..note.clone()
            }),
        }
    }
}

/// An annotation placed on one page.
///
/// `bounds` is derived from `kind` whenever the geometry changes and is never
/// set independently.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    id: AnnotationId,
    page: u32,
    kind: AnnotationKind,
    bounds: Rect,
}

impl Annotation {
    /// Create an annotation on a 1-based page
    pub fn new(id: AnnotationId, page: u32, kind: AnnotationKind) -> Self {
        let bounds = compute_bounds(&kind);
        Self {
            id,
            page,
            kind,
            bounds,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn kind(&self) -> &AnnotationKind {
        &self.kind
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Reference point used when dragging: the text insertion point, or the
    /// first sample of the first stroke
    pub fn anchor(&self) -> Point {
        match &self.kind {
            AnnotationKind::Text(note) => note.at,
            AnnotationKind::Ink(strokes) | AnnotationKind::Highlight(strokes) => strokes
                .first()
                .and_then(|stroke| stroke.points.first())
                .copied()
                .unwrap_or_default(),
        }
    }

    /// Copy of this annotation rigidly moved by (dx, dy)
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.id, self.page, self.kind.translated(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink(points: &[(f32, f32)]) -> Annotation {
        Annotation::new(
            AnnotationId(1),
            1,
            AnnotationKind::Ink(vec![Stroke {
                points: points.iter().copied().map(Point::from).collect(),
                color: Color::rgb(0xef, 0x44, 0x44),
                width: 3.0,
            }]),
        )
    }

    #[test]
    fn translation_round_trip_restores_geometry() {
        let original = ink(&[(10.0, 10.0), (20.5, 30.25), (40.0, 12.0)]);
        let moved = original.translated(30.0, -10.0);
        assert_ne!(moved, original);
        assert_eq!(moved.translated(-30.0, 10.0), original);
    }

    #[test]
    fn translation_keeps_bounds_in_sync() {
        let original = ink(&[(10.0, 10.0), (20.0, 20.0)]);
        let moved = original.translated(5.0, 7.0);
        assert_eq!(moved.bounds(), original.bounds().translate(5.0, 7.0));
        assert_eq!(moved.anchor(), Point::new(15.0, 17.0));
    }

    #[test]
    fn text_translation_moves_insertion_point() {
        let note = Annotation::new(
            AnnotationId(2),
            3,
            AnnotationKind::Text(TextNote {
                at: Point::new(100.0, 200.0),
                text: "Hello".to_string(),
                color: Color::rgb(0, 0, 0),
                size: 16.0,
            }),
        );
        let moved = note.translated(-20.0, 4.0);
        assert_eq!(moved.anchor(), Point::new(80.0, 204.0));
        assert_eq!(moved.page(), 3);
        assert_eq!(moved.id(), AnnotationId(2));
    }

    #[test]
    fn empty_ink_anchor_is_origin() {
        let empty = Annotation::new(AnnotationId(9), 1, AnnotationKind::Ink(Vec::new()));
        assert_eq!(empty.anchor(), Point::default());
    }
}
