//! Shared geometry calculations for annotation rendering
//!
//! This module contains constants and the stroke smoothing math shared
//! between the committed-annotation layer and the live-stroke layer.

use crate::domain::Point;

/// Highlighter paint constants
pub mod highlight {
    /// Opacity applied on top of the stroke color
    pub const OPACITY: f32 = 0.4;
}

/// Selection cue constants
pub mod selection {
    /// Extra width of the glow drawn under a selected stroke
    pub const GLOW_SPREAD: f32 = 8.0;
    /// Glow color (RGBA)
    pub const GLOW_RGBA: [u8; 4] = [59, 130, 246, 110];
    /// Dashed outline color for selected text (RGBA)
    pub const OUTLINE_RGBA: [u8; 4] = [59, 130, 246, 255];
    /// Dash pattern for the text outline
    pub const DASH: [f32; 2] = [4.0, 4.0];
}

/// One segment of a smoothed stroke path
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
}

impl PathSegment {
    /// End vertex of this segment
    pub fn end(&self) -> Point {
        match *self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => p,
            PathSegment::QuadTo { to, .. } => to,
        }
    }
}

/// Smooth raw pointer samples with quadratic midpoint interpolation.
///
/// Starts at point 0, curves through every interior point towards the
/// midpoint of it and its successor, then finishes with a straight segment
/// to the last point. The first and last vertices are always the first and
/// last samples exactly.
pub fn smooth_path(points: &[Point]) -> Vec<PathSegment> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };

    let mut segments = Vec::with_capacity(points.len() + 1);
    segments.push(PathSegment::MoveTo(first));
    if points.len() == 1 {
        return segments;
    }

    for pair in points[1..].windows(2) {
        let ctrl = pair[0];
        segments.push(PathSegment::QuadTo {
            ctrl,
            to: ctrl.midpoint(pair[1]),
        });
    }
    segments.push(PathSegment::LineTo(last));

    segments
}
