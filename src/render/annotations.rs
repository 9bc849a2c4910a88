//! Annotation layer rendering using tiny-skia
//!
//! Two renderers share the same stroke smoothing:
//! - the committed layer redraws every annotation of the current page
//! - the live layer redraws only the stroke currently being drawn

use tiny_skia::{
    BlendMode, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

use super::geometry::{self, PathSegment, highlight, selection};
use super::text;
use crate::config::{Color, StrokeStyle};
use crate::domain::{Annotation, AnnotationId, AnnotationKind, Point, Rect, StrokeTool, TextNote};

/// Build a smoothed stroke path from raw samples
fn build_stroke_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for segment in geometry::smooth_path(points) {
        match segment {
            PathSegment::MoveTo(p) => pb.move_to(p.x, p.y),
            PathSegment::LineTo(p) => pb.line_to(p.x, p.y),
            PathSegment::QuadTo { ctrl, to } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
        }
    }
    pb.finish()
}

/// Paint for a stroke tool: ink is opaque, highlighter multiplies at reduced opacity
fn stroke_paint(color: Color, tool: StrokeTool) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.anti_alias = true;
    match tool {
        StrokeTool::Ink => paint.set_color_rgba8(r, g, b, a),
        StrokeTool::Highlight => {
            let alpha = (f32::from(a) * highlight::OPACITY).round() as u8;
            paint.set_color_rgba8(r, g, b, alpha);
            paint.blend_mode = BlendMode::Multiply;
        }
    }
    paint
}

fn rgba_paint([r, g, b, a]: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Draw one freehand stroke. A single sample is drawn as a dot.
fn draw_stroke(pixmap: &mut Pixmap, points: &[Point], width: f32, paint: &Paint) {
    match points {
        [] => {}
        [dot] => {
            if let Some(circle) = PathBuilder::from_circle(dot.x, dot.y, (width * 0.5).max(0.5)) {
                pixmap.fill_path(
                    &circle,
                    paint,
                    tiny_skia::FillRule::Winding,
                    Transform::identity(),
                    None,
                );
            }
        }
        _ => {
            if let Some(path) = build_stroke_path(points) {
                pixmap.stroke_path(&path, paint, &round_stroke(width), Transform::identity(), None);
            }
        }
    }
}

fn draw_strokes(
    pixmap: &mut Pixmap,
    strokes: &[crate::domain::Stroke],
    tool: StrokeTool,
    selected: bool,
) {
    if selected {
        let glow = rgba_paint(selection::GLOW_RGBA);
        for stroke in strokes {
            draw_stroke(
                pixmap,
                &stroke.points,
                stroke.width + selection::GLOW_SPREAD,
                &glow,
            );
        }
    }
    for stroke in strokes {
        let paint = stroke_paint(stroke.color, tool);
        draw_stroke(pixmap, &stroke.points, stroke.width, &paint);
    }
}

/// Dashed outline around a selected text note
fn draw_dashed_outline(pixmap: &mut Pixmap, bounds: Rect) {
    let Some(rect) = tiny_skia::Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)
    else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let stroke = Stroke {
        width: 1.0,
        dash: StrokeDash::new(selection::DASH.to_vec(), 0.0),
        ..Default::default()
    };
    pixmap.stroke_path(
        &path,
        &rgba_paint(selection::OUTLINE_RGBA),
        &stroke,
        Transform::identity(),
        None,
    );
}

fn draw_text_note(pixmap: &mut Pixmap, note: &TextNote, bounds: Rect, selected: bool) {
    if selected {
        if let Some(path) = text::text_path(&note.text, note.at, note.size) {
            pixmap.stroke_path(
                &path,
                &rgba_paint(selection::GLOW_RGBA),
                &round_stroke(selection::GLOW_SPREAD * 0.5),
                Transform::identity(),
                None,
            );
        }
        draw_dashed_outline(pixmap, bounds);
    }
    let [r, g, b, a] = note.color.to_rgba_u8();
    text::draw_text(pixmap, &note.text, note.at, note.size, &rgba_paint([r, g, b, a]));
}

/// Draw a single annotation, with a selection cue if requested
pub fn draw_annotation(pixmap: &mut Pixmap, annotation: &Annotation, selected: bool) {
    match annotation.kind() {
        AnnotationKind::Ink(strokes) => draw_strokes(pixmap, strokes, StrokeTool::Ink, selected),
        AnnotationKind::Highlight(strokes) => {
            draw_strokes(pixmap, strokes, StrokeTool::Highlight, selected)
        }
        AnnotationKind::Text(note) => draw_text_note(pixmap, note, annotation.bounds(), selected),
    }
}

/// Clear the committed layer and redraw `annotations` bottom to top
pub fn draw_committed<'a>(
    pixmap: &mut Pixmap,
    annotations: impl IntoIterator<Item = &'a Annotation>,
    selected: Option<AnnotationId>,
) -> usize {
    pixmap.fill(tiny_skia::Color::TRANSPARENT);
    let mut drawn = 0;
    for annotation in annotations {
        draw_annotation(pixmap, annotation, selected == Some(annotation.id()));
        drawn += 1;
    }
    drawn
}

/// Clear the scratch layer and draw the in-progress stroke
pub fn draw_live(pixmap: &mut Pixmap, points: &[Point], style: StrokeStyle, tool: StrokeTool) {
    pixmap.fill(tiny_skia::Color::TRANSPARENT);
    let paint = stroke_paint(style.color, tool);
    draw_stroke(pixmap, points, style.width, &paint);
}
