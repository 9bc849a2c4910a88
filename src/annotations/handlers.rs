//! Interaction controller
//!
//! Handles pointer messages and immediate edit actions for the open document.
//! Every committed mutation goes through `AnnotationState::commit`, so one
//! user action is exactly one history step.

use crate::annotations::hit_test;
use crate::config::ViewerConfig;
use crate::domain::{
    Annotation, AnnotationKind, DragState, Point, Stroke, StrokeTool, TextNote, Tool,
};
use crate::session::messages::PointerMsg;
use crate::session::state::{DocumentSession, Interaction};

/// What the renderers must do after a message was handled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Nothing visible changed
    None,
    /// The in-progress stroke changed; redraw the live layer only
    Live,
    /// Annotations or selection changed; clear the live layer and repaint
    Layer,
    /// Ask for text to place at this point
    PromptText(Point),
}

/// Handle a pointer message for the active tool
pub fn handle_pointer(
    session: &mut DocumentSession,
    tool: Tool,
    config: &ViewerConfig,
    msg: PointerMsg,
) -> Effect {
    match msg {
        PointerMsg::Down(point) => pointer_down(session, tool, point),
        PointerMsg::Move(point) => pointer_move(session, point),
        PointerMsg::Up(_) | PointerMsg::Leave => finish_gesture(session, config),
        PointerMsg::ContextMenu => {
            log::debug!("Context menu suppressed");
            Effect::None
        }
    }
}

// ============================================================================
// Pointer handlers
// ============================================================================

fn pointer_down(session: &mut DocumentSession, tool: Tool, point: Point) -> Effect {
    if !session.interaction.is_idle() {
        return Effect::None;
    }

    if let Some(stroke_tool) = tool.stroke_tool() {
        session.interaction = Interaction::Drawing {
            tool: stroke_tool,
            points: vec![point],
        };
        return Effect::Live;
    }

    match tool {
        Tool::Text => {
            session.interaction = Interaction::PlacingText { at: point };
            Effect::PromptText(point)
        }
        Tool::Move => start_drag(session, point),
        _ => Effect::None,
    }
}

fn start_drag(session: &mut DocumentSession, point: Point) -> Effect {
    let hit = hit_test(point, session.page_annotations()).map(|a| (a.id(), a.anchor()));
    match hit {
        Some((id, anchor)) => {
            log::debug!("Selected annotation {id}");
            session.annotations.selected = Some(id);
            session.interaction = Interaction::Dragging(DragState {
                id,
                offset: Point::new(point.x - anchor.x, point.y - anchor.y),
                moved: false,
            });
            Effect::Layer
        }
        None if session.annotations.selected.take().is_some() => Effect::Layer,
        None => Effect::None,
    }
}

fn pointer_move(session: &mut DocumentSession, point: Point) -> Effect {
    match &mut session.interaction {
        Interaction::Drawing { points, .. } => {
            points.push(point);
            Effect::Live
        }
        Interaction::Dragging(drag) => {
            let Some(anchor) = session.annotations.annotations.get(drag.id).map(|a| a.anchor())
            else {
                return Effect::None;
            };
            let dx = point.x - drag.offset.x - anchor.x;
            let dy = point.y - drag.offset.y - anchor.y;
            if dx == 0.0 && dy == 0.0 {
                return Effect::None;
            }
            drag.moved = true;
            let moved = session.annotations.annotations.translate(drag.id, dx, dy);
            session.annotations.preview(moved);
            Effect::Layer
        }
        _ => Effect::None,
    }
}

/// Pointer up, leave and cancel all end the gesture the same way
fn finish_gesture(session: &mut DocumentSession, config: &ViewerConfig) -> Effect {
    match std::mem::take(&mut session.interaction) {
        Interaction::Drawing { tool, points } if points.len() > 1 => {
            commit_stroke(session, config, tool, points);
            Effect::Layer
        }
        Interaction::Drawing { .. } => {
            log::debug!("Discarding single-sample stroke");
            Effect::Layer
        }
        Interaction::Dragging(drag) => {
            if drag.moved {
                let moved = session.annotations.annotations.clone();
                session.annotations.commit(moved);
                log::debug!("Moved annotation {}", drag.id);
            }
            Effect::Layer
        }
        placing @ Interaction::PlacingText { .. } => {
            // The prompt is still open; only its answer ends this state.
            session.interaction = placing;
            Effect::None
        }
        Interaction::Idle => Effect::None,
    }
}

fn commit_stroke(
    session: &mut DocumentSession,
    config: &ViewerConfig,
    tool: StrokeTool,
    points: Vec<Point>,
) {
    let style = config.stroke_style(tool);
    let stroke = Stroke {
        points,
        color: style.color,
        width: style.width,
    };
    let kind = match tool {
        StrokeTool::Ink => AnnotationKind::Ink(vec![stroke]),
        StrokeTool::Highlight => AnnotationKind::Highlight(vec![stroke]),
    };
    let id = session.annotations.allocate_id();
    let page = session.current_page();
    let next = session
        .annotations
        .annotations
        .append(Annotation::new(id, page, kind));
    session.annotations.commit(next);
    log::debug!("Committed {tool:?} annotation {id} on page {page}");
}

// ============================================================================
// Text placement
// ============================================================================

/// Answer to the text prompt. Blank text places nothing.
pub fn confirm_text(session: &mut DocumentSession, config: &ViewerConfig, text: &str) -> Effect {
    let Interaction::PlacingText { at } = session.interaction else {
        return Effect::None;
    };
    session.interaction = Interaction::Idle;

    let text = text.trim();
    if text.is_empty() {
        log::debug!("Empty text note discarded");
        return Effect::None;
    }

    let id = session.annotations.allocate_id();
    let page = session.current_page();
    let note = TextNote {
        at,
        text: text.to_string(),
        color: config.text_color,
        size: config.text_size,
    };
    let next = session
        .annotations
        .annotations
        .append(Annotation::new(id, page, AnnotationKind::Text(note)));
    session.annotations.commit(next);
    log::debug!("Committed text annotation {id} on page {page}");
    Effect::Layer
}

pub fn cancel_text(session: &mut DocumentSession) -> Effect {
    if matches!(session.interaction, Interaction::PlacingText { .. }) {
        session.interaction = Interaction::Idle;
    }
    Effect::None
}

// ============================================================================
// Immediate actions
// ============================================================================

pub fn delete_selected(session: &mut DocumentSession) -> Effect {
    let Some(id) = session.annotations.selected.take() else {
        return Effect::None;
    };
    if session.annotations.annotations.get(id).is_none() {
        return Effect::Layer;
    }
    let next = session.annotations.annotations.remove_by_id(id);
    session.annotations.commit(next);
    log::debug!("Deleted annotation {id}");
    Effect::Layer
}

/// Remove every annotation on the current page as one history step
pub fn clear_page(session: &mut DocumentSession) -> Effect {
    session.annotations.selected = None;
    let page = session.current_page();
    let current = &session.annotations.annotations;
    let next = current.remove_by_page(page);
    let removed = current.len() - next.len();
    if removed == 0 {
        return Effect::Layer;
    }
    session.annotations.commit(next);
    log::debug!("Cleared {removed} annotations from page {page}");
    Effect::Layer
}

pub fn undo(session: &mut DocumentSession) -> Effect {
    abandon_gesture(session);
    if session.annotations.undo() {
        log::debug!("Undo to history entry {}", session.annotations.history.cursor());
    }
    Effect::Layer
}

pub fn redo(session: &mut DocumentSession) -> Effect {
    abandon_gesture(session);
    if session.annotations.redo() {
        log::debug!("Redo to history entry {}", session.annotations.history.cursor());
    }
    Effect::Layer
}

/// Drop an in-progress stroke or drag without recording it. A drag's
/// preview is rolled back to the current history entry.
fn abandon_gesture(session: &mut DocumentSession) {
    match session.interaction {
        Interaction::Drawing { .. } => session.interaction = Interaction::Idle,
        Interaction::Dragging(_) => {
            session.interaction = Interaction::Idle;
            let state = &mut session.annotations;
            state.annotations = state.history.current().annotations.clone();
        }
        Interaction::Idle | Interaction::PlacingText { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::testing::SolidDocument;
    use crate::session::state::ViewState;
    use std::sync::Arc;

    fn session(pages: u32) -> DocumentSession {
        DocumentSession::new(
            Arc::new(SolidDocument::new(pages)),
            "doc.pdf".into(),
            ViewState::new(pages),
            50,
        )
    }

    fn draw(session: &mut DocumentSession, tool: Tool, points: &[(f32, f32)]) {
        let config = ViewerConfig::default();
        let (first, rest) = points.split_first().unwrap();
        handle_pointer(session, tool, &config, PointerMsg::Down(Point::from(*first)));
        for p in rest {
            handle_pointer(session, tool, &config, PointerMsg::Move(Point::from(*p)));
        }
        let last = points.last().copied().unwrap();
        handle_pointer(session, tool, &config, PointerMsg::Up(Point::from(last)));
    }

    fn place_text(session: &mut DocumentSession, at: (f32, f32), text: &str) {
        let config = ViewerConfig::default();
        let effect = handle_pointer(session, Tool::Text, &config, PointerMsg::Down(at.into()));
        assert_eq!(effect, Effect::PromptText(at.into()));
        confirm_text(session, &config, text);
    }

    #[test]
    fn stroke_commits_on_pointer_up() {
        let mut s = session(3);
        draw(&mut s, Tool::Ink, &[(10.0, 10.0), (20.0, 12.0), (30.0, 18.0), (40.0, 20.0), (50.0, 25.0)]);

        let all = s.annotations.annotations.as_slice();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].page(), 1);
        match all[0].kind() {
            AnnotationKind::Ink(strokes) => {
                assert_eq!(strokes.len(), 1);
                assert_eq!(strokes[0].points.len(), 5);
                assert_eq!(strokes[0].color.to_hex(), "#ef4444");
                assert_eq!(strokes[0].width, 3.0);
            }
            other => panic!("expected ink, got {other:?}"),
        }
        assert!(s.interaction.is_idle());
        assert_eq!(s.annotations.history.len(), 2);
    }

    #[test]
    fn single_tap_is_discarded() {
        let mut s = session(1);
        draw(&mut s, Tool::Highlight, &[(10.0, 10.0)]);
        assert!(s.annotations.annotations.is_empty());
        assert_eq!(s.annotations.history.len(), 1);
    }

    #[test]
    fn pointer_leave_commits_like_pointer_up() {
        let mut s = session(1);
        let config = ViewerConfig::default();
        handle_pointer(&mut s, Tool::Highlight, &config, PointerMsg::Down((0.0, 0.0).into()));
        handle_pointer(&mut s, Tool::Highlight, &config, PointerMsg::Move((9.0, 0.0).into()));
        handle_pointer(&mut s, Tool::Highlight, &config, PointerMsg::Leave);
        assert!(s.interaction.is_idle());
        assert!(matches!(
            s.annotations.annotations.as_slice()[0].kind(),
            AnnotationKind::Highlight(_)
        ));
    }

    #[test]
    fn text_note_is_trimmed_and_sized() {
        let mut s = session(1);
        place_text(&mut s, (100.0, 200.0), "  Hello \n");

        let note = &s.annotations.annotations.as_slice()[0];
        let AnnotationKind::Text(text) = note.kind() else {
            panic!("expected text");
        };
        assert_eq!(text.text, "Hello");
        assert_eq!(text.at, Point::new(100.0, 200.0));
        assert_eq!(text.size, 16.0);
        assert!((note.bounds().width - 58.0).abs() < 1e-3);
        assert!((note.bounds().height - 26.0).abs() < 1e-3);
    }

    #[test]
    fn blank_or_cancelled_text_adds_nothing() {
        let mut s = session(1);
        place_text(&mut s, (5.0, 5.0), "   ");
        assert!(s.annotations.annotations.is_empty());

        let config = ViewerConfig::default();
        handle_pointer(&mut s, Tool::Text, &config, PointerMsg::Down((5.0, 5.0).into()));
        // Pointer events do not end a pending prompt.
        handle_pointer(&mut s, Tool::Text, &config, PointerMsg::Leave);
        assert!(matches!(s.interaction, Interaction::PlacingText { .. }));
        cancel_text(&mut s);
        assert!(s.interaction.is_idle());
        assert_eq!(s.annotations.history.len(), 1);
    }

    #[test]
    fn drag_records_exactly_one_history_entry() {
        let mut s = session(1);
        draw(&mut s, Tool::Ink, &[(10.0, 10.0), (40.0, 40.0)]);
        let before = s.annotations.annotations.as_slice()[0].clone();
        let entries = s.annotations.history.len();

        let config = ViewerConfig::default();
        let grab = Point::new(20.0, 20.0);
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Down(grab));
        assert_eq!(s.annotations.selected, Some(before.id()));
        for step in 1..=10 {
            let p = Point::new(grab.x + 3.0 * step as f32, grab.y - step as f32);
            handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Move(p));
        }
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Up((50.0, 10.0).into()));

        assert_eq!(s.annotations.history.len(), entries + 1);
        let after = &s.annotations.annotations.as_slice()[0];
        assert_eq!(after.anchor(), Point::new(40.0, 0.0));
        assert_eq!(after.bounds(), before.bounds().translate(30.0, -10.0));
        assert_eq!(s.annotations.selected, Some(before.id()));
    }

    #[test]
    fn click_without_drag_records_nothing() {
        let mut s = session(1);
        draw(&mut s, Tool::Ink, &[(10.0, 10.0), (40.0, 40.0)]);
        let entries = s.annotations.history.len();
        let config = ViewerConfig::default();
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Down((20.0, 20.0).into()));
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Up((20.0, 20.0).into()));
        assert_eq!(s.annotations.history.len(), entries);
    }

    #[test]
    fn move_miss_clears_selection() {
        let mut s = session(1);
        draw(&mut s, Tool::Ink, &[(10.0, 10.0), (40.0, 40.0)]);
        let config = ViewerConfig::default();
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Down((20.0, 20.0).into()));
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Up((20.0, 20.0).into()));
        assert!(s.annotations.selected.is_some());

        let effect = handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Down((400.0, 400.0).into()));
        assert_eq!(effect, Effect::Layer);
        assert_eq!(s.annotations.selected, None);
        assert!(s.interaction.is_idle());
    }

    #[test]
    fn delete_selected_removes_one_annotation() {
        let mut s = session(1);
        draw(&mut s, Tool::Ink, &[(10.0, 10.0), (40.0, 40.0)]);
        place_text(&mut s, (200.0, 200.0), "keep");
        assert_eq!(delete_selected(&mut s), Effect::None);

        let config = ViewerConfig::default();
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Down((20.0, 20.0).into()));
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Up((20.0, 20.0).into()));
        delete_selected(&mut s);

        assert_eq!(s.annotations.annotations.len(), 1);
        assert_eq!(s.annotations.selected, None);
        assert!(matches!(
            s.annotations.annotations.as_slice()[0].kind(),
            AnnotationKind::Text(_)
        ));
    }

    #[test]
    fn clear_page_is_a_single_step() {
        let mut s = session(2);
        draw(&mut s, Tool::Ink, &[(10.0, 10.0), (40.0, 40.0)]);
        draw(&mut s, Tool::Highlight, &[(10.0, 60.0), (90.0, 60.0)]);
        place_text(&mut s, (30.0, 100.0), "note");
        s.view.go_to(2);
        draw(&mut s, Tool::Ink, &[(5.0, 5.0), (15.0, 15.0)]);
        s.view.go_to(1);

        let entries = s.annotations.history.len();
        clear_page(&mut s);
        assert_eq!(s.annotations.annotations.len(), 1);
        assert_eq!(s.annotations.annotations.as_slice()[0].page(), 2);
        assert_eq!(s.annotations.history.len(), entries + 1);

        undo(&mut s);
        assert_eq!(s.annotations.annotations.len(), 4);
    }

    #[test]
    fn clearing_an_empty_page_records_nothing() {
        let mut s = session(1);
        clear_page(&mut s);
        assert_eq!(s.annotations.history.len(), 1);
    }

    #[test]
    fn undo_abandons_gesture_and_clears_selection() {
        let mut s = session(1);
        draw(&mut s, Tool::Ink, &[(10.0, 10.0), (40.0, 40.0)]);
        let config = ViewerConfig::default();
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Down((20.0, 20.0).into()));
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Move((60.0, 60.0).into()));

        undo(&mut s);
        assert!(s.interaction.is_idle());
        assert_eq!(s.annotations.selected, None);
        assert!(s.annotations.annotations.is_empty());

        redo(&mut s);
        // Redo restores the stroke as committed, not the abandoned drag.
        assert_eq!(
            s.annotations.annotations.as_slice()[0].anchor(),
            Point::new(10.0, 10.0)
        );
    }

    #[test]
    fn redo_at_newest_entry_rolls_back_drag_preview() {
        let mut s = session(1);
        draw(&mut s, Tool::Ink, &[(10.0, 10.0), (40.0, 40.0)]);
        let config = ViewerConfig::default();
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Down((20.0, 20.0).into()));
        handle_pointer(&mut s, Tool::Move, &config, PointerMsg::Move((120.0, 120.0).into()));
        assert_eq!(
            s.annotations.annotations.as_slice()[0].anchor(),
            Point::new(110.0, 110.0)
        );

        redo(&mut s);
        assert!(s.interaction.is_idle());
        assert_eq!(s.annotations.history.len(), 2);
        assert_eq!(
            s.annotations.annotations,
            s.annotations.history.current().annotations
        );
        assert_eq!(
            s.annotations.annotations.as_slice()[0].anchor(),
            Point::new(10.0, 10.0)
        );
    }
}
