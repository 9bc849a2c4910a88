//! Per-document session state: view, annotations with history, and the active gesture

use std::sync::Arc;

use crate::annotations::{AnnotationSet, History};
use crate::document::{Document, Rotation, Viewport};
use crate::domain::{Annotation, AnnotationId, DragState, Point, StrokeTool};

/// Smallest allowed zoom scale
pub const MIN_ZOOM: f32 = 0.5;
/// Largest allowed zoom scale
pub const MAX_ZOOM: f32 = 3.0;

pub fn clamp_zoom(scale: f32) -> f32 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Page, zoom and rotation. Never touches annotation data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    page: u32,
    page_count: u32,
    zoom: f32,
    rotation: Rotation,
}

impl ViewState {
    pub fn new(page_count: u32) -> Self {
        Self {
            page: 1,
            page_count: page_count.max(1),
            zoom: 1.0,
            rotation: Rotation::Deg0,
        }
    }

    /// Fresh state for a new document that keeps the zoom and rotation of `self`
    pub fn for_document(&self, page_count: u32) -> Self {
        Self {
            zoom: self.zoom,
            rotation: self.rotation,
            ..Self::new(page_count)
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            scale: self.zoom,
            rotation: self.rotation,
        }
    }

    /// Move to a 1-based page. Returns false if out of range or unchanged.
    pub fn go_to(&mut self, page: u32) -> bool {
        if page == 0 || page > self.page_count || page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to(self.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to(self.page.saturating_sub(1))
    }

    /// Set the zoom, clamped. Returns whether it changed.
    pub fn set_zoom(&mut self, scale: f32) -> bool {
        let scale = clamp_zoom(scale);
        if (scale - self.zoom).abs() < f32::EPSILON {
            return false;
        }
        self.zoom = scale;
        true
    }

    pub fn zoom_by(&mut self, delta: f32) -> bool {
        self.set_zoom(self.zoom + delta)
    }

    pub fn rotate(&mut self) {
        self.rotation = self.rotation.next();
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Annotations of the open document plus their history and selection
#[derive(Clone, Debug)]
pub struct AnnotationState {
    pub annotations: AnnotationSet,
    pub history: History,
    pub selected: Option<AnnotationId>,
    next_id: u64,
}

impl AnnotationState {
    pub fn new(history_capacity: usize) -> Self {
        let annotations = AnnotationSet::new();
        Self {
            history: History::new(history_capacity, annotations.clone()),
            annotations,
            selected: None,
            next_id: 1,
        }
    }

    /// Identifier for a new annotation. Never reused within a document.
    pub fn allocate_id(&mut self) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replace the annotation set and record it as one history step
    pub fn commit(&mut self, next: AnnotationSet) {
        self.annotations = next;
        self.history.record(self.annotations.clone());
    }

    /// Replace the annotation set without recording (drag in progress)
    pub fn preview(&mut self, next: AnnotationSet) {
        self.annotations = next;
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.annotations = snapshot;
                self.selected = None;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.annotations = snapshot;
                self.selected = None;
                true
            }
            None => false,
        }
    }

    pub fn selected_annotation(&self) -> Option<&Annotation> {
        self.selected.and_then(|id| self.annotations.get(id))
    }
}

impl Default for AnnotationState {
    fn default() -> Self {
        Self::new(crate::annotations::history::DEFAULT_CAPACITY)
    }
}

/// Interaction controller state
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    /// Freehand stroke in progress
    Drawing { tool: StrokeTool, points: Vec<Point> },
    /// Waiting for the text prompt to answer
    PlacingText { at: Point },
    /// Move-drag in progress
    Dragging(DragState),
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }
}

/// The open document and everything that belongs to it
pub struct DocumentSession {
    pub document: Arc<dyn Document>,
    /// File name the document was opened from
    pub name: String,
    pub view: ViewState,
    pub annotations: AnnotationState,
    pub interaction: Interaction,
}

impl DocumentSession {
    pub fn new(
        document: Arc<dyn Document>,
        name: String,
        view: ViewState,
        history_capacity: usize,
    ) -> Self {
        Self {
            document,
            name,
            view,
            annotations: AnnotationState::new(history_capacity),
            interaction: Interaction::Idle,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.view.page()
    }

    /// Annotations of the current page, bottom to top
    pub fn page_annotations(&self) -> impl DoubleEndedIterator<Item = &Annotation> + '_ {
        self.annotations.annotations.on_page(self.view.page())
    }
}

/// Dismissible message for load and capture failures
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
}

/// Render failure of one page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageError {
    pub page: u32,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_is_clamped() {
        let mut view = ViewState::new(3);
        assert!(view.set_zoom(10.0));
        assert_eq!(view.zoom(), MAX_ZOOM);
        assert!(!view.zoom_by(0.25));
        assert!(view.set_zoom(0.1));
        assert_eq!(view.zoom(), MIN_ZOOM);
        assert_eq!(clamp_zoom(f32::NAN), 1.0);
        assert_eq!(clamp_zoom(1.75), 1.75);
    }

    #[test]
    fn rotation_wraps_after_four_turns() {
        let mut view = ViewState::new(1);
        for _ in 0..4 {
            view.rotate();
        }
        assert_eq!(view.rotation(), Rotation::Deg0);
        view.rotate();
        assert_eq!(view.viewport().rotation.degrees(), 90);
    }

    #[test]
    fn page_stays_in_range() {
        let mut view = ViewState::new(3);
        assert!(!view.previous_page());
        assert!(view.next_page());
        assert!(view.next_page());
        assert!(!view.next_page());
        assert_eq!(view.page(), 3);
        assert!(!view.go_to(0));
        assert!(!view.go_to(4));
        assert!(view.go_to(1));
    }

    #[test]
    fn new_document_keeps_zoom_and_rotation() {
        let mut view = ViewState::new(5);
        view.go_to(4);
        view.set_zoom(2.0);
        view.rotate();
        let next = view.for_document(2);
        assert_eq!(next.page(), 1);
        assert_eq!(next.page_count(), 2);
        assert_eq!(next.zoom(), 2.0);
        assert_eq!(next.rotation(), Rotation::Deg90);
    }

    #[test]
    fn undo_and_redo_clear_selection() {
        let mut state = AnnotationState::default();
        let id = state.allocate_id();
        let note = Annotation::new(
            id,
            1,
            crate::domain::AnnotationKind::Text(crate::domain::TextNote {
                at: Point::new(1.0, 20.0),
                text: "x".into(),
                color: crate::config::Color::rgb(0, 0, 0),
                size: 12.0,
            }),
        );
        state.commit(state.annotations.append(note));
        state.selected = Some(id);

        assert!(state.undo());
        assert!(state.annotations.is_empty());
        assert_eq!(state.selected, None);

        state.selected = Some(id);
        assert!(state.redo());
        assert_eq!(state.annotations.len(), 1);
        assert_eq!(state.selected, None);
        assert!(!state.redo());
    }

    #[test]
    fn ids_are_unique() {
        let mut state = AnnotationState::default();
        let a = state.allocate_id();
        let b = state.allocate_id();
        assert_ne!(a, b);
    }
}
