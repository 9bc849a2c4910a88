//! Message types for the viewer session
//!
//! This module contains:
//! - Msg enum with nested sub-enums for organized message handling
//! - Command enum for follow-up work the host has to perform

use crate::domain::{Point, Tool};

// ============================================================================
// Pointer Types
// ============================================================================

/// Pointer (mouse, pen or touch) events in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMsg {
    Down(Point),
    Move(Point),
    Up(Point),
    /// Pointer left the canvas or the gesture was cancelled
    Leave,
    /// Secondary click; the default context menu is suppressed
    ContextMenu,
}

// ============================================================================
// View Types
// ============================================================================

/// Page navigation, zoom and rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMsg {
    NextPage,
    PreviousPage,
    /// Jump to a 1-based page
    GoToPage(u32),
    ZoomIn,
    ZoomOut,
    /// Set an absolute zoom scale (clamped)
    SetZoom(f32),
    /// Rotate 90 degrees clockwise
    Rotate,
}

// ============================================================================
// Edit Types
// ============================================================================

/// Immediate editing actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMsg {
    Undo,
    Redo,
    /// Delete the selected annotation
    DeleteSelected,
    /// Remove every annotation of the current page
    ClearPage,
}

/// Answer from the text-entry prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMsg {
    Confirm(String),
    Cancel,
}

// ============================================================================
// Top-level Message
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Pointer(PointerMsg),
    View(ViewMsg),
    Edit(EditMsg),
    /// Select a tool (selecting the active tool deactivates it)
    Tool(Tool),
    Text(TextMsg),
    DismissBanner,
}

/// Follow-up the host must perform after `Viewer::update`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Command {
    #[default]
    None,
    /// Open the text-entry prompt at this canvas point, then answer with `TextMsg`
    PromptText { at: Point },
    /// The viewport changed; call `Viewer::render_current_page`
    RenderPage,
}

// ============================================================================
// Helper constructors
// ============================================================================

impl Msg {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::Pointer(PointerMsg::Down(Point::new(x, y)))
    }
    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::Pointer(PointerMsg::Move(Point::new(x, y)))
    }
    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::Pointer(PointerMsg::Up(Point::new(x, y)))
    }
    pub fn pointer_leave() -> Self {
        Self::Pointer(PointerMsg::Leave)
    }
    pub fn context_menu() -> Self {
        Self::Pointer(PointerMsg::ContextMenu)
    }

    pub fn next_page() -> Self {
        Self::View(ViewMsg::NextPage)
    }
    pub fn previous_page() -> Self {
        Self::View(ViewMsg::PreviousPage)
    }
    pub fn go_to_page(page: u32) -> Self {
        Self::View(ViewMsg::GoToPage(page))
    }
    pub fn zoom_in() -> Self {
        Self::View(ViewMsg::ZoomIn)
    }
    pub fn zoom_out() -> Self {
        Self::View(ViewMsg::ZoomOut)
    }
    pub fn set_zoom(scale: f32) -> Self {
        Self::View(ViewMsg::SetZoom(scale))
    }
    pub fn rotate() -> Self {
        Self::View(ViewMsg::Rotate)
    }

    pub fn undo() -> Self {
        Self::Edit(EditMsg::Undo)
    }
    pub fn redo() -> Self {
        Self::Edit(EditMsg::Redo)
    }
    pub fn delete_selected() -> Self {
        Self::Edit(EditMsg::DeleteSelected)
    }
    pub fn clear_page() -> Self {
        Self::Edit(EditMsg::ClearPage)
    }

    pub fn confirm_text(text: impl Into<String>) -> Self {
        Self::Text(TextMsg::Confirm(text.into()))
    }
    pub fn cancel_text() -> Self {
        Self::Text(TextMsg::Cancel)
    }
}
