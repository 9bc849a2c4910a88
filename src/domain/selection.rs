//! Tool selection and drag state for the annotation canvas

use serde::{Deserialize, Serialize};

use super::annotation::AnnotationId;
use super::geometry::Point;

/// Active annotation tool. At most one tool is active at a time.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    None,
    Ink,
    Text,
    Erase,
    Move,
    Highlight,
}

impl Tool {
    /// Tool that becomes active when `requested` is selected while `self` is active.
    ///
    /// Selecting the active tool again deactivates it.
    pub fn toggle(self, requested: Tool) -> Tool {
        if self == requested {
            Tool::None
        } else {
            requested
        }
    }

    /// Stroke kind produced by this tool, if it draws freehand strokes
    pub fn stroke_tool(self) -> Option<StrokeTool> {
        match self {
            Tool::Ink => Some(StrokeTool::Ink),
            Tool::Highlight => Some(StrokeTool::Highlight),
            _ => None,
        }
    }
}

/// Freehand stroke tools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeTool {
    Ink,
    Highlight,
}

/// Drag state while a move-drag is in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    /// Annotation being moved
    pub id: AnnotationId,
    /// Pointer position minus the annotation anchor at drag start
    pub offset: Point,
    /// Whether any translation has been applied since the drag started
    pub moved: bool,
}
