//! Failures surfaced at the viewer's operation boundary

use thiserror::Error;

use crate::document::EngineError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// The document could not be decoded; nothing from it is kept
    #[error("Could not open {name}: {source}")]
    LoadFailure { name: String, source: EngineError },

    /// One page failed to rasterize; other pages and annotations are unaffected
    #[error("Page {page} could not be rendered: {reason}")]
    RenderFailure { page: u32, reason: String },

    /// A newer page render superseded this one
    #[error("Page render was superseded")]
    RenderCancelled,

    /// Compositing or encoding the export image failed
    #[error("Capture failed: {0}")]
    CaptureFailure(String),

    #[error("No document is open")]
    NoDocument,
}

impl ViewerError {
    /// Whether the user should be told about this failure
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, ViewerError::RenderCancelled)
    }
}
