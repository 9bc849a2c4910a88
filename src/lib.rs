//! Document page viewer with an annotation layer
//!
//! Pages come from a [`document::DocumentEngine`]; ink, highlighter and text
//! annotations are kept in an immutable [`annotations::AnnotationSet`] with a
//! bounded undo history and drawn with tiny-skia on top of the page.

pub mod annotations;
pub mod capture;
pub mod config;
pub mod core;
pub mod document;
pub mod domain;
pub mod error;
pub mod render;
pub mod script;
pub mod session;

pub use crate::core::Viewer;
pub use config::ViewerConfig;
pub use error::ViewerError;
