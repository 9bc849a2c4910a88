//! Annotation engine
//!
//! This module provides:
//! - The immutable annotation set (store)
//! - The bounded undo/redo history of snapshots
//! - Topmost-first hit testing
//! - The interaction controller that turns pointer input into edits (handlers.rs)

pub mod handlers;
pub mod history;
pub mod store;

pub use handlers::Effect;
pub use history::{History, HistoryEntry};
pub use hit_test::hit_test;
pub use store::AnnotationSet;
