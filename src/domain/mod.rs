//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the application.
//! Types here have no rendering or document-engine dependencies.

pub mod annotation;
pub mod bounds;
pub mod geometry;
pub mod selection;

pub use annotation::*;
pub use bounds::compute_bounds;
pub use geometry::*;
pub use selection::*;
