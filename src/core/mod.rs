//! Core application module
//!
//! This module contains:
//! - The viewer that hosts the open document and its render pipeline

pub mod app;

pub use app::Viewer;
