//! Render pipeline
//!
//! This module contains:
//! - Stroke smoothing and selection styling shared by every renderer
//! - Committed and live annotation renderers using tiny-skia
//! - The page rasterization adapter with stale-result dropping
//! - Repaint coalescing and the coordinated drawing surfaces

pub mod annotations;
pub mod geometry;
pub mod page;
pub mod scheduler;
pub mod surface;
pub mod text;

pub use annotations::{draw_annotation, draw_committed, draw_live};
pub use page::{FinishedRender, PageRasterizer, RenderTicket, RenderedPage};
pub use scheduler::FrameScheduler;
pub use surface::Surfaces;
