//! Page rasterization adapter
//!
//! Each request bumps a generation counter and aborts the previous task.
//! Aborting is best-effort (a blocking render that already started runs to
//! completion), so results are matched against the current generation when
//! they arrive and stale ones are dropped as `RenderCancelled`.

use std::sync::Arc;

use image::RgbaImage;
use tokio::task::{AbortHandle, JoinError, JoinHandle};

use crate::document::{Document, EngineError, Viewport};
use crate::error::ViewerError;

/// A page rasterized at a known viewport
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub page: u32,
    pub viewport: Viewport,
    pub image: RgbaImage,
}

/// An outstanding page render
#[derive(Debug)]
pub struct RenderTicket {
    generation: u64,
    page: u32,
    viewport: Viewport,
    handle: JoinHandle<Result<RgbaImage, EngineError>>,
}

impl RenderTicket {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Wait for the engine. The outcome still has to be accepted by the
    /// rasterizer that issued the ticket.
    pub async fn wait(self) -> FinishedRender {
        let result = self.handle.await;
        FinishedRender {
            generation: self.generation,
            page: self.page,
            viewport: self.viewport,
            result,
        }
    }
}

/// Engine result of a ticket, not yet checked for staleness
#[derive(Debug)]
pub struct FinishedRender {
    generation: u64,
    page: u32,
    viewport: Viewport,
    result: Result<Result<RgbaImage, EngineError>, JoinError>,
}

#[derive(Debug, Default)]
pub struct PageRasterizer {
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl PageRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start rendering `page`, cancelling whatever was in flight
    pub fn request(
        &mut self,
        document: Arc<dyn Document>,
        page: u32,
        viewport: Viewport,
    ) -> RenderTicket {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);
        log::debug!(
            "Rendering page {page} at {:.2}x, {} degrees (generation {})",
            viewport.scale,
            viewport.rotation.degrees(),
            self.generation
        );

        let handle = tokio::task::spawn_blocking(move || document.render_page(page, viewport));
        self.in_flight = Some(handle.abort_handle());
        RenderTicket {
            generation: self.generation,
            page,
            viewport,
            handle,
        }
    }

    /// Invalidate the outstanding request, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            self.generation = self.generation.wrapping_add(1);
        }
    }

    /// Whether a render is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Check a finished render against the current generation
    pub fn accept(&mut self, finished: FinishedRender) -> Result<RenderedPage, ViewerError> {
        let FinishedRender {
            generation,
            page,
            viewport,
            result,
        } = finished;

        if generation != self.generation {
            log::debug!("Dropping stale render of page {page} (generation {generation})");
            return Err(ViewerError::RenderCancelled);
        }
        self.in_flight = None;

        match result {
            Ok(Ok(image)) => Ok(RenderedPage {
                page,
                viewport,
                image,
            }),
            Ok(Err(err)) => Err(ViewerError::RenderFailure {
                page,
                reason: err.to_string(),
            }),
            Err(err) if err.is_cancelled() => Err(ViewerError::RenderCancelled),
            Err(err) => Err(ViewerError::RenderFailure {
                page,
                reason: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Rotation;
    use crate::document::testing::SolidDocument;

    fn document(pages: u32) -> Arc<dyn Document> {
        Arc::new(SolidDocument::new(pages))
    }

    #[tokio::test]
    async fn renders_requested_page() {
        let mut rasterizer = PageRasterizer::new();
        let viewport = Viewport {
            scale: 1.5,
            rotation: Rotation::Deg90,
        };
        let ticket = rasterizer.request(document(3), 2, viewport);
        assert!(rasterizer.is_busy());

        let rendered = rasterizer.accept(ticket.wait().await).unwrap();
        assert_eq!(rendered.page, 2);
        assert_eq!(rendered.image.dimensions(), (120, 180));
        assert_eq!(
            rendered.image.get_pixel(0, 0).0,
            SolidDocument::page_color(2)
        );
        assert!(!rasterizer.is_busy());
    }

    #[tokio::test]
    async fn superseded_render_is_discarded() {
        let mut rasterizer = PageRasterizer::new();
        let doc = document(3);
        let first = rasterizer.request(doc.clone(), 1, Viewport::default());
        let second = rasterizer.request(doc, 2, Viewport::default());

        // The stale result is dropped even though it may have finished.
        let stale = first.wait().await;
        assert_eq!(
            rasterizer.accept(stale).unwrap_err(),
            ViewerError::RenderCancelled
        );

        let rendered = rasterizer.accept(second.wait().await).unwrap();
        assert_eq!(rendered.page, 2);
    }

    #[tokio::test]
    async fn cancel_invalidates_outstanding_ticket() {
        let mut rasterizer = PageRasterizer::new();
        let ticket = rasterizer.request(document(1), 1, Viewport::default());
        rasterizer.cancel();
        assert!(!rasterizer.is_busy());
        assert_eq!(
            rasterizer.accept(ticket.wait().await).unwrap_err(),
            ViewerError::RenderCancelled
        );
    }

    #[tokio::test]
    async fn engine_failure_is_a_render_failure() {
        let mut rasterizer = PageRasterizer::new();
        let ticket = rasterizer.request(document(2), 5, Viewport::default());
        match rasterizer.accept(ticket.wait().await) {
            Err(ViewerError::RenderFailure { page, reason }) => {
                assert_eq!(page, 5);
                assert!(reason.contains("out of range"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
