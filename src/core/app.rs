//! The viewer: owns the open document, the drawing surfaces and the
//! render pipeline, and routes messages through the interaction controller.

use std::sync::Arc;
use std::time::Instant;

use crate::annotations::AnnotationSet;
use crate::annotations::handlers::{self, Effect};
use crate::capture::{self, CaptureArtifact};
use crate::config::ViewerConfig;
use crate::document::{DocumentEngine, EngineError};
use crate::domain::Tool;
use crate::error::ViewerError;
use crate::render::surface::rgba_from_pixmap;
use crate::render::{self, FinishedRender, FrameScheduler, PageRasterizer, RenderTicket, Surfaces};
use crate::session::messages::{Command, EditMsg, Msg, PointerMsg, TextMsg, ViewMsg};
use crate::session::shortcuts::{Key, KeyOutcome, Modifiers, handle_key_event};
use crate::session::state::{Banner, DocumentSession, Interaction, PageError, ViewState};

pub struct Viewer {
    config: ViewerConfig,
    engine: Arc<dyn DocumentEngine>,
    session: Option<DocumentSession>,
    tool: Tool,
    surfaces: Option<Surfaces>,
    rasterizer: PageRasterizer,
    scheduler: FrameScheduler,
    banner: Option<Banner>,
    page_error: Option<PageError>,
}

impl Viewer {
    pub fn new(config: ViewerConfig, engine: Arc<dyn DocumentEngine>) -> Self {
        let scheduler = FrameScheduler::new(config.frame_interval());
        Self {
            config,
            engine,
            session: None,
            tool: Tool::None,
            surfaces: None,
            rasterizer: PageRasterizer::new(),
            scheduler,
            banner: None,
            page_error: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&DocumentSession> {
        self.session.as_ref()
    }

    pub fn annotations(&self) -> Option<&AnnotationSet> {
        self.session.as_ref().map(|s| &s.annotations.annotations)
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Drawing layers, allocated once the first page has rendered
    pub fn surfaces(&self) -> Option<&Surfaces> {
        self.surfaces.as_ref()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Render error of the page currently shown, if any
    pub fn page_error(&self) -> Option<&PageError> {
        let page = self.session.as_ref()?.current_page();
        self.page_error.as_ref().filter(|err| err.page == page)
    }

    pub fn has_selection(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.annotations.selected.is_some())
    }

    pub fn is_repaint_pending(&self) -> bool {
        self.scheduler.is_dirty()
    }

    // ========================================================================
    // Document loading
    // ========================================================================

    /// Decode `bytes` and make them the open document.
    ///
    /// On failure the previously open document stays untouched and a banner
    /// is shown. On success the page is reset to 1 and annotations and history
    /// start empty; zoom and rotation carry over.
    pub async fn open(&mut self, bytes: Vec<u8>, name: impl Into<String>) -> Result<(), ViewerError> {
        let name = name.into();
        let engine = Arc::clone(&self.engine);
        let loaded = tokio::task::spawn_blocking(move || engine.load(&bytes))
            .await
            .unwrap_or_else(|e| Err(EngineError::Decode(format!("decoder task failed: {e}"))));

        let document = match loaded {
            Ok(document) => document,
            Err(source) => {
                let err = ViewerError::LoadFailure { name, source };
                self.report(&err);
                return Err(err);
            }
        };
        log::info!("Opened {name} ({} pages)", document.page_count());

        self.rasterizer.cancel();
        let view = match &self.session {
            Some(previous) => previous.view.for_document(document.page_count()),
            None => ViewState::new(document.page_count()),
        };
        self.session = Some(DocumentSession::new(
            document,
            name,
            view,
            self.config.history_capacity,
        ));
        self.banner = None;
        self.page_error = None;
        self.clear_live();
        self.scheduler.request();

        // Page failures are reported per page and do not fail the load.
        if let Err(err) = self.render_current_page().await {
            log::debug!("First page not shown after load: {err}");
        }
        Ok(())
    }

    // ========================================================================
    // Page rendering
    // ========================================================================

    /// Start rasterizing the current page, superseding any render in flight
    pub fn request_page_render(&mut self) -> Result<RenderTicket, ViewerError> {
        let session = self.session.as_ref().ok_or(ViewerError::NoDocument)?;
        Ok(self.rasterizer.request(
            Arc::clone(&session.document),
            session.view.page(),
            session.view.viewport(),
        ))
    }

    pub async fn finish_page_render(&mut self, ticket: RenderTicket) -> Result<(), ViewerError> {
        let finished = ticket.wait().await;
        self.apply_page_render(finished)
    }

    /// Paint a finished render if it is still current
    pub fn apply_page_render(&mut self, finished: FinishedRender) -> Result<(), ViewerError> {
        match self.rasterizer.accept(finished) {
            Ok(rendered) => {
                let Some(surfaces) = Surfaces::for_page(&rendered.image) else {
                    let (width, height) = rendered.image.dimensions();
                    let err = ViewerError::RenderFailure {
                        page: rendered.page,
                        reason: format!("cannot allocate {width}x{height} surfaces"),
                    };
                    self.report(&err);
                    return Err(err);
                };
                self.surfaces = Some(surfaces);
                if self.page_error.as_ref().is_some_and(|e| e.page == rendered.page) {
                    self.page_error = None;
                }
                self.repaint_now();
                Ok(())
            }
            Err(err) => {
                if matches!(err, ViewerError::RenderFailure { .. }) {
                    if let Some(surfaces) = &mut self.surfaces {
                        surfaces.page.fill(tiny_skia::Color::TRANSPARENT);
                    }
                    self.scheduler.request();
                }
                self.report(&err);
                Err(err)
            }
        }
    }

    pub async fn render_current_page(&mut self) -> Result<(), ViewerError> {
        let ticket = self.request_page_render()?;
        self.finish_page_render(ticket).await
    }

    // ========================================================================
    // Repaint
    // ========================================================================

    /// Paint the committed layer if a repaint is pending and the frame
    /// interval has elapsed. Returns whether a paint happened.
    pub fn on_frame(&mut self, now: Instant) -> bool {
        if !self.scheduler.should_paint(now) {
            return false;
        }
        self.paint_committed();
        self.scheduler.mark_painted(now);
        true
    }

    /// Paint the committed layer immediately
    pub fn repaint_now(&mut self) {
        self.paint_committed();
        self.scheduler.mark_painted(Instant::now());
    }

    fn paint_committed(&mut self) {
        let Some(surfaces) = &mut self.surfaces else {
            return;
        };
        let layer = &mut surfaces.annotations;
        let drawn = match &self.session {
            Some(session) => render::draw_committed(
                layer,
                session.page_annotations(),
                session.annotations.selected,
            ),
            None => {
                layer.fill(tiny_skia::Color::TRANSPARENT);
                0
            }
        };
        log::trace!("Painted {drawn} annotations");
    }

    fn paint_live(&mut self) {
        let (Some(session), Some(surfaces)) = (&self.session, &mut self.surfaces) else {
            return;
        };
        if let Interaction::Drawing { tool, points } = &session.interaction {
            let style = self.config.stroke_style(*tool);
            render::draw_live(&mut surfaces.live, points, style, *tool);
        }
    }

    fn clear_live(&mut self) {
        if let Some(surfaces) = &mut self.surfaces {
            surfaces.clear_live();
        }
    }

    fn apply_effect(&mut self, effect: Effect) -> Command {
        match effect {
            Effect::None => Command::None,
            Effect::Live => {
                self.paint_live();
                Command::None
            }
            Effect::Layer => {
                self.clear_live();
                self.scheduler.request();
                Command::None
            }
            Effect::PromptText(at) => Command::PromptText { at },
        }
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub fn update(&mut self, msg: Msg) -> Command {
        match msg {
            Msg::Pointer(pointer) => self.pointer(pointer),
            Msg::View(view) => self.view(view),
            Msg::Edit(edit) => self.edit(edit),
            Msg::Tool(tool) => self.select_tool(tool),
            Msg::Text(text) => self.text(text),
            Msg::DismissBanner => {
                self.banner = None;
                Command::None
            }
        }
    }

    /// Route a key press. `None` means the key is not ours.
    pub fn key_pressed(&mut self, key: &Key, modifiers: Modifiers) -> Option<Command> {
        match handle_key_event(key, modifiers, self.has_selection()) {
            KeyOutcome::Msg(msg) => Some(self.update(msg)),
            KeyOutcome::Suppress => Some(Command::None),
            KeyOutcome::Ignore => None,
        }
    }

    fn pointer(&mut self, pointer: PointerMsg) -> Command {
        let Some(session) = self.session.as_mut() else {
            return Command::None;
        };
        let effect = handlers::handle_pointer(session, self.tool, &self.config, pointer);
        self.apply_effect(effect)
    }

    fn view(&mut self, msg: ViewMsg) -> Command {
        let Some(session) = self.session.as_ref() else {
            return Command::None;
        };
        let mut view = session.view;
        let changed = match msg {
            ViewMsg::NextPage => view.next_page(),
            ViewMsg::PreviousPage => view.previous_page(),
            ViewMsg::GoToPage(page) => view.go_to(page),
            ViewMsg::ZoomIn => view.zoom_by(self.config.zoom_step),
            ViewMsg::ZoomOut => view.zoom_by(-self.config.zoom_step),
            ViewMsg::SetZoom(scale) => view.set_zoom(scale),
            ViewMsg::Rotate => {
                view.rotate();
                true
            }
        };
        if !changed {
            return Command::None;
        }

        self.settle_interaction();
        if let Some(session) = self.session.as_mut() {
            session.view = view;
            session.annotations.selected = None;
        }
        log::debug!(
            "View: page {}/{}, zoom {:.2}, rotation {}",
            view.page(),
            view.page_count(),
            view.zoom(),
            view.rotation().degrees()
        );
        self.clear_live();
        self.scheduler.request();
        Command::RenderPage
    }

    fn edit(&mut self, msg: EditMsg) -> Command {
        if matches!(msg, EditMsg::DeleteSelected | EditMsg::ClearPage) {
            self.settle_interaction();
        }
        let Some(session) = self.session.as_mut() else {
            return Command::None;
        };
        let effect = match msg {
            EditMsg::Undo => handlers::undo(session),
            EditMsg::Redo => handlers::redo(session),
            EditMsg::DeleteSelected => handlers::delete_selected(session),
            EditMsg::ClearPage => handlers::clear_page(session),
        };
        self.apply_effect(effect)
    }

    /// Selecting the active tool deactivates it. Erase is an immediate
    /// clear-page and never stays active.
    fn select_tool(&mut self, requested: Tool) -> Command {
        let next = self.tool.toggle(requested);
        self.settle_interaction();
        if next != Tool::Move {
            if let Some(session) = self.session.as_mut() {
                if session.annotations.selected.take().is_some() {
                    self.scheduler.request();
                }
            }
        }

        if next == Tool::Erase {
            self.tool = Tool::None;
            return self.edit(EditMsg::ClearPage);
        }
        log::debug!("Tool changed from {:?} to {next:?}", self.tool);
        self.tool = next;
        Command::None
    }

    fn text(&mut self, msg: TextMsg) -> Command {
        let Some(session) = self.session.as_mut() else {
            return Command::None;
        };
        let effect = match msg {
            TextMsg::Confirm(text) => handlers::confirm_text(session, &self.config, &text),
            TextMsg::Cancel => handlers::cancel_text(session),
        };
        self.apply_effect(effect)
    }

    /// End whatever gesture is in progress as if the pointer left the canvas,
    /// and drop a pending text prompt
    fn settle_interaction(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let mut effect = handlers::handle_pointer(session, self.tool, &self.config, PointerMsg::Leave);
        if matches!(session.interaction, Interaction::PlacingText { .. }) {
            effect = handlers::cancel_text(session);
        }
        self.apply_effect(effect);
    }

    // ========================================================================
    // Capture
    // ========================================================================

    /// Flatten the current page and its annotations into a watermarked PNG.
    /// Annotation state and the surfaces are left untouched.
    pub async fn capture(&mut self) -> Result<CaptureArtifact, ViewerError> {
        let result = self.capture_inner().await;
        if let Err(err) = &result {
            self.report(err);
        }
        result
    }

    async fn capture_inner(&mut self) -> Result<CaptureArtifact, ViewerError> {
        let (name, page) = match &self.session {
            Some(session) => (session.name.clone(), session.current_page()),
            None => return Err(ViewerError::NoDocument),
        };
        if self.scheduler.is_dirty() {
            self.repaint_now();
        }

        let surfaces = self
            .surfaces
            .as_ref()
            .ok_or_else(|| ViewerError::CaptureFailure(format!("page {page} has not been rendered")))?;
        let composed =
            capture::compose(&surfaces.page, &surfaces.annotations, &self.config.watermark)?;
        let image = rgba_from_pixmap(&composed);
        let (width, height) = image.dimensions();
        let png = capture::encode_png(image).await?;
        let file_name = capture::export_file_name(&name, page);
        log::info!("Captured {file_name} ({width}x{height})");
        Ok(CaptureArtifact {
            file_name,
            width,
            height,
            png,
        })
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Turn a failure into user-visible state
    fn report(&mut self, err: &ViewerError) {
        match err {
            ViewerError::RenderCancelled => log::debug!("{err}"),
            ViewerError::RenderFailure { page, .. } => {
                log::warn!("{err}");
                self.page_error = Some(PageError {
                    page: *page,
                    message: err.to_string(),
                });
            }
            ViewerError::LoadFailure { .. }
            | ViewerError::CaptureFailure(_)
            | ViewerError::NoDocument => {
                log::warn!("{err}");
                self.banner = Some(Banner {
                    message: err.to_string(),
                });
            }
        }
    }
}
