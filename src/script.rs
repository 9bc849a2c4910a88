//! Headless replay of recorded viewer interactions
//!
//! A script is a JSON array of steps, for example:
//!
//! ```json
//! [
//!   { "action": "tool", "tool": "ink" },
//!   { "action": "stroke", "points": [{ "x": 10, "y": 10 }, { "x": 40, "y": 30 }] },
//!   { "action": "key", "chord": "Ctrl+Z" },
//!   { "action": "capture" }
//! ]
//! ```

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::core::Viewer;
use crate::domain::{Point, Tool};
use crate::error::ViewerError;
use crate::session::messages::{Command, Msg};
use crate::session::shortcuts::parse_chord;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    Tool { tool: Tool },
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Leave,
    /// Down on the first point, move through the rest, up on the last
    Stroke { points: Vec<Point> },
    /// Answer a pending text prompt
    Text { text: String },
    CancelText,
    Key { chord: String },
    NextPage,
    PreviousPage,
    GoToPage { page: u32 },
    ZoomIn,
    ZoomOut,
    Zoom { scale: f32 },
    Rotate,
    Undo,
    Redo,
    DeleteSelected,
    ClearPage,
    Capture,
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    let steps = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse script: {}", path.display()))?;
    Ok(steps)
}

/// Replays steps against a viewer, performing the follow-up commands a UI
/// host would perform
pub struct ScriptRunner<'a> {
    viewer: &'a mut Viewer,
    out_dir: PathBuf,
    prompt_open: bool,
    saved: Vec<PathBuf>,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(viewer: &'a mut Viewer, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            viewer,
            out_dir: out_dir.into(),
            prompt_open: false,
            saved: Vec::new(),
        }
    }

    /// Run every step in order. Returns the paths of written captures.
    pub async fn run(mut self, steps: &[ScriptStep]) -> Result<Vec<PathBuf>> {
        for (index, step) in steps.iter().enumerate() {
            log::debug!("Step {}: {step:?}", index + 1);
            self.step(step)
                .await
                .with_context(|| format!("Script step {} failed", index + 1))?;
            self.viewer.on_frame(Instant::now());
        }
        Ok(self.saved)
    }

    async fn step(&mut self, step: &ScriptStep) -> Result<()> {
        let msgs = match step {
            ScriptStep::Tool { tool } => vec![Msg::Tool(*tool)],
            ScriptStep::Down { x, y } => vec![Msg::pointer_down(*x, *y)],
            ScriptStep::Move { x, y } => vec![Msg::pointer_move(*x, *y)],
            ScriptStep::Up { x, y } => vec![Msg::pointer_up(*x, *y)],
            ScriptStep::Leave => vec![Msg::pointer_leave()],
            ScriptStep::Stroke { points } => stroke_messages(points)?,
            ScriptStep::Text { text } => {
                if !self.prompt_open {
                    bail!("no text prompt is open");
                }
                vec![Msg::confirm_text(text.clone())]
            }
            ScriptStep::CancelText => vec![Msg::cancel_text()],
            ScriptStep::Key { chord } => {
                let (key, modifiers) =
                    parse_chord(chord).with_context(|| format!("Unknown key chord: {chord}"))?;
                if let Some(command) = self.viewer.key_pressed(&key, modifiers) {
                    self.follow(command).await;
                }
                return Ok(());
            }
            ScriptStep::NextPage => vec![Msg::next_page()],
            ScriptStep::PreviousPage => vec![Msg::previous_page()],
            ScriptStep::GoToPage { page } => vec![Msg::go_to_page(*page)],
            ScriptStep::ZoomIn => vec![Msg::zoom_in()],
            ScriptStep::ZoomOut => vec![Msg::zoom_out()],
            ScriptStep::Zoom { scale } => vec![Msg::set_zoom(*scale)],
            ScriptStep::Rotate => vec![Msg::rotate()],
            ScriptStep::Undo => vec![Msg::undo()],
            ScriptStep::Redo => vec![Msg::redo()],
            ScriptStep::DeleteSelected => vec![Msg::delete_selected()],
            ScriptStep::ClearPage => vec![Msg::clear_page()],
            ScriptStep::Capture => {
                let artifact = self.viewer.capture().await?;
                let path = artifact.save_in(&self.out_dir)?;
                self.saved.push(path);
                return Ok(());
            }
        };

        for msg in msgs {
            if matches!(msg, Msg::Text(_)) {
                self.prompt_open = false;
            }
            let command = self.viewer.update(msg);
            self.follow(command).await;
        }
        Ok(())
    }

    async fn follow(&mut self, command: Command) {
        match command {
            Command::None => {}
            Command::PromptText { at } => {
                log::debug!("Text prompt at ({}, {})", at.x, at.y);
                self.prompt_open = true;
            }
            Command::RenderPage => match self.viewer.render_current_page().await {
                Ok(()) | Err(ViewerError::RenderCancelled) => {}
                Err(err) => log::warn!("{err}"),
            },
        }
    }
}

fn stroke_messages(points: &[Point]) -> Result<Vec<Msg>> {
    let Some((first, rest)) = points.split_first() else {
        bail!("stroke needs at least one point");
    };
    let mut msgs = Vec::with_capacity(points.len() + 1);
    msgs.push(Msg::pointer_down(first.x, first.y));
    msgs.extend(rest.iter().map(|p| Msg::pointer_move(p.x, p.y)));
    let last = rest.last().unwrap_or(first);
    msgs.push(Msg::pointer_up(last.x, last.y));
    Ok(msgs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::document::testing::SolidEngine;
    use std::sync::Arc;

    const SCRIPT: &str = r#"[
        { "action": "tool", "tool": "ink" },
        { "action": "stroke", "points": [{ "x": 10, "y": 10 }, { "x": 30, "y": 20 }, { "x": 50, "y": 30 }] },
        { "action": "tool", "tool": "text" },
        { "action": "down", "x": 20, "y": 60 },
        { "action": "text", "text": "Checked" },
        { "action": "next_page" },
        { "action": "tool", "tool": "highlight" },
        { "action": "stroke", "points": [{ "x": 5, "y": 40 }, { "x": 90, "y": 40 }] },
        { "action": "key", "chord": "Ctrl+Z" },
        { "action": "key", "chord": "Ctrl+Shift+Z" },
        { "action": "capture" }
    ]"#;

    async fn viewer(pages: u32) -> Viewer {
        let mut viewer = Viewer::new(
            ViewerConfig::default(),
            Arc::new(SolidEngine { failing_page: None }),
        );
        viewer
            .open(pages.to_string().into_bytes(), "notes.pdf")
            .await
            .unwrap();
        viewer
    }

    #[test]
    fn parses_steps() {
        let steps: Vec<ScriptStep> = serde_json::from_str(SCRIPT).unwrap();
        assert_eq!(steps.len(), 11);
        assert_eq!(steps[0], ScriptStep::Tool { tool: Tool::Ink });
        assert_eq!(steps[5], ScriptStep::NextPage);
    }

    #[tokio::test]
    async fn replays_script_and_writes_capture() {
        let dir = tempfile::tempdir().unwrap();
        let steps: Vec<ScriptStep> = serde_json::from_str(SCRIPT).unwrap();
        let mut viewer = viewer(2).await;

        let saved = ScriptRunner::new(&mut viewer, dir.path())
            .run(&steps)
            .await
            .unwrap();

        assert_eq!(saved, vec![dir.path().join("notes_page_2_annotated.png")]);
        assert!(saved[0].exists());
        let annotations = viewer.annotations().unwrap();
        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations.on_page(1).count(), 2);
        assert_eq!(annotations.on_page(2).count(), 1);
    }

    #[tokio::test]
    async fn text_without_prompt_is_an_error() {
        let mut viewer = viewer(1).await;
        let steps = vec![ScriptStep::Text {
            text: "orphan".into(),
        }];
        let err = ScriptRunner::new(&mut viewer, "unused")
            .run(&steps)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("no text prompt"));
    }

    #[test]
    fn empty_stroke_is_rejected() {
        assert!(stroke_messages(&[]).is_err());
        assert_eq!(stroke_messages(&[Point::new(1.0, 2.0)]).unwrap().len(), 2);
    }
}
