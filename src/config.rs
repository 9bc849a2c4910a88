//! Configuration persistence for pagemark settings

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::StrokeTool;

/// RGBA color, stored in config files as a `#rrggbb` or `#rrggbbaa` string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() || (digits.len() != 6 && digits.len() != 8) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let a = if digits.len() == 8 { channel(6)? } else { 255 };
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Color and width used for new strokes of one tool
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
}

/// Save location for captured pages (Pictures or Documents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

impl SaveLocation {
    /// Resolve the directory captures are written to
    pub fn export_dir(self) -> Option<PathBuf> {
        match self {
            SaveLocation::Pictures => {
                dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            }
            SaveLocation::Documents => {
                dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            }
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Style for new ink strokes
    #[serde(default = "default_ink")]
    pub ink: StrokeStyle,
    /// Style for new highlighter strokes
    #[serde(default = "default_highlight")]
    pub highlight: StrokeStyle,
    /// Color for new text notes
    #[serde(default = "default_text_color")]
    pub text_color: Color,
    /// Font size for new text notes, in canvas pixels
    #[serde(default = "default_text_size")]
    pub text_size: f32,
    /// Watermark drawn on every captured page
    #[serde(default = "default_watermark")]
    pub watermark: String,
    /// Maximum number of undo snapshots kept
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Zoom increment for zoom in/out
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,
    /// Minimum time between two annotation-layer repaints
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Where captures are written
    #[serde(default)]
    pub save_location: SaveLocation,
}

fn default_ink() -> StrokeStyle {
    StrokeStyle {
        color: Color::rgb(0xef, 0x44, 0x44),
        width: 3.0,
    }
}

fn default_highlight() -> StrokeStyle {
    StrokeStyle {
        color: Color::rgb(0xfa, 0xcc, 0x15),
        width: 20.0,
    }
}

fn default_text_color() -> Color {
    Color::rgb(0x11, 0x18, 0x27)
}

fn default_text_size() -> f32 {
    16.0
}

fn default_watermark() -> String {
    "Annotated with Pagemark".to_string()
}

fn default_history_capacity() -> usize {
    crate::annotations::history::DEFAULT_CAPACITY
}

fn default_zoom_step() -> f32 {
    0.25
}

fn default_frame_interval_ms() -> u64 {
    16
}

impl ViewerConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "pagemark";

    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {err:#}");
        }
    }

    /// Style for new strokes of `tool`
    pub fn stroke_style(&self, tool: StrokeTool) -> StrokeStyle {
        match tool {
            StrokeTool::Ink => self.ink,
            StrokeTool::Highlight => self.highlight,
        }
    }

    /// Minimum time between two annotation-layer repaints
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            ink: default_ink(),
            highlight: default_highlight(),
            text_color: default_text_color(),
            text_size: default_text_size(),
            watermark: default_watermark(),
            history_capacity: default_history_capacity(),
            zoom_step: default_zoom_step(),
            frame_interval_ms: default_frame_interval_ms(),
            save_location: SaveLocation::Pictures,
        }
    }
}
