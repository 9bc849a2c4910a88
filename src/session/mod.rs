//! Viewer session management module
//!
//! This module contains:
//! - View, annotation and interaction state of the open document
//! - Message types for viewer interactions
//! - Keyboard shortcut mapping

pub mod messages;
pub mod shortcuts;
pub mod state;

pub use messages::{Command, EditMsg, Msg, PointerMsg, TextMsg, ViewMsg};
pub use shortcuts::{Key, KeyOutcome, Modifiers, NamedKey, handle_key_event};
pub use state::{Banner, DocumentSession, Interaction, PageError, ViewState};
