//! Interactive chat mode.
//!
//! [`ChatController`] holds the current session and applies user actions;
//! [`ChatRepl`] drives it from a terminal prompt with slash commands.

/// Slash command parsing and autocomplete.
pub mod command;
pub mod controller;
mod repl;
pub mod transfer;
pub mod ui;
pub mod view;

pub use controller::{
    ChatController, ControllerOptions, Notification, NotificationKind, SendOutcome, Stats,
};
pub use repl::{ChatRepl, SessionInfo};
pub use transfer::ExportFormat;
pub use view::{Author, Bubble, render_transcript};
