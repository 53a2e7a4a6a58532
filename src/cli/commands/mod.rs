//! Subcommand implementations.

/// Chat mode command handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Saved chat commands: history, show, export, import, delete.
pub mod history;

/// Model catalog command handler.
pub mod models;

/// Provider listing command handler.
pub mod providers;
