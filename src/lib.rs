//! # buddy - AI coding assistant chat
//!
//! `buddy` is a terminal chat client for OpenAI-compatible chat-completion
//! endpoints (OpenRouter by default). Conversations are stored locally and
//! can be resumed, exported and imported.
//!
//! ## Features
//!
//! - **Interactive chat**: slash commands, code-block aware rendering
//! - **Local history**: the 50 most recent chats are kept in `SQLite`
//! - **Models**: preset models plus your own custom model ids
//! - **URL context**: links in a message can be fetched and shared with the model
//! - **Export/import**: chats as JSON (round-trippable) or HTML
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENROUTER_API_KEY=sk-or-...
//!
//! # Resume the last chat (or start one)
//! buddy
//!
//! # Start fresh with a specific model
//! buddy chat --new --model openai/gpt-4
//!
//! # List and export saved chats
//! buddy history
//! buddy export --format html
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/buddy/config.toml`:
//!
//! ```toml
//! [buddy]
//! provider = "openrouter"
//! model = "openai/gpt-4"
//! max_tokens = 4000
//! temperature = 0.7
//!
//! [providers.local]
//! endpoint = "http://localhost:11434"
//! models = ["ollama/llama3.2"]
//! ```

/// Interactive chat mode: controller, REPL, transcript view, export/import.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Chat-completion client for OpenAI-compatible APIs.
pub mod completion;

/// Configuration file management and provider settings.
pub mod config;

/// Message formatting: code fences, inline markup, HTML and terminal output.
pub mod format;

/// File system utilities.
pub mod fs;

/// Reading exported chat files from disk or stdin.
pub mod input;

/// Preset and custom model catalog.
pub mod models;

/// XDG-style path utilities for configuration and data.
pub mod paths;

/// Persistence of chats, history and settings.
pub mod store;

/// Terminal UI components (spinner, colors, prompts).
pub mod ui;
