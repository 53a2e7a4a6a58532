//! Exporting sessions to files and importing them back.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::info;

use super::view::{Author, render_transcript};
use crate::format::{escape_html, render_html};
use crate::fs::{atomic_write, sanitize_file_name};
use crate::input::read_chat_file;
use crate::store::{KeyValueStore, Session, SessionStore, is_valid_chat_id};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Html,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
        }
    }
}

/// `buddyai-chat-<title>.<ext>`, falling back to the id for untitled chats.
pub fn export_file_name(session: &Session, format: ExportFormat) -> String {
    let title = session.title.trim();
    let stem = if title.is_empty() {
        session.id.as_str()
    } else {
        title
    };
    format!(
        "buddyai-chat-{}.{}",
        sanitize_file_name(stem),
        format.extension()
    )
}

pub fn export_json(session: &Session) -> Result<String> {
    serde_json::to_string_pretty(session).context("Failed to serialize chat")
}

/// Renders the session as a standalone HTML page.
pub fn export_html(session: &Session) -> String {
    let title = escape_html(session.display_title());
    let mut body = String::new();

    for bubble in render_transcript(session) {
        let class = match bubble.author {
            Author::User => "user",
            Author::Bot => "bot",
        };
        body.push_str(&format!(
            "<div class=\"message {class}\" data-message-id=\"{}\">\
             <div class=\"message-content\">{}</div>\
             <div class=\"message-time\">{}</div></div>\n",
            bubble.message_id,
            render_html(&bubble.blocks),
            bubble.time
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n"
    )
}

/// Parses an exported chat and checks it can be stored.
pub fn parse_export(json: &str) -> Result<Session> {
    let mut session: Session =
        serde_json::from_str(json).context("File is not a valid chat export")?;

    if !is_valid_chat_id(&session.id) {
        bail!("Chat file has an invalid id: '{}'", session.id);
    }
    if session.title.trim().is_empty() {
        session.title = session.generate_title();
    }
    Ok(session)
}

/// Writes a stored session to `destination`.
///
/// A directory destination gets the default file name; `None` means the
/// current directory. Returns the path written.
pub fn export_session<S: KeyValueStore>(
    store: &SessionStore<S>,
    id: &str,
    destination: Option<&Path>,
    format: ExportFormat,
) -> Result<PathBuf> {
    let session = store
        .load_session(id)?
        .with_context(|| format!("Chat not found: {id}"))?;

    let path = match destination {
        Some(p) if !p.is_dir() => p.to_path_buf(),
        Some(dir) => dir.join(export_file_name(&session, format)),
        None => PathBuf::from(export_file_name(&session, format)),
    };

    let content = match format {
        ExportFormat::Json => export_json(&session)?,
        ExportFormat::Html => export_html(&session),
    };
    atomic_write(&path, &content)?;

    info!(id, path = %path.display(), "exported chat");
    Ok(path)
}

/// Reads an exported chat and records it in the history index.
///
/// A session with the same id is overwritten. The import does not become
/// the current chat, and never pushes the current chat out of a full
/// history. An import older than everything in a full history is stamped
/// as modified now so it is kept.
pub fn import_session<S: KeyValueStore>(
    store: &SessionStore<S>,
    path: Option<&Path>,
) -> Result<Session> {
    let json = read_chat_file(path)?;
    let mut session = parse_export(&json)?;
    if session.messages.is_empty() {
        bail!("Chat file has no messages");
    }

    let current = store.last_chat_id()?;
    store.save_session(&session)?;
    let evicted = store.record_keeping(&session, current.as_deref())?;
    if evicted.contains(&session.id) {
        info!(id = %session.id, "imported chat predates full history; marking it recent");
        session.last_modified = Utc::now();
        store.save_session(&session)?;
        store.record_keeping(&session, current.as_deref())?;
    }
    // saving moves the last-chat marker
    store.set_last_chat_id(current.as_deref())?;

    info!(id = %session.id, messages = session.messages.len(), "imported chat");
    Ok(session)
}
