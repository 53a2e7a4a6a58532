use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::chat::{ExportFormat, render_transcript, transfer, ui};
use crate::store::{SessionStore, SqliteStore};
use crate::ui::{Style, confirm};

/// Chats listed by `buddy history` without `--all`.
const RECENT_LIMIT: usize = 10;

fn open_store() -> Result<SessionStore<SqliteStore>> {
    Ok(SessionStore::new(SqliteStore::new()?))
}

/// Uses `id`, or the last opened chat when none is given.
fn chat_id_or_last(store: &SessionStore<SqliteStore>, id: Option<String>) -> Result<String> {
    match id {
        Some(id) => Ok(id),
        None => store
            .last_chat_id()?
            .context("No chat has been opened yet. Pass a chat id (see 'buddy history')."),
    }
}

pub fn print_history(all: bool) -> Result<()> {
    let store = open_store()?;
    let history = store.sorted_history((!all).then_some(RECENT_LIMIT))?;
    let current = store.last_chat_id()?.unwrap_or_default();

    ui::print_history(&history, &current);
    Ok(())
}

pub fn show_chat(id: Option<String>) -> Result<()> {
    let store = open_store()?;
    let id = chat_id_or_last(&store, id)?;
    let Some(session) = store.load_session(&id)? else {
        bail!("Chat not found: {id}");
    };
    let theme = store.load_settings()?.theme;

    ui::print_header(session.display_title(), &session.model);
    ui::print_transcript(&render_transcript(&session), theme);
    Ok(())
}

pub fn export_chat(id: Option<String>, output: Option<PathBuf>, format: ExportFormat) -> Result<()> {
    let store = open_store()?;
    let id = chat_id_or_last(&store, id)?;
    let path = transfer::export_session(&store, &id, output.as_deref(), format)?;

    println!(
        "{} Chat exported to {}",
        Style::success("✓"),
        Style::value(path.display())
    );
    Ok(())
}

pub fn import_chat(file: Option<&Path>) -> Result<()> {
    let store = open_store()?;
    let session = transfer::import_session(&store, file)?;

    println!(
        "{} Imported chat: {} {}",
        Style::success("✓"),
        Style::value(session.display_title()),
        Style::secondary(format!("({})", session.id))
    );
    Ok(())
}

pub fn delete_chat(id: &str, yes: bool) -> Result<()> {
    let store = open_store()?;
    if !yes && !confirm(&format!("Delete chat {id}?"))? {
        return Ok(());
    }

    if !store.delete_session(id)? {
        bail!("Chat not found: {id}");
    }
    println!("{} Chat deleted from history", Style::success("✓"));
    Ok(())
}

pub fn clear_history(yes: bool) -> Result<()> {
    let store = open_store()?;
    if !yes && !confirm("Delete ALL chat history? This cannot be undone.")? {
        return Ok(());
    }

    let removed = store.clear_history()?;
    println!(
        "{} All chat history cleared ({removed} chats)",
        Style::success("✓")
    );
    Ok(())
}
