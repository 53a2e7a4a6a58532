//! Session persistence on top of a string key-value store.
//!
//! Layout:
//!
//! | key                      | value                         |
//! |--------------------------|-------------------------------|
//! | `buddyai-settings`       | [`Settings`] JSON             |
//! | `buddyai-chat-history`   | `Vec<`[`HistoryEntry`]`>` JSON |
//! | `buddyai-last-chat-id`   | id of the current chat        |
//! | `buddyai-chat-<id>`      | [`Session`] JSON              |

mod kv;
mod types;

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub use kv::{KeyValueStore, MemoryStore, SqliteStore};
pub use types::{
    HistoryEntry, Message, NEW_CHAT_TITLE, Session, Settings, Theme, generate_chat_id,
    is_valid_chat_id,
};

pub const SETTINGS_KEY: &str = "buddyai-settings";
pub const HISTORY_KEY: &str = "buddyai-chat-history";
pub const LAST_CHAT_KEY: &str = "buddyai-last-chat-id";
pub const CHAT_KEY_PREFIX: &str = "buddyai-chat-";

/// Number of sessions kept in the history index.
pub const HISTORY_LIMIT: usize = 50;

pub fn chat_key(id: &str) -> String {
    format!("{CHAT_KEY_PREFIX}{id}")
}

/// Reads and writes sessions, the history index and settings.
pub struct SessionStore<S> {
    kv: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub const fn new(kv: S) -> Self {
        Self { kv }
    }

    pub const fn kv(&self) -> &S {
        &self.kv
    }

    /// Loads settings; missing or unreadable records yield the defaults.
    pub fn load_settings(&self) -> Result<Settings> {
        Ok(self.read_json(SETTINGS_KEY)?.unwrap_or_default())
    }

    /// Returns `true` once settings have been written at least once.
    pub fn has_settings(&self) -> Result<bool> {
        Ok(self.kv.get(SETTINGS_KEY)?.is_some())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.write_json(SETTINGS_KEY, settings)
    }

    /// Loads the history index in stored order.
    pub fn load_history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.read_json(HISTORY_KEY)?.unwrap_or_default())
    }

    pub fn save_history(&self, history: &[HistoryEntry]) -> Result<()> {
        self.write_json(HISTORY_KEY, &history)
    }

    /// History entries, most recently modified first, at most `limit` of them.
    pub fn sorted_history(&self, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
        let mut history = self.load_history()?;
        sort_by_recency(&mut history);
        if let Some(limit) = limit {
            history.truncate(limit);
        }
        Ok(history)
    }

    pub fn load_session(&self, id: &str) -> Result<Option<Session>> {
        self.read_json(&chat_key(id))
    }

    /// Writes the session blob and marks it as the last opened chat.
    pub fn save_session(&self, session: &Session) -> Result<()> {
        self.write_json(&chat_key(&session.id), session)?;
        self.kv.set(LAST_CHAT_KEY, &session.id)?;
        debug!(id = %session.id, messages = session.messages.len(), "saved session");
        Ok(())
    }

    pub fn last_chat_id(&self) -> Result<Option<String>> {
        self.kv.get(LAST_CHAT_KEY)
    }

    pub fn set_last_chat_id(&self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => self.kv.set(LAST_CHAT_KEY, id),
            None => self.kv.remove(LAST_CHAT_KEY),
        }
    }

    /// Upserts the session's entry in the history index.
    ///
    /// Sessions without messages are not recorded. The index is kept sorted
    /// by recency and capped at [`HISTORY_LIMIT`]; evicted sessions lose
    /// their blobs too. Returns the ids that were evicted.
    pub fn record(&self, session: &Session) -> Result<Vec<String>> {
        self.record_keeping(session, None)
    }

    /// Like [`record`](Self::record), but the entry with id `keep` is never
    /// evicted; the least recent of the others goes instead.
    pub fn record_keeping(&self, session: &Session, keep: Option<&str>) -> Result<Vec<String>> {
        if session.messages.is_empty() {
            return Ok(Vec::new());
        }

        let mut history = self.load_history()?;
        let entry = HistoryEntry::from_session(session);

        if let Some(existing) = history.iter_mut().find(|h| h.id == session.id) {
            *existing = entry;
        } else {
            history.insert(0, entry);
        }

        sort_by_recency(&mut history);

        let mut evicted = Vec::new();
        while history.len() > HISTORY_LIMIT {
            let Some(pos) = history
                .iter()
                .rposition(|h| Some(h.id.as_str()) != keep)
            else {
                break;
            };
            evicted.push(history.remove(pos).id);
        }

        for id in &evicted {
            debug!(%id, "evicting session from history");
            self.kv.remove(&chat_key(id))?;
        }

        self.save_history(&history)?;
        Ok(evicted)
    }

    /// Saves the session and records it in the history index.
    pub fn persist(&self, session: &Session) -> Result<()> {
        self.save_session(session)?;
        self.record(session)?;
        Ok(())
    }

    /// Removes a session blob and its history entry.
    ///
    /// Returns `false` if the session was unknown.
    pub fn delete_session(&self, id: &str) -> Result<bool> {
        let mut history = self.load_history()?;
        let before = history.len();
        history.retain(|h| h.id != id);
        let in_history = history.len() != before;

        let existed = self.kv.get(&chat_key(id))?.is_some();
        self.kv.remove(&chat_key(id))?;

        if in_history {
            self.save_history(&history)?;
        }
        if self.last_chat_id()?.as_deref() == Some(id) {
            self.kv.remove(LAST_CHAT_KEY)?;
        }

        Ok(existed || in_history)
    }

    /// Removes every session listed in the history index and empties it.
    ///
    /// Returns the number of sessions removed.
    pub fn clear_history(&self) -> Result<usize> {
        let history = self.load_history()?;
        for entry in &history {
            self.kv.remove(&chat_key(&entry.id))?;
        }
        self.save_history(&[])?;
        self.kv.remove(LAST_CHAT_KEY)?;
        Ok(history.len())
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(%key, error = %e, "ignoring unreadable record");
                Ok(None)
            }
        }
    }

    fn write_json<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize record '{key}'"))?;
        self.kv.set(key, &json)
    }
}

fn sort_by_recency(history: &mut [HistoryEntry]) {
    history.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
}
