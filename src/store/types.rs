//! Persisted records: messages, sessions, history entries and settings.
//!
//! Every record serializes as camelCase JSON; the same shape is used for
//! exported chat files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::DEFAULT_MODEL;

/// Maximum characters kept in a history preview.
const PREVIEW_CHARS: usize = 100;
/// Words taken from the first message when deriving a title.
const TITLE_WORDS: usize = 5;
/// Characters a title may have before it is truncated.
const TITLE_CHARS: usize = 30;

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Millisecond timestamp, strictly increasing within a session.
    pub id: i64,
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    /// Model that was current when the message was added.
    pub model: String,
}

/// One persisted conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub token_count: u64,
}

impl Session {
    /// Creates an empty session with a freshly generated id.
    pub fn new(model: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::with_id(generate_chat_id(now), model, now)
    }

    pub fn with_id(id: impl Into<String>, model: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: NEW_CHAT_TITLE.to_string(),
            last_modified: now,
            messages: Vec::new(),
            model: model.into(),
            token_count: 0,
        }
    }

    /// Appends a message and returns a reference to it.
    ///
    /// The message id is the timestamp in milliseconds, bumped past the
    /// previous message so ids stay unique and ordered.
    pub fn push_message(
        &mut self,
        content: impl Into<String>,
        is_user: bool,
        model: impl Into<String>,
        now: DateTime<Utc>,
    ) -> &Message {
        let mut id = now.timestamp_millis();
        if let Some(last) = self.messages.last()
            && id <= last.id
        {
            id = last.id + 1;
        }

        self.messages.push(Message {
            id,
            content: content.into(),
            is_user,
            timestamp: now,
            model: model.into(),
        });
        self.title = self.generate_title();
        self.last_modified = now;

        &self.messages[self.messages.len() - 1]
    }

    /// Drops every message. This is the explicit "clear chat" reset.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.messages.clear();
        self.title = NEW_CHAT_TITLE.to_string();
        self.last_modified = now;
    }

    /// Derives a title from the first user message (or the first message).
    pub fn generate_title(&self) -> String {
        let Some(first) = self
            .messages
            .iter()
            .find(|m| m.is_user)
            .or_else(|| self.messages.first())
        else {
            return NEW_CHAT_TITLE.to_string();
        };

        let words = first
            .content
            .split(' ')
            .take(TITLE_WORDS)
            .collect::<Vec<_>>()
            .join(" ");

        if words.chars().count() > TITLE_CHARS {
            let head: String = words.chars().take(TITLE_CHARS).collect();
            format!("{head}...")
        } else {
            words
        }
    }

    /// Title to show, substituting a placeholder for empty titles.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }
}

/// Summary of a session kept in the history index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub message_count: usize,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub preview: String,
}

impl HistoryEntry {
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            title: session.title.clone(),
            last_modified: session.last_modified,
            message_count: session.messages.len(),
            model: session.model.clone(),
            preview: session
                .messages
                .first()
                .map(|m| m.content.chars().take(PREVIEW_CHARS).collect())
                .unwrap_or_default(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }
}

/// Color theme for terminal rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dark => f.write_str("dark"),
            Self::Light => f.write_str("light"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("Unknown theme '{other}' (expected dark or light)")),
        }
    }
}

/// Process-wide settings, persisted as one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub current_model: String,
    pub custom_models: Vec<String>,
    /// Estimated tokens received over the lifetime of the install.
    pub token_count: u64,
    pub model_switch_count: u64,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            current_model: DEFAULT_MODEL.to_string(),
            custom_models: Vec::new(),
            token_count: 0,
            model_switch_count: 0,
            theme: Theme::Dark,
        }
    }
}

pub const NEW_CHAT_TITLE: &str = "New Chat";
const UNTITLED: &str = "Untitled Chat";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Generates a chat id of the form `chat_<millis>_<9 base36 chars>`.
pub fn generate_chat_id(now: DateTime<Utc>) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut bits = uuid::Uuid::new_v4().as_u128();
    let suffix: String = (0..9)
        .map(|_| {
            let c = ALPHABET[(bits % 36) as usize] as char;
            bits /= 36;
            c
        })
        .collect();

    format!("chat_{}_{suffix}", now.timestamp_millis())
}

/// Returns `true` if `id` can be used as a session key.
///
/// Ids are restricted to ASCII alphanumerics, `_` and `-` so they cannot
/// collide with the fixed store keys.
pub fn is_valid_chat_id(id: &str) -> bool {
    !id.is_empty()
        && id != "history"
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
