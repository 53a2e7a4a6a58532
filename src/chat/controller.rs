//! Chat controller: turns user actions into store updates, completion
//! requests and notifications.
//!
//! The controller owns the current session and the settings. Every mutation
//! of the session is persisted before the method returns, and every outcome
//! the user should see is queued as a [`Notification`] for the front end to
//! drain and display.

use anyhow::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::transfer::{self, ExportFormat};
use super::view::{Bubble, render_transcript};
use crate::completion::{
    ChatBackend, CompletionRequest, ErrorCause, estimate_tokens, extract_url, html_to_text,
    with_url_context,
};
use crate::config::ResolvedConfig;
use crate::format::code_blocks;
use crate::models::{self, ModelError};
use crate::store::{HistoryEntry, KeyValueStore, Message, Session, SessionStore, Settings, Theme};

/// Greeting added when a new chat is started.
pub const NEW_CHAT_GREETING: &str =
    "I'm ready to help with your coding questions! What would you like to work on?";
/// Greeting added after the current chat is cleared.
pub const CLEARED_GREETING: &str = "Chat cleared! How can I help you with coding today?";
/// Shown when sending without a configured key.
pub const MISSING_API_KEY_NOTICE: &str =
    "API key not configured. Set OPENROUTER_API_KEY or api_key in config.toml.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// What happened to a submitted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing was sent or stored.
    Skipped,
    /// No API key; nothing was sent or stored.
    MissingApiKey,
    /// The assistant's reply was added to the session.
    Replied(Message),
    /// The request failed and an apology was added to the session.
    Failed { cause: ErrorCause, apology: Message },
}

/// Totals shown by the stats view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total_messages: usize,
    pub tokens_used: u64,
    pub model_switches: u64,
}

/// Request parameters and startup preferences for a controller.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub max_tokens: u32,
    pub temperature: f32,
    pub fetch_urls: bool,
    /// Model forced for this run; not counted as a switch.
    pub model_override: Option<String>,
    /// Model used when no settings have been stored yet.
    pub default_model: Option<String>,
    /// Extra models merged into the custom model list.
    pub extra_models: Vec<String>,
}

impl From<&ResolvedConfig> for ControllerOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            fetch_urls: config.fetch_urls,
            model_override: config.model_override.clone(),
            default_model: config.default_model.clone(),
            extra_models: config.provider_models.clone(),
        }
    }
}

pub struct ChatController<S, B> {
    store: SessionStore<S>,
    backend: B,
    options: ControllerOptions,
    settings: Settings,
    session: Session,
    notifications: Vec<Notification>,
}

impl<S: KeyValueStore, B: ChatBackend> ChatController<S, B> {
    /// Loads settings and resumes the last chat, or starts an empty one.
    pub fn open(store: SessionStore<S>, backend: B, options: ControllerOptions) -> Result<Self> {
        let has_settings = store.has_settings()?;
        let mut settings = store.load_settings()?;

        if !has_settings && let Some(model) = &options.default_model {
            settings.current_model.clone_from(model);
        }
        settings.merge_custom_models(&options.extra_models);

        let resumed = match store.last_chat_id()? {
            Some(id) => store.load_session(&id)?,
            None => None,
        };

        let session = match resumed {
            Some(session) => {
                debug!(id = %session.id, messages = session.messages.len(), "resuming chat");
                if settings.knows_model(&session.model) {
                    settings.current_model.clone_from(&session.model);
                }
                session
            }
            None => Session::new(settings.current_model.clone(), Utc::now()),
        };

        if let Some(model) = &options.model_override {
            settings.current_model.clone_from(model);
        }
        store.save_settings(&settings)?;

        Ok(Self {
            store,
            backend,
            options,
            settings,
            session,
            notifications: Vec::new(),
        })
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub fn current_model(&self) -> &str {
        &self.settings.current_model
    }

    pub fn has_api_key(&self) -> bool {
        self.backend.has_api_key()
    }

    /// Takes every queued notification, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Renders the current session's transcript.
    pub fn transcript(&self) -> Vec<Bubble> {
        render_transcript(&self.session)
    }

    pub fn history(&self, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
        self.store.sorted_history(limit)
    }

    /// Fenced code blocks of the latest assistant reply, as
    /// `(language, code)` pairs.
    pub fn last_reply_code_blocks(&self) -> Vec<(String, String)> {
        self.session
            .messages
            .iter()
            .rev()
            .find(|m| !m.is_user)
            .map(|m| code_blocks(&m.content))
            .unwrap_or_default()
    }

    pub fn stats(&self) -> Stats {
        Stats {
            total_messages: self.session.messages.len(),
            tokens_used: self.settings.token_count,
            model_switches: self.settings.model_switch_count,
        }
    }

    /// Sends a user message and records the reply.
    ///
    /// Completion failures are not errors: they become an apology in the
    /// transcript plus an error notification. `Err` means persistence failed.
    pub async fn send_message(&mut self, text: &str) -> Result<SendOutcome> {
        if !self.backend.has_api_key() {
            self.notify(NotificationKind::Error, MISSING_API_KEY_NOTICE);
            return Ok(SendOutcome::MissingApiKey);
        }

        let text = text.trim();
        if text.is_empty() {
            return Ok(SendOutcome::Skipped);
        }

        self.add_message(text, true)?;

        let context = if self.options.fetch_urls {
            self.url_context(text).await
        } else {
            None
        };

        let request = CompletionRequest::from_history(
            &self.settings.current_model,
            &self.session.messages,
            context,
            self.options.max_tokens,
            self.options.temperature,
        );

        match self.backend.complete(&request).await {
            Ok(reply) => {
                let tokens = estimate_tokens(&reply);
                self.session.token_count += tokens;
                self.settings.token_count += tokens;
                self.store.save_settings(&self.settings)?;

                let message = self.add_message(&reply, false)?;
                debug!(tokens, "received reply");
                Ok(SendOutcome::Replied(message))
            }
            Err(e) => {
                error!(error = %e, model = %self.settings.current_model, "completion failed");
                let cause = e.cause();
                let apology = self.add_message(&cause.apology(), false)?;
                self.notify(NotificationKind::Error, format!("Error: {e}"));
                Ok(SendOutcome::Failed { cause, apology })
            }
        }
    }

    /// Fetches the first URL in `text` and returns the request content for
    /// the user turn with the page text attached.
    async fn url_context(&mut self, text: &str) -> Option<String> {
        let url = extract_url(text)?;
        self.notify(NotificationKind::Info, "Fetching content from URL...");

        match self.backend.fetch_page(url).await {
            Ok(html) => {
                let content = html_to_text(&html);
                if content.is_empty() {
                    self.notify(
                        NotificationKind::Warning,
                        "URL returned no readable content. Proceeding with message only.",
                    );
                    return None;
                }
                self.notify(NotificationKind::Success, "URL content loaded successfully");
                Some(with_url_context(text, url, &content))
            }
            Err(e) => {
                warn!(%url, error = %e, "failed to fetch URL context");
                self.notify(
                    NotificationKind::Warning,
                    "Could not fetch URL content. Proceeding with message only.",
                );
                None
            }
        }
    }

    /// Starts a new chat with a greeting. The previous chat stays in history.
    pub fn new_chat(&mut self) -> Result<()> {
        self.start_fresh_session()?;
        self.notify(NotificationKind::Success, "Started a new chat");
        Ok(())
    }

    /// Discards the current chat's messages and adds a greeting.
    ///
    /// Returns `false` if there was nothing to clear.
    pub fn clear_chat(&mut self) -> Result<bool> {
        if self.session.messages.is_empty() {
            self.notify(NotificationKind::Info, "Chat is already empty");
            return Ok(false);
        }

        self.session.reset(Utc::now());
        self.session.token_count = 0;
        self.add_message(CLEARED_GREETING, false)?;
        info!(id = %self.session.id, "cleared chat");
        self.notify(NotificationKind::Success, "Chat cleared");
        Ok(true)
    }

    /// Makes a stored chat current. Returns `false` if it does not exist.
    pub fn load_chat(&mut self, id: &str) -> Result<bool> {
        let Some(session) = self.store.load_session(id)? else {
            self.notify(NotificationKind::Error, format!("Chat not found: {id}"));
            return Ok(false);
        };

        if self.settings.knows_model(&session.model) {
            self.settings.current_model.clone_from(&session.model);
            self.store.save_settings(&self.settings)?;
        }
        self.store.set_last_chat_id(Some(&session.id))?;
        self.notify(
            NotificationKind::Success,
            format!("Loaded chat: {}", session.display_title()),
        );
        self.session = session;
        Ok(true)
    }

    /// Deletes a stored chat. Deleting the current chat starts a new one.
    pub fn delete_chat(&mut self, id: &str) -> Result<bool> {
        if !self.store.delete_session(id)? {
            self.notify(NotificationKind::Error, format!("Chat not found: {id}"));
            return Ok(false);
        }

        if self.session.id == id {
            self.replace_session();
            self.add_message(NEW_CHAT_GREETING, false)?;
        }
        self.notify(NotificationKind::Success, "Chat deleted from history");
        Ok(true)
    }

    /// Removes every stored chat and starts a new one.
    pub fn clear_history(&mut self) -> Result<usize> {
        let removed = self.store.clear_history()?;
        self.replace_session();
        self.add_message(NEW_CHAT_GREETING, false)?;

        info!(removed, "cleared chat history");
        self.notify(NotificationKind::Success, "All chat history cleared");
        Ok(removed)
    }

    /// Exports a stored chat, the current one when `id` is `None`.
    pub fn export_chat(
        &mut self,
        id: Option<&str>,
        destination: Option<&Path>,
        format: ExportFormat,
    ) -> Result<Option<PathBuf>> {
        let id = id.unwrap_or(&self.session.id).to_string();
        if id == self.session.id && self.session.messages.is_empty() {
            self.notify(NotificationKind::Warning, "Nothing to export yet");
            return Ok(None);
        }

        match transfer::export_session(&self.store, &id, destination, format) {
            Ok(path) => {
                self.notify(
                    NotificationKind::Success,
                    format!("Chat exported to {}", path.display()),
                );
                Ok(Some(path))
            }
            Err(e) => {
                warn!(%id, error = %e, "export failed");
                self.notify(NotificationKind::Error, format!("Export failed: {e:#}"));
                Ok(None)
            }
        }
    }

    /// Imports an exported chat into history without switching to it.
    pub fn import_chat(&mut self, path: &Path) -> Result<Option<String>> {
        match transfer::import_session(&self.store, Some(path)) {
            Ok(session) => {
                self.notify(
                    NotificationKind::Success,
                    format!("Imported chat: {}", session.display_title()),
                );
                Ok(Some(session.id))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "import failed");
                self.notify(NotificationKind::Error, format!("Import failed: {e:#}"));
                Ok(None)
            }
        }
    }

    /// Switches to a known model. Returns `false` for unknown ids.
    pub fn switch_model(&mut self, id: &str) -> Result<bool> {
        let id = id.trim();
        if !self.settings.knows_model(id) {
            self.notify(
                NotificationKind::Error,
                format!("Unknown model: {id}. Add it with /add-model first."),
            );
            return Ok(false);
        }
        if self.settings.current_model == id {
            self.notify(
                NotificationKind::Info,
                format!("Already using {}", models::display_name(id)),
            );
            return Ok(true);
        }

        self.settings.switch_model(id);
        self.store.save_settings(&self.settings)?;
        info!(model = %id, "switched model");
        self.notify(
            NotificationKind::Success,
            format!("Switched to {}", models::display_name(id)),
        );
        Ok(true)
    }

    pub fn add_custom_model(&mut self, id: &str) -> Result<bool> {
        match self.settings.add_custom_model(id) {
            Ok(id) => {
                self.store.save_settings(&self.settings)?;
                self.notify(
                    NotificationKind::Success,
                    format!("Added custom model: {id}"),
                );
                Ok(true)
            }
            Err(e @ ModelError::AlreadyExists) => {
                self.notify(NotificationKind::Warning, e.to_string());
                Ok(false)
            }
            Err(e) => {
                self.notify(NotificationKind::Error, e.to_string());
                Ok(false)
            }
        }
    }

    pub fn remove_custom_model(&mut self, id: &str) -> Result<bool> {
        match self.settings.remove_custom_model(id.trim()) {
            Ok(()) => {
                if self.settings.current_model == id.trim() {
                    self.settings.current_model = models::DEFAULT_MODEL.to_string();
                }
                self.store.save_settings(&self.settings)?;
                self.notify(NotificationKind::Success, "Custom model removed");
                Ok(true)
            }
            Err(e) => {
                self.notify(NotificationKind::Error, e.to_string());
                Ok(false)
            }
        }
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.settings.theme = self.settings.theme.toggled();
        self.store.save_settings(&self.settings)?;
        self.notify(
            NotificationKind::Info,
            format!("Switched to {} theme", self.settings.theme),
        );
        Ok(self.settings.theme)
    }

    /// Appends a message to the current session and persists it.
    fn add_message(&mut self, content: &str, is_user: bool) -> Result<Message> {
        let model = self.settings.current_model.clone();
        let message = self
            .session
            .push_message(content, is_user, model.clone(), Utc::now())
            .clone();
        self.session.model = model;
        self.store.persist(&self.session)?;
        Ok(message)
    }

    fn start_fresh_session(&mut self) -> Result<()> {
        if !self.session.messages.is_empty() {
            self.store.persist(&self.session)?;
        }
        self.replace_session();
        self.add_message(NEW_CHAT_GREETING, false)?;
        Ok(())
    }

    fn replace_session(&mut self) {
        self.session = Session::new(self.settings.current_model.clone(), Utc::now());
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notifications.push(Notification {
            kind,
            message: message.into(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::completion::{CompletionError, Role};
    use crate::store::MemoryStore;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeBackend {
        has_key: bool,
        replies: Mutex<VecDeque<Result<String, CompletionError>>>,
        page: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl FakeBackend {
        fn replying(replies: &[&str]) -> Self {
            Self {
                has_key: true,
                replies: Mutex::new(replies.iter().map(|r| Ok((*r).to_string())).collect()),
                ..Self::default()
            }
        }

        fn failing(error: CompletionError) -> Self {
            Self {
                has_key: true,
                replies: Mutex::new(VecDeque::from([Err(error)])),
                ..Self::default()
            }
        }

        fn last_request(&self) -> CompletionRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl ChatBackend for FakeBackend {
        fn has_api_key(&self) -> bool {
            self.has_key
        }

        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("ok".to_string()))
        }

        async fn fetch_page(&self, _url: &str) -> Result<String, CompletionError> {
            self.page
                .clone()
                .ok_or_else(|| CompletionError::InvalidResponse("unreachable".to_string()))
        }
    }

    fn options() -> ControllerOptions {
        ControllerOptions {
            max_tokens: 4000,
            temperature: 0.7,
            fetch_urls: true,
            model_override: None,
            default_model: None,
            extra_models: Vec::new(),
        }
    }

    fn controller(backend: FakeBackend) -> ChatController<MemoryStore, FakeBackend> {
        ChatController::open(SessionStore::new(MemoryStore::new()), backend, options()).unwrap()
    }

    fn kinds(notifications: &[Notification]) -> Vec<NotificationKind> {
        notifications.iter().map(|n| n.kind).collect()
    }

    #[tokio::test]
    async fn test_send_message_records_reply() {
        let mut chat = controller(FakeBackend::replying(&["Use `Vec::new()`."]));

        let outcome = chat.send_message("  How do I make a vec?  ").await.unwrap();

        let SendOutcome::Replied(reply) = outcome else {
            panic!("expected a reply");
        };
        assert_eq!(reply.content, "Use `Vec::new()`.");
        assert!(!reply.is_user);

        let session = chat.session();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].content, "How do I make a vec?");
        assert_eq!(session.title, "How do I make a");
        assert_eq!(session.token_count, 5);
        assert_eq!(chat.settings().token_count, 5);

        let stored = chat.store().load_session(&session.id).unwrap().unwrap();
        assert_eq!(&stored, session);
        assert_eq!(chat.history(None).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_builds_request_from_history() {
        let mut chat = controller(FakeBackend::replying(&["first", "second"]));

        chat.send_message("one").await.unwrap();
        chat.send_message("two").await.unwrap();

        let request = chat.backend.last_request();
        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(request.model, models::DEFAULT_MODEL);
        assert_eq!(request.max_tokens, 4000);
    }

    #[tokio::test]
    async fn test_send_blank_message_is_skipped() {
        let mut chat = controller(FakeBackend::replying(&[]));

        assert_eq!(chat.send_message("   ").await.unwrap(), SendOutcome::Skipped);
        assert!(chat.session().messages.is_empty());
        assert!(chat.backend.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_without_api_key() {
        let mut chat = controller(FakeBackend::default());

        let outcome = chat.send_message("hello").await.unwrap();

        assert_eq!(outcome, SendOutcome::MissingApiKey);
        assert!(chat.session().messages.is_empty());
        let notifications = chat.drain_notifications();
        assert_eq!(kinds(&notifications), vec![NotificationKind::Error]);
        assert!(notifications[0].message.contains("API key"));
    }

    #[tokio::test]
    async fn test_send_failure_adds_apology() {
        let mut chat = controller(FakeBackend::failing(CompletionError::Api {
            status: 401,
            message: "Invalid API key".to_string(),
        }));

        let outcome = chat.send_message("hello").await.unwrap();

        let SendOutcome::Failed { cause, apology } = outcome else {
            panic!("expected a failure");
        };
        assert_eq!(cause, ErrorCause::ApiKey);
        assert!(apology.content.starts_with("Sorry, I encountered an error."));
        assert_eq!(chat.session().messages.len(), 2);
        assert_eq!(chat.settings().token_count, 0);
        assert!(kinds(&chat.drain_notifications()).contains(&NotificationKind::Error));
    }

    #[tokio::test]
    async fn test_url_context_goes_to_request_only() {
        let backend = FakeBackend {
            page: Some("<html><body><p>Crate docs</p></body></html>".to_string()),
            ..FakeBackend::replying(&["summary"])
        };
        let mut chat = controller(backend);

        chat.send_message("summarize https://docs.rs/x").await.unwrap();

        let request = chat.backend.last_request();
        let user_turn = &request.messages[1].content;
        assert!(user_turn.starts_with("summarize https://docs.rs/x\n\n[System:"));
        assert!(user_turn.contains("Crate docs"));
        assert_eq!(
            chat.session().messages[0].content,
            "summarize https://docs.rs/x"
        );
        assert!(kinds(&chat.drain_notifications()).contains(&NotificationKind::Success));
    }

    #[tokio::test]
    async fn test_url_fetch_failure_warns_and_sends() {
        let mut chat = controller(FakeBackend::replying(&["done"]));

        let outcome = chat.send_message("read http://unreachable.test").await.unwrap();

        assert!(matches!(outcome, SendOutcome::Replied(_)));
        assert_eq!(
            chat.backend.last_request().messages[1].content,
            "read http://unreachable.test"
        );
        assert!(kinds(&chat.drain_notifications()).contains(&NotificationKind::Warning));
    }

    #[tokio::test]
    async fn test_resume_last_chat() {
        let store = SessionStore::new(MemoryStore::new());
        let mut chat = ChatController::open(store, FakeBackend::replying(&["hi"]), options()).unwrap();
        chat.send_message("remember me").await.unwrap();
        let id = chat.session().id.clone();

        let ChatController { store, .. } = chat;
        let resumed = ChatController::open(store, FakeBackend::default(), options()).unwrap();

        assert_eq!(resumed.session().id, id);
        assert_eq!(resumed.session().messages.len(), 2);
    }

    #[test]
    fn test_fresh_start_has_empty_session() {
        let chat = controller(FakeBackend::default());
        assert!(chat.session().messages.is_empty());
        assert!(chat.history(None).unwrap().is_empty());
    }

    #[test]
    fn test_default_model_only_without_settings() {
        let mut opts = options();
        opts.default_model = Some("anthropic/claude-3-haiku".to_string());

        let store = SessionStore::new(MemoryStore::new());
        let chat = ChatController::open(store, FakeBackend::default(), opts.clone()).unwrap();
        assert_eq!(chat.current_model(), "anthropic/claude-3-haiku");

        let ChatController { store, .. } = chat;
        let mut settings = store.load_settings().unwrap();
        settings.current_model = "openai/gpt-4".to_string();
        store.save_settings(&settings).unwrap();

        let chat = ChatController::open(store, FakeBackend::default(), opts).unwrap();
        assert_eq!(chat.current_model(), "openai/gpt-4");
    }

    #[test]
    fn test_model_override_is_not_a_switch() {
        let mut opts = options();
        opts.model_override = Some("meta/llama-3".to_string());

        let chat =
            ChatController::open(SessionStore::new(MemoryStore::new()), FakeBackend::default(), opts)
                .unwrap();

        assert_eq!(chat.current_model(), "meta/llama-3");
        assert_eq!(chat.stats().model_switches, 0);
    }

    #[tokio::test]
    async fn test_new_chat_keeps_previous_in_history() {
        let mut chat = controller(FakeBackend::replying(&["a"]));
        chat.send_message("first chat").await.unwrap();
        let first_id = chat.session().id.clone();

        chat.new_chat().unwrap();

        assert_ne!(chat.session().id, first_id);
        assert_eq!(chat.session().messages.len(), 1);
        assert_eq!(chat.session().messages[0].content, NEW_CHAT_GREETING);
        assert_eq!(chat.history(None).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_chat_resets_messages() {
        let mut chat = controller(FakeBackend::replying(&["a"]));
        chat.send_message("something").await.unwrap();
        let id = chat.session().id.clone();

        assert!(chat.clear_chat().unwrap());

        assert_eq!(chat.session().id, id);
        assert_eq!(chat.session().messages.len(), 1);
        assert_eq!(chat.session().messages[0].content, CLEARED_GREETING);
        let stored = chat.store().load_session(&id).unwrap().unwrap();
        assert_eq!(stored.messages.len(), 1);
    }

    #[test]
    fn test_clear_empty_chat() {
        let mut chat = controller(FakeBackend::default());
        assert!(!chat.clear_chat().unwrap());
        assert!(chat.session().messages.is_empty());
    }

    #[tokio::test]
    async fn test_load_and_delete_chat() {
        let mut chat = controller(FakeBackend::replying(&["a", "b"]));
        chat.send_message("first").await.unwrap();
        let first_id = chat.session().id.clone();
        chat.new_chat().unwrap();
        chat.send_message("second").await.unwrap();

        assert!(chat.load_chat(&first_id).unwrap());
        assert_eq!(chat.session().id, first_id);
        assert_eq!(
            chat.store().last_chat_id().unwrap().as_deref(),
            Some(first_id.as_str())
        );

        assert!(chat.delete_chat(&first_id).unwrap());
        assert_ne!(chat.session().id, first_id);
        assert!(chat.store().load_session(&first_id).unwrap().is_none());
        assert!(!chat.load_chat(&first_id).unwrap());
    }

    #[test]
    fn test_delete_unknown_chat() {
        let mut chat = controller(FakeBackend::default());
        assert!(!chat.delete_chat("chat_missing").unwrap());
        assert_eq!(
            kinds(&chat.drain_notifications()),
            vec![NotificationKind::Error]
        );
    }

    #[tokio::test]
    async fn test_clear_history() {
        let mut chat = controller(FakeBackend::replying(&["a", "b"]));
        chat.send_message("one").await.unwrap();
        chat.new_chat().unwrap();
        chat.send_message("two").await.unwrap();

        assert_eq!(chat.clear_history().unwrap(), 2);

        let history = chat.history(None).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, chat.session().id);
    }

    #[tokio::test]
    async fn test_export_then_import_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let mut chat = controller(FakeBackend::replying(&["```rust\nfn main() {}\n```"]));
        chat.send_message("show me main").await.unwrap();
        let original = chat.session().clone();

        let path = chat
            .export_chat(None, Some(temp_dir.path()), ExportFormat::Json)
            .unwrap()
            .unwrap();

        let mut other = controller(FakeBackend::default());
        let id = other.import_chat(&path).unwrap().unwrap();
        assert!(other.load_chat(&id).unwrap());

        let messages: Vec<(&str, bool)> = other
            .session()
            .messages
            .iter()
            .map(|m| (m.content.as_str(), m.is_user))
            .collect();
        let expected: Vec<(&str, bool)> = original
            .messages
            .iter()
            .map(|m| (m.content.as_str(), m.is_user))
            .collect();
        assert_eq!(messages, expected);
        assert_eq!(other.transcript(), chat.transcript());
    }

    #[test]
    fn test_export_empty_chat_warns() {
        let mut chat = controller(FakeBackend::default());
        assert!(
            chat.export_chat(None, None, ExportFormat::Json)
                .unwrap()
                .is_none()
        );
        assert_eq!(
            kinds(&chat.drain_notifications()),
            vec![NotificationKind::Warning]
        );
    }

    #[test]
    fn test_import_failure_notifies() {
        let mut chat = controller(FakeBackend::default());
        assert!(
            chat.import_chat(Path::new("/nonexistent/chat.json"))
                .unwrap()
                .is_none()
        );
        assert_eq!(
            kinds(&chat.drain_notifications()),
            vec![NotificationKind::Error]
        );
    }

    #[tokio::test]
    async fn test_transcript_is_idempotent() {
        let mut chat = controller(FakeBackend::replying(&["a", "b"]));
        chat.send_message("one").await.unwrap();
        chat.send_message("two").await.unwrap();

        for _ in 0..3 {
            assert_eq!(chat.transcript().len(), 4);
        }
    }

    #[tokio::test]
    async fn test_last_reply_code_blocks() {
        let mut chat = controller(FakeBackend::replying(&[
            "Two ways:\n```rust\nlet a = 1;\n```\nor\n```python\na = 1\n```",
        ]));
        assert!(chat.last_reply_code_blocks().is_empty());

        chat.send_message("```rust\nignored user code\n```").await.unwrap();

        assert_eq!(
            chat.last_reply_code_blocks(),
            vec![
                ("rust".to_string(), "let a = 1;\n".to_string()),
                ("python".to_string(), "a = 1\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_switch_model() {
        let mut chat = controller(FakeBackend::default());

        assert!(chat.switch_model("openai/gpt-4").unwrap());
        assert_eq!(chat.current_model(), "openai/gpt-4");
        assert_eq!(chat.stats().model_switches, 1);
        assert_eq!(
            chat.store().load_settings().unwrap().current_model,
            "openai/gpt-4"
        );

        assert!(!chat.switch_model("nobody/unknown").unwrap());
        assert_eq!(chat.stats().model_switches, 1);
    }

    #[test]
    fn test_add_and_remove_custom_model() {
        let mut chat = controller(FakeBackend::default());

        assert!(chat.add_custom_model(" mistral/mixtral-8x7b ").unwrap());
        assert!(!chat.add_custom_model("mistral/mixtral-8x7b").unwrap());
        assert!(!chat.add_custom_model("no-slash").unwrap());
        assert!(chat.switch_model("mistral/mixtral-8x7b").unwrap());

        assert!(chat.remove_custom_model("mistral/mixtral-8x7b").unwrap());
        assert_eq!(chat.current_model(), models::DEFAULT_MODEL);
        assert!(!chat.remove_custom_model("mistral/mixtral-8x7b").unwrap());

        assert_eq!(
            kinds(&chat.drain_notifications()),
            vec![
                NotificationKind::Success,
                NotificationKind::Warning,
                NotificationKind::Error,
                NotificationKind::Success,
                NotificationKind::Success,
                NotificationKind::Error,
            ]
        );
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut chat = controller(FakeBackend::default());

        assert_eq!(chat.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(chat.store().load_settings().unwrap().theme, Theme::Light);
        assert_eq!(chat.toggle_theme().unwrap(), Theme::Dark);
    }
}
