use anyhow::{Result, bail};
use tracing::info;

use crate::chat::{ChatController, ChatRepl, ControllerOptions, SessionInfo};
use crate::completion::CompletionClient;
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::store::{SessionStore, SqliteStore};

pub struct ChatOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Start with a new chat instead of resuming.
    pub new: bool,
    /// Open this chat instead of the last one.
    pub resume: Option<String>,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let resolved = load_resolved_config(options.provider.clone(), options.model.clone())?;

    let kv = SqliteStore::new()?;
    let info = SessionInfo {
        provider_name: resolved.provider_name.clone(),
        endpoint: resolved.endpoint.clone(),
        has_api_key: resolved.api_key.is_some(),
        database: kv.path().display().to_string(),
    };

    let client = CompletionClient::new(resolved.endpoint.clone(), resolved.api_key.clone())
        .with_referer(resolved.referer.clone());
    let mut controller = ChatController::open(
        SessionStore::new(kv),
        client,
        ControllerOptions::from(&resolved),
    )?;

    if let Some(id) = &options.resume {
        if !controller.load_chat(id)? {
            bail!("Chat not found: {id}\n\nRun 'buddy history' to list saved chats.");
        }
    } else if options.new {
        controller.new_chat()?;
    }
    // startup actions speak for themselves in the header
    controller.drain_notifications();

    info!(
        provider = %resolved.provider_name,
        model = %controller.current_model(),
        chat = %controller.session().id,
        "starting chat"
    );

    ChatRepl::new(controller, info).run().await
}

/// Loads config.toml and applies CLI overrides.
pub fn load_resolved_config(
    provider: Option<String>,
    model: Option<String>,
) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let config_file = manager.load_or_default();
    resolve_config(&ResolveOptions { provider, model }, &config_file)
}
