use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::fs::atomic_write;
use crate::paths;

/// Provider used when neither the CLI nor the config file names one.
pub const DEFAULT_PROVIDER: &str = "openrouter";
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default settings in the `[buddy]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuddyConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Model used until one is picked in chat.
    pub model: Option<String>,
    /// `max_tokens` sent with each completion request.
    pub max_tokens: Option<u32>,
    /// `temperature` sent with each completion request.
    pub temperature: Option<f32>,
    /// Fetch the first URL in a message and pass its text to the model.
    pub fetch_urls: Option<bool>,
    /// Value for the `HTTP-Referer` attribution header.
    pub referer: Option<String>,
}

/// Configuration for a chat-completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API base URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Extra model ids offered alongside the presets.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// The built-in OpenRouter provider.
    pub fn builtin() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
            models: Vec::new(),
        }
    }

    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.trim().is_empty()
        {
            return Some(key);
        }
        self.api_key.clone().filter(|k| !k.trim().is_empty())
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/buddy/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub buddy: BuddyConfig,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider_name: String,
    pub endpoint: String,
    /// `None` when the provider has no key configured; sending is refused.
    pub api_key: Option<String>,
    /// Model forced from the command line.
    pub model_override: Option<String>,
    /// Model from the config file, used when no settings are stored yet.
    pub default_model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub fetch_urls: bool,
    pub referer: Option<String>,
    /// Models the provider lists; merged into the custom models.
    pub provider_models: Vec<String>,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values. The built-in
/// `openrouter` provider is used when no provider is named, or when it is
/// named but not defined in the file.
///
/// # Errors
///
/// Returns an error if the named provider is not found.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let provider_name = options
        .provider
        .as_ref()
        .or(config_file.buddy.provider.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    let provider_config = match config_file.providers.get(&provider_name) {
        Some(p) => p.clone(),
        None if provider_name == DEFAULT_PROVIDER => ProviderConfig::builtin(),
        None => {
            let mut available: Vec<_> = config_file.providers.keys().cloned().collect();
            available.sort();
            if available.is_empty() {
                bail!(
                    "Provider '{provider_name}' not found\n\n\
                     No providers configured. Add providers to ~/.config/buddy/config.toml"
                );
            }
            bail!(
                "Provider '{provider_name}' not found\n\n\
                 Available providers:\n  \
                 - {}\n\n\
                 Add providers to ~/.config/buddy/config.toml",
                available.join("\n  - ")
            );
        }
    };

    let api_key = provider_config.get_api_key();
    if api_key.is_none() {
        let env_var = provider_config
            .api_key_env
            .as_deref()
            .unwrap_or(DEFAULT_API_KEY_ENV);
        warn!(
            provider = %provider_name,
            "no API key configured; set {env_var} or api_key in config.toml"
        );
    }

    Ok(ResolvedConfig {
        endpoint: provider_config.endpoint.clone(),
        api_key,
        model_override: options.model.clone(),
        default_model: config_file.buddy.model.clone(),
        max_tokens: config_file.buddy.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: config_file.buddy.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        fetch_urls: config_file.buddy.fetch_urls.unwrap_or(true),
        referer: config_file.buddy.referer.clone(),
        provider_models: provider_config.models,
        provider_name,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/buddy/config.toml`
    /// or `~/.config/buddy/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })
    }

    /// Loads the config file; a missing file yields the defaults, a broken
    /// one is logged and ignored.
    pub fn load_or_default(&self) -> ConfigFile {
        if !self.config_path.exists() {
            return ConfigFile::default();
        }
        self.load().unwrap_or_else(|e| {
            warn!(error = %format!("{e:#}"), "ignoring unreadable config file");
            ConfigFile::default()
        })
    }
}
