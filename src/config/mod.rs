//! Configuration file management and provider settings.

mod manager;

pub use manager::{
    BuddyConfig, ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT,
    DEFAULT_MAX_TOKENS, DEFAULT_PROVIDER, DEFAULT_TEMPERATURE, ProviderConfig, ResolveOptions,
    ResolvedConfig, resolve_config,
};
