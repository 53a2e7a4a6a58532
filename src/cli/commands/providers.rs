//! Provider listing command handler.

use anyhow::Result;

use crate::config::{ConfigFile, ConfigManager, DEFAULT_PROVIDER, ProviderConfig};
use crate::ui::Style;

/// Configured providers plus the built-in one, sorted by name.
pub fn all_providers(config: &ConfigFile) -> Vec<(String, ProviderConfig)> {
    let mut providers: Vec<(String, ProviderConfig)> = config
        .providers
        .iter()
        .map(|(name, p)| (name.clone(), p.clone()))
        .collect();
    if !config.providers.contains_key(DEFAULT_PROVIDER) {
        providers.push((DEFAULT_PROVIDER.to_string(), ProviderConfig::builtin()));
    }
    providers.sort_by(|a, b| a.0.cmp(&b.0));
    providers
}

/// Prints providers to stdout.
///
/// If `specific_provider` is provided, shows detailed information for that provider.
/// Otherwise, lists every provider with its endpoint and models.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default();
    let providers = all_providers(&config);
    let default_provider = config.buddy.provider.as_deref().unwrap_or(DEFAULT_PROVIDER);

    if let Some(provider_name) = specific_provider {
        let Some((_, provider)) = providers.iter().find(|(name, _)| name == provider_name) else {
            anyhow::bail!("Provider '{provider_name}' not found");
        };
        print_provider_details(provider_name, provider, default_provider == provider_name);
        return Ok(());
    }

    println!("{}", Style::header("Providers"));
    for (name, provider) in &providers {
        let marker = if default_provider == name {
            format!(" {}", Style::secondary("(default)"))
        } else {
            String::new()
        };
        println!("  {}{marker}", Style::value(name));
        println!("    {}", Style::secondary(&provider.endpoint));
        if !provider.models.is_empty() {
            println!("    {}", Style::secondary(provider.models.join(", ")));
        }
    }
    println!();
    println!(
        "{}",
        Style::hint(format!(
            "Add providers to {}",
            manager.config_path().display()
        ))
    );

    Ok(())
}

fn print_provider_details(name: &str, provider: &ProviderConfig, is_default: bool) {
    println!(
        "{} {}{}",
        Style::header("Provider:"),
        Style::value(name),
        if is_default { " (default)" } else { "" }
    );
    println!("  {}  {}", Style::label("endpoint"), provider.endpoint);
    if provider.requires_api_key() {
        let key_state = if provider.get_api_key().is_some() {
            Style::success("(set)")
        } else {
            Style::warning("(not set)")
        };
        println!("  {}   {key_state}", Style::label("api_key"));
        if let Some(env) = &provider.api_key_env {
            println!("  {}       {}", Style::label("env"), Style::secondary(env));
        }
    }
    if provider.models.is_empty() {
        println!("  {}    {}", Style::label("models"), Style::secondary("(presets only)"));
    } else {
        println!("  {}", Style::label("models"));
        for model in &provider.models {
            println!("    - {model}");
        }
    }
}
