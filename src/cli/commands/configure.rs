//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Confirm, Select, Text};

use super::providers::all_providers;
use crate::config::{BuddyConfig, ConfigFile, ConfigManager, DEFAULT_PROVIDER};
use crate::models::PRESET_MODELS;
use crate::ui::{Style, handle_prompt_cancellation};

/// Entry in the model picker that switches to free text input.
const OTHER_MODEL: &str = "(other model id)";

/// Runs the configure command to edit default settings.
///
/// Allows the user to interactively set the default provider and model and
/// whether URLs in messages are fetched.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        let manager = ConfigManager::new()?;
        print_current_defaults(&manager.load_or_default());
        println!(
            "{}",
            Style::hint(format!("Config file: {}", manager.config_path().display()))
        );
        return Ok(());
    }
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default();

    print_current_defaults(&config);

    let providers = all_providers(&config);
    let provider_names: Vec<String> = providers.iter().map(|(name, _)| name.clone()).collect();
    let provider = select_provider(&provider_names, config.buddy.provider.as_deref())?;

    let provider_models = providers
        .iter()
        .find(|(name, _)| *name == provider)
        .map(|(_, p)| p.models.clone())
        .unwrap_or_default();
    let model = select_model(&provider_models, config.buddy.model.as_deref())?;

    let fetch_urls = Confirm::new("Fetch URLs mentioned in messages and share their text?")
        .with_default(config.buddy.fetch_urls.unwrap_or(true))
        .prompt()?;

    config.buddy = BuddyConfig {
        provider: Some(provider),
        model: Some(model),
        fetch_urls: Some(fetch_urls),
        ..config.buddy
    };

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    let not_set = || Style::secondary("(not set)");

    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}     {}",
        Style::label("provider"),
        config.buddy.provider.as_deref().map_or_else(
            || Style::secondary(format!("{DEFAULT_PROVIDER} (built-in)")),
            Style::value
        )
    );
    println!(
        "  {}        {}",
        Style::label("model"),
        config.buddy.model.as_deref().map_or_else(not_set, Style::value)
    );
    println!(
        "  {}   {}",
        Style::label("max_tokens"),
        config.buddy.max_tokens.map_or_else(not_set, Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("temperature"),
        config.buddy.temperature.map_or_else(not_set, Style::value)
    );
    println!(
        "  {}   {}",
        Style::label("fetch_urls"),
        config.buddy.fetch_urls.map_or_else(not_set, Style::value)
    );
    println!();
}

fn select_provider(providers: &[String], default: Option<&str>) -> Result<String> {
    let default = default.unwrap_or(DEFAULT_PROVIDER);
    let default_index = providers.iter().position(|p| p == default).unwrap_or(0);

    let selection = Select::new("Default provider:", providers.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

fn select_model(provider_models: &[String], default: Option<&str>) -> Result<String> {
    let mut options: Vec<String> = PRESET_MODELS.iter().map(|p| p.id.to_string()).collect();
    for model in provider_models {
        if !options.contains(model) {
            options.push(model.clone());
        }
    }
    if let Some(d) = default
        && !options.iter().any(|m| m == d)
    {
        options.push(d.to_string());
    }
    options.push(OTHER_MODEL.to_string());

    let default_index = default
        .and_then(|d| options.iter().position(|m| m == d))
        .unwrap_or(0);

    let selection = Select::new("Default model:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    if selection != OTHER_MODEL {
        return Ok(selection);
    }

    let model = Text::new("Model id:")
        .with_help_message("e.g., organization/model-name")
        .prompt()?;
    let model = model.trim();
    if model.is_empty() {
        bail!("Model name cannot be empty");
    }
    Ok(model.to_string())
}
