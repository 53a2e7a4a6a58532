//! Model catalog: built-in presets and user-added custom models.

use thiserror::Error;

use crate::store::Settings;

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";

/// A built-in model entry.
#[derive(Debug, Clone)]
pub struct PresetModel {
    /// Provider-qualified model id (e.g., `openai/gpt-4`).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    pub description: &'static str,
    pub badge: &'static str,
}

/// All built-in models.
pub const PRESET_MODELS: &[PresetModel] = &[
    PresetModel {
        id: "openai/gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        description: "Fast & cost-effective",
        badge: "Popular",
    },
    PresetModel {
        id: "openai/gpt-4",
        name: "GPT-4",
        description: "Most capable",
        badge: "Premium",
    },
    PresetModel {
        id: "anthropic/claude-3-haiku",
        name: "Claude 3 Haiku",
        description: "Fast & efficient",
        badge: "New",
    },
    PresetModel {
        id: "google/gemini-pro",
        name: "Gemini Pro",
        description: "Great for reasoning",
        badge: "Google",
    },
    PresetModel {
        id: "meta-llama/llama-3.1-70b-instruct",
        name: "Llama 3.1 70B",
        description: "Open-source power",
        badge: "Open",
    },
];

/// Reasons a custom model cannot be added or removed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Model id cannot be empty")]
    Empty,
    #[error("Please enter a valid model ID (e.g., organization/model-name)")]
    InvalidFormat,
    #[error("Model already exists")]
    AlreadyExists,
    #[error("Custom model '{0}' not found")]
    NotFound(String),
}

/// Looks up a preset model by id.
pub fn get_preset(id: &str) -> Option<&'static PresetModel> {
    PRESET_MODELS.iter().find(|p| p.id == id)
}

/// Returns the display name for a model id.
///
/// Presets use their name; anything else uses the segment after the last `/`.
pub fn display_name(id: &str) -> &str {
    match get_preset(id) {
        Some(preset) => preset.name,
        None => id.rsplit('/').next().unwrap_or(id),
    }
}

/// Returns the description for a model id.
pub fn description(id: &str) -> &'static str {
    get_preset(id).map_or("Custom model", |p| p.description)
}

impl Settings {
    /// Returns `true` if `id` is a preset or a saved custom model.
    pub fn knows_model(&self, id: &str) -> bool {
        get_preset(id).is_some() || self.custom_models.iter().any(|m| m == id)
    }

    /// Validates and saves a custom model id. Returns the trimmed id.
    pub fn add_custom_model(&mut self, id: &str) -> Result<String, ModelError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ModelError::Empty);
        }
        if !id.contains('/') {
            return Err(ModelError::InvalidFormat);
        }
        if self.knows_model(id) {
            return Err(ModelError::AlreadyExists);
        }

        self.custom_models.push(id.to_string());
        Ok(id.to_string())
    }

    pub fn remove_custom_model(&mut self, id: &str) -> Result<(), ModelError> {
        let before = self.custom_models.len();
        self.custom_models.retain(|m| m != id);
        if self.custom_models.len() == before {
            return Err(ModelError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Merges model ids from the config file, skipping ones already known.
    pub fn merge_custom_models<'a>(&mut self, models: impl IntoIterator<Item = &'a String>) {
        for model in models {
            if !self.knows_model(model) {
                self.custom_models.push(model.clone());
            }
        }
    }

    /// Makes `id` the current model and counts the switch.
    pub fn switch_model(&mut self, id: &str) {
        self.current_model = id.to_string();
        self.model_switch_count += 1;
    }
}
