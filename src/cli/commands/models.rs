//! `buddy models` handler.

use anyhow::{Result, bail};

use crate::chat::ui;
use crate::cli::ModelsCommand;
use crate::models;
use crate::store::{SessionStore, SqliteStore};
use crate::ui::Style;

pub fn run_models(command: Option<ModelsCommand>) -> Result<()> {
    let store = SessionStore::new(SqliteStore::new()?);
    let mut settings = store.load_settings()?;

    match command {
        None => {
            ui::print_models(&settings);
            return Ok(());
        }
        Some(ModelsCommand::Add { id }) => {
            let id = settings.add_custom_model(&id)?;
            println!(
                "{} Added custom model: {}",
                Style::success("✓"),
                Style::value(&id)
            );
        }
        Some(ModelsCommand::Remove { id }) => {
            settings.remove_custom_model(&id)?;
            if settings.current_model == id {
                settings.current_model = models::DEFAULT_MODEL.to_string();
            }
            println!("{} Custom model removed", Style::success("✓"));
        }
        Some(ModelsCommand::Use { id }) => {
            if !settings.knows_model(&id) {
                bail!(
                    "Unknown model: {id}\n\n\
                     Add it first with: buddy models add {id}"
                );
            }
            settings.switch_model(&id);
            println!(
                "{} Switched to {}",
                Style::success("✓"),
                Style::value(models::display_name(&id))
            );
        }
    }

    store.save_settings(&settings)
}
