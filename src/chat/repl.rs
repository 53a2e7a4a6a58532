use anyhow::Result;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{Select, Text};
use std::path::Path;

use super::command::{ChatRef, Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::controller::{ChatController, SendOutcome};
use super::ui;
use super::view::render_bubble;
use crate::completion::ChatBackend;
use crate::models::PRESET_MODELS;
use crate::store::{HISTORY_LIMIT, KeyValueStore};
use crate::ui::{Spinner, cancellable, confirm};

/// Connection details shown by `/config`.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub provider_name: String,
    pub endpoint: String,
    pub has_api_key: bool,
    /// Where chats are stored, for display.
    pub database: String,
}

/// Interactive chat loop on top of a [`ChatController`].
pub struct ChatRepl<S, B> {
    controller: ChatController<S, B>,
    info: SessionInfo,
}

impl<S: KeyValueStore, B: ChatBackend> ChatRepl<S, B> {
    pub const fn new(controller: ChatController<S, B>, info: SessionInfo) -> Self {
        Self { controller, info }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.print_chat();
        if !self.info.has_api_key {
            ui::print_error(super::controller::MISSING_API_KEY_NOTICE);
        }

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message("Ask a coding question, /help for commands, Ctrl+C to quit")
                .prompt();

            let Some(line) = cancellable(input)? else {
                println!();
                break;
            };

            match parse_input(&line) {
                Input::Empty => {}
                Input::Command(cmd) => {
                    let keep_going = self.handle_command(cmd)?;
                    self.flush_notifications();
                    if !keep_going {
                        break;
                    }
                }
                Input::Text(text) => self.send(&text).await?,
            }
        }

        ui::print_goodbye();
        Ok(())
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        let spinner = Spinner::thinking();
        let outcome = self.controller.send_message(text).await;
        spinner.stop();

        let outcome = outcome?;
        self.flush_notifications();

        match outcome {
            SendOutcome::Replied(message) | SendOutcome::Failed {
                apology: message, ..
            } => ui::print_bubble(&render_bubble(&message), self.theme()),
            SendOutcome::Skipped | SendOutcome::MissingApiKey => {}
        }
        Ok(())
    }

    fn handle_command(&mut self, cmd: SlashCommand) -> Result<bool> {
        match cmd {
            SlashCommand::New => {
                self.controller.new_chat()?;
                self.print_chat();
            }
            SlashCommand::Clear => {
                if confirm("Clear all messages in this chat?")? && self.controller.clear_chat()? {
                    self.print_chat();
                }
            }
            SlashCommand::History => {
                let history = self.controller.history(Some(HISTORY_LIMIT))?;
                ui::print_history(&history, &self.controller.session().id);
            }
            SlashCommand::Load(chat) => {
                if let Some(id) = self.resolve(&chat)?
                    && self.controller.load_chat(&id)?
                {
                    self.print_chat();
                }
            }
            SlashCommand::Delete(chat) => {
                if let Some(id) = self.resolve(&chat)?
                    && confirm("Delete this chat from history?")?
                {
                    let was_current = id == self.controller.session().id;
                    if self.controller.delete_chat(&id)? && was_current {
                        self.print_chat();
                    }
                }
            }
            SlashCommand::ClearHistory => {
                if confirm("Delete ALL chat history? This cannot be undone.")? {
                    self.controller.clear_history()?;
                    self.print_chat();
                }
            }
            SlashCommand::Export { format, path } => {
                self.controller.export_chat(None, path.as_deref(), format)?;
            }
            SlashCommand::Import(path) => {
                self.import(&path)?;
            }
            SlashCommand::Code(n) => {
                let blocks = self.controller.last_reply_code_blocks();
                match blocks.get(n - 1) {
                    Some((language, code)) => ui::print_raw_code(language, code),
                    None => ui::print_error(&format!(
                        "No code block #{n} in the last reply ({} found)",
                        blocks.len()
                    )),
                }
            }
            SlashCommand::Model(Some(id)) => {
                self.controller.switch_model(&id)?;
            }
            SlashCommand::Model(None) => {
                ui::print_current_model(self.controller.current_model());
                self.pick_model()?;
            }
            SlashCommand::Models => ui::print_models(self.controller.settings()),
            SlashCommand::AddModel(id) => {
                self.controller.add_custom_model(&id)?;
            }
            SlashCommand::RemoveModel(id) => {
                self.controller.remove_custom_model(&id)?;
            }
            SlashCommand::Theme => {
                self.controller.toggle_theme()?;
            }
            SlashCommand::Stats => ui::print_stats(&self.controller.stats()),
            SlashCommand::Config => ui::print_config(&self.info, self.controller.settings()),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::Quit => return Ok(false),
            SlashCommand::Usage(usage) => ui::print_usage(usage),
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
            }
        }
        Ok(true)
    }

    fn import(&mut self, path: &Path) -> Result<()> {
        if let Some(id) = self.controller.import_chat(path)? {
            self.flush_notifications();
            if confirm("Open the imported chat now?")? {
                self.controller.load_chat(&id)?;
                self.print_chat();
            }
        }
        Ok(())
    }

    /// Offers every known model in a picker and switches to the choice.
    fn pick_model(&mut self) -> Result<()> {
        let settings = self.controller.settings();
        let options: Vec<String> = PRESET_MODELS
            .iter()
            .map(|p| p.id.to_string())
            .chain(settings.custom_models.iter().cloned())
            .collect();
        let cursor = options
            .iter()
            .position(|m| *m == settings.current_model)
            .unwrap_or(0);

        let answer = Select::new("Switch model:", options)
            .with_starting_cursor(cursor)
            .prompt();
        if let Some(choice) = cancellable(answer)? {
            self.controller.switch_model(&choice)?;
        }
        Ok(())
    }

    /// Turns a `/load` or `/delete` argument into a chat id.
    fn resolve(&self, chat: &ChatRef) -> Result<Option<String>> {
        match chat {
            ChatRef::Id(id) => Ok(Some(id.clone())),
            ChatRef::Index(n) => {
                let history = self.controller.history(Some(HISTORY_LIMIT))?;
                match history.get(n - 1) {
                    Some(entry) => Ok(Some(entry.id.clone())),
                    None => {
                        ui::print_error(&format!(
                            "No chat #{n}; /history lists {} chats",
                            history.len()
                        ));
                        Ok(None)
                    }
                }
            }
        }
    }

    fn print_chat(&self) {
        let session = self.controller.session();
        ui::print_header(session.display_title(), self.controller.current_model());
        ui::print_transcript(&self.controller.transcript(), self.theme());
    }

    fn flush_notifications(&mut self) {
        ui::print_notifications(&self.controller.drain_notifications());
    }

    fn theme(&self) -> crate::store::Theme {
        self.controller.settings().theme
    }
}
