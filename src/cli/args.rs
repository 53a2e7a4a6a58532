use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::chat::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "buddy")]
#[command(about = "AI coding assistant chat for your terminal")]
#[command(version)]
pub struct Args {
    /// Provider name from config.toml (defaults to openrouter)
    #[arg(short = 'p', long, global = true)]
    pub provider: Option<String>,

    /// Model id for this run (e.g., openai/gpt-4)
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat (the default)
    Chat {
        /// Start a new chat instead of resuming the last one
        #[arg(short = 'n', long, conflicts_with = "resume")]
        new: bool,

        /// Resume a specific chat by id
        #[arg(short = 'r', long)]
        resume: Option<String>,
    },
    /// List saved chats, most recent first
    History {
        /// Show every saved chat instead of the last 10
        #[arg(short = 'a', long)]
        all: bool,
    },
    /// Print a saved chat
    Show {
        /// Chat id (defaults to the last opened chat)
        id: Option<String>,
    },
    /// Export a saved chat to a file
    Export {
        /// Chat id (defaults to the last opened chat)
        id: Option<String>,

        /// Output file or directory (defaults to the current directory)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
    /// Import a chat from an exported JSON file (reads stdin if omitted)
    Import {
        /// Path to the exported chat
        file: Option<PathBuf>,
    },
    /// Delete a saved chat
    Delete {
        /// Chat id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Delete every saved chat
    ClearHistory {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// List and manage models
    Models {
        #[command(subcommand)]
        command: Option<ModelsCommand>,
    },
    /// List configured providers
    Providers {
        /// Show details for one provider
        provider: Option<String>,
    },
    /// Configure the default provider and model
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Add a custom model id (organization/model-name)
    Add { id: String },
    /// Remove a custom model id
    Remove { id: String },
    /// Make a model the current one
    Use { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_default_is_chat() {
        let args = Args::try_parse_from(["buddy"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_parse_global_model() {
        let args = Args::try_parse_from(["buddy", "chat", "--new", "-m", "openai/gpt-4"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(args.model.as_deref(), Some("openai/gpt-4"));
        assert!(matches!(
            args.command,
            Some(Command::Chat {
                new: true,
                resume: None
            })
        ));
    }

    #[test]
    fn test_parse_export() {
        let args = Args::try_parse_from(["buddy", "export", "chat_1_a", "-f", "html"])
            .unwrap_or_else(|e| panic!("{e}"));
        let Some(Command::Export { id, output, format }) = args.command else {
            panic!("expected export");
        };
        assert_eq!(id.as_deref(), Some("chat_1_a"));
        assert!(output.is_none());
        assert_eq!(format, ExportFormat::Html);
    }

    #[test]
    fn test_new_conflicts_with_resume() {
        assert!(Args::try_parse_from(["buddy", "chat", "--new", "--resume", "x"]).is_err());
    }
}
