use inquire::autocompletion::{Autocomplete, Replacement};
use std::path::PathBuf;

use super::transfer::ExportFormat;

// Available slash commands: (command, description)
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/new", "Start a new chat"),
    ("/clear", "Clear the current chat"),
    ("/history", "List recent chats"),
    ("/load", "Load a chat by number or id"),
    ("/delete", "Delete a chat by number or id"),
    ("/clear-history", "Delete all chats"),
    ("/export", "Export the current chat [json|html] [path]"),
    ("/import", "Import a chat from a JSON file"),
    ("/code", "Print code block n of the last reply, unstyled"),
    ("/model", "Show or switch the current model"),
    ("/models", "List available models"),
    ("/add-model", "Add a custom model id"),
    ("/remove-model", "Remove a custom model id"),
    ("/theme", "Toggle dark/light theme"),
    ("/stats", "Show usage statistics"),
    ("/config", "Show current configuration"),
    ("/help", "Show available commands"),
    ("/quit", "Exit chat mode"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') || input.contains(' ') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// A chat chosen either by its position in the last `/history` listing or
/// by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRef {
    Index(usize),
    Id(String),
}

impl ChatRef {
    fn parse(arg: &str) -> Self {
        let arg = arg.trim_start_matches('#');
        match arg.parse::<usize>() {
            Ok(n) if n > 0 => Self::Index(n),
            _ => Self::Id(arg.to_string()),
        }
    }
}

/// Slash command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    New,
    Clear,
    History,
    Load(ChatRef),
    Delete(ChatRef),
    ClearHistory,
    Export {
        format: ExportFormat,
        path: Option<PathBuf>,
    },
    Import(PathBuf),
    /// 1-based index of a code block in the last reply.
    Code(usize),
    Model(Option<String>),
    Models,
    AddModel(String),
    RemoveModel(String),
    Theme,
    Stats,
    Config,
    Help,
    Quit,
    /// A known command used without its required argument.
    Usage(&'static str),
    Unknown(String),
}

/// Input types
#[derive(Debug)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    // `//text` escapes a leading slash
    if let Some(escaped) = input.strip_prefix("//") {
        return Input::Text(format!("/{escaped}"));
    }

    match input.strip_prefix('/') {
        Some(cmd) if !looks_like_path(cmd) => parse_slash_command(cmd),
        _ => Input::Text(input.to_string()),
    }
}

/// `/usr/lib is missing` is a question, not a command.
fn looks_like_path(cmd: &str) -> bool {
    cmd.split_whitespace()
        .next()
        .is_some_and(|name| name.contains('/'))
}

fn parse_slash_command(cmd: &str) -> Input {
    let (name, rest) = cmd
        .split_once(char::is_whitespace)
        .map_or((cmd, ""), |(n, r)| (n, r.trim()));
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    let command = match (name, arg) {
        ("new", _) => SlashCommand::New,
        ("clear", _) => SlashCommand::Clear,
        ("history" | "h", _) => SlashCommand::History,
        ("load", Some(arg)) => SlashCommand::Load(ChatRef::parse(&arg)),
        ("load", None) => SlashCommand::Usage("/load <number|id>"),
        ("delete", Some(arg)) => SlashCommand::Delete(ChatRef::parse(&arg)),
        ("delete", None) => SlashCommand::Usage("/delete <number|id>"),
        ("clear-history", _) => SlashCommand::ClearHistory,
        ("export", arg) => parse_export(arg.as_deref()),
        ("import", Some(arg)) => SlashCommand::Import(PathBuf::from(arg)),
        ("import", None) => SlashCommand::Usage("/import <path>"),
        ("code", None) => SlashCommand::Code(1),
        ("code", Some(arg)) => match arg.trim_start_matches('#').parse::<usize>() {
            Ok(n) if n > 0 => SlashCommand::Code(n),
            _ => SlashCommand::Usage("/code [number]"),
        },
        ("model", arg) => SlashCommand::Model(arg),
        ("models", _) => SlashCommand::Models,
        ("add-model", Some(arg)) => SlashCommand::AddModel(arg),
        ("add-model", None) => SlashCommand::Usage("/add-model <organization/model-name>"),
        ("remove-model", Some(arg)) => SlashCommand::RemoveModel(arg),
        ("remove-model", None) => SlashCommand::Usage("/remove-model <organization/model-name>"),
        ("theme", _) => SlashCommand::Theme,
        ("stats", _) => SlashCommand::Stats,
        ("config", _) => SlashCommand::Config,
        ("help" | "?", _) => SlashCommand::Help,
        ("quit" | "exit" | "q", _) => SlashCommand::Quit,
        _ => SlashCommand::Unknown(cmd.split_whitespace().collect::<Vec<_>>().join(" ")),
    };

    Input::Command(command)
}

/// `/export [json|html] [path]`
fn parse_export(arg: Option<&str>) -> SlashCommand {
    let mut format = ExportFormat::Json;
    let mut path = None;

    for part in arg.unwrap_or_default().split_whitespace() {
        match part {
            "json" => format = ExportFormat::Json,
            "html" => format = ExportFormat::Html,
            other => path = Some(PathBuf::from(other)),
        }
    }

    SlashCommand::Export { format, path }
}
