//! Chat mode UI components.

use crate::format::render_terminal;
use crate::models::{self, PRESET_MODELS};
use crate::store::{HistoryEntry, Settings, Theme};
use crate::ui::Style;

use super::command::SLASH_COMMANDS;
use super::controller::{Notification, NotificationKind, Stats};
use super::repl::SessionInfo;
use super::view::{Author, Bubble};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(title: &str, model: &str) {
    println!(
        "{} {} - AI Coding Assistant",
        Style::header("BuddyAI"),
        Style::version(format!("v{VERSION}"))
    );
    println!(
        "{} {}  {} {}",
        Style::label("chat"),
        Style::value(title),
        Style::label("model"),
        Style::value(models::display_name(model))
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_bubble(bubble: &Bubble, theme: Theme) {
    let author = match bubble.author {
        Author::User => Style::user("You"),
        Author::Bot => Style::bot("BuddyAI"),
    };
    println!("{author} {}", Style::secondary(&bubble.time));
    println!("{}", render_terminal(&bubble.blocks, theme));
    println!();
}

pub fn print_transcript(bubbles: &[Bubble], theme: Theme) {
    for bubble in bubbles {
        print_bubble(bubble, theme);
    }
}

/// Prints code without decoration so it can be selected and copied as is.
pub fn print_raw_code(language: &str, code: &str) {
    eprintln!("{}", Style::hint(format!("{language}:")));
    print!("{code}");
    if !code.ends_with('\n') {
        println!();
    }
    println!();
}

pub fn print_notification(notification: &Notification) {
    let message = &notification.message;
    match notification.kind {
        NotificationKind::Success => eprintln!("{} {message}", Style::success("✓")),
        NotificationKind::Info => eprintln!("{} {message}", Style::info("ℹ")),
        NotificationKind::Warning => eprintln!("{} {message}", Style::warning("⚠")),
        NotificationKind::Error => eprintln!("{} {message}", Style::error("✗")),
    }
}

pub fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        print_notification(notification);
    }
    if !notifications.is_empty() {
        eprintln!();
    }
}

/// Numbered list; the numbers are what `/load` and `/delete` accept.
pub fn print_history(history: &[HistoryEntry], current_id: &str) {
    if history.is_empty() {
        println!("{}", Style::secondary("No chat history yet"));
        println!();
        return;
    }

    println!("{}", Style::header("Recent chats"));
    for (i, entry) in history.iter().enumerate() {
        let marker = if entry.id == current_id {
            format!(" {}", Style::current_marker())
        } else {
            String::new()
        };
        println!(
            "  {:>2}. {}{marker}  {}",
            i + 1,
            Style::value(entry.display_title()),
            Style::secondary(format!(
                "{} messages, {}",
                entry.message_count,
                entry
                    .last_modified
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M")
            ))
        );
        println!("      {}", Style::hint(&entry.id));
        if !entry.preview.is_empty() {
            println!("      {}", Style::secondary(&entry.preview));
        }
    }
    println!();
}

pub fn print_models(settings: &Settings) {
    println!("{}", Style::header("Models"));
    for preset in PRESET_MODELS {
        let marker = if preset.id == settings.current_model {
            format!(" {}", Style::current_marker())
        } else {
            String::new()
        };
        println!(
            "  {}{marker}  {} {}",
            Style::value(preset.id),
            Style::secondary(preset.description),
            Style::hint(format!("[{}]", preset.badge))
        );
    }

    if !settings.custom_models.is_empty() {
        println!();
        println!("{}", Style::header("Custom models"));
        for id in &settings.custom_models {
            let marker = if *id == settings.current_model {
                format!(" {}", Style::current_marker())
            } else {
                String::new()
            };
            println!("  {}{marker}", Style::value(id));
        }
    }

    if !settings.knows_model(&settings.current_model) {
        println!();
        println!(
            "  {} {}",
            Style::value(&settings.current_model),
            Style::current_marker()
        );
    }
    println!();
}

pub fn print_current_model(model: &str) {
    println!(
        "{}  {} {}",
        Style::label("model"),
        Style::value(models::display_name(model)),
        Style::secondary(format!("({model})"))
    );
    println!("       {}", Style::secondary(models::description(model)));
    println!();
}

pub fn print_stats(stats: &Stats) {
    println!("{}", Style::header("Statistics"));
    println!(
        "  {}  {}",
        Style::label("messages in chat"),
        Style::value(stats.total_messages)
    );
    println!(
        "  {}       {}",
        Style::label("tokens used"),
        Style::value(stats.tokens_used)
    );
    println!(
        "  {}     {}",
        Style::label("model switches"),
        Style::value(stats.model_switches)
    );
    println!();
}

pub fn print_config(info: &SessionInfo, settings: &Settings) {
    println!("{}", Style::header("Configuration"));
    println!(
        "  {}   {}",
        Style::label("provider"),
        Style::value(&info.provider_name)
    );
    println!(
        "  {}      {}",
        Style::label("model"),
        Style::value(&settings.current_model)
    );
    println!(
        "  {}      {}",
        Style::label("theme"),
        Style::value(settings.theme)
    );
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        Style::secondary(&info.endpoint)
    );
    println!(
        "  {}    {}",
        Style::label("api key"),
        if info.has_api_key {
            Style::success("configured")
        } else {
            Style::warning("missing")
        }
    );
    println!(
        "  {}   {}",
        Style::label("database"),
        Style::secondary(&info.database)
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    let width = SLASH_COMMANDS
        .iter()
        .map(|(cmd, _)| cmd.len())
        .max()
        .unwrap_or(0);
    for (cmd, description) in SLASH_COMMANDS {
        println!(
            "  {}  {}",
            Style::command(format!("{cmd:<width$}")),
            Style::secondary(description)
        );
    }
    println!();
    println!(
        "  {}",
        Style::hint("Anything else is sent to the assistant. Start with // to send a leading /.")
    );
    println!();
}

pub fn print_usage(usage: &str) {
    eprintln!("{} {}", Style::warning("Usage:"), Style::command(usage));
    eprintln!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
