//! Consistent styling utilities for CLI output.
//!
//! Provides color and formatting helpers using owo-colors.

use owo_colors::OwoColorize;
use std::fmt::Display;

use crate::store::Theme;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Style for section headers (e.g., "Configuration", "Available commands")
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Style for labels/keys (e.g., "provider", "model")
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Style for primary values (e.g., chat titles, model names)
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    /// Style for secondary/supplementary info (e.g., ids, descriptions)
    pub fn secondary<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn error<T: Display>(text: T) -> String {
        format!("{}", text.red().bold())
    }

    pub fn warning<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    pub fn info<T: Display>(text: T) -> String {
        format!("{}", text.blue())
    }

    /// Style for commands (e.g., "/new", "/help")
    pub fn command<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    /// Style for hints/help text
    pub fn hint<T: Display>(text: T) -> String {
        format!("{}", text.dimmed().italic())
    }

    /// Style for the current/default marker
    pub fn current_marker() -> String {
        format!("{}", "(current)".dimmed())
    }

    pub fn version<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Speaker label for the user's messages
    pub fn user<T: Display>(text: T) -> String {
        format!("{}", text.bright_blue().bold())
    }

    /// Speaker label for the assistant's messages
    pub fn bot<T: Display>(text: T) -> String {
        format!("{}", text.magenta().bold())
    }

    pub fn bold<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    pub fn italic<T: Display>(text: T) -> String {
        format!("{}", text.italic())
    }

    /// Inline code span, colored for the theme
    pub fn inline_code<T: Display>(text: T, theme: Theme) -> String {
        match theme {
            Theme::Dark => format!("{}", text.bright_yellow()),
            Theme::Light => format!("{}", text.red()),
        }
    }

    /// Body of a fenced code block, colored for the theme
    pub fn code<T: Display>(text: T, theme: Theme) -> String {
        match theme {
            Theme::Dark => format!("{}", text.bright_white()),
            Theme::Light => format!("{}", text.black()),
        }
    }

    /// Header bar of a fenced code block
    pub fn code_header<T: Display>(text: T, theme: Theme) -> String {
        match theme {
            Theme::Dark => format!("{}", text.bright_cyan().bold()),
            Theme::Light => format!("{}", text.blue().bold()),
        }
    }
}
