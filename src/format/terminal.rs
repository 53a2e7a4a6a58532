use super::markup::{Block, Inline, parse};
use crate::store::Theme;
use crate::ui::Style;

/// Formats raw message text for the terminal.
pub fn to_terminal(text: &str, theme: Theme) -> String {
    render_blocks(&parse(text), theme)
}

/// Renders parsed blocks as styled terminal text.
///
/// Code blocks start on their own line with an upper-cased language header
/// and each code line is indented by two spaces.
pub fn render_blocks(blocks: &[Block], theme: Theme) -> String {
    let mut out = String::new();

    for block in blocks {
        match block {
            Block::Line(spans) => render_spans(spans, theme, &mut out),
            Block::Break => out.push('\n'),
            Block::Code { language, code } => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&Style::code_header(
                    format!("┌─ {}", language.to_uppercase()),
                    theme,
                ));
                out.push('\n');
                for line in code.lines() {
                    out.push_str(&Style::code_header("│ ", theme));
                    out.push_str(&Style::code(line, theme));
                    out.push('\n');
                }
                out.push_str(&Style::code_header("└─", theme));
                out.push('\n');
            }
        }
    }

    out.truncate(out.trim_end_matches('\n').len());
    out
}

fn render_spans(spans: &[Inline], theme: Theme, out: &mut String) {
    for span in spans {
        match span {
            Inline::Text(text) => out.push_str(text),
            Inline::Code(code) => out.push_str(&Style::inline_code(code, theme)),
            Inline::Bold(inner) => {
                let mut rendered = String::new();
                render_spans(inner, theme, &mut rendered);
                out.push_str(&Style::bold(rendered));
            }
            Inline::Italic(text) => out.push_str(&Style::italic(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(to_terminal("hello\nworld", Theme::Dark), "hello\nworld");
    }

    #[test]
    fn test_code_block_layout() {
        let rendered = to_terminal("Look:\n```rust\nfn main() {}\n```", Theme::Dark);
        assert_eq!(
            strip_ansi(&rendered),
            "Look:\n┌─ RUST\n│ fn main() {}\n└─"
        );
    }

    #[test]
    fn test_code_is_not_html_escaped() {
        let rendered = to_terminal("```cpp\na < b\n```", Theme::Light);
        assert!(strip_ansi(&rendered).contains("a < b"));
    }

    #[test]
    fn test_inline_markup_text_survives() {
        let rendered = to_terminal("**bold** `code` *it*", Theme::Dark);
        assert_eq!(strip_ansi(&rendered), "bold code it");
    }
}
