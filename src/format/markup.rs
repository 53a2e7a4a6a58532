use regex::Regex;
use std::sync::LazyLock;

/// Language recorded for fences without a tag.
pub const PLAIN_LANGUAGE: &str = "plaintext";

const FENCE: &str = "```";

static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| compile(r"`([^`]+)`"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.*?)\*\*"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| compile(r"\*(.*?)\*"));

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    // patterns are compile-time constants
    Regex::new(pattern).expect("invalid built-in regex")
}

/// A formatted message: text lines, line breaks and code blocks in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// One line of prose, split into inline spans.
    Line(Vec<Inline>),
    /// Separates two consecutive prose lines.
    Break,
    /// A fenced code block. `code` keeps a trailing newline per line.
    Code { language: String, code: String },
}

/// Inline span within a prose line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Bold(Vec<Inline>),
    Italic(String),
}

/// Parses raw message text into blocks.
///
/// Lines starting with three backticks toggle a code fence; the rest of the
/// opening line is the language tag. Every prose line except the last line
/// of the input is followed by a [`Block::Break`]. A fence that is still
/// open at the end of input is emitted as a code block.
pub fn parse(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len().saturating_sub(1);

    let mut blocks = Vec::new();
    let mut fence: Option<(String, String)> = None;

    for (i, line) in lines.iter().enumerate() {
        if let Some(rest) = line.strip_prefix(FENCE) {
            match fence.take() {
                None => {
                    let language = rest.trim();
                    let language = if language.is_empty() {
                        PLAIN_LANGUAGE
                    } else {
                        language
                    };
                    fence = Some((language.to_string(), String::new()));
                }
                Some((language, code)) => blocks.push(Block::Code { language, code }),
            }
        } else if let Some((_, code)) = fence.as_mut() {
            code.push_str(line);
            code.push('\n');
        } else {
            blocks.push(Block::Line(parse_inline(line)));
            if i < last {
                blocks.push(Block::Break);
            }
        }
    }

    if let Some((language, code)) = fence {
        blocks.push(Block::Code { language, code });
    }

    blocks
}

/// Splits a prose line into inline code, bold and italic spans.
///
/// Inline code is matched first and its content is never parsed further.
/// Bold content may contain italic spans.
pub fn parse_inline(line: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in INLINE_CODE.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        parse_emphasis(&line[cursor..whole.start()], &mut spans);
        spans.push(Inline::Code(inner.as_str().to_string()));
        cursor = whole.end();
    }
    parse_emphasis(&line[cursor..], &mut spans);

    spans
}

fn parse_emphasis(text: &str, spans: &mut Vec<Inline>) {
    let mut cursor = 0;

    for caps in BOLD.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        parse_italic(&text[cursor..whole.start()], spans);

        let mut inner_spans = Vec::new();
        parse_italic(inner.as_str(), &mut inner_spans);
        spans.push(Inline::Bold(inner_spans));

        cursor = whole.end();
    }
    parse_italic(&text[cursor..], spans);
}

fn parse_italic(text: &str, spans: &mut Vec<Inline>) {
    let mut cursor = 0;

    for caps in ITALIC.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_text(&text[cursor..whole.start()], spans);
        spans.push(Inline::Italic(inner.as_str().to_string()));
        cursor = whole.end();
    }
    push_text(&text[cursor..], spans);
}

fn push_text(text: &str, spans: &mut Vec<Inline>) {
    if !text.is_empty() {
        spans.push(Inline::Text(text.to_string()));
    }
}

/// Returns every code block in `text` as `(language, code)` pairs.
pub fn code_blocks(text: &str) -> Vec<(String, String)> {
    parse(text)
        .into_iter()
        .filter_map(|block| match block {
            Block::Code { language, code } => Some((language, code)),
            _ => None,
        })
        .collect()
}
