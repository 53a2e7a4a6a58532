//! Extracting a URL from a message and turning the fetched page into
//! plain text the model can read.

use regex::Regex;
use std::sync::LazyLock;

/// Maximum characters of page text attached to a message.
pub const MAX_CONTEXT_CHARS: usize = 10_000;

static URL: LazyLock<Regex> = LazyLock::new(|| compile(r"https?://[^\s]+"));
static SCRIPT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<script\b[^>]*>.*?</script\s*>"));
static STYLE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?is)<style\b[^>]*>.*?</style\s*>"));
static TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<[^>]*>"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    // patterns are compile-time constants
    Regex::new(pattern).expect("invalid built-in regex")
}

/// Returns the first `http://` or `https://` URL in `text`.
pub fn extract_url(text: &str) -> Option<&str> {
    URL.find(text).map(|m| m.as_str())
}

/// Strips scripts, styles and tags from an HTML document, decodes the common
/// entities, collapses whitespace and truncates to [`MAX_CONTEXT_CHARS`].
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT.replace_all(html, " ");
    let text = STYLE.replace_all(&text, " ");
    let text = TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = WHITESPACE.replace_all(&text, " ");

    text.trim().chars().take(MAX_CONTEXT_CHARS).collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Appends fetched page text to the user's message.
pub fn with_url_context(message: &str, url: &str, content: &str) -> String {
    format!(
        "{message}\n\n\
         [System: The following is the text content fetched from the URL provided by the user ({url})]\n\
         ---\n\
         {content}\n\
         ---\n\
         [System: End of URL content]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_url() {
        assert_eq!(
            extract_url("see https://example.com/a?b=1 and http://other.org"),
            Some("https://example.com/a?b=1")
        );
        assert_eq!(extract_url("no links here"), None);
        assert_eq!(extract_url("ftp://example.com"), None);
    }

    #[test]
    fn test_html_to_text_strips_markup() {
        let html = r#"<html><head><style>body { color: red; }</style>
            <script type="text/javascript">var x = "<p>";</script></head>
            <body><h1>Title</h1><p>Some &amp; more&nbsp;text</p></body></html>"#;

        assert_eq!(html_to_text(html), "Title Some & more text");
    }

    #[test]
    fn test_html_to_text_truncates() {
        let html = format!("<p>{}</p>", "a".repeat(MAX_CONTEXT_CHARS + 50));
        assert_eq!(html_to_text(&html).chars().count(), MAX_CONTEXT_CHARS);
    }

    #[test]
    fn test_with_url_context_format() {
        let message = with_url_context("summarize", "https://e.com", "page text");

        assert!(message.starts_with("summarize\n\n[System: The following is the text content"));
        assert!(message.contains("(https://e.com)]\n---\npage text\n---\n"));
        assert!(message.ends_with("[System: End of URL content]"));
    }
}
