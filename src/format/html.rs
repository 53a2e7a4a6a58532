use super::markup::{Block, Inline, parse};

/// Escapes text for use in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes text for use inside a double-quoted attribute value.
pub fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

/// Formats raw message text as an HTML fragment.
pub fn to_html(text: &str) -> String {
    render_blocks(&parse(text))
}

/// Renders parsed blocks as an HTML fragment.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();

    for block in blocks {
        match block {
            Block::Line(spans) => render_spans(spans, &mut out),
            Block::Break => out.push_str("<br>"),
            Block::Code { language, code } => {
                out.push_str(&format!(
                    "<div class=\"code-container\">\
                     <div class=\"code-header\"><div class=\"code-language\">{}</div></div>\
                     <pre><code class=\"language-{}\">{}</code></pre>\
                     </div>",
                    escape_html(&language.to_uppercase()),
                    escape_attr(language),
                    escape_html(code),
                ));
            }
        }
    }

    out
}

fn render_spans(spans: &[Inline], out: &mut String) {
    for span in spans {
        match span {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Code(code) => {
                out.push_str(&format!(
                    "<code class=\"inline-code\">{}</code>",
                    escape_html(code)
                ));
            }
            Inline::Bold(inner) => {
                out.push_str("<strong>");
                render_spans(inner, out);
                out.push_str("</strong>");
            }
            Inline::Italic(text) => {
                out.push_str(&format!("<em>{}</em>", escape_html(text)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>&\"'</b>"),
            "&lt;b&gt;&amp;\"'&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_attr_quotes() {
        assert_eq!(escape_attr("a\"b"), "a&quot;b");
    }

    #[test]
    fn test_python_block_is_tagged_and_escaped() {
        let html = to_html("```python\nif a < b and c > d:\n    pass\n```");

        assert!(html.contains("<code class=\"language-python\">"));
        assert!(html.contains("if a &lt; b and c &gt; d:\n    pass\n"));
        assert!(html.contains("PYTHON"));
        assert!(!html.contains("a < b"));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(
            to_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(
            to_html("use `Vec<T>` **now**\n*maybe*"),
            "use <code class=\"inline-code\">Vec&lt;T&gt;</code> <strong>now</strong><br><em>maybe</em>"
        );
    }

    #[test]
    fn test_language_attribute_cannot_break_out() {
        let html = to_html("```x\"><img>\ncode\n```");
        assert!(html.contains("language-x&quot;&gt;&lt;img&gt;"));
    }
}
