//! Message formatting.
//!
//! Raw message text is parsed once into [`Block`]s (prose lines, breaks,
//! fenced code blocks with their language) and then rendered either as an
//! escaped HTML fragment or as styled terminal text.

mod html;
mod markup;
mod terminal;

pub use html::{escape_attr, escape_html, render_blocks as render_html, to_html};
pub use markup::{Block, Inline, PLAIN_LANGUAGE, code_blocks, parse, parse_inline};
pub use terminal::{render_blocks as render_terminal, to_terminal};
