//! Chat-completion client for OpenAI-compatible APIs.

mod client;
mod error;
mod prompt;
mod url_context;

use std::future::Future;

pub use client::{APP_TITLE, CompletionClient};
pub use error::{CompletionError, ErrorCause};
pub use prompt::{
    ChatMessage, CompletionRequest, Role, SYSTEM_PROMPT_TEMPLATE, build_system_prompt,
};
pub use url_context::{MAX_CONTEXT_CHARS, extract_url, html_to_text, with_url_context};

/// The network side of a chat: completions and URL fetches.
pub trait ChatBackend {
    /// Returns `true` if requests can be authenticated.
    fn has_api_key(&self) -> bool;

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;

    fn fetch_page(&self, url: &str)
    -> impl Future<Output = Result<String, CompletionError>> + Send;
}

/// Estimates the tokens in a reply as one per four characters, rounded up.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }
}
