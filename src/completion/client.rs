use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::ChatBackend;
use super::error::CompletionError;
use super::prompt::CompletionRequest;

/// Title sent in the `X-Title` attribution header.
pub const APP_TITLE: &str = "BuddyAI - AI Coding Assistant";

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    referer: Option<String>,
}

impl CompletionClient {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            referer: None,
        }
    }

    /// Sets the `HTTP-Referer` attribution header.
    #[must_use]
    pub fn with_referer(mut self, referer: Option<String>) -> Self {
        self.referer = referer;
        self
    }

    pub fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.endpoint.trim_end_matches('/')
        )
    }

    /// Sends the request and returns the first choice's content.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;
        let url = self.completions_url();

        let mut http_request = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("X-Title", APP_TITLE)
            .json(request);

        if let Some(referer) = &self.referer {
            http_request = http_request.header("HTTP-Referer", referer);
        }

        debug!(
            %url,
            model = %request.model,
            messages = request.messages.len(),
            "sending completion request"
        );

        let response = http_request
            .send()
            .await
            .map_err(|source| CompletionError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| CompletionError::Request { url, source })?;

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| format!("API error: {}", status.as_u16()));
            warn!(status = status.as_u16(), %message, "completion request failed");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_completion(&body)
    }

    /// Fetches a page for URL context and returns its raw body.
    pub async fn fetch_page(&self, url: &str) -> Result<String, CompletionError> {
        let request_error = |source| CompletionError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: format!("Failed to fetch {url}"),
            });
        }

        response.text().await.map_err(request_error)
    }
}

impl ChatBackend for CompletionClient {
    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        Self::complete(self, request).await
    }

    async fn fetch_page(&self, url: &str) -> Result<String, CompletionError> {
        Self::fetch_page(self, url).await
    }
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()?
        .error?
        .message
        .filter(|m| !m.is_empty())
}

fn parse_completion(body: &str) -> Result<String, CompletionError> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| CompletionError::InvalidResponse("response has no choices".to_string()))
}
