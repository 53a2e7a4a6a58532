use thiserror::Error;

/// Failure while talking to the completion endpoint.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("API key not configured. Set it in config.toml or via the provider's api_key_env")]
    MissingApiKey,

    #[error("Failed to connect to API endpoint: {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status. `message` is the body's `error.message`, or
    /// `API error: <status>` when the body has none.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected API response: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    /// Classifies the failure from its message text. For API errors only the
    /// endpoint's message counts; the status code is not consulted.
    pub fn cause(&self) -> ErrorCause {
        match self {
            Self::Api { message, .. } => ErrorCause::classify(message),
            other => ErrorCause::classify(&other.to_string()),
        }
    }
}

/// Best-effort guess at what went wrong, from the error text alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCause {
    ApiKey,
    Model,
    Other,
}

impl ErrorCause {
    /// Classifies an error message by substring.
    ///
    /// `API key`, `401` and `403` point at credentials; `model` at the
    /// selected model. Credentials win when both match.
    pub fn classify(message: &str) -> Self {
        if message.contains("API key") || message.contains("401") || message.contains("403") {
            Self::ApiKey
        } else if message.contains("model") {
            Self::Model
        } else {
            Self::Other
        }
    }

    /// The apology shown in the transcript for this kind of failure.
    pub fn apology(self) -> String {
        let hint = match self {
            Self::ApiKey => "Please check your API key in config.toml.",
            Self::Model => "The selected model might be unavailable. Try another model.",
            Self::Other => "Please try again.",
        };
        format!("Sorry, I encountered an error. {hint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_api_key() {
        assert_eq!(ErrorCause::classify("Invalid API key"), ErrorCause::ApiKey);
        assert_eq!(ErrorCause::classify("API error: 401"), ErrorCause::ApiKey);
        assert_eq!(ErrorCause::classify("API error: 403"), ErrorCause::ApiKey);
    }

    #[test]
    fn test_classify_model() {
        assert_eq!(
            ErrorCause::classify("No endpoints found for model foo/bar"),
            ErrorCause::Model
        );
    }

    #[test]
    fn test_classify_credentials_win() {
        assert_eq!(
            ErrorCause::classify("model requires API key"),
            ErrorCause::ApiKey
        );
    }

    #[test]
    fn test_classify_other() {
        assert_eq!(ErrorCause::classify("Service unavailable"), ErrorCause::Other);
        // matching is case-sensitive
        assert_eq!(ErrorCause::classify("Model overloaded"), ErrorCause::Other);
    }

    #[test]
    fn test_missing_api_key_is_api_key_cause() {
        assert_eq!(CompletionError::MissingApiKey.cause(), ErrorCause::ApiKey);
    }

    #[test]
    fn test_api_error_displays_endpoint_message() {
        let err = CompletionError::Api {
            status: 400,
            message: "API error: 400".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 400");
    }

    #[test]
    fn test_api_error_cause_ignores_status() {
        let region = CompletionError::Api {
            status: 403,
            message: "This model is not available in your region".to_string(),
        };
        assert_eq!(region.cause(), ErrorCause::Model);

        let no_body = CompletionError::Api {
            status: 401,
            message: "API error: 401".to_string(),
        };
        assert_eq!(no_body.cause(), ErrorCause::ApiKey);

        let unauthorized = CompletionError::Api {
            status: 401,
            message: "No auth credentials found".to_string(),
        };
        assert_eq!(unauthorized.cause(), ErrorCause::Other);
    }

    #[test]
    fn test_apology_text() {
        assert_eq!(
            ErrorCause::Other.apology(),
            "Sorry, I encountered an error. Please try again."
        );
        assert!(ErrorCause::Model.apology().contains("Try another model"));
    }
}
