use thiserror::Error;

/// Errors returned by the Gemini client before they are collapsed into
/// [`leadscout_core::SearchFailed`].
#[derive(Debug, Error)]
pub enum GeminiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Gemini API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The prompt was refused by the service's safety filters.
    #[error("Gemini blocked the prompt: {0}")]
    Blocked(String),

    /// No candidate text came back.
    #[error("Gemini returned no content")]
    EmptyResponse,

    /// The response envelope could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The candidate text is not an array of five-field listings.
    #[error("response does not match the listing schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
