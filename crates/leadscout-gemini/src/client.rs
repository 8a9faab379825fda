//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One search is one POST: the prompt from [`build_prompt`], Google Search
//! grounding, and a JSON response schema. The reply text must parse as the
//! listing array directly; anything else is an error. No retry, caching or
//! request timeout is applied here.

use chrono::Utc;
use leadscout_core::{AppConfig, BusinessListing, Lead, LeadFinder, SearchFailed};
use reqwest::{Client, Url};

use crate::error::GeminiError;
use crate::prompt::{build_prompt, listing_response_schema};
use crate::types::{
    ApiErrorEnvelope, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    GoogleSearch, Part, Tool,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const DEFAULT_USER_AGENT: &str = "leadscout/0.1 (lead-generation)";

/// Longest slice of a non-JSON error body kept in [`GeminiError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Client for Gemini lead searches.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl GeminiClient {
    /// Creates a client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str) -> Result<Self, GeminiError> {
        Self::with_base_url(api_key, model, DEFAULT_USER_AGENT, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`GeminiError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder().user_agent(user_agent).build()?;

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| GeminiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(&format!("v1beta/models/{model}:generateContent")))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::MissingApiKey`] when no key is configured, or
    /// any error from [`GeminiClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeminiError> {
        let api_key = config
            .gemini_api_key
            .as_deref()
            .ok_or(GeminiError::MissingApiKey)?;
        Self::with_base_url(
            api_key,
            &config.gemini_model,
            &config.user_agent,
            &config.gemini_base_url,
        )
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Searches `location` and returns fresh leads in service order.
    ///
    /// All leads share one `search_date` and carry `location` verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SearchFailed`] for every failure; the cause is logged.
    pub async fn search(&self, location: &str) -> Result<Vec<Lead>, SearchFailed> {
        match self.fetch_listings(location).await {
            Ok(listings) => {
                let search_date = Utc::now();
                Ok(listings
                    .into_iter()
                    .map(|listing| Lead::from_listing(listing, location, search_date))
                    .collect())
            }
            Err(e) => {
                tracing::error!(
                    location = %location,
                    model = %self.model,
                    error = %e,
                    "lead search failed"
                );
                Err(SearchFailed)
            }
        }
    }

    /// Sends the search request and returns the validated listings.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::Http`] on network failure.
    /// - [`GeminiError::Status`] on a non-2xx response.
    /// - [`GeminiError::Deserialize`] if the envelope is not valid JSON.
    /// - [`GeminiError::Blocked`] if the prompt was refused.
    /// - [`GeminiError::EmptyResponse`] if no candidate text came back.
    /// - [`GeminiError::Schema`] if the text is not a listing array.
    pub async fn fetch_listings(
        &self,
        location: &str,
    ) -> Result<Vec<BusinessListing>, GeminiError> {
        let request = Self::build_request(location);
        tracing::debug!(location = %location, model = %self.model, "sending lead search");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GeminiError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| GeminiError::Deserialize {
                context: format!("generateContent(model={})", self.model),
                source: e,
            })?;

        if let Some(reason) = envelope.block_reason() {
            return Err(GeminiError::Blocked(reason.to_string()));
        }

        let Some(text) = envelope.text() else {
            tracing::warn!(
                location = %location,
                finish_reason = envelope.finish_reason().unwrap_or("unknown"),
                "candidate carried no text"
            );
            return Err(GeminiError::EmptyResponse);
        };
        let listings = parse_listings(&text)?;
        tracing::debug!(location = %location, count = listings.len(), "lead search parsed");
        Ok(listings)
    }

    fn build_request(location: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(build_prompt(location)),
                }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch::default(),
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: listing_response_schema(),
            },
        }
    }
}

impl LeadFinder for GeminiClient {
    async fn find_leads(&self, location: &str) -> Result<Vec<Lead>, SearchFailed> {
        self.search(location).await
    }
}

/// Parses candidate text as the listing array.
///
/// Surrounding whitespace is tolerated; prose or markdown fences are not.
///
/// # Errors
///
/// Returns [`GeminiError::EmptyResponse`] for blank text and
/// [`GeminiError::Schema`] if any element is missing a field or has a
/// non-string value.
pub fn parse_listings(text: &str) -> Result<Vec<BusinessListing>, GeminiError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(GeminiError::EmptyResponse);
    }
    serde_json::from_str(text).map_err(GeminiError::Schema)
}

/// Best-effort message from an error body: the API's `error.message`
/// (prefixed with its status name when given), otherwise the start of the
/// raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body).map_or_else(
        |_| body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        |envelope| match envelope.error.status {
            Some(status) => format!("{status}: {}", envelope.error.message),
            None => envelope.error.message,
        },
    )
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
