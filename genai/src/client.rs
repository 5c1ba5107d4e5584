//! Gemini `generateContent` client implementation

use crate::{
    error::GenAiError,
    model::GenerativeModel,
    types::{GenerateContentRequest, GenerateContentResponse},
};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Default API base
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for [`GeminiClient`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,
    /// API base URL without trailing slash
    pub api_base: String,
    /// Model for ticket metadata
    pub text_model: String,
    /// Model for background images
    pub image_model: String,
    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    /// Config with default endpoint and models.
    ///
    /// # Errors
    ///
    /// Returns `GenAiError::MissingApiKey` if `api_key` is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, GenAiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenAiError::MissingApiKey);
        }

        Ok(Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            text_model: crate::metadata::DEFAULT_TEXT_MODEL.to_string(),
            image_model: crate::image::DEFAULT_IMAGE_MODEL.to_string(),
            timeout: None,
        })
    }

    /// Builder: Set API base
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl GeminiClient {
    /// Create a client from validated settings
    ///
    /// # Errors
    ///
    /// Returns `GenAiError::RequestFailed` if the HTTP client cannot be built
    pub fn new(config: &GeminiConfig) -> Result<Self, GenAiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GenAiError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!("{}/{model_path}:generateContent", self.api_base)
    }

    /// Call `generateContent` on `model`
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| GenAiError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response
                .json::<GenerateContentResponse>()
                .await
                .map_err(|e| GenAiError::ResponseParseFailed(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(GenAiError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(GenAiError::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(GenAiError::ApiError {
                    status: status.as_u16(),
                    message: body,
                })
            }
        }
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenAiError> {
        Self::generate_content(self, model, request).await
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_blank_key() {
        assert!(matches!(
            GeminiConfig::new("   "),
            Err(GenAiError::MissingApiKey)
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config = GeminiConfig::new("test-key").unwrap();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.text_model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "gemini-2.5-flash-image");
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_endpoint_building() {
        let config = GeminiConfig::new("test-key")
            .unwrap()
            .with_api_base("http://localhost:9000/v1beta/");
        let client = GeminiClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            client.endpoint("models/gemini-2.5-flash-image"),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = GeminiClient::new(&GeminiConfig::new("secret-key").unwrap()).unwrap();
        assert!(!format!("{client:?}").contains("secret-key"));
    }
}
