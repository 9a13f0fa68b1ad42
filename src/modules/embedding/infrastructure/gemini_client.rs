//! Google Generative Language embedding client
//!
//! Makes exactly one request per call. Retrying is the caller's decision; the
//! client only enforces a request-rate floor so a tight caller loop cannot
//! exceed the provider quota.

use crate::modules::embedding::domain::provider::{EmbeddingProvider, TaskType};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use async_trait::async_trait;
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "models/embedding-001";

type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

/// Connection settings for the embedding endpoint
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Expected vector length; responses of any other length are rejected
    pub dimensions: Option<usize>,
    pub timeout: Duration,
    /// Minimum spacing between requests
    pub min_interval: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            dimensions: None,
            timeout: Duration::from_secs(30),
            min_interval: Duration::from_secs(1),
        }
    }
}

pub struct GeminiEmbedder {
    client: Client,
    rate_limiter: DirectRateLimiter,
    endpoint: String,
    model: String,
    dimensions: Option<usize>,
}

impl GeminiEmbedder {
    pub fn new(config: GeminiConfig) -> AppResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "missing embedding API key".to_string(),
            ));
        }
        if config.model.trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "missing embedding model name".to_string(),
            ));
        }

        let model = Self::qualified_model(&config.model);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(config.api_key.trim())
            .map_err(|_| AppError::ConfigurationError("invalid embedding API key".to_string()))?;
        headers.insert("x-goog-api-key", key);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                AppError::ConfigurationError(format!("failed to build HTTP client: {}", e))
            })?;

        let endpoint = format!(
            "{}/{}:embedContent",
            config.base_url.trim_end_matches('/'),
            model
        );

        Ok(Self {
            client,
            rate_limiter: Self::create_rate_limiter(config.min_interval)?,
            endpoint,
            model,
            dimensions: config.dimensions,
        })
    }

    fn create_rate_limiter(min_interval: Duration) -> AppResult<DirectRateLimiter> {
        let quota = Quota::with_period(min_interval.max(Duration::from_millis(1)))
            .ok_or_else(|| {
                AppError::ConfigurationError("request interval must be positive".to_string())
            })?
            .allow_burst(NonZeroU32::MIN);
        Ok(GovernorRateLimiter::direct(quota))
    }

    /// `embedding-001` and `models/embedding-001` both name the same model
    fn qualified_model(model: &str) -> String {
        let model = model.trim();
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    fn status_to_error(status: StatusCode, body: &str) -> AppError {
        let detail = if body.chars().count() > 200 {
            format!("{}...", body.chars().take(200).collect::<String>())
        } else {
            body.to_string()
        };
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                AppError::RateLimitError(format!("embedding quota exceeded: {}", detail))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::Unauthorized(format!("embedding API rejected the key: {}", detail))
            }
            _ if status.is_server_error() => AppError::ExternalServiceError(format!(
                "embedding service unavailable ({}): {}",
                status, detail
            )),
            _ => AppError::ApiError(format!("HTTP {}: {}", status, detail)),
        }
    }

    fn validate(&self, values: Vec<f32>) -> AppResult<Vec<f32>> {
        if values.is_empty() {
            return Err(AppError::ValidationError(
                "embedding service returned an empty vector".to_string(),
            ));
        }
        if let Some(expected) = self.dimensions {
            if values.len() != expected {
                return Err(AppError::ValidationError(format!(
                    "expected a {}-dimension vector, got {}",
                    expected,
                    values.len()
                )));
            }
        }
        Ok(values)
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedder {
    async fn embed(&self, text: &str, task_type: TaskType) -> AppResult<Vec<f32>> {
        self.rate_limiter.until_ready().await;

        let request = EmbedContentRequest::new(&self.model, text, task_type);
        LogContext::api_call(self.provider_name(), "embedContent", "sending", None);
        let timer = TimedOperation::new("embedContent");

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            warn!("embedContent failed with {} after {}ms", status, timer.elapsed_ms());
            return Err(Self::status_to_error(status, &body));
        }

        let parsed: EmbedContentResponse = response.json().await.map_err(|e| {
            AppError::SerializationError(format!("failed to parse embedding response: {}", e))
        })?;
        let duration = timer.finish();
        LogContext::api_call(
            self.provider_name(),
            "embedContent",
            status.as_str(),
            Some(duration),
        );
        debug!(
            "embedContent returned {} values",
            parsed.embedding.values.len()
        );

        self.validate(parsed.embedding.values)
    }

    fn provider_name(&self) -> &str {
        "Gemini"
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: TaskType,
}

impl<'a> EmbedContentRequest<'a> {
    fn new(model: &'a str, text: &'a str, task_type: TaskType) -> Self {
        Self {
            model,
            content: Content {
                parts: vec![Part { text }],
            },
            task_type,
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    #[serde(default)]
    values: Vec<f32>,
}
