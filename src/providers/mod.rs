/*!
 * Provider implementations for different speech synthesis services.
 *
 * This module contains client implementations for the supported backends:
 * - Azure: SSML over REST, subscription key exchanged for a bearer token
 * - Google: SSML over REST, service account JWT exchanged for an access token
 * - ElevenLabs: plain text over REST, voice names mapped to voice IDs
 */

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use std::fmt::Debug;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::app_config::{ProviderConfig, SpeechService};
use crate::errors::{ConfigError, ProviderError, truncate_error_body};
use crate::notation::NotationFormat;

/// Common trait for all speech providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the dispatcher.
#[async_trait]
pub trait SpeechProvider: Send + Sync + Debug {
    /// Service this provider talks to
    fn service(&self) -> SpeechService;

    /// Input the provider expects
    fn notation_format(&self) -> NotationFormat {
        self.service().notation_format()
    }

    /// Synthesize `input` (SSML or plain text) with `voice`
    ///
    /// # Returns
    /// * `Result<Bytes, ProviderError>` - The encoded audio or an error
    async fn synthesize(&self, input: &str, voice: &str) -> Result<Bytes, ProviderError>;
}

/// Build the provider for `service` from explicit configuration
pub fn create_provider(
    service: SpeechService,
    config: &ProviderConfig,
) -> Result<Box<dyn SpeechProvider>, ConfigError> {
    match service {
        SpeechService::Azure => Ok(Box::new(azure::AzureSpeech::from_config(config)?)),
        SpeechService::Google => Ok(Box::new(google::GoogleSpeech::from_config(config)?)),
        SpeechService::ElevenLabs => Ok(Box::new(elevenlabs::ElevenLabs::from_config(config)?)),
    }
}

/// HTTP client with the configured timeout
pub(crate) fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_default()
}

/// Map a transport failure to the matching provider error
pub(crate) fn request_error(context: &str, error: reqwest::Error) -> ProviderError {
    if error.is_connect() || error.is_timeout() {
        ProviderError::ConnectionError(format!("{}: {}", context, error))
    } else {
        ProviderError::RequestFailed(format!("{}: {}", context, error))
    }
}

/// Turn a non-success response into an `ApiError` with a truncated body
pub(crate) async fn api_error(response: Response) -> ProviderError {
    let status_code = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    ProviderError::ApiError {
        status_code,
        message: truncate_error_body(&body),
    }
}

/// Join a configured base URL override with a path, or use the default URL
pub(crate) fn endpoint_url(endpoint: &str, default_url: &str, path: &str) -> String {
    if endpoint.is_empty() {
        default_url.to_string()
    } else {
        format!("{}{}", endpoint.trim_end_matches('/'), path)
    }
}

/// Bearer token reused until shortly before it expires
#[derive(Debug, Clone)]
pub(crate) struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    pub(crate) fn new(value: String, lifetime: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + lifetime,
        }
    }

    // Tokens within a minute of expiry are refreshed
    fn is_fresh(&self) -> bool {
        self.expires_at > Instant::now() + Duration::from_secs(60)
    }
}

/// Slot holding a provider's current token
#[derive(Debug, Default)]
pub(crate) struct TokenSlot {
    inner: Mutex<Option<CachedToken>>,
}

impl TokenSlot {
    /// Return the cached token, or fetch and store a new one
    pub(crate) async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<String, ProviderError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<CachedToken, ProviderError>>,
    {
        let mut guard = self.inner.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }
        let token = fetch().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }
}

pub mod azure;
pub mod elevenlabs;
pub mod google;
pub mod mock;
