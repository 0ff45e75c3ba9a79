use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error};
use reqwest::Client;
use std::time::Duration;

use crate::app_config::{AZURE_SPEECH_KEY, AZURE_SPEECH_REGION, ProviderConfig, SpeechService};
use crate::errors::{ConfigError, ProviderError, truncate_error_body};
use crate::providers::{
    CachedToken, SpeechProvider, TokenSlot, api_error, endpoint_url, http_client, request_error,
};

/// Audio encoding requested from the service
pub const AZURE_OUTPUT_FORMAT: &str = "audio-48khz-192kbitrate-mono-mp3";

/// User agent sent with synthesis requests
const USER_AGENT: &str = "TeleprompterTTS";

// Issued tokens are valid for ten minutes
const TOKEN_LIFETIME: Duration = Duration::from_secs(600);

/// Azure Neural Voices client
#[derive(Debug)]
pub struct AzureSpeech {
    /// HTTP client for API requests
    client: Client,
    /// Subscription key
    subscription_key: String,
    /// Token exchange URL
    token_url: String,
    /// Synthesis URL
    tts_url: String,
    /// Current bearer token
    token: TokenSlot,
}

impl AzureSpeech {
    /// Create a new Azure client for `region`
    pub fn new(subscription_key: impl Into<String>, region: &str, timeout_secs: u64) -> Self {
        Self::with_urls(
            subscription_key,
            format!("https://{}.api.cognitive.microsoft.com/sts/v1.0/issueToken", region),
            format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1", region),
            timeout_secs,
        )
    }

    fn with_urls(
        subscription_key: impl Into<String>,
        token_url: String,
        tts_url: String,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: http_client(timeout_secs),
            subscription_key: subscription_key.into(),
            token_url,
            tts_url,
            token: TokenSlot::default(),
        }
    }

    /// Create a client from provider configuration
    ///
    /// Both the subscription key and the region are required. A non-empty
    /// `endpoint` replaces both regional hosts.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let key = config.require(&config.api_key, AZURE_SPEECH_KEY)?;
        let region = config.require(&config.region, AZURE_SPEECH_REGION)?;

        if config.endpoint.is_empty() {
            return Ok(Self::new(key, &region, config.timeout_secs));
        }

        Ok(Self::with_urls(
            key,
            endpoint_url(&config.endpoint, "", "/sts/v1.0/issueToken"),
            endpoint_url(&config.endpoint, "", "/cognitiveservices/v1"),
            config.timeout_secs,
        ))
    }

    /// Exchange the subscription key for a bearer token
    async fn issue_token(&self) -> Result<CachedToken, ProviderError> {
        let response = self
            .client
            .post(&self.token_url)
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key)
            .header("Content-Length", "0")
            .send()
            .await
            .map_err(|e| request_error("Failed to request Azure token", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = truncate_error_body(&response.text().await.unwrap_or_default());
            error!("Failed to get Azure token ({}): {}", status, body);
            return Err(ProviderError::AuthenticationError(format!(
                "Azure token request failed with status {}: {}",
                status, body
            )));
        }

        let token = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read Azure token: {}", e)))?;

        debug!("Azure token issued");
        Ok(CachedToken::new(token.trim().to_string(), TOKEN_LIFETIME))
    }
}

#[async_trait]
impl SpeechProvider for AzureSpeech {
    fn service(&self) -> SpeechService {
        SpeechService::Azure
    }

    async fn synthesize(&self, input: &str, _voice: &str) -> Result<Bytes, ProviderError> {
        // The voice is carried by the SSML document itself
        let token = self.token.get_or_fetch(|| self.issue_token()).await?;

        let response = self
            .client
            .post(&self.tts_url)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", AZURE_OUTPUT_FORMAT)
            .header("User-Agent", USER_AGENT)
            .body(input.as_bytes().to_vec())
            .send()
            .await
            .map_err(|e| request_error("Failed to send request to Azure TTS", e))?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("Azure TTS error: {}", err);
            return Err(err);
        }

        response
            .bytes()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read Azure audio: {}", e)))
    }
}
