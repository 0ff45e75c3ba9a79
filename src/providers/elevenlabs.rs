use async_trait::async_trait;
use bytes::Bytes;
use log::error;
use reqwest::Client;
use serde::Serialize;

use crate::app_config::{ELEVENLABS_API_KEY, ProviderConfig, SpeechService};
use crate::errors::{ConfigError, ProviderError};
use crate::providers::{SpeechProvider, api_error, http_client, request_error};

/// ElevenLabs API base URL
pub const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "eleven_monolingual_v1";

/// Premade voices addressable by name
const VOICE_IDS: &[(&str, &str)] = &[
    ("adam", "pNInz6obpgDQGcFmaJgB"),
    ("antoni", "ErXwobaYiN019PkySvjV"),
    ("arnold", "VR6AewLTigWG4xSOukaG"),
    ("bella", "EXAVITQu4vr4xnSDxMaL"),
    ("domi", "AZnzlk1XvdvUeBnXmlld"),
    ("elli", "MF3mGyEYCl7XYWbV9V6O"),
    ("josh", "TxGEqnHWrfWFTfGW9XjX"),
    ("rachel", "21m00Tcm4TlvDq8ikWAM"),
    ("sam", "yoZ06aMxZJJ28mfd3POQ"),
];

/// Resolve a voice name to its ID; unknown names are treated as raw IDs
pub fn resolve_voice_id(voice: &str) -> String {
    let lowered = voice.to_lowercase();
    VOICE_IDS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, id)| (*id).to_string())
        .unwrap_or_else(|| voice.to_string())
}

/// ElevenLabs text-to-speech request
#[derive(Debug, Serialize)]
pub struct ElevenLabsRequest {
    /// Text to speak
    text: String,
    /// Model identifier
    model_id: String,
    /// Voice settings
    voice_settings: VoiceSettings,
}

/// Voice stability / similarity settings
#[derive(Debug, Serialize)]
pub struct VoiceSettings {
    /// Stability (0.0 to 1.0)
    pub stability: f32,
    /// Similarity boost (0.0 to 1.0)
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

impl ElevenLabsRequest {
    /// Create a new request
    pub fn new(text: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model_id: model_id.into(),
            voice_settings: VoiceSettings::default(),
        }
    }
}

/// ElevenLabs client
#[derive(Debug)]
pub struct ElevenLabs {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL
    endpoint: String,
    /// Model identifier
    model_id: String,
}

impl ElevenLabs {
    /// Create a new ElevenLabs client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: http_client(timeout_secs),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model_id: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create a client from provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let api_key = config.require(&config.api_key, ELEVENLABS_API_KEY)?;
        let mut client = Self::new(api_key, config.endpoint.clone(), config.timeout_secs);
        if !config.model.trim().is_empty() {
            client.model_id = config.model.trim().to_string();
        }
        Ok(client)
    }

    fn speech_url(&self, voice_id: &str) -> String {
        let base = if self.endpoint.is_empty() {
            ELEVENLABS_API_URL
        } else {
            self.endpoint.trim_end_matches('/')
        };
        format!("{}/v1/text-to-speech/{}", base, voice_id)
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabs {
    fn service(&self) -> SpeechService {
        SpeechService::ElevenLabs
    }

    async fn synthesize(&self, input: &str, voice: &str) -> Result<Bytes, ProviderError> {
        let url = self.speech_url(&resolve_voice_id(voice));

        let response = self
            .client
            .post(&url)
            .header("Accept", "audio/mpeg")
            .header("Content-Type", "application/json")
            .header("xi-api-key", &self.api_key)
            .json(&ElevenLabsRequest::new(input, self.model_id.clone()))
            .send()
            .await
            .map_err(|e| request_error("Failed to send request to ElevenLabs API", e))?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("ElevenLabs API error: {}", err);
            return Err(err);
        }

        response
            .bytes()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read ElevenLabs audio: {}", e)))
    }
}
