use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::app_config::{GOOGLE_APPLICATION_CREDENTIALS, ProviderConfig, SpeechService};
use crate::errors::{ConfigError, ProviderError};
use crate::providers::{
    CachedToken, SpeechProvider, TokenSlot, api_error, endpoint_url, http_client, request_error,
};

/// Google Cloud Text-to-Speech synthesis URL
pub const GOOGLE_TTS_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// OAuth scope requested for the access token
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_LANGUAGE_CODE: &str = "en-US";

/// Fields of a service account key file used for authentication
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account email, the JWT issuer
    pub client_email: String,
    /// PEM encoded RSA private key
    pub private_key: String,
    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Read and parse a service account key file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let credentials_error = |message: String| ConfigError::CredentialsFile {
            path: path.display().to_string(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| credentials_error(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| credentials_error(e.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// Google synthesize request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeRequest {
    input: SynthesisInput,
    voice: VoiceSelection,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput {
    ssml: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection {
    language_code: String,
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f32,
    pitch: f32,
}

impl SynthesizeRequest {
    /// Build an MP3 request for `ssml` spoken by `voice`
    pub fn new(ssml: impl Into<String>, voice: &str) -> Self {
        Self {
            input: SynthesisInput { ssml: ssml.into() },
            voice: VoiceSelection {
                language_code: language_code_for_voice(voice),
                name: voice.to_string(),
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: 1.0,
                pitch: 0.0,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Language code embedded in a voice name ("en-GB-Neural2-A" -> "en-GB")
pub fn language_code_for_voice(voice: &str) -> String {
    let mut parts = voice.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(lang), Some(region), Some(_))
            if lang.len() == 2
                && lang.chars().all(|c| c.is_ascii_lowercase())
                && region.len() == 2
                && region.chars().all(|c| c.is_ascii_uppercase()) =>
        {
            format!("{}-{}", lang, region)
        }
        _ => DEFAULT_LANGUAGE_CODE.to_string(),
    }
}

/// Google Cloud Text-to-Speech client
pub struct GoogleSpeech {
    /// HTTP client for API requests
    client: Client,
    /// Service account identity
    account: ServiceAccountKey,
    /// Parsed signing key
    signing_key: EncodingKey,
    /// Synthesis URL
    tts_url: String,
    /// Current access token
    token: TokenSlot,
}

impl std::fmt::Debug for GoogleSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSpeech")
            .field("client_email", &self.account.client_email)
            .field("token_uri", &self.account.token_uri)
            .field("tts_url", &self.tts_url)
            .finish()
    }
}

impl GoogleSpeech {
    /// Create a client from a parsed service account key
    pub fn new(account: ServiceAccountKey, tts_url: impl Into<String>, timeout_secs: u64) -> Result<Self, ConfigError> {
        let signing_key = EncodingKey::from_rsa_pem(account.private_key.as_bytes()).map_err(|e| {
            ConfigError::InvalidValue {
                field: "private_key".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            client: http_client(timeout_secs),
            account,
            signing_key,
            tts_url: tts_url.into(),
            token: TokenSlot::default(),
        })
    }

    /// Create a client from provider configuration
    ///
    /// The credentials file is read here so a bad path fails before any request.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ConfigError> {
        let path = config.require(&config.credentials_path, GOOGLE_APPLICATION_CREDENTIALS)?;
        let account = ServiceAccountKey::from_file(&path)?;
        let tts_url = endpoint_url(&config.endpoint, GOOGLE_TTS_URL, "/v1/text:synthesize");
        Self::new(account, tts_url, config.timeout_secs)
    }

    fn signed_assertion(&self) -> Result<String, ProviderError> {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            iss: &self.account.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.account.token_uri,
            iat: now,
            exp: now + 3600,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| ProviderError::AuthenticationError(format!("Failed to sign JWT: {}", e)))
    }

    /// Exchange a signed assertion for an access token
    async fn fetch_access_token(&self) -> Result<CachedToken, ProviderError> {
        let assertion = self.signed_assertion()?;

        let response = self
            .client
            .post(&self.account.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| request_error("Failed to request Google access token", e))?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("Google token exchange failed: {}", err);
            return Err(ProviderError::AuthenticationError(err.to_string()));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Google token: {}", e)))?;

        let lifetime = if token.expires_in > 0 { token.expires_in } else { 3600 };
        debug!("Google access token fetched, expires in {} seconds", lifetime);

        Ok(CachedToken::new(token.access_token, Duration::from_secs(lifetime)))
    }
}

#[async_trait]
impl SpeechProvider for GoogleSpeech {
    fn service(&self) -> SpeechService {
        SpeechService::Google
    }

    async fn synthesize(&self, input: &str, voice: &str) -> Result<Bytes, ProviderError> {
        let token = self.token.get_or_fetch(|| self.fetch_access_token()).await?;

        let response = self
            .client
            .post(&self.tts_url)
            .bearer_auth(token)
            .json(&SynthesizeRequest::new(input, voice))
            .send()
            .await
            .map_err(|e| request_error("Failed to send request to Google TTS", e))?;

        if !response.status().is_success() {
            let err = api_error(response).await;
            error!("Google TTS error: {}", err);
            return Err(err);
        }

        let body: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to parse Google response: {}", e)))?;

        STANDARD
            .decode(body.audio_content.as_bytes())
            .map(Bytes::from)
            .map_err(|e| ProviderError::ParseError(format!("Invalid audio content encoding: {}", e)))
    }
}
