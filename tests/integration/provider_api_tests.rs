/*!
 * Integration tests for provider API interactions against a local mock server
 */

use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;
use televox::app_config::{ProviderConfig, SpeechService};
use televox::errors::{ConfigError, MAX_ERROR_BODY_CHARS, ProviderError};
use televox::providers::{SpeechProvider, create_provider};
use wiremock::matchers::{body_json, body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use crate::common;

fn azure_config(server: &MockServer) -> ProviderConfig {
    let mut config = ProviderConfig::new(SpeechService::Azure);
    config.api_key = "test-key".to_string();
    config.region = "eastus".to_string();
    config.endpoint = server.uri();
    config
}

fn elevenlabs_config(endpoint: String) -> ProviderConfig {
    let mut config = ProviderConfig::new(SpeechService::ElevenLabs);
    config.api_key = "xi-test".to_string();
    config.endpoint = endpoint;
    config
}

/// Writes a service account key file whose token endpoint is the mock server
fn google_credentials(dir: &TempDir, server: &MockServer) -> Result<PathBuf> {
    let private_key = std::fs::read_to_string(common::test_resource_path("test_service_account_key.pem"))?;
    let key = json!({
        "type": "service_account",
        "project_id": "televox-test",
        "client_email": "tts@televox-test.iam.gserviceaccount.com",
        "private_key": private_key,
        "token_uri": format!("{}/token", server.uri()),
    });
    common::create_test_file(dir.path(), "service-account.json", &key.to_string())
}

async fn mount_azure_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/sts/v1.0/issueToken"))
        .and(header("Ocp-Apim-Subscription-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string("azure-token"))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Azure exchanges the key once and reuses the bearer token for later requests
#[tokio::test]
async fn test_azure_synthesize_withValidKey_shouldReuseTokenAndReturnAudio() -> Result<()> {
    let server = MockServer::start().await;
    mount_azure_token(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/cognitiveservices/v1"))
        .and(header("Authorization", "Bearer azure-token"))
        .and(header("Content-Type", "application/ssml+xml"))
        .and(header("X-Microsoft-OutputFormat", "audio-48khz-192kbitrate-mono-mp3"))
        .and(header("User-Agent", "TeleprompterTTS"))
        .and(body_string_contains(r#"<voice name="en-US-GuyNeural">"#))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-azure".to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let provider = create_provider(SpeechService::Azure, &azure_config(&server))?;
    let ssml = televox::to_ssml("Hello • world", "en-US-GuyNeural");

    let first = provider.synthesize(&ssml, "en-US-GuyNeural").await?;
    let second = provider.synthesize(&ssml, "en-US-GuyNeural").await?;

    assert_eq!(first.as_ref(), b"ID3-azure");
    assert_eq!(second.as_ref(), b"ID3-azure");
    Ok(())
}

#[tokio::test]
async fn test_azure_synthesize_withRejectedKey_shouldReturnAuthenticationError() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sts/v1.0/issueToken"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid subscription key"))
        .mount(&server)
        .await;

    let provider = create_provider(SpeechService::Azure, &azure_config(&server))?;
    let result = provider.synthesize("<speak/>", "en-US-GuyNeural").await;

    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
    Ok(())
}

#[tokio::test]
async fn test_azure_synthesize_withServiceError_shouldTruncateMessage() -> Result<()> {
    let server = MockServer::start().await;
    mount_azure_token(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/cognitiveservices/v1"))
        .respond_with(ResponseTemplate::new(400).set_body_string("x".repeat(2000)))
        .mount(&server)
        .await;

    let provider = create_provider(SpeechService::Azure, &azure_config(&server))?;
    match provider.synthesize("<speak/>", "en-US-GuyNeural").await {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 400);
            assert_eq!(message.len(), MAX_ERROR_BODY_CHARS);
        }
        other => panic!("Expected API error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_azure_synthesize_withLongTokenFailureBody_shouldTruncateMessage() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sts/v1.0/issueToken"))
        .respond_with(ResponseTemplate::new(401).set_body_string("y".repeat(2000)))
        .mount(&server)
        .await;

    let provider = create_provider(SpeechService::Azure, &azure_config(&server))?;
    match provider.synthesize("<speak/>", "en-US-GuyNeural").await {
        Err(ProviderError::AuthenticationError(message)) => {
            assert!(message.contains("401"));
            assert_eq!(message.matches('y').count(), MAX_ERROR_BODY_CHARS);
        }
        other => panic!("Expected authentication error, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_create_provider_withoutAzureRegion_shouldFailBeforeAnyRequest() {
    let mut config = ProviderConfig::new(SpeechService::Azure);
    config.api_key = "test-key".to_string();

    let result = create_provider(SpeechService::Azure, &config);
    assert!(matches!(
        result,
        Err(ConfigError::MissingValue { variable, .. }) if variable == "AZURE_SPEECH_REGION"
    ));
}

/// Google signs a JWT, exchanges it for an access token and decodes the audio
#[tokio::test]
async fn test_google_synthesize_withServiceAccount_shouldDecodeAudioContent() -> Result<()> {
    let server = MockServer::start().await;
    let temp_dir = common::create_temp_dir()?;
    let credentials = google_credentials(&temp_dir, &server)?;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer",
        ))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/text:synthesize"))
        .and(header("Authorization", "Bearer ya29.test-token"))
        .and(body_partial_json(json!({
            "voice": {"languageCode": "en-GB", "name": "en-GB-Neural2-A"},
            "audioConfig": {"audioEncoding": "MP3", "speakingRate": 1.0, "pitch": 0.0}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "audioContent": STANDARD.encode(b"ID3-google")
        })))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = ProviderConfig::new(SpeechService::Google);
    config.credentials_path = credentials.display().to_string();
    config.endpoint = server.uri();
    let provider = create_provider(SpeechService::Google, &config)?;

    let ssml = televox::to_ssml("Cheers", "en-GB-Neural2-A");
    let audio = provider.synthesize(&ssml, "en-GB-Neural2-A").await?;
    assert_eq!(audio.as_ref(), b"ID3-google");

    // Second call reuses the cached access token
    provider.synthesize(&ssml, "en-GB-Neural2-A").await?;
    Ok(())
}

#[tokio::test]
async fn test_google_synthesize_withRejectedAssertion_shouldReturnAuthenticationError() -> Result<()> {
    let server = MockServer::start().await;
    let temp_dir = common::create_temp_dir()?;
    let credentials = google_credentials(&temp_dir, &server)?;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&server)
        .await;

    let mut config = ProviderConfig::new(SpeechService::Google);
    config.credentials_path = credentials.display().to_string();
    config.endpoint = server.uri();
    let provider = create_provider(SpeechService::Google, &config)?;

    let result = provider.synthesize("<speak/>", "en-US-Neural2-F").await;
    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
    Ok(())
}

#[test]
fn test_create_provider_withUnreadableGoogleCredentials_shouldReturnCredentialsError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = common::create_test_file(temp_dir.path(), "key.json", "{\"client_email\": 1}")?;

    let mut config = ProviderConfig::new(SpeechService::Google);
    config.credentials_path = broken.display().to_string();
    assert!(matches!(
        create_provider(SpeechService::Google, &config),
        Err(ConfigError::CredentialsFile { .. })
    ));

    config.credentials_path = temp_dir.path().join("missing.json").display().to_string();
    assert!(matches!(
        create_provider(SpeechService::Google, &config),
        Err(ConfigError::CredentialsFile { .. })
    ));
    Ok(())
}

/// Named voices are mapped to their ElevenLabs voice IDs
#[tokio::test]
async fn test_elevenlabs_synthesize_withKnownVoice_shouldUseVoiceId() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/21m00Tcm4TlvDq8ikWAM"))
        .and(header("xi-api-key", "xi-test"))
        .and(header("Accept", "audio/mpeg"))
        .and(body_json(json!({
            "text": "Hello ... world",
            "model_id": "eleven_monolingual_v1",
            "voice_settings": {"stability": 0.5, "similarity_boost": 0.75}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-eleven".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(SpeechService::ElevenLabs, &elevenlabs_config(server.uri()))?;
    let text = televox::to_plain("Hello • world");
    let audio = provider.synthesize(&text, "rachel").await?;

    assert_eq!(audio.as_ref(), b"ID3-eleven");
    Ok(())
}

#[tokio::test]
async fn test_elevenlabs_synthesize_withUnknownVoice_shouldPassNameVerbatim() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/text-to-speech/CustomVoice42"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = create_provider(SpeechService::ElevenLabs, &elevenlabs_config(server.uri()))?;
    provider.synthesize("Hi", "CustomVoice42").await?;
    Ok(())
}

#[tokio::test]
async fn test_elevenlabs_synthesize_withQuotaExceeded_shouldReturnApiError() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("quota_exceeded"))
        .mount(&server)
        .await;

    let provider = create_provider(SpeechService::ElevenLabs, &elevenlabs_config(server.uri()))?;
    match provider.synthesize("Hi", "Rachel").await {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 401);
            assert_eq!(message, "quota_exceeded");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_elevenlabs_synthesize_withUnreachableHost_shouldReturnConnectionError() -> Result<()> {
    let provider = create_provider(
        SpeechService::ElevenLabs,
        &elevenlabs_config("http://127.0.0.1:1".to_string()),
    )?;
    let result = provider.synthesize("Hi", "Rachel").await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
    Ok(())
}

#[test]
fn test_provider_notationFormat_shouldFollowService() -> Result<()> {
    let provider = create_provider(SpeechService::ElevenLabs, &elevenlabs_config(String::new()))?;
    assert_eq!(provider.notation_format(), televox::NotationFormat::Plain);
    assert_eq!(provider.service(), SpeechService::ElevenLabs);
    Ok(())
}
