/*!
 * Tests for dispatching lines to a provider
 */

use anyhow::Result;
use televox::app_config::SpeechService;
use televox::dispatcher::Dispatcher;
use televox::errors::ProviderError;
use televox::notation::{to_plain, to_ssml};
use televox::providers::mock::MockSpeech;
use crate::common;

#[tokio::test]
async fn test_dispatch_withAzureProvider_shouldSendSsmlAndWriteAudio() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("line.mp3");
    let mock = MockSpeech::working();
    let dispatcher = Dispatcher::new(Box::new(mock.clone()), "en-US-GuyNeural");

    let size = dispatcher.dispatch("Hello • **world**", &output).await?;

    let expected_input = to_ssml("Hello • **world**", "en-US-GuyNeural");
    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].input, expected_input);
    assert_eq!(requests[0].voice, "en-US-GuyNeural");
    assert_eq!(std::fs::read(&output)?, MockSpeech::audio_for(&expected_input).to_vec());
    assert_eq!(size, MockSpeech::audio_for(&expected_input).len() as u64);
    Ok(())
}

#[tokio::test]
async fn test_dispatch_withElevenLabsProvider_shouldSendPlainText() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("line.mp3");
    let mock = MockSpeech::working().as_service(SpeechService::ElevenLabs);
    let dispatcher = Dispatcher::new(Box::new(mock.clone()), "Rachel");

    dispatcher.dispatch("_soft_ // **loud**", &output).await?;

    assert_eq!(mock.requests()[0].input, to_plain("_soft_ // **loud**"));
    Ok(())
}

#[tokio::test]
async fn test_dispatch_withFailingProvider_shouldNotWriteFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("line.mp3");
    let dispatcher = Dispatcher::new(Box::new(MockSpeech::failing()), "voice");

    let result = dispatcher.dispatch("Hello", &output).await;

    assert!(matches!(result, Err(ProviderError::ApiError { status_code: 500, .. })));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_service_shouldReflectProvider() {
    let mock = MockSpeech::working().as_service(SpeechService::Google);
    let dispatcher = Dispatcher::new(Box::new(mock), "en-US-Neural2-F");
    assert_eq!(dispatcher.service(), SpeechService::Google);
    assert_eq!(dispatcher.voice(), "en-US-Neural2-F");
}
