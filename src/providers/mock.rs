/*!
 * Mock speech provider for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockSpeech::working()` - Always succeeds with fake audio bytes
 * - `MockSpeech::intermittent(n)` - Fails every nth request
 * - `MockSpeech::failing()` - Always fails with an API error
 * - `MockBehavior::Slow` - Succeeds after a delay
 *
 * Every request is recorded so tests can assert on what was sent.
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::app_config::SpeechService;
use crate::errors::ProviderError;
use crate::providers::SpeechProvider;

/// A request received by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    /// SSML or plain text input
    pub input: String,
    /// Voice requested
    pub voice: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates slow response
    Slow { delay_ms: u64 },
}

/// Mock provider for testing dispatch and script walking
#[derive(Debug, Clone)]
pub struct MockSpeech {
    /// Service impersonated, decides SSML or plain input
    service: SpeechService,
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Requests received, shared between clones
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockSpeech {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            service: SpeechService::Azure,
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Impersonate another service
    pub fn as_service(mut self, service: SpeechService) -> Self {
        self.service = service;
        self
    }

    /// Number of synthesize calls received
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Fake audio payload returned for `input`
    pub fn audio_for(input: &str) -> Bytes {
        Bytes::from(format!("AUDIO:{}", input))
    }
}

#[async_trait]
impl SpeechProvider for MockSpeech {
    fn service(&self) -> SpeechService {
        self.service
    }

    async fn synthesize(&self, input: &str, voice: &str) -> Result<Bytes, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(MockRequest {
                input: input.to_string(),
                voice: voice.to_string(),
            });
        }

        match self.behavior {
            MockBehavior::Working => Ok(Self::audio_for(input)),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(Self::audio_for(input))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated provider failure".to_string(),
                status_code: 500,
            }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(Self::audio_for(input))
            }
        }
    }
}
