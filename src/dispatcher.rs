/*!
 * Routing of notation lines to a speech provider.
 *
 * The dispatcher owns one provider, built from explicit configuration, and
 * the voice to use with it. Each dispatch rewrites the line into the format
 * the provider consumes, synthesizes it and writes the audio to disk. A file
 * is written only when synthesis succeeds.
 */

use log::debug;
use std::path::Path;

use crate::app_config::{Config, SpeechService};
use crate::errors::{ConfigError, ProviderError};
use crate::file_utils::FileManager;
use crate::providers::{SpeechProvider, create_provider};

/// Sends rewritten notation to one speech provider
#[derive(Debug)]
pub struct Dispatcher {
    /// Provider client
    provider: Box<dyn SpeechProvider>,
    /// Voice name or ID
    voice: String,
}

impl Dispatcher {
    /// Create a dispatcher around an existing provider
    pub fn new(provider: Box<dyn SpeechProvider>, voice: impl Into<String>) -> Self {
        Self {
            provider,
            voice: voice.into(),
        }
    }

    /// Build the dispatcher for the configured service.
    ///
    /// Missing credentials are reported here, before any request is made.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let provider_config = config.active_provider_config();
        let provider = create_provider(config.service, &provider_config)?;
        Ok(Self::new(provider, config.get_voice()))
    }

    /// Service behind this dispatcher
    pub fn service(&self) -> SpeechService {
        self.provider.service()
    }

    /// Voice used for every request
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Rewrite a notation line into the provider's input format
    pub fn prepare(&self, line: &str) -> String {
        self.provider.notation_format().render(line, &self.voice)
    }

    /// Synthesize `line` and write the audio to `output_path`
    ///
    /// # Returns
    /// * `Result<u64, ProviderError>` - Number of audio bytes written, or the failure
    pub async fn dispatch(&self, line: &str, output_path: &Path) -> Result<u64, ProviderError> {
        let input = self.prepare(line);
        debug!("{} input: {}", self.service().display_name(), input);

        let audio = self.provider.synthesize(&input, &self.voice).await?;

        FileManager::write_bytes(output_path, &audio).map_err(|e| ProviderError::OutputFile {
            path: output_path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(audio.len() as u64)
    }
}
