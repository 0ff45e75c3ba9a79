use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;
use url::Url;

use crate::errors::ConfigError;
use crate::notation::NotationFormat;

/// Application configuration module
/// This module handles the application configuration including loading,
/// environment overlay and validation of provider credentials.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Speech service to use
    #[serde(default)]
    pub service: SpeechService,

    /// Audio file extension for generated files
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Number of provider calls before pausing
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,

    /// Pause length in seconds once the rate limit is reached
    #[serde(default = "default_rate_limit_wait_secs")]
    pub rate_limit_wait_secs: u64,

    /// Available speech providers
    #[serde(default = "default_available_providers")]
    pub available_providers: Vec<ProviderConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech synthesis service
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeechService {
    // @provider: Azure Neural Voices
    #[default]
    Azure,
    // @provider: Google Cloud Text-to-Speech
    Google,
    // @provider: ElevenLabs
    ElevenLabs,
}

impl SpeechService {
    /// All supported services
    pub const ALL: [SpeechService; 3] = [Self::Azure, Self::Google, Self::ElevenLabs];

    // @returns: Capitalized service name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Azure => "Azure",
            Self::Google => "Google Cloud",
            Self::ElevenLabs => "ElevenLabs",
        }
    }

    // @returns: Lowercase service identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Azure => "azure".to_string(),
            Self::Google => "google".to_string(),
            Self::ElevenLabs => "elevenlabs".to_string(),
        }
    }

    // @returns: Voice used when none is configured
    pub fn default_voice(&self) -> &'static str {
        match self {
            Self::Azure => "en-US-DavisNeural",
            Self::Google => "en-US-Neural2-F",
            Self::ElevenLabs => "Rachel",
        }
    }

    /// Input the service consumes: SSML for prosody-capable backends, plain text otherwise
    pub fn notation_format(&self) -> NotationFormat {
        match self {
            Self::Azure | Self::Google => NotationFormat::Ssml,
            Self::ElevenLabs => NotationFormat::Plain,
        }
    }
}

impl std::fmt::Display for SpeechService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for SpeechService {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "azure" => Ok(Self::Azure),
            "google" => Ok(Self::Google),
            "elevenlabs" => Ok(Self::ElevenLabs),
            _ => Err(anyhow!("Invalid speech service: {}", s)),
        }
    }
}

/// Environment variable holding the Azure subscription key
pub const AZURE_SPEECH_KEY: &str = "AZURE_SPEECH_KEY";
/// Environment variable holding the Azure region
pub const AZURE_SPEECH_REGION: &str = "AZURE_SPEECH_REGION";
/// Environment variable holding the Google service account file path
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Environment variable holding the ElevenLabs API key
pub const ELEVENLABS_API_KEY: &str = "ELEVENLABS_API_KEY";

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: API / subscription key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Region code (Azure)
    #[serde(default = "String::new")]
    pub region: String,

    // @field: Service account file path (Google)
    #[serde(default = "String::new")]
    pub credentials_path: String,

    // @field: Base URL override, empty for the public API
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Voice name or ID, empty for the service default
    #[serde(default = "String::new")]
    pub voice: String,

    // @field: Model identifier (ElevenLabs)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param service: Service enum
    // @returns: Provider config with defaults
    pub fn new(service: SpeechService) -> Self {
        Self {
            provider_type: service.to_lowercase_string(),
            api_key: String::new(),
            region: String::new(),
            credentials_path: String::new(),
            endpoint: String::new(),
            voice: String::new(),
            model: match service {
                SpeechService::ElevenLabs => default_elevenlabs_model(),
                _ => String::new(),
            },
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Value of a required field, or a configuration error naming its variable
    pub fn require(&self, value: &str, variable: &str) -> Result<String, ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                provider: self.provider_type.clone(),
                variable: variable.to_string(),
            });
        }
        Ok(value.trim().to_string())
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_output_format() -> String {
    "mp3".to_string()
}

fn default_rate_limit() -> u32 {
    20 // Azure free tier allows 20 requests per 60 seconds
}

fn default_rate_limit_wait_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_elevenlabs_model() -> String {
    "eleven_monolingual_v1".to_string()
}

fn default_available_providers() -> Vec<ProviderConfig> {
    SpeechService::ALL.iter().map(|s| ProviderConfig::new(*s)).collect()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service: SpeechService::default(),
            output_format: default_output_format(),
            rate_limit: default_rate_limit(),
            rate_limit_wait_secs: default_rate_limit_wait_secs(),
            available_providers: default_available_providers(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration file, or the defaults when `path` does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path, e))?;
        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path, e))?;

        // Make sure every service has an entry to receive environment values
        for service in SpeechService::ALL {
            if config.get_provider_config(service).is_none() {
                config.available_providers.push(ProviderConfig::new(service));
            }
        }

        Ok(config)
    }

    /// Overlay credentials from the environment.
    ///
    /// `lookup` returns the value of a variable; `std::env::var(..).ok()` in
    /// production, a map in tests. Values already present in the file win
    /// only when the variable is unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(provider) = self.get_provider_config_mut(SpeechService::Azure) {
            if let Some(key) = value(AZURE_SPEECH_KEY) {
                provider.api_key = key;
            }
            if let Some(region) = value(AZURE_SPEECH_REGION) {
                provider.region = region;
            }
        }

        if let Some(provider) = self.get_provider_config_mut(SpeechService::Google) {
            if let Some(path) = value(GOOGLE_APPLICATION_CREDENTIALS) {
                provider.credentials_path = path;
            }
        }

        if let Some(provider) = self.get_provider_config_mut(SpeechService::ElevenLabs) {
            if let Some(key) = value(ELEVENLABS_API_KEY) {
                provider.api_key = key;
            }
        }
    }

    /// Validate the configuration for the selected service
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rate_limit".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let format = self.output_format.trim();
        if format.is_empty() || format.contains(['/', '\\', '.']) {
            return Err(ConfigError::InvalidValue {
                field: "output_format".to_string(),
                message: format!("'{}' is not a file extension", self.output_format),
            });
        }

        let provider = self.active_provider_config();

        if !provider.endpoint.is_empty() {
            Url::parse(&provider.endpoint).map_err(|e| ConfigError::InvalidValue {
                field: format!("{}.endpoint", provider.provider_type),
                message: e.to_string(),
            })?;
        }

        match self.service {
            SpeechService::Azure => {
                provider.require(&provider.api_key, AZURE_SPEECH_KEY)?;
                provider.require(&provider.region, AZURE_SPEECH_REGION)?;
            }
            SpeechService::Google => {
                provider.require(&provider.credentials_path, GOOGLE_APPLICATION_CREDENTIALS)?;
            }
            SpeechService::ElevenLabs => {
                provider.require(&provider.api_key, ELEVENLABS_API_KEY)?;
            }
        }

        Ok(())
    }

    /// Get a specific provider configuration by service
    pub fn get_provider_config(&self, service: SpeechService) -> Option<&ProviderConfig> {
        let provider_str = service.to_lowercase_string();
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_str)
    }

    fn get_provider_config_mut(&mut self, service: SpeechService) -> Option<&mut ProviderConfig> {
        let provider_str = service.to_lowercase_string();
        self.available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
    }

    /// Configuration of the selected service, defaults when it has no entry
    pub fn active_provider_config(&self) -> ProviderConfig {
        self.get_provider_config(self.service)
            .cloned()
            .unwrap_or_else(|| ProviderConfig::new(self.service))
    }

    /// Voice for the selected service
    pub fn get_voice(&self) -> String {
        if let Some(provider) = self.get_provider_config(self.service) {
            if !provider.voice.trim().is_empty() {
                return provider.voice.clone();
            }
        }
        self.service.default_voice().to_string()
    }

    /// Override the voice of the selected service
    pub fn set_voice(&mut self, voice: impl Into<String>) {
        let service = self.service;
        let voice = voice.into();
        match self.get_provider_config_mut(service) {
            Some(provider) => provider.voice = voice,
            None => {
                let mut provider = ProviderConfig::new(service);
                provider.voice = voice;
                self.available_providers.push(provider);
            }
        }
    }
}
