/*!
 * Error types for the televox application.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions.
 * The notation transducers have no error type: every input produces output.
 */

use thiserror::Error;

/// Errors detected while assembling provider configuration.
///
/// Raised before any network call is attempted; they abort the run.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A credential or other required value is absent
    #[error("Missing configuration for {provider}: set {variable}")]
    MissingValue {
        /// Provider that needs the value
        provider: String,
        /// Environment variable (or config field) that supplies it
        variable: String,
    },

    /// A value is present but unusable
    #[error("Invalid configuration value for {field}: {message}")]
    InvalidValue {
        /// Name of the offending field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// A credentials file could not be read or parsed
    #[error("Credentials file error ({path}): {message}")]
    CredentialsFile {
        /// Path of the credentials file
        path: String,
        /// Underlying reason
        message: String,
    },
}

/// Errors that can occur when working with speech provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API, truncated
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication (token exchange, signing)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The audio could not be written to its output path
    #[error("Failed to write audio to {path}: {message}")]
    OutputFile {
        /// Output path
        path: String,
        /// Underlying I/O error
        message: String,
    },
}

/// Errors that can occur while loading a script
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script file could not be read
    #[error("Failed to read script {path}: {message}")]
    Read {
        /// Script path
        path: String,
        /// Underlying I/O error
        message: String,
    },

    /// The script is not valid JSON of the expected shape
    #[error("Failed to parse script {path}: {message}")]
    Parse {
        /// Script path
        path: String,
        /// Parser message
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from script loading
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit status reported for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Unknown(_) => 1,
            Self::Config(_) => 2,
            Self::Script(_) => 3,
            Self::Provider(_) => 4,
            Self::File(_) => 5,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    /// Recover the typed error behind any added context
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<ConfigError>() {
            Ok(e) => return Self::Config(e),
            Err(error) => error,
        };
        let error = match error.downcast::<ScriptError>() {
            Ok(e) => return Self::Script(e),
            Err(error) => error,
        };
        let error = match error.downcast::<ProviderError>() {
            Ok(e) => return Self::Provider(e),
            Err(error) => error,
        };
        match error.downcast::<std::io::Error>() {
            Ok(e) => Self::File(e.to_string()),
            Err(error) => Self::Unknown(format!("{:#}", error)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

/// Maximum number of characters of a backend error body kept in messages
pub const MAX_ERROR_BODY_CHARS: usize = 500;

/// Truncate a backend error body for reporting
pub fn truncate_error_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}
