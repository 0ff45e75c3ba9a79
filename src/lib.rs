/*!
 * # televox - Teleprompter scripts to narrated audio
 *
 * A Rust library that turns teleprompter notation into speech through
 * cloud text-to-speech services.
 *
 * ## Features
 *
 * - Rewrite notation (pauses, emphasis, speed, pitch, whisper, styles) into:
 *   - SSML for Azure Neural Voices and Google Cloud Text-to-Speech
 *   - Plain text with ellipsis pauses for ElevenLabs
 * - Synthesize single lines or whole chapter scripts
 * - Resume interrupted runs: existing audio files are never requested again
 * - Fixed-window rate limiting for free-tier quotas
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `notation`: Pure notation rewriting:
 *   - `notation::ssml`: SSML document generation
 *   - `notation::plain`: Plain text generation
 * - `providers`: Client implementations for speech services:
 *   - `providers::azure`: Azure token exchange and synthesis
 *   - `providers::google`: Google service-account OAuth and synthesis
 *   - `providers::elevenlabs`: ElevenLabs synthesis
 *   - `providers::mock`: In-process provider for tests
 * - `dispatcher`: Routes a line to the configured provider and writes the audio
 * - `script`: Script JSON model and segment numbering
 * - `app_controller`: Script walker and single-line synthesis
 * - `app_config`: Configuration management
 * - `voices`: Recommended voices per service
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod dispatcher;
pub mod errors;
pub mod file_utils;
pub mod notation;
pub mod providers;
pub mod script;
pub mod voices;

// Re-export main types for easier usage
pub use app_config::{Config, SpeechService};
pub use app_controller::{Controller, ScriptReport};
pub use dispatcher::Dispatcher;
pub use errors::{AppError, ConfigError, ProviderError, ScriptError};
pub use notation::{NotationFormat, to_plain, to_ssml};
pub use script::Script;
