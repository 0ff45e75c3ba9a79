// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use televox::app_config::{self, Config, SpeechService};
use televox::app_controller::Controller;
use televox::errors::AppError;
use televox::notation::{DEFAULT_VOICE, to_plain, to_ssml};
use televox::script::Script;
use televox::voices::format_voice_list;

/// CLI Wrapper for SpeechService to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSpeechService {
    Azure,
    Google,
    #[value(name = "elevenlabs")]
    ElevenLabs,
}

impl From<CliSpeechService> for SpeechService {
    fn from(cli_service: CliSpeechService) -> Self {
        match cli_service {
            CliSpeechService::Azure => SpeechService::Azure,
            CliSpeechService::Google => SpeechService::Google,
            CliSpeechService::ElevenLabs => SpeechService::ElevenLabs,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that talks to a service
#[derive(Args, Debug, Clone)]
struct ServiceArgs {
    /// Speech service to use
    #[arg(short, long, value_enum)]
    service: Option<CliSpeechService>,

    /// Voice name (Azure/Google) or voice name/ID (ElevenLabs)
    #[arg(short, long)]
    voice: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "televox.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one audio file per segment of a script
    Generate {
        /// Input script JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for audio files
        #[arg(short, long, default_value = "./audio")]
        output: PathBuf,

        /// Audio file extension
        #[arg(short, long)]
        format: Option<String>,

        /// Provider calls before pausing
        #[arg(long)]
        rate_limit: Option<u32>,

        /// Pause length in seconds once the rate limit is reached
        #[arg(long)]
        rate_limit_wait: Option<u64>,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Synthesize a single line of notation
    Speak {
        /// Notation text to speak
        #[arg(short, long)]
        text: String,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Print the SSML and plain text a line would be sent as
    Preview {
        /// Notation text to preview
        #[arg(short, long)]
        text: String,

        /// Voice used in the SSML document
        #[arg(short, long)]
        voice: Option<String>,
    },

    /// List recommended voices for a service
    Voices {
        /// Speech service to list
        #[arg(short, long, value_enum)]
        service: Option<CliSpeechService>,
    },

    /// Generate shell completions for televox
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// televox - Teleprompter notation to narrated audio
///
/// Converts teleprompter scripts with delivery notation into audio files
/// using Azure, Google Cloud or ElevenLabs text-to-speech.
#[derive(Parser, Debug)]
#[command(name = "televox")]
#[command(version)]
#[command(about = "Teleprompter notation to narrated audio")]
#[command(long_about = "televox rewrites teleprompter notation into SSML or plain text and synthesizes it.

EXAMPLES:
    televox generate -i script.json -o ./audio          # Whole script, Azure
    televox generate -i script.json -s elevenlabs       # Whole script, ElevenLabs
    televox speak -t \"Hello • **world**\" -o hello.mp3   # Single line
    televox preview -t \"{excited: wow!} // <<slowly>>\"  # Show SSML, no network
    televox voices -s google                            # Recommended voices
    televox completions bash > televox.bash             # Shell completions

NOTATION:
    •  short pause     • • •  long pause     //  beat
    **strong**  _soft_  <<slow>>  >>fast<<  ^up^  ,down,  ~whisper~  LOUD
    {style: text}  {style,degree: text}

CREDENTIALS:
    AZURE_SPEECH_KEY, AZURE_SPEECH_REGION, GOOGLE_APPLICATION_CREDENTIALS and
    ELEVENLABS_API_KEY are read from the environment or a .env file. A
    televox.json config file is used when present.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and symbol for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "✗"),
            Level::Warn => ("1;33", "!"),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "·"),
            Level::Trace => ("1;35", "…"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, symbol) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                symbol,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

// @returns: Filter matching a configured level
fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Trace level lets `set_max_level` raise verbosity after the config is read
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(AppError::from(e).exit_code())
        }
    }
}

// @returns: Outcome of the selected command
async fn run(cli: CommandLineOptions) -> Result<()> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "televox", &mut std::io::stdout());
            Ok(())
        }
        Commands::Preview { text, voice } => {
            let voice = voice.unwrap_or_else(|| DEFAULT_VOICE.to_string());
            println!("=== SSML Output ===");
            println!("{}", to_ssml(&text, &voice));
            println!("\n=== ElevenLabs Output ===");
            println!("{}", to_plain(&text));
            Ok(())
        }
        Commands::Voices { service } => {
            let service = service.map(SpeechService::from).unwrap_or_default();
            println!("\n{}", format_voice_list(service));
            Ok(())
        }
        Commands::Speak { text, output, service } => {
            let config = load_config(&service, |_| {})?;
            let controller = Controller::with_config(config)?;
            controller.speak(&text, &output).await?;
            Ok(())
        }
        Commands::Generate {
            input,
            output,
            format,
            rate_limit,
            rate_limit_wait,
            service,
        } => {
            let config = load_config(&service, |config| {
                if let Some(format) = &format {
                    config.output_format = format.trim_start_matches('.').to_string();
                }
                if let Some(limit) = rate_limit {
                    config.rate_limit = limit;
                }
                if let Some(wait) = rate_limit_wait {
                    config.rate_limit_wait_secs = wait;
                }
            })?;

            let script = Script::load(&input)?;
            let controller = Controller::with_config(config)?;
            let report = controller.run_script(&script, &output).await?;

            println!(
                "\n✓ Generated {} audio files in {}",
                report.files.len(),
                output.display()
            );
            Ok(())
        }
    }
}

// @returns: Validated configuration: file, then .env and environment, then CLI flags
fn load_config<F>(args: &ServiceArgs, overrides: F) -> Result<Config>
where
    F: FnOnce(&mut Config),
{
    if let Some(cmd_log_level) = &args.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    let mut config = Config::load_or_default(&args.config_path)
        .with_context(|| format!("Failed to load config file: {}", args.config_path.display()))?;
    config.apply_env(|name| std::env::var(name).ok());

    if let Some(service) = args.service {
        config.service = service.into();
    }
    if let Some(voice) = &args.voice {
        config.set_voice(voice.clone());
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone().into();
    }
    overrides(&mut config);

    config.validate().context("Configuration validation failed")?;

    if args.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    info!("Using {} with voice {}", config.service.display_name(), config.get_voice());
    Ok(config)
}
