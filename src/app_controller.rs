use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::dispatcher::Dispatcher;
use crate::file_utils::FileManager;
use crate::script::Script;

// @module: Application controller for script and single-line synthesis

/// Fixed-window limiter: after every `limit` calls, wait before the next one
#[derive(Debug)]
pub struct RateLimiter {
    /// Calls allowed per window
    limit: u32,
    /// Pause between windows
    wait: Duration,
    /// Calls made so far
    calls: u32,
}

impl RateLimiter {
    /// Create a limiter allowing `limit` calls before each `wait`
    pub fn new(limit: u32, wait: Duration) -> Self {
        Self {
            limit: limit.max(1),
            wait,
            calls: 0,
        }
    }

    /// Whether the next call has to wait
    pub fn must_wait(&self) -> bool {
        self.calls > 0 && self.calls % self.limit == 0
    }

    /// Pause if the window is full. Returns true if it paused.
    pub async fn acquire(&mut self) -> bool {
        if !self.must_wait() {
            return false;
        }
        info!("Rate limit reached. Waiting {}s...", self.wait.as_secs());
        tokio::time::sleep(self.wait).await;
        true
    }

    /// Count a provider call, successful or not
    pub fn record_call(&mut self) {
        self.calls += 1;
    }

    /// Calls made so far
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

/// Outcome of a script run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptReport {
    /// Audio files present after the run, new or pre-existing
    pub files: Vec<PathBuf>,
    /// Segments synthesized in this run
    pub generated: usize,
    /// Segments whose file already existed
    pub already_present: usize,
    /// Segments whose synthesis failed
    pub failed: usize,
    /// Segments not eligible for synthesis
    pub skipped: usize,
    /// Provider calls made
    pub provider_calls: u32,
}

impl ScriptReport {
    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} generated, {} already present, {} failed, {} skipped",
            self.generated, self.already_present, self.failed, self.skipped
        )
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the dispatcher for the configured service
    pub fn dispatcher(&self) -> Result<Dispatcher> {
        Dispatcher::from_config(&self.config)
            .context("Speech service is not configured")
    }

    /// Synthesize every eligible segment of `script` into `output_dir`
    pub async fn run_script(&self, script: &Script, output_dir: &Path) -> Result<ScriptReport> {
        // Configuration problems abort before anything is requested
        let dispatcher = self.dispatcher()?;
        self.run_script_with(&dispatcher, script, output_dir).await
    }

    /// Synthesize every eligible segment of `script` with a given dispatcher
    pub async fn run_script_with(
        &self,
        dispatcher: &Dispatcher,
        script: &Script,
        output_dir: &Path,
    ) -> Result<ScriptReport> {
        let start_time = std::time::Instant::now();
        FileManager::ensure_dir(output_dir)?;

        info!(
            "televox: {} - {}",
            dispatcher.service().display_name(),
            dispatcher.voice()
        );

        let mut limiter = RateLimiter::new(
            self.config.rate_limit,
            Duration::from_secs(self.config.rate_limit_wait_secs),
        );
        let mut report = ScriptReport::default();

        let progress_bar = ProgressBar::new(script.segment_count() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        for line in script.lines() {
            progress_bar.inc(1);

            if let Some(reason) = line.skip {
                debug!("Skipping segment {} ({})", line.ordinal, reason);
                report.skipped += 1;
                continue;
            }

            let output_path = FileManager::segment_output_path(
                output_dir,
                line.ordinal,
                line.chapter,
                &self.config.output_format,
            );
            let file_name = output_path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default();

            if FileManager::file_exists(&output_path) {
                info!("Skipping {} (already exists)", file_name);
                report.already_present += 1;
                report.files.push(output_path);
                continue;
            }

            limiter.acquire().await;

            progress_bar.set_message(format!("Generating {}", file_name));
            let result = dispatcher.dispatch(line.line, &output_path).await;
            limiter.record_call();

            match result {
                Ok(_) => {
                    info!("Generated {}", output_path.display());
                    report.generated += 1;
                    report.files.push(output_path);
                }
                Err(e) => {
                    error!("Failed to generate {}: {}", output_path.display(), e);
                    report.failed += 1;
                }
            }
        }

        progress_bar.finish_and_clear();
        report.provider_calls = limiter.calls();

        info!(
            "Script processing completed in {:.1}s: {}",
            start_time.elapsed().as_secs_f64(),
            report.summary()
        );
        if report.failed > 0 {
            warn!("{} segment(s) failed; rerun to retry only the missing files", report.failed);
        }

        Ok(report)
    }

    /// Synthesize a single notation line into `output_path`
    ///
    /// # Returns
    /// * `Result<u64>` - Size in bytes of the written file
    pub async fn speak(&self, text: &str, output_path: &Path) -> Result<u64> {
        let dispatcher = self.dispatcher()?;
        Self::speak_with(&dispatcher, text, output_path).await
    }

    /// Synthesize a single notation line with a given dispatcher
    pub async fn speak_with(dispatcher: &Dispatcher, text: &str, output_path: &Path) -> Result<u64> {
        if text.trim().is_empty() {
            return Err(anyhow!("Nothing to synthesize: text is empty"));
        }

        dispatcher
            .dispatch(text, output_path)
            .await
            .with_context(|| format!("Failed to generate {}", output_path.display()))?;

        let size = FileManager::file_size(output_path)?;
        info!("Generated {} ({} bytes)", output_path.display(), size);
        Ok(size)
    }
}
