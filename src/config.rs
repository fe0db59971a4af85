use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TimerError};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub run: RunConfig,
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Synthetic training loop driven by the `simulate` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of training steps to run
    pub steps: u64,
    /// Simulated forward pass time per step
    pub forward_ms: u64,
    /// Simulated backward pass time per step
    pub backward_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            forward_ms: 4,
            backward_ms: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Event whose lifetime count drives reporting (e.g., "step")
    #[serde(default = "default_report_event")]
    pub event: String,
    /// Report every N occurrences of `event`
    pub period: u64,
    /// Emit reports as JSON instead of the one-line text form
    #[serde(default)]
    pub json: bool,
}

fn default_report_event() -> String {
    "step".to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            event: default_report_event(),
            period: 10,
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config = Self::read_from(config_dir)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration without validating it
    ///
    /// Callers that layer further overrides on top must call `validate` afterwards.
    pub fn read_from<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        Ok(Self::build(config_dir.as_ref())?.try_deserialize::<Self>()?)
    }

    fn build(config_dir: &Path) -> std::result::Result<Config, ConfigError> {
        let defaults = Self::default();

        Config::builder()
            // Start with default values
            .set_default("run.steps", defaults.run.steps)?
            .set_default("run.forward_ms", defaults.run.forward_ms)?
            .set_default("run.backward_ms", defaults.run.backward_ms)?
            .set_default("report.event", defaults.report.event)?
            .set_default("report.period", defaults.report.period)?
            .set_default("report.json", defaults.report.json)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/profiling.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("INTERVAL_TIMER_ENV")
                        .unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (INTERVAL_TIMER__REPORT__PERIOD, etc.)
            .add_source(
                Environment::with_prefix("INTERVAL_TIMER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
    }

    /// Reject values the timer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.run.steps == 0 {
            return Err(TimerError::InvalidArgument(
                "run.steps must be positive".to_string(),
            ));
        }
        if self.report.period == 0 {
            return Err(TimerError::InvalidArgument(
                "report.period must be positive".to_string(),
            ));
        }
        if self.report.event.is_empty() {
            return Err(TimerError::InvalidArgument(
                "report.event must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
