use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "interval-timer")]
#[command(version = "0.1.0")]
#[command(about = "Interval timing for training loops", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory (default.toml plus environment overlays)
    #[arg(short, long, default_value = "config", env = "INTERVAL_TIMER_CONFIG_DIR")]
    pub config_dir: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a synthetic training loop and report timings periodically
    Simulate {
        /// Number of steps (overrides run.steps)
        #[arg(long)]
        steps: Option<u64>,
        /// Report every N steps (overrides report.period)
        #[arg(long)]
        period: Option<u64>,
        /// Emit reports as JSON (overrides report.json)
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration
    ShowConfig,
}

impl Commands {
    /// Fold command-line overrides into the loaded config
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Commands::Simulate {
            steps,
            period,
            json,
        } = self
        {
            if let Some(steps) = steps {
                config.run.steps = *steps;
            }
            if let Some(period) = period {
                config.report.period = *period;
            }
            if *json {
                config.report.json = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate_overrides() {
        let cli = Cli::parse_from([
            "interval-timer",
            "simulate",
            "--steps",
            "20",
            "--period",
            "5",
            "--json",
        ]);
        let mut config = AppConfig::default();
        cli.command.apply_overrides(&mut config);

        assert_eq!(config.run.steps, 20);
        assert_eq!(config.report.period, 5);
        assert!(config.report.json);
    }

    #[test]
    fn test_show_config_keeps_config() {
        let cli = Cli::parse_from(["interval-timer", "--config-dir", "/tmp/x", "show-config"]);
        assert_eq!(cli.config_dir, "/tmp/x");

        let mut config = AppConfig::default();
        cli.command.apply_overrides(&mut config);
        assert_eq!(config.report.period, 10);
    }

    #[test]
    fn test_period_flag_repairs_zero_period_config() {
        let cli = Cli::parse_from(["interval-timer", "simulate", "--period", "5"]);
        let mut config = AppConfig::default();
        config.report.period = 0;
        assert!(config.validate().is_err());

        cli.command.apply_overrides(&mut config);
        config.validate().unwrap();
        assert_eq!(config.report.period, 5);
    }
}
