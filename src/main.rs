use clap::Parser;
use interval_timer::cli::{Cli, Commands};
use interval_timer::config::AppConfig;
use interval_timer::error::Result;
use interval_timer::logging::{init_logging, init_logging_simple};
use interval_timer::simulate::run_simulation;
use interval_timer::timer::{IntervalTimer, MonotonicClock, Summary};
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::read_from(&cli.config_dir)?;
    cli.command.apply_overrides(&mut config);
    config.validate()?;

    match &cli.command {
        Commands::Simulate { .. } => {
            init_logging(&config.logging);
            run_simulate(&config)?;
        }
        Commands::ShowConfig => {
            init_logging_simple();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn run_simulate(config: &AppConfig) -> Result<()> {
    let mut timer = IntervalTimer::new();
    let json = config.report.json;

    let report = run_simulation(
        &mut timer,
        config,
        |_: &MonotonicClock, work: Duration| std::thread::sleep(work),
        |summary: &Summary| {
            if json {
                info!("{}", serde_json::to_string(summary)?);
            } else {
                info!("{}", summary);
            }
            Ok(())
        },
    )?;

    if let Some(last) = report.last {
        println!("{}", last);
    }
    Ok(())
}
