//! Synthetic Training Loop
//!
//! Drives an [`IntervalTimer`] the way a trainer would: timed segments per
//! step and a periodic report on the configured event.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::Result;
use crate::timer::{Clock, IntervalTimer, Summary};

pub const FORWARD_EVENT: &str = "forward";
pub const BACKWARD_EVENT: &str = "backward";

/// Outcome of a simulated run
#[derive(Debug, Clone, Default)]
pub struct SimulationReport {
    /// Steps executed
    pub steps: u64,
    /// Number of periodic reports emitted
    pub reports: usize,
    /// Most recent report
    pub last: Option<Summary>,
}

/// Run `config.run.steps` training steps
///
/// `wait` stands in for the work of each segment (a sleep on the real clock,
/// an advance on a manual one). `sink` receives every periodic summary;
/// its error aborts the run.
pub fn run_simulation<C, W, S>(
    timer: &mut IntervalTimer<C>,
    config: &AppConfig,
    mut wait: W,
    mut sink: S,
) -> Result<SimulationReport>
where
    C: Clock,
    W: FnMut(&C, Duration),
    S: FnMut(&Summary) -> Result<()>,
{
    config.validate()?;

    let forward = Duration::from_millis(config.run.forward_ms);
    let backward = Duration::from_millis(config.run.backward_ms);
    let event = config.report.event.as_str();
    let period = config.report.period;

    info!(
        steps = config.run.steps,
        event, period, "Starting simulated training loop"
    );

    let mut report = SimulationReport::default();
    for step in 1..=config.run.steps {
        wait(timer.clock(), forward);
        timer.record(FORWARD_EVENT);
        wait(timer.clock(), backward);
        timer.record(BACKWARD_EVENT);
        timer.record(event);

        let mut last = None;
        let fired = timer.try_trigger_on_interval(event, period, |t| -> Result<()> {
            let summary = t.summary(period)?;
            sink(&summary)?;
            last = Some(summary);
            Ok(())
        })?;

        if fired {
            debug!(step, "Reported interval");
            report.reports += 1;
            report.last = last;
        }
        report.steps = step;
    }

    info!(
        steps = report.steps,
        reports = report.reports,
        lifetime = timer.lifetime_count(event),
        "Simulated training loop finished"
    );
    Ok(report)
}
