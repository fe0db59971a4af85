//! Interval Statistics
//!
//! Per-event accumulators and the report built from them.

use std::fmt;

use serde::Serialize;

/// Accumulated duration and call count for one event within an interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IntervalStat {
    /// Sum of measured deltas in microseconds
    pub total_micros: u64,
    /// Number of records since the last restart
    pub count: u64,
}

impl IntervalStat {
    pub(crate) fn add(&mut self, micros: u64) {
        self.total_micros = self.total_micros.saturating_add(micros);
        self.count += 1;
    }

    /// Mean duration per record in milliseconds (0 when empty)
    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_micros as f64 / 1000.0 / self.count as f64
    }
}

/// One event line of a [`Summary`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub name: String,
    pub count: u64,
    pub total_micros: u64,
    pub avg_ms: f64,
}

/// Snapshot of an interval, averaged over a number of steps
///
/// `Display` renders the one-line report,
/// e.g. `Total: 31.250 ms. forward: 10.000 ms, backward: 20.000 ms`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Wall time since restart divided by the step count
    pub total_ms_per_step: f64,
    pub step_count: u64,
    /// Events in first-recorded order
    pub events: Vec<EventSummary>,
}

impl Summary {
    /// Look up an event line by name
    pub fn event(&self, name: &str) -> Option<&EventSummary> {
        self.events.iter().find(|e| e.name == name)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total: {:.3} ms. ", self.total_ms_per_step)?;
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {:.3} ms", event.name, event.avg_ms)?;
        }
        Ok(())
    }
}
