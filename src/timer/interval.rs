//! Interval Timer
//!
//! Accumulates named durations between restarts, keeps lifetime counts per
//! event, and fires a callback every `period` occurrences of an event.

use std::collections::HashMap;
use std::convert::Infallible;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::clock::{Clock, MonotonicClock};
use super::summary::{EventSummary, IntervalStat, Summary};
use crate::error::{Result, TimerError};

/// Timer for instrumenting an iterative training loop
///
/// Each `record(name)` charges the time since the previous mark to `name`.
/// Interval stats are cleared by `restart`; lifetime counts and trigger
/// marks survive it.
#[derive(Debug)]
pub struct IntervalTimer<C: Clock = MonotonicClock> {
    clock: C,
    /// Start of the current interval
    started_at: Instant,
    /// Instant of the previous record (or restart)
    last_mark: Instant,
    /// Interval stats in first-recorded order
    durations: Vec<(String, IntervalStat)>,
    /// Event name -> position in `durations`
    positions: HashMap<String, usize>,
    lifetime_counts: HashMap<String, u64>,
    /// Lifetime count at the last trigger; absent means never triggered
    trigger_marks: HashMap<String, u64>,
}

impl IntervalTimer<MonotonicClock> {
    /// Create a timer on the monotonic clock
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }
}

impl Default for IntervalTimer<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> IntervalTimer<C> {
    /// Create a timer on a custom clock
    pub fn with_clock(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            started_at: now,
            last_mark: now,
            durations: Vec::new(),
            positions: HashMap::new(),
            lifetime_counts: HashMap::new(),
            trigger_marks: HashMap::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Start a new interval
    pub fn restart(&mut self) {
        let now = self.clock.now();
        self.started_at = now;
        self.last_mark = now;
        self.durations.clear();
        self.positions.clear();
    }

    /// Charge the time since the previous mark to `name`
    ///
    /// Returns the measured delta.
    pub fn record(&mut self, name: &str) -> Duration {
        let now = self.clock.now();
        let delta = now.saturating_duration_since(self.last_mark);
        let micros = u64::try_from(delta.as_micros()).unwrap_or(u64::MAX);

        match self.positions.get(name) {
            Some(&idx) => self.durations[idx].1.add(micros),
            None => {
                let mut stat = IntervalStat::default();
                stat.add(micros);
                self.positions.insert(name.to_string(), self.durations.len());
                self.durations.push((name.to_string(), stat));
            }
        }

        match self.lifetime_counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.lifetime_counts.insert(name.to_string(), 1);
            }
        }

        self.last_mark = now;
        delta
    }

    /// Time since the current interval started
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.started_at)
    }

    /// Interval stats for `name`, if it was recorded since the last restart
    pub fn interval_stats(&self, name: &str) -> Option<IntervalStat> {
        self.positions.get(name).map(|&idx| self.durations[idx].1)
    }

    /// Interval stats in first-recorded order
    pub fn interval_events(&self) -> impl Iterator<Item = (&str, &IntervalStat)> {
        self.durations
            .iter()
            .map(|(name, stat)| (name.as_str(), stat))
    }

    /// Number of records for `name` since construction (0 if never seen)
    pub fn lifetime_count(&self, name: &str) -> u64 {
        self.lifetime_counts.get(name).copied().unwrap_or(0)
    }

    /// Lifetime count at the last trigger of `name`, or -1 if it never fired
    pub fn last_trigger_mark(&self, name: &str) -> i64 {
        self.trigger_marks
            .get(name)
            .map(|&mark| i64::try_from(mark).unwrap_or(i64::MAX))
            .unwrap_or(-1)
    }

    /// Whether `name` sits on a fresh multiple of `period`
    ///
    /// A zero period never triggers.
    pub fn should_trigger(&self, name: &str, period: u64) -> bool {
        if period == 0 {
            return false;
        }
        let curr = self.lifetime_count(name);
        let advanced = match self.trigger_marks.get(name) {
            Some(&last) => curr > last,
            None => true,
        };
        advanced && curr % period == 0
    }

    /// Remember the current lifetime count of `name` as triggered
    pub fn mark_triggered(&mut self, name: &str) {
        let curr = self.lifetime_count(name);
        self.trigger_marks.insert(name.to_string(), curr);
    }

    /// Run `callback` on every `period`-th occurrence of `name`
    ///
    /// The callback sees the interval before it is cleared; afterwards the
    /// timer restarts and the trigger is marked. Returns whether it fired.
    pub fn trigger_on_interval<F>(&mut self, name: &str, period: u64, callback: F) -> bool
    where
        F: FnOnce(&Self),
    {
        let result = self.try_trigger_on_interval(name, period, |timer| {
            callback(timer);
            Ok::<(), Infallible>(())
        });
        match result {
            Ok(fired) => fired,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`trigger_on_interval`](Self::trigger_on_interval)
    ///
    /// A callback error is returned as-is and leaves the timer untouched:
    /// no restart, no trigger mark.
    pub fn try_trigger_on_interval<F, E>(
        &mut self,
        name: &str,
        period: u64,
        callback: F,
    ) -> std::result::Result<bool, E>
    where
        F: FnOnce(&Self) -> std::result::Result<(), E>,
    {
        if !self.should_trigger(name, period) {
            return Ok(false);
        }

        callback(&*self)?;
        self.restart();
        self.mark_triggered(name);
        debug!(
            event = name,
            period,
            lifetime = self.lifetime_count(name),
            "interval triggered"
        );
        Ok(true)
    }

    /// Snapshot of the current interval averaged over `step_count` steps
    pub fn summary(&self, step_count: u64) -> Result<Summary> {
        if step_count == 0 {
            return Err(TimerError::InvalidArgument(
                "step_count must be positive".to_string(),
            ));
        }

        let total_ms_per_step = self.elapsed().as_secs_f64() * 1000.0 / step_count as f64;
        let events = self
            .durations
            .iter()
            .map(|(name, stat)| EventSummary {
                name: name.clone(),
                count: stat.count,
                total_micros: stat.total_micros,
                avg_ms: stat.avg_ms(),
            })
            .collect();

        Ok(Summary {
            total_ms_per_step,
            step_count,
            events,
        })
    }

    /// One-line report, e.g. `Total: 12.000 ms. fwd: 10.000 ms, bwd: 2.000 ms`
    pub fn summarize(&self, step_count: u64) -> Result<String> {
        Ok(self.summary(step_count)?.to_string())
    }

    /// Emit the report through `tracing`
    pub fn log_summary(&self, step_count: u64) -> Result<()> {
        let summary = self.summary(step_count)?;
        info!(steps = step_count, "{}", summary);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::clock::ManualClock;

    fn manual_timer() -> IntervalTimer<ManualClock> {
        IntervalTimer::with_clock(ManualClock::new())
    }

    #[test]
    fn test_record_charges_time_since_last_mark() {
        let mut timer = manual_timer();
        timer.clock().advance_ms(10);
        assert_eq!(timer.record("fwd"), Duration::from_millis(10));
        timer.clock().advance_ms(4);
        assert_eq!(timer.record("bwd"), Duration::from_millis(4));

        assert_eq!(
            timer.interval_stats("fwd"),
            Some(IntervalStat {
                total_micros: 10_000,
                count: 1
            })
        );
        assert_eq!(timer.interval_stats("bwd").unwrap().total_micros, 4_000);
        assert_eq!(timer.interval_stats("missing"), None);
    }

    #[test]
    fn test_restart_keeps_lifetime_counts() {
        let mut timer = manual_timer();
        timer.record("step");
        timer.record("step");
        timer.restart();
        timer.record("step");

        assert_eq!(timer.interval_stats("step").unwrap().count, 1);
        assert_eq!(timer.lifetime_count("step"), 3);
    }

    #[test]
    fn test_restart_resets_mark() {
        let mut timer = manual_timer();
        timer.clock().advance_ms(50);
        timer.restart();
        timer.clock().advance_ms(3);
        assert_eq!(timer.record("fwd"), Duration::from_millis(3));
        assert_eq!(timer.elapsed(), Duration::from_millis(3));
    }

    #[test]
    fn test_interval_events_keep_insertion_order() {
        let mut timer = manual_timer();
        for name in ["load", "forward", "backward", "forward", "load"] {
            timer.record(name);
        }
        let names: Vec<&str> = timer.interval_events().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["load", "forward", "backward"]);
    }

    #[test]
    fn test_unknown_names_read_as_defaults() {
        let timer = manual_timer();
        assert_eq!(timer.lifetime_count("unknown"), 0);
        assert_eq!(timer.last_trigger_mark("unknown"), -1);
        assert!(timer.lifetime_counts.is_empty());
    }

    #[test]
    fn test_should_trigger_on_multiples() {
        let mut timer = manual_timer();
        let mut hits = Vec::new();
        for i in 1..=9 {
            timer.record("step");
            if timer.should_trigger("step", 3) {
                hits.push(i);
                timer.mark_triggered("step");
            }
        }
        assert_eq!(hits, vec![3, 6, 9]);
    }

    #[test]
    fn test_should_trigger_not_repeated_without_progress() {
        let mut timer = manual_timer();
        for _ in 0..4 {
            timer.record("step");
        }
        assert!(timer.should_trigger("step", 2));
        timer.mark_triggered("step");
        assert!(!timer.should_trigger("step", 2));
        assert_eq!(timer.last_trigger_mark("step"), 4);
    }

    #[test]
    fn test_zero_period_never_triggers() {
        let mut timer = manual_timer();
        timer.record("step");
        assert!(!timer.should_trigger("step", 0));
        assert!(!timer.trigger_on_interval("step", 0, |_| panic!("must not fire")));
    }

    #[test]
    fn test_fresh_name_is_on_boundary() {
        // count 0 is a multiple of every period and beats the -1 sentinel
        let mut timer = manual_timer();
        assert!(timer.should_trigger("never_recorded", 4));
        timer.mark_triggered("never_recorded");
        assert!(!timer.should_trigger("never_recorded", 4));
    }

    #[test]
    fn test_mark_triggered_is_idempotent() {
        let mut timer = manual_timer();
        timer.record("step");
        timer.mark_triggered("step");
        timer.mark_triggered("step");
        assert_eq!(timer.last_trigger_mark("step"), 1);
    }

    #[test]
    fn test_trigger_callback_sees_pre_reset_state() {
        let mut timer = manual_timer();
        let mut seen = None;
        for _ in 0..2 {
            timer.clock().advance_ms(5);
            timer.record("step");
            timer.trigger_on_interval("step", 2, |t| {
                seen = t.interval_stats("step");
            });
        }

        assert_eq!(
            seen,
            Some(IntervalStat {
                total_micros: 10_000,
                count: 2
            })
        );
        assert_eq!(timer.interval_events().count(), 0);
        assert_eq!(timer.elapsed(), Duration::ZERO);
        assert_eq!(timer.last_trigger_mark("step"), 2);
    }

    #[test]
    fn test_failed_callback_leaves_state() {
        let mut timer = manual_timer();
        timer.record("step");

        let result = timer.try_trigger_on_interval("step", 1, |_| Err("disk full"));
        assert_eq!(result, Err("disk full"));
        assert_eq!(timer.interval_stats("step").unwrap().count, 1);
        assert_eq!(timer.last_trigger_mark("step"), -1);

        let fired = timer.try_trigger_on_interval("step", 1, |_| Ok::<(), &str>(()));
        assert_eq!(fired, Ok(true));
        assert_eq!(timer.last_trigger_mark("step"), 1);
    }

    #[test]
    fn test_summary_rejects_zero_steps() {
        let timer = manual_timer();
        let err = timer.summarize(0).unwrap_err();
        assert!(matches!(err, TimerError::InvalidArgument(_)));
    }

    #[test]
    fn test_summarize_averages() {
        let mut timer = manual_timer();
        for _ in 0..2 {
            timer.clock().advance_ms(10);
            timer.record("forward");
            timer.clock().advance_ms(20);
            timer.record("backward");
        }
        timer.clock().advance_ms(4);

        let report = timer.summarize(2).unwrap();
        assert_eq!(
            report,
            "Total: 32.000 ms. forward: 10.000 ms, backward: 20.000 ms"
        );

        let summary = timer.summary(2).unwrap();
        assert_eq!(summary.event("backward").unwrap().count, 2);
        assert_eq!(summary.event("backward").unwrap().total_micros, 40_000);
    }
}
