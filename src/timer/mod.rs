//! Interval Timing
//!
//! Named-event timing for iterative training loops.
//!
//! # Usage
//!
//! ```no_run
//! use interval_timer::IntervalTimer;
//!
//! let mut timer = IntervalTimer::new();
//! for _step in 0..100 {
//!     // ... forward pass ...
//!     timer.record("forward");
//!     // ... backward pass ...
//!     timer.record("backward");
//!     timer.record("step");
//!     timer.trigger_on_interval("step", 10, |t| {
//!         if let Ok(report) = t.summarize(10) {
//!             println!("{}", report);
//!         }
//!     });
//! }
//! ```

pub mod clock;
pub mod interval;
pub mod summary;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use interval::IntervalTimer;
pub use summary::{EventSummary, IntervalStat, Summary};
