pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod simulate;
pub mod timer;

pub use config::AppConfig;
pub use error::{Result, TimerError};
pub use timer::{
    Clock, EventSummary, IntervalStat, IntervalTimer, ManualClock, MonotonicClock, Summary,
};
