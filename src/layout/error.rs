use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// Contract violations caught while building layout inputs. Once a
/// [`TimeWindow`](super::TimeWindow) and a validated config exist the
/// pipeline itself cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("time window must end after it starts (start {start}, end {end})")]
    DegenerateWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("a {duration} window around {now} is outside representable time")]
    WindowOutOfRange { now: DateTime<Utc>, duration: TimeDelta },

    #[error("layout dimension `{name}` must be finite and non-negative, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },
}
