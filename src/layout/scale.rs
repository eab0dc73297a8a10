use chrono::{DateTime, Utc};

use super::TimeWindow;

/// Smallest span, in milliseconds, used as the mapping denominator.
const MIN_SPAN_MS: f64 = 1.0;

/// Linear map from instants in a window onto `[chart_x, chart_x + chart_width]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start_ms: i64,
    span_ms: f64,
    chart_x: f32,
    chart_width: f32,
}

impl TimeScale {
    pub fn new(window: &TimeWindow, chart_x: f32, chart_width: f32) -> Self {
        let start_ms = window.start().timestamp_millis();
        let span_ms = (window.end().timestamp_millis() - start_ms) as f64;
        Self {
            start_ms,
            span_ms: span_ms.max(MIN_SPAN_MS),
            chart_x,
            chart_width: chart_width.max(0.0),
        }
    }

    /// Position of `instant` as a fraction of the window, clamped to `[0, 1]`.
    pub fn fraction(&self, instant: DateTime<Utc>) -> f64 {
        let offset = (instant.timestamp_millis() - self.start_ms) as f64;
        (offset / self.span_ms).clamp(0.0, 1.0)
    }

    pub fn x(&self, instant: DateTime<Utc>) -> f32 {
        self.chart_x + (self.fraction(instant) * self.chart_width as f64) as f32
    }

    pub fn chart_x(&self) -> f32 {
        self.chart_x
    }

    pub fn chart_width(&self) -> f32 {
        self.chart_width
    }
}

/// One-off form of [`TimeScale::x`].
pub fn map_to_pixels(
    instant: DateTime<Utc>,
    window: &TimeWindow,
    margin_left: f32,
    drawable_width: f32,
) -> f32 {
    TimeScale::new(window, margin_left, drawable_width).x(instant)
}
