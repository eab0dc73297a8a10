use chrono::{DateTime, TimeDelta, Timelike, Utc};

use super::{GridLine, TimeScale, TimeWindow};

const HOUR_MS: i64 = 3_600_000;

/// Hours between grid lines for a window of the given length.
pub fn grid_step_hours(duration: TimeDelta) -> i64 {
    let hours = duration.num_minutes() as f64 / 60.0;
    if hours <= 12.0 {
        2
    } else if hours <= 24.0 {
        3
    } else if hours < 48.0 {
        4
    } else {
        6
    }
}

/// Grid lines on UTC-aligned multiples of the step, inside the window.
pub fn compute_grid_lines(window: &TimeWindow, scale: &TimeScale) -> Vec<GridLine> {
    let step_ms = grid_step_hours(window.duration()) * HOUR_MS;
    let start_ms = window.start().timestamp_millis();
    let end_ms = window.end().timestamp_millis();

    let mut tick = start_ms.div_euclid(step_ms) * step_ms;
    if tick < start_ms {
        tick += step_ms;
    }

    let mut lines = Vec::new();
    while tick <= end_ms {
        let Some(instant) = DateTime::<Utc>::from_timestamp_millis(tick) else {
            break;
        };
        let major = instant.hour() == 0;
        let label = if major {
            instant.format("%b %d").to_string()
        } else {
            instant.format("%H:%M").to_string()
        };
        lines.push(GridLine {
            instant,
            x: scale.x(instant),
            label,
            major,
        });
        tick += step_ms;
    }
    lines
}
