use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::LayoutError;
use crate::ir::{Location, ObservationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// `now` sits in the middle of the window.
    #[default]
    Centered,
    /// The window starts at `now`.
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowDuration {
    #[serde(rename = "12h")]
    Hours12,
    #[default]
    #[serde(rename = "24h")]
    Hours24,
    #[serde(rename = "48h")]
    Hours48,
    #[serde(rename = "72h")]
    Hours72,
}

impl WindowDuration {
    pub fn hours(self) -> i64 {
        match self {
            WindowDuration::Hours12 => 12,
            WindowDuration::Hours24 => 24,
            WindowDuration::Hours48 => 48,
            WindowDuration::Hours72 => 72,
        }
    }

    pub fn as_delta(self) -> TimeDelta {
        TimeDelta::hours(self.hours())
    }
}

/// Visible time range. Construction guarantees `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, LayoutError> {
        if end <= start {
            return Err(LayoutError::DegenerateWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn around(
        now: DateTime<Utc>,
        duration: TimeDelta,
        mode: WindowMode,
    ) -> Result<Self, LayoutError> {
        let (before, after) = match mode {
            WindowMode::Centered => {
                let half = duration / 2;
                (half, duration - half)
            }
            WindowMode::Forward => (TimeDelta::zero(), duration),
        };
        let out_of_range = || LayoutError::WindowOutOfRange { now, duration };
        let start = now.checked_sub_signed(before).ok_or_else(out_of_range)?;
        let end = now.checked_add_signed(after).ok_or_else(out_of_range)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Inclusive on both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Everything one layout pass needs besides the events and the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutRequest {
    pub window: TimeWindow,
    pub now: Option<DateTime<Utc>>,
    pub location: Option<Location>,
}

impl LayoutRequest {
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            now: None,
            location: None,
        }
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventBar {
    pub id: String,
    pub label: Option<String>,
    pub status: Option<ObservationStatus>,
    pub enabled: bool,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub row: usize,
    pub x_start: f32,
    pub x_end: f32,
    pub y: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SunEventKind {
    Sunrise,
    Sunset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunEvent {
    pub instant: DateTime<Utc>,
    pub kind: SunEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SunIntervals {
    pub sun_events: Vec<SunEvent>,
    pub night_intervals: Vec<NightInterval>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunMarker {
    pub instant: DateTime<Utc>,
    pub kind: SunEventKind,
    pub x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightRect {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub x_start: f32,
    pub x_end: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub instant: DateTime<Utc>,
    pub x: f32,
    pub label: String,
    /// Falls on a UTC midnight.
    pub major: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NowMarker {
    pub instant: DateTime<Utc>,
    pub x: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineLayout {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub bars: Vec<EventBar>,
    pub row_count: usize,
    pub grid_lines: Vec<GridLine>,
    pub sun_markers: Vec<SunMarker>,
    pub night_rects: Vec<NightRect>,
    pub now_marker: Option<NowMarker>,
    pub chart_x: f32,
    pub chart_width: f32,
    pub width: f32,
    pub height: f32,
}
