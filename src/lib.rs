#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, InvertedIntervalPolicy, LayoutConfig, WindowConfig};
pub use ir::{Location, ObservationEvent, ObservationStatus};
pub use layout::{
    LayoutError, LayoutRequest, TimeWindow, TimelineLayout, WindowDuration, WindowMode,
    compute_timeline_layout,
};
pub use layout_dump::{LayoutDump, layout_to_json};
pub use parser::{parse_events, parse_instant};

use chrono::{DateTime, Utc};

/// Parse a feed and lay it out against a window built around `now`.
pub fn layout_feed(
    input: &str,
    now: DateTime<Utc>,
    config: &Config,
) -> anyhow::Result<TimelineLayout> {
    config.layout.validate()?;
    let window = TimeWindow::around(now, config.window.duration.as_delta(), config.window.mode)?;
    let mut request = LayoutRequest::new(window).with_now(now);
    request.location = config.location;
    let events = parse_events(input)?;
    Ok(compute_timeline_layout(&events, &request, &config.layout))
}
