mod error;
mod filter;
mod grid;
mod rows;
mod scale;
mod sun;
pub(crate) mod types;
pub use error::LayoutError;
pub use filter::filter_in_window;
pub use grid::{compute_grid_lines, grid_step_hours};
pub use rows::{RowPacking, RowSlot, assign_rows, pixel_overlap};
pub use scale::{TimeScale, map_to_pixels};
pub use sun::{
    HORIZON_ELEVATION, SolarDay, compute_sun_intervals, is_night, solar_day, sun_elevation,
};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::ObservationEvent;

/// One full layout pass. Pure: identical inputs give identical output, and
/// nothing is carried over between calls.
pub fn compute_timeline_layout(
    events: &[ObservationEvent],
    request: &LayoutRequest,
    config: &LayoutConfig,
) -> TimelineLayout {
    let window = &request.window;
    let chart_x = config.margin_left;
    let chart_width = config.drawable_width();
    let scale = TimeScale::new(window, chart_x, chart_width);

    let visible = filter_in_window(events, window, config.inverted_intervals);
    let packing = assign_rows(&visible, &scale);

    let row_pitch = config.row_height + config.row_gap;
    let bars: Vec<EventBar> = visible
        .into_iter()
        .zip(packing.slots.iter())
        .map(|(event, slot)| EventBar {
            id: event.id,
            label: event.label,
            status: event.status,
            enabled: event.enabled,
            start: event.start,
            end: event.end,
            row: slot.row,
            x_start: slot.x_start,
            x_end: slot.x_end,
            y: config.margin_top + slot.row as f32 * row_pitch,
            height: config.row_height,
        })
        .collect();

    let (sun_markers, night_rects) = match request.location {
        Some(location) => {
            let sun = compute_sun_intervals(location, window);
            let markers = sun
                .sun_events
                .iter()
                .map(|event| SunMarker {
                    instant: event.instant,
                    kind: event.kind,
                    x: scale.x(event.instant),
                })
                .collect();
            let rects = sun
                .night_intervals
                .iter()
                .map(|night| NightRect {
                    start: night.start,
                    end: night.end,
                    x_start: scale.x(night.start),
                    x_end: scale.x(night.end),
                })
                .collect();
            (markers, rects)
        }
        None => (Vec::new(), Vec::new()),
    };

    let now_marker = request
        .now
        .filter(|now| window.contains(*now))
        .map(|instant| NowMarker {
            instant,
            x: scale.x(instant),
        });

    let rows = packing.row_count as f32;
    let height = config.margin_top
        + rows * config.row_height
        + (rows - 1.0) * config.row_gap
        + config.margin_bottom;

    log::debug!(
        "timeline layout: {} of {} events in {} row(s), {} night span(s)",
        bars.len(),
        events.len(),
        packing.row_count,
        night_rects.len()
    );

    TimelineLayout {
        window_start: window.start(),
        window_end: window.end(),
        bars,
        row_count: packing.row_count,
        grid_lines: compute_grid_lines(window, &scale),
        sun_markers,
        night_rects,
        now_marker,
        chart_x,
        chart_width: scale.chart_width(),
        width: config.width,
        height,
    }
}
