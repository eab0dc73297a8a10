use crate::ir::ObservationStatus;
use crate::layout::{SunEventKind, TimelineLayout};
use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub window_start: String,
    pub window_end: String,
    pub width: f32,
    pub height: f32,
    pub chart_x: f32,
    pub chart_width: f32,
    pub row_count: usize,
    pub bars: Vec<BarDump>,
    pub nights: Vec<NightDump>,
    pub sun_events: Vec<SunEventDump>,
    pub grid: Vec<GridDump>,
    pub now: Option<NowDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDump {
    pub id: String,
    pub label: Option<String>,
    pub status: Option<ObservationStatus>,
    pub enabled: bool,
    pub start: String,
    pub end: String,
    pub row: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NightDump {
    pub start: String,
    pub end: String,
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SunEventDump {
    pub kind: SunEventKind,
    pub at: String,
    pub x: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDump {
    pub at: String,
    pub x: f32,
    pub label: String,
    pub major: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowDump {
    pub at: String,
    pub x: f32,
}

fn stamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl LayoutDump {
    pub fn from_layout(layout: &TimelineLayout) -> Self {
        let bars = layout
            .bars
            .iter()
            .map(|bar| BarDump {
                id: bar.id.clone(),
                label: bar.label.clone(),
                status: bar.status,
                enabled: bar.enabled,
                start: stamp(bar.start),
                end: stamp(bar.end),
                row: bar.row,
                x: bar.x_start,
                y: bar.y,
                width: bar.x_end - bar.x_start,
                height: bar.height,
            })
            .collect();

        let nights = layout
            .night_rects
            .iter()
            .map(|night| NightDump {
                start: stamp(night.start),
                end: stamp(night.end),
                x: night.x_start,
                width: night.x_end - night.x_start,
            })
            .collect();

        let sun_events = layout
            .sun_markers
            .iter()
            .map(|marker| SunEventDump {
                kind: marker.kind,
                at: stamp(marker.instant),
                x: marker.x,
            })
            .collect();

        let grid = layout
            .grid_lines
            .iter()
            .map(|line| GridDump {
                at: stamp(line.instant),
                x: line.x,
                label: line.label.clone(),
                major: line.major,
            })
            .collect();

        LayoutDump {
            window_start: stamp(layout.window_start),
            window_end: stamp(layout.window_end),
            width: layout.width,
            height: layout.height,
            chart_x: layout.chart_x,
            chart_width: layout.chart_width,
            row_count: layout.row_count,
            bars,
            nights,
            sun_events,
            grid,
            now: layout.now_marker.map(|marker| NowDump {
                at: stamp(marker.instant),
                x: marker.x,
            }),
        }
    }
}

pub fn layout_to_json(layout: &TimelineLayout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

/// Write the dump to `path`, or to stdout when no path is given.
pub fn write_layout_dump(path: Option<&Path>, layout: &TimelineLayout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("writing {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writer
                .flush()
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, &dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::ObservationEvent;
    use crate::layout::{LayoutRequest, TimeWindow, compute_timeline_layout};
    use chrono::TimeZone;

    #[test]
    fn dump_uses_rfc3339_and_widths() {
        let start = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let window = TimeWindow::new(start, start + chrono::TimeDelta::hours(12)).unwrap();
        let events = vec![ObservationEvent::new(
            "p1",
            "2024-06-21T03:00:00Z",
            "2024-06-21T06:00:00Z",
        )];
        let layout =
            compute_timeline_layout(&events, &LayoutRequest::new(window), &LayoutConfig::default());
        let dump = LayoutDump::from_layout(&layout);

        assert_eq!(dump.window_start, "2024-06-21T00:00:00Z");
        assert_eq!(dump.bars[0].start, "2024-06-21T03:00:00Z");
        assert_eq!(dump.bars[0].width, 1150.0 / 4.0);

        let json = layout_to_json(&layout).unwrap();
        assert!(json.contains("\"rowCount\": 1"));
        assert!(json.contains("\"windowStart\": \"2024-06-21T00:00:00Z\""));
        assert!(json.contains("\"now\": null"));
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("pass-timeline-{}-{name}", std::process::id()))
    }

    #[test]
    fn writes_dump_to_file() {
        let start = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let window = TimeWindow::new(start, start + chrono::TimeDelta::hours(12)).unwrap();
        let layout = compute_timeline_layout(&[], &LayoutRequest::new(window), &LayoutConfig::default());

        let path = scratch_path("layout.json");
        write_layout_dump(Some(&path), &layout).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["chartWidth"], 1150.0);
        assert_eq!(value["bars"], serde_json::json!([]));
    }

    #[test]
    fn unwritable_output_names_the_path() {
        let start = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let window = TimeWindow::new(start, start + chrono::TimeDelta::hours(12)).unwrap();
        let layout = compute_timeline_layout(&[], &LayoutRequest::new(window), &LayoutConfig::default());

        let path = scratch_path("missing-dir").join("layout.json");
        let err = write_layout_dump(Some(&path), &layout).unwrap_err();
        assert!(format!("{err:#}").contains(&path.display().to_string()));
    }
}
