use chrono::{DateTime, Utc};
use pass_timeline::{
    Config, Location, WindowDuration, WindowMode, layout_feed, layout_to_json, parse_instant,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineOptions {
    now: Option<String>,
    duration: Option<WindowDuration>,
    mode: Option<WindowMode>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    width: Option<f32>,
}

fn build_config(options: &TimelineOptions) -> Config {
    let mut config = Config::default();
    if let Some(duration) = options.duration {
        config.window.duration = duration;
    }
    if let Some(mode) = options.mode {
        config.window.mode = mode;
    }
    if let (Some(latitude), Some(longitude)) = (options.latitude, options.longitude) {
        config.location = Some(Location::new(latitude, longitude));
    }
    if let Some(width) = options.width {
        config.layout.width = width;
    }
    config
}

fn resolve_now(options: &TimelineOptions) -> Result<DateTime<Utc>, String> {
    match options.now.as_deref() {
        Some(raw) => parse_instant(raw).ok_or_else(|| format!("invalid `now` instant: {raw}")),
        None => Ok(Utc::now()),
    }
}

fn layout_json(events_json: &str, options: TimelineOptions) -> Result<String, String> {
    let now = resolve_now(&options)?;
    let config = build_config(&options);
    let layout = layout_feed(events_json, now, &config).map_err(|error| format!("{error:#}"))?;
    layout_to_json(&layout).map_err(|error| error.to_string())
}

/// Lay out an observation feed; returns the layout as a JSON string.
#[wasm_bindgen]
pub fn layout_timeline(events_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TimelineOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        TimelineOptions::default()
    };
    layout_json(events_json, options).map_err(|error| JsValue::from_str(&error))
}
