use crate::ir::Location;
use crate::layout::{LayoutError, WindowDuration, WindowMode};
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// What to do with events whose end precedes their start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InvertedIntervalPolicy {
    #[default]
    Drop,
    /// Collapse to `[start, start]`.
    ZeroWidth,
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub width: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub row_height: f32,
    pub row_gap: f32,
    pub inverted_intervals: InvertedIntervalPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            margin_left: 40.0,
            margin_right: 10.0,
            margin_top: 24.0,
            margin_bottom: 8.0,
            row_height: 24.0,
            row_gap: 4.0,
            inverted_intervals: InvertedIntervalPolicy::Drop,
        }
    }
}

impl LayoutConfig {
    /// Horizontal space left for the time axis once margins are taken.
    pub fn drawable_width(&self) -> f32 {
        (self.width - self.margin_left - self.margin_right).max(0.0)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let dims = [
            ("width", self.width),
            ("marginLeft", self.margin_left),
            ("marginRight", self.margin_right),
            ("marginTop", self.margin_top),
            ("marginBottom", self.margin_bottom),
            ("rowHeight", self.row_height),
            ("rowGap", self.row_gap),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidDimension { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WindowConfig {
    pub duration: WindowDuration,
    pub mode: WindowMode,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub window: WindowConfig,
    pub location: Option<Location>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    width: Option<f32>,
    margin_left: Option<f32>,
    margin_right: Option<f32>,
    margin_top: Option<f32>,
    margin_bottom: Option<f32>,
    row_height: Option<f32>,
    row_gap: Option<f32>,
    inverted_intervals: Option<InvertedIntervalPolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    duration: Option<WindowDuration>,
    mode: Option<WindowMode>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config {}", path.display()))
}

/// Merge a JSON config document over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.width {
            config.layout.width = v;
        }
        if let Some(v) = layout.margin_left {
            config.layout.margin_left = v;
        }
        if let Some(v) = layout.margin_right {
            config.layout.margin_right = v;
        }
        if let Some(v) = layout.margin_top {
            config.layout.margin_top = v;
        }
        if let Some(v) = layout.margin_bottom {
            config.layout.margin_bottom = v;
        }
        if let Some(v) = layout.row_height {
            config.layout.row_height = v;
        }
        if let Some(v) = layout.row_gap {
            config.layout.row_gap = v;
        }
        if let Some(v) = layout.inverted_intervals {
            config.layout.inverted_intervals = v;
        }
    }
    if let Some(v) = parsed.duration {
        config.window.duration = v;
    }
    if let Some(v) = parsed.mode {
        config.window.mode = v;
    }
    match (parsed.latitude, parsed.longitude) {
        (Some(latitude), Some(longitude)) => {
            config.location = Some(Location::new(latitude, longitude));
        }
        (None, None) => {}
        _ => anyhow::bail!("latitude and longitude must be given together"),
    }

    config.layout.validate()?;
    Ok(config)
}
