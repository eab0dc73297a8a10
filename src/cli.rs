use crate::config::{Config, load_config};
use crate::ir::Location;
use crate::layout::{WindowDuration, WindowMode};
use crate::layout_dump::write_layout_dump;
use crate::layout_feed;
use crate::parser::parse_instant;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ptl", version, about = "Lay out observation passes on a day/night timeline")]
pub struct Args {
    /// Observation feed (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Layout JSON output. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Reference instant (RFC 3339). Defaults to the current time.
    #[arg(long = "now")]
    pub now: Option<String>,

    /// Window length
    #[arg(short = 'd', long = "duration", value_enum)]
    pub duration: Option<DurationArg>,

    /// Window placement relative to `now`
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<ModeArg>,

    /// Observer latitude in degrees
    #[arg(long = "lat", requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Observer longitude in degrees
    #[arg(long = "lon", requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DurationArg {
    #[value(name = "12h")]
    H12,
    #[value(name = "24h")]
    H24,
    #[value(name = "48h")]
    H48,
    #[value(name = "72h")]
    H72,
}

impl From<DurationArg> for WindowDuration {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::H12 => WindowDuration::Hours12,
            DurationArg::H24 => WindowDuration::Hours24,
            DurationArg::H48 => WindowDuration::Hours48,
            DurationArg::H72 => WindowDuration::Hours72,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ModeArg {
    Centered,
    Forward,
}

impl From<ModeArg> for WindowMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Centered => WindowMode::Centered,
            ModeArg::Forward => WindowMode::Forward,
        }
    }
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    apply_args(&mut config, &args);

    let now = resolve_now(args.now.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let layout = layout_feed(&input, now, &config)?;
    log::info!(
        "laid out {} observations in {} row(s) between {} and {}",
        layout.bars.len(),
        layout.row_count,
        layout.window_start,
        layout.window_end
    );

    write_layout_dump(args.output.as_deref(), &layout)
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(duration) = args.duration {
        config.window.duration = duration.into();
    }
    if let Some(mode) = args.mode {
        config.window.mode = mode.into();
    }
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        config.location = Some(Location::new(lat, lon));
    }
    if let Some(width) = args.width {
        config.layout.width = width;
    }
}

fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        None => Ok(Utc::now()),
        Some(raw) => parse_instant(raw).with_context(|| format!("invalid --now instant `{raw}`")),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
