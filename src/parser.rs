use crate::ir::ObservationEvent;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an observation feed. Accepts a bare array or an object carrying the
/// array under `events` or `observations`. Records that do not deserialize are
/// skipped; only input that is not JSON/JSON5 at all is an error.
pub fn parse_events(input: &str) -> Result<Vec<ObservationEvent>> {
    let value = match serde_json::from_str::<Value>(input) {
        Ok(value) => value,
        Err(_) => json5::from_str::<Value>(input).context("event feed is not valid JSON")?,
    };

    let records = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map
            .remove("events")
            .or_else(|| map.remove("observations"))
        {
            Some(Value::Array(items)) => items,
            Some(_) => anyhow::bail!("event list must be an array"),
            None => anyhow::bail!("expected an array or an object with an `events` array"),
        },
        _ => anyhow::bail!("expected an array or an object with an `events` array"),
    };

    let mut events = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<ObservationEvent>(record) {
            Ok(event) => events.push(event),
            Err(err) => log::warn!("skipping observation record {idx}: {err}"),
        }
    }
    log::debug!("parsed {} observation records", events.len());
    Ok(events)
}

/// Parse an instant from the feed. Naive timestamps are taken as UTC.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
