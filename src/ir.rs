use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationStatus {
    Scheduled,
    Running,
    Completed,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// One observation as it arrives from the backend feed. Instants are kept raw
/// here and only parsed when the window filter positions the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationEvent {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    #[serde(default, alias = "start_time", alias = "startTime")]
    pub start: Option<String>,
    #[serde(default, alias = "end_time", alias = "endTime")]
    pub end: Option<String>,
    #[serde(default)]
    pub status: Option<ObservationStatus>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, alias = "satellite")]
    pub label: Option<String>,
}

impl ObservationEvent {
    pub fn new(id: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            start: Some(start.into()),
            end: Some(end.into()),
            status: None,
            enabled: true,
            label: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n.to_string(),
        NumberOrString::String(s) => s,
    })
}

/// An event whose interval parsed and survived the window filter.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: Option<ObservationStatus>,
    pub enabled: bool,
    pub label: Option<String>,
    /// Position in the input feed; breaks start-time ties.
    pub source_index: usize,
}

/// Observer position in decimal degrees (north and east positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
