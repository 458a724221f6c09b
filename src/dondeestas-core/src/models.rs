use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Person is a location-sharing record, addressed by its `id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub visible: bool,
    /// Identifiers allowed to see this person
    #[serde(deserialize_with = "null_as_empty")]
    pub whitelist: Vec<String>,
    /// Identifiers this person follows
    #[serde(deserialize_with = "null_as_empty")]
    pub following: Vec<String>,
}

impl Person {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Position is the last observed location of a person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    /// Time of observation, `0001-01-01T00:00:00Z` when never observed
    pub tov: DateTime<Utc>,
    pub latitude: f32,
    pub longitude: f32,
    pub elevation: f32,
}

/// Seconds from 0001-01-01T00:00:00Z to the Unix epoch
const UNOBSERVED_TOV_SECS: i64 = -62_135_596_800;

fn unobserved_tov() -> DateTime<Utc> {
    DateTime::from_timestamp(UNOBSERVED_TOV_SECS, 0).unwrap_or_default()
}

impl Default for Position {
    fn default() -> Self {
        Self {
            tov: unobserved_tov(),
            latitude: 0.0,
            longitude: 0.0,
            elevation: 0.0,
        }
    }
}

/// DocResponse is the body returned by the backend after a document write
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocResponse {
    pub id: String,
    pub ok: bool,
    pub rev: String,
}

/// PersonDataRequest asks for a batch of people by identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonDataRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ids: Vec<String>,
}

/// PersonDataResponse carries the people that were found
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonDataResponse {
    pub people: Vec<Person>,
}

/// ErrorResponse represents an API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Clients that never populated a list send `null` rather than `[]`
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
