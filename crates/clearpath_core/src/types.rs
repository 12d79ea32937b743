use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque job identifier handed out by the submission endpoint.
pub type JobId = String;

/// Identifies one opening of a results page. Reopening the same job starts a
/// new epoch, so anything addressed to an earlier one is stale.
pub type Epoch = u64;

/// Entity types accepted by the submission endpoint.
pub const ENTITY_TYPES: &[&str] = &["LLC", "Corporation", "LP", "LLP", "PC", "PLLC"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub name: String,
    pub entity_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    pub job_id: JobId,
    #[serde(default)]
    pub states_queued: Vec<String>,
}

/// Display-only job metadata from `GET /api/jobs/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobMetadata {
    #[serde(default)]
    pub job_id: JobId,
    pub name: String,
    pub entity_type: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Availability {
    Available,
    Taken,
    Similar,
    Unknown,
    Error,
}

impl Availability {
    pub fn label(self) -> &'static str {
        match self {
            Availability::Available => "AVAILABLE",
            Availability::Taken => "TAKEN",
            Availability::Similar => "SIMILAR",
            Availability::Unknown => "UNKNOWN",
            Availability::Error => "ERROR",
        }
    }
}

impl From<String> for Availability {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "available" => Availability::Available,
            "taken" => Availability::Taken,
            "similar" => Availability::Similar,
            "error" => Availability::Error,
            _ => Availability::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for RiskLevel {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => RiskLevel::Low,
            "medium" => RiskLevel::Medium,
            "high" => RiskLevel::High,
            _ => RiskLevel::Unknown,
        }
    }
}

/// One entity row found on a state registry. The backend's field set is not
/// fixed, so fields are kept as an open string map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawMatch {
    fields: BTreeMap<String, String>,
}

impl RawMatch {
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn name(&self) -> Option<&str> {
        self.non_blank("name")
    }

    /// Registration/file number used as the detail lookup key.
    pub fn file_number(&self) -> Option<&str> {
        self.non_blank("file_number")
    }

    fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|value| !value.is_empty())
    }
}

impl<'de> Deserialize<'de> for RawMatch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let fields = raw
            .into_iter()
            .filter_map(|(key, value)| scalar_to_string(value).map(|value| (key, value)))
            .collect();
        Ok(Self { fields })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StateResult {
    pub state_code: String,
    #[serde(default, deserialize_with = "nullable")]
    pub state_name: String,
    pub availability: Availability,
    #[serde(default, deserialize_with = "nullable")]
    pub confidence: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub similar_names: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub flags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub raw_matches: Vec<RawMatch>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TrademarkMark {
    #[serde(default, deserialize_with = "nullable")]
    pub mark: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub serial_number: String,
    #[serde(default, deserialize_with = "nullable")]
    pub owner: String,
    #[serde(default, deserialize_with = "scalar_list")]
    pub classes: Vec<String>,
    #[serde(default)]
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UsptoResult {
    #[serde(default, deserialize_with = "nullable")]
    pub exact_matches: Vec<TrademarkMark>,
    #[serde(default, deserialize_with = "nullable")]
    pub similar_marks: Vec<TrademarkMark>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: String,
}

/// Cache key for entity detail lookups: upper-cased jurisdiction plus the
/// registry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DetailKey {
    jurisdiction: String,
    identifier: String,
}

impl DetailKey {
    pub fn new(jurisdiction: &str, identifier: &str) -> Self {
        Self {
            jurisdiction: jurisdiction.trim().to_ascii_uppercase(),
            identifier: identifier.trim().to_string(),
        }
    }

    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Public OpenCorporates page for this entity, used when the detail
    /// lookup itself fails.
    pub fn fallback_url(&self) -> String {
        format!(
            "https://opencorporates.com/companies/us_{}/{}",
            self.jurisdiction.to_ascii_lowercase(),
            self.identifier
        )
    }
}

impl fmt::Display for DetailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.jurisdiction, self.identifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityDetail {
    #[serde(default, deserialize_with = "nullable")]
    pub file_number: String,
    #[serde(default)]
    pub entity_name: Option<String>,
    #[serde(default)]
    pub entity_kind: Option<String>,
    #[serde(default)]
    pub formation_date: Option<String>,
    #[serde(default)]
    pub registered_agent: Option<String>,
    #[serde(default, rename = "opencorporates_url")]
    pub reference_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Reported by the backend; never inferred client-side.
    #[serde(default)]
    pub cached: bool,
}

impl EntityDetail {
    /// Stand-in record rendered when the detail lookup fails.
    pub fn unavailable(key: &DetailKey, message: impl Into<String>) -> Self {
        Self {
            file_number: key.identifier().to_string(),
            entity_name: None,
            entity_kind: None,
            formation_date: None,
            registered_agent: None,
            reference_url: Some(key.fallback_url()),
            error: Some(message.into()),
            cached: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStreamStatus {
    #[default]
    Running,
    Complete,
    Error,
}

impl JobStreamStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStreamStatus::Running)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStreamStatus::Running => "Searching…",
            JobStreamStatus::Complete => "Search complete",
            JobStreamStatus::Error => "Search encountered an error",
        }
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads an explicit `null` as the type's default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.into_iter().filter_map(scalar_to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_match_keeps_scalars_and_skips_nested_values() {
        let raw: RawMatch = serde_json::from_str(
            r#"{"name":"ACME LLC","file_number":1234,"active":true,"agent":null,"extra":{"a":1}}"#,
        )
        .unwrap();
        assert_eq!(raw.name(), Some("ACME LLC"));
        assert_eq!(raw.file_number(), Some("1234"));
        assert_eq!(raw.get("active"), Some("true"));
        assert_eq!(raw.get("agent"), None);
        assert_eq!(raw.get("extra"), None);
    }

    #[test]
    fn blank_file_number_is_absent() {
        let raw = RawMatch::from_fields([("name", "ACME"), ("file_number", "  ")]);
        assert_eq!(raw.file_number(), None);
    }

    #[test]
    fn unrecognized_availability_maps_to_unknown() {
        assert_eq!(Availability::from("TAKEN".to_string()), Availability::Taken);
        assert_eq!(Availability::from("maybe".to_string()), Availability::Unknown);
        assert_eq!(RiskLevel::from("High".to_string()), RiskLevel::High);
    }

    #[test]
    fn detail_key_normalizes_jurisdiction() {
        let key = DetailKey::new("de", " 1234 ");
        assert_eq!(key.jurisdiction(), "DE");
        assert_eq!(key.identifier(), "1234");
        assert_eq!(
            key.fallback_url(),
            "https://opencorporates.com/companies/us_de/1234"
        );
    }

    #[test]
    fn state_result_tolerates_nulls_and_missing_lists() {
        let result: StateResult = serde_json::from_str(
            r#"{"state_code":"DE","state_name":"Delaware","availability":"available","confidence":0.92,"notes":null}"#,
        )
        .unwrap();
        assert_eq!(result.availability, Availability::Available);
        assert!(result.raw_matches.is_empty());
        assert_eq!(result.notes, "");
    }

    #[test]
    fn null_confidence_reads_as_zero() {
        let result: StateResult = serde_json::from_str(
            r#"{"state_code":"TX","availability":"unknown","confidence":null,"similar_names":null}"#,
        )
        .unwrap();
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.availability, Availability::Unknown);
        assert!(result.similar_names.is_empty());
    }
}
