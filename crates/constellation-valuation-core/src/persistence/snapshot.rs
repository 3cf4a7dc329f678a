use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::scenario::{ScenarioParameters, ScenarioState, Schedule, Schedules};
use crate::types::{Multiple, Rate};
use crate::EngineResult;

/// Format version written into every exported snapshot.
pub const SNAPSHOT_FORMAT_VERSION: &str = "1.0";

/// Top-level fields a snapshot must carry to be imported.
pub const REQUIRED_FIELDS: [&str; 4] = [
    "params",
    "unit_count_schedule",
    "adoption_schedule",
    "multiple_schedule",
];

/// Full engine input state, flattened for export.
///
/// Decimals serialize as strings, so an export/import round trip reproduces
/// every input exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSnapshot {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    pub params: ScenarioParameters,
    pub unit_count_schedule: Schedule<u32>,
    pub adoption_schedule: Schedule<Rate>,
    pub multiple_schedule: Schedule<Multiple>,
}

fn default_version() -> String {
    SNAPSHOT_FORMAT_VERSION.to_string()
}

impl ScenarioSnapshot {
    /// Snapshot of `state` stamped with the given time.
    pub fn capture_at(state: &ScenarioState, exported_at: DateTime<Utc>) -> Self {
        Self {
            version: default_version(),
            exported_at: Some(exported_at),
            params: state.params.clone(),
            unit_count_schedule: state.schedules.unit_count_schedule.clone(),
            adoption_schedule: state.schedules.adoption_schedule.clone(),
            multiple_schedule: state.schedules.multiple_schedule.clone(),
        }
    }

    /// Snapshot of `state` stamped with the current time.
    pub fn capture(state: &ScenarioState) -> Self {
        Self::capture_at(state, Utc::now())
    }

    pub fn into_state(self) -> ScenarioState {
        ScenarioState {
            params: self.params,
            schedules: Schedules {
                unit_count_schedule: self.unit_count_schedule,
                adoption_schedule: self.adoption_schedule,
                multiple_schedule: self.multiple_schedule,
            },
        }
    }
}

/// Serialize a snapshot of `state` as pretty-printed JSON.
pub fn export_snapshot(state: &ScenarioState) -> EngineResult<String> {
    let snapshot = ScenarioSnapshot::capture(state);
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Parse a snapshot from JSON text.
pub fn import_snapshot(json: &str) -> EngineResult<ScenarioSnapshot> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    snapshot_from_value(value)
}

/// Parse a snapshot from an already-decoded JSON value.
///
/// Missing or null required fields are reported by name before any typed
/// decoding is attempted.
pub fn snapshot_from_value(value: serde_json::Value) -> EngineResult<ScenarioSnapshot> {
    let obj = value.as_object().ok_or_else(|| EngineError::MalformedConfig {
        field: "<root object>".into(),
    })?;

    for field in REQUIRED_FIELDS {
        match obj.get(field) {
            Some(v) if !v.is_null() => {}
            _ => {
                return Err(EngineError::MalformedConfig {
                    field: field.to_string(),
                })
            }
        }
    }

    let snapshot: ScenarioSnapshot = serde_json::from_value(value)?;
    if snapshot.version != SNAPSHOT_FORMAT_VERSION {
        tracing::warn!(
            version = %snapshot.version,
            expected = SNAPSHOT_FORMAT_VERSION,
            "importing snapshot with a different format version"
        );
    }
    tracing::debug!(exported_at = ?snapshot.exported_at, "snapshot imported");
    Ok(snapshot)
}
