//! Persisted snapshot of the configurator state
//!
//! The durable subset of the store is written as
//! `{"state": {...}, "version": 0}` under [`STORAGE_KEY`]. Loading never
//! fails: every field is recovered on its own and anything missing or
//! malformed falls back to its default, so a corrupt `modes` entry does not
//! cost the user their case colour.

use crate::config::models::{
    CaseMaterial, HardwareConfig, Mode, ModesTable, SettingsPatch, truncate_custom_mode_name,
};
use crate::config::registry;
use crate::error::{CubeError, Result, StringError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key the snapshot is stored under
pub const STORAGE_KEY: &str = "smart-focus-cube-storage-v2";

/// Schema version written into the envelope
pub const SNAPSHOT_VERSION: u64 = 0;

/// The persisted subset of the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    /// Case colour
    pub case_color: String,
    /// Case finish
    pub case_material: CaseMaterial,
    /// Settings of every mode
    pub modes: ModesTable,
    /// Display name of the custom mode
    pub custom_mode_name: String,
    /// Active mode
    pub current_mode: Mode,
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        let hardware = HardwareConfig::default();
        Self {
            case_color: hardware.case_color,
            case_material: hardware.case_material,
            modes: ModesTable::default(),
            custom_mode_name: registry::DEFAULT_CUSTOM_MODE_NAME.to_string(),
            current_mode: registry::DEFAULT_MODE,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    state: &'a PersistedSnapshot,
    version: u64,
}

/// Outcome of decoding a stored snapshot
#[derive(Debug)]
pub struct SnapshotRecovery {
    /// Snapshot with defaults substituted where needed
    pub snapshot: PersistedSnapshot,
    /// One [`CubeError::SnapshotLoadFailure`] per field that fell back
    pub failures: Vec<CubeError>,
}

impl SnapshotRecovery {
    /// Whether every field was read back as stored
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

fn failure(message: impl Into<String>) -> CubeError {
    CubeError::SnapshotLoadFailure(StringError::new(message))
}

impl PersistedSnapshot {
    /// Encode inside the versioned envelope
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&Envelope {
            state: self,
            version: SNAPSHOT_VERSION,
        })?)
    }

    /// Decode a stored value, merging it over the defaults field by field
    pub fn recover(raw: &str) -> SnapshotRecovery {
        let mut snapshot = Self::default();
        let mut failures = Vec::new();

        let root: Value = match serde_json::from_str(raw) {
            Ok(root) => root,
            Err(e) => {
                failures.push(CubeError::SnapshotLoadFailure(Box::new(e)));
                return SnapshotRecovery { snapshot, failures };
            }
        };

        match root.get("version").and_then(Value::as_u64) {
            Some(SNAPSHOT_VERSION) => {}
            Some(other) => failures.push(failure(format!(
                "snapshot version {other} differs from {SNAPSHOT_VERSION}, recovering fields individually"
            ))),
            None => failures.push(failure("snapshot version missing")),
        }

        let Some(state) = root.get("state").and_then(Value::as_object) else {
            failures.push(failure("snapshot has no state object"));
            return SnapshotRecovery { snapshot, failures };
        };

        match state.get("caseColor") {
            Some(Value::String(hex)) => match HardwareConfig::new(hex, snapshot.case_material) {
                Ok(hardware) => snapshot.case_color = hardware.case_color,
                Err(e) => failures.push(failure(format!("caseColor: {e}"))),
            },
            other => failures.push(failure(format!("caseColor: unusable value {other:?}"))),
        }

        match field::<CaseMaterial>(state.get("caseMaterial")) {
            Ok(material) => snapshot.case_material = material,
            Err(e) => failures.push(failure(format!("caseMaterial: {e}"))),
        }

        match field::<Mode>(state.get("currentMode")) {
            Ok(mode) => snapshot.current_mode = mode,
            Err(e) => failures.push(failure(format!("currentMode: {e}"))),
        }

        match state.get("customModeName") {
            Some(Value::String(name)) => {
                let (name, truncated) = truncate_custom_mode_name(name);
                if truncated {
                    failures.push(failure("customModeName: truncated to the length limit"));
                }
                snapshot.custom_mode_name = name;
            }
            other => failures.push(failure(format!("customModeName: unusable value {other:?}"))),
        }

        match state.get("modes").and_then(Value::as_object) {
            Some(modes) => {
                for mode in Mode::ALL {
                    // An absent row simply keeps its defaults
                    let Some(row) = modes.get(mode.as_str()) else {
                        continue;
                    };
                    let recovered = serde_json::from_value::<SettingsPatch>(row.clone())
                        .map_err(|e| e.to_string())
                        .and_then(|patch| {
                            registry::defaults_for(mode)
                                .merged(&patch)
                                .map_err(|e| e.to_string())
                        });
                    match recovered {
                        Ok((settings, clamped)) => {
                            for range in clamped {
                                failures.push(failure(format!("modes.{mode}: {range}")));
                            }
                            *snapshot.modes.get_mut(mode) = settings;
                        }
                        Err(e) => failures.push(failure(format!("modes.{mode}: {e}"))),
                    }
                }
            }
            None => failures.push(failure("modes: missing or not an object")),
        }

        SnapshotRecovery { snapshot, failures }
    }
}

fn field<T: serde::de::DeserializeOwned>(value: Option<&Value>) -> serde_json::Result<T> {
    // Missing fields surface as a "null" type error
    serde_json::from_value(value.cloned().unwrap_or(Value::Null))
}
