//! Configuration management module
//!
//! Data models, built-in defaults and the persisted snapshot. The snapshot
//! is stored under a fixed key through a [`SnapshotStore`]; by default
//! `%APPDATA%\SmartFocusCube\smart-focus-cube-storage-v2.json` with atomic
//! writes to prevent corruption.

pub mod manager;
pub mod models;
pub mod registry;
pub mod snapshot;

pub use manager::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use models::{
    CaseMaterial, ConnectionState, ConnectionStatus, HardwareConfig, InteractionState, Mode,
    ModeSettings, ModesTable, PartId, SettingsPatch,
};
pub use registry::{PartInfo, ProductColor};
pub use snapshot::{PersistedSnapshot, STORAGE_KEY, SnapshotRecovery};
