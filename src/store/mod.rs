//! Configurator state store module
//!
//! # Overview
//!
//! `ConfigStore` is the single owner of the configurator state:
//! - **Mode state**: active mode, custom mode name and the per-mode settings table
//! - **Hardware config**: case colour and material, independent of modes
//! - **Interaction flags**: highlighted part, exploded view, ghost mode
//! - **Connection state**: pairing status and popup visibility, written only
//!   by the [`ConnectionController`](crate::connection::ConnectionController)
//!
//! # Persistence
//!
//! Commands touching case colour, material, modes, custom mode name or the
//! active mode write the whole [`PersistedSnapshot`](crate::config::PersistedSnapshot)
//! after the in-memory change. Interaction and connection state are never
//! persisted.
//!
//! # Event Flow
//!
//! ```text
//! UI / renderer → command → ConfigStore → SnapshotStore
//!                                ↓
//!                           StoreEvent → observers
//! ```
//!
//! # Example
//!
//! ```
//! use smartcube::config::{CaseMaterial, Mode, SettingsPatch};
//! use smartcube::store::ConfigStore;
//!
//! let mut store = ConfigStore::in_memory();
//! store.update_mode_settings(&SettingsPatch::brightness(40.0)).unwrap();
//! assert!((store.effective_brightness_intensity() - 1.6).abs() < 1e-12);
//!
//! store.set_case_config("#CC0033", CaseMaterial::Metal).unwrap();
//! store.set_mode(Mode::Party);
//! assert_eq!(store.effective_led_color(), "#d900ff");
//! ```

pub mod config_store;

pub use config_store::{ConfigStore, SharedStore, StoreEvent};
