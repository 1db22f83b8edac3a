//! Configurator state container
//!
//! `ConfigStore` exclusively owns all mutable state. Every command applies
//! its change in memory, then writes the persisted subset if it touched it,
//! then notifies observers. Persistence failures are logged and swallowed so
//! the session keeps working with in-memory state.

use crate::color;
use crate::config::models::{
    CaseMaterial, ConnectionState, HardwareConfig, InteractionState, Mode, ModeSettings,
    ModesTable, PartId, SettingsPatch, truncate_custom_mode_name,
};
use crate::config::registry;
use crate::config::snapshot::{PersistedSnapshot, STORAGE_KEY};
use crate::config::{MemorySnapshotStore, SnapshotStore};
use crate::error::{CubeError, OutOfRange, Result};
use parking_lot::Mutex;
use std::sync::{Arc, mpsc};
use tracing::{debug, info, warn};

/// Store shared between the UI thread and timer callbacks
///
/// All mutations go through the mutex, which keeps every command atomic on
/// multi-threaded hosts.
pub type SharedStore = Arc<Mutex<ConfigStore>>;

/// Change notification sent to observers after a command completes
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Active mode switched
    ModeChanged(Mode),
    /// Custom mode renamed
    CustomModeNameChanged(String),
    /// Settings row of the mode changed
    ModeSettingsChanged(Mode),
    /// Settings row of the mode restored to factory values
    ModeReset(Mode),
    /// Case colour or material changed
    CaseConfigChanged(HardwareConfig),
    /// Part highlight moved or cleared
    HighlightChanged(Option<PartId>),
    /// Exploded view toggled to the given value
    ExplodedToggled(bool),
    /// Ghost mode toggled to the given value
    GhostModeToggled(bool),
    /// Pairing status or popup visibility changed
    ConnectionChanged(ConnectionState),
}

/// Mutable configurator state
pub struct ConfigStore {
    hardware: HardwareConfig,
    current_mode: Mode,
    custom_mode_name: String,
    modes: ModesTable,
    interaction: InteractionState,
    connection: ConnectionState,
    storage: Arc<dyn SnapshotStore>,
    observers: Vec<mpsc::Sender<StoreEvent>>,
}

impl ConfigStore {
    /// Create a store, restoring the persisted snapshot from `storage`
    ///
    /// Never fails: a missing, unreadable or corrupt snapshot falls back to
    /// defaults field by field and the problems are logged.
    pub fn load(storage: Arc<dyn SnapshotStore>) -> Self {
        let snapshot = match storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => {
                let recovery = PersistedSnapshot::recover(&raw);
                for failure in &recovery.failures {
                    warn!("Snapshot recovery: {failure}");
                }
                if recovery.is_clean() {
                    info!("Snapshot restored");
                }
                recovery.snapshot
            }
            Ok(None) => {
                info!("No snapshot found, starting with defaults");
                PersistedSnapshot::default()
            }
            Err(e) => {
                let failure = CubeError::SnapshotLoadFailure(Box::new(e));
                warn!("{failure}; starting with defaults");
                PersistedSnapshot::default()
            }
        };

        Self::from_snapshot(snapshot, storage)
    }

    /// Create a store with default state and throwaway in-memory storage
    pub fn in_memory() -> Self {
        Self::from_snapshot(
            PersistedSnapshot::default(),
            Arc::new(MemorySnapshotStore::new()),
        )
    }

    fn from_snapshot(snapshot: PersistedSnapshot, storage: Arc<dyn SnapshotStore>) -> Self {
        Self {
            hardware: HardwareConfig {
                case_color: snapshot.case_color,
                case_material: snapshot.case_material,
            },
            current_mode: snapshot.current_mode,
            custom_mode_name: snapshot.custom_mode_name,
            modes: snapshot.modes,
            interaction: InteractionState::default(),
            connection: ConnectionState::default(),
            storage,
            observers: Vec::new(),
        }
    }

    /// Wrap the store for sharing with a [`ConnectionController`](crate::connection::ConnectionController)
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    /// Receive a [`StoreEvent`] after every state change
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> mpsc::Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.observers.push(tx);
        rx
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Switch the active mode; the settings table is left alone
    pub fn set_mode(&mut self, mode: Mode) {
        info!("Switching mode {} -> {}", self.current_mode, mode);
        self.current_mode = mode;
        self.persist();
        self.notify(StoreEvent::ModeChanged(mode));
    }

    /// Switch the active mode by snapshot name (e.g. `"party"`)
    pub fn set_mode_by_name(&mut self, name: &str) -> Result<()> {
        let mode = name.parse::<Mode>()?;
        self.set_mode(mode);
        Ok(())
    }

    /// Rename the custom mode
    ///
    /// Names longer than [`CUSTOM_MODE_NAME_MAX_CHARS`](crate::config::models::CUSTOM_MODE_NAME_MAX_CHARS)
    /// characters are truncated.
    pub fn set_custom_mode_name(&mut self, name: &str) {
        let (name, truncated) = truncate_custom_mode_name(name);
        if truncated {
            warn!("Custom mode name truncated to {name:?}");
        }
        info!("Custom mode renamed to {name:?}");
        self.custom_mode_name.clone_from(&name);
        self.persist();
        self.notify(StoreEvent::CustomModeNameChanged(name));
    }

    /// Merge `patch` into the active mode's settings
    ///
    /// Out-of-range numbers are clamped and returned as warnings. A
    /// non-finite number or malformed colour rejects the whole patch and
    /// leaves the state untouched.
    pub fn update_mode_settings(&mut self, patch: &SettingsPatch) -> Result<Vec<OutOfRange>> {
        let mode = self.current_mode;
        let (next, clamped) = self.modes.get(mode).merged(patch)?;

        for range in &clamped {
            warn!("Mode {mode}: {range}");
        }
        debug!("Updating {mode} settings with {patch:?}");

        *self.modes.get_mut(mode) = next;
        self.persist();
        self.notify(StoreEvent::ModeSettingsChanged(mode));
        Ok(clamped)
    }

    /// Set the active mode's LED hue from the hue slider
    ///
    /// Returns the new colour. Saturation and lightness follow
    /// [`color::apply_hue`].
    pub fn set_led_hue(&mut self, hue: f64) -> Result<String> {
        let current = self.current_settings().led_color.clone();
        let next = color::apply_hue(Some(&current), hue)?;
        self.update_mode_settings(&SettingsPatch::led_color(next.clone()))?;
        Ok(next)
    }

    /// Restore the active mode's factory settings
    pub fn reset_current_mode(&mut self) {
        let mode = self.current_mode;
        info!("Resetting {mode} to defaults");
        *self.modes.get_mut(mode) = registry::defaults_for(mode);
        self.persist();
        self.notify(StoreEvent::ModeReset(mode));
    }

    /// Set case colour and material
    ///
    /// The colour must be hex; it does not have to be a catalog colour.
    pub fn set_case_config(&mut self, case_color: &str, case_material: CaseMaterial) -> Result<()> {
        let hardware = HardwareConfig::new(case_color, case_material)?;
        if !registry::is_catalog_color(&hardware.case_color) {
            debug!("Case colour {} is not a catalog colour", hardware.case_color);
        }
        info!(
            "Case set to {} / {}",
            hardware.case_color, hardware.case_material
        );
        self.hardware = hardware.clone();
        self.persist();
        self.notify(StoreEvent::CaseConfigChanged(hardware));
        Ok(())
    }

    /// Set case colour and material, parsing the material name
    pub fn set_case_config_by_name(&mut self, case_color: &str, case_material: &str) -> Result<()> {
        let material = case_material.parse::<CaseMaterial>()?;
        self.set_case_config(case_color, material)
    }

    /// Set the case hue from the hue slider, keeping the material
    ///
    /// Returns the new colour. Saturation and lightness follow
    /// [`color::apply_hue`].
    pub fn set_case_hue(&mut self, hue: f64) -> Result<String> {
        let next = color::apply_hue(Some(&self.hardware.case_color), hue)?;
        let material = self.hardware.case_material;
        self.set_case_config(&next, material)?;
        Ok(next)
    }

    /// Highlight a part, or clear the highlight with `None`
    ///
    /// Any identifier is accepted.
    pub fn set_highlighted_part(&mut self, part: Option<PartId>) {
        debug!("Highlighted part: {part:?}");
        self.interaction.highlighted_part.clone_from(&part);
        self.notify(StoreEvent::HighlightChanged(part));
    }

    /// Flip the exploded view; returns the new value
    pub fn toggle_exploded(&mut self) -> bool {
        self.interaction.is_exploded = !self.interaction.is_exploded;
        let value = self.interaction.is_exploded;
        debug!("Exploded view: {value}");
        self.notify(StoreEvent::ExplodedToggled(value));
        value
    }

    /// Flip ghost mode; returns the new value
    pub fn toggle_ghost_mode(&mut self) -> bool {
        self.interaction.is_ghost_mode = !self.interaction.is_ghost_mode;
        let value = self.interaction.is_ghost_mode;
        debug!("Ghost mode: {value}");
        self.notify(StoreEvent::GhostModeToggled(value));
        value
    }

    /// Publish a pairing transition; only the connection controller calls this
    pub(crate) fn apply_connection(&mut self, state: ConnectionState) {
        if self.connection == state {
            return;
        }
        debug!(
            "Connection {} (popup {}) -> {} (popup {})",
            self.connection.status,
            self.connection.show_notification,
            state.status,
            state.show_notification
        );
        self.connection = state;
        self.notify(StoreEvent::ConnectionChanged(state));
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Active mode
    pub fn current_mode(&self) -> Mode {
        self.current_mode
    }

    /// Display name of the custom mode
    pub fn custom_mode_name(&self) -> &str {
        &self.custom_mode_name
    }

    /// Label of the active mode; the custom mode shows its user-given name
    pub fn current_mode_label(&self) -> &str {
        match self.current_mode {
            Mode::Custom => &self.custom_mode_name,
            mode => mode.label(),
        }
    }

    /// Settings of every mode
    pub fn modes(&self) -> &ModesTable {
        &self.modes
    }

    /// Settings row of the active mode
    pub fn current_settings(&self) -> &ModeSettings {
        self.modes.get(self.current_mode)
    }

    /// LED colour the renderer should use
    pub fn effective_led_color(&self) -> &str {
        &self.current_settings().led_color
    }

    /// LED emission intensity the renderer should use (`brightness / 100 * 4`)
    pub fn effective_brightness_intensity(&self) -> f64 {
        self.current_settings().brightness_intensity()
    }

    /// Case colour and material
    pub fn hardware(&self) -> &HardwareConfig {
        &self.hardware
    }

    /// Case colour
    pub fn case_color(&self) -> &str {
        &self.hardware.case_color
    }

    /// Case material
    pub fn case_material(&self) -> CaseMaterial {
        self.hardware.case_material
    }

    /// Viewer interaction flags
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// Highlighted part, if any
    pub fn highlighted_part(&self) -> Option<&PartId> {
        self.interaction.highlighted_part.as_ref()
    }

    /// Whether the exploded view is on
    pub fn is_exploded(&self) -> bool {
        self.interaction.is_exploded
    }

    /// Whether ghost mode is on
    pub fn is_ghost_mode(&self) -> bool {
        self.interaction.is_ghost_mode
    }

    /// Pairing status and popup visibility
    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// The persisted subset of the current state
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            case_color: self.hardware.case_color.clone(),
            case_material: self.hardware.case_material,
            modes: self.modes.clone(),
            custom_mode_name: self.custom_mode_name.clone(),
            current_mode: self.current_mode,
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn persist(&self) {
        let result = self
            .snapshot()
            .to_json()
            .and_then(|json| self.storage.set(STORAGE_KEY, &json));

        if let Err(e) = result {
            warn!(
                "Failed to save snapshot: {}. Continuing with in-memory state. \
                 Changes will be lost on restart.",
                e
            );
        }
    }

    fn notify(&mut self, event: StoreEvent) {
        self.observers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
