//! Configuration data models
//!
//! This module defines the data structures shared by the registry, the
//! store and the snapshot layer. Field names serialize in camelCase so the
//! persisted snapshot matches the product's existing storage format.

use crate::color;
use crate::config::registry;
use crate::error::{CubeError, OutOfRange, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of the custom mode display name, in characters
pub const CUSTOM_MODE_NAME_MAX_CHARS: usize = 12;

/// Inclusive bounds of `noiseThreshold` (dB)
pub const NOISE_THRESHOLD_BOUNDS: (f64, f64) = (30.0, 90.0);
/// Inclusive bounds of `lightThreshold` (lux, no upper limit)
pub const LIGHT_THRESHOLD_BOUNDS: (f64, f64) = (0.0, f64::INFINITY);
/// Inclusive bounds of `brightness` (percent)
pub const BRIGHTNESS_BOUNDS: (f64, f64) = (0.0, 100.0);
/// Inclusive bounds of `whiteNoiseVolume` (percent)
pub const WHITE_NOISE_VOLUME_BOUNDS: (f64, f64) = (0.0, 100.0);

/// Cut a custom mode name down to [`CUSTOM_MODE_NAME_MAX_CHARS`] characters
///
/// Returns the name and whether anything was removed.
pub fn truncate_custom_mode_name(name: &str) -> (String, bool) {
    match name.char_indices().nth(CUSTOM_MODE_NAME_MAX_CHARS) {
        Some((cut, _)) => (name[..cut].to_string(), true),
        None => (name.to_string(), false),
    }
}

/// Operating profile of the cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Focused work
    Study,
    /// Wind-down and sleep
    Sleep,
    /// Loud, colourful
    Party,
    /// User-named profile
    Custom,
}

impl Mode {
    /// Every mode, in display order
    pub const ALL: [Mode; 4] = [Mode::Study, Mode::Sleep, Mode::Party, Mode::Custom];

    /// Snapshot key of the mode
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Study => "study",
            Mode::Sleep => "sleep",
            Mode::Party => "party",
            Mode::Custom => "custom",
        }
    }

    /// Built-in display label
    pub fn label(self) -> &'static str {
        match self {
            Mode::Study => "Study",
            Mode::Sleep => "Sleep",
            Mode::Party => "Party",
            Mode::Custom => "Custom",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CubeError::UnknownMode(s.to_string()))
    }
}

/// Surface finish of the case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMaterial {
    /// Soft-touch plastic
    #[default]
    Matte,
    /// Brushed metal
    Metal,
    /// Clear shell
    Transparent,
}

impl CaseMaterial {
    /// Every material, in display order
    pub const ALL: [CaseMaterial; 3] = [
        CaseMaterial::Matte,
        CaseMaterial::Metal,
        CaseMaterial::Transparent,
    ];

    /// Snapshot value of the material
    pub fn as_str(self) -> &'static str {
        match self {
            CaseMaterial::Matte => "matte",
            CaseMaterial::Metal => "metal",
            CaseMaterial::Transparent => "transparent",
        }
    }
}

impl fmt::Display for CaseMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseMaterial {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        CaseMaterial::ALL
            .into_iter()
            .find(|material| material.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CubeError::UnknownMaterial(s.to_string()))
    }
}

/// Settings bundled with one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSettings {
    /// Noise level (dB) that triggers noise cancellation, 30-90
    pub noise_threshold: f64,
    /// Ambient light target (lux), non-negative
    pub light_threshold: f64,
    /// LED brightness (percent), 0-100
    pub brightness: f64,
    /// White noise volume (percent), 0-100
    pub white_noise_volume: f64,
    /// LED colour as `#rrggbb`
    pub led_color: String,
}

impl ModeSettings {
    /// Emission intensity for the renderer: `brightness / 100 * 4`
    pub fn brightness_intensity(&self) -> f64 {
        self.brightness / 100.0 * 4.0
    }

    /// Merge `patch` into a copy of these settings
    ///
    /// Numeric values outside their bounds are clamped and reported. Fails
    /// without producing anything when a value is not finite or the colour is
    /// malformed.
    pub fn merged(&self, patch: &SettingsPatch) -> Result<(Self, Vec<OutOfRange>)> {
        let mut next = self.clone();
        let mut clamped = Vec::new();

        if let Some(value) = patch.noise_threshold {
            next.noise_threshold =
                bounded("noiseThreshold", value, NOISE_THRESHOLD_BOUNDS, &mut clamped)?;
        }
        if let Some(value) = patch.light_threshold {
            next.light_threshold =
                bounded("lightThreshold", value, LIGHT_THRESHOLD_BOUNDS, &mut clamped)?;
        }
        if let Some(value) = patch.brightness {
            next.brightness = bounded("brightness", value, BRIGHTNESS_BOUNDS, &mut clamped)?;
        }
        if let Some(value) = patch.white_noise_volume {
            next.white_noise_volume = bounded(
                "whiteNoiseVolume",
                value,
                WHITE_NOISE_VOLUME_BOUNDS,
                &mut clamped,
            )?;
        }
        if let Some(color) = &patch.led_color {
            next.led_color = color::normalize_hex(color)?;
        }

        Ok((next, clamped))
    }

    /// Check every field against its bounds without changing anything
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("noiseThreshold", self.noise_threshold, NOISE_THRESHOLD_BOUNDS),
            ("lightThreshold", self.light_threshold, LIGHT_THRESHOLD_BOUNDS),
            ("brightness", self.brightness, BRIGHTNESS_BOUNDS),
            (
                "whiteNoiseVolume",
                self.white_noise_volume,
                WHITE_NOISE_VOLUME_BOUNDS,
            ),
        ];
        for (field, value, (min, max)) in checks {
            if !value.is_finite() || value < min || value > max {
                return Err(CubeError::ValueOutOfRange(OutOfRange {
                    field,
                    requested: value,
                    applied: None,
                    min,
                    max,
                }));
            }
        }
        if !color::is_valid_hex(&self.led_color) {
            return Err(CubeError::InvalidColorFormat(self.led_color.clone()));
        }
        Ok(())
    }
}

fn bounded(
    field: &'static str,
    value: f64,
    (min, max): (f64, f64),
    clamped: &mut Vec<OutOfRange>,
) -> Result<f64> {
    if !value.is_finite() {
        return Err(CubeError::ValueOutOfRange(OutOfRange {
            field,
            requested: value,
            applied: None,
            min,
            max,
        }));
    }
    let applied = value.clamp(min, max);
    if value < min || value > max {
        clamped.push(OutOfRange {
            field,
            requested: value,
            applied: Some(applied),
            min,
            max,
        });
    }
    Ok(applied)
}

/// Partial settings update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    /// New noise threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_threshold: Option<f64>,
    /// New light threshold
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_threshold: Option<f64>,
    /// New brightness
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    /// New white noise volume
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_noise_volume: Option<f64>,
    /// New LED colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led_color: Option<String>,
}

impl SettingsPatch {
    /// Patch that only sets the brightness
    pub fn brightness(value: f64) -> Self {
        Self {
            brightness: Some(value),
            ..Self::default()
        }
    }

    /// Patch that only sets the LED colour
    pub fn led_color(hex: impl Into<String>) -> Self {
        Self {
            led_color: Some(hex.into()),
            ..Self::default()
        }
    }

    /// Whether the patch touches no field
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// One settings row per mode; the set of keys never changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModesTable {
    /// Study row
    pub study: ModeSettings,
    /// Sleep row
    pub sleep: ModeSettings,
    /// Party row
    pub party: ModeSettings,
    /// Custom row
    pub custom: ModeSettings,
}

impl ModesTable {
    /// Row for `mode`
    pub fn get(&self, mode: Mode) -> &ModeSettings {
        match mode {
            Mode::Study => &self.study,
            Mode::Sleep => &self.sleep,
            Mode::Party => &self.party,
            Mode::Custom => &self.custom,
        }
    }

    /// Mutable row for `mode`
    pub fn get_mut(&mut self, mode: Mode) -> &mut ModeSettings {
        match mode {
            Mode::Study => &mut self.study,
            Mode::Sleep => &mut self.sleep,
            Mode::Party => &mut self.party,
            Mode::Custom => &mut self.custom,
        }
    }

    /// Iterate rows in [`Mode::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Mode, &ModeSettings)> {
        Mode::ALL.into_iter().map(move |mode| (mode, self.get(mode)))
    }
}

impl Default for ModesTable {
    fn default() -> Self {
        Self {
            study: registry::defaults_for(Mode::Study),
            sleep: registry::defaults_for(Mode::Sleep),
            party: registry::defaults_for(Mode::Party),
            custom: registry::defaults_for(Mode::Custom),
        }
    }
}

/// Physically static case attributes, independent of the active mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareConfig {
    /// Case colour as `#` + hex digits
    pub case_color: String,
    /// Case finish
    pub case_material: CaseMaterial,
}

impl HardwareConfig {
    /// Build a hardware config, checking only that `case_color` is hex
    ///
    /// The colour keeps its original digits and gains a leading `#` if it
    /// had none. Catalog membership is not enforced.
    pub fn new(case_color: &str, case_material: CaseMaterial) -> Result<Self> {
        if !color::is_valid_hex(case_color) {
            return Err(CubeError::InvalidColorFormat(case_color.to_string()));
        }
        let digits = case_color.trim_start_matches('#');
        Ok(Self {
            case_color: format!("#{digits}"),
            case_material,
        })
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            case_color: registry::default_case_color().to_string(),
            case_material: CaseMaterial::default(),
        }
    }
}

/// Identifier of a physical part, as reported by the renderer
///
/// Any string is accepted; membership in the component manifest is the
/// renderer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(String);

impl PartId {
    /// Create a part identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PartId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PartId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 3D viewer interaction flags (session only)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// Part under the pointer or selected, if any
    pub highlighted_part: Option<PartId>,
    /// Layers pulled apart
    pub is_exploded: bool,
    /// Parts drawn translucent
    pub is_ghost_mode: bool,
}

/// Device pairing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Not paired
    #[default]
    Idle,
    /// Pairing attempt in flight
    Connecting,
    /// Paired
    Connected,
    /// Last attempt failed
    Failed,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionStatus::Idle => "idle",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Failed => "failed",
        })
    }
}

/// Pairing status plus the transient result popup (session only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionState {
    /// Current status
    pub status: ConnectionStatus,
    /// Whether the result popup is visible
    pub show_notification: bool,
}
