//! Built-in defaults and catalogs
//!
//! Static, immutable tables: the factory settings of each mode, the official
//! case colours and the component manifest shown by the part inspector.

use crate::config::models::{Mode, ModeSettings};

/// Official case colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductColor {
    /// Marketing name
    pub name: &'static str,
    /// `#RRGGBB`
    pub hex: &'static str,
}

/// Entry of the component manifest (bill of materials)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartInfo {
    /// Identifier the renderer reports on hover/click
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Whether the configurator offers a colour control for this part
    pub color_editable: bool,
}

const PRODUCT_COLORS: [ProductColor; 5] = [
    ProductColor {
        name: "Arctic White",
        hex: "#FFFFFF",
    },
    ProductColor {
        name: "Midnight Black",
        hex: "#111111",
    },
    ProductColor {
        name: "Electric Blue",
        hex: "#0066CC",
    },
    ProductColor {
        name: "Ruby Red",
        hex: "#CC0033",
    },
    ProductColor {
        name: "Forest Green",
        hex: "#106636",
    },
];

const COMPONENT_MANIFEST: [PartInfo; 7] = [
    PartInfo {
        id: "shell_top",
        name: "Top Shell",
        description: "Outer housing, top section. PC/ABS Blend.",
        color_editable: true,
    },
    PartInfo {
        id: "led_strip",
        name: "LED Strip",
        description: "WS2812B LEDs for lighting effects.",
        color_editable: true,
    },
    PartInfo {
        id: "pcb_main",
        name: "Main PCB",
        description: "ESP32 Core + Power Management.",
        color_editable: false,
    },
    PartInfo {
        id: "battery_pack",
        name: "Battery Pack",
        description: "1200mAh LiPo Cell.",
        color_editable: false,
    },
    PartInfo {
        id: "speaker_unit",
        name: "Speaker Unit",
        description: "3W 4Ω Full Range Driver.",
        color_editable: false,
    },
    PartInfo {
        id: "shell_bottom",
        name: "Bottom Shell",
        description: "Base housing with non-slip pad.",
        color_editable: true,
    },
    PartInfo {
        id: "sensors",
        name: "Sensors Array",
        description: "Mic Array (x2) + Ambient Light.",
        color_editable: false,
    },
];

/// Display name of the custom mode on first run
pub const DEFAULT_CUSTOM_MODE_NAME: &str = "My Mode";

/// Mode active on first run
pub const DEFAULT_MODE: Mode = Mode::Study;

/// Factory settings of `mode`
pub fn defaults_for(mode: Mode) -> ModeSettings {
    let (noise_threshold, light_threshold, brightness, white_noise_volume, led_color) = match mode
    {
        Mode::Study => (60.0, 400.0, 80.0, 20.0, "#00eaff"),
        Mode::Sleep => (30.0, 100.0, 20.0, 60.0, "#ff4d00"),
        Mode::Party => (90.0, 800.0, 100.0, 0.0, "#d900ff"),
        Mode::Custom => (50.0, 300.0, 50.0, 0.0, "#00ff00"),
    };

    ModeSettings {
        noise_threshold,
        light_threshold,
        brightness,
        white_noise_volume,
        led_color: led_color.to_string(),
    }
}

/// Official case colours, in display order
pub fn product_color_catalog() -> &'static [ProductColor] {
    &PRODUCT_COLORS
}

/// Case colour on first run (first catalog entry)
pub fn default_case_color() -> &'static str {
    PRODUCT_COLORS[0].hex
}

/// Catalog entry matching `hex`, ignoring case and the leading `#`
pub fn catalog_color(hex: &str) -> Option<&'static ProductColor> {
    let wanted = hex.trim_start_matches('#');
    PRODUCT_COLORS
        .iter()
        .find(|color| color.hex[1..].eq_ignore_ascii_case(wanted))
}

/// Whether `hex` is one of the official case colours
pub fn is_catalog_color(hex: &str) -> bool {
    catalog_color(hex).is_some()
}

/// Physical parts of the cube, top to bottom
pub fn component_manifest() -> &'static [PartInfo] {
    &COMPONENT_MANIFEST
}

/// Manifest entry with the given identifier
pub fn part_info(id: &str) -> Option<&'static PartInfo> {
    COMPONENT_MANIFEST.iter().find(|part| part.id == id)
}
