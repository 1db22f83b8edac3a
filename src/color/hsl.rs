//! Hex RGB <-> HSL conversion
//!
//! HSL values are expressed the way the hue slider presents them: whole
//! degrees for hue and whole percent for saturation and lightness.

use crate::error::{CubeError, Result};
use std::fmt;

/// Saturation and lightness floor applied by [`apply_hue`]
pub const HUE_EDIT_FLOOR: f64 = 50.0;

/// Base colour used by [`apply_hue`] when there is no current colour
const HUE_EDIT_BASE: Hsl = Hsl {
    h: 0.0,
    s: 100.0,
    l: 50.0,
};

/// An 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Parse a 3- or 6-digit hex colour, with or without a leading `#`
    ///
    /// Shorthand is expanded by duplicating each digit (`#0ef` -> `#00eeff`).
    pub fn parse(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        // from_str_radix tolerates a leading '+', so check the alphabet first
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CubeError::InvalidColorFormat(hex.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| CubeError::InvalidColorFormat(hex.to_string()))
        };

        match digits.len() {
            3 => {
                let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
                Ok(Self {
                    r: channel(&expanded[0..2])?,
                    g: channel(&expanded[2..4])?,
                    b: channel(&expanded[4..6])?,
                })
            }
            6 => Ok(Self {
                r: channel(&digits[0..2])?,
                g: channel(&digits[2..4])?,
                b: channel(&digits[4..6])?,
            }),
            _ => Err(CubeError::InvalidColorFormat(hex.to_string())),
        }
    }

    /// Encode as lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to whole-unit HSL
    pub fn to_hsl(self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        // Achromatic: hue and saturation are undefined, report them as zero
        if self.r == self.g && self.g == self.b {
            return Hsl {
                h: 0.0,
                s: 0.0,
                l: (l * 100.0).round(),
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let sector = if self.r >= self.g && self.r >= self.b {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if self.g >= self.b {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: wrap_hue((sector / 6.0 * 360.0).round()),
            s: (s * 100.0).round(),
            l: (l * 100.0).round(),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hue (degrees), saturation (percent), lightness (percent)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in `[0, 360)`
    pub h: f64,
    /// Saturation in `[0, 100]`
    pub s: f64,
    /// Lightness in `[0, 100]`
    pub l: f64,
}

impl Hsl {
    /// Encode as lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        self.to_rgb().to_hex()
    }

    /// Convert to 8-bit RGB, rounding each channel to the nearest integer
    ///
    /// Saturation and lightness are clamped to `[0, 100]`; any hue is
    /// accepted and wrapped onto the colour wheel. Non-finite components are
    /// treated as zero.
    pub fn to_rgb(self) -> Rgb {
        let h = finite_or_zero(self.h);
        let s = finite_or_zero(self.s).clamp(0.0, 100.0);
        let l = finite_or_zero(self.l).clamp(0.0, 100.0) / 100.0;

        let a = s * l.min(1.0 - l) / 100.0;
        let channel = |n: f64| {
            let k = (n + h / 30.0).rem_euclid(12.0);
            let color = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
            #[expect(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                reason = "value is clamped to [0, 255] before the cast"
            )]
            let byte = (255.0 * color).round().clamp(0.0, 255.0) as u8;
            byte
        };

        Rgb {
            r: channel(0.0),
            g: channel(8.0),
            b: channel(4.0),
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn wrap_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Parse a hex colour into whole-unit HSL
pub fn hex_to_hsl(hex: &str) -> Result<Hsl> {
    Rgb::parse(hex).map(Rgb::to_hsl)
}

/// Encode HSL as a lowercase 7-character `#rrggbb` string
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    Hsl { h, s, l }.to_hex()
}

/// Whether `hex` is a 3- or 6-digit hex colour (`#` optional)
pub fn is_valid_hex(hex: &str) -> bool {
    Rgb::parse(hex).is_ok()
}

/// Normalize a hex colour to lowercase `#rrggbb`
pub fn normalize_hex(hex: &str) -> Result<String> {
    Rgb::parse(hex).map(Rgb::to_hex)
}

/// Replace the hue of `current`, keeping it vivid
///
/// Saturation and lightness of the current colour are each floored at
/// [`HUE_EDIT_FLOOR`]. Without a current colour the edit starts from fully
/// saturated mid lightness. `hue` is taken in the slider's `[0, 360]` range
/// and wrapped.
pub fn apply_hue(current: Option<&str>, hue: f64) -> Result<String> {
    let base = match current {
        Some(hex) => hex_to_hsl(hex)?,
        None => HUE_EDIT_BASE,
    };

    Ok(hsl_to_hex(
        wrap_hue(finite_or_zero(hue)),
        base.s.max(HUE_EDIT_FLOOR),
        base.l.max(HUE_EDIT_FLOOR),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit() {
        let rgb = Rgb::parse("#CC0033").unwrap();
        assert_eq!(rgb, Rgb { r: 0xcc, g: 0x00, b: 0x33 });
    }

    #[test]
    fn test_parse_shorthand_without_hash() {
        assert_eq!(Rgb::parse("0ef").unwrap().to_hex(), "#00eeff");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for input in ["", "#", "#12345", "#1234567", "#ggg000", "+12345", "#12 456", "#ééé"] {
            let result = Rgb::parse(input);
            assert!(
                matches!(result, Err(CubeError::InvalidColorFormat(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_hex_to_hsl_primaries() {
        assert_eq!(
            hex_to_hsl("#ff0000").unwrap(),
            Hsl { h: 0.0, s: 100.0, l: 50.0 }
        );
        assert_eq!(
            hex_to_hsl("#00ff00").unwrap(),
            Hsl { h: 120.0, s: 100.0, l: 50.0 }
        );
        assert_eq!(
            hex_to_hsl("#0000ff").unwrap(),
            Hsl { h: 240.0, s: 100.0, l: 50.0 }
        );
    }

    #[test]
    fn test_hex_to_hsl_achromatic() {
        let hsl = hex_to_hsl("#808080").unwrap();
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
        assert_eq!(hsl.l, 50.0);

        assert_eq!(hex_to_hsl("#fff").unwrap().l, 100.0);
        assert_eq!(hex_to_hsl("#000000").unwrap().l, 0.0);
    }

    #[test]
    fn test_hex_to_hsl_hue_never_reaches_360() {
        // Hue 359.76 rounds to 360, which must wrap to 0
        let hsl = hex_to_hsl("#ff0001").unwrap();
        assert_eq!(hsl.h, 0.0);
    }

    #[test]
    fn test_hsl_to_hex_is_always_seven_chars() {
        assert_eq!(hsl_to_hex(0.0, 0.0, 0.0), "#000000");
        assert_eq!(hsl_to_hex(0.0, 0.0, 100.0), "#ffffff");
        assert_eq!(hsl_to_hex(240.0, 100.0, 50.0), "#0000ff");
        assert_eq!(hsl_to_hex(360.0, 100.0, 50.0), "#ff0000");
    }

    #[test]
    fn test_hsl_to_hex_clamps_out_of_range_components() {
        assert_eq!(hsl_to_hex(120.0, 250.0, 50.0), hsl_to_hex(120.0, 100.0, 50.0));
        assert_eq!(hsl_to_hex(120.0, 100.0, -20.0), "#000000");
        assert_eq!(hsl_to_hex(-120.0, 100.0, 50.0), hsl_to_hex(240.0, 100.0, 50.0));
    }

    #[test]
    fn test_apply_hue_floors_saturation_and_lightness() {
        // Near-black starting colour is lifted to s=50, l=50
        assert_eq!(apply_hue(Some("#111111"), 120.0).unwrap(), "#40bf40");
        // Already vivid colour keeps its own saturation and lightness
        let vivid = apply_hue(Some("#00eaff"), 0.0).unwrap();
        assert_eq!(vivid, "#ff0000");
    }

    #[test]
    fn test_apply_hue_without_current_color() {
        assert_eq!(apply_hue(None, 240.0).unwrap(), "#0000ff");
    }

    #[test]
    fn test_apply_hue_wraps_slider_maximum() {
        assert_eq!(
            apply_hue(Some("#00ff00"), 360.0).unwrap(),
            apply_hue(Some("#00ff00"), 0.0).unwrap()
        );
    }

    #[test]
    fn test_apply_hue_rejects_malformed_current() {
        assert!(matches!(
            apply_hue(Some("cyan"), 10.0),
            Err(CubeError::InvalidColorFormat(_))
        ));
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex("ABC").unwrap(), "#aabbcc");
        assert_eq!(normalize_hex("#00EAFF").unwrap(), "#00eaff");
        assert!(!is_valid_hex("#00EAF"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Largest per-channel drift after rounding HSL to whole units
        const HEX_ROUND_TRIP_DRIFT: i16 = 5;

        fn hue_distance(a: f64, b: f64) -> f64 {
            let d = (a - b).abs() % 360.0;
            d.min(360.0 - d)
        }

        proptest! {
            /// Property: hex -> HSL -> hex only drifts by rounding error per channel
            #[test]
            fn hex_round_trip_within_rounding(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
                let original = Rgb { r, g, b };
                let back = Rgb::parse(&original.to_hsl().to_hex()).unwrap();
                prop_assert!((i16::from(back.r) - i16::from(r)).abs() <= HEX_ROUND_TRIP_DRIFT);
                prop_assert!((i16::from(back.g) - i16::from(g)).abs() <= HEX_ROUND_TRIP_DRIFT);
                prop_assert!((i16::from(back.b) - i16::from(b)).abs() <= HEX_ROUND_TRIP_DRIFT);
            }

            /// Property: HSL -> hex -> HSL recovers the slider values for vivid colours
            #[test]
            fn hsl_round_trip_for_vivid_colors(h in 0u16..360, s in 50u8..=100, l in 35u8..=65) {
                let (h, s, l) = (f64::from(h), f64::from(s), f64::from(l));
                let back = hex_to_hsl(&hsl_to_hex(h, s, l)).unwrap();
                prop_assert!(hue_distance(back.h, h) <= 1.0, "hue {} -> {}", h, back.h);
                prop_assert!((back.s - s).abs() <= 1.0, "saturation {} -> {}", s, back.s);
                prop_assert!((back.l - l).abs() <= 1.0, "lightness {} -> {}", l, back.l);
            }

            /// Property: hue output stays inside [0, 360)
            #[test]
            fn hue_is_always_in_range(hex in "#[0-9a-fA-F]{6}") {
                let hsl = hex_to_hsl(&hex).unwrap();
                prop_assert!((0.0..360.0).contains(&hsl.h));
                prop_assert!((0.0..=100.0).contains(&hsl.s));
                prop_assert!((0.0..=100.0).contains(&hsl.l));
            }

            /// Property: hue edits never produce a colour darker than the floor
            #[test]
            fn hue_edit_keeps_lightness_floor(hex in "#[0-9a-f]{6}", hue in 0u16..=360) {
                let edited = apply_hue(Some(&hex), f64::from(hue)).unwrap();
                let hsl = hex_to_hsl(&edited).unwrap();
                prop_assert!(hsl.l >= HUE_EDIT_FLOOR - 1.0);
            }
        }
    }
}
