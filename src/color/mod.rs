//! Colour space conversion module
//!
//! Converts between hex RGB strings and HSL so the configurator can drive an
//! LED colour from a single hue slider.
//!
//! # Overview
//!
//! - `hex_to_hsl` parses `#rgb` / `#rrggbb` (the `#` is optional) into
//!   whole-unit HSL (`h` in degrees `[0, 360)`, `s` and `l` in percent)
//! - `hsl_to_hex` encodes HSL back into a lowercase 7-character `#rrggbb`
//! - `apply_hue` implements the single-axis hue edit: saturation and
//!   lightness are floored at 50 before re-encoding so hue edits stay vivid
//!   even when starting from a near-grey or near-black colour
//!
//! Malformed input fails with [`CubeError::InvalidColorFormat`](crate::error::CubeError).
//!
//! # Example
//!
//! ```
//! use smartcube::color::{apply_hue, hex_to_hsl};
//!
//! let hsl = hex_to_hsl("#00eaff").unwrap();
//! assert_eq!(hsl.h, 185.0);
//!
//! // Near-black input is lifted to 50% lightness before the hue is applied
//! assert_eq!(apply_hue(Some("#111111"), 120.0).unwrap(), "#40bf40");
//! ```

pub mod hsl;

pub use hsl::{
    HUE_EDIT_FLOOR, Hsl, Rgb, apply_hue, hex_to_hsl, hsl_to_hex, is_valid_hex, normalize_hex,
};
