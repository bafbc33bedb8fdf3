//! Four-channel color state.

use std::fmt;

use serde::Serialize;

/// Hue, saturation, brightness and kelvin, as the bulbs store them.
///
/// Hue, saturation and brightness use the full `u16` range (0-65535). Kelvin
/// is the white point, roughly 2500K (warm) to 9000K (cool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Hsbk {
    pub hue: u16,
    pub saturation: u16,
    pub brightness: u16,
    pub kelvin: u16,
}

impl Hsbk {
    pub const KELVIN_MIN: u16 = 2500;
    pub const KELVIN_MAX: u16 = 9000;

    pub fn new(hue: u16, saturation: u16, brightness: u16, kelvin: u16) -> Self {
        Hsbk {
            hue,
            saturation,
            brightness,
            kelvin,
        }
    }
}

impl From<(u16, u16, u16, u16)> for Hsbk {
    fn from((hue, saturation, brightness, kelvin): (u16, u16, u16, u16)) -> Self {
        Hsbk::new(hue, saturation, brightness, kelvin)
    }
}

impl fmt::Display for Hsbk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HSBK({},{},{},{})",
            self.hue, self.saturation, self.brightness, self.kelvin
        )
    }
}

/// Per-channel overrides for a partial color change.
///
/// Channels left as `None` keep the light's current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorOverrides {
    pub hue: Option<u16>,
    pub saturation: Option<u16>,
    pub brightness: Option<u16>,
    pub kelvin: Option<u16>,
}

impl ColorOverrides {
    /// True when no channel is overridden.
    pub fn is_empty(&self) -> bool {
        self.hue.is_none()
            && self.saturation.is_none()
            && self.brightness.is_none()
            && self.kelvin.is_none()
    }

    /// Merge the overrides over `current`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifx_lights_rs::{ColorOverrides, Hsbk};
    ///
    /// let overrides = ColorOverrides { brightness: Some(32768), ..Default::default() };
    /// let merged = overrides.apply(Hsbk::new(30000, 40000, 50000, 3500));
    /// assert_eq!(merged, Hsbk::new(30000, 40000, 32768, 3500));
    /// ```
    pub fn apply(&self, current: Hsbk) -> Hsbk {
        Hsbk {
            hue: self.hue.unwrap_or(current.hue),
            saturation: self.saturation.unwrap_or(current.saturation),
            brightness: self.brightness.unwrap_or(current.brightness),
            kelvin: self.kelvin.unwrap_or(current.kelvin),
        }
    }

    /// `name=value` pairs for the overridden channels, in channel order.
    pub fn changes(&self) -> Vec<String> {
        [
            ("hue", self.hue),
            ("saturation", self.saturation),
            ("brightness", self.brightness),
            ("kelvin", self.kelvin),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| format!("{name}={v}")))
        .collect()
    }
}
