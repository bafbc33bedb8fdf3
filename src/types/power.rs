//! Power state of a light.

use serde::Serialize;
use strum_macros::Display;

/// Power state as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display)]
pub enum PowerState {
    On,
    Off,
    #[default]
    Unknown,
}

impl PowerState {
    /// Level sent to a light to switch it on or off.
    pub fn level(on: bool) -> u16 {
        if on { u16::MAX } else { 0 }
    }
}

impl From<u16> for PowerState {
    fn from(level: u16) -> Self {
        if level > 0 {
            PowerState::On
        } else {
            PowerState::Off
        }
    }
}
