//! Value types for light control parameters.

mod hsbk;
mod power;

pub use hsbk::{ColorOverrides, Hsbk};
pub use power::PowerState;
