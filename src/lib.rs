//! # lifx_lights_rs
//!
//! Discover and control individual LIFX smart bulbs over the LIFX LAN
//! protocol.
//!
//! The crate backs the `lifx` command-line tool, but the pieces are usable
//! on their own: a small wire codec in [`protocol`], broadcast discovery with
//! [`discover_lights`], per-device requests through [`Light`], and a
//! [`LightController`] that caches one discovery pass and resolves
//! user-supplied selectors (MAC, IP or label) to devices.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use lifx_lights_rs::{ColorOverrides, Config, LanDiscovery, LightController, Selector};
//!
//! async fn dim_desk() -> Result<(), lifx_lights_rs::Error> {
//!     let mut controller = LightController::new(LanDiscovery::new(Config::default()));
//!     let light = controller.require_light(&Selector::by_label("Desk")).await?;
//!
//!     // Halve the brightness, keep hue, saturation and kelvin
//!     let overrides = ColorOverrides { brightness: Some(32768), ..Default::default() };
//!     controller
//!         .apply_overrides(&light, &overrides, Duration::from_millis(500))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Communication
//!
//! Devices are found by broadcasting on UDP port 56700 and must be on the
//! same local network. Every request waits for a reply or acknowledgement
//! and is retried with backoff; see [`Config`].

pub mod commands;
mod config;
mod controller;
mod discovery;
mod errors;
mod info;
mod light;
mod products;
pub mod protocol;
mod table;
#[cfg(test)]
mod testing;
mod types;

// Re-export public API
pub use config::Config;
pub use controller::{
    Device, Discover, LanDiscovery, LightController, MAX_LABEL_LEN, Selector, truncate_label,
};
pub use discovery::{DiscoveredLight, discover_lights};
pub use errors::Error;
pub use info::{LightInfo, UNKNOWN};
pub use light::Light;
pub use products::{VENDOR_LIFX, product_name};
pub use table::render as render_table;
pub use types::{ColorOverrides, Hsbk, PowerState};
