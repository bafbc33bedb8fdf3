//! Display records for discovered lights.

use log::warn;
use serde::Serialize;

use crate::controller::Device;
use crate::types::{Hsbk, PowerState};

/// Placeholder for a field that could not be read.
pub const UNKNOWN: &str = "Unknown";

/// What `list` shows for one light.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightInfo {
    pub mac: String,
    pub ip: String,
    pub label: String,
    pub power: PowerState,
    pub color: Option<Hsbk>,
    pub product: String,
}

impl LightInfo {
    /// Reads every field from `light`, one request each. A failed read is
    /// logged and the field keeps its `Unknown` default.
    pub async fn collect<D: Device>(light: &D) -> Self {
        let mut info = LightInfo {
            mac: light.mac().to_string(),
            ip: light.ip().to_string(),
            label: UNKNOWN.to_string(),
            power: PowerState::Unknown,
            color: None,
            product: UNKNOWN.to_string(),
        };

        match light.get_label().await {
            Ok(label) => info.label = label,
            Err(e) => warn!("{}: could not read label: {}", info.mac, e),
        }

        match light.get_power().await {
            Ok(level) => info.power = PowerState::from(level),
            Err(e) => warn!("{}: could not read power: {}", info.mac, e),
        }

        match light.get_color().await {
            Ok(color) => info.color = Some(color),
            Err(e) => warn!("{}: could not read color: {}", info.mac, e),
        }

        match light.get_product_name().await {
            Ok(Some(product)) if !product.is_empty() => info.product = product,
            Ok(_) => {}
            Err(e) => warn!("{}: could not read product: {}", info.mac, e),
        }

        info
    }
}
