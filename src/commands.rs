//! One handler per CLI command.
//!
//! Handlers write their user-facing output to `out` and report failures as
//! [`Error`]s; the binary decides how each error is printed and exits 1.

use std::io::Write;
use std::time::Duration;

use log::info;

use crate::controller::{Device, Discover, LightController, Selector};
use crate::errors::Error;
use crate::table;
use crate::types::ColorOverrides;

type Result<T> = std::result::Result<T, Error>;

/// Fallback name when a light's label cannot be read.
const FALLBACK_NAME: &str = "Light";

/// Lists every light as a table, or as a JSON array when `json` is set.
pub async fn list<D: Discover, W: Write>(
    controller: &mut LightController<D>,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let lights = controller.list_lights().await?;
    if lights.is_empty() {
        return Err(Error::NoLightsFound);
    }

    if json {
        serde_json::to_writer_pretty(&mut *out, &lights).map_err(Error::JsonDump)?;
        writeln!(out).map_err(Error::Output)?;
    } else {
        write!(out, "{}", table::render(&lights)).map_err(Error::Output)?;
    }
    Ok(())
}

/// Turns the selected light on or off.
pub async fn power<D: Discover, W: Write>(
    controller: &mut LightController<D>,
    selector: &Selector,
    on: bool,
    duration: Duration,
    out: &mut W,
) -> Result<()> {
    let light = controller.require_light(selector).await?;
    controller.set_power(&light, on, duration).await?;

    let name = light
        .get_label()
        .await
        .unwrap_or_else(|_| FALLBACK_NAME.to_string());
    let state = if on { "on" } else { "off" };
    writeln!(out, "{name} turned {state}").map_err(Error::Output)
}

/// Changes the given color channels of the selected light, keeping the rest.
///
/// Fails with [`Error::NoProperty`] before any discovery when no channel is
/// given. Device failures while reading or writing the color are wrapped in
/// [`Error::SetColor`].
pub async fn set<D: Discover>(
    controller: &mut LightController<D>,
    selector: &Selector,
    overrides: &ColorOverrides,
    duration: Duration,
) -> Result<()> {
    if overrides.is_empty() {
        return Err(Error::NoProperty);
    }
    let light = controller.require_light(selector).await?;
    let color = controller
        .apply_overrides(&light, overrides, duration)
        .await
        .map_err(|e| Error::SetColor(Box::new(e)))?;
    info!(
        "{}: {} -> {}",
        light.mac(),
        overrides.changes().join(", "),
        color
    );
    Ok(())
}

/// Renames the selected light.
pub async fn rename<D: Discover, W: Write>(
    controller: &mut LightController<D>,
    selector: &Selector,
    name: &str,
    out: &mut W,
) -> Result<()> {
    let light = controller.require_light(selector).await?;
    let old = light.get_label().await?;
    controller.set_label(&light, name).await?;
    writeln!(out, "Light renamed from '{old}' to '{name}'").map_err(Error::Output)
}
