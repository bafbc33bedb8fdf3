//! Single-bulb controller on top of one discovery pass.

use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::config::Config;
use crate::discovery::discover_lights;
use crate::errors::Error;
use crate::info::LightInfo;
use crate::light::Light;
use crate::types::{ColorOverrides, Hsbk};

type Result<T> = std::result::Result<T, Error>;

/// Longest label a device stores, in characters.
pub const MAX_LABEL_LEN: usize = 32;

/// Operations the controller needs from a discovered device.
///
/// Every getter and setter is a network round trip and may fail.
pub trait Device: Clone {
    /// Hardware address, lowercase and colon separated.
    fn mac(&self) -> &str;

    fn ip(&self) -> IpAddr;

    fn get_label(&self) -> impl Future<Output = Result<String>>;

    /// Power level, 0 (off) to 65535.
    fn get_power(&self) -> impl Future<Output = Result<u16>>;

    fn get_color(&self) -> impl Future<Output = Result<Hsbk>>;

    fn get_product_name(&self) -> impl Future<Output = Result<Option<String>>>;

    fn set_power(&self, on: bool, duration: Duration) -> impl Future<Output = Result<()>>;

    fn set_color(&self, color: Hsbk, duration: Duration) -> impl Future<Output = Result<()>>;

    fn set_label(&self, label: &str) -> impl Future<Output = Result<()>>;
}

/// Source of devices for one controller run.
pub trait Discover {
    type Device: Device;

    fn discover(&self) -> impl Future<Output = Result<Vec<Self::Device>>>;
}

impl Device for Light {
    fn mac(&self) -> &str {
        Light::mac(self)
    }

    fn ip(&self) -> IpAddr {
        Light::ip(self)
    }

    async fn get_label(&self) -> Result<String> {
        Light::get_label(self).await
    }

    async fn get_power(&self) -> Result<u16> {
        Light::get_power(self).await
    }

    async fn get_color(&self) -> Result<Hsbk> {
        Light::get_color(self).await
    }

    async fn get_product_name(&self) -> Result<Option<String>> {
        Ok(Light::get_product_name(self).await?.map(String::from))
    }

    async fn set_power(&self, on: bool, duration: Duration) -> Result<()> {
        Light::set_power(self, on, duration).await
    }

    async fn set_color(&self, color: Hsbk, duration: Duration) -> Result<()> {
        Light::set_color(self, color, duration).await
    }

    async fn set_label(&self, label: &str) -> Result<()> {
        Light::set_label(self, label).await
    }
}

/// Broadcast discovery on the local network.
#[derive(Debug, Clone)]
pub struct LanDiscovery {
    config: Arc<Config>,
    source: u32,
}

impl LanDiscovery {
    pub fn new(config: Config) -> Self {
        LanDiscovery {
            config: Arc::new(config),
            source: Light::new_source(),
        }
    }
}

impl Discover for LanDiscovery {
    type Device = Light;

    async fn discover(&self) -> Result<Vec<Light>> {
        let found = discover_lights(&self.config, self.source).await?;
        Ok(found
            .into_iter()
            .map(|d| d.into_light(self.source, Arc::clone(&self.config)))
            .collect())
    }
}

/// Identifies one device among those discovered.
///
/// Kinds are tried in order: hardware address, network address, label. A
/// kind that is set but matches nothing falls through to the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub mac: Option<String>,
    pub ip: Option<String>,
    pub label: Option<String>,
}

impl Selector {
    pub fn by_mac(mac: &str) -> Self {
        Selector {
            mac: Some(mac.to_string()),
            ..Default::default()
        }
    }

    pub fn by_ip(ip: &str) -> Self {
        Selector {
            ip: Some(ip.to_string()),
            ..Default::default()
        }
    }

    pub fn by_label(label: &str) -> Self {
        Selector {
            label: Some(label.to_string()),
            ..Default::default()
        }
    }
}

/// Cuts `name` to the first [`MAX_LABEL_LEN`] characters.
pub fn truncate_label(name: &str) -> String {
    name.chars().take(MAX_LABEL_LEN).collect()
}

/// Thin wrapper over a discovery source that caches its result for the run.
pub struct LightController<D: Discover> {
    discovery: D,
    lights: Option<Vec<D::Device>>,
}

impl<D: Discover> LightController<D> {
    pub fn new(discovery: D) -> Self {
        LightController {
            discovery,
            lights: None,
        }
    }

    /// All lights, discovering on first use.
    pub async fn lights(&mut self) -> Result<&[D::Device]> {
        if self.lights.is_none() {
            let found = self.discovery.discover().await?;
            debug!("discovered {} light(s)", found.len());
            self.lights = Some(found);
        }
        Ok(self.lights.as_deref().unwrap_or(&[]))
    }

    /// Reads the display record of every light.
    ///
    /// A field that cannot be read is left as `Unknown` instead of failing
    /// the whole listing.
    pub async fn list_lights(&mut self) -> Result<Vec<LightInfo>> {
        let lights = self.lights().await?;
        let mut infos = Vec::with_capacity(lights.len());
        for light in lights {
            infos.push(LightInfo::collect(light).await);
        }
        Ok(infos)
    }

    /// Finds the light matching `selector`, or `None`.
    pub async fn find_light(&mut self, selector: &Selector) -> Result<Option<D::Device>> {
        let lights = self.lights().await?;

        if let Some(mac) = &selector.mac
            && let Some(light) = lights.iter().find(|l| l.mac().eq_ignore_ascii_case(mac))
        {
            return Ok(Some(light.clone()));
        }

        if let Some(ip) = &selector.ip
            && let Some(light) = lights.iter().find(|l| l.ip().to_string() == *ip)
        {
            return Ok(Some(light.clone()));
        }

        if let Some(label) = &selector.label {
            let wanted = label.to_lowercase();
            for light in lights {
                match light.get_label().await {
                    Ok(current) if current.to_lowercase() == wanted => {
                        return Ok(Some(light.clone()));
                    }
                    Ok(_) => {}
                    Err(e) => warn!("{}: could not read label: {}", light.mac(), e),
                }
            }
        }

        Ok(None)
    }

    /// Like [`find_light`](Self::find_light) but a miss is [`Error::LightNotFound`].
    pub async fn require_light(&mut self, selector: &Selector) -> Result<D::Device> {
        self.find_light(selector).await?.ok_or(Error::LightNotFound)
    }

    pub async fn set_power(&self, light: &D::Device, on: bool, duration: Duration) -> Result<()> {
        light.set_power(on, duration).await
    }

    pub async fn set_color(&self, light: &D::Device, color: Hsbk, duration: Duration) -> Result<()> {
        light.set_color(color, duration).await
    }

    /// Renames a light. Names longer than [`MAX_LABEL_LEN`] characters are cut.
    pub async fn set_label(&self, light: &D::Device, name: &str) -> Result<()> {
        light.set_label(&truncate_label(name)).await
    }

    /// Overwrites only the overridden channels of the light's current color,
    /// writing all four in one call. Returns the color sent.
    pub async fn apply_overrides(
        &self,
        light: &D::Device,
        overrides: &ColorOverrides,
        duration: Duration,
    ) -> Result<Hsbk> {
        if overrides.is_empty() {
            return Err(Error::NoProperty);
        }
        let current = light.get_color().await?;
        let color = overrides.apply(current);
        self.set_color(light, color, duration).await?;
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeDevice, FakeDiscovery};
    use crate::types::PowerState;

    fn office() -> FakeDevice {
        FakeDevice::new("d0:73:d5:01:02:03", "192.168.1.100", "Office Light")
    }

    fn desk() -> FakeDevice {
        FakeDevice::new("d0:73:d5:0a:0b:0c", "192.168.1.101", "Desk")
    }

    #[tokio::test]
    async fn test_discovers_once() {
        let discovery = FakeDiscovery::new(vec![office()]);
        let mut controller = LightController::new(discovery.clone());
        controller.lights().await.unwrap();
        controller.find_light(&Selector::by_ip("x")).await.unwrap();
        controller.list_lights().await.unwrap();
        assert_eq!(discovery.discoveries(), 1);
    }

    #[tokio::test]
    async fn test_list_lights() {
        let mut controller = LightController::new(FakeDiscovery::new(vec![office()]));
        let lights = controller.list_lights().await.unwrap();

        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].mac, "d0:73:d5:01:02:03");
        assert_eq!(lights[0].ip, "192.168.1.100");
        assert_eq!(lights[0].label, "Office Light");
        assert_eq!(lights[0].power, PowerState::On);
        assert_eq!(lights[0].color, Some(Hsbk::new(30000, 40000, 50000, 3500)));
        assert_eq!(lights[0].product, "LIFX Color");
    }

    #[tokio::test]
    async fn test_list_lights_partial_failure() {
        let broken = FakeDevice {
            label: None,
            color: None,
            ..desk()
        };
        let mut controller = LightController::new(FakeDiscovery::new(vec![broken, office()]));
        let lights = controller.list_lights().await.unwrap();

        assert_eq!(lights.len(), 2);
        assert_eq!(lights[0].label, "Unknown");
        assert_eq!(lights[0].color, None);
        assert_eq!(lights[0].power, PowerState::On);
        assert_eq!(lights[1].label, "Office Light");
    }

    #[tokio::test]
    async fn test_find_by_mac_case_insensitive() {
        let mut controller = LightController::new(FakeDiscovery::new(vec![desk(), office()]));
        let found = controller
            .find_light(&Selector::by_mac("D0:73:D5:01:02:03"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.mac(), "d0:73:d5:01:02:03");
    }

    #[tokio::test]
    async fn test_find_by_ip_exact() {
        let mut controller = LightController::new(FakeDiscovery::new(vec![desk(), office()]));
        let found = controller
            .find_light(&Selector::by_ip("192.168.1.100"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.mac(), "d0:73:d5:01:02:03");

        assert!(
            controller
                .find_light(&Selector::by_ip("192.168.1.10"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_find_by_label_case_insensitive() {
        let mut controller = LightController::new(FakeDiscovery::new(vec![desk(), office()]));
        let found = controller
            .find_light(&Selector::by_label("office light"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.mac(), "d0:73:d5:01:02:03");

        assert!(
            controller
                .find_light(&Selector::by_label("office"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_find_label_skips_unreadable() {
        let unreadable = FakeDevice {
            label: None,
            ..desk()
        };
        let mut controller =
            LightController::new(FakeDiscovery::new(vec![unreadable, office()]));
        let found = controller
            .find_light(&Selector::by_label("Office Light"))
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_find_falls_through_selector_kinds() {
        let mut controller = LightController::new(FakeDiscovery::new(vec![desk(), office()]));
        let selector = Selector {
            mac: Some("ff:ff:ff:ff:ff:ff".into()),
            ip: Some("192.168.1.101".into()),
            label: None,
        };
        let found = controller.find_light(&selector).await.unwrap().unwrap();
        assert_eq!(found.mac(), "d0:73:d5:0a:0b:0c");
    }

    #[tokio::test]
    async fn test_find_not_found() {
        let mut controller = LightController::new(FakeDiscovery::new(vec![]));
        assert!(
            controller
                .find_light(&Selector::by_mac("nonexistent"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(matches!(
            controller.require_light(&Selector::by_mac("nonexistent")).await,
            Err(Error::LightNotFound)
        ));
    }

    #[tokio::test]
    async fn test_set_power() {
        let light = office();
        let controller = LightController::new(FakeDiscovery::new(vec![]));
        controller
            .set_power(&light, true, Duration::from_millis(1000))
            .await
            .unwrap();
        controller
            .set_power(&light, false, Duration::from_millis(500))
            .await
            .unwrap();
        assert_eq!(
            light.calls(),
            vec![
                Call::SetPower(true, Duration::from_millis(1000)),
                Call::SetPower(false, Duration::from_millis(500)),
            ]
        );
    }

    #[tokio::test]
    async fn test_set_label_truncates_long_names() {
        let light = office();
        let controller = LightController::new(FakeDiscovery::new(vec![]));
        controller.set_label(&light, &"A".repeat(50)).await.unwrap();
        controller.set_label(&light, "New Name").await.unwrap();
        assert_eq!(
            light.calls(),
            vec![
                Call::SetLabel("A".repeat(32)),
                Call::SetLabel("New Name".into()),
            ]
        );
    }

    #[test]
    fn test_truncate_label_counts_chars() {
        let name = "é".repeat(40);
        assert_eq!(truncate_label(&name).chars().count(), 32);
        assert_eq!(truncate_label("short"), "short");
    }

    #[tokio::test]
    async fn test_apply_overrides_merges_brightness() {
        let light = office();
        let controller = LightController::new(FakeDiscovery::new(vec![]));
        let overrides = ColorOverrides {
            brightness: Some(32768),
            ..Default::default()
        };
        let sent = controller
            .apply_overrides(&light, &overrides, Duration::from_millis(500))
            .await
            .unwrap();

        assert_eq!(sent, Hsbk::new(30000, 40000, 32768, 3500));
        assert_eq!(
            light.calls(),
            vec![Call::SetColor(
                Hsbk::new(30000, 40000, 32768, 3500),
                Duration::from_millis(500)
            )]
        );
    }

    #[tokio::test]
    async fn test_apply_overrides_requires_a_channel() {
        let light = office();
        let controller = LightController::new(FakeDiscovery::new(vec![]));
        let err = controller
            .apply_overrides(&light, &ColorOverrides::default(), Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err, Error::NoProperty);
        assert!(light.calls().is_empty());
    }

    #[tokio::test]
    async fn test_apply_overrides_without_current_color() {
        let light = FakeDevice {
            color: None,
            ..office()
        };
        let controller = LightController::new(FakeDiscovery::new(vec![]));
        let overrides = ColorOverrides {
            hue: Some(1),
            ..Default::default()
        };
        assert!(
            controller
                .apply_overrides(&light, &overrides, Duration::ZERO)
                .await
                .is_err()
        );
        assert!(light.calls().is_empty());
    }
}
