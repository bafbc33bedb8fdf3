//! In-memory devices for controller and command tests.

use std::cell::{Cell, RefCell};
use std::net::{IpAddr, SocketAddr};
use std::rc::Rc;
use std::time::Duration;

use crate::controller::{Device, Discover};
use crate::errors::Error;
use crate::types::Hsbk;

type Result<T> = std::result::Result<T, Error>;

/// A mutation a [`FakeDevice`] received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetPower(bool, Duration),
    SetColor(Hsbk, Duration),
    SetLabel(String),
}

/// A device whose getters fail for every field set to `None`.
///
/// Clones share the call log, so a test can keep one handle and inspect what
/// the code under test did with another.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    pub mac: String,
    pub ip: IpAddr,
    pub label: Option<String>,
    pub power: Option<u16>,
    pub color: Option<Hsbk>,
    pub product: Option<String>,
    pub log: Rc<RefCell<Vec<Call>>>,
}

impl FakeDevice {
    pub fn new(mac: &str, ip: &str, label: &str) -> Self {
        FakeDevice {
            mac: mac.to_string(),
            ip: ip.parse().unwrap(),
            label: Some(label.to_string()),
            power: Some(65535),
            color: Some(Hsbk::new(30000, 40000, 50000, 3500)),
            product: Some("LIFX Color".to_string()),
            log: Rc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    fn unreachable(&self, what: &str) -> Error {
        Error::timeout(SocketAddr::new(self.ip, 56700), what)
    }
}

impl Device for FakeDevice {
    fn mac(&self) -> &str {
        &self.mac
    }

    fn ip(&self) -> IpAddr {
        self.ip
    }

    async fn get_label(&self) -> Result<String> {
        self.label.clone().ok_or_else(|| self.unreachable("GetLabel"))
    }

    async fn get_power(&self) -> Result<u16> {
        self.power.ok_or_else(|| self.unreachable("LightGetPower"))
    }

    async fn get_color(&self) -> Result<Hsbk> {
        self.color.ok_or_else(|| self.unreachable("LightGet"))
    }

    async fn get_product_name(&self) -> Result<Option<String>> {
        self.product
            .clone()
            .map(Some)
            .ok_or_else(|| self.unreachable("GetVersion"))
    }

    async fn set_power(&self, on: bool, duration: Duration) -> Result<()> {
        self.log.borrow_mut().push(Call::SetPower(on, duration));
        Ok(())
    }

    async fn set_color(&self, color: Hsbk, duration: Duration) -> Result<()> {
        self.log.borrow_mut().push(Call::SetColor(color, duration));
        Ok(())
    }

    async fn set_label(&self, label: &str) -> Result<()> {
        self.log.borrow_mut().push(Call::SetLabel(label.to_string()));
        Ok(())
    }
}

/// Returns a fixed device list and counts how often it was asked.
#[derive(Debug, Clone)]
pub struct FakeDiscovery {
    devices: Vec<FakeDevice>,
    discoveries: Rc<Cell<usize>>,
}

impl FakeDiscovery {
    pub fn new(devices: Vec<FakeDevice>) -> Self {
        FakeDiscovery {
            devices,
            discoveries: Rc::default(),
        }
    }

    pub fn discoveries(&self) -> usize {
        self.discoveries.get()
    }
}

impl Discover for FakeDiscovery {
    type Device = FakeDevice;

    async fn discover(&self) -> Result<Vec<FakeDevice>> {
        self.discoveries.set(self.discoveries.get() + 1);
        Ok(self.devices.clone())
    }
}
