//! Individual light control.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use log::debug;
use tokio::net::UdpSocket;
use tokio::time::{self, Instant};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::Error;
use crate::products::product_name;
use crate::protocol::{Message, Packet, mac_from_target};
use crate::types::{Hsbk, PowerState};

type Result<T> = std::result::Result<T, Error>;

/// Represents a single LIFX bulb found on the network.
///
/// A `Light` talks to one device over UDP. It is identified by its target
/// (hardware address) and the socket address it answered discovery from.
/// Every request waits for the matching reply and is retried with backoff
/// according to its [`Config`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lifx_lights_rs::{Config, Light};
///
/// let light = Light::new(
///     0x0302_01d5_73d0,
///     "192.168.1.100:56700".parse().unwrap(),
///     Light::new_source(),
///     Arc::new(Config::default()),
/// );
/// assert_eq!(light.mac(), "d0:73:d5:01:02:03");
/// assert_eq!(light.ip().to_string(), "192.168.1.100");
/// ```
#[derive(Debug, Clone)]
pub struct Light {
    target: u64,
    mac: String,
    addr: SocketAddr,
    source: u32,
    config: Arc<Config>,
    sequence: Arc<AtomicU8>,
}

impl Light {
    pub fn new(target: u64, addr: SocketAddr, source: u32, config: Arc<Config>) -> Self {
        Light {
            target,
            mac: mac_from_target(target),
            addr,
            source,
            config,
            sequence: Arc::new(AtomicU8::new(0)),
        }
    }

    /// A fresh client id for this process. Devices echo it back in replies.
    pub fn new_source() -> u32 {
        let bytes = Uuid::new_v4().into_bytes();
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]).max(2)
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn get_label(&self) -> Result<String> {
        match self.request(Message::GetLabel, Message::STATE_LABEL).await? {
            Message::StateLabel { label } => Ok(label),
            other => Err(unexpected(Message::STATE_LABEL, &other)),
        }
    }

    /// Sends `label` as is; the codec cuts it to the 32-byte field.
    pub async fn set_label(&self, label: &str) -> Result<()> {
        self.command(Message::SetLabel {
            label: label.to_string(),
        })
        .await
    }

    /// Current power level, 0 (off) to 65535 (on).
    pub async fn get_power(&self) -> Result<u16> {
        match self
            .request(Message::LightGetPower, Message::LIGHT_STATE_POWER)
            .await?
        {
            Message::LightStatePower { level } => Ok(level),
            other => Err(unexpected(Message::LIGHT_STATE_POWER, &other)),
        }
    }

    pub async fn set_power(&self, on: bool, duration: Duration) -> Result<()> {
        self.command(Message::LightSetPower {
            level: PowerState::level(on),
            duration: duration_ms(duration),
        })
        .await
    }

    pub async fn get_color(&self) -> Result<Hsbk> {
        match self.request(Message::LightGet, Message::LIGHT_STATE).await? {
            Message::LightState { color, .. } => Ok(color),
            other => Err(unexpected(Message::LIGHT_STATE, &other)),
        }
    }

    pub async fn set_color(&self, color: Hsbk, duration: Duration) -> Result<()> {
        self.command(Message::LightSetColor {
            color,
            duration: duration_ms(duration),
        })
        .await
    }

    /// Vendor and product ids.
    pub async fn get_version(&self) -> Result<(u32, u32)> {
        match self
            .request(Message::GetVersion, Message::STATE_VERSION)
            .await?
        {
            Message::StateVersion { vendor, product } => Ok((vendor, product)),
            other => Err(unexpected(Message::STATE_VERSION, &other)),
        }
    }

    /// Model name, or `None` if the product id is not in the table.
    pub async fn get_product_name(&self) -> Result<Option<&'static str>> {
        let (vendor, product) = self.get_version().await?;
        Ok(product_name(vendor, product))
    }

    /// Sends a query with `res_required` and returns the reply of type `expected`.
    async fn request(&self, msg: Message, expected: u16) -> Result<Message> {
        self.send_command(msg, false, expected).await
    }

    /// Sends a change with `ack_required` and waits for the acknowledgement.
    async fn command(&self, msg: Message) -> Result<()> {
        self.send_command(msg, true, Message::ACKNOWLEDGEMENT)
            .await
            .map(|_| ())
    }

    async fn send_command(&self, msg: Message, ack: bool, expected: u16) -> Result<Message> {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
            let packet = Packet::new(msg.clone(), self.source, Some(self.target), sequence);
            let packet = if ack {
                packet.ack_required()
            } else {
                packet.res_required()
            };

            match self.send_udp(&packet, expected).await {
                Ok(reply) => return Ok(reply),
                Err(e) => {
                    debug!(
                        "{} to {} failed on attempt {}: {}",
                        msg.name(),
                        self.addr,
                        attempt + 1,
                        e
                    );
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        time::sleep(self.config.retry_delay(attempt)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::timeout(self.addr, msg.name())))
    }

    async fn send_udp(&self, packet: &Packet, expected: u16) -> Result<Message> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| Error::socket("bind", e))?;

        socket
            .connect(self.addr)
            .await
            .map_err(|e| Error::socket("connect", e))?;

        let bytes = packet.encode()?;
        socket
            .send(&bytes)
            .await
            .map_err(|e| Error::socket("send", e))?;
        debug!(
            "sent {} (seq {}) to {}",
            packet.message.name(),
            packet.header.sequence,
            self.addr
        );

        let deadline = Instant::now() + self.config.request_timeout;
        let mut buffer = [0u8; 1024];

        loop {
            let size = time::timeout_at(deadline, socket.recv(&mut buffer))
                .await
                .map_err(|_| Error::timeout(self.addr, packet.message.name()))?
                .map_err(|e| Error::socket("receive", e))?;

            let reply = match Packet::decode(&buffer[..size]) {
                Ok(reply) => reply,
                Err(e) => {
                    debug!("ignoring undecodable reply from {}: {}", self.addr, e);
                    continue;
                }
            };

            // Stale replies from an earlier attempt carry an older sequence
            if reply.header.source != self.source
                || reply.header.sequence != packet.header.sequence
            {
                continue;
            }

            debug!("received {} from {}", reply.message.name(), self.addr);
            if reply.header.message_type == expected {
                return Ok(reply.message);
            }
            return Err(unexpected(expected, &reply.message));
        }
    }
}

fn unexpected(expected: u16, got: &Message) -> Error {
    Error::UnexpectedMessage {
        expected,
        got: got.message_type(),
    }
}

fn duration_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
