//! Device discovery via UDP broadcast.

use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use log::debug;
use tokio::net::UdpSocket;
use tokio::time::{self, Instant};

use crate::config::Config;
use crate::errors::Error;
use crate::light::Light;
use crate::protocol::{self, Message, Packet, SERVICE_UDP};

type Result<T> = std::result::Result<T, Error>;

/// A LIFX device that answered discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLight {
    /// Frame target; the low six bytes are the MAC.
    pub target: u64,
    /// Address the device answers on.
    pub addr: SocketAddr,
}

impl DiscoveredLight {
    /// Convert this discovered device into a [`Light`] handle.
    pub fn into_light(self, source: u32, config: Arc<Config>) -> Light {
        Light::new(self.target, self.addr, source, config)
    }
}

/// Discover LIFX devices on the local network using UDP broadcast.
///
/// Broadcasts `GetService` and collects `StateService` replies until
/// `config.discovery_timeout` elapses, re-broadcasting
/// `config.discovery_attempts` times within that window. Replies are
/// deduplicated by target and kept in arrival order. When
/// `config.num_lights` is set, discovery returns as soon as that many
/// devices have answered.
///
/// # Examples
///
/// ```ignore
/// use lifx_lights_rs::{Config, Light, discover_lights};
///
/// let found = discover_lights(&Config::default(), Light::new_source()).await?;
/// for light in found {
///     println!("{} at {}", light.target, light.addr);
/// }
/// ```
pub async fn discover_lights(config: &Config, source: u32) -> Result<Vec<DiscoveredLight>> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(|e| Error::socket("bind", e))?;

    socket
        .set_broadcast(true)
        .map_err(|e| Error::socket("set_broadcast", e))?;

    let broadcast = SocketAddrV4::new(Ipv4Addr::BROADCAST, protocol::PORT);
    let mut discovered = Vec::new();
    let mut seen = HashSet::new();
    let mut buffer = [0u8; 1024];

    let start = Instant::now();
    let deadline = start + config.discovery_timeout;
    let interval = config.discovery_interval();
    let mut next_broadcast = start;
    let mut sequence = 0u8;

    while Instant::now() < deadline {
        if Instant::now() >= next_broadcast {
            let packet = Packet::new(Message::GetService, source, None, sequence).res_required();
            socket
                .send_to(&packet.encode()?, broadcast)
                .await
                .map_err(|e| Error::socket("send_to", e))?;
            debug!("broadcast GetService (seq {sequence})");
            sequence = sequence.wrapping_add(1);
            next_broadcast += interval;
        }

        let wait_until = next_broadcast.min(deadline);
        match time::timeout_at(wait_until, socket.recv_from(&mut buffer)).await {
            Ok(Ok((size, addr))) => {
                if let Some(light) = parse_reply(&buffer[..size], addr, source)
                    && seen.insert(light.target)
                {
                    debug!(
                        "discovered {} at {}",
                        protocol::mac_from_target(light.target),
                        light.addr
                    );
                    discovered.push(light);
                    if config.num_lights.is_some_and(|n| discovered.len() >= n) {
                        break;
                    }
                }
            }
            Ok(Err(e)) => debug!("discovery receive error: {e}"),
            // Wait window elapsed - loop to rebroadcast or finish
            Err(_) => continue,
        }
    }

    Ok(discovered)
}

/// Accepts only UDP-service replies addressed to this client.
fn parse_reply(buf: &[u8], from: SocketAddr, source: u32) -> Option<DiscoveredLight> {
    let packet = Packet::decode(buf).ok()?;
    if packet.header.source != source {
        return None;
    }
    match packet.message {
        Message::StateService { service, port } if service == SERVICE_UDP => {
            let port = u16::try_from(port).ok().filter(|p| *p != 0)?;
            Some(DiscoveredLight {
                target: packet.header.target,
                addr: SocketAddr::new(from.ip(), port),
            })
        }
        _ => None,
    }
}
