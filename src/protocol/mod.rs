//! LIFX LAN wire protocol.
//!
//! Every packet is a 36-byte [`Header`] followed by a message payload. All
//! integers are little-endian. Devices listen on UDP port 56700.

mod header;
mod message;

pub use header::{HEADER_SIZE, Header};
pub use message::{LABEL_SIZE, Message, SERVICE_UDP};

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// UDP port LIFX devices listen on.
pub const PORT: u16 = 56700;

/// A header plus its decoded message.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub header: Header,
    pub message: Message,
}

impl Packet {
    /// Build a packet for `target`, or a tagged broadcast when `target` is `None`.
    pub fn new(message: Message, source: u32, target: Option<u64>, sequence: u8) -> Self {
        Packet {
            header: Header {
                size: 0,
                tagged: target.is_none(),
                source,
                target: target.unwrap_or(0),
                ack_required: false,
                res_required: false,
                sequence,
                message_type: message.message_type(),
            },
            message,
        }
    }

    pub fn ack_required(mut self) -> Self {
        self.header.ack_required = true;
        self
    }

    pub fn res_required(mut self) -> Self {
        self.header.res_required = true;
        self
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        self.message
            .write_payload(&mut payload)
            .map_err(|e| Error::malformed(e.to_string()))?;

        let size = u16::try_from(HEADER_SIZE + payload.len())
            .map_err(|_| Error::malformed("payload too large"))?;
        let header = Header {
            size,
            ..self.header
        };

        let mut buf = Vec::with_capacity(size as usize);
        header
            .write_to(&mut buf)
            .map_err(|e| Error::malformed(e.to_string()))?;
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(Error::malformed(format!(
                "{} bytes is shorter than a header",
                buf.len()
            )));
        }
        let header =
            Header::read_from(&mut &buf[..]).map_err(|e| Error::malformed(e.to_string()))?;

        let size = header.size as usize;
        if size < HEADER_SIZE || size > buf.len() {
            return Err(Error::malformed(format!(
                "declared size {size} but received {} bytes",
                buf.len()
            )));
        }

        let message = Message::read_payload(header.message_type, &buf[HEADER_SIZE..size])
            .map_err(|e| {
                Error::malformed(format!("message type {}: {e}", header.message_type))
            })?;
        Ok(Packet { header, message })
    }
}

/// Format the MAC held in the low six bytes of a target, e.g. `d0:73:d5:01:02:03`.
pub fn mac_from_target(target: u64) -> String {
    target.to_le_bytes()[..6]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hsbk;

    #[test]
    fn test_encode_sets_size_and_flags() {
        let packet = Packet::new(
            Message::LightSetPower {
                level: 65535,
                duration: 500,
            },
            42,
            Some(0x0302_01d5_73d0),
            9,
        )
        .ack_required();
        let buf = packet.encode().unwrap();

        assert_eq!(buf.len(), HEADER_SIZE + 6);
        assert_eq!(&buf[..2], &42u16.to_le_bytes());

        let decoded = Packet::decode(&buf).unwrap();
        assert!(!decoded.header.tagged);
        assert!(decoded.header.ack_required);
        assert!(!decoded.header.res_required);
        assert_eq!(decoded.header.sequence, 9);
        assert_eq!(decoded.message, packet.message);
    }

    #[test]
    fn test_broadcast_is_tagged() {
        let packet = Packet::new(Message::GetService, 1, None, 0);
        assert!(packet.header.tagged);
        assert_eq!(packet.header.target, 0);
    }

    #[test]
    fn test_decode_state_reply() {
        let reply = Packet::new(
            Message::LightState {
                color: Hsbk::new(1, 2, 3, 4000),
                power: 0,
                label: "Desk".into(),
            },
            7,
            Some(1),
            3,
        );
        let decoded = Packet::decode(&reply.encode().unwrap()).unwrap();
        assert_eq!(decoded.header.size as usize, HEADER_SIZE + 52);
        assert_eq!(decoded.header.message_type, Message::LIGHT_STATE);
    }

    #[test]
    fn test_decode_short_buffer() {
        assert!(matches!(
            Packet::decode(&[0u8; 10]),
            Err(Error::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_decode_size_past_end() {
        let mut buf = Packet::new(Message::GetLabel, 1, Some(1), 0).encode().unwrap();
        buf[0] = 80;
        assert!(Packet::decode(&buf).is_err());
    }

    #[test]
    fn test_mac_from_target() {
        assert_eq!(mac_from_target(0x0302_01d5_73d0), "d0:73:d5:01:02:03");
        assert_eq!(mac_from_target(0), "00:00:00:00:00:00");
    }
}
