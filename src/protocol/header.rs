//! The fixed 36-byte frame header.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub const HEADER_SIZE: usize = 36;

const PROTOCOL: u16 = 1024;
const PROTOCOL_MASK: u16 = 0x0fff;
const ADDRESSABLE: u16 = 1 << 12;
const TAGGED: u16 = 1 << 13;

const RES_REQUIRED: u8 = 1 << 0;
const ACK_REQUIRED: u8 = 1 << 1;

/// Frame, frame address and protocol header merged into one struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    /// Total packet size including this header.
    pub size: u16,
    /// Set on broadcasts so every device handles the packet.
    pub tagged: bool,
    pub source: u32,
    /// Device address; the low six bytes are the MAC, zero for broadcasts.
    pub target: u64,
    pub ack_required: bool,
    pub res_required: bool,
    pub sequence: u8,
    pub message_type: u16,
}

impl Header {
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut flags = PROTOCOL | ADDRESSABLE;
        if self.tagged {
            flags |= TAGGED;
        }

        let mut response = 0u8;
        if self.res_required {
            response |= RES_REQUIRED;
        }
        if self.ack_required {
            response |= ACK_REQUIRED;
        }

        w.write_u16::<LittleEndian>(self.size)?;
        w.write_u16::<LittleEndian>(flags)?;
        w.write_u32::<LittleEndian>(self.source)?;
        w.write_u64::<LittleEndian>(self.target)?;
        w.write_all(&[0u8; 6])?;
        w.write_u8(response)?;
        w.write_u8(self.sequence)?;
        w.write_u64::<LittleEndian>(0)?;
        w.write_u16::<LittleEndian>(self.message_type)?;
        w.write_u16::<LittleEndian>(0)?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let size = r.read_u16::<LittleEndian>()?;
        let flags = r.read_u16::<LittleEndian>()?;
        if flags & PROTOCOL_MASK != PROTOCOL {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported protocol number {}", flags & PROTOCOL_MASK),
            ));
        }
        let source = r.read_u32::<LittleEndian>()?;
        let target = r.read_u64::<LittleEndian>()?;
        let mut reserved = [0u8; 6];
        r.read_exact(&mut reserved)?;
        let response = r.read_u8()?;
        let sequence = r.read_u8()?;
        r.read_u64::<LittleEndian>()?;
        let message_type = r.read_u16::<LittleEndian>()?;
        r.read_u16::<LittleEndian>()?;

        Ok(Header {
            size,
            tagged: flags & TAGGED != 0,
            source,
            target,
            ack_required: response & ACK_REQUIRED != 0,
            res_required: response & RES_REQUIRED != 0,
            sequence,
            message_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_get_service_bytes() {
        // Reference GetService broadcast from the LAN protocol docs.
        let header = Header {
            size: 36,
            tagged: true,
            source: 0,
            target: 0,
            ack_required: false,
            res_required: true,
            sequence: 0,
            message_type: 2,
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();

        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(&buf[..4], &[0x24, 0x00, 0x00, 0x34]);
        assert_eq!(buf[22], RES_REQUIRED);
        assert_eq!(&buf[32..34], &[0x02, 0x00]);
    }

    #[test]
    fn test_read_flags() {
        let header = Header {
            size: 36,
            tagged: false,
            source: 0xdead_beef,
            target: 0x0000_0302_01d5_73d0,
            ack_required: true,
            res_required: false,
            sequence: 7,
            message_type: 117,
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert_eq!(&buf[2..4], &[0x00, 0x14]);

        let parsed = Header::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_rejects_wrong_protocol() {
        let mut buf = vec![0u8; HEADER_SIZE];
        buf[0] = 36;
        buf[2] = 0x01;
        buf[3] = 0x14;
        assert!(Header::read_from(&mut buf.as_slice()).is_err());
    }
}
