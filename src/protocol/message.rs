//! Message payloads used by this client.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use strum_macros::IntoStaticStr;

use crate::types::Hsbk;

/// Size of the fixed label field.
pub const LABEL_SIZE: usize = 32;

/// Service id for UDP in `StateService` replies.
pub const SERVICE_UDP: u8 = 1;

/// A decoded protocol message.
///
/// Only the messages needed for discovery, power, color and labels are
/// modelled. Anything else decodes to [`Message::Unknown`].
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Message {
    GetService,
    StateService { service: u8, port: u32 },
    GetLabel,
    SetLabel { label: String },
    StateLabel { label: String },
    GetVersion,
    StateVersion { vendor: u32, product: u32 },
    Acknowledgement,
    LightGet,
    LightSetColor { color: Hsbk, duration: u32 },
    LightState { color: Hsbk, power: u16, label: String },
    LightGetPower,
    LightSetPower { level: u16, duration: u32 },
    LightStatePower { level: u16 },
    Unknown { message_type: u16, payload: Vec<u8> },
}

impl Message {
    pub const GET_SERVICE: u16 = 2;
    pub const STATE_SERVICE: u16 = 3;
    pub const GET_LABEL: u16 = 23;
    pub const SET_LABEL: u16 = 24;
    pub const STATE_LABEL: u16 = 25;
    pub const GET_VERSION: u16 = 32;
    pub const STATE_VERSION: u16 = 33;
    pub const ACKNOWLEDGEMENT: u16 = 45;
    pub const LIGHT_GET: u16 = 101;
    pub const LIGHT_SET_COLOR: u16 = 102;
    pub const LIGHT_STATE: u16 = 107;
    pub const LIGHT_GET_POWER: u16 = 116;
    pub const LIGHT_SET_POWER: u16 = 117;
    pub const LIGHT_STATE_POWER: u16 = 118;

    pub fn message_type(&self) -> u16 {
        match self {
            Message::GetService => Self::GET_SERVICE,
            Message::StateService { .. } => Self::STATE_SERVICE,
            Message::GetLabel => Self::GET_LABEL,
            Message::SetLabel { .. } => Self::SET_LABEL,
            Message::StateLabel { .. } => Self::STATE_LABEL,
            Message::GetVersion => Self::GET_VERSION,
            Message::StateVersion { .. } => Self::STATE_VERSION,
            Message::Acknowledgement => Self::ACKNOWLEDGEMENT,
            Message::LightGet => Self::LIGHT_GET,
            Message::LightSetColor { .. } => Self::LIGHT_SET_COLOR,
            Message::LightState { .. } => Self::LIGHT_STATE,
            Message::LightGetPower => Self::LIGHT_GET_POWER,
            Message::LightSetPower { .. } => Self::LIGHT_SET_POWER,
            Message::LightStatePower { .. } => Self::LIGHT_STATE_POWER,
            Message::Unknown { message_type, .. } => *message_type,
        }
    }

    /// Variant name, for logging.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn write_payload<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Message::GetService
            | Message::GetLabel
            | Message::GetVersion
            | Message::Acknowledgement
            | Message::LightGet
            | Message::LightGetPower => {}
            Message::StateService { service, port } => {
                w.write_u8(*service)?;
                w.write_u32::<LittleEndian>(*port)?;
            }
            Message::SetLabel { label } | Message::StateLabel { label } => {
                write_label(w, label)?;
            }
            Message::StateVersion { vendor, product } => {
                w.write_u32::<LittleEndian>(*vendor)?;
                w.write_u32::<LittleEndian>(*product)?;
                w.write_u32::<LittleEndian>(0)?;
            }
            Message::LightSetColor { color, duration } => {
                w.write_u8(0)?;
                write_hsbk(w, color)?;
                w.write_u32::<LittleEndian>(*duration)?;
            }
            Message::LightState {
                color,
                power,
                label,
            } => {
                write_hsbk(w, color)?;
                w.write_i16::<LittleEndian>(0)?;
                w.write_u16::<LittleEndian>(*power)?;
                write_label(w, label)?;
                w.write_u64::<LittleEndian>(0)?;
            }
            Message::LightSetPower { level, duration } => {
                w.write_u16::<LittleEndian>(*level)?;
                w.write_u32::<LittleEndian>(*duration)?;
            }
            Message::LightStatePower { level } => {
                w.write_u16::<LittleEndian>(*level)?;
            }
            Message::Unknown { payload, .. } => w.write_all(payload)?,
        }
        Ok(())
    }

    pub fn read_payload(message_type: u16, payload: &[u8]) -> io::Result<Self> {
        let r = &mut &payload[..];
        let message = match message_type {
            Self::GET_SERVICE => Message::GetService,
            Self::STATE_SERVICE => Message::StateService {
                service: r.read_u8()?,
                port: r.read_u32::<LittleEndian>()?,
            },
            Self::GET_LABEL => Message::GetLabel,
            Self::SET_LABEL => Message::SetLabel {
                label: read_label(r)?,
            },
            Self::STATE_LABEL => Message::StateLabel {
                label: read_label(r)?,
            },
            Self::GET_VERSION => Message::GetVersion,
            Self::STATE_VERSION => Message::StateVersion {
                vendor: r.read_u32::<LittleEndian>()?,
                product: r.read_u32::<LittleEndian>()?,
            },
            Self::ACKNOWLEDGEMENT => Message::Acknowledgement,
            Self::LIGHT_GET => Message::LightGet,
            Self::LIGHT_SET_COLOR => {
                r.read_u8()?;
                Message::LightSetColor {
                    color: read_hsbk(r)?,
                    duration: r.read_u32::<LittleEndian>()?,
                }
            }
            Self::LIGHT_STATE => {
                let color = read_hsbk(r)?;
                r.read_i16::<LittleEndian>()?;
                let power = r.read_u16::<LittleEndian>()?;
                let label = read_label(r)?;
                Message::LightState {
                    color,
                    power,
                    label,
                }
            }
            Self::LIGHT_GET_POWER => Message::LightGetPower,
            Self::LIGHT_SET_POWER => Message::LightSetPower {
                level: r.read_u16::<LittleEndian>()?,
                duration: r.read_u32::<LittleEndian>()?,
            },
            Self::LIGHT_STATE_POWER => Message::LightStatePower {
                level: r.read_u16::<LittleEndian>()?,
            },
            _ => Message::Unknown {
                message_type,
                payload: payload.to_vec(),
            },
        };
        Ok(message)
    }
}

fn write_hsbk<W: Write>(w: &mut W, color: &Hsbk) -> io::Result<()> {
    w.write_u16::<LittleEndian>(color.hue)?;
    w.write_u16::<LittleEndian>(color.saturation)?;
    w.write_u16::<LittleEndian>(color.brightness)?;
    w.write_u16::<LittleEndian>(color.kelvin)
}

fn read_hsbk<R: Read>(r: &mut R) -> io::Result<Hsbk> {
    Ok(Hsbk {
        hue: r.read_u16::<LittleEndian>()?,
        saturation: r.read_u16::<LittleEndian>()?,
        brightness: r.read_u16::<LittleEndian>()?,
        kelvin: r.read_u16::<LittleEndian>()?,
    })
}

/// Writes `label` NUL-padded to [`LABEL_SIZE`] bytes, cutting on a char
/// boundary if the UTF-8 encoding is longer than the field.
fn write_label<W: Write>(w: &mut W, label: &str) -> io::Result<()> {
    let mut end = label.len().min(LABEL_SIZE);
    while !label.is_char_boundary(end) {
        end -= 1;
    }
    let mut field = [0u8; LABEL_SIZE];
    field[..end].copy_from_slice(&label.as_bytes()[..end]);
    w.write_all(&field)
}

fn read_label<R: Read>(r: &mut R) -> io::Result<String> {
    let mut field = [0u8; LABEL_SIZE];
    r.read_exact(&mut field)?;
    let end = field.iter().position(|&b| b == 0).unwrap_or(LABEL_SIZE);
    Ok(String::from_utf8_lossy(&field[..end]).into_owned())
}
