use std::net::SocketAddr;

/// All error types that can occur when talking to LIFX lights.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to serialize data to JSON.
    #[error("failed to dump json: {0}")]
    JsonDump(serde_json::Error),

    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(std::io::Error),

    /// A network socket operation failed.
    #[error("socket {action} error: {err}")]
    Socket { action: String, err: std::io::Error },

    /// No matching reply arrived from a light before the retries ran out.
    #[error("no {message} reply from {addr}")]
    Timeout { addr: SocketAddr, message: String },

    /// A packet was too short or otherwise not decodable.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),

    /// A light replied with a message other than the one requested.
    #[error("unexpected reply: wanted message type {expected}, got {got}")]
    UnexpectedMessage { expected: u16, got: u16 },

    /// Discovery finished without finding any light.
    #[error("No LIFX lights found on network")]
    NoLightsFound,

    /// No discovered light matches the selector.
    #[error("Light not found")]
    LightNotFound,

    /// A `set` was requested without any channel to change.
    #[error(
        "Error: must specify at least one property to set (--hue, --saturation, --brightness, --kelvin)"
    )]
    NoProperty,

    /// Reading or writing a light's color failed during `set`.
    #[error("Failed to set color: {0}")]
    SetColor(Box<Error>),
}

impl Error {
    /// Create a new socket error
    pub fn socket(action: &str, err: std::io::Error) -> Self {
        Error::Socket {
            action: action.to_string(),
            err,
        }
    }

    /// Create a new timeout error
    pub fn timeout(addr: SocketAddr, message: &str) -> Self {
        Error::Timeout {
            addr,
            message: message.to_string(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedPacket(reason.into())
    }

    /// Whether this error is a user-facing lookup or usage failure rather
    /// than a fault while talking to a device.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NoLightsFound | Error::LightNotFound | Error::NoProperty | Error::SetColor(_)
        )
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
