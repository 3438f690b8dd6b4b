/// Errors that can occur during packet encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The packet header contains an invalid magic number.
    #[error("invalid packet magic (expected 0x504C \"PL\")")]
    InvalidMagic,

    /// The packet header carries a kind byte outside the known set.
    #[error("unknown packet kind 0x{0:02X}")]
    UnknownKind(u8),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing packets.
    #[error("packet I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete packet was received.
    #[error("connection closed (incomplete packet)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, WireError>;
