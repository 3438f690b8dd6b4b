use previewlink_wire::PacketKind;

/// Errors that can occur in protocol operations.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// Packet-level error from the wire layer.
    #[error("wire error: {0}")]
    Wire(#[from] previewlink_wire::WireError),

    /// A string data block was not valid UTF-8.
    #[error("invalid UTF-8 in string data block: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A command payload could not be decoded.
    #[error("invalid command payload: {0}")]
    InvalidCommandPayload(String),

    /// A percent-encoded argument could not be decoded.
    #[error("invalid percent-encoded argument: {0}")]
    PercentDecode(std::str::Utf8Error),

    /// A command carried arguments the flow cannot interpret.
    ///
    /// This terminates the exchange; the stream can no longer be trusted.
    #[error("malformed {tag} command: {reason}")]
    MalformedCommand { tag: String, reason: String },

    /// The stream delivered a packet kind the flow did not expect.
    ///
    /// Commands and data blocks must arrive exactly in the order the
    /// sender produced them; a mismatch means the stream is desynchronized.
    #[error("stream desynchronized: expected {expected:?} packet, got {got:?}")]
    UnexpectedPacket {
        expected: PacketKind,
        got: PacketKind,
    },
}

pub type Result<T> = std::result::Result<T, ProtoError>;
