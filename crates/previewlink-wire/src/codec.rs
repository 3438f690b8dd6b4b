use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, WireError};

/// Packet header: magic (2) + kind (1) + length (4) = 7 bytes.
pub const HEADER_SIZE: usize = 7;

/// Magic bytes: "PL" (0x50 0x4C).
pub const MAGIC: [u8; 2] = [0x50, 0x4C];

/// Default maximum payload size: 16 MiB.
///
/// Rendered frames are the largest unit on the stream; a full-screen
/// RGBA frame at typical preview sizes stays well under this.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// The two unit kinds the protocol puts on the stream.
///
/// A Command carries a type tag plus string arguments; a Data packet
/// carries one opaque byte block that by convention follows a specific
/// command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketKind {
    Command = 1,
    Data = 2,
}

impl PacketKind {
    /// Map a wire kind byte back to a `PacketKind`.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(PacketKind::Command),
            2 => Ok(PacketKind::Data),
            other => Err(WireError::UnknownKind(other)),
        }
    }
}

/// A framed unit with its kind discriminator.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Whether this is a command or a data block.
    pub kind: PacketKind,
    /// The unit payload.
    pub payload: Bytes,
}

impl Packet {
    /// Create a new packet.
    pub fn new(kind: PacketKind, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// The total wire size of this packet (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a packet into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────┬───────────┬─────────────────┐
/// │ Magic (2B)   │ Kind     │ Length    │ Payload          │
/// │ 0x50 0x4C    │ (1B)     │ (4B LE)   │ (Length bytes)   │
/// │ "PL"         │          │           │                  │
/// └──────────────┴──────────┴───────────┴─────────────────┘
/// ```
pub fn encode_packet(kind: PacketKind, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > u32::MAX as usize {
        return Err(WireError::PayloadTooLarge {
            size: payload.len(),
            max: u32::MAX as usize,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&MAGIC);
    dst.put_u8(kind as u8);
    dst.put_u32_le(payload.len() as u32);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a packet from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete packet yet.
/// On success, consumes the packet bytes from the buffer.
pub fn decode_packet(src: &mut BytesMut, max_payload: usize) -> Result<Option<Packet>> {
    if src.len() < HEADER_SIZE {
        return Ok(None); // Need more data
    }

    // Check magic
    if src[0..2] != MAGIC {
        return Err(WireError::InvalidMagic);
    }

    let kind = PacketKind::from_byte(src[2])?;
    let payload_len = u32::from_le_bytes(src[3..7].try_into().unwrap()) as usize;

    if payload_len > max_payload {
        return Err(WireError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let total = HEADER_SIZE + payload_len;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    src.advance(HEADER_SIZE);
    let payload = src.split_to(payload_len).freeze();

    Ok(Some(Packet { kind, payload }))
}

/// Configuration for the packet codec.
#[derive(Debug, Clone)]
pub struct WireConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}
