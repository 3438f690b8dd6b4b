//! Length-prefixed packet framing for the preview host connection.
//!
//! The protocol above this layer deals in two unit kinds: commands (a type
//! tag plus string arguments) and data blocks (opaque bytes). Every unit is
//! framed with:
//! - A 2-byte magic number ("PL") for stream synchronization
//! - A 1-byte kind discriminator (command or data)
//! - A 4-byte little-endian payload length
//!
//! No partial reads, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_packet, encode_packet, Packet, PacketKind, WireConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE,
};
pub use error::{Result, WireError};
pub use reader::PacketReader;
pub use writer::PacketWriter;
