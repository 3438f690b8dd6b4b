use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{decode_packet, Packet, WireConfig};
use crate::error::{Result, WireError};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete packets from any `Read` stream.
///
/// Handles partial reads internally — callers always get complete packets.
pub struct PacketReader<T> {
    inner: T,
    buf: BytesMut,
    config: WireConfig,
}

impl<T: Read> PacketReader<T> {
    /// Create a new packet reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, WireConfig::default())
    }

    /// Create a new packet reader with explicit configuration.
    pub fn with_config(inner: T, config: WireConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Read the next complete packet (blocking).
    ///
    /// Returns `Err(WireError::ConnectionClosed)` when EOF is reached.
    pub fn read_packet(&mut self) -> Result<Packet> {
        loop {
            if let Some(packet) = decode_packet(&mut self.buf, self.config.max_payload_size)? {
                trace!(kind = ?packet.kind, len = packet.payload.len(), "packet received");
                return Ok(packet);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(WireError::Io(err)),
            };

            if read == 0 {
                return Err(WireError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent packet decoding.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current packet reader configuration.
    pub fn config(&self) -> &WireConfig {
        &self.config
    }
}
