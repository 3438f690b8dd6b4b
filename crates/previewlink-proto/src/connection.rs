use std::io::{Read, Write};

use bytes::Bytes;
use previewlink_wire::{PacketKind, PacketReader, PacketWriter, WireConfig};

use crate::command::{Command, CommandKind};
use crate::error::{ProtoError, Result};

/// The four transport primitives every flow is built on.
///
/// No flow touches the stream directly; this is the seam between the
/// protocol and whatever duplex transport carries it.
pub trait RemoteConnection {
    /// Transmit a command: a type tag plus ordered string arguments.
    fn send_command(&mut self, kind: CommandKind, args: &[&str]) -> Result<()>;

    /// Block until the next command arrives.
    fn receive_command(&mut self) -> Result<Command>;

    /// Transmit one opaque data block.
    fn send_data(&mut self, bytes: &[u8]) -> Result<()>;

    /// Block until the next data block arrives.
    fn receive_data(&mut self) -> Result<Bytes>;

    /// Encode a string as UTF-8 and send it as a data block.
    fn send_utf8_string_data(&mut self, value: &str) -> Result<()> {
        self.send_data(value.as_bytes())
    }

    /// Receive a data block and decode it as UTF-8.
    fn receive_utf8_string_data(&mut self) -> Result<String> {
        let bytes = self.receive_data()?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// A `RemoteConnection` over any pair of byte streams.
///
/// Commands and data blocks each travel as one framed packet. A packet
/// of the wrong kind is stream desynchronization and fails the exchange
/// rather than being misread.
pub struct StreamConnection<R, W> {
    reader: PacketReader<R>,
    writer: PacketWriter<W>,
}

impl<R: Read, W: Write> StreamConnection<R, W> {
    /// Create a connection with default wire configuration.
    pub fn new(read: R, write: W) -> Self {
        Self {
            reader: PacketReader::new(read),
            writer: PacketWriter::new(write),
        }
    }

    /// Create a connection with explicit wire configuration.
    pub fn with_config(read: R, write: W, config: WireConfig) -> Self {
        Self {
            reader: PacketReader::with_config(read, config.clone()),
            writer: PacketWriter::with_config(write, config),
        }
    }

    /// Consume the connection and return the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }

    fn expect_packet(&mut self, expected: PacketKind) -> Result<Bytes> {
        let packet = self.reader.read_packet()?;
        if packet.kind != expected {
            return Err(ProtoError::UnexpectedPacket {
                expected,
                got: packet.kind,
            });
        }
        Ok(packet.payload)
    }
}

impl<R: Read, W: Write> RemoteConnection for StreamConnection<R, W> {
    fn send_command(&mut self, kind: CommandKind, args: &[&str]) -> Result<()> {
        let command = Command::new(kind, args.iter().map(|arg| arg.to_string()));
        self.writer
            .send(PacketKind::Command, &command.encode())?;
        Ok(())
    }

    fn receive_command(&mut self) -> Result<Command> {
        let payload = self.expect_packet(PacketKind::Command)?;
        Command::decode(&payload)
    }

    fn send_data(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.send(PacketKind::Data, bytes)?;
        Ok(())
    }

    fn receive_data(&mut self) -> Result<Bytes> {
        self.expect_packet(PacketKind::Data)
    }
}
