use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{ProtoError, Result};

/// The closed set of command types the protocol understands.
///
/// Tags not in this set are still decodable as [`Command`]s (the receiver
/// side ignores them for forward compatibility) but never dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Readiness/liveness signal, no arguments.
    Attach,
    /// A rendered frame: args are width and height, followed by the
    /// image bytes as a data block.
    Frame,
    /// Preview host launch configuration: arg is the percent-encoded
    /// executable path, followed by the host classpath as a data block.
    PreviewConfig,
    /// No arguments, followed by the preview classpath as a data block.
    PreviewClasspath,
    /// No arguments, followed by the fully-qualified preview name as a
    /// data block.
    PreviewFqName,
    /// A render request: args are the fully-qualified name, width, height
    /// and an optional scale factor encoded as raw bits.
    FrameRequest,
}

impl CommandKind {
    /// The tag string this kind travels as on the wire.
    pub fn tag(self) -> &'static str {
        match self {
            CommandKind::Attach => "ATTACH",
            CommandKind::Frame => "FRAME",
            CommandKind::PreviewConfig => "PREVIEW_CONFIG",
            CommandKind::PreviewClasspath => "PREVIEW_CLASSPATH",
            CommandKind::PreviewFqName => "PREVIEW_FQ_NAME",
            CommandKind::FrameRequest => "FRAME_REQUEST",
        }
    }

    /// Map a wire tag back to a kind. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ATTACH" => Some(CommandKind::Attach),
            "FRAME" => Some(CommandKind::Frame),
            "PREVIEW_CONFIG" => Some(CommandKind::PreviewConfig),
            "PREVIEW_CLASSPATH" => Some(CommandKind::PreviewClasspath),
            "PREVIEW_FQ_NAME" => Some(CommandKind::PreviewFqName),
            "FRAME_REQUEST" => Some(CommandKind::FrameRequest),
            _ => None,
        }
    }
}

/// A typed, argument-bearing control message.
///
/// The tag is kept as a string so that commands from a newer protocol
/// version decode cleanly and can be ignored rather than failing the
/// connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    tag: String,
    args: Vec<String>,
}

impl Command {
    /// Build a command for a known kind.
    pub fn new(kind: CommandKind, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            tag: kind.tag().to_string(),
            args: args.into_iter().collect(),
        }
    }

    /// Build a command with an arbitrary tag.
    pub fn with_tag(tag: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            tag: tag.into(),
            args: args.into_iter().collect(),
        }
    }

    /// The kind of this command, or `None` for an unknown tag.
    pub fn kind(&self) -> Option<CommandKind> {
        CommandKind::from_tag(&self.tag)
    }

    /// The wire tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The ordered argument list.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The argument at `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Encode into a command packet payload.
    ///
    /// Layout: the tag, then each argument in order, each as a
    /// u32-LE length followed by UTF-8 bytes.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(
            4 + self.tag.len() + self.args.iter().map(|a| 4 + a.len()).sum::<usize>(),
        );
        put_str(&mut buf, &self.tag);
        for arg in &self.args {
            put_str(&mut buf, arg);
        }
        buf.freeze()
    }

    /// Decode from a command packet payload.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut buf = payload;
        let tag = take_str(&mut buf)?
            .ok_or_else(|| ProtoError::InvalidCommandPayload("missing tag".to_string()))?;
        let mut args = Vec::new();
        while let Some(arg) = take_str(&mut buf)? {
            args.push(arg);
        }
        Ok(Self { tag, args })
    }
}

fn put_str(buf: &mut BytesMut, value: &str) {
    buf.put_u32_le(value.len() as u32);
    buf.put_slice(value.as_bytes());
}

fn take_str(buf: &mut &[u8]) -> Result<Option<String>> {
    if buf.is_empty() {
        return Ok(None);
    }
    if buf.len() < 4 {
        return Err(ProtoError::InvalidCommandPayload(
            "truncated string length".to_string(),
        ));
    }
    let len = buf.get_u32_le() as usize;
    if buf.len() < len {
        return Err(ProtoError::InvalidCommandPayload(format!(
            "string length {} exceeds remaining payload {}",
            len,
            buf.len()
        )));
    }
    let raw = buf[..len].to_vec();
    buf.advance(len);
    Ok(Some(String::from_utf8(raw)?))
}
