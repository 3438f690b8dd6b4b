//! Command protocol between a build tool and a preview rendering host.
//!
//! The two processes share one duplex connection and exchange exactly two
//! unit kinds: commands (a type tag plus string arguments) and opaque data
//! blocks that by convention follow a specific command. On top of those
//! primitives sit four short deterministic flows: the attach signal,
//! configuration bootstrap, preview render requests, and frame delivery.
//!
//! The protocol is stateless and strictly sequential; ordering comes from
//! the stream alone, with no request IDs and no reordering.

pub mod codecs;
pub mod command;
pub mod connection;
pub mod error;
pub mod flows;
pub mod types;

pub use codecs::{decode_path, decode_scale, encode_path, encode_scale};
pub use command::{Command, CommandKind};
pub use connection::{RemoteConnection, StreamConnection};
pub use error::{ProtoError, Result};
pub use flows::{
    receive_attach, receive_config_from_gradle, receive_frame, receive_preview_request,
    send_attach, send_config_from_gradle, send_frame, send_preview_request,
};
pub use types::{FrameConfig, FrameRequest, PreviewHostConfig, RenderedFrame};
