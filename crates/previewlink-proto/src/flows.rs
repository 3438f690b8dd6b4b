//! The handshake and session exchanges built on the command primitives.
//!
//! Each receive function consumes exactly one incoming command and
//! dispatches it to the matching callback. Commands a receiver does not
//! handle are logged and dropped, never an error: a newer peer may send
//! tags this side does not know yet. Repetition, if any, belongs to the
//! caller's loop.

use tracing::debug;

use crate::codecs::{decode_path, decode_scale, encode_path, encode_scale};
use crate::command::{Command, CommandKind};
use crate::connection::RemoteConnection;
use crate::error::{ProtoError, Result};
use crate::types::{FrameConfig, FrameRequest, PreviewHostConfig, RenderedFrame};

/// Send the readiness signal.
pub fn send_attach<C: RemoteConnection>(conn: &mut C) -> Result<()> {
    conn.send_command(CommandKind::Attach, &[])
}

/// Receive one command and invoke the callback if it is ATTACH.
///
/// Any other command is dropped. Absence of ATTACH is not a failure at
/// this layer; this is a one-shot readiness check.
pub fn receive_attach<C, F>(conn: &mut C, on_attached: F) -> Result<()>
where
    C: RemoteConnection,
    F: FnOnce(),
{
    let command = conn.receive_command()?;
    match command.kind() {
        Some(CommandKind::Attach) => on_attached(),
        _ => ignore(&command, "receive_attach"),
    }
    Ok(())
}

/// Send a rendered frame: dimensions as arguments, image bytes as the
/// immediately following data block.
pub fn send_frame<C: RemoteConnection>(conn: &mut C, frame: &RenderedFrame) -> Result<()> {
    conn.send_command(
        CommandKind::Frame,
        &[&frame.width.to_string(), &frame.height.to_string()],
    )?;
    conn.send_data(&frame.bytes)
}

/// Receive one command; if it is FRAME, read the trailing data block and
/// invoke the callback with the assembled frame.
///
/// Non-numeric or non-positive dimensions are a protocol violation and
/// fail the exchange: the data block that follows can no longer be
/// attributed safely.
pub fn receive_frame<C, F>(conn: &mut C, on_frame: F) -> Result<()>
where
    C: RemoteConnection,
    F: FnOnce(RenderedFrame),
{
    let command = conn.receive_command()?;
    match command.kind() {
        Some(CommandKind::Frame) => {
            let width = required_dimension(&command, 0, "width")?;
            let height = required_dimension(&command, 1, "height")?;
            let bytes = conn.receive_data()?;
            on_frame(RenderedFrame::new(bytes, width, height));
        }
        _ => ignore(&command, "receive_frame"),
    }
    Ok(())
}

/// Send the configuration bootstrap: host config, preview classpath and
/// preview name, as three ordered command/data exchanges.
///
/// The executable path is percent-encoded because it may contain
/// characters unsafe for a command argument; the classpath and name
/// travel as data blocks where no escaping is needed.
pub fn send_config_from_gradle<C: RemoteConnection>(
    conn: &mut C,
    config: &PreviewHostConfig,
    preview_classpath: &str,
    preview_fq_name: &str,
) -> Result<()> {
    conn.send_command(
        CommandKind::PreviewConfig,
        &[&encode_path(&config.java_executable)],
    )?;
    conn.send_utf8_string_data(&config.host_classpath)?;
    conn.send_command(CommandKind::PreviewClasspath, &[])?;
    conn.send_utf8_string_data(preview_classpath)?;
    conn.send_command(CommandKind::PreviewFqName, &[])?;
    conn.send_utf8_string_data(preview_fq_name)?;
    Ok(())
}

/// Receive one bootstrap command and dispatch it.
///
/// Call once per expected command; the sender produces three.
pub fn receive_config_from_gradle<C, P, N, H>(
    conn: &mut C,
    on_classpath: P,
    on_fq_name: N,
    on_host_config: H,
) -> Result<()>
where
    C: RemoteConnection,
    P: FnOnce(String),
    N: FnOnce(String),
    H: FnOnce(PreviewHostConfig),
{
    let command = conn.receive_command()?;
    match command.kind() {
        Some(CommandKind::PreviewClasspath) => {
            on_classpath(conn.receive_utf8_string_data()?);
        }
        Some(CommandKind::PreviewFqName) => {
            on_fq_name(conn.receive_utf8_string_data()?);
        }
        Some(CommandKind::PreviewConfig) => {
            let encoded = command.arg(0).ok_or_else(|| ProtoError::MalformedCommand {
                tag: command.tag().to_string(),
                reason: "missing executable path argument".to_string(),
            })?;
            let java_executable = decode_path(encoded)?;
            let host_classpath = conn.receive_utf8_string_data()?;
            on_host_config(PreviewHostConfig {
                java_executable,
                host_classpath,
            });
        }
        _ => ignore(&command, "receive_config_from_gradle"),
    }
    Ok(())
}

/// Send a preview render request: the preview classpath as a data block,
/// then a FRAME_REQUEST carrying name, dimensions and optional scale.
///
/// The scale travels as the decimal form of its raw bit pattern so the
/// value round-trips bit-exactly through the text-only argument channel.
pub fn send_preview_request<C: RemoteConnection>(
    conn: &mut C,
    preview_classpath: &str,
    request: &FrameRequest,
) -> Result<()> {
    conn.send_command(CommandKind::PreviewClasspath, &[])?;
    conn.send_utf8_string_data(preview_classpath)?;

    let mut args = vec![
        request.fq_name.clone(),
        request.config.width.to_string(),
        request.config.height.to_string(),
    ];
    if let Some(scale) = request.config.scale {
        args.push(encode_scale(scale));
    }
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    conn.send_command(CommandKind::FrameRequest, &arg_refs)
}

/// Receive one command of the preview request flow and dispatch it.
///
/// A FRAME_REQUEST with an empty name or dimensions that fail to parse
/// as positive integers is dropped without invoking the callback. An
/// unparsable scale argument degrades to the default scale rather than
/// dropping the request.
pub fn receive_preview_request<C, P, F>(
    conn: &mut C,
    on_classpath: P,
    on_frame_request: F,
) -> Result<()>
where
    C: RemoteConnection,
    P: FnOnce(String),
    F: FnOnce(FrameRequest),
{
    let command = conn.receive_command()?;
    match command.kind() {
        Some(CommandKind::PreviewClasspath) => {
            on_classpath(conn.receive_utf8_string_data()?);
        }
        Some(CommandKind::FrameRequest) => {
            let fq_name = command.arg(0).filter(|name| !name.is_empty());
            let width = command.arg(1).and_then(parse_dimension);
            let height = command.arg(2).and_then(parse_dimension);
            let scale = command.arg(3).and_then(decode_scale);
            match (fq_name, width, height) {
                (Some(fq_name), Some(width), Some(height)) => {
                    on_frame_request(FrameRequest {
                        fq_name: fq_name.to_string(),
                        config: FrameConfig {
                            width,
                            height,
                            scale,
                        },
                    });
                }
                _ => {
                    debug!(args = ?command.args(), "dropping malformed FRAME_REQUEST");
                }
            }
        }
        _ => ignore(&command, "receive_preview_request"),
    }
    Ok(())
}

fn parse_dimension(arg: &str) -> Option<u32> {
    arg.parse::<u32>().ok().filter(|value| *value > 0)
}

fn required_dimension(command: &Command, index: usize, name: &str) -> Result<u32> {
    command
        .arg(index)
        .and_then(parse_dimension)
        .ok_or_else(|| ProtoError::MalformedCommand {
            tag: command.tag().to_string(),
            reason: format!("{name} is not a positive integer"),
        })
}

fn ignore(command: &Command, receiver: &str) {
    debug!(tag = command.tag(), receiver, "ignoring unhandled command");
}
