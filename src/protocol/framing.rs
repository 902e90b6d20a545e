//! Length-prefixed message framing

use serde::Serialize;
use std::convert::TryFrom;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use super::error::ProtocolError;

/// Largest inbound payload accepted (64MB)
pub const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

/// Size of the big-endian length prefix
const PREFIX_LEN: usize = 4;

/// Send one framed text message
///
/// Prefix and payload are assembled into a single buffer and handed to the
/// stream in one `write_all`, so a failure is reported for the message as a whole.
pub async fn send_message<W>(writer: &mut W, text: &str) -> Result<(), ProtocolError>
where
	W: AsyncWrite + Unpin,
{
	let payload = text.as_bytes();
	let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge {
		len: payload.len(),
		max: u32::MAX as usize,
	})?;

	let mut frame = Vec::with_capacity(PREFIX_LEN + payload.len());
	frame.extend_from_slice(&len.to_be_bytes());
	frame.extend_from_slice(payload);

	writer.write_all(&frame).await?;
	writer.flush().await?;
	Ok(())
}

/// Serialize a value to JSON and send it as one frame
pub async fn send_json<W, T>(writer: &mut W, value: &T) -> Result<(), ProtocolError>
where
	W: AsyncWrite + Unpin,
	T: Serialize + ?Sized,
{
	let text = serde_json::to_string(value)?;
	send_message(writer, &text).await
}

/// Receive one framed text message
///
/// Returns `Ok(None)` when the stream closes before a complete frame (either
/// inside the prefix or inside the payload) has arrived.
pub async fn receive_message<R>(reader: &mut R) -> Result<Option<String>, ProtocolError>
where
	R: AsyncRead + Unpin,
{
	let mut prefix = [0u8; PREFIX_LEN];
	if !read_full(reader, &mut prefix).await? {
		return Ok(None);
	}

	let len = u32::from_be_bytes(prefix) as usize;
	if len > MAX_FRAME_SIZE {
		warn!("Rejecting frame of {} bytes (max {})", len, MAX_FRAME_SIZE);
		return Err(ProtocolError::FrameTooLarge { len, max: MAX_FRAME_SIZE });
	}

	let mut payload = vec![0u8; len];
	if !read_full(reader, &mut payload).await? {
		debug!("Stream closed after {} byte prefix, payload incomplete", len);
		return Ok(None);
	}

	Ok(Some(String::from_utf8(payload)?))
}

/// Fill `buf` completely; `false` means the stream hit EOF first
async fn read_full<R>(reader: &mut R, buf: &mut [u8]) -> Result<bool, ProtocolError>
where
	R: AsyncRead + Unpin,
{
	match reader.read_exact(buf).await {
		Ok(_) => Ok(true),
		Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
		Err(e) => Err(e.into()),
	}
}


// vim: ts=4
