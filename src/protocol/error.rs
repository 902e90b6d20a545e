//! Protocol error types
//!
//! Errors raised while reading or writing length-prefixed frames. The
//! connection treats every one of them on the receive side as end of stream.

use std::fmt;
use std::io;

/// Protocol error type
#[derive(Debug)]
pub enum ProtocolError {
	/// I/O error from the underlying stream
	Io(io::Error),
	/// Length prefix larger than the accepted maximum
	FrameTooLarge { len: usize, max: usize },
	/// Payload is not valid UTF-8
	InvalidUtf8,
	/// Outgoing message could not be serialized
	Json(String),
}

impl fmt::Display for ProtocolError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ProtocolError::Io(e) => write!(f, "I/O error: {}", e),
			ProtocolError::FrameTooLarge { len, max } => {
				write!(f, "Frame of {} bytes exceeds maximum {}", len, max)
			}
			ProtocolError::InvalidUtf8 => write!(f, "Frame payload is not valid UTF-8"),
			ProtocolError::Json(msg) => write!(f, "JSON error: {}", msg),
		}
	}
}

impl std::error::Error for ProtocolError {}

impl From<io::Error> for ProtocolError {
	fn from(e: io::Error) -> Self {
		ProtocolError::Io(e)
	}
}

impl From<serde_json::Error> for ProtocolError {
	fn from(e: serde_json::Error) -> Self {
		ProtocolError::Json(e.to_string())
	}
}

impl From<std::string::FromUtf8Error> for ProtocolError {
	fn from(_: std::string::FromUtf8Error) -> Self {
		ProtocolError::InvalidUtf8
	}
}

// vim: ts=4
