//! Error types for agent operations

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::protocol::ProtocolError;

/// Failure of a single command handler
///
/// Handler errors never leave the dispatcher: each one becomes an error
/// response whose message is the `Display` text of the variant.
#[derive(Debug)]
pub enum HandlerError {
	/// Directory to list does not exist
	NotFound(PathBuf),

	/// File to download or delete does not exist
	FileNotFound,

	/// Listing target exists but is not a directory
	NotADirectory(PathBuf),

	/// Directory exists but cannot be enumerated
	AccessDenied(PathBuf),

	/// Target exists but is not a regular file
	NotAFile,

	/// Download of a zero-length file
	EmptyFile,

	/// Download read returned no bytes
	NoData,

	/// Upload completion check found nothing at the path
	UploadMissing,

	/// Upload path has no file name component
	InvalidFileName,

	/// Delete request without any path
	NoFiles,

	/// Upload payload is not valid base64
	InvalidBase64(String),

	/// Command text could not be decoded into a known command
	MalformedCommand(String),

	/// Command `type` missing or not recognized
	UnknownCommand,

	/// Any other filesystem failure
	Io(io::Error),
}

impl fmt::Display for HandlerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			HandlerError::NotFound(path) => write!(f, "Path does not exist: {}", path.display()),
			HandlerError::FileNotFound => write!(f, "File not found"),
			HandlerError::NotADirectory(path) => {
				write!(f, "Path is not a directory: {}", path.display())
			}
			HandlerError::AccessDenied(path) => write!(f, "Access denied: {}", path.display()),
			HandlerError::NotAFile => write!(f, "Not a file"),
			HandlerError::EmptyFile => write!(f, "Empty file"),
			HandlerError::NoData => write!(f, "No data read"),
			HandlerError::UploadMissing => write!(f, "File not found or empty"),
			HandlerError::InvalidFileName => write!(f, "Invalid file name"),
			HandlerError::NoFiles => write!(f, "No files specified"),
			HandlerError::InvalidBase64(msg) => write!(f, "Invalid base64 data: {}", msg),
			HandlerError::MalformedCommand(msg) => write!(f, "Malformed command: {}", msg),
			HandlerError::UnknownCommand => write!(f, "Unknown command type"),
			HandlerError::Io(e) => write!(f, "{}", e),
		}
	}
}

impl Error for HandlerError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			HandlerError::Io(e) => Some(e),
			_ => None,
		}
	}
}

impl From<io::Error> for HandlerError {
	fn from(e: io::Error) -> Self {
		HandlerError::Io(e)
	}
}

impl From<base64::DecodeError> for HandlerError {
	fn from(e: base64::DecodeError) -> Self {
		HandlerError::InvalidBase64(e.to_string())
	}
}

/// Fatal connection-level errors
#[derive(Debug)]
pub enum ConnectionError {
	/// Outbound connect was refused or failed
	ConnectFailed { addr: String, source: io::Error },

	/// Initial announcement could not be sent
	HandshakeFailed { source: ProtocolError },
}

impl fmt::Display for ConnectionError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConnectionError::ConnectFailed { addr, source } => {
				write!(f, "Failed to connect to {}: {}", addr, source)
			}
			ConnectionError::HandshakeFailed { source } => {
				write!(f, "Handshake failed: {}", source)
			}
		}
	}
}

impl Error for ConnectionError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			ConnectionError::ConnectFailed { source, .. } => Some(source),
			ConnectionError::HandshakeFailed { source } => Some(source),
		}
	}
}


// vim: ts=4
