//! Command dispatch
//!
//! A [`Session`] holds the state that lives across commands on one
//! connection: the working directory used to resolve relative paths, the
//! download chunk size and the open download cursors. Each incoming message
//! turns into exactly one [`Reply`].

use std::path::{Path, PathBuf};
use tokio::fs as afs;
use tracing::debug;

use crate::delete;
use crate::error::HandlerError;
use crate::listing;
use crate::path;
use crate::protocol::{Command, OperationResult, Response};
use crate::transfer::{self, DownloadTable};

/// What the connection should do with a handled message
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
	/// Send the response and wait for the next command
	Respond(Response),
	/// Send the acknowledgment and end the session
	Exit(Response),
}

impl Reply {
	pub fn response(&self) -> &Response {
		match self {
			Reply::Respond(r) | Reply::Exit(r) => r,
		}
	}

	pub fn is_exit(&self) -> bool {
		matches!(self, Reply::Exit(_))
	}
}

pub struct Session {
	cwd: PathBuf,
	chunk_size: usize,
	downloads: DownloadTable,
}

impl Session {
	pub fn new(cwd: PathBuf, chunk_size: usize) -> Self {
		Self { cwd, chunk_size: chunk_size.max(1), downloads: DownloadTable::new() }
	}

	pub fn cwd(&self) -> &Path {
		&self.cwd
	}

	pub fn chunk_size(&self) -> usize {
		self.chunk_size
	}

	pub fn downloads(&self) -> &DownloadTable {
		&self.downloads
	}

	/// Release everything held across commands; returns the number of downloads closed
	pub fn close(&mut self) -> usize {
		self.downloads.close_all()
	}

	/// Decode and execute one message
	///
	/// Never fails: decoding and handler errors become error responses.
	pub async fn handle(&mut self, text: &str) -> Reply {
		let command = match decode_command(text) {
			Ok(command) => command,
			Err(e) => {
				debug!("Rejected message: {}", e);
				return Reply::Respond(error_response(e));
			}
		};

		if command == Command::Exit {
			return Reply::Exit(Response::Result(OperationResult::success()));
		}

		match self.execute(command).await {
			Ok(response) => Reply::Respond(response),
			Err(e) => {
				debug!("Command failed: {}", e);
				Reply::Respond(error_response(e))
			}
		}
	}

	/// Run a decoded command against the filesystem
	pub async fn execute(&mut self, command: Command) -> Result<Response, HandlerError> {
		match command {
			Command::Browse { path } => {
				listing::list_directory(&self.cwd, path.as_deref()).await.map(Response::Listing)
			}

			Command::Delete { files } => {
				let response = delete::delete_files(&self.cwd, &files).await?;
				for file in &files {
					self.downloads.forget(&path::normalize(&self.cwd, Some(file.as_str())));
				}
				Ok(Response::Delete(response))
			}

			Command::Download { path } => self
				.downloads
				.read_chunk(&self.cwd, path.as_deref(), self.chunk_size)
				.await
				.map(Response::Chunk),

			Command::Upload { path, data, append } => {
				let append = append.unwrap_or(false);
				let target = transfer::write_chunk(&self.cwd, &path, &data, append).await?;
				if !append {
					self.downloads.forget(&target);
				}
				Ok(Response::Result(OperationResult::success()))
			}

			Command::UploadComplete { path } => {
				let target = path::normalize(&self.cwd, path.as_deref());
				if afs::metadata(&target).await.is_ok() {
					Ok(Response::Result(OperationResult::success()))
				} else {
					Err(HandlerError::UploadMissing)
				}
			}

			Command::Exit => Ok(Response::Result(OperationResult::success())),
		}
	}
}

/// Parse message text into a command
///
/// Strict JSON is tried first, then JSON5. A missing or unrecognized `type`
/// is `UnknownCommand`; a known type with bad fields is `MalformedCommand`.
pub fn decode_command(text: &str) -> Result<Command, HandlerError> {
	let value: serde_json::Value = match serde_json::from_str(text) {
		Ok(value) => value,
		Err(_) => json5::from_str(text).map_err(|e| HandlerError::MalformedCommand(e.to_string()))?,
	};

	let known =
		value.get("type").and_then(|t| t.as_str()).map(Command::is_known_type).unwrap_or(false);
	if !known {
		return Err(HandlerError::UnknownCommand);
	}

	serde_json::from_value(value).map_err(|e| HandlerError::MalformedCommand(e.to_string()))
}

fn error_response(e: HandlerError) -> Response {
	Response::Result(OperationResult::error(e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::protocol::Status;
	use base64::{engine::general_purpose::STANDARD, Engine as _};
	use std::fs;
	use tempfile::TempDir;

	fn session(dir: &TempDir) -> Session {
		Session::new(dir.path().to_path_buf(), 4)
	}

	fn message(reply: &Reply) -> Option<String> {
		match reply.response() {
			Response::Result(r) => r.message.clone(),
			other => panic!("expected plain result, got {:?}", other),
		}
	}

	#[test]
	fn test_session_keeps_cwd_and_clamps_chunk_size() {
		let dir = TempDir::new().unwrap();
		assert_eq!(session(&dir).cwd(), dir.path());
		assert_eq!(session(&dir).chunk_size(), 4);
		assert_eq!(Session::new(dir.path().to_path_buf(), 0).chunk_size(), 1);
	}

	#[test]
	fn test_decode_command() {
		assert_eq!(
			decode_command(r#"{"type":"browse","path":"/tmp"}"#).unwrap(),
			Command::Browse { path: Some("/tmp".into()) }
		);
		assert_eq!(
			decode_command("{type: 'delete', files: ['a', 'b',],}").unwrap(),
			Command::Delete { files: vec!["a".into(), "b".into()] }
		);
		assert!(matches!(
			decode_command(r#"{"type":"frobnicate"}"#),
			Err(HandlerError::UnknownCommand)
		));
		assert!(matches!(decode_command(r#"{"path":"/"}"#), Err(HandlerError::UnknownCommand)));
		assert!(matches!(decode_command("[1, 2]"), Err(HandlerError::UnknownCommand)));
		assert!(matches!(decode_command("{not json"), Err(HandlerError::MalformedCommand(_))));
		assert!(matches!(
			decode_command(r#"{"type":"upload","path":"x"}"#),
			Err(HandlerError::MalformedCommand(_))
		));
	}

	#[tokio::test]
	async fn test_unknown_command_reply() {
		let dir = TempDir::new().unwrap();
		let reply = session(&dir).handle(r#"{"type":"frobnicate"}"#).await;

		assert!(!reply.is_exit());
		assert_eq!(
			serde_json::to_value(reply.response()).unwrap(),
			serde_json::json!({"status": "error", "message": "Unknown command type"})
		);
	}

	#[tokio::test]
	async fn test_exit_reply() {
		let dir = TempDir::new().unwrap();
		let reply = session(&dir).handle(r#"{"type":"exit"}"#).await;

		assert!(reply.is_exit());
		assert_eq!(reply.response().status(), Status::Success);
	}

	#[tokio::test]
	async fn test_upload_complete() {
		let dir = TempDir::new().unwrap();
		fs::write(dir.path().join("done.bin"), b"x").unwrap();
		let mut s = session(&dir);

		let ok = s.handle(r#"{"type":"upload-complete","path":"done.bin"}"#).await;
		assert_eq!(ok.response().status(), Status::Success);

		let missing = s.handle(r#"{"type":"upload-complete","path":"nope.bin"}"#).await;
		assert_eq!(message(&missing).as_deref(), Some("File not found or empty"));
	}

	#[tokio::test]
	async fn test_overwrite_resets_download_cursor() {
		let dir = TempDir::new().unwrap();
		fs::write(dir.path().join("f"), b"0123456789").unwrap();
		let mut s = session(&dir);

		s.handle(r#"{"type":"download","path":"f"}"#).await;
		assert!(s.downloads().contains(&dir.path().join("f")));

		let data = STANDARD.encode(b"abcdefgh");
		let upload = format!(r#"{{"type":"upload","path":"f","data":"{}"}}"#, data);
		s.handle(&upload).await;
		assert!(s.downloads().is_empty());

		match s.handle(r#"{"type":"download","path":"f"}"#).await.response() {
			Response::Chunk(chunk) => assert_eq!(STANDARD.decode(&chunk.data).unwrap(), b"abcd"),
			other => panic!("expected chunk, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_null_append_overwrites() {
		let dir = TempDir::new().unwrap();
		fs::write(dir.path().join("f"), b"old contents").unwrap();
		let mut s = session(&dir);

		let data = STANDARD.encode(b"new");
		let upload =
			format!(r#"{{"type":"upload","path":"f","data":"{}","append":null}}"#, data);
		let reply = s.handle(&upload).await;

		assert_eq!(reply.response().status(), Status::Success);
		assert_eq!(fs::read(dir.path().join("f")).unwrap(), b"new");
	}

	#[tokio::test]
	async fn test_delete_drops_download_cursor() {
		let dir = TempDir::new().unwrap();
		fs::write(dir.path().join("f"), b"0123456789").unwrap();
		let mut s = session(&dir);

		s.handle(r#"{"type":"download","path":"f"}"#).await;
		let reply = s.handle(r#"{"type":"delete","files":["f"]}"#).await;

		assert!(matches!(reply.response(), Response::Delete(_)));
		assert!(s.downloads().is_empty());
		assert_eq!(s.close(), 0);
	}

	#[tokio::test]
	async fn test_empty_delete_is_error() {
		let dir = TempDir::new().unwrap();
		let reply = session(&dir).handle(r#"{"type":"delete"}"#).await;
		assert_eq!(message(&reply).as_deref(), Some("No files specified"));
	}
}

// vim: ts=4
