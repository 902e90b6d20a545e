//! Protocol message types
//!
//! Commands arrive from the controlling peer, responses go back one per
//! command. Field names match the JSON on the wire.

use serde::{Deserialize, Serialize};

use crate::host::HostInfo;

/// Commands sent from the peer to the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Command {
	/// List a directory
	Browse {
		#[serde(default)]
		path: Option<String>,
	},

	/// Remove regular files
	Delete {
		#[serde(default)]
		files: Vec<String>,
	},

	/// Read the next chunk of a file
	Download {
		#[serde(default)]
		path: Option<String>,
	},

	/// Write a base64 chunk into a file
	Upload {
		path: String,
		data: String,
		/// absent or null overwrites
		#[serde(default)]
		append: Option<bool>,
	},

	/// Confirm an uploaded file exists
	UploadComplete {
		#[serde(default)]
		path: Option<String>,
	},

	/// Acknowledge and terminate
	Exit,
}

impl Command {
	/// Values of the `type` field the agent understands
	pub const TYPES: &'static [&'static str] =
		&["browse", "delete", "download", "upload", "upload-complete", "exit"];

	pub fn is_known_type(name: &str) -> bool {
		Self::TYPES.contains(&name)
	}
}

/// Message sent once by the agent right after connecting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Announcement {
	Init { data: HostInfo },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
	Success,
	Error,
}

/// Minimal acknowledgment: `{"status": ..., "message"?: ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
	pub status: Status,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl OperationResult {
	pub fn success() -> Self {
		Self { status: Status::Success, message: None }
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self { status: Status::Error, message: Some(message.into()) }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
	File,
	Directory,
}

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
	pub name: String,
	pub path: String,
	#[serde(rename = "type")]
	pub entry_type: EntryType,
	/// Always 0 for directories
	pub size: u64,
}

/// Successful `browse` result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryListing {
	pub status: Status,
	pub contents: Vec<DirectoryEntry>,
	pub current_path: String,
}

impl DirectoryListing {
	pub fn new(contents: Vec<DirectoryEntry>, current_path: String) -> Self {
		Self { status: Status::Success, contents, current_path }
	}
}

/// Listing attached to a delete response, which may itself have failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListingOutcome {
	Listing(DirectoryListing),
	Failed(OperationResult),
}

/// One chunk of a download
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferChunk {
	pub status: Status,
	/// Path exactly as the peer requested it
	pub path: String,
	/// Base64-encoded bytes
	pub data: String,
	/// Fewer bytes than the chunk size were read
	pub finished: bool,
}

/// Per-path outcome of a delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteItem {
	pub path: String,
	pub status: Status,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

pub const DELETE_RESPONSE_TYPE: &str = "delete-response";

/// Batch result of a delete
///
/// `status` is success even when individual items failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
	#[serde(rename = "type")]
	pub kind: String,
	pub status: Status,
	pub results: Vec<DeleteItem>,
	pub directory: ListingOutcome,
}

impl DeleteResponse {
	pub fn new(results: Vec<DeleteItem>, directory: ListingOutcome) -> Self {
		Self { kind: DELETE_RESPONSE_TYPE.to_string(), status: Status::Success, results, directory }
	}
}

/// Any response the agent sends back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
	Delete(DeleteResponse),
	Listing(DirectoryListing),
	Chunk(TransferChunk),
	Result(OperationResult),
}

impl Response {
	pub fn status(&self) -> Status {
		match self {
			Response::Delete(r) => r.status,
			Response::Listing(r) => r.status,
			Response::Chunk(r) => r.status,
			Response::Result(r) => r.status,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_command_from_wire() {
		let cmd: Command =
			serde_json::from_value(json!({"type": "upload", "path": "a.bin", "data": "AAE="}))
				.unwrap();
		assert_eq!(
			cmd,
			Command::Upload { path: "a.bin".into(), data: "AAE=".into(), append: None }
		);

		let cmd: Command = serde_json::from_value(json!({"type": "upload-complete"})).unwrap();
		assert_eq!(cmd, Command::UploadComplete { path: None });

		let cmd: Command = serde_json::from_value(json!({"type": "exit"})).unwrap();
		assert_eq!(cmd, Command::Exit);
	}

	#[test]
	fn test_known_types_cover_every_variant() {
		for name in Command::TYPES {
			assert!(Command::is_known_type(name));
		}
		assert!(!Command::is_known_type("frobnicate"));
		assert!(!Command::is_known_type("Browse"));
	}

	#[test]
	fn test_error_result_shape() {
		let value = serde_json::to_value(OperationResult::error("Empty file")).unwrap();
		assert_eq!(value, json!({"status": "error", "message": "Empty file"}));

		let value = serde_json::to_value(OperationResult::success()).unwrap();
		assert_eq!(value, json!({"status": "success"}));
	}

	#[test]
	fn test_announcement_shape() {
		let hello = Announcement::Init {
			data: HostInfo {
				hostname: "box".into(),
				username: "alice".into(),
				os: "Linux 6.1.0".into(),
			},
		};
		assert_eq!(
			serde_json::to_value(&hello).unwrap(),
			json!({
				"type": "init",
				"data": {"hostname": "box", "username": "alice", "os": "Linux 6.1.0"}
			})
		);
	}

	#[test]
	fn test_delete_response_shape() {
		let resp = DeleteResponse::new(
			vec![DeleteItem {
				path: "/tmp/x".into(),
				status: Status::Error,
				message: Some("File not found".into()),
			}],
			ListingOutcome::Failed(OperationResult::error("Access denied: /tmp")),
		);
		let value = serde_json::to_value(&resp).unwrap();
		assert_eq!(value["type"], "delete-response");
		assert_eq!(value["status"], "success");
		assert_eq!(value["results"][0]["message"], "File not found");
		assert_eq!(value["directory"]["status"], "error");
	}

	#[test]
	fn test_untagged_response_picks_shape() {
		let listing: Response = serde_json::from_value(json!({
			"status": "success",
			"contents": [{"name": "a", "path": "/a", "type": "file", "size": 3}],
			"current_path": "/"
		}))
		.unwrap();
		assert!(matches!(listing, Response::Listing(_)));

		let plain: Response =
			serde_json::from_value(json!({"status": "error", "message": "nope"})).unwrap();
		assert_eq!(plain, Response::Result(OperationResult::error("nope")));
		assert_eq!(plain.status(), Status::Error);
	}
}

// vim: ts=4
