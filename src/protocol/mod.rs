//! Wire protocol
//!
//! Every message is a 4-byte big-endian length followed by that many bytes of
//! UTF-8 JSON.
//!
//! # Example Usage
//!
//! ```ignore
//! use fsagent::protocol::{receive_message, send_json};
//!
//! while let Some(text) = receive_message(&mut stream).await? {
//!     send_json(&mut stream, &reply).await?;
//! }
//! ```

pub mod error;
pub mod framing;
pub mod messages;

// Re-export public API
pub use error::ProtocolError;
pub use framing::{receive_message, send_json, send_message, MAX_FRAME_SIZE};
pub use messages::{
	Announcement, Command, DeleteItem, DeleteResponse, DirectoryEntry, DirectoryListing,
	EntryType, ListingOutcome, OperationResult, Response, Status, TransferChunk,
};

// vim: ts=4
