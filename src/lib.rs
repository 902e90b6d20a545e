//! # fsagent - Remote Filesystem Agent
//!
//! The agent connects out to a controlling peer, announces the host it runs
//! on and then serves filesystem commands (browse, delete, chunked download
//! and upload) one at a time over a length-prefixed JSON protocol.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fsagent::{AgentConfig, Connection, HostInfo, Session};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AgentConfig::new("192.168.10.107", 8443);
//!     let session = Session::new(std::env::current_dir()?, config.chunk_size);
//!     let mut conn = Connection::open(&config, session).await?;
//!     conn.handshake(&HostInfo::collect()).await?;
//!     let end = conn.run().await;
//!     println!("session ended: {:?}", end);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod delete;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod listing;
pub mod logging;
pub mod path;
pub mod protocol;
pub mod transfer;

// Re-export commonly used types and functions
pub use config::{AgentConfig, DEFAULT_CHUNK_SIZE};
pub use connection::{Connection, SessionEnd};
pub use dispatch::{Reply, Session};
pub use error::{ConnectionError, HandlerError};
pub use host::HostInfo;

// vim: ts=4
