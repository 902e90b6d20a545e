//! Agent configuration
//!
//! The agent is configured from its command line only: the peer address and
//! port. Chunk size has a fixed default that library users may override.

use std::fmt;

/// Bytes read per download request (1MB)
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
	/// Address of the controlling peer
	pub host: String,

	/// TCP port of the controlling peer
	pub port: u16,

	/// Download chunk size in bytes
	pub chunk_size: usize,
}

impl AgentConfig {
	pub fn new(host: impl Into<String>, port: u16) -> Self {
		Self { host: host.into(), port, chunk_size: DEFAULT_CHUNK_SIZE }
	}

	/// Override the download chunk size (a zero size is raised to 1)
	pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
		self.chunk_size = chunk_size.max(1);
		self
	}

	/// `host:port` string suitable for `TcpStream::connect`
	pub fn address(&self) -> String {
		if self.host.contains(':') && !self.host.starts_with('[') {
			format!("[{}]:{}", self.host, self.port)
		} else {
			format!("{}:{}", self.host, self.port)
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
	/// Port is not an integer in 1..=65535
	InvalidPort(String),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ConfigError::InvalidPort(_) => write!(f, "Invalid port number"),
		}
	}
}

impl std::error::Error for ConfigError {}

/// Parse a TCP port, rejecting 0 and anything outside u16
pub fn parse_port(value: &str) -> Result<u16, ConfigError> {
	match value.trim().parse::<u16>() {
		Ok(port) if port >= 1 => Ok(port),
		_ => Err(ConfigError::InvalidPort(value.to_string())),
	}
}


// vim: ts=4
