//! Logging prelude module for convenient access to tracing macros.
//!
//! Log output always goes to stderr. Stdout is reserved for the status lines
//! the agent prints for its operator (`connected`, `failed to connect`, `exit`).
//!
//! # Usage
//!
//! ```ignore
//! use crate::logging::*;
//!
//! info!("Connected to {}", addr);
//! debug!("Skipping entry {}", path.display());
//! ```

pub use tracing::{debug, error, info, warn};

/// Initialize the tracing subscriber with environment filter support.
///
/// By default, logs at INFO level and above are displayed. Control the log level
/// with the `RUST_LOG` environment variable:
///
/// ```bash
/// RUST_LOG=debug fsagent 127.0.0.1 8443
/// RUST_LOG=fsagent::transfer=trace fsagent 127.0.0.1 8443
/// ```
pub fn init_tracing() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
		)
		.with_writer(std::io::stderr)
		.init();
}

// vim: ts=4
