//! Host metadata sent in the initial announcement

use serde::{Deserialize, Serialize};
use std::env;
use sysinfo::System;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
	pub hostname: String,
	pub username: String,
	/// System name and kernel release, e.g. `Linux 6.1.0`
	pub os: String,
}

impl HostInfo {
	/// Read hostname, user and OS of the running process
	pub fn collect() -> Self {
		let hostname = System::host_name().unwrap_or_else(|| "unknown".to_string());
		let release = System::kernel_version().unwrap_or_default();
		let os = format!("{} {}", system_name(env::consts::OS), release).trim_end().to_string();

		Self { hostname, username: current_user(), os }
	}
}

// Same lookup order as the usual login-name resolution on Unix and Windows
fn current_user() -> String {
	["LOGNAME", "USER", "LNAME", "USERNAME"]
		.iter()
		.filter_map(|var| env::var(var).ok())
		.find(|name| !name.is_empty())
		.unwrap_or_else(|| "unknown".to_string())
}

fn system_name(os: &str) -> String {
	match os {
		"linux" => "Linux".to_string(),
		"windows" => "Windows".to_string(),
		"macos" => "Darwin".to_string(),
		"freebsd" => "FreeBSD".to_string(),
		"openbsd" => "OpenBSD".to_string(),
		"netbsd" => "NetBSD".to_string(),
		other => other.to_string(),
	}
}


// vim: ts=4
