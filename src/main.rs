use clap::{Arg, Command};
use std::{env, process};

use fsagent::config::parse_port;
use fsagent::logging::*;
use fsagent::{AgentConfig, Connection, HostInfo, Session, SessionEnd};

#[tokio::main(flavor = "current_thread")]
async fn main() {
	init_tracing();
	process::exit(run().await);
}

async fn run() -> i32 {
	let matches = match Command::new("fsagent")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Remote filesystem agent")
		.after_help("Example: fsagent 192.168.10.107 8443")
		.arg(Arg::new("ip_address").required(true).help("Address of the controlling peer"))
		.arg(Arg::new("port").required(true).help("Port of the controlling peer (1-65535)"))
		.try_get_matches()
	{
		Ok(matches) => matches,
		Err(e) => {
			let _ = e.print();
			return if e.use_stderr() { 1 } else { 0 };
		}
	};

	let (host, port) =
		match (matches.get_one::<String>("ip_address"), matches.get_one::<String>("port")) {
			(Some(host), Some(port)) => (host, port),
			_ => return 1,
		};

	let port = match parse_port(port) {
		Ok(port) => port,
		Err(e) => {
			println!("{}", e);
			return 1;
		}
	};

	let config = AgentConfig::new(host.as_str(), port);
	let cwd = match env::current_dir() {
		Ok(cwd) => cwd,
		Err(e) => {
			error!("Cannot determine working directory: {}", e);
			return 1;
		}
	};
	let session = Session::new(cwd, config.chunk_size);

	let mut conn = match Connection::open(&config, session).await {
		Ok(conn) => conn,
		Err(e) => {
			error!("{}", e);
			println!("failed to connect");
			return 1;
		}
	};

	if let Err(e) = conn.handshake(&HostInfo::collect()).await {
		error!("{}", e);
		println!("failed to connect");
		return 1;
	}
	println!("connected");

	match conn.run().await {
		SessionEnd::Exit => {
			println!("exit");
			0
		}
		end => {
			info!("Session ended: {:?}", end);
			0
		}
	}
}

// vim: ts=4
