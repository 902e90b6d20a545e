//! Connection lifecycle
//!
//! One outbound stream, one command at a time: read a frame, handle it, send
//! the reply, repeat until the peer goes away or asks the agent to exit.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::AgentConfig;
use crate::dispatch::{Reply, Session};
use crate::error::ConnectionError;
use crate::host::HostInfo;
use crate::logging::*;
use crate::protocol::{receive_message, send_json, Announcement};

/// Why the command loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
	/// Stream closed by the peer
	PeerClosed,
	/// Unreadable frame (oversized, not UTF-8, I/O error)
	ProtocolViolation,
	/// A response could not be written
	SendFailed,
	/// Peer sent `exit`
	Exit,
}

/// The agent's side of a connection to its controlling peer
pub struct Connection<S> {
	stream: S,
	session: Session,
}

impl Connection<TcpStream> {
	/// Connect to the peer named in `config`
	pub async fn open(config: &AgentConfig, session: Session) -> Result<Self, ConnectionError> {
		let addr = config.address();
		let stream = TcpStream::connect(&addr)
			.await
			.map_err(|source| ConnectionError::ConnectFailed { addr: addr.clone(), source })?;
		if let Err(e) = stream.set_nodelay(true) {
			debug!("Cannot set TCP_NODELAY: {}", e);
		}
		info!("Connected to {}", addr);
		Ok(Self::new(stream, session))
	}
}

impl<S> Connection<S>
where
	S: AsyncRead + AsyncWrite + Unpin,
{
	pub fn new(stream: S, session: Session) -> Self {
		Self { stream, session }
	}

	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Send the one-time `init` announcement
	pub async fn handshake(&mut self, host: &HostInfo) -> Result<(), ConnectionError> {
		let hello = Announcement::Init { data: host.clone() };
		send_json(&mut self.stream, &hello)
			.await
			.map_err(|source| ConnectionError::HandshakeFailed { source })?;
		debug!("Announced {}@{} ({})", host.username, host.hostname, host.os);
		Ok(())
	}

	/// Serve commands until the session ends, then close the stream
	pub async fn run(mut self) -> SessionEnd {
		let end = loop {
			let text = match receive_message(&mut self.stream).await {
				Ok(Some(text)) => text,
				Ok(None) => {
					info!("Peer closed the connection");
					break SessionEnd::PeerClosed;
				}
				Err(e) => {
					warn!("Closing connection after protocol error: {}", e);
					break SessionEnd::ProtocolViolation;
				}
			};

			let reply = self.session.handle(&text).await;
			let sent = send_json(&mut self.stream, reply.response()).await;

			if reply.is_exit() {
				if let Err(e) = sent {
					debug!("Exit acknowledgment not delivered: {}", e);
				}
				info!("Exit requested by peer");
				break SessionEnd::Exit;
			}
			if let Err(e) = sent {
				error!("Failed to send response: {}", e);
				break SessionEnd::SendFailed;
			}
		};

		let closed = self.session.close();
		if closed > 0 {
			debug!("Closed {} unfinished downloads", closed);
		}
		if let Err(e) = self.stream.shutdown().await {
			debug!("Shutdown after session end failed: {}", e);
		}
		end
	}
}


// vim: ts=4
