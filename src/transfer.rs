//! Chunked file transfer
//!
//! Downloads are pulled by the peer one chunk per request. The protocol carries
//! no offset, so the agent keeps an open file and its position per normalized
//! path in a [`DownloadTable`] until the last chunk has been handed out.
//! Uploads are pushed as independent chunks that either overwrite or append.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tokio::fs as afs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use crate::error::HandlerError;
use crate::path;
use crate::protocol::{Status, TransferChunk};

/// Open file being downloaded
#[derive(Debug)]
struct DownloadCursor {
	file: afs::File,
	offset: u64,
}

/// Download cursors keyed by normalized path
///
/// A cursor is created by the first request for a path and dropped (closing
/// the file) once a chunk comes back `finished`, when a read fails or returns
/// nothing, or when the owner calls [`forget`](DownloadTable::forget) or
/// [`close_all`](DownloadTable::close_all).
#[derive(Debug, Default)]
pub struct DownloadTable {
	open: HashMap<PathBuf, DownloadCursor>,
}

impl DownloadTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.open.len()
	}

	pub fn is_empty(&self) -> bool {
		self.open.is_empty()
	}

	pub fn contains(&self, path: &Path) -> bool {
		self.open.contains_key(path)
	}

	/// Bytes already handed out for `path`, if a download is in progress
	pub fn offset(&self, path: &Path) -> Option<u64> {
		self.open.get(path).map(|c| c.offset)
	}

	/// Drop the cursor for `path`; returns whether one was open
	pub fn forget(&mut self, path: &Path) -> bool {
		self.open.remove(path).is_some()
	}

	/// Close every open download, returning how many there were
	pub fn close_all(&mut self) -> usize {
		let n = self.open.len();
		self.open.clear();
		n
	}

	/// Read the next chunk of the file `input` resolves to
	///
	/// `finished` is set when fewer than `chunk_size` bytes were read. A file
	/// whose size is an exact multiple of `chunk_size` therefore ends with a
	/// `NoData` error on the request after its last full chunk.
	pub async fn read_chunk(
		&mut self,
		cwd: &Path,
		input: Option<&str>,
		chunk_size: usize,
	) -> Result<TransferChunk, HandlerError> {
		let target = path::normalize(cwd, input);
		let chunk_size = chunk_size.max(1);

		let mut cursor = match self.open.remove(&target) {
			Some(cursor) => cursor,
			None => open_download(&target).await?,
		};

		let mut buf = vec![0u8; chunk_size];
		let n = fill(&mut cursor.file, &mut buf).await?;
		if n == 0 {
			debug!("No data at offset {} of {}", cursor.offset, target.display());
			return Err(HandlerError::NoData);
		}

		cursor.offset += n as u64;
		let finished = n < chunk_size;
		debug!(
			"Read {} bytes of {} (offset now {}, finished={})",
			n,
			target.display(),
			cursor.offset,
			finished
		);
		if !finished {
			self.open.insert(target, cursor);
		}

		buf.truncate(n);
		Ok(TransferChunk {
			status: Status::Success,
			path: input.unwrap_or_default().to_string(),
			data: STANDARD.encode(&buf),
			finished,
		})
	}
}

async fn open_download(target: &Path) -> Result<DownloadCursor, HandlerError> {
	let meta = match afs::metadata(target).await {
		Ok(m) => m,
		Err(e) if e.kind() == ErrorKind::NotFound => return Err(HandlerError::FileNotFound),
		Err(e) => return Err(e.into()),
	};
	if !meta.is_file() {
		return Err(HandlerError::NotAFile);
	}
	if meta.len() == 0 {
		return Err(HandlerError::EmptyFile);
	}

	let file = afs::File::open(target).await?;
	debug!("Opened {} for download ({} bytes)", target.display(), meta.len());
	Ok(DownloadCursor { file, offset: 0 })
}

/// Read until `buf` is full or EOF
async fn fill(file: &mut afs::File, buf: &mut [u8]) -> std::io::Result<usize> {
	let mut total = 0;
	while total < buf.len() {
		match file.read(&mut buf[total..]).await {
			Ok(0) => break,
			Ok(n) => total += n,
			Err(e) if e.kind() == ErrorKind::Interrupted => continue,
			Err(e) => return Err(e),
		}
	}
	Ok(total)
}

/// Decode `data` and write it to `raw_path`, creating directories as needed
///
/// With `append` the bytes go to the end of the file, otherwise the file is
/// truncated first. The file is synced to disk before returning. Returns the
/// normalized path written.
pub async fn write_chunk(
	cwd: &Path,
	raw_path: &str,
	data: &str,
	append: bool,
) -> Result<PathBuf, HandlerError> {
	let bytes = STANDARD.decode(data.trim())?;

	let (dir_part, name) = split_target(raw_path)?;
	let dir = path::normalize(cwd, Some(dir_part));
	afs::create_dir_all(&dir).await?;
	let target = dir.join(name);

	let mut options = afs::OpenOptions::new();
	if append {
		options.append(true).create(true);
	} else {
		options.write(true).create(true).truncate(true);
	}

	let mut file = options.open(&target).await?;
	file.write_all(&bytes).await?;
	file.flush().await?;
	file.sync_all().await?;

	debug!("Wrote {} bytes to {} (append={})", bytes.len(), target.display(), append);
	Ok(target)
}

/// Split a raw upload path into its directory part and file name
///
/// Both `/` and the native separator split. A path without any separator has
/// an empty directory part; one directly under a root keeps the root.
pub fn split_target(raw: &str) -> Result<(&str, &str), HandlerError> {
	let is_sep = |c: char| c == '/' || c == MAIN_SEPARATOR;

	let (dir, name) = match raw.rfind(is_sep) {
		Some(idx) => {
			let head = &raw[..=idx];
			let trimmed = head.trim_end_matches(is_sep);
			let dir = if trimmed.is_empty() || trimmed.ends_with(':') { head } else { trimmed };
			(dir, &raw[idx + 1..])
		}
		None => ("", raw),
	};

	if name.is_empty() || name == "." || name == ".." {
		return Err(HandlerError::InvalidFileName);
	}
	Ok((dir, name))
}


// vim: ts=4
