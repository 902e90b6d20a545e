//! Directory listing

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs as afs;
use tracing::{debug, warn};

use crate::error::HandlerError;
use crate::path;
use crate::protocol::{DirectoryEntry, DirectoryListing, EntryType};

/// Name of the synthetic parent entry
pub const PARENT_ENTRY: &str = "..";

/// List the directory `input` resolves to
pub async fn list_directory(
	cwd: &Path,
	input: Option<&str>,
) -> Result<DirectoryListing, HandlerError> {
	let dir = path::normalize(cwd, input);
	list_normalized(&dir).await
}

/// List an already normalized directory
///
/// Entries are sorted by name; a `".."` entry pointing at the parent comes
/// first unless `dir` is a filesystem root. Entries whose metadata cannot be
/// read (permissions, deleted meanwhile, dangling symlinks) are left out.
pub async fn list_normalized(dir: &Path) -> Result<DirectoryListing, HandlerError> {
	let meta = match afs::metadata(dir).await {
		Ok(m) => m,
		Err(e) if e.kind() == ErrorKind::NotFound => {
			return Err(HandlerError::NotFound(dir.to_path_buf()))
		}
		Err(e) if e.kind() == ErrorKind::PermissionDenied => {
			return Err(HandlerError::AccessDenied(dir.to_path_buf()))
		}
		Err(e) => return Err(e.into()),
	};
	if !meta.is_dir() {
		return Err(HandlerError::NotADirectory(dir.to_path_buf()));
	}

	let mut read_dir = match afs::read_dir(dir).await {
		Ok(rd) => rd,
		Err(e) if e.kind() == ErrorKind::PermissionDenied => {
			return Err(HandlerError::AccessDenied(dir.to_path_buf()))
		}
		Err(e) => return Err(e.into()),
	};

	let mut found: Vec<(OsString, DirectoryEntry)> = Vec::new();
	loop {
		let entry = match read_dir.next_entry().await {
			Ok(Some(entry)) => entry,
			Ok(None) => break,
			Err(e) => {
				warn!("Stopped reading {} early: {}", dir.display(), e);
				break;
			}
		};

		let name = entry.file_name();
		if name == "." || name == ".." {
			continue;
		}

		let full_path = dir.join(&name);
		let meta = match afs::metadata(&full_path).await {
			Ok(m) => m,
			Err(e) => {
				debug!("Skipping {}: {}", full_path.display(), e);
				continue;
			}
		};

		let (entry_type, size) =
			if meta.is_dir() { (EntryType::Directory, 0) } else { (EntryType::File, meta.len()) };

		found.push((
			name.clone(),
			DirectoryEntry {
				name: name.to_string_lossy().into_owned(),
				path: path::display(&full_path),
				entry_type,
				size,
			},
		));
	}

	found.sort_by(|a, b| a.0.cmp(&b.0));

	let mut contents = Vec::with_capacity(found.len() + 1);
	if let Some(parent) = dir.parent() {
		contents.push(DirectoryEntry {
			name: PARENT_ENTRY.to_string(),
			path: path::display(parent),
			entry_type: EntryType::Directory,
			size: 0,
		});
	}
	contents.extend(found.into_iter().map(|(_, entry)| entry));

	debug!("Listed {} ({} entries)", dir.display(), contents.len());
	Ok(DirectoryListing::new(contents, path::display(dir)))
}


// vim: ts=4
