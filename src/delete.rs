//! File deletion

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs as afs;
use tracing::debug;

use crate::error::HandlerError;
use crate::listing;
use crate::path;
use crate::protocol::{DeleteItem, DeleteResponse, ListingOutcome, OperationResult, Status};

/// Delete each regular file in `files`, best effort
///
/// Every path is handled on its own; a failing item is reported in its result
/// and never stops the others. The response carries a fresh listing of the
/// directory containing the *first* path only, whatever the other paths are.
pub async fn delete_files(cwd: &Path, files: &[String]) -> Result<DeleteResponse, HandlerError> {
	let first = files.first().ok_or(HandlerError::NoFiles)?;

	let mut results = Vec::with_capacity(files.len());
	for raw in files {
		let item = match delete_one(cwd, raw).await {
			Ok(()) => DeleteItem { path: raw.clone(), status: Status::Success, message: None },
			Err(e) => {
				debug!("Delete of {} failed: {}", raw, e);
				DeleteItem {
					path: raw.clone(),
					status: Status::Error,
					message: Some(e.to_string()),
				}
			}
		};
		results.push(item);
	}

	// parent of the normalized path: "sub/" and "sub/x/.." both list cwd
	let first = path::normalize(cwd, Some(first.as_str()));
	let dir = first.parent().unwrap_or_else(|| first.as_path());
	let directory = match listing::list_normalized(dir).await {
		Ok(listing) => ListingOutcome::Listing(listing),
		Err(e) => ListingOutcome::Failed(OperationResult::error(e.to_string())),
	};

	Ok(DeleteResponse::new(results, directory))
}

async fn delete_one(cwd: &Path, raw: &str) -> Result<(), HandlerError> {
	let target = path::normalize(cwd, Some(raw));
	let meta = match afs::metadata(&target).await {
		Ok(m) => m,
		Err(e) if e.kind() == ErrorKind::NotFound => return Err(HandlerError::FileNotFound),
		Err(e) => return Err(e.into()),
	};
	if !meta.is_file() {
		return Err(HandlerError::NotAFile);
	}

	afs::remove_file(&target).await?;
	debug!("Deleted {}", target.display());
	Ok(())
}


// vim: ts=4
