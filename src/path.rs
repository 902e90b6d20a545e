//! Path normalization
//!
//! Peers send paths in whatever form they like: empty, relative, with forward
//! slashes on Windows. Everything is turned into a clean absolute path in the
//! native convention before a handler touches the filesystem. The working
//! directory is passed in explicitly; nothing here reads process state.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Resolve `input` against `cwd` into a canonical absolute path
///
/// Empty/absent input and `"."` resolve to `cwd`. `.` and `..` segments are
/// folded lexically, so the target does not need to exist and symlinks are
/// not followed. `..` at the root stays at the root.
pub fn normalize(cwd: &Path, input: Option<&str>) -> PathBuf {
	let raw = match input {
		Some(raw) if !raw.is_empty() => raw,
		_ => return clean(cwd),
	};

	let native = to_native(raw);
	if native == "." {
		return clean(cwd);
	}

	clean(&anchor(cwd, Path::new(&*native)))
}

/// Give `path` a root, taking the missing parts from `cwd`
///
/// A drive-relative path (`C:foo`, bare `C:`) resolves against `cwd` when it
/// names the same drive as `cwd`, otherwise against the root of its own drive.
fn anchor(cwd: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() {
		return path.to_path_buf();
	}

	let mut components = path.components();
	let prefix = match components.next() {
		Some(Component::Prefix(prefix)) if !path.has_root() => prefix,
		_ => return cwd.join(path),
	};
	let rest = components.as_path();

	let same_drive = match cwd.components().next() {
		Some(Component::Prefix(current)) => {
			current.as_os_str().eq_ignore_ascii_case(prefix.as_os_str())
		}
		_ => false,
	};
	if same_drive {
		cwd.join(rest)
	} else {
		let mut rooted = PathBuf::from(prefix.as_os_str());
		rooted.push(MAIN_SEPARATOR.to_string());
		rooted.join(rest)
	}
}

/// True when `path` has no parent (`/`, `C:\`)
pub fn is_root(path: &Path) -> bool {
	path.parent().is_none()
}

/// Lossy string form used in responses
pub fn display(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}

/// Replace forward slashes with the native separator
pub fn to_native(raw: &str) -> Cow<'_, str> {
	if MAIN_SEPARATOR == '/' {
		Cow::Borrowed(raw)
	} else {
		Cow::Owned(raw.replace('/', &MAIN_SEPARATOR.to_string()))
	}
}

fn clean(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
			Component::CurDir => {}
			Component::ParentDir => {
				out.pop();
			}
			Component::Normal(name) => out.push(name),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[cfg(unix)]
	fn cwd() -> PathBuf {
		PathBuf::from("/home/agent/work")
	}

	#[test]
	#[cfg(unix)]
	fn test_empty_and_dot_are_cwd() {
		assert_eq!(normalize(&cwd(), None), cwd());
		assert_eq!(normalize(&cwd(), Some("")), cwd());
		assert_eq!(normalize(&cwd(), Some(".")), cwd());
	}

	#[test]
	#[cfg(unix)]
	fn test_relative_resolves_against_cwd() {
		assert_eq!(
			normalize(&cwd(), Some("notes.txt")),
			PathBuf::from("/home/agent/work/notes.txt")
		);
		assert_eq!(normalize(&cwd(), Some("../other/./x")), PathBuf::from("/home/agent/other/x"));
		assert_eq!(normalize(&cwd(), Some("./sub/")), PathBuf::from("/home/agent/work/sub"));
	}

	#[test]
	#[cfg(unix)]
	fn test_absolute_ignores_cwd() {
		assert_eq!(normalize(&cwd(), Some("/etc//ssh/../hosts")), PathBuf::from("/etc/hosts"));
		assert_eq!(normalize(&cwd(), Some("/../../")), PathBuf::from("/"));
	}

	#[test]
	#[cfg(unix)]
	fn test_nonexistent_paths_still_normalize() {
		let p = normalize(&cwd(), Some("/definitely/not/here/../there"));
		assert_eq!(p, PathBuf::from("/definitely/not/there"));
	}

	#[test]
	#[cfg(unix)]
	fn test_cwd_itself_is_cleaned() {
		let messy = PathBuf::from("/home/agent/./work/../work/");
		assert_eq!(normalize(&messy, None), cwd());
	}

	#[test]
	fn test_idempotent() {
		let cwd = std::env::temp_dir();
		let inputs =
			["", ".", "..", "a/b/../c", "./x/./y/", "/", "/a/../../b", "mixed\\sep/path", "a//b"];
		for input in inputs.iter() {
			let once = normalize(&cwd, Some(input));
			let once_str = display(&once);
			let twice = normalize(&cwd, Some(&once_str));
			assert_eq!(once, twice, "not idempotent for {:?}", input);
			assert!(once.is_absolute(), "{:?} did not become absolute", input);
		}
	}

	#[test]
	#[cfg(unix)]
	fn test_is_root() {
		assert!(is_root(Path::new("/")));
		assert!(!is_root(Path::new("/tmp")));
	}

	#[test]
	#[cfg(windows)]
	fn test_forward_slashes_become_native() {
		let cwd = PathBuf::from(r"C:\Users\agent");
		assert_eq!(
			normalize(&cwd, Some("C:/Windows/System32")),
			PathBuf::from(r"C:\Windows\System32")
		);
		assert_eq!(
			normalize(&cwd, Some("docs/a.txt")),
			PathBuf::from(r"C:\Users\agent\docs\a.txt")
		);
		assert!(is_root(Path::new(r"C:\")));
	}

	#[test]
	#[cfg(windows)]
	fn test_drive_relative_paths_get_a_root() {
		let cwd = PathBuf::from(r"C:\Users\agent");
		assert_eq!(normalize(&cwd, Some("C:foo")), PathBuf::from(r"C:\Users\agent\foo"));
		assert_eq!(normalize(&cwd, Some("c:foo")), PathBuf::from(r"C:\Users\agent\foo"));
		assert_eq!(normalize(&cwd, Some("C:")), cwd);
		assert_eq!(normalize(&cwd, Some("D:foo/../bar")), PathBuf::from(r"D:\bar"));
		assert_eq!(normalize(&cwd, Some("D:")), PathBuf::from(r"D:\"));

		for input in ["C:foo", "C:", "D:x"].iter() {
			let p = normalize(&cwd, Some(input));
			assert!(p.is_absolute(), "{:?} gave {:?}", input, p);
		}
	}
}

// vim: ts=4
