//! Completion marker
//!
//! A processed file `dir/name` is renamed to `dir/.name`. The batch driver
//! skips dot-prefixed names, so a marked file is never loaded again.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Prefix that marks a file as completed
pub const COMPLETED_PREFIX: &str = ".";

/// Path a file will have once marked as completed
///
/// # Errors
///
/// Returns `InvalidInput` if the path has no file name.
pub fn completed_path(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;

    let mut marked = OsString::from(COMPLETED_PREFIX);
    marked.push(name);
    Ok(path.with_file_name(marked))
}

/// Check if a path already carries the completion marker
pub fn is_completed(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(COMPLETED_PREFIX))
}

/// Rename `dir/name` to `dir/.name`
///
/// The rename is a single `std::fs::rename` within one directory, so the
/// file is either fully marked or not marked at all.
pub fn mark_completed(path: &Path) -> io::Result<PathBuf> {
    let marked = completed_path(path)?;
    std::fs::rename(path, &marked)?;
    Ok(marked)
}
