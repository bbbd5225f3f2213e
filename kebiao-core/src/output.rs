//! Writing the finished calendar.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::KebiaoResult;

/// Default output path: the input with its extension replaced by `.ics`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("ics")
}

/// Write `contents` to `path` atomically. The data goes to a temporary file
/// in the destination directory which is then renamed over `path`, so a
/// failed write never leaves a truncated calendar behind.
pub fn write_atomic(path: &Path, contents: &str) -> KebiaoResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote calendar");
    Ok(())
}
