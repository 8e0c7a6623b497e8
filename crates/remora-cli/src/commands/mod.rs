pub mod completions;
pub mod export;
pub mod man_pages;
pub mod modify;

use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MALFORMED_SPEC: u8 = 2;

/// Message prefix that `main` maps to [`EXIT_MALFORMED_SPEC`].
pub const MALFORMED_SPEC_PREFIX: &str = "malformed package operation";

pub fn write_atomic(dest: &Path, content: &str) -> Result<(), String> {
    let dir = dest
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| format!("write temp file: {e}"))?;
    use std::io::Write;
    tmp.write_all(content.as_bytes())
        .map_err(|e| format!("write temp file: {e}"))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| format!("fsync temp file: {e}"))?;
    tmp.persist(dest)
        .map_err(|e| format!("persist file: {}", e.error))?;
    Ok(())
}
