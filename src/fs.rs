//! File system utilities.

use std::io;
use std::path::Path;
use tokio::fs;

/// Writes content to a file atomically using a temp file and rename.
///
/// Readers of `file_path` see either the old or the new content, never a
/// partial write. The temp file is created in the same directory as the
/// target so the rename stays on one filesystem.
pub async fn atomic_write(file_path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = file_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = file_path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, file_path).await
}

/// Removes a file, treating "already gone" as success.
pub async fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path).await {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}
