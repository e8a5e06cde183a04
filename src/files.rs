//! Filesystem tool handlers.
//!
//! Thin wrappers over `tokio::fs` that produce the wire shapes the
//! `list_files` and `read_file` tools return.

use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// A single directory entry as reported by `list_files`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
}

/// List the entries of a directory, sorted by name.
pub async fn list_files(dir: &Path) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let metadata = entry.metadata().await?;
        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_directory: metadata.is_dir(),
            size: metadata.len(),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Read a UTF-8 file's contents.
pub async fn read_file(path: &Path) -> Result<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}
