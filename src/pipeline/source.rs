//! Work sources: folder entries for add, result-log lines for the pin pipelines.

use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::path::{Path, PathBuf};

use crate::WorkItem;

fn path_to_item(path: PathBuf) -> Result<WorkItem> {
    path.into_os_string()
        .into_string()
        .map_err(|p| anyhow!("path is not valid UTF-8: {}", PathBuf::from(p).display()))
}

/// Items for the add pipeline.
///
/// - directory: full path of every immediate entry (not recursive), sorted by file name
/// - regular file: the file itself
/// - anything else, or a missing path: error
pub fn add_items(root: &Path) -> Result<Vec<WorkItem>> {
    let meta = fs::metadata(root).with_context(|| format!("stat {}", root.display()))?;
    if meta.is_dir() {
        let mut entries = fs::read_dir(root)
            .with_context(|| format!("read directory {}", root.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<PathBuf>>>()
            .with_context(|| format!("list directory {}", root.display()))?;
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        entries.into_iter().map(path_to_item).collect()
    } else if meta.is_file() {
        Ok(vec![path_to_item(root.to_path_buf())?])
    } else {
        bail!(
            "{} is neither a directory nor a regular file",
            root.display()
        )
    }
}

/// Non-empty lines of `text`, in order. A trailing `\r` is dropped.
pub fn non_empty_lines(text: &str) -> Vec<WorkItem> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Hashes recorded by a previous add run. The whole file is read before dispatch starts.
pub fn result_log_items(path: &Path) -> Result<Vec<WorkItem>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read result log {}", path.display()))?;
    Ok(non_empty_lines(&text))
}
