//! Load the run config file (`config.json` in the working directory by default).
//! JSON unless the file ends in `.toml`. A missing file means defaults; a broken one is fatal.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::Opts;

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub add_file_worker_num: Option<usize>,
    pub pin_add_file_worker_num: Option<usize>,
    pub pin_rm_file_worker_num: Option<usize>,
    /// Minutes to pause after each pin add item.
    pub pin_add_wait_time: Option<u64>,
    pub api: Option<String>,
    pub ipfs_bin: Option<String>,
}

/// Read and parse `path`. `Ok(None)` when the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<FileConfig>> {
    let s = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read config {}", path.display())),
    };
    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let cfg = if is_toml {
        toml::from_str(&s).with_context(|| format!("parse TOML config {}", path.display()))?
    } else {
        serde_json::from_str(&s).with_context(|| format!("parse JSON config {}", path.display()))?
    };
    Ok(Some(cfg))
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($file:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $file.$file_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Pin add wait given in minutes. Errors instead of wrapping when the value does not fit.
pub fn wait_from_minutes(minutes: u64) -> Result<Duration> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| anyhow!("pin add wait of {minutes} minutes is too large"))
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI.
pub fn apply_file_to_opts(file: &FileConfig, opts: &mut Opts) -> Result<()> {
    apply_file_opt!(file, opts, add_file_worker_num => add_workers);
    apply_file_opt!(file, opts, pin_add_file_worker_num => pin_add_workers);
    apply_file_opt!(file, opts, pin_rm_file_worker_num => pin_rm_workers);
    if let Some(minutes) = file.pin_add_wait_time {
        opts.pin_add_wait = wait_from_minutes(minutes).context("pin_add_wait_time")?;
    }
    apply_file_opt!(file, opts, api => api);
    apply_file_opt!(file, opts, ipfs_bin => ipfs_bin);
    Ok(())
}
