//! Daemon endpoint overrides: env var (PINBATCH_*) → .env in the working directory.

use log::debug;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

fn non_empty_var(name: &str) -> Option<String> {
    let s = std::env::var(name).ok()?;
    let s = s.trim().to_string();
    (!s.is_empty()).then_some(s)
}

/// Value for `PINBATCH_<key>` from the environment, falling back to `.env` in `dir`.
pub fn env_override(dir: &Path, key: &str) -> Option<String> {
    let name = PackagePaths::get().env_var(key);
    if let Some(s) = non_empty_var(&name) {
        return Some(s);
    }
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
        return non_empty_var(&name);
    }
    None
}

/// Apply `PINBATCH_API` and `PINBATCH_IPFS_BIN` to opts. Call after the config file, before CLI.
pub fn apply_env_to_opts(dir: &Path, opts: &mut Opts) {
    if let Some(api) = env_override(dir, "API") {
        debug!("daemon api from environment: {api}");
        opts.api = api;
    }
    if let Some(bin) = env_override(dir, "IPFS_BIN") {
        debug!("daemon binary from environment: {bin}");
        opts.ipfs_bin = bin;
    }
}
