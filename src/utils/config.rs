//! Application configuration constants.
//! Defaults and queue sizing in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived and conventional file names: built once, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    result_log_filename: String,
    default_add_dir: String,
    config_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                result_log_filename: "filehashes".to_string(),
                default_add_dir: "testfiles".to_string(),
                config_filename: "config.json".to_string(),
                env_prefix: pkg.to_uppercase(),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    pub fn result_log_filename(&self) -> &str {
        &self.result_log_filename
    }

    pub fn default_add_dir(&self) -> &str {
        &self.default_add_dir
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable name for `key`, e.g. `PINBATCH_API`.
    pub fn env_var(&self, key: &str) -> String {
        format!("{}_{}", self.env_prefix, key)
    }
}

// ---- Workers ----

/// Default worker counts per pipeline.
pub struct WorkerDefaults;

impl WorkerDefaults {
    pub const ADD: usize = 10;
    pub const PIN_ADD: usize = 10;
    pub const PIN_RM: usize = 10;
}

// ---- Queue ----

/// Work queue capacity. Decouples enumeration bursts from worker pace; not a correctness bound.
pub const QUEUE_CAPACITY: usize = 200;

/// Slice length for the producer's wait so a cancel is noticed promptly.
pub const WAIT_POLL_INTERVAL_MS: u64 = 100;

// ---- Daemon ----

/// Where and how the external daemon is reached.
pub struct DaemonDefaults;

impl DaemonDefaults {
    pub const API: &'static str = "/ip4/127.0.0.1/tcp/9095";
    pub const BIN: &'static str = "ipfs";
    /// Hashes per `pin rm` invocation in `rmall`; keeps the argument list well under ARG_MAX.
    pub const PIN_RM_CHUNK: usize = 500;
    /// Arguments shown verbatim in a logged command line before the rest are summarized.
    pub const SHOWN_ARGS: usize = 8;
    /// Output prefix of a successful `add`.
    pub const ADDED_PREFIX: &'static str = "added";
}
