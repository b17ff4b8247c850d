use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Batch front end for an IPFS daemon: add a folder, then pin or unpin every recorded hash.
#[derive(Clone, Parser)]
#[command(name = "pinbatch")]
#[command(about = "Add files to IPFS through a worker pool and pin/unpin the recorded hashes.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (JSON, or TOML when it ends in .toml). Default: config.json in the working directory.
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Daemon API multiaddr. Overrides config and PINBATCH_API.
    #[arg(long, global = true, value_name = "MULTIADDR")]
    pub api: Option<String>,

    /// Daemon command-line binary. Overrides config and PINBATCH_IPFS_BIN.
    #[arg(long, global = true, value_name = "BIN")]
    pub ipfs_bin: Option<String>,

    /// Result log path. Default: filehashes in the working directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub result_log: Option<PathBuf>,

    /// Verbose output (debug logs and a progress bar).
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Add a file, or every entry of a folder, and record the hashes.
    Add {
        /// File or folder to add. Default: testfiles in the working directory.
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Worker count. Overrides add_file_worker_num.
        #[arg(long, short = 'w')]
        workers: Option<usize>,
    },
    /// Pin every hash in the result log.
    Pinadd {
        /// Worker count. Overrides pin_add_file_worker_num.
        #[arg(long, short = 'w')]
        workers: Option<usize>,

        /// Minutes to wait after queueing each hash. Overrides pin_add_wait_time.
        #[arg(long, value_name = "MINUTES")]
        wait: Option<u64>,
    },
    /// Unpin every hash in the result log.
    Pinrm {
        /// Worker count. Overrides pin_rm_file_worker_num.
        #[arg(long, short = 'w')]
        workers: Option<usize>,
    },
    /// Unpin every recursive pin on the daemon.
    Rmall,
    /// Run repository garbage collection.
    Gc,
}
