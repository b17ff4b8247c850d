//! Public and internal types for the pinbatch API and pipelines.

use std::path::PathBuf;
use std::time::Duration;

use crate::utils::config::{DaemonDefaults, PackagePaths, WorkerDefaults};

/// A single unit of work: a filesystem path (add) or a content hash (pin add / pin rm).
pub type WorkItem = String;

/// The three batch-dispatched pipelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pipeline {
    Add,
    PinAdd,
    PinRm,
}

impl Pipeline {
    pub fn label(self) -> &'static str {
        match self {
            Pipeline::Add => "add",
            Pipeline::PinAdd => "pin add",
            Pipeline::PinRm => "pin rm",
        }
    }
}

/// What one worker step did with its item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Add succeeded and its hash went to the result log.
    Recorded,
    /// Output did not have the expected shape; nothing was written.
    Dropped,
    /// Pin operation finished; output is not kept.
    Done,
}

/// Counters returned by the dispatcher once every worker has joined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Items pushed into the queue.
    pub dispatched: usize,
    pub recorded: usize,
    pub dropped: usize,
    pub done: usize,
}

impl DispatchStats {
    /// Items a worker actually finished (any outcome).
    pub fn processed(&self) -> usize {
        self.recorded + self.dropped + self.done
    }
}

/// Run settings. Built once at startup from defaults, config file, env and CLI, then read-only.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Workers for the add pipeline.
    pub add_workers: usize,
    /// Workers for the pin add pipeline.
    pub pin_add_workers: usize,
    /// Workers for the pin rm pipeline.
    pub pin_rm_workers: usize,
    /// Producer-side pause after each pin add item. Zero disables it.
    pub pin_add_wait: Duration,
    /// Daemon API multiaddr passed as `--api`.
    pub api: String,
    /// Daemon command-line binary.
    pub ipfs_bin: String,
    /// Line-delimited hash file written by add and read by pin add / pin rm.
    pub result_log: PathBuf,
    /// Folder added when `add` gets no path.
    pub default_add_dir: PathBuf,
    /// Show progress bar (verbose mode).
    pub verbose: bool,
}

impl Opts {
    /// Defaults rooted at `work_dir` (normally the current directory).
    pub fn with_work_dir(work_dir: &std::path::Path) -> Self {
        let paths = PackagePaths::get();
        Opts {
            add_workers: WorkerDefaults::ADD,
            pin_add_workers: WorkerDefaults::PIN_ADD,
            pin_rm_workers: WorkerDefaults::PIN_RM,
            pin_add_wait: Duration::ZERO,
            api: DaemonDefaults::API.to_string(),
            ipfs_bin: DaemonDefaults::BIN.to_string(),
            result_log: work_dir.join(paths.result_log_filename()),
            default_add_dir: work_dir.join(paths.default_add_dir()),
            verbose: false,
        }
    }

    pub fn workers_for(&self, pipeline: Pipeline) -> usize {
        match pipeline {
            Pipeline::Add => self.add_workers,
            Pipeline::PinAdd => self.pin_add_workers,
            Pipeline::PinRm => self.pin_rm_workers,
        }
    }

    pub fn wait_for(&self, pipeline: Pipeline) -> Duration {
        match pipeline {
            Pipeline::PinAdd => self.pin_add_wait,
            Pipeline::Add | Pipeline::PinRm => Duration::ZERO,
        }
    }
}
