//! pinbatch: bounded concurrent batch front end for an IPFS daemon.
//!
//! A work source (folder entries, or the lines of a result log) is fanned out to a fixed
//! pool of workers through a bounded queue. Each worker makes one synchronous daemon call
//! per item; add workers record the reported hash in the result log.

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::{Daemon, IpfsCli};
pub use pipeline::{DispatchOpts, RunContext, dispatch};

/// Result alias used by public pinbatch API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
