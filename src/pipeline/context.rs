//! Run context: settings plus the cancel flag shared by the producer, workers and Ctrl+C.

use anyhow::{Context, Result};
use log::warn;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::{Opts, Pipeline};

/// One-way run-level stop signal. Once raised it stays raised.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Settings for one [`dispatch`](crate::pipeline::dispatch) call.
#[derive(Clone, Debug)]
pub struct DispatchOpts {
    pub label: &'static str,
    pub workers: usize,
    /// Producer-side pause after each pushed item.
    pub wait: Duration,
    pub verbose: bool,
    pub cancel: CancelFlag,
}

impl DispatchOpts {
    /// Quiet dispatch with its own cancel flag and no wait.
    pub fn new(label: &'static str, workers: usize) -> Self {
        Self {
            label,
            workers,
            wait: Duration::ZERO,
            verbose: false,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Built once at startup and passed by reference into every pipeline.
pub struct RunContext {
    pub opts: Opts,
    pub cancel: CancelFlag,
}

impl RunContext {
    pub fn new(opts: Opts) -> Self {
        Self {
            opts,
            cancel: CancelFlag::new(),
        }
    }

    /// Ctrl+C raises the cancel flag: no more items are queued, in-flight calls finish.
    pub fn install_ctrlc_handler(&self) -> Result<()> {
        let cancel = self.cancel.clone();
        ctrlc::set_handler(move || {
            warn!("Interrupt received; finishing in-flight items");
            cancel.raise();
        })
        .context("set Ctrl+C handler")
    }

    pub fn dispatch_opts(&self, pipeline: Pipeline) -> DispatchOpts {
        DispatchOpts {
            label: pipeline.label(),
            workers: self.opts.workers_for(pipeline),
            wait: self.opts.wait_for(pipeline),
            verbose: self.opts.verbose,
            cancel: self.cancel.clone(),
        }
    }
}
