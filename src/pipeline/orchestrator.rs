//! The five commands: three dispatched pipelines and two single daemon calls.

use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

use crate::engine::daemon::Daemon;
use crate::engine::parser::{AddedLineParser, pinned_hashes};
use crate::pipeline::context::RunContext;
use crate::pipeline::dispatcher::dispatch;
use crate::pipeline::report::report_stats;
use crate::pipeline::result_log::ResultLog;
use crate::pipeline::source::{add_items, result_log_items};
use crate::pipeline::workers::{PinOp, add_worker, pin_worker};
use crate::utils::config::DaemonDefaults;
use crate::{DispatchStats, Pipeline};

/// Add `path` (or the default folder) and record each recognized hash in a fresh result log.
///
/// The log is truncated before the source is read, so a failed run leaves it empty or partial.
pub fn run_add(
    ctx: &RunContext,
    daemon: &dyn Daemon,
    path: Option<&Path>,
) -> Result<DispatchStats> {
    let log = ResultLog::create(&ctx.opts.result_log)?;
    let root = path.unwrap_or(ctx.opts.default_add_dir.as_path());
    let items = add_items(root)?;
    info!(
        "Adding {} item(s) from {} with {} worker(s)",
        items.len(),
        root.display(),
        ctx.opts.add_workers
    );

    let parser = AddedLineParser;
    let stats = dispatch(
        &ctx.dispatch_opts(Pipeline::Add),
        items,
        add_worker(daemon, &parser, log.sender()),
    );
    let log_path = log.path().to_path_buf();
    // A writer failure is the root cause of any "writer has stopped" worker error.
    let written = log.finish()?;
    let stats = stats?;

    debug!("{} line(s) written to {}", written, log_path.display());
    report_stats(Pipeline::Add, &stats);
    Ok(stats)
}

/// Pin or unpin every hash in the result log.
pub fn run_pin(ctx: &RunContext, daemon: &dyn Daemon, op: PinOp) -> Result<DispatchStats> {
    let pipeline = op.pipeline();
    let start = Instant::now();
    let items = result_log_items(&ctx.opts.result_log)?;
    let opts = ctx.dispatch_opts(pipeline);
    info!(
        "{}: {} hash(es) from {} with {} worker(s)",
        pipeline.label(),
        items.len(),
        ctx.opts.result_log.display(),
        opts.workers
    );
    let stats = dispatch(&opts, items, pin_worker(daemon, op))?;
    report_stats(pipeline, &stats);
    info!("{} finished in {:?}", pipeline.label(), start.elapsed());
    Ok(stats)
}

pub fn run_pin_add(ctx: &RunContext, daemon: &dyn Daemon) -> Result<DispatchStats> {
    run_pin(ctx, daemon, PinOp::Add)
}

pub fn run_pin_rm(ctx: &RunContext, daemon: &dyn Daemon) -> Result<DispatchStats> {
    run_pin(ctx, daemon, PinOp::Rm)
}

/// Unpin every recursive pin the daemon reports, [`DaemonDefaults::PIN_RM_CHUNK`] hashes per call.
/// Stops at the first failed call. Returns how many were removed.
pub fn run_rm_all(daemon: &dyn Daemon) -> Result<usize> {
    let hashes = pinned_hashes(&daemon.pin_ls_recursive()?);
    if hashes.is_empty() {
        info!("No recursive pins to remove");
        return Ok(0);
    }
    let mut removed = 0_usize;
    for chunk in hashes.chunks(DaemonDefaults::PIN_RM_CHUNK) {
        let output = daemon.pin_rm_many(chunk).with_context(|| {
            format!(
                "pin rm stopped after {} of {} pin(s)",
                removed,
                hashes.len()
            )
        })?;
        debug!("pin rm: {}", output.trim());
        removed += chunk.len();
    }
    info!("Removed {} recursive pin(s)", removed);
    Ok(removed)
}

/// Run one `repo gc`.
pub fn run_gc(daemon: &dyn Daemon) -> Result<()> {
    let start = Instant::now();
    let output = daemon.repo_gc()?;
    info!(
        "repo gc removed {} block(s) in {:?}",
        output.lines().filter(|l| !l.trim().is_empty()).count(),
        start.elapsed()
    );
    debug!("repo gc: {}", output.trim());
    Ok(())
}
