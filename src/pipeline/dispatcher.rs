//! Bounded fan-out: one producer feeds a capacity-bounded queue, a fixed pool of workers drains it.
//!
//! The first worker error raises the cancel flag. The producer then stops queueing,
//! workers stop taking new items, and [`dispatch`] returns that error once every worker has joined.

use anyhow::{Result, anyhow, bail};
use crossbeam_channel::{Receiver, Sender, bounded};
use log::{debug, info};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::{Duration, Instant};

use crate::engine::progress::{ProgressBar, finish_progress, setup_progress, tick};
use crate::pipeline::context::{CancelFlag, DispatchOpts};
use crate::utils::config::{QUEUE_CAPACITY, WAIT_POLL_INTERVAL_MS};
use crate::utils::fd_limit::cap_workers;
use crate::{DispatchStats, ItemOutcome, WorkItem};

/// State shared by all workers of one dispatch.
struct Shared<'a> {
    label: &'static str,
    cancel: &'a CancelFlag,
    first_error: Mutex<Option<anyhow::Error>>,
    recorded: AtomicUsize,
    dropped: AtomicUsize,
    done: AtomicUsize,
    bar: Option<ProgressBar>,
}

impl Shared<'_> {
    fn count(&self, outcome: ItemOutcome) {
        let counter = match outcome {
            ItemOutcome::Recorded => &self.recorded,
            ItemOutcome::Dropped => &self.dropped,
            ItemOutcome::Done => &self.done,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        tick(self.bar.as_ref());
    }

    /// Keep the first error only and stop the run.
    fn fail(&self, err: anyhow::Error) {
        let mut slot = self.first_error.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_none() {
            *slot = Some(err);
        }
        self.cancel.raise();
    }

    fn stats(&self, dispatched: usize) -> DispatchStats {
        DispatchStats {
            dispatched,
            recorded: self.recorded.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            done: self.done.load(Ordering::Relaxed),
        }
    }
}

/// Pull items until the queue is closed and drained, or the run is cancelled.
fn worker_loop<F>(rx: Receiver<WorkItem>, worker_fn: &F, shared: &Shared<'_>)
where
    F: Fn(&WorkItem) -> Result<ItemOutcome> + Sync,
{
    while let Ok(item) = rx.recv() {
        if shared.cancel.is_raised() {
            break;
        }
        debug!("{}: {}", shared.label, item);
        match worker_fn(&item) {
            Ok(outcome) => shared.count(outcome),
            Err(err) => {
                shared.fail(err.context(format!("{} {}", shared.label, item)));
                break;
            }
        }
    }
}

fn spawn_workers<'scope, 'env, F>(
    scope: &'scope Scope<'scope, 'env>,
    rx: &Receiver<WorkItem>,
    worker_fn: &'env F,
    shared: &'env Shared<'env>,
    num_workers: usize,
) -> Result<Vec<ScopedJoinHandle<'scope, ()>>>
where
    F: Fn(&WorkItem) -> Result<ItemOutcome> + Sync,
{
    (0..num_workers)
        .map(|id| {
            let rx = rx.clone();
            thread::Builder::new()
                .name(format!("worker-{id}"))
                .spawn_scoped(scope, move || worker_loop(rx, worker_fn, shared))
                .map_err(|e| anyhow!("spawn worker {id}: {e}"))
        })
        .collect()
}

/// Sleep for `wait`, waking early if the run is cancelled.
/// A `wait` past the clock's range only ends on cancel.
fn pause(wait: Duration, cancel: &CancelFlag) {
    let deadline = Instant::now().checked_add(wait);
    let slice = Duration::from_millis(WAIT_POLL_INTERVAL_MS);
    loop {
        if cancel.is_raised() {
            return;
        }
        let left = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => slice,
        };
        if left.is_zero() {
            return;
        }
        thread::sleep(slice.min(left));
    }
}

/// Push items in source order, pausing after each when `wait` is set. Dropping `tx` closes the queue.
fn feed<I>(tx: Sender<WorkItem>, items: I, wait: Duration, cancel: &CancelFlag) -> usize
where
    I: Iterator<Item = WorkItem>,
{
    let mut count = 0_usize;
    for item in items {
        if cancel.is_raised() {
            break;
        }
        // Every worker has exited; nobody is left to take it.
        if tx.send(item).is_err() {
            break;
        }
        count += 1;
        if !wait.is_zero() {
            info!("Waiting {:?} before queueing the next item", wait);
            pause(wait, cancel);
        }
    }
    drop(tx);
    count
}

/// Run `worker_fn` over every item on `opts.workers` threads through a queue of [`QUEUE_CAPACITY`].
///
/// Workers start before the first push, so processing overlaps enumeration. Returns after all
/// workers have joined. An empty source returns immediately without spawning anything.
pub fn dispatch<I, F>(opts: &DispatchOpts, items: I, worker_fn: F) -> Result<DispatchStats>
where
    I: IntoIterator<Item = WorkItem>,
    I::IntoIter: ExactSizeIterator,
    F: Fn(&WorkItem) -> Result<ItemOutcome> + Sync,
{
    let items = items.into_iter();
    let total = items.len();
    if total == 0 {
        debug!("{}: nothing to dispatch", opts.label);
        return Ok(DispatchStats::default());
    }
    if opts.workers == 0 {
        bail!("{}: worker count must be at least 1", opts.label);
    }
    let num_workers = cap_workers(opts.workers);
    debug!(
        "{}: {} item(s), {} worker(s), queue capacity {}",
        opts.label, total, num_workers, QUEUE_CAPACITY
    );

    let shared = Shared {
        label: opts.label,
        cancel: &opts.cancel,
        first_error: Mutex::new(None),
        recorded: AtomicUsize::new(0),
        dropped: AtomicUsize::new(0),
        done: AtomicUsize::new(0),
        bar: setup_progress(opts.verbose, total, opts.label),
    };
    let worker_fn = &worker_fn;
    let shared_ref = &shared;

    let dispatched = thread::scope(|s| -> Result<usize> {
        let (tx, rx) = bounded::<WorkItem>(QUEUE_CAPACITY);
        let handles = spawn_workers(s, &rx, worker_fn, shared_ref, num_workers)?;
        // Only workers hold receivers, so a send fails once they have all exited.
        drop(rx);

        let dispatched = feed(tx, items, opts.wait, &opts.cancel);
        debug!("{}: queue closed after {} item(s)", opts.label, dispatched);

        for h in handles {
            if h.join().is_err() {
                shared_ref.fail(anyhow!("{}: worker panicked", opts.label));
            }
        }
        Ok(dispatched)
    })?;

    let stats = shared.stats(dispatched);
    finish_progress(shared.bar.as_ref(), stats.processed());

    if let Some(err) = shared
        .first_error
        .into_inner()
        .unwrap_or_else(|e| e.into_inner())
    {
        return Err(err);
    }
    if opts.cancel.is_raised() {
        bail!(
            "{} cancelled after {} of {} item(s)",
            opts.label,
            stats.processed(),
            total
        );
    }
    Ok(stats)
}
