//! Progress bar for a dispatch run (verbose mode only).

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Bar over `total` items, labelled with the pipeline name.
pub fn create_progress_bar(total: usize, desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = total,
        desc = desc,
        animation = Animation::Classic,
        unit = " items"
    )))
}

/// Bar only when `verbose`.
pub fn setup_progress(verbose: bool, total: usize, desc: &'static str) -> Option<ProgressBar> {
    verbose.then(|| create_progress_bar(total, desc))
}

/// Advance by one item.
/// Uses try_lock so a worker never blocks on the bar. A contended tick is lost;
/// [`finish_progress`] sets the true count at the end.
pub fn tick(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb
        && let Ok(mut bar) = pb.try_lock()
    {
        let _ = bar.update(1);
    }
}

/// Push the bar to its final count and draw it once more.
pub fn finish_progress(pb: Option<&ProgressBar>, processed: usize) {
    if let Some(pb) = pb
        && let Ok(mut bar) = pb.lock()
    {
        let _ = bar.update_to(processed);
        let _ = bar.refresh();
    }
}
