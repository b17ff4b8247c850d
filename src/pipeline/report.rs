use log::{info, warn};

use crate::{DispatchStats, Pipeline};

/// Log the outcome of a finished dispatch. Dropped add responses are not errors,
/// but a non-zero count is surfaced as a warning.
pub fn report_stats(pipeline: Pipeline, stats: &DispatchStats) {
    match pipeline {
        Pipeline::Add => {
            info!(
                "add: {} item(s) dispatched, {} hash(es) recorded",
                stats.dispatched, stats.recorded
            );
            if stats.dropped > 0 {
                warn!(
                    "add: {} response(s) did not look like `added <hash> <name>` and were skipped",
                    stats.dropped
                );
            }
        }
        Pipeline::PinAdd | Pipeline::PinRm => {
            info!(
                "{}: {} of {} hash(es) processed",
                pipeline.label(),
                stats.done,
                stats.dispatched
            );
        }
    }
}
