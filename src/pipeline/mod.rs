//! Batch pipelines: work sources, bounded dispatcher, workers, result log.

pub mod context;
pub mod dispatcher;
pub mod orchestrator;
pub mod report;
pub mod result_log;
pub mod source;
pub mod workers;

pub use context::{CancelFlag, DispatchOpts, RunContext};
pub use dispatcher::dispatch;
pub use orchestrator::{run_add, run_gc, run_pin, run_pin_add, run_pin_rm, run_rm_all};
pub use report::report_stats;
pub use result_log::{ResultLog, ResultSender};
pub use source::{add_items, non_empty_lines, result_log_items};
pub use workers::{PinOp, add_worker, pin_worker};
