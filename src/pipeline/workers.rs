//! Per-item worker steps handed to [`dispatch`](crate::pipeline::dispatch).

use anyhow::Result;
use log::debug;

use crate::engine::daemon::Daemon;
use crate::engine::parser::ResponseParser;
use crate::pipeline::result_log::ResultSender;
use crate::{ItemOutcome, Pipeline, WorkItem};

/// Which pin call a pin worker makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinOp {
    Add,
    Rm,
}

impl PinOp {
    pub fn pipeline(self) -> Pipeline {
        match self {
            PinOp::Add => Pipeline::PinAdd,
            PinOp::Rm => Pipeline::PinRm,
        }
    }
}

/// Add one path; record the reported hash when the output has the success shape.
/// Any other shape is dropped without error.
pub fn add_worker<'a>(
    daemon: &'a dyn Daemon,
    parser: &'a dyn ResponseParser,
    log: ResultSender,
) -> impl Fn(&WorkItem) -> Result<ItemOutcome> + Sync + 'a {
    move |path: &WorkItem| {
        let output = daemon.add(path)?;
        match parser.parse(&output) {
            Some(hash) => {
                log.append(hash)?;
                Ok(ItemOutcome::Recorded)
            }
            None => {
                debug!("unrecognized add output for {}: {:?}", path, output.trim());
                Ok(ItemOutcome::Dropped)
            }
        }
    }
}

/// Pin or unpin one hash. Output is only logged.
pub fn pin_worker(
    daemon: &dyn Daemon,
    op: PinOp,
) -> impl Fn(&WorkItem) -> Result<ItemOutcome> + Sync + '_ {
    move |hash: &WorkItem| {
        let output = match op {
            PinOp::Add => daemon.pin_add(hash)?,
            PinOp::Rm => daemon.pin_rm(hash)?,
        };
        debug!("{} {}: {}", op.pipeline().label(), hash, output.trim());
        Ok(ItemOutcome::Done)
    }
}
