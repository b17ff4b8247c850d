//! Result log: one hash per line, written by a single owner thread.
//!
//! Workers never touch the file. They send hashes to the writer, which appends each
//! as one complete `hash\n` line and flushes it, so lines never interleave mid-line.

use anyhow::{Context, Result, anyhow};
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::fs::File;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

/// Cloneable handle used by workers to append a hash.
#[derive(Clone)]
pub struct ResultSender(Sender<String>);

impl ResultSender {
    pub fn append(&self, hash: String) -> Result<()> {
        self.0
            .send(hash)
            .map_err(|_| anyhow!("result log writer has stopped"))
    }
}

/// Owner of the result log file and its writer thread.
pub struct ResultLog {
    path: PathBuf,
    tx: Sender<String>,
    writer: JoinHandle<Result<usize>>,
}

fn writer_loop(file: File, rx: Receiver<String>, path: PathBuf) -> Result<usize> {
    let mut out = LineWriter::new(file);
    let mut lines = 0_usize;
    while let Ok(hash) = rx.recv() {
        out.write_all(format!("{hash}\n").as_bytes())
            .with_context(|| format!("append {} to {}", hash, path.display()))?;
        lines += 1;
    }
    out.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(lines)
}

impl ResultLog {
    /// Create (or truncate) the file at `path` and start the writer.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("create result log {}", path.display()))?;
        let (tx, rx) = unbounded::<String>();
        let writer_path = path.to_path_buf();
        let writer = thread::Builder::new()
            .name("result-log".to_string())
            .spawn(move || writer_loop(file, rx, writer_path))
            .context("spawn result log writer")?;
        Ok(Self {
            path: path.to_path_buf(),
            tx,
            writer,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sender(&self) -> ResultSender {
        ResultSender(self.tx.clone())
    }

    /// Close the log once every [`ResultSender`] is gone; returns the number of lines written.
    pub fn finish(self) -> Result<usize> {
        drop(self.tx);
        self.writer
            .join()
            .map_err(|_| anyhow!("result log writer panicked"))?
    }
}
