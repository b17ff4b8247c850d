//! External storage daemon, reached through its command-line client.

use anyhow::{Context, Result, bail};
use log::{debug, trace};
use std::process::{Command, Stdio};

use crate::Opts;
use crate::utils::config::DaemonDefaults;

/// Operations the pipelines invoke on the daemon. Each call is synchronous and returns stdout.
///
/// A launch failure or non-zero exit is an `Err`; callers treat it as fatal to the run.
pub trait Daemon: Send + Sync {
    fn add(&self, path: &str) -> Result<String>;

    fn pin_add(&self, hash: &str) -> Result<String>;

    fn pin_rm(&self, hash: &str) -> Result<String>;

    /// `pin ls --type recursive`: one `<hash> recursive` line per pin.
    fn pin_ls_recursive(&self) -> Result<String>;

    /// Remove several pins in one invocation. Callers keep `hashes` to a bounded chunk.
    fn pin_rm_many(&self, hashes: &[String]) -> Result<String>;

    fn repo_gc(&self) -> Result<String>;
}

/// [`Daemon`] backed by the `ipfs` binary, always pointed at one API endpoint.
#[derive(Clone, Debug)]
pub struct IpfsCli {
    bin: String,
    api: String,
}

impl IpfsCli {
    pub fn new(bin: impl Into<String>, api: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            api: api.into(),
        }
    }

    pub fn from_opts(opts: &Opts) -> Self {
        Self::new(opts.ipfs_bin.clone(), opts.api.clone())
    }

    /// Printable command line for logs and errors. Long argument lists are cut to
    /// [`DaemonDefaults::SHOWN_ARGS`] plus a count of the rest.
    fn command_line(&self, args: &[&str]) -> String {
        let shown = args.len().min(DaemonDefaults::SHOWN_ARGS);
        let mut line = format!("{} --api {} {}", self.bin, self.api, args[..shown].join(" "));
        if args.len() > shown {
            line.push_str(&format!(" ... (+{} more)", args.len() - shown));
        }
        line
    }

    /// Run `<bin> --api <api> <args...>` without a shell and capture stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let cmdline = self.command_line(args);
        trace!("exec: {cmdline}");
        let output = Command::new(&self.bin)
            .arg("--api")
            .arg(&self.api)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("launch `{cmdline}`"))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            bail!("`{}` failed ({}): {}", cmdline, output.status, stderr.trim());
        }
        if !stderr.trim().is_empty() {
            debug!("`{cmdline}` stderr: {}", stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Daemon for IpfsCli {
    fn add(&self, path: &str) -> Result<String> {
        self.run(&["add", path])
    }

    fn pin_add(&self, hash: &str) -> Result<String> {
        self.run(&["pin", "add", hash])
    }

    fn pin_rm(&self, hash: &str) -> Result<String> {
        self.run(&["pin", "rm", hash])
    }

    fn pin_ls_recursive(&self) -> Result<String> {
        self.run(&["pin", "ls", "--type", "recursive"])
    }

    fn pin_rm_many(&self, hashes: &[String]) -> Result<String> {
        let mut args = vec!["pin", "rm"];
        args.extend(hashes.iter().map(String::as_str));
        self.run(&args)
    }

    fn repo_gc(&self) -> Result<String> {
        self.run(&["repo", "gc"])
    }
}
