//! Command handlers: build the run settings (defaults → config file → env → CLI), then run one command.

use anyhow::{Context, Result, bail};
use log::debug;
use std::path::Path;

use crate::Opts;
use crate::engine::arg_parser::{Cli, Commands};
use crate::engine::daemon::IpfsCli;
use crate::pipeline::{RunContext, run_add, run_gc, run_pin_add, run_pin_rm, run_rm_all};
use crate::utils::config::PackagePaths;
use crate::utils::{
    apply_env_to_opts, apply_file_to_opts, load_config_file, setup_logging, wait_from_minutes,
};

/// Flags given on the command line win over everything else.
fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) -> Result<()> {
    if let Some(api) = &cli.api {
        opts.api = api.clone();
    }
    if let Some(bin) = &cli.ipfs_bin {
        opts.ipfs_bin = bin.clone();
    }
    if let Some(path) = &cli.result_log {
        opts.result_log = path.clone();
    }
    opts.verbose = cli.verbose;
    match &cli.command {
        Commands::Add {
            workers: Some(n), ..
        } => opts.add_workers = *n,
        Commands::Pinadd { workers, wait } => {
            if let Some(n) = workers {
                opts.pin_add_workers = *n;
            }
            if let Some(minutes) = wait {
                opts.pin_add_wait = wait_from_minutes(*minutes).context("--wait")?;
            }
        }
        Commands::Pinrm { workers: Some(n) } => opts.pin_rm_workers = *n,
        _ => {}
    }
    Ok(())
}

fn validate_opts(opts: &Opts) -> Result<()> {
    for (name, n) in [
        ("add_file_worker_num", opts.add_workers),
        ("pin_add_file_worker_num", opts.pin_add_workers),
        ("pin_rm_file_worker_num", opts.pin_rm_workers),
    ] {
        if n == 0 {
            bail!("{name} must be at least 1");
        }
    }
    if opts.api.trim().is_empty() {
        bail!("daemon api endpoint is empty");
    }
    Ok(())
}

/// Resolve run settings for `cli` relative to `work_dir`.
///
/// A missing default config file means defaults; a missing `--config` file, or any
/// unreadable or malformed one, is an error.
pub fn build_opts(cli: &Cli, work_dir: &Path) -> Result<Opts> {
    let mut opts = Opts::with_work_dir(work_dir);
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| work_dir.join(PackagePaths::get().config_filename()));
    match load_config_file(&config_path)? {
        Some(file) => {
            debug!("config from {}: {:?}", config_path.display(), file);
            apply_file_to_opts(&file, &mut opts)?;
        }
        None if cli.config.is_some() => {
            bail!("config file {} not found", config_path.display())
        }
        None => debug!("no config at {}, using defaults", config_path.display()),
    }
    apply_env_to_opts(work_dir, &mut opts);
    apply_cli_to_opts(cli, &mut opts)?;
    validate_opts(&opts)?;
    Ok(opts)
}

/// Run the selected command against the real daemon.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose);
    let work_dir = std::env::current_dir().context("resolve working directory")?;
    let opts = build_opts(cli, &work_dir)?;
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        opts
    );

    let ctx = RunContext::new(opts);
    ctx.install_ctrlc_handler()?;
    let daemon = IpfsCli::from_opts(&ctx.opts);

    match &cli.command {
        Commands::Add { path, .. } => run_add(&ctx, &daemon, path.as_deref()).map(|_| ()),
        Commands::Pinadd { .. } => run_pin_add(&ctx, &daemon).map(|_| ()),
        Commands::Pinrm { .. } => run_pin_rm(&ctx, &daemon).map(|_| ()),
        Commands::Rmall => run_rm_all(&daemon).map(|_| ()),
        Commands::Gc => run_gc(&daemon),
    }
}
