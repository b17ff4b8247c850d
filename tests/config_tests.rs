//! Settings layering (defaults → config file → CLI) and the real daemon client.

use clap::Parser;
use pinbatch::engine::{Cli, build_opts};
use pinbatch::utils::{env_override, load_config_file, wait_from_minutes};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("pinbatch").chain(args.iter().copied()))
}

// --- config file ---

#[test]
fn test_missing_config_file_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(
        load_config_file(&tmp.path().join("config.json"))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_defaults_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let opts = build_opts(&cli(&["pinadd"]), tmp.path()).unwrap();
    assert_eq!(opts.add_workers, 10);
    assert_eq!(opts.pin_add_workers, 10);
    assert_eq!(opts.pin_rm_workers, 10);
    assert_eq!(opts.pin_add_wait, Duration::ZERO);
    assert_eq!(opts.result_log, tmp.path().join("filehashes"));
    assert_eq!(opts.default_add_dir, tmp.path().join("testfiles"));
}

#[test]
fn test_json_config_applies_present_fields_only() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.json"),
        r#"{"add_file_worker_num": 3, "pin_add_wait_time": 2}"#,
    )
    .unwrap();
    let opts = build_opts(&cli(&["add"]), tmp.path()).unwrap();
    assert_eq!(opts.add_workers, 3);
    assert_eq!(opts.pin_add_workers, 10);
    assert_eq!(opts.pin_add_wait, Duration::from_secs(120));
}

#[test]
fn test_malformed_json_config_is_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.json"), "{ add_file_worker_num: 3 ").unwrap();
    assert!(build_opts(&cli(&["add"]), tmp.path()).is_err());
}

#[test]
fn test_negative_worker_count_is_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.json"),
        r#"{"pin_add_file_worker_num": -1}"#,
    )
    .unwrap();
    assert!(build_opts(&cli(&["pinadd"]), tmp.path()).is_err());
}

#[test]
fn test_zero_worker_count_is_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.json"),
        r#"{"add_file_worker_num": 0}"#,
    )
    .unwrap();
    assert!(build_opts(&cli(&["add"]), tmp.path()).is_err());
}

#[test]
fn test_toml_config_by_extension() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("pinbatch.toml");
    fs::write(
        &path,
        "pin_add_file_worker_num = 4\npin_rm_file_worker_num = 2\napi = \"/ip4/10.0.0.2/tcp/5001\"\n",
    )
    .unwrap();
    let path_str = path.to_string_lossy().into_owned();
    let opts = build_opts(&cli(&["--config", &path_str, "pinrm"]), tmp.path()).unwrap();
    assert_eq!(opts.pin_add_workers, 4);
    assert_eq!(opts.pin_rm_workers, 2);
}

#[test]
fn test_explicit_missing_config_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("elsewhere.json");
    let path_str = path.to_string_lossy().into_owned();
    assert!(build_opts(&cli(&["--config", &path_str, "gc"]), tmp.path()).is_err());
}

#[test]
fn test_oversized_wait_in_config_is_fatal() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.json"),
        format!(r#"{{"pin_add_wait_time": {}}}"#, u64::MAX),
    )
    .unwrap();
    let msg = format!("{:#}", build_opts(&cli(&["pinadd"]), tmp.path()).unwrap_err());
    assert!(msg.contains("too large"), "{msg}");
}

#[test]
fn test_wait_from_minutes() {
    assert_eq!(wait_from_minutes(0).unwrap(), Duration::ZERO);
    assert_eq!(wait_from_minutes(3).unwrap(), Duration::from_secs(180));
    assert!(wait_from_minutes(u64::MAX / 60).is_ok());
    assert!(wait_from_minutes(u64::MAX / 60 + 1).is_err());
}

// --- CLI overrides ---

#[test]
fn test_cli_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.json"),
        r#"{"pin_add_file_worker_num": 3, "pin_add_wait_time": 5}"#,
    )
    .unwrap();
    let opts = build_opts(
        &cli(&[
            "pinadd",
            "-w",
            "7",
            "--wait",
            "0",
            "--api",
            "/ip4/127.0.0.1/tcp/5001",
            "--result-log",
            "hashes.txt",
            "-v",
        ]),
        tmp.path(),
    )
    .unwrap();
    assert_eq!(opts.pin_add_workers, 7);
    assert_eq!(opts.pin_add_wait, Duration::ZERO);
    assert_eq!(opts.api, "/ip4/127.0.0.1/tcp/5001");
    assert_eq!(opts.result_log, std::path::PathBuf::from("hashes.txt"));
    assert!(opts.verbose);
}

#[test]
fn test_oversized_wait_flag_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let max = u64::MAX.to_string();
    assert!(build_opts(&cli(&["pinadd", "--wait", &max]), tmp.path()).is_err());
}

#[test]
fn test_cli_add_path_and_workers() {
    let cli = cli(&["add", "some/folder", "--workers", "2"]);
    let tmp = TempDir::new().unwrap();
    let opts = build_opts(&cli, tmp.path()).unwrap();
    assert_eq!(opts.add_workers, 2);
    match cli.command {
        pinbatch::engine::Commands::Add { path, .. } => {
            assert_eq!(path, Some(std::path::PathBuf::from("some/folder")));
        }
        _ => panic!("expected add"),
    }
}

#[test]
fn test_cli_rejects_extra_positional() {
    assert!(Cli::try_parse_from(["pinbatch", "add", "a", "b"]).is_err());
    assert!(Cli::try_parse_from(["pinbatch", "pinadd", "a"]).is_err());
}

// --- .env ---

#[test]
fn test_env_override_from_dotenv_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".env"), "PINBATCH_DOTENV_KEY=from-file\n").unwrap();
    assert_eq!(
        env_override(tmp.path(), "DOTENV_KEY"),
        Some("from-file".to_string())
    );
    assert_eq!(env_override(tmp.path(), "DOTENV_KEY_UNSET"), None);
}

// --- IpfsCli ---

#[cfg(unix)]
mod ipfs_cli {
    use pinbatch::{Daemon, IpfsCli};

    #[test]
    fn test_stdout_is_returned() {
        let daemon = IpfsCli::new("echo", "/ip4/127.0.0.1/tcp/9095");
        let out = daemon.add("/tmp/a.txt").unwrap();
        assert_eq!(out, "--api /ip4/127.0.0.1/tcp/9095 add /tmp/a.txt\n");
    }

    #[test]
    fn test_pin_rm_many_passes_every_hash() {
        let daemon = IpfsCli::new("echo", "/ip4/127.0.0.1/tcp/9095");
        let out = daemon
            .pin_rm_many(&["QmA".to_string(), "QmB".to_string()])
            .unwrap();
        assert_eq!(out.trim_end(), "--api /ip4/127.0.0.1/tcp/9095 pin rm QmA QmB");
    }

    #[test]
    fn test_non_zero_exit_is_an_error() {
        let daemon = IpfsCli::new("false", "/ip4/127.0.0.1/tcp/9095");
        assert!(daemon.repo_gc().is_err());
    }

    #[test]
    fn test_failed_bulk_command_keeps_error_short() {
        let daemon = IpfsCli::new("false", "/ip4/127.0.0.1/tcp/9095");
        let hashes: Vec<String> = (0..3000).map(|i| format!("QmHash{i:05}")).collect();
        let msg = format!("{:#}", daemon.pin_rm_many(&hashes).unwrap_err());
        assert!(msg.contains("pin rm QmHash00000"), "{msg}");
        assert!(msg.contains("(+2994 more)"), "{msg}");
        assert!(!msg.contains("QmHash02999"), "{msg}");
        assert!(msg.len() < 400, "{}", msg.len());
    }

    #[test]
    fn test_missing_binary_is_an_error() {
        let daemon = IpfsCli::new("pinbatch-no-such-binary", "/ip4/127.0.0.1/tcp/9095");
        let msg = format!("{:#}", daemon.pin_add("QmA").unwrap_err());
        assert!(msg.contains("launch"), "{msg}");
    }
}
