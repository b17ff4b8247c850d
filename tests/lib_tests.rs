use pinbatch::engine::{AddedLineParser, ResponseParser, pinned_hashes};
use pinbatch::pipeline::{ResultLog, add_items, non_empty_lines, result_log_items};
use pinbatch::utils::cap_workers;
use std::fs;
use std::thread;
use tempfile::TempDir;

// --- AddedLineParser ---

#[test]
fn test_parser_added_line() {
    assert_eq!(
        AddedLineParser.parse("added QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG hello.txt\n"),
        Some("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG".to_string())
    );
}

#[test]
fn test_parser_wrong_prefix() {
    assert_eq!(AddedLineParser.parse("Error: api not running\n"), None);
    assert_eq!(AddedLineParser.parse(" added QmX a.txt"), None);
    assert_eq!(AddedLineParser.parse(""), None);
}

#[test]
fn test_parser_wrong_field_count() {
    assert_eq!(AddedLineParser.parse("added QmX"), None);
    assert_eq!(AddedLineParser.parse("added QmX my file.txt\n"), None);
    // Adding a folder reports one line per entry; not a single-file success.
    assert_eq!(
        AddedLineParser.parse("added QmA dir/a\nadded QmB dir\n"),
        None
    );
}

#[test]
fn test_parser_extra_whitespace() {
    assert_eq!(
        AddedLineParser.parse("added  QmX\ta.txt \n"),
        Some("QmX".to_string())
    );
}

// --- pinned_hashes ---

#[test]
fn test_pinned_hashes_first_field() {
    let out = "QmA recursive\nQmB recursive\n\nQmC recursive\n";
    assert_eq!(pinned_hashes(out), vec!["QmA", "QmB", "QmC"]);
}

#[test]
fn test_pinned_hashes_empty() {
    assert!(pinned_hashes("").is_empty());
    assert!(pinned_hashes("\n\n").is_empty());
}

// --- work sources ---

#[test]
fn test_add_items_directory_sorted_full_paths() {
    let tmp = TempDir::new().unwrap();
    for name in ["c.txt", "a.txt", "b.txt"] {
        fs::write(tmp.path().join(name), name).unwrap();
    }
    fs::create_dir(tmp.path().join("sub")).unwrap();
    fs::write(tmp.path().join("sub").join("nested.txt"), "x").unwrap();

    let items = add_items(tmp.path()).unwrap();
    let expected: Vec<String> = ["a.txt", "b.txt", "c.txt", "sub"]
        .iter()
        .map(|n| tmp.path().join(n).to_string_lossy().into_owned())
        .collect();
    // Immediate entries only; nested.txt is not listed.
    assert_eq!(items, expected);
}

#[test]
fn test_add_items_single_file() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("one.bin");
    fs::write(&file, [0_u8; 4]).unwrap();
    assert_eq!(
        add_items(&file).unwrap(),
        vec![file.to_string_lossy().into_owned()]
    );
}

#[test]
fn test_add_items_missing_path() {
    let tmp = TempDir::new().unwrap();
    assert!(add_items(&tmp.path().join("missing")).is_err());
}

#[test]
fn test_add_items_empty_directory() {
    let tmp = TempDir::new().unwrap();
    assert!(add_items(tmp.path()).unwrap().is_empty());
}

#[test]
fn test_non_empty_lines() {
    assert_eq!(
        non_empty_lines("\n\nQmA\r\n\nQmB\nQmC"),
        vec!["QmA", "QmB", "QmC"]
    );
    assert!(non_empty_lines("").is_empty());
    assert!(non_empty_lines("\n").is_empty());
}

#[test]
fn test_result_log_items_missing_file() {
    let tmp = TempDir::new().unwrap();
    assert!(result_log_items(&tmp.path().join("filehashes")).is_err());
}

// --- ResultLog ---

#[test]
fn test_result_log_truncates_on_create() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("filehashes");
    fs::write(&path, "QmOld\n").unwrap();

    let log = ResultLog::create(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
    assert_eq!(log.finish().unwrap(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_result_log_concurrent_appends_stay_whole_lines() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("filehashes");
    let log = ResultLog::create(&path).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let sender = log.sender();
            thread::spawn(move || {
                for i in 0..100 {
                    sender.append(format!("Qm{t:02}x{i:04}")).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(log.finish().unwrap(), 800);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.ends_with('\n'));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 800);
    assert!(lines.iter().all(|l| l.len() == 9 && l.starts_with("Qm")));
}

#[cfg(target_os = "linux")]
#[test]
fn test_result_log_write_failure_surfaces_on_finish() {
    let log = ResultLog::create(std::path::Path::new("/dev/full")).unwrap();
    let _ = log.sender().append("QmA".to_string());
    let msg = format!("{:#}", log.finish().unwrap_err());
    assert!(msg.contains("append QmA to /dev/full"), "{msg}");
}

// --- worker cap ---

#[test]
fn test_cap_workers_never_raises_or_zeroes() {
    assert_eq!(cap_workers(1), 1);
    let capped = cap_workers(64);
    assert!((1..=64).contains(&capped), "{capped}");
}
