//! Daemon stdout parsing. The daemon answers in plain text, so recognition is a prefix
//! check plus a fixed field count behind a swappable [`ResponseParser`].

use crate::utils::config::DaemonDefaults;

/// Turns one raw response into the content hash it reports, if it has the expected shape.
pub trait ResponseParser: Send + Sync {
    fn parse(&self, output: &str) -> Option<String>;
}

/// `added <hash> <name>`: prefix `added`, exactly three whitespace-separated fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddedLineParser;

impl AddedLineParser {
    const FIELDS: usize = 3;
}

impl ResponseParser for AddedLineParser {
    fn parse(&self, output: &str) -> Option<String> {
        if !output.starts_with(DaemonDefaults::ADDED_PREFIX) {
            return None;
        }
        let fields: Vec<&str> = output.split_whitespace().collect();
        if fields.len() != Self::FIELDS {
            return None;
        }
        Some(fields[1].to_string())
    }
}

/// First field of every non-empty line of `pin ls` output (the pinned hashes).
pub fn pinned_hashes(ls_output: &str) -> Vec<String> {
    ls_output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}
