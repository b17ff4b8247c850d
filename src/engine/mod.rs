//! Engine: command line, daemon client, response parsing, progress.

pub mod arg_parser;
pub mod daemon;
pub mod handlers;
pub mod parser;
pub mod progress;

// Re-export commonly used items
pub use arg_parser::{Cli, Commands};
pub use daemon::{Daemon, IpfsCli};
pub use handlers::{build_opts, handle_run};
pub use parser::{AddedLineParser, ResponseParser, pinned_hashes};
