pub mod config;
pub mod env;
pub mod fd_limit;
pub mod file_config;
pub mod logger;

pub use config::*;
pub use env::{apply_env_to_opts, env_override};
pub use fd_limit::cap_workers;
pub use file_config::{FileConfig, apply_file_to_opts, load_config_file, wait_from_minutes};
pub use logger::setup_logging;
