// Builds the per-crate filter from the configured level and installs the
// subscriber. Logs go to stderr; stdout only carries the run's outcome lines.

use std::env;

use tracing_subscriber::EnvFilter;

const CRATES: [&str; 4] = [
    "docdb_app",
    "docdb_runner",
    "docdb_infrastructure",
    "docdb_interface",
];

pub fn filter(logger_level: &str) -> String {
    CRATES
        .iter()
        .map(|name| format!("{name}={logger_level}"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn setup(logger_level: &str) {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", filter(logger_level));
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
