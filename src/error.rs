use std::io;

use thiserror::Error;

/// Failures at the edges of a check run (reading input, loading rules).
/// Parsing agent records and evaluating sessions never fail; see `parse` and `check`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid rule file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid uptime levels '{0}', expected WARN,CRIT in seconds")]
    InvalidLevels(String),
}

pub type Result<T> = std::result::Result<T, Error>;
