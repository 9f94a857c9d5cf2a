use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LabError>;

#[derive(Debug, Error)]
pub enum LabError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no simulation with id {0} in history")]
    NotFound(u64),

    #[error("simulation record rejected: {0}")]
    InvalidRecord(String),

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error("input ended unexpectedly")]
    InputClosed,

    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] std::io::Error),
}
