//! Error types for loading datasets and persisting favorites

use std::path::PathBuf;

/// Failure while reading or decoding a dataset
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no record array in {0}")]
    Shape(String),
}

/// Failure while reading or writing the favorites file
#[derive(thiserror::Error, Debug)]
pub enum FavoritesError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("favorites file is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
}
