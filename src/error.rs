//! Errors raised while loading merge sources.
//!
//! The merge itself is total; only reading files, parsing JSON and typed
//! (de)serialization can fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeOptionsError {
    #[error("[merge-options] Error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[merge-options] Error parsing {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("[merge-options] Required config file not found: {}", path.display())]
    MissingRequired { path: PathBuf },

    #[error("[merge-options] Expected a JSON object in {origin}")]
    NotAnObject { origin: String },

    #[error("[merge-options] Failed to serialize defaults: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("[merge-options] Failed to deserialize merged options: {0}")]
    Deserialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MergeOptionsError>;
