use std::path::PathBuf;

/// Failures while reading or writing the save file.
#[derive(Debug, thiserror::Error)]
pub(crate) enum StorageError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("save file {path} is not a valid record: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("save file version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("save file holds an invalid pet: {0}")]
    Invalid(String),

    #[error("could not encode save record: {0}")]
    Encode(#[from] serde_json::Error),
}
