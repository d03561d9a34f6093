use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading level or config files. All of them are fatal at
/// startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: missing field `{field}`")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: field `{field}` is not an integer: {value:?}")]
    BadNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: unknown entity type {kind:?}")]
    UnknownKind { line: usize, kind: String },

    #[error("no level files found in {dir}")]
    NoLevelFiles { dir: PathBuf },

    #[error("a game needs at least one level")]
    NoLevels,

    #[error("the hole layout has no holes, so no level could be played")]
    NoHoles,

    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}
