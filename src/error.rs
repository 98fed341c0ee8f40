use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeetsError {
    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to edit {path}: {source}")]
    DocumentError {
        path: PathBuf,
        source: toml_edit::TomlError,
    },

    /// A query, lookup, or description request matched nothing.
    ///
    /// An empty message means the caller asked for a silent probe.
    #[error("{0}")]
    NotFound(String),

    #[error("Invalid path '{0}': expected category.key")]
    InvalidPath(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Cannot edit {path}: {reason}")]
    EditError { path: PathBuf, reason: String },

    #[error("{0} already exists")]
    AlreadyExists(PathBuf),

    #[error("No deets found at {0}; run 'deets init' first")]
    NoStore(PathBuf),

    #[error("No local .deets/me.toml found")]
    NoLocalStore,

    #[error("Could not determine the home directory")]
    NoHomeDir,

    #[error("Unknown format '{0}': expected table, json, toml, yaml, or env")]
    UnknownFormat(String),

    #[error("Failed to serialize JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    SettingsError(#[from] confique::Error),
}

impl DeetsError {
    /// Process exit status for this error. Only "not found" conditions get a
    /// status distinct from generic failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            DeetsError::NotFound(_) => 2,
            _ => 1,
        }
    }

    /// Whether the error should be reported on stderr.
    pub fn is_silent(&self) -> bool {
        matches!(self, DeetsError::NotFound(msg) if msg.is_empty())
    }
}
