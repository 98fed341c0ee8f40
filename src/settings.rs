//! Tool settings, separate from the metadata store itself.
//!
//! Loaded by confique from `DEETS_*` environment variables and an optional
//! `config.toml` in the platform config directory. Environment variables win.

use std::path::PathBuf;

use confique::Config;

use crate::error::DeetsError;
use crate::types::OutputFormat;

#[derive(Config, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding the global store. Defaults to `~/.deets`.
    #[config(env = "DEETS_DIR")]
    pub dir: Option<PathBuf>,

    /// Output format used when `--format` is not given.
    #[config(env = "DEETS_FORMAT")]
    pub format: Option<String>,

    /// Log filter used without `--verbose` (e.g. "warn", "deets=debug").
    #[config(env = "DEETS_LOG", default = "warn")]
    pub log: String,
}

impl Settings {
    /// Load from the environment and the platform settings file, if present.
    pub fn load() -> Result<Self, DeetsError> {
        let mut builder = Settings::builder().env();
        if let Some(path) = settings_file() {
            builder = builder.file(path);
        }
        Ok(builder.load()?)
    }

    /// Load from one settings file only, ignoring the environment.
    #[cfg(test)]
    fn load_from(path: &std::path::Path) -> Result<Self, DeetsError> {
        Ok(Settings::builder().file(path).load()?)
    }

    /// The configured default format, validated.
    pub fn default_format(&self) -> Result<Option<OutputFormat>, DeetsError> {
        self.format
            .as_deref()
            .map(|name| {
                name.parse::<OutputFormat>()
                    .map_err(|_| DeetsError::UnknownFormat(name.to_string()))
            })
            .transpose()
    }
}

/// `<config dir>/deets/config.toml` for the current platform.
pub fn settings_file() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "deets")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
