use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::DeetsError;

/// How command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Toml,
    Yaml,
    Env,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 5] = ["table", "json", "toml", "yaml", "env"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Toml => "toml",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Env => "env",
        }
    }

    /// Pick the effective format: an explicit choice, else the configured
    /// default, else `table` on a terminal and `json` when piped.
    pub fn resolve(
        explicit: Option<OutputFormat>,
        configured: Option<OutputFormat>,
        is_tty: bool,
    ) -> OutputFormat {
        explicit.or(configured).unwrap_or(if is_tty {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "toml" => Ok(OutputFormat::Toml),
            "yaml" => Ok(OutputFormat::Yaml),
            "env" => Ok(OutputFormat::Env),
            other => Err(DeetsError::UnknownFormat(other.to_string()).to_string()),
        }
    }
}

/// Where the value for `set` comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    Literal(String),
    /// Read from standard input (explicit `-`, or no argument when piped).
    Stdin,
}

/// A deets operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Init,
    Show {
        category: Option<String>,
    },
    Get {
        pattern: String,
        default: Option<String>,
        exists: bool,
        desc: bool,
    },
    Set {
        path: String,
        value: ValueSource,
    },
    Rm {
        path: String,
    },
    Describe {
        path: Option<String>,
        text: Option<String>,
    },
    Search {
        text: String,
    },
    Keys,
    Categories,
    Export,
    Schema,
    Diff,
    Import {
        file: PathBuf,
        dry_run: bool,
    },
    Which,
    Edit,
}
