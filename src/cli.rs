//! Clap adapter for deets.
//!
//! Compiled only with the `clap` Cargo feature (on by default). The only
//! bridge to the core is [`Cli::into_action()`], which turns parsed arguments
//! into a framework-agnostic [`Action`]. Everything after that flows through
//! [`ops::handle`](crate::ops::handle).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::{Action, OutputFormat, ValueSource};

/// Self-describing personal metadata store.
#[derive(Debug, Parser)]
#[command(name = "deets", version)]
pub struct Cli {
    /// Output format: table, json, toml, yaml, or env.
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Operate on the local .deets/me.toml in the working directory.
    #[arg(long, global = true)]
    pub local: bool,

    /// Suppress informational messages.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a store from the starter template.
    Init,
    /// Show every field, or one category.
    Show {
        category: Option<String>,
    },
    /// Query fields by path, category, or glob.
    Get {
        /// `category.key`, `category`, or a glob such as `*.orcid`.
        pattern: String,
        /// Print this instead of failing when nothing matches.
        #[arg(long)]
        default: Option<String>,
        /// Print nothing; exit 0 if anything matches, 2 otherwise.
        #[arg(long)]
        exists: bool,
        /// Include descriptions.
        #[arg(long)]
        desc: bool,
    },
    /// Set a field. Reads the value from stdin when it is `-` or omitted.
    Set {
        /// Dotted `category.key` path.
        path: String,
        value: Option<String>,
    },
    /// Remove a field (`category.key`) or a whole category.
    Rm {
        path: String,
    },
    /// List, show, or set field descriptions.
    Describe {
        /// `category.key` or `category`.
        path: Option<String>,
        /// New description for `path`.
        text: Option<String>,
    },
    /// Case-insensitive search over keys, values, and descriptions.
    Search {
        text: String,
    },
    /// List every `category.key` path.
    Keys,
    /// List category names.
    Categories,
    /// Export the whole store.
    Export,
    /// Show each field's inferred type, description, and current value.
    Schema,
    /// Compare the local override against the global store.
    Diff,
    /// Write every field of a TOML file into the store.
    Import {
        file: PathBuf,
        /// Show what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show which store files are in effect.
    Which,
    /// Open the store in $EDITOR.
    Edit,
}

impl Cli {
    /// Convert clap-parsed args into a framework-agnostic [`Action`].
    ///
    /// A `set` value of `-`, or none at all, becomes [`ValueSource::Stdin`].
    pub fn into_action(self) -> Action {
        match self.command {
            Command::Init => Action::Init,
            Command::Show { category } => Action::Show { category },
            Command::Get {
                pattern,
                default,
                exists,
                desc,
            } => Action::Get {
                pattern,
                default,
                exists,
                desc,
            },
            Command::Set { path, value } => {
                let value = match value {
                    Some(v) if v != "-" => ValueSource::Literal(v),
                    _ => ValueSource::Stdin,
                };
                Action::Set { path, value }
            }
            Command::Rm { path } => Action::Rm { path },
            Command::Describe { path, text } => Action::Describe { path, text },
            Command::Search { text } => Action::Search { text },
            Command::Keys => Action::Keys,
            Command::Categories => Action::Categories,
            Command::Export => Action::Export,
            Command::Schema => Action::Schema,
            Command::Diff => Action::Diff,
            Command::Import { file, dry_run } => Action::Import { file, dry_run },
            Command::Which => Action::Which,
            Command::Edit => Action::Edit,
        }
    }
}
