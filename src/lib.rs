//! A self-describing personal metadata store backed by TOML files.
//!
//! Deets keeps facts about you (name, ORCID, GitHub handle, research
//! interests) in `~/.deets/me.toml`, one TOML table per category. A project
//! can override any field with its own `.deets/me.toml`; the nearest one above
//! the working directory wins, field by field.
//!
//! ```ignore
//! let paths = Paths::resolve(&home_dir()?, &std::env::current_dir()?, None);
//! let db = paths.load()?;
//! for field in db.query("*.orcid") {
//!     println!("{} = {}", field.path(), field.value);
//! }
//! ```
//!
//! # Store format
//!
//! ```toml
//! [identity]
//! name = "Alexander Towell"
//! name_desc = "Full legal name"
//!
//! [academic]
//! orcid = "0000-0001-2345-6789"
//! research_interests = ["statistics", "machine learning"]
//! ```
//!
//! Each top-level table is a category. A key ending in `_desc` is the
//! description of its sibling rather than a field of its own; fields without
//! one fall back to a built-in description for well-known keys.
//!
//! # Layers
//!
//! ```text
//! Global store          ~/.deets/me.toml (or the `dir` setting)
//!        ↑ overridden by
//! Local override        nearest .deets/me.toml above the working directory
//! ```
//!
//! The local walk stops before the home directory, so `~/.deets` is never
//! treated as its own override. Merging is per field: local fields replace
//! global ones with the same path, and categories from both sides are kept.
//!
//! # Pipeline
//!
//! Reading is split into an I/O shell and a pure core:
//!
//! 1. [`file`] discovers paths and reads documents
//! 2. [`resolve`] parses each document into a [`Database`]
//! 3. [`merge`] layers the local view over the global one
//! 4. [`query`], [`diff`] and [`schema`] derive views from the result
//! 5. [`format`] renders them as table, JSON, TOML, YAML, or env lines
//!
//! Writes go through [`persist`], which edits documents with `toml_edit` so
//! comments and layout of untouched entries survive.
//!
//! # Queries
//!
//! | Pattern | Selects |
//! |---------|---------|
//! | `identity.name` | one field |
//! | `identity` | every field in a category |
//! | `*.orcid`, `web.*` | glob on either half |
//!
//! Malformed globs match literally and never fail.
//!
//! # Commands
//!
//! The core is driven by [`Action`] values through [`ops::handle`], which
//! returns an [`Outcome`] to print. The optional `cli` module (behind the
//! `clap` feature, on by default) maps command-line arguments onto actions.
//! Settings for the tool itself (default format, global directory, log
//! filter) live in [`settings`].
//!
//! # Errors
//!
//! All fallible operations return [`DeetsError`]. "Not found" conditions
//! map to exit status 2, everything else to 1.

pub mod diff;
pub mod error;
pub mod file;
pub mod format;
pub mod merge;
pub mod model;
pub mod ops;
pub mod persist;
pub mod query;
pub mod resolve;
pub mod schema;
pub mod settings;
pub mod template;
pub mod types;

#[cfg(feature = "clap")]
pub mod cli;

#[cfg(test)]
mod fixtures;

pub use error::DeetsError;
pub use model::{Category, Database, Field, Value};
pub use ops::{Context, Outcome};
pub use types::{Action, OutputFormat, ValueSource};
