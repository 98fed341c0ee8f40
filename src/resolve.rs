//! Core load pipeline: parse store documents and merge them into one view.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Parse the global document into a `Database`
//! 2. Parse the local override, if any
//! 3. Merge local over global (local wins per field)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use toml::Table;
use tracing::debug;

use crate::error::DeetsError;
use crate::merge::merge;
use crate::model::{Category, DESC_SUFFIX, Database, Field, Value, is_desc_key};
use crate::template::default_description;

/// All pre-loaded documents needed to build the merged view. No I/O happens here.
pub struct ResolveInput {
    /// The global store as `(path, content)`.
    pub global: (PathBuf, String),
    /// The local override as `(path, content)`, when one was found.
    pub local: Option<(PathBuf, String)>,
}

/// Parse both documents and merge the local override on top of the global store.
pub fn resolve(input: ResolveInput) -> Result<Database, DeetsError> {
    let (global_path, global_content) = &input.global;
    let global = parse_document(global_path, global_content)?;

    match &input.local {
        Some((local_path, local_content)) => {
            let local = parse_document(local_path, local_content)?;
            Ok(merge(&global, &local))
        }
        None => Ok(global),
    }
}

/// Parse one store document into a `Database`.
///
/// Each top-level table becomes a category; top-level values that are not
/// tables are skipped. `<key>_desc` siblings supply descriptions, falling
/// back to the built-in table. Categories and keys come out sorted, and
/// categories without any visible field are dropped.
pub fn parse_document(path: &Path, content: &str) -> Result<Database, DeetsError> {
    let raw: Table = toml::from_str(content).map_err(|e| DeetsError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Sorted regardless of which map type backs `toml::Table`.
    let sorted: BTreeMap<String, toml::Value> = raw.into_iter().collect();

    let mut categories = Vec::new();
    for (name, value) in sorted {
        let toml::Value::Table(table) = value else {
            debug!(category = %name, "skipping non-table top-level key");
            continue;
        };
        let category = build_category(&name, table);
        if category.fields.is_empty() {
            debug!(category = %name, "skipping empty category");
            continue;
        }
        categories.push(category);
    }

    debug!(path = %path.display(), categories = categories.len(), "parsed store document");
    Ok(Database::new(categories))
}

fn build_category(name: &str, table: Table) -> Category {
    let sorted: BTreeMap<String, toml::Value> = table.into_iter().collect();

    let fields = sorted
        .iter()
        .filter(|(key, _)| !is_desc_key(key))
        .map(|(key, value)| {
            let companion = sorted
                .get(&format!("{key}{DESC_SUFFIX}"))
                .and_then(|d| d.as_str())
                .unwrap_or("");
            let desc = if companion.is_empty() {
                default_description(name, key).unwrap_or("")
            } else {
                companion
            };
            Field {
                key: key.clone(),
                value: Value::from(value.clone()),
                desc: desc.to_string(),
                category: name.to_string(),
            }
        })
        .collect();

    Category {
        name: name.to_string(),
        fields,
    }
}
