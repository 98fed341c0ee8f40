//! Store editing: patch values into TOML files while preserving formatting.
//!
//! Uses `toml_edit` so comments, ordering, and whitespace of untouched entries
//! survive every edit. Each operation has a pure `*_in_document` form working
//! on a string and an I/O wrapper that reads the file, applies it, and writes
//! the result back, creating parent directories as needed.

use std::path::Path;

use toml_edit::{DocumentMut, Item, Table, TableLike};
use tracing::info;

use crate::error::DeetsError;
use crate::model::{DESC_SUFFIX, Value};

/// Interpret a raw command-line value.
///
/// A value starting with `[` is a TOML array literal and one starting with `"`
/// a TOML string literal. Anything else is stored verbatim as a string.
pub fn parse_raw_value(key: &str, raw: &str) -> Result<toml_edit::Value, DeetsError> {
    if raw.starts_with('[') || raw.starts_with('"') {
        return raw
            .parse::<toml_edit::Value>()
            .map_err(|e| DeetsError::InvalidValue {
                key: key.into(),
                reason: e.to_string().trim().to_string(),
            });
    }
    Ok(toml_edit::Value::from(raw))
}

/// The document form of an already-typed value.
pub fn typed_value(value: &Value) -> toml_edit::Value {
    match value {
        Value::String(s) | Value::Other(s) => toml_edit::Value::from(s.as_str()),
        Value::Integer(i) => toml_edit::Value::from(*i),
        Value::Float(x) => toml_edit::Value::from(*x),
        Value::Boolean(b) => toml_edit::Value::from(*b),
        Value::Array(items) => {
            toml_edit::Value::Array(items.iter().map(typed_value).collect())
        }
    }
}

fn parse(path: &Path, content: &str) -> Result<DocumentMut, DeetsError> {
    content.parse().map_err(|e| DeetsError::DocumentError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn edit_error(path: &Path, reason: String) -> DeetsError {
    DeetsError::EditError {
        path: path.to_path_buf(),
        reason,
    }
}

/// The table for `category`, appending an empty one when `create` is set.
fn category_mut<'a>(
    doc: &'a mut DocumentMut,
    path: &Path,
    category: &str,
    create: bool,
) -> Result<&'a mut dyn TableLike, DeetsError> {
    if !doc.contains_key(category) {
        if !create {
            return Err(edit_error(path, format!("category '{category}' not found")));
        }
        doc.insert(category, Item::Table(Table::new()));
    }
    doc.get_mut(category)
        .and_then(Item::as_table_like_mut)
        .ok_or_else(|| edit_error(path, format!("'{category}' is not a table")))
}

/// Pure function: set `category.key` to `value` in a document string.
///
/// `content` of `None` means the file does not exist yet. A missing category
/// is appended to the end of the document.
pub fn set_in_document(
    path: &Path,
    content: Option<&str>,
    category: &str,
    key: &str,
    value: toml_edit::Value,
) -> Result<String, DeetsError> {
    let mut doc = parse(path, content.unwrap_or(""))?;
    let table = category_mut(&mut doc, path, category, true)?;
    let item = toml_edit::value(value);
    // Assign in place so the key's leading comments stay attached.
    if let Some(existing) = table.get_mut(key) {
        *existing = item;
    } else {
        table.insert(key, item);
    }
    Ok(doc.to_string())
}

/// Pure function: remove `category.key` and its description companion.
/// The category goes too once nothing is left in it.
pub fn remove_in_document(
    path: &Path,
    content: &str,
    category: &str,
    key: &str,
) -> Result<String, DeetsError> {
    let mut doc = parse(path, content)?;
    let table = category_mut(&mut doc, path, category, false)?;
    if table.remove(key).is_none() {
        return Err(edit_error(
            path,
            format!("key '{key}' not found in category '{category}'"),
        ));
    }
    table.remove(&format!("{key}{DESC_SUFFIX}"));

    if table.is_empty() {
        doc.remove(category);
    }
    Ok(doc.to_string())
}

/// Pure function: remove a whole category.
pub fn remove_category_in_document(
    path: &Path,
    content: &str,
    category: &str,
) -> Result<String, DeetsError> {
    let mut doc = parse(path, content)?;
    if doc.remove(category).is_none() {
        return Err(edit_error(path, format!("category '{category}' not found")));
    }
    Ok(doc.to_string())
}

fn read_existing(path: &Path) -> Result<Option<String>, DeetsError> {
    match std::fs::read_to_string(path) {
        Ok(c) => Ok(Some(c)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DeetsError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn read_required(path: &Path) -> Result<String, DeetsError> {
    std::fs::read_to_string(path).map_err(|e| DeetsError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `content` to `path`, creating parent directories.
pub fn write_document(path: &Path, content: &str) -> Result<(), DeetsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DeetsError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| DeetsError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// I/O wrapper: set a value given in its raw command-line form.
pub fn set_value(path: &Path, category: &str, key: &str, raw: &str) -> Result<(), DeetsError> {
    let value = parse_raw_value(&format!("{category}.{key}"), raw)?;
    write_value(path, category, key, value)
}

/// I/O wrapper: set an already-typed value.
pub fn set_typed(path: &Path, category: &str, key: &str, value: &Value) -> Result<(), DeetsError> {
    write_value(path, category, key, typed_value(value))
}

fn write_value(
    path: &Path,
    category: &str,
    key: &str,
    value: toml_edit::Value,
) -> Result<(), DeetsError> {
    let content = read_existing(path)?;
    let updated = set_in_document(path, content.as_deref(), category, key, value)?;
    write_document(path, &updated)?;
    info!(path = %path.display(), category, key, "set value");
    Ok(())
}

/// I/O wrapper for [`remove_in_document`].
pub fn remove_value(path: &Path, category: &str, key: &str) -> Result<(), DeetsError> {
    let content = read_required(path)?;
    let updated = remove_in_document(path, &content, category, key)?;
    write_document(path, &updated)?;
    info!(path = %path.display(), category, key, "removed value");
    Ok(())
}

/// I/O wrapper for [`remove_category_in_document`].
pub fn remove_category(path: &Path, category: &str) -> Result<(), DeetsError> {
    let content = read_required(path)?;
    let updated = remove_category_in_document(path, &content, category)?;
    write_document(path, &updated)?;
    info!(path = %path.display(), category, "removed category");
    Ok(())
}
