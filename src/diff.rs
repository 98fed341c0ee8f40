//! Field-level comparison between two databases.
//!
//! Comparison is on display text, so `1` and `"1"` count as equal.

use std::fmt;

use serde::Serialize;

use crate::model::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffStatus {
    /// The local store overrides a global value with a different one.
    Override,
    /// The field exists only in the local store.
    LocalOnly,
    /// An import would replace an existing value.
    Change,
    /// An import would add a new field.
    Add,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::Override => "override",
            DiffStatus::LocalOnly => "local-only",
            DiffStatus::Change => "change",
            DiffStatus::Add => "add",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One differing field. `global` holds the existing display text and is
/// empty for `local-only` and `add` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    pub path: String,
    pub status: DiffStatus,
    pub global: String,
    pub local: String,
}

/// Local fields that differ from, or are missing in, the global store.
/// Entries follow local database order.
pub fn diff(global: &Database, local: &Database) -> Vec<DiffEntry> {
    compare(Some(global), local, DiffStatus::Override, DiffStatus::LocalOnly)
}

/// What importing `incoming` would do to `existing`. With no existing store,
/// every incoming field is an addition.
pub fn import_preview(existing: Option<&Database>, incoming: &Database) -> Vec<DiffEntry> {
    compare(existing, incoming, DiffStatus::Change, DiffStatus::Add)
}

fn compare(
    base: Option<&Database>,
    other: &Database,
    changed: DiffStatus,
    missing: DiffStatus,
) -> Vec<DiffEntry> {
    other
        .all_fields()
        .into_iter()
        .filter_map(|field| {
            let path = field.path();
            let local = field.value.to_string();
            let existing = base.and_then(|db| db.get_field(&path));
            match existing {
                Some(existing) => {
                    let global = existing.value.to_string();
                    (global != local).then(|| DiffEntry {
                        path,
                        status: changed,
                        global,
                        local,
                    })
                }
                None => Some(DiffEntry {
                    path,
                    status: missing,
                    global: String::new(),
                    local,
                }),
            }
        })
        .collect()
}
