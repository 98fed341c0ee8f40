//! Rendering of databases, field lists, descriptions, diffs, and schemas.
//!
//! Every renderer is a pure function of its input and walks it in order, so
//! output is deterministic. Tables share one layout: columns padded to the
//! widest cell, four spaces between columns, a `─` rule under the header, and
//! an unpadded last column.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::diff::DiffEntry;
use crate::error::DeetsError;
use crate::model::{Category, Database, Field, Value};
use crate::schema::SchemaEntry;
use crate::types::OutputFormat;

const COLUMN_GAP: &str = "    ";
const RULE: char = '\u{2500}';

/// Render the whole database in `format`. A table lists every field.
pub fn render_database(db: &Database, format: OutputFormat) -> Result<String, DeetsError> {
    match format {
        OutputFormat::Table => Ok(format_table(&db.all_fields(), false)),
        OutputFormat::Json => format_json(db),
        OutputFormat::Toml => Ok(format_toml(db)),
        OutputFormat::Yaml => Ok(format_yaml(db)),
        OutputFormat::Env => Ok(format_env(db)),
    }
}

/// Render a field list, such as query or search results, in `format`.
pub fn render_fields(
    fields: &[Field],
    format: OutputFormat,
    with_desc: bool,
) -> Result<String, DeetsError> {
    match format {
        OutputFormat::Table => Ok(format_table(fields, with_desc)),
        OutputFormat::Json => format_fields_json(fields, with_desc),
        other => render_database(&Database::from_fields(fields), other),
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Lay out `rows` under `headers`. Empty input renders as an empty string.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| RULE.to_string().repeat(*w)).collect();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut out = String::new();
    for row in [&header, &rule].into_iter().chain(rows) {
        let last = row.len().saturating_sub(1);
        for (i, (cell, width)) in row.iter().zip(widths.iter().copied()).enumerate() {
            if i == last {
                out.push_str(cell);
            } else {
                out.push_str(&format!("{cell:<width$}{COLUMN_GAP}"));
            }
        }
        out.push('\n');
    }
    out
}

fn spans_categories(fields: &[Field]) -> bool {
    fields
        .first()
        .is_some_and(|first| fields.iter().any(|f| f.category != first.category))
}

/// Field table. The Category column appears only when the fields span more
/// than one category; the Description column only when `with_desc` is set.
pub fn format_table(fields: &[Field], with_desc: bool) -> String {
    let multi = spans_categories(fields);

    let mut headers = Vec::with_capacity(4);
    if multi {
        headers.push("Category");
    }
    headers.extend(["Key", "Value"]);
    if with_desc {
        headers.push("Description");
    }

    let rows: Vec<Vec<String>> = fields
        .iter()
        .map(|f| {
            let mut row = Vec::with_capacity(4);
            if multi {
                row.push(f.category.clone());
            }
            row.push(f.key.clone());
            row.push(f.value.to_string());
            if with_desc {
                row.push(f.desc.clone());
            }
            row
        })
        .collect();

    render_table(&headers, &rows)
}

pub fn format_desc_table(fields: &[Field]) -> String {
    let rows: Vec<Vec<String>> = fields
        .iter()
        .map(|f| vec![f.path(), f.desc.clone()])
        .collect();
    render_table(&["Field", "Description"], &rows)
}

pub fn format_diff_table(entries: &[DiffEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.path.clone(),
                e.status.to_string(),
                e.global.clone(),
                e.local.clone(),
            ]
        })
        .collect();
    render_table(&["Path", "Status", "Global", "Local"], &rows)
}

pub fn format_schema_table(entries: &[SchemaEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.category.clone(),
                e.key.clone(),
                e.type_tag.to_string(),
                e.description.clone(),
                e.example.clone(),
            ]
        })
        .collect();
    render_table(&["Category", "Key", "Type", "Description", "Example"], &rows)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// A JSON object that serializes its entries in insertion order.
struct OrderedMap<V>(Vec<(String, V)>);

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct Described<'a> {
    value: &'a Value,
    description: &'a str,
}

/// A field's JSON payload: the raw value, or `{value, description}`.
enum Entry<'a> {
    Plain(&'a Value),
    Described(Described<'a>),
}

impl Serialize for Entry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Entry::Plain(v) => v.serialize(serializer),
            Entry::Described(d) => d.serialize(serializer),
        }
    }
}

fn field_map<'a>(
    fields: impl IntoIterator<Item = &'a Field>,
    with_desc: bool,
) -> OrderedMap<Entry<'a>> {
    OrderedMap(
        fields
            .into_iter()
            .filter(|f| !f.is_desc())
            .map(|f| {
                let entry = if with_desc {
                    Entry::Described(Described {
                        value: &f.value,
                        description: &f.desc,
                    })
                } else {
                    Entry::Plain(&f.value)
                };
                (f.key.clone(), entry)
            })
            .collect(),
    )
}

fn to_json<T: Serialize>(value: &T) -> Result<String, DeetsError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// The whole database as `{category: {key: value}}`. Categories without any
/// visible field are left out.
pub fn format_json(db: &Database) -> Result<String, DeetsError> {
    let root = OrderedMap(
        db.categories
            .iter()
            .map(|c| (c.name.clone(), field_map(&c.fields, false)))
            .filter(|(_, fields)| !fields.0.is_empty())
            .collect(),
    );
    to_json(&root)
}

/// One category as a flat `{key: value}` object.
pub fn format_category_json(category: &Category) -> Result<String, DeetsError> {
    to_json(&field_map(&category.fields, false))
}

/// A field list as JSON. Fields from a single category produce a flat object;
/// otherwise they are grouped by category in first-seen order.
pub fn format_fields_json(fields: &[Field], with_desc: bool) -> Result<String, DeetsError> {
    if !spans_categories(fields) {
        return to_json(&field_map(fields, with_desc));
    }

    let mut groups: Vec<(String, Vec<&Field>)> = Vec::new();
    for f in fields {
        match groups.iter_mut().find(|(name, _)| *name == f.category) {
            Some((_, members)) => members.push(f),
            None => groups.push((f.category.clone(), vec![f])),
        }
    }
    let root = OrderedMap(
        groups
            .into_iter()
            .map(|(name, members)| (name, field_map(members, with_desc)))
            .collect(),
    );
    to_json(&root)
}

/// Descriptions as a flat `{"category.key": description}` object.
pub fn format_desc_json(fields: &[Field]) -> Result<String, DeetsError> {
    let map = OrderedMap(
        fields
            .iter()
            .map(|f| (f.path(), f.desc.as_str()))
            .collect(),
    );
    to_json(&map)
}

pub fn format_diff_json(entries: &[DiffEntry]) -> Result<String, DeetsError> {
    to_json(&entries)
}

pub fn format_schema_json(entries: &[SchemaEntry]) -> Result<String, DeetsError> {
    to_json(&entries)
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

/// The database as a TOML document that reloads to the same fields.
/// Descriptions are not written.
pub fn format_toml(db: &Database) -> String {
    let mut out = String::new();
    for (i, cat) in db.categories.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", toml_key(&cat.name)));
        for f in cat.visible_fields() {
            out.push_str(&format!(
                "{} = {}\n",
                toml_key(&f.key),
                format_value_toml(&f.value)
            ));
        }
    }
    out
}

/// The TOML literal for one value.
pub fn format_value_toml(value: &Value) -> String {
    match value {
        Value::String(s) | Value::Other(s) => quote(s),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_value_toml).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Integer(i) => i.to_string(),
        Value::Float(x) => toml_float(*x),
        Value::Boolean(b) => b.to_string(),
    }
}

fn toml_float(x: f64) -> String {
    if x.is_nan() {
        return "nan".into();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf".into() } else { "-inf".into() };
    }
    let s = x.to_string();
    if s.contains(['.', 'e', 'E']) {
        s
    } else {
        format!("{s}.0")
    }
}

fn toml_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare { key.to_string() } else { quote(key) }
}

/// Double-quote `s` with backslash escapes, valid as a TOML basic string.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ---------------------------------------------------------------------------
// YAML
// ---------------------------------------------------------------------------

/// The database as a YAML mapping of categories. Descriptions are not written.
pub fn format_yaml(db: &Database) -> String {
    let mut out = String::new();
    for (i, cat) in db.categories.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{}:\n", cat.name));
        for f in cat.visible_fields() {
            out.push_str(&format!("  {}: {}\n", f.key, yaml_value(&f.value)));
        }
    }
    out
}

fn yaml_value(value: &Value) -> String {
    match value {
        Value::String(s) | Value::Other(s) => {
            if yaml_needs_quoting(s) {
                quote(s)
            } else {
                s.clone()
            }
        }
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(yaml_value).collect();
            format!("[{}]", parts.join(", "))
        }
        other => other.to_string(),
    }
}

/// Whether a plain scalar would be misread by a YAML parser.
fn yaml_needs_quoting(s: &str) -> bool {
    const RESERVED: &[&str] = &["true", "false", "yes", "no", "on", "off", "null", "~"];
    const SPECIAL: &[char] = &[
        ':', '#', '[', ']', '{', '}', ',', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
    ];

    if s.is_empty() {
        return true;
    }
    let lower = s.to_lowercase();
    if RESERVED.contains(&lower.as_str()) {
        return true;
    }
    s.starts_with(' ') || s.ends_with(' ') || s.contains(SPECIAL)
}

// ---------------------------------------------------------------------------
// Env
// ---------------------------------------------------------------------------

/// One `DEETS_<CATEGORY>_<KEY>="<display text>"` line per field.
pub fn format_env(db: &Database) -> String {
    db.all_fields()
        .iter()
        .map(|f| {
            format!(
                "DEETS_{}_{}={}\n",
                f.category.to_uppercase(),
                f.key.to_uppercase(),
                quote(&f.value.to_string())
            )
        })
        .collect()
}
