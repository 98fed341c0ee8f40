//! In-memory data model: values, fields, categories, and the database.
//!
//! A [`Database`] is built fresh by the loader or the merger and is never
//! mutated afterwards. Categories are kept sorted by name and fields sorted by
//! key; every renderer relies on that order.

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Suffix marking a description companion key (`email_desc` describes `email`).
pub const DESC_SUFFIX: &str = "_desc";

/// A single stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Array(Vec<Value>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// A document shape outside the five above (datetime, inline table),
    /// carried as its generic string form.
    Other(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<toml::Value> for Value {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Integer(i),
            toml::Value::Float(f) => Value::Float(f),
            toml::Value::Boolean(b) => Value::Boolean(b),
            toml::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            toml::Value::Datetime(dt) => Value::Other(dt.to_string()),
            other @ toml::Value::Table(_) => Value::Other(other.to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Display text: the canonical human-readable form used by tables, search,
/// diffing, and env output.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) | Value::Other(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => f.write_str(&display_float(*x)),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Shortest round-trip text, switching to `1e+21` / `1.5e-07` style
/// exponents below 1e-4 and from 1e21 up.
fn display_float(x: f64) -> String {
    if x.is_nan() {
        return "NaN".into();
    }
    if x.is_infinite() {
        return if x > 0.0 { "+Inf".into() } else { "-Inf".into() };
    }
    if x == 0.0 {
        return x.to_string();
    }

    let sci = format!("{x:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return x.to_string();
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    if (-4..21).contains(&exp) {
        x.to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) | Value::Other(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// A single key/value/description entry within a category.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
    pub desc: String,
    /// Name of the containing category.
    pub category: String,
}

impl Field {
    pub fn new(category: &str, key: &str, value: impl Into<Value>) -> Self {
        Self {
            key: key.to_string(),
            value: value.into(),
            desc: String::new(),
            category: category.to_string(),
        }
    }

    pub fn with_desc(mut self, desc: &str) -> Self {
        self.desc = desc.to_string();
        self
    }

    /// Dotted `category.key` path.
    pub fn path(&self) -> String {
        format!("{}.{}", self.category, self.key)
    }

    pub fn is_desc(&self) -> bool {
        is_desc_key(&self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Category {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
        }
    }

    /// Fields that are not description companions.
    pub fn visible_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_desc())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Database {
    pub categories: Vec<Category>,
}

impl Database {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a field by literal `category.key` path. No globbing, and
    /// description companions are returned when asked for by name.
    pub fn get_field(&self, path: &str) -> Option<&Field> {
        let (cat_name, key) = path.split_once('.')?;
        self.get_category(cat_name)?
            .fields
            .iter()
            .find(|f| f.key == key)
    }

    pub fn get_category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Every non-description field, in category order.
    pub fn all_fields(&self) -> Vec<Field> {
        self.categories
            .iter()
            .flat_map(|c| c.visible_fields().cloned())
            .collect()
    }

    /// The description of the field at `path`, or an empty string.
    pub fn describe_field(&self, path: &str) -> &str {
        self.get_field(path).map(|f| f.desc.as_str()).unwrap_or("")
    }

    /// Fields of one category that carry a non-empty description.
    pub fn describe_category(&self, name: &str) -> Vec<Field> {
        self.get_category(name)
            .map(|c| {
                c.visible_fields()
                    .filter(|f| !f.desc.is_empty())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every field in the database that carries a non-empty description.
    pub fn all_descriptions(&self) -> Vec<Field> {
        self.categories
            .iter()
            .flat_map(|c| c.visible_fields().filter(|f| !f.desc.is_empty()).cloned())
            .collect()
    }

    /// Regroup a flat field list into a database. Categories appear in the
    /// order they are first seen; field order within a category is kept.
    pub fn from_fields(fields: &[Field]) -> Self {
        let mut categories: Vec<Category> = Vec::new();
        for field in fields {
            match categories.iter_mut().find(|c| c.name == field.category) {
                Some(cat) => cat.fields.push(field.clone()),
                None => categories.push(Category {
                    name: field.category.clone(),
                    fields: vec![field.clone()],
                }),
            }
        }
        Self { categories }
    }
}

/// Whether `key` is a description companion.
pub fn is_desc_key(key: &str) -> bool {
    key.ends_with(DESC_SUFFIX)
}

/// Strip the description suffix, if present.
pub fn base_key(key: &str) -> &str {
    key.strip_suffix(DESC_SUFFIX).unwrap_or(key)
}

/// Split a `category.key` path, requiring both halves to be non-empty.
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    match path.split_once('.') {
        Some((cat, key)) if !cat.is_empty() && !key.is_empty() => Some((cat, key)),
        _ => None,
    }
}
