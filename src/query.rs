//! Pattern queries and free-text search over a [`Database`].
//!
//! Patterns take three shapes:
//!
//! - `identity.name`: one field by dotted path
//! - `identity`: every field in a category
//! - `*.orcid`, `web.*`, `ident*`: shell-style globs on either half
//!
//! A glob that fails to compile degrades to literal comparison for that one
//! match; queries never fail.

use glob::{MatchOptions, Pattern};

use crate::model::{Database, Field};

impl Database {
    /// Every non-description field selected by `pattern`, in database order.
    pub fn query(&self, pattern: &str) -> Vec<Field> {
        match pattern.split_once('.') {
            Some((cat_pat, key_pat)) => self
                .categories
                .iter()
                .filter(|c| glob_match(cat_pat, &c.name))
                .flat_map(|c| c.visible_fields().filter(|f| glob_match(key_pat, &f.key)))
                .cloned()
                .collect(),
            None => {
                if let Some(cat) = self.get_category(pattern) {
                    return cat.visible_fields().cloned().collect();
                }
                self.categories
                    .iter()
                    .filter(|c| glob_match(pattern, &c.name))
                    .flat_map(|c| c.visible_fields())
                    .cloned()
                    .collect()
            }
        }
    }

    /// Case-insensitive substring search over keys, display text, and
    /// descriptions.
    pub fn search(&self, text: &str) -> Vec<Field> {
        let needle = text.to_lowercase();
        self.categories
            .iter()
            .flat_map(|c| c.visible_fields())
            .filter(|f| {
                f.key.to_lowercase().contains(&needle)
                    || f.value.to_string().to_lowercase().contains(&needle)
                    || f.desc.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }
}

/// Shell-style match of `text` against `pattern`, or plain equality when the
/// pattern does not compile.
///
/// `*` and `?` never match `/`, runs of `*` act as one, and `[^...]` is a
/// negated class like `[!...]`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    const OPTIONS: MatchOptions = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    match Pattern::new(&normalize(pattern)) {
        Ok(p) => p.matches_with(text, OPTIONS),
        Err(_) => pattern == text,
    }
}

/// Rewrite shell syntax that `glob::Pattern` reads differently: collapse
/// `**` runs outside classes and turn a leading `^` in a class into `!`.
fn normalize(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                out.push('*');
                while chars.next_if_eq(&'*').is_some() {}
            }
            '[' => {
                out.push('[');
                if chars.next_if_eq(&'^').is_some() {
                    out.push('!');
                }
                // A `]` right after the opening bracket is literal.
                if let Some(first) = chars.next() {
                    out.push(first);
                }
                for c in chars.by_ref() {
                    out.push(c);
                    if c == ']' {
                        break;
                    }
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Whether `pattern` names one field exactly, with no glob metacharacters.
pub fn is_exact_path(pattern: &str) -> bool {
    pattern.contains('.') && !pattern.contains(['*', '?', '['])
}
