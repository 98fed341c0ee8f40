use std::collections::BTreeMap;

use tracing::debug;

use crate::model::{Category, Database, Field};

/// Merge `local` on top of `global`.
///
/// Categories present on one side only pass through unchanged. Categories
/// present on both sides merge per field; a local field replaces the global
/// field with the same key, description included. The result is sorted by
/// category name, then by field key.
pub fn merge(global: &Database, local: &Database) -> Database {
    let mut by_name: BTreeMap<&str, (Option<&Category>, Option<&Category>)> = BTreeMap::new();
    for cat in &global.categories {
        by_name.entry(cat.name.as_str()).or_default().0 = Some(cat);
    }
    for cat in &local.categories {
        by_name.entry(cat.name.as_str()).or_default().1 = Some(cat);
    }

    let categories = by_name
        .into_iter()
        .filter_map(|(name, sides)| match sides {
            (Some(g), None) => Some(g.clone()),
            (None, Some(l)) => Some(l.clone()),
            (Some(g), Some(l)) => {
                debug!(category = name, "merging category present in both stores");
                Some(merge_category(g, l))
            }
            (None, None) => None,
        })
        .collect();

    Database::new(categories)
}

fn merge_category(global: &Category, local: &Category) -> Category {
    let mut fields: BTreeMap<&str, &Field> = BTreeMap::new();
    for f in &global.fields {
        fields.insert(f.key.as_str(), f);
    }
    for f in &local.fields {
        fields.insert(f.key.as_str(), f);
    }

    Category {
        name: global.name.clone(),
        fields: fields.into_values().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{db_of, sample_db};
    use crate::model::Value;

    #[test]
    fn local_field_wins() {
        let global = db_of(&[("identity", "name", "Alice"), ("identity", "pronouns", "she/her")]);
        let local = db_of(&[("identity", "name", "Bob")]);
        let merged = merge(&global, &local);

        let identity = merged.get_category("identity").unwrap();
        assert_eq!(identity.fields.len(), 2);
        assert_eq!(
            merged.get_field("identity.name").unwrap().value,
            Value::from("Bob")
        );
        assert_eq!(
            merged.get_field("identity.pronouns").unwrap().value,
            Value::from("she/her")
        );
    }

    #[test]
    fn local_description_replaces_global() {
        let mut global = db_of(&[("web", "github", "old")]);
        global.categories[0].fields[0].desc = "Global desc".into();
        let mut local = db_of(&[("web", "github", "new")]);
        local.categories[0].fields[0].desc = "Local desc".into();

        let merged = merge(&global, &local);
        assert_eq!(merged.describe_field("web.github"), "Local desc");
    }

    #[test]
    fn disjoint_categories_are_kept() {
        let global = db_of(&[("identity", "name", "Alice")]);
        let local = db_of(&[("cooking", "fav", "lasagna")]);
        let merged = merge(&global, &local);
        assert_eq!(merged.category_names(), vec!["cooking", "identity"]);
    }

    #[test]
    fn category_union_is_sorted() {
        let global = db_of(&[("academic", "orcid", "1"), ("web", "github", "q")]);
        let local = db_of(&[("identity", "name", "B"), ("zoo", "animal", "yak")]);
        let merged = merge(&global, &local);
        assert_eq!(
            merged.category_names(),
            vec!["academic", "identity", "web", "zoo"]
        );
    }

    #[test]
    fn merged_keys_are_sorted() {
        let global = db_of(&[("identity", "b", "1"), ("identity", "d", "2")]);
        let local = db_of(&[("identity", "a", "3"), ("identity", "c", "4")]);
        let merged = merge(&global, &local);
        let keys: Vec<&str> = merged.categories[0]
            .fields
            .iter()
            .map(|f| f.key.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn merge_with_self_is_identity() {
        let db = sample_db();
        assert_eq!(merge(&db, &db), db);
    }

    #[test]
    fn empty_inputs() {
        let db = sample_db();
        let empty = Database::default();
        assert_eq!(merge(&empty, &empty), empty);
        assert_eq!(merge(&db, &empty), db);
        assert_eq!(merge(&empty, &db), db);
    }
}
