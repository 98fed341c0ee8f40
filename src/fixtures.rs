#[cfg(test)]
pub mod test {
    use crate::model::{Category, Database, Field, Value};

    /// A store document exercising descriptions, arrays, and numbers.
    pub const SAMPLE_TOML: &str = r#"# deets: Personal metadata

[identity]
name = "Alexander Towell"
name_desc = "Full legal name"
aka = ["Alex Towell"]
pronouns = "he/him"

[web]
github = "queelius"
# blog = "https://example.com"

[academic]
orcid = "0000-0001-2345-6789"
research_interests = ["statistics", "machine learning"]
h_index = 7
gpa = 3.95
tenured = false

[cooking]
# only comments here
"#;

    /// A hand-built database with three categories: academic, identity, web.
    pub fn sample_db() -> Database {
        Database::new(vec![
            Category {
                name: "academic".into(),
                fields: vec![
                    Field::new("academic", "orcid", "0000-0001-2345-6789")
                        .with_desc("ORCID persistent digital identifier"),
                    Field::new(
                        "academic",
                        "research_interests",
                        Value::Array(vec!["statistics".into(), "machine learning".into()]),
                    )
                    .with_desc("Research interest areas"),
                ],
            },
            Category {
                name: "identity".into(),
                fields: vec![
                    Field::new("identity", "aka", Value::Array(vec!["Alex Towell".into()]))
                        .with_desc("Known aliases and nicknames"),
                    Field::new("identity", "name", "Alexander Towell")
                        .with_desc("Full legal name"),
                    Field::new("identity", "pronouns", "he/him"),
                ],
            },
            Category {
                name: "web".into(),
                fields: vec![
                    Field::new("web", "github", "queelius").with_desc("GitHub username"),
                ],
            },
        ])
    }

    /// Build a database from `(category, key, value)` triples, already sorted.
    pub fn db_of(entries: &[(&str, &str, &str)]) -> Database {
        let fields: Vec<Field> = entries
            .iter()
            .map(|(cat, key, value)| Field::new(cat, key, *value))
            .collect();
        Database::from_fields(&fields)
    }

    #[test]
    fn sample_db_is_sorted() {
        let db = sample_db();
        let names = db.category_names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        for cat in &db.categories {
            let keys: Vec<&str> = cat.fields.iter().map(|f| f.key.as_str()).collect();
            let mut sorted = keys.clone();
            sorted.sort();
            assert_eq!(keys, sorted);
        }
    }
}
