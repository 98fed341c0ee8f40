//! Starter documents for `deets init` and the built-in description table.

/// Default content of a new global store.
pub const DEFAULT_TEMPLATE: &str = r#"# deets: Personal metadata
# Edit this file to add your personal details.
# Any [category] with any key = "value" is valid.
# Add _desc suffix for self-describing fields:
#   orcid = "0000-..."
#   orcid_desc = "ORCID persistent digital identifier"

[identity]
# name = "Your Name"
# name_desc = "Full legal name"
# aka = ["Nickname"]
# aka_desc = "Known aliases and nicknames"
# pronouns = "they/them"

[contact]
# email = "you@example.com"
# email_desc = "Primary email address"

[web]
# github = "username"
# blog = "https://example.com"

[academic]
# orcid = "0000-0000-0000-0000"
# orcid_desc = "ORCID persistent digital identifier"
# institution = "University of..."
# title = "..."
# research_interests = ["topic1", "topic2"]

[education]
# degrees = ["BS Computer Science (University, 2020)"]
# degrees_desc = "Completed degrees with institution and year"
# field = "Computer Science"
# institution = "University of..."
"#;

/// Content of a new local override.
pub const LOCAL_TEMPLATE: &str = r#"# deets: Local project overrides
# Keys here override matching keys from ~/.deets/me.toml
# Only include fields you want to override for this project.
"#;

/// Fallback descriptions for well-known fields, as `(category, key, text)`.
const DEFAULT_DESCRIPTIONS: &[(&str, &str, &str)] = &[
    ("academic", "institution", "Academic institution"),
    ("academic", "orcid", "ORCID persistent digital identifier"),
    ("academic", "research_interests", "Research interest areas"),
    ("academic", "scholar", "Google Scholar ID"),
    ("academic", "title", "Academic title or position"),
    ("contact", "email", "Primary email address"),
    ("contact", "phone", "Phone number"),
    ("education", "degrees", "Completed degrees with institution and year"),
    ("education", "field", "Primary field of study"),
    ("education", "institution", "Degree-granting institution"),
    ("identity", "aka", "Known aliases and nicknames"),
    ("identity", "name", "Full legal name"),
    ("identity", "pronouns", "Personal pronouns"),
    ("web", "blog", "Personal blog URL"),
    ("web", "bluesky", "Bluesky handle"),
    ("web", "github", "GitHub username"),
    ("web", "linkedin", "LinkedIn profile URL"),
    ("web", "mastodon", "Mastodon handle"),
    ("web", "twitter", "Twitter/X handle"),
    ("web", "website", "Personal website URL"),
];

/// Built-in description for a well-known field, if there is one.
pub fn default_description(category: &str, key: &str) -> Option<&'static str> {
    DEFAULT_DESCRIPTIONS
        .iter()
        .find(|(c, k, _)| *c == category && *k == key)
        .map(|(_, _, d)| *d)
}
