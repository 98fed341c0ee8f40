//! Command handlers: run an [`Action`] against the stores and return an
//! [`Outcome`] for the caller to display.
//!
//! Everything the handlers need from the environment (paths, output format,
//! editor) arrives through [`Context`]; nothing here reads process state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{debug, info};

use crate::diff::{diff, import_preview};
use crate::error::DeetsError;
use crate::file::{Paths, load_file};
use crate::format::{
    format_category_json, format_desc_json, format_desc_table, format_diff_json,
    format_diff_table, format_schema_json, format_schema_table, format_table, render_database,
    render_fields,
};
use crate::model::{DESC_SUFFIX, Database, Value, base_key, split_path};
use crate::persist::{remove_category, remove_value, set_typed, set_value, write_document};
use crate::query::is_exact_path;
use crate::schema::build_schema;
use crate::template::{DEFAULT_TEMPLATE, LOCAL_TEMPLATE};
use crate::types::{Action, OutputFormat, ValueSource};

/// Everything a command needs from its invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub paths: Paths,
    /// The effective output format.
    pub format: OutputFormat,
    /// Whether `format` came from `--format` rather than a fallback.
    pub explicit_format: bool,
    /// Suppress confirmations and informational messages.
    pub quiet: bool,
    /// Write to the local store instead of the global one.
    pub local: bool,
    /// Editor command for `edit`, possibly with arguments.
    pub editor: String,
}

/// Result of a command. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Rendered command output.
    Rendered(String),
    /// A store was created by `init`.
    Created { path: PathBuf, global: bool },
    /// Fields were written by `import`.
    Imported { count: usize, path: PathBuf },
    NoDifferences,
    NoChanges,
    /// Nothing to print.
    Silent,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Rendered(text) => f.write_str(text),
            Outcome::Created { path, global } => {
                write!(f, "Created {}", path.display())?;
                if *global {
                    write!(f, "\nEdit it to add your personal details.")?;
                }
                Ok(())
            }
            Outcome::Imported { count, path } => {
                write!(f, "Imported {count} fields into {}", path.display())
            }
            Outcome::NoDifferences => f.write_str("No differences."),
            Outcome::NoChanges => f.write_str("No changes to apply."),
            Outcome::Silent => Ok(()),
        }
    }
}

impl Context {
    fn notice(&self, outcome: Outcome) -> Outcome {
        if self.quiet { Outcome::Silent } else { outcome }
    }

    fn target(&self) -> &Path {
        self.paths.target(self.local)
    }

    fn load(&self) -> Result<Database, DeetsError> {
        self.paths.load()
    }
}

/// Run one action.
pub fn handle(ctx: &Context, action: &Action) -> Result<Outcome, DeetsError> {
    debug!(?action, format = %ctx.format, local = ctx.local, "handling command");
    match action {
        Action::Init => init(ctx),
        Action::Show { category } => show(ctx, category.as_deref()),
        Action::Get {
            pattern,
            default,
            exists,
            desc,
        } => get(ctx, pattern, default.as_deref(), *exists, *desc),
        Action::Set { path, value } => set(ctx, path, value),
        Action::Rm { path } => rm(ctx, path),
        Action::Describe { path, text } => describe(ctx, path.as_deref(), text.as_deref()),
        Action::Search { text } => search(ctx, text),
        Action::Keys => keys(ctx),
        Action::Categories => categories(ctx),
        Action::Export => export(ctx),
        Action::Schema => schema(ctx),
        Action::Diff => diff_stores(ctx),
        Action::Import { file, dry_run } => import(ctx, file, *dry_run),
        Action::Which => which(ctx),
        Action::Edit => edit(ctx),
    }
}

fn init(ctx: &Context) -> Result<Outcome, DeetsError> {
    let path = ctx.target();
    if path.exists() {
        return Err(DeetsError::AlreadyExists(path.to_path_buf()));
    }
    let template = if ctx.local {
        LOCAL_TEMPLATE
    } else {
        DEFAULT_TEMPLATE
    };
    write_document(path, template)?;
    info!(path = %path.display(), "initialized store");
    Ok(ctx.notice(Outcome::Created {
        path: path.to_path_buf(),
        global: !ctx.local,
    }))
}

fn show(ctx: &Context, category: Option<&str>) -> Result<Outcome, DeetsError> {
    let db = ctx.load()?;
    let Some(name) = category else {
        return Ok(Outcome::Rendered(render_database(&db, ctx.format)?));
    };

    let cat = db
        .get_category(name)
        .ok_or_else(|| DeetsError::NotFound(format!("category not found: {name}")))?;
    let text = match ctx.format {
        OutputFormat::Json => format_category_json(cat)?,
        OutputFormat::Table => {
            let fields: Vec<_> = cat.visible_fields().cloned().collect();
            format_table(&fields, false)
        }
        other => render_database(&Database::new(vec![cat.clone()]), other)?,
    };
    Ok(Outcome::Rendered(text))
}

fn get(
    ctx: &Context,
    pattern: &str,
    default: Option<&str>,
    exists: bool,
    desc: bool,
) -> Result<Outcome, DeetsError> {
    let db = ctx.load()?;
    let fields = db.query(pattern);
    let exact = is_exact_path(pattern);

    if fields.is_empty() {
        if let Some(fallback) = default {
            return Ok(Outcome::Rendered(fallback.to_string()));
        }
        if exists {
            return Err(DeetsError::NotFound(String::new()));
        }
        let msg = if exact {
            format!("field not found: {pattern}")
        } else {
            format!("no matches for: {pattern}")
        };
        return Err(DeetsError::NotFound(msg));
    }

    if exists {
        return Ok(Outcome::Silent);
    }

    let structured = ctx.explicit_format && ctx.format != OutputFormat::Table;
    if let [field] = fields.as_slice()
        && exact
        && !structured
    {
        let text = if desc {
            format!("{}\t{}", field.value, field.desc)
        } else {
            field.value.to_string()
        };
        return Ok(Outcome::Rendered(text));
    }

    Ok(Outcome::Rendered(render_fields(&fields, ctx.format, desc)?))
}

fn set(ctx: &Context, path: &str, value: &ValueSource) -> Result<Outcome, DeetsError> {
    let (category, key) = split_path(path).ok_or_else(|| DeetsError::InvalidPath(path.into()))?;
    let ValueSource::Literal(raw) = value else {
        return Err(DeetsError::InvalidValue {
            key: path.into(),
            reason: "value argument required (or pipe from stdin)".into(),
        });
    };
    set_value(ctx.target(), category, key, raw)?;
    Ok(Outcome::Silent)
}

fn rm(ctx: &Context, path: &str) -> Result<Outcome, DeetsError> {
    if path.contains('.') {
        let (category, key) =
            split_path(path).ok_or_else(|| DeetsError::InvalidPath(path.into()))?;
        remove_value(ctx.target(), category, key)?;
    } else {
        remove_category(ctx.target(), path)?;
    }
    Ok(Outcome::Silent)
}

fn describe(ctx: &Context, path: Option<&str>, text: Option<&str>) -> Result<Outcome, DeetsError> {
    if let (Some(path), Some(text)) = (path, text) {
        let (category, key) =
            split_path(path).ok_or_else(|| DeetsError::InvalidPath(path.into()))?;
        // `describe x.k_desc text` describes `k`, not the companion itself.
        let desc_key = format!("{}{DESC_SUFFIX}", base_key(key));
        set_typed(ctx.target(), category, &desc_key, &Value::from(text))?;
        return Ok(Outcome::Silent);
    }

    let db = ctx.load()?;
    let fields = match path {
        None => db.all_descriptions(),
        Some(path) if path.contains('.') => {
            let desc = db.describe_field(path);
            if desc.is_empty() {
                return Err(DeetsError::NotFound(format!("no description for: {path}")));
            }
            return Ok(Outcome::Rendered(desc.to_string()));
        }
        Some(category) => db.describe_category(category),
    };

    if fields.is_empty() {
        return Err(DeetsError::NotFound("no descriptions found".into()));
    }
    let text = match ctx.format {
        OutputFormat::Table => format_desc_table(&fields),
        _ => format_desc_json(&fields)?,
    };
    Ok(Outcome::Rendered(text))
}

fn search(ctx: &Context, text: &str) -> Result<Outcome, DeetsError> {
    let db = ctx.load()?;
    let fields = db.search(text);
    if fields.is_empty() {
        return Err(DeetsError::NotFound(format!("no matches for: {text}")));
    }
    Ok(Outcome::Rendered(render_fields(&fields, ctx.format, false)?))
}

/// One name per line, or a JSON array.
fn name_list(ctx: &Context, names: &[String]) -> Result<Outcome, DeetsError> {
    let text = match ctx.format {
        OutputFormat::Json => serde_json::to_string_pretty(names)?,
        _ => names.join("\n"),
    };
    Ok(Outcome::Rendered(text))
}

fn keys(ctx: &Context) -> Result<Outcome, DeetsError> {
    let db = ctx.load()?;
    let paths: Vec<String> = db.all_fields().iter().map(|f| f.path()).collect();
    name_list(ctx, &paths)
}

fn categories(ctx: &Context) -> Result<Outcome, DeetsError> {
    let db = ctx.load()?;
    let names: Vec<String> = db.category_names().into_iter().map(String::from).collect();
    name_list(ctx, &names)
}

fn export(ctx: &Context) -> Result<Outcome, DeetsError> {
    let db = ctx.load()?;
    let format = match ctx.format {
        OutputFormat::Table => OutputFormat::Json,
        other => other,
    };
    Ok(Outcome::Rendered(render_database(&db, format)?))
}

fn schema(ctx: &Context) -> Result<Outcome, DeetsError> {
    let entries = build_schema(&ctx.load()?);
    let text = match ctx.format {
        OutputFormat::Json => format_schema_json(&entries)?,
        _ => format_schema_table(&entries),
    };
    Ok(Outcome::Rendered(text))
}

fn diff_stores(ctx: &Context) -> Result<Outcome, DeetsError> {
    let local_file = ctx
        .paths
        .local_file
        .as_deref()
        .ok_or(DeetsError::NoLocalStore)?;
    if !ctx.paths.global_file.exists() {
        return Err(DeetsError::NoStore(ctx.paths.global_file.clone()));
    }

    let global = load_file(&ctx.paths.global_file)?;
    let local = load_file(local_file)?;
    let entries = diff(&global, &local);
    if entries.is_empty() {
        return Ok(ctx.notice(Outcome::NoDifferences));
    }

    let text = match ctx.format {
        OutputFormat::Json => format_diff_json(&entries)?,
        _ => format_diff_table(&entries),
    };
    Ok(Outcome::Rendered(text))
}

fn import(ctx: &Context, file: &Path, dry_run: bool) -> Result<Outcome, DeetsError> {
    let incoming = load_file(file)?;

    if dry_run {
        let existing = match ctx.load() {
            Ok(db) => Some(db),
            Err(DeetsError::NoStore(_)) => None,
            Err(e) => return Err(e),
        };
        let entries = import_preview(existing.as_ref(), &incoming);
        if entries.is_empty() {
            return Ok(ctx.notice(Outcome::NoChanges));
        }
        let text = match ctx.format {
            OutputFormat::Json => format_diff_json(&entries)?,
            _ => format_diff_table(&entries),
        };
        return Ok(Outcome::Rendered(text));
    }

    let target = ctx.target();
    let fields = incoming.all_fields();
    for field in &fields {
        set_typed(target, &field.category, &field.key, &field.value)?;
    }
    info!(count = fields.len(), path = %target.display(), "imported fields");
    Ok(ctx.notice(Outcome::Imported {
        count: fields.len(),
        path: target.to_path_buf(),
    }))
}

#[derive(Serialize)]
struct WhichReport<'a> {
    global_dir: &'a Path,
    global_file: &'a Path,
    global_exists: bool,
    local_dir: Option<&'a Path>,
    local_file: Option<&'a Path>,
    has_local: bool,
}

fn which(ctx: &Context) -> Result<Outcome, DeetsError> {
    let paths = &ctx.paths;
    let global_exists = paths.global_file.exists();

    if ctx.explicit_format && ctx.format == OutputFormat::Json {
        let report = WhichReport {
            global_dir: &paths.global_dir,
            global_file: &paths.global_file,
            global_exists,
            local_dir: paths.local_dir.as_deref(),
            local_file: paths.local_file.as_deref(),
            has_local: paths.has_local(),
        };
        return Ok(Outcome::Rendered(serde_json::to_string_pretty(&report)?));
    }

    let global_state = if global_exists { "exists" } else { "not found" };
    let local_line = match (&paths.local_file, &paths.local_dir) {
        (Some(file), _) => format!("{} (active override)", file.display()),
        (None, Some(dir)) => format!("{} (dir exists, no me.toml)", dir.display()),
        (None, None) => "none".to_string(),
    };
    Ok(Outcome::Rendered(format!(
        "Global: {} ({global_state})\nLocal:  {local_line}",
        paths.global_file.display()
    )))
}

fn edit(ctx: &Context) -> Result<Outcome, DeetsError> {
    let path = ctx.target();
    if !path.exists() {
        return Err(DeetsError::NoStore(path.to_path_buf()));
    }

    let mut parts = ctx.editor.split_whitespace();
    let program = parts.next().unwrap_or("vi");
    debug!(program, path = %path.display(), "launching editor");

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| DeetsError::IoError {
            path: PathBuf::from(program),
            source: e,
        })?;
    if !status.success() {
        return Err(DeetsError::EditError {
            path: path.to_path_buf(),
            reason: format!("editor exited with {status}"),
        });
    }
    Ok(Outcome::Silent)
}
