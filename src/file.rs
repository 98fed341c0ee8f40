//! Store discovery and loading.
//!
//! # Discovery
//!
//! The global store lives at `<home>/.deets/me.toml`, or in the directory set
//! by the `dir` setting. A local override is found by walking from the working
//! directory toward the filesystem root looking for a `.deets` directory. The
//! walk stops *before* the home directory, since `~/.deets` is the global
//! store, and the override only counts when `.deets/me.toml` exists inside it.
//!
//! # Loading
//!
//! Files are read here and handed to [`resolve`](crate::resolve) as
//! `(path, content)` pairs, keeping parsing and merging free of I/O.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DeetsError;
use crate::model::Database;
use crate::resolve::{ResolveInput, parse_document, resolve};

/// Name of the store directory, both globally and per project.
pub const DIR_NAME: &str = ".deets";
/// Name of the store document inside a store directory.
pub const FILE_NAME: &str = "me.toml";

/// Resolved store locations for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub global_dir: PathBuf,
    pub global_file: PathBuf,
    /// The nearest `.deets` directory above the working directory, if any.
    pub local_dir: Option<PathBuf>,
    /// `local_dir/me.toml`, present only when that file exists.
    pub local_file: Option<PathBuf>,
    /// Where `--local` writes go: `<cwd>/.deets/me.toml`.
    pub local_target: PathBuf,
}

impl Paths {
    /// Resolve every path from explicit inputs. `global_dir` overrides the
    /// default `<home>/.deets`.
    pub fn resolve(home: &Path, cwd: &Path, global_dir: Option<&Path>) -> Self {
        let global_dir = global_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| home.join(DIR_NAME));
        let global_file = global_dir.join(FILE_NAME);

        let local_dir = find_local_dir(cwd, home).filter(|dir| *dir != global_dir);
        let local_file = local_dir
            .as_ref()
            .map(|dir| dir.join(FILE_NAME))
            .filter(|file| file.is_file());

        debug!(
            global = %global_file.display(),
            local = ?local_file,
            "resolved store paths"
        );

        Paths {
            global_dir,
            global_file,
            local_dir,
            local_file,
            local_target: cwd.join(DIR_NAME).join(FILE_NAME),
        }
    }

    pub fn has_local(&self) -> bool {
        self.local_file.is_some()
    }

    /// The file a write goes to: the local target with `local`, else the
    /// global file.
    pub fn target(&self, local: bool) -> &Path {
        if local {
            &self.local_target
        } else {
            &self.global_file
        }
    }

    /// Load the merged view. A missing global store is [`DeetsError::NoStore`].
    pub fn load(&self) -> Result<Database, DeetsError> {
        if !self.global_file.exists() {
            return Err(DeetsError::NoStore(self.global_file.clone()));
        }
        load(&self.global_file, self.local_file.as_deref())
    }
}

/// The user's home directory.
pub fn home_dir() -> Result<PathBuf, DeetsError> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(DeetsError::NoHomeDir)
}

/// Walk from `start` toward the root looking for a `.deets` directory,
/// stopping before `home`.
pub fn find_local_dir(start: &Path, home: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current == home {
            return None;
        }

        let candidate = current.join(DIR_NAME);
        if candidate.is_dir() {
            return Some(candidate);
        }

        current = current.parent()?;
    }
}

fn read(path: &Path) -> Result<String, DeetsError> {
    std::fs::read_to_string(path).map_err(|e| DeetsError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read and parse one store document.
pub fn load_file(path: &Path) -> Result<Database, DeetsError> {
    parse_document(path, &read(path)?)
}

/// Read the global store and the optional local override, then merge them.
pub fn load(global: &Path, local: Option<&Path>) -> Result<Database, DeetsError> {
    let input = ResolveInput {
        global: (global.to_path_buf(), read(global)?),
        local: match local {
            Some(path) => Some((path.to_path_buf(), read(path)?)),
            None => None,
        },
    };
    resolve(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use std::fs;
    use tempfile::TempDir;

    /// A fake home inside a temp dir, with a project two levels down.
    struct Layout {
        _root: TempDir,
        home: PathBuf,
        project: PathBuf,
        deep: PathBuf,
    }

    fn layout() -> Layout {
        let root = TempDir::new().unwrap();
        let home = root.path().join("home");
        let project = home.join("project");
        let deep = project.join("src").join("nested");
        fs::create_dir_all(&deep).unwrap();
        Layout {
            _root: root,
            home,
            project,
            deep,
        }
    }

    #[test]
    fn finds_nearest_local_dir() {
        let l = layout();
        fs::create_dir(l.project.join(DIR_NAME)).unwrap();

        let found = find_local_dir(&l.deep, &l.home);
        assert_eq!(found, Some(l.project.join(DIR_NAME)));
    }

    #[test]
    fn deeper_local_dir_wins() {
        let l = layout();
        fs::create_dir(l.project.join(DIR_NAME)).unwrap();
        fs::create_dir(l.deep.join(DIR_NAME)).unwrap();

        assert_eq!(
            find_local_dir(&l.deep, &l.home),
            Some(l.deep.join(DIR_NAME))
        );
    }

    #[test]
    fn walk_stops_before_home() {
        let l = layout();
        fs::create_dir(l.home.join(DIR_NAME)).unwrap();

        assert_eq!(find_local_dir(&l.deep, &l.home), None);
        assert_eq!(find_local_dir(&l.home, &l.home), None);
    }

    #[test]
    fn walk_outside_home_reaches_root() {
        let outside = TempDir::new().unwrap();
        let deep = outside.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();
        fs::create_dir(outside.path().join(DIR_NAME)).unwrap();

        let found = find_local_dir(&deep, Path::new("/nonexistent-home"));
        assert_eq!(found, Some(outside.path().join(DIR_NAME)));
    }

    #[test]
    fn local_file_requires_me_toml() {
        let l = layout();
        fs::create_dir(l.project.join(DIR_NAME)).unwrap();

        let paths = Paths::resolve(&l.home, &l.deep, None);
        assert_eq!(paths.local_dir, Some(l.project.join(DIR_NAME)));
        assert!(!paths.has_local());

        fs::write(l.project.join(DIR_NAME).join(FILE_NAME), "").unwrap();
        let paths = Paths::resolve(&l.home, &l.deep, None);
        assert_eq!(
            paths.local_file,
            Some(l.project.join(DIR_NAME).join(FILE_NAME))
        );
    }

    #[test]
    fn global_paths_default_under_home() {
        let l = layout();
        let paths = Paths::resolve(&l.home, &l.project, None);
        assert_eq!(paths.global_dir, l.home.join(DIR_NAME));
        assert_eq!(paths.global_file, l.home.join(DIR_NAME).join(FILE_NAME));
        assert_eq!(
            paths.local_target,
            l.project.join(DIR_NAME).join(FILE_NAME)
        );
    }

    #[test]
    fn global_dir_override() {
        let l = layout();
        let custom = l.home.join("elsewhere");
        let paths = Paths::resolve(&l.home, &l.project, Some(&custom));
        assert_eq!(paths.global_file, custom.join(FILE_NAME));
        assert_eq!(paths.target(false), custom.join(FILE_NAME).as_path());
        assert_eq!(paths.target(true), paths.local_target.as_path());
    }

    #[test]
    fn override_dir_is_never_its_own_local() {
        let l = layout();
        let store = l.project.join(DIR_NAME);
        fs::create_dir(&store).unwrap();
        fs::write(store.join(FILE_NAME), "[web]\ngithub = \"q\"\n").unwrap();

        let paths = Paths::resolve(&l.home, &l.project, Some(&store));
        assert!(!paths.has_local());
    }

    #[test]
    fn load_without_global_is_no_store() {
        let l = layout();
        let paths = Paths::resolve(&l.home, &l.project, None);
        assert!(matches!(paths.load(), Err(DeetsError::NoStore(_))));
    }

    #[test]
    fn load_merges_local_over_global() {
        let l = layout();
        let global_dir = l.home.join(DIR_NAME);
        let local_dir = l.project.join(DIR_NAME);
        fs::create_dir(&global_dir).unwrap();
        fs::create_dir(&local_dir).unwrap();
        fs::write(
            global_dir.join(FILE_NAME),
            "[identity]\nname = \"Alice\"\npronouns = \"she/her\"\n",
        )
        .unwrap();
        fs::write(local_dir.join(FILE_NAME), "[identity]\nname = \"Bob\"\n").unwrap();

        let db = Paths::resolve(&l.home, &l.deep, None).load().unwrap();
        assert_eq!(
            db.get_field("identity.name").unwrap().value,
            Value::from("Bob")
        );
        assert_eq!(
            db.get_field("identity.pronouns").unwrap().value,
            Value::from("she/her")
        );
    }

    #[test]
    fn load_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        match load_file(&missing) {
            Err(DeetsError::IoError { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected IoError, got {other:?}"),
        }
    }

    #[test]
    fn load_file_syntax_error_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "[identity\n").unwrap();
        assert!(matches!(
            load_file(&path),
            Err(DeetsError::ParseError { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_local_is_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join("local.toml");
        fs::write(&global, "[web]\ngithub = \"q\"\n").unwrap();
        fs::write(&local, "[web]\ngithub = \"r\"\n").unwrap();
        fs::set_permissions(&local, fs::Permissions::from_mode(0o000)).unwrap();

        let result = load(&global, Some(&local));
        fs::set_permissions(&local, fs::Permissions::from_mode(0o644)).unwrap();

        // Permission bits do not restrict root.
        if let Err(e) = result {
            assert!(matches!(e, DeetsError::IoError { .. }));
        }
    }
}
