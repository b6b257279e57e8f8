//! Working-directory resolution.
//!
//! Demos load shaders and other assets through relative paths. These helpers
//! locate the directory that owns those assets and make it the process working
//! directory before anything is loaded.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

/// Errors returned by [`set_working_dir`] and [`ModuleResolver::resolve`].
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("unable to locate `{module}` (searched {} location(s)), it is needed to load assets", .searched.len())]
    NotFound {
        module: String,
        searched: Vec<PathBuf>,
    },

    #[error("unable to change working directory to {}", .dir.display())]
    ChangeDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolves module identifiers (relative directory paths) against an ordered
/// list of search roots.
#[derive(Debug, Clone, Default)]
pub struct ModuleResolver {
    roots: Vec<PathBuf>,
}

impl ModuleResolver {
    /// Search roots, in order:
    /// - `$CARGO_MANIFEST_DIR`, when set (e.g. under `cargo run`)
    /// - the running executable's directory and each of its ancestors
    /// - the current directory and each of its ancestors
    pub fn from_env() -> Self {
        let mut roots = Vec::new();

        if let Some(dir) = env::var_os("CARGO_MANIFEST_DIR") {
            roots.push(PathBuf::from(dir));
        }
        if let Some(exe_dir) = env::current_exe().ok().as_deref().and_then(Path::parent) {
            roots.extend(exe_dir.ancestors().map(Path::to_path_buf));
        }
        if let Ok(cwd) = env::current_dir() {
            roots.extend(cwd.ancestors().map(Path::to_path_buf));
        }

        Self::with_roots(roots)
    }

    pub fn with_roots(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut deduped: Vec<PathBuf> = Vec::new();
        for root in roots {
            if !deduped.contains(&root) {
                deduped.push(root);
            }
        }
        Self { roots: deduped }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Returns the canonical directory for `module`.
    ///
    /// An absolute `module` is accepted as-is if it is a directory; otherwise
    /// the first root `r` for which `r/module` is a directory wins.
    pub fn resolve(&self, module: &str) -> Result<PathBuf, PathError> {
        let wanted = Path::new(module);

        let candidates: Vec<PathBuf> = if wanted.is_absolute() {
            vec![wanted.to_path_buf()]
        } else {
            self.roots.iter().map(|root| root.join(wanted)).collect()
        };

        for candidate in &candidates {
            if candidate.is_dir() {
                let dir = candidate.canonicalize().unwrap_or_else(|_| candidate.clone());
                log::debug!("resolved `{module}` to {}", dir.display());
                return Ok(dir);
            }
        }

        Err(PathError::NotFound {
            module: module.to_string(),
            searched: candidates,
        })
    }
}

/// Resolves `module` with [`ModuleResolver::from_env`] and makes it the
/// process working directory. Returns the new working directory.
pub fn set_working_dir(module: &str) -> Result<PathBuf, PathError> {
    ModuleResolver::from_env().resolve(module).and_then(|dir| change_dir(&dir))
}

fn change_dir(dir: &Path) -> Result<PathBuf, PathError> {
    env::set_current_dir(dir).map_err(|source| PathError::ChangeDir {
        dir: dir.to_path_buf(),
        source,
    })?;
    log::info!("working directory set to {}", dir.display());
    Ok(dir.to_path_buf())
}
