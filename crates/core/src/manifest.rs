//! On-disk skeleton manifests.
//!
//! A directory becomes a loadable skeleton by carrying a `skeleton.yaml`
//! next to its template files. The manifest declares the variables (as an
//! ordered sequence - declaration order is prompting order) and the other
//! skeleton directories it requires:
//!
//! ```yaml
//! name: basic-package
//! description: A package with a license layered on top
//! variables:
//!   - name: project_name
//!     description: name of the published project
//!   - name: use_git
//!     kind: bool
//!     default: "false"
//! requires:
//!   - ../licenses/bsd
//! ```
//!
//! `requires` paths are resolved relative to the manifest's directory and
//! loaded recursively.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::skeleton::SkeletonConfig;
use crate::vars::Var;

/// Manifest file name, looked up at a skeleton's source root. Never copied
/// into the rendered tree.
pub const MANIFEST_FILE: &str = "skeleton.yaml";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("no skeleton manifest at {0}")]
    NotFound(PathBuf),

    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Require chains must form a tree; a skeleton cannot require itself,
    /// directly or through intermediaries.
    #[error("skeleton at {0} is required by itself, directly or indirectly")]
    RequireCycle(PathBuf),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    template_suffix: Option<String>,
    #[serde(default)]
    variables: Vec<VarEntry>,
    #[serde(default)]
    requires: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VarEntry {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    intro: Option<String>,
    #[serde(default)]
    kind: EntryKind,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EntryKind {
    #[default]
    Text,
    Bool,
}

impl VarEntry {
    fn into_var(self) -> Var {
        let mut var = match self.kind {
            EntryKind::Text => Var::new(self.name),
            EntryKind::Bool => Var::bool(self.name),
        };
        if let Some(description) = self.description {
            var = var.with_description(description);
        }
        if let Some(default) = self.default {
            var = var.with_default(default);
        }
        if let Some(intro) = self.intro {
            var = var.with_intro(intro);
        }
        var
    }
}

/// Load the skeleton rooted at `dir`, following `requires` recursively.
///
/// # Errors
///
/// [`ManifestError`] on a missing or malformed manifest anywhere in the
/// require tree, or on a require cycle.
pub fn load(dir: &Path) -> Result<SkeletonConfig, ManifestError> {
    let mut loading = Vec::new();
    load_dir(dir, &mut loading)
}

fn load_dir(
    dir: &Path,
    loading: &mut Vec<PathBuf>,
) -> Result<SkeletonConfig, ManifestError> {
    let path = dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(ManifestError::NotFound(path));
    }

    let canonical = fs::canonicalize(dir).map_err(|source| ManifestError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if loading.contains(&canonical) {
        return Err(ManifestError::RequireCycle(canonical));
    }
    loading.push(canonical);

    let raw = fs::read_to_string(&path).map_err(|source| ManifestError::Io {
        path: path.clone(),
        source,
    })?;
    let manifest: Manifest = serde_yaml::from_str(&raw)
        .map_err(|source| ManifestError::Parse { path: path.clone(), source })?;

    let name = manifest.name.unwrap_or_else(|| dir_name(dir));
    let mut config = SkeletonConfig::new(name, dir);
    if let Some(description) = manifest.description {
        config = config.with_description(description);
    }
    if let Some(suffix) = manifest.template_suffix {
        config = config.with_template_suffix(suffix);
    }
    config = config.with_variables(manifest.variables.into_iter().map(VarEntry::into_var));

    for required in manifest.requires {
        let child = load_dir(&dir.join(required), loading)?;
        config = config.require(child);
    }

    loading.pop();
    Ok(config)
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map_or_else(|| "skeleton".to_string(), |name| name.to_string_lossy().into_owned())
}
