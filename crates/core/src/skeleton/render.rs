//! The source-tree walk that materializes a skeleton at a destination.
//!
//! Every entry name is formatted (names can carry placeholders), files
//! ending in the template suffix additionally have their content formatted,
//! everything else is copied byte for byte. Created entries inherit the
//! POSIX permission bits of their source entry. The walk aborts on the
//! first failure and never rolls back what was already written.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::manifest::MANIFEST_FILE;

use super::{RenderError, Skeleton};

pub(super) fn render_tree(
    skel: &Skeleton,
    dst_root: &Path,
    dry: bool,
) -> Result<(), RenderError> {
    let src_root = skel.source_root()?;
    debug!("rendering source tree {}", src_root.display());

    if !dst_root.exists() {
        mkdir(dst_root, dry)?;
    }

    // Source directory -> rendered destination directory. Needed because a
    // directory name can itself contain placeholders, and everything below
    // it must land under the rendered name.
    let mut dir_map: HashMap<PathBuf, PathBuf> = HashMap::new();
    dir_map.insert(src_root.clone(), dst_root.to_path_buf());

    for entry in WalkDir::new(&src_root).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|err| {
            let path = err.path().map_or_else(|| src_root.clone(), Path::to_path_buf);
            RenderError::Walk { path, source: err }
        })?;
        let src = entry.path();

        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| RenderError::NonUnicodeName(src.to_path_buf()))?;

        // The manifest describes the skeleton; it is never part of the
        // rendered output.
        if entry.depth() == 1 && name == MANIFEST_FILE {
            continue;
        }
        let parent_dst = src
            .parent()
            .and_then(|parent| dir_map.get(parent))
            .cloned()
            .expect("walkdir yields directories before their contents");

        if entry.file_type().is_dir() {
            let dst = parent_dst.join(format_name(skel, name, src)?);
            mkdir(&dst, dry)?;
            copy_mode(src, &dst, dry)?;
            dir_map.insert(src.to_path_buf(), dst);
        } else if let Some(stem) = name.strip_suffix(skel.config().template_suffix()) {
            let dst = parent_dst.join(format_name(skel, stem, src)?);
            render_file(skel, src, &dst, dry)?;
        } else {
            let dst = parent_dst.join(format_name(skel, name, src)?);
            copy_file(src, &dst, dry)?;
        }
    }

    Ok(())
}

fn format_name(skel: &Skeleton, name: &str, src: &Path) -> Result<String, RenderError> {
    skel.format(name).map_err(|source| RenderError::FileName {
        path: src.to_path_buf(),
        source,
    })
}

fn mkdir(path: &Path, dry: bool) -> Result<(), RenderError> {
    info!("creating directory {}", path.display());
    if !dry && !path.exists() {
        fs::create_dir_all(path).map_err(|source| RenderError::Io {
            action: "create directory",
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Format a template file's content into its destination.
fn render_file(
    skel: &Skeleton,
    src: &Path,
    dst: &Path,
    dry: bool,
) -> Result<(), RenderError> {
    info!("creating {} from template {}", dst.display(), src.display());
    let raw = fs::read_to_string(src).map_err(|source| RenderError::Io {
        action: "read template",
        path: src.to_path_buf(),
        source,
    })?;
    let rendered = skel.format(&raw).map_err(|source| RenderError::Template {
        path: src.to_path_buf(),
        source,
    })?;
    if !dry {
        fs::write(dst, rendered).map_err(|source| RenderError::Io {
            action: "write",
            path: dst.to_path_buf(),
            source,
        })?;
    }
    copy_mode(src, dst, dry)
}

/// Byte-for-byte copy for static files.
fn copy_file(src: &Path, dst: &Path, dry: bool) -> Result<(), RenderError> {
    info!("copying {} to {}", src.display(), dst.display());
    if !dry {
        fs::copy(src, dst).map_err(|source| RenderError::Io {
            action: "copy",
            path: src.to_path_buf(),
            source,
        })?;
    }
    copy_mode(src, dst, dry)
}

#[cfg(unix)]
fn copy_mode(src: &Path, dst: &Path, dry: bool) -> Result<(), RenderError> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(src)
        .map_err(|source| RenderError::Io {
            action: "read metadata of",
            path: src.to_path_buf(),
            source,
        })?
        .permissions()
        .mode();
    debug!("setting mode of {} to {:o}", dst.display(), mode);
    if !dry {
        fs::set_permissions(dst, fs::Permissions::from_mode(mode)).map_err(
            |source| RenderError::Io {
                action: "set permissions of",
                path: dst.to_path_buf(),
                source,
            },
        )?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn copy_mode(_src: &Path, _dst: &Path, _dry: bool) -> Result<(), RenderError> {
    Ok(())
}
