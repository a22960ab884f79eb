//! Marker-based insertion into already-rendered files.
//!
//! Skeleton templates can leave `-*- Some Marker -*-` lines behind so later
//! tooling (or a requiring skeleton's prepare hook) can splice content into
//! the rendered output without re-rendering it.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
#[error("failed to {action} {path}: {source}")]
pub struct EditError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// How [`insert_into_file`] treats the marker line.
#[derive(Debug, Clone)]
pub struct InsertOptions {
    /// Text surrounding the marker name on its line.
    pub marker_tag: String,
    /// Indent the inserted text like the marker line.
    pub keep_indent: bool,
    /// Leave the marker line in place above the insertion.
    pub keep_marker: bool,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            marker_tag: "-*-".to_string(),
            keep_indent: true,
            keep_marker: true,
        }
    }
}

/// Insert `text` into the file at every line carrying the marker.
///
/// `text` is inserted as-is; include a trailing newline to keep the
/// following line separate. Returns whether any marker was found (the file
/// is rewritten only then).
///
/// # Errors
///
/// [`EditError`] if the file cannot be read or written.
pub fn insert_into_file(
    path: &Path,
    marker: &str,
    text: &str,
    options: &InsertOptions,
) -> Result<bool, EditError> {
    let needle = format!("{tag} {marker} {tag}", tag = options.marker_tag);
    let content = fs::read_to_string(path).map_err(|source| EditError {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;

    let mut edited = false;
    let mut out = String::with_capacity(content.len() + text.len());

    for line in content.split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        if !bare.contains(&needle) {
            out.push_str(line);
            continue;
        }

        edited = true;
        debug!("inserting at marker '{}' in {}", marker, path.display());

        if options.keep_marker {
            out.push_str(line);
        }
        if options.keep_indent {
            out.extend(bare.chars().take_while(|c| c.is_whitespace()));
        }
        out.push_str(text);
    }

    if edited {
        fs::write(path, out).map_err(|source| EditError {
            action: "write",
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(edited)
}
