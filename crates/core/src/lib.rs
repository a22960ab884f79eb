#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Core library for `skel` - project skeleton rendering.
//!
//! A skeleton is a directory tree of template files plus the variables those
//! templates require. Rendering walks the tree into a destination directory,
//! substituting variables into file names and template contents, prompting
//! for anything left unset. Skeletons compose: a skeleton can require other
//! skeletons, which render into the same destination and share one variable
//! store with it.

pub mod edit;
pub mod format;
pub mod manifest;
pub mod skeleton;
pub mod store;
pub mod vars;

pub use format::{format_str, FormatError, Formatter, VarLookup};
pub use manifest::{ManifestError, MANIFEST_FILE};
pub use skeleton::{
    PrepareFn, RenderError, Skeleton, SkeletonConfig, DEFAULT_TEMPLATE_SUFFIX,
};
pub use store::{MissingVariable, VarStore};
pub use vars::{PromptError, PromptInput, ScriptedInput, ValidationError, Var, VarKind};

#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
