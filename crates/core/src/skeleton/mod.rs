//! Skeleton declaration, composition and rendering.
//!
//! A [`SkeletonConfig`] is the declarative record: source directory,
//! variables, required skeletons, template suffix. A [`Skeleton`] is one
//! construction of it, bound to a variable store. Requiring another
//! skeleton means: it renders into the same destination before this one,
//! and it reads and writes this skeleton's variable store.

mod render;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::format::{format_str, FormatError, Formatter};
use crate::store::VarStore;
use crate::vars::{PromptError, PromptInput, Var};

/// File-name suffix marking a content template.
pub const DEFAULT_TEMPLATE_SUFFIX: &str = "_tmpl";

/// Hook run right before a skeleton's own tree renders (its requirements
/// have already rendered). Used to derive variables from other variables.
pub type PrepareFn = fn(&Skeleton) -> Result<(), RenderError>;

/// Everything that can go wrong between "render this skeleton" and a
/// finished destination tree.
///
/// Validation-stage failures abort before anything is written. Walk-stage
/// failures abort the walk but leave already-rendered output in place;
/// there is no rollback.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A declared variable is neither set nor defaulted. Raised by
    /// variable checking before any filesystem mutation.
    #[error("skeleton '{skeleton}' requires variable '{variable}' which is not set and has no default")]
    MissingVariable { skeleton: String, variable: String },

    /// A template file's content could not be formatted.
    #[error("cannot format template {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// A file or directory name could not be formatted.
    #[error("cannot format file name {path}: {source}")]
    FileName {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    /// The declared source directory does not exist on disk.
    #[error("skeleton source directory does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// A source entry's name is not valid unicode and cannot be formatted.
    #[error("source file name is not valid unicode: {0}")]
    NonUnicodeName(PathBuf),

    #[error("failed to walk skeleton source {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// Declarative record for one skeleton kind.
#[derive(Debug, Clone)]
pub struct SkeletonConfig {
    name: String,
    description: Option<String>,
    source: PathBuf,
    variables: Vec<Var>,
    required: Vec<SkeletonConfig>,
    template_suffix: String,
    formatter: Formatter,
    prepare: Option<PrepareFn>,
}

impl SkeletonConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            description: None,
            source: source.into(),
            variables: Vec::new(),
            required: Vec::new(),
            template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
            formatter: format_str,
            prepare: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare one required variable. Declaration order is prompting and
    /// checking order.
    #[must_use]
    pub fn var(mut self, var: Var) -> Self {
        self.variables.push(var);
        self
    }

    #[must_use]
    pub fn with_variables(mut self, vars: impl IntoIterator<Item = Var>) -> Self {
        self.variables.extend(vars);
        self
    }

    /// Require another skeleton. Required skeletons render into the same
    /// destination before this one and share its variable store.
    #[must_use]
    pub fn require(mut self, config: SkeletonConfig) -> Self {
        self.required.push(config);
        self
    }

    #[must_use]
    pub fn with_template_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.template_suffix = suffix.into();
        self
    }

    /// Swap the formatter. The replacement must keep the failure contract:
    /// unknown placeholder fails, no partial output.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_prepare(mut self, prepare: PrepareFn) -> Self {
        self.prepare = Some(prepare);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    #[must_use]
    pub fn variables(&self) -> &[Var] {
        &self.variables
    }

    #[must_use]
    pub fn required(&self) -> &[SkeletonConfig] {
        &self.required
    }

    #[must_use]
    pub fn template_suffix(&self) -> &str {
        &self.template_suffix
    }

    /// Build a skeleton instance with no values preset.
    #[must_use]
    pub fn build(self) -> Skeleton {
        Skeleton::new(self)
    }
}

/// One constructed skeleton: a config bound to a variable store, with its
/// required skeletons instantiated against the same store.
#[derive(Debug)]
pub struct Skeleton {
    config: SkeletonConfig,
    store: VarStore,
    required: Vec<Skeleton>,
}

impl Skeleton {
    #[must_use]
    pub fn new(config: SkeletonConfig) -> Self {
        Self::with_values(config, HashMap::new())
    }

    /// Build with initial variable values, the programmatic equivalent of
    /// answering prompts up front.
    #[must_use]
    pub fn with_values(config: SkeletonConfig, values: HashMap<String, String>) -> Self {
        let store = VarStore::new(config.variables());
        store.update(values);
        Self::assemble(config, store)
    }

    fn derived(config: SkeletonConfig, parent: &VarStore) -> Self {
        let store = VarStore::derived(parent, config.variables());
        Self::assemble(config, store)
    }

    fn assemble(config: SkeletonConfig, store: VarStore) -> Self {
        let required = config
            .required
            .iter()
            .cloned()
            .map(|req| Skeleton::derived(req, &store))
            .collect();
        Self { config, store, required }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn config(&self) -> &SkeletonConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &VarStore {
        &self.store
    }

    /// Required skeleton instances, in declaration order.
    #[must_use]
    pub fn required(&self) -> &[Skeleton] {
        &self.required
    }

    /// Shorthand for [`VarStore::get`] on this skeleton's store.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }

    /// Shorthand for [`VarStore::set`] on this skeleton's store. Visible
    /// to every skeleton of the composition.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.store.set(key, value);
    }

    /// Format a string against this skeleton's store with its formatter.
    ///
    /// # Errors
    ///
    /// [`FormatError`] on unknown placeholders or stray braces.
    pub fn format(&self, template: &str) -> Result<String, FormatError> {
        (self.config.formatter)(template, &self.store)
    }

    /// Absolute check that the source directory exists.
    ///
    /// # Errors
    ///
    /// [`RenderError::SourceNotFound`].
    pub fn source_root(&self) -> Result<PathBuf, RenderError> {
        let source = self.config.source();
        if source.is_dir() {
            Ok(source.to_path_buf())
        } else {
            Err(RenderError::SourceNotFound(source.to_path_buf()))
        }
    }

    /// Fail on the first declared variable without a value: this
    /// skeleton's own variables first, then each required skeleton's, in
    /// declaration order.
    ///
    /// # Errors
    ///
    /// [`RenderError::MissingVariable`] naming skeleton and variable.
    pub fn check_variables(&self) -> Result<(), RenderError> {
        for var in self.config.variables() {
            self.store.required_value(var.name()).map_err(|missing| {
                RenderError::MissingVariable {
                    skeleton: self.config.name.clone(),
                    variable: missing.0,
                }
            })?;
        }
        for req in &self.required {
            req.check_variables()?;
        }
        Ok(())
    }

    /// Prompt for every declared variable not explicitly set, own
    /// variables first, then required skeletons in declaration order.
    /// Defaulted-but-unset variables are still prompted; the default only
    /// resolves an empty response.
    ///
    /// # Errors
    ///
    /// [`PromptError`] if the transport fails.
    pub fn collect_missing(&self, input: &mut dyn PromptInput) -> Result<(), PromptError> {
        for var in self.config.variables() {
            if self.store.is_set(var.name()) {
                debug!("variable '{}' already set, not prompting", var.name());
                continue;
            }
            let value = var.prompt(input)?;
            self.store.set(var.name(), value);
        }
        for req in &self.required {
            req.collect_missing(input)?;
        }
        Ok(())
    }

    /// Render this skeleton (and everything it requires) into `dst`.
    ///
    /// The whole composition is validated first; nothing is written when
    /// any variable anywhere is missing. Required skeletons then render
    /// into the same `dst` before this one, so the requiring skeleton's
    /// files win on path collisions.
    ///
    /// With `dry` set, every filesystem mutation is skipped while
    /// validation, formatting and logging still run.
    ///
    /// # Errors
    ///
    /// See [`RenderError`]. A mid-walk failure leaves already-written
    /// files in place.
    pub fn write(&self, dst: &Path, dry: bool) -> Result<(), RenderError> {
        self.check_variables()?;
        self.write_tree(dst, dry)
    }

    fn write_tree(&self, dst: &Path, dry: bool) -> Result<(), RenderError> {
        for req in &self.required {
            req.write_tree(dst, dry)?;
        }
        if let Some(prepare) = self.config.prepare {
            prepare(self)?;
        }
        info!("rendering skeleton '{}' at {}", self.config.name, dst.display());
        render::render_tree(self, dst, dry)
    }

    /// Like [`Skeleton::write`], but first prompts for missing variables.
    ///
    /// # Errors
    ///
    /// See [`RenderError`].
    pub fn run(
        &self,
        dst: &Path,
        dry: bool,
        input: &mut dyn PromptInput,
    ) -> Result<(), RenderError> {
        self.collect_missing(input)?;
        self.write(dst, dry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::ScriptedInput;
    use std::fs;
    use tempfile::TempDir;

    fn skeleton_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_constructor_values_land_in_store() {
        let src = skeleton_dir(&[]);
        let config = SkeletonConfig::new("demo", src.path()).var(Var::new("a"));
        let skel = Skeleton::with_values(config, values(&[("a", "1")]));
        assert_eq!(skel.get("a"), Some("1".to_string()));
    }

    #[test]
    fn test_check_variables_passes_with_default() {
        let src = skeleton_dir(&[]);
        let config = SkeletonConfig::new("demo", src.path())
            .var(Var::new("a").with_default("d"));
        let skel = config.build();
        skel.check_variables().unwrap();
        assert_eq!(skel.get("a"), Some("d".to_string()));
    }

    #[test]
    fn test_check_variables_names_skeleton_and_variable() {
        let src = skeleton_dir(&[]);
        let config = SkeletonConfig::new("demo", src.path()).var(Var::new("missing"));
        let err = config.build().check_variables().unwrap_err();
        match err {
            RenderError::MissingVariable { skeleton, variable } => {
                assert_eq!(skeleton, "demo");
                assert_eq!(variable, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_own_variables_before_required() {
        let child_src = skeleton_dir(&[]);
        let parent_src = skeleton_dir(&[]);
        let child =
            SkeletonConfig::new("child", child_src.path()).var(Var::new("child_var"));
        let parent = SkeletonConfig::new("parent", parent_src.path())
            .var(Var::new("parent_var"))
            .require(child);

        // Both are missing; the parent's own variable must be reported.
        let err = parent.build().check_variables().unwrap_err();
        match err {
            RenderError::MissingVariable { skeleton, variable } => {
                assert_eq!(skeleton, "parent");
                assert_eq!(variable, "parent_var");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_composition_shares_one_store() {
        let child_src = skeleton_dir(&[]);
        let parent_src = skeleton_dir(&[]);
        let child = SkeletonConfig::new("child", child_src.path());
        let parent = SkeletonConfig::new("parent", parent_src.path()).require(child);
        let skel = parent.build();

        skel.required()[0].set("x", "1");
        assert_eq!(skel.get("x"), Some("1".to_string()));

        skel.set("y", "2");
        assert_eq!(skel.required()[0].get("y"), Some("2".to_string()));

        assert!(skel.store().shares_with(skel.required()[0].store()));
    }

    #[test]
    fn test_parent_constructor_values_reach_child() {
        let child_src = skeleton_dir(&[("child.txt_tmpl", "b={b}")]);
        let parent_src = skeleton_dir(&[("parent.txt_tmpl", "a={a}")]);
        let dst = TempDir::new().unwrap();

        let child = SkeletonConfig::new("child", child_src.path()).var(Var::new("b"));
        let parent = SkeletonConfig::new("parent", parent_src.path())
            .var(Var::new("a"))
            .require(child);
        let skel = Skeleton::with_values(parent, values(&[("a", "1"), ("b", "2")]));

        assert_eq!(skel.get("b"), Some("2".to_string()));
        skel.write(dst.path(), false).unwrap();

        let parent_out = fs::read_to_string(dst.path().join("parent.txt")).unwrap();
        let child_out = fs::read_to_string(dst.path().join("child.txt")).unwrap();
        assert_eq!(parent_out, "a=1");
        assert_eq!(child_out, "b=2");
    }

    #[test]
    fn test_required_renders_first_so_parent_wins_collisions() {
        let child_src = skeleton_dir(&[("shared.txt", "from child")]);
        let parent_src = skeleton_dir(&[("shared.txt", "from parent")]);
        let dst = TempDir::new().unwrap();

        let parent = SkeletonConfig::new("parent", parent_src.path())
            .require(SkeletonConfig::new("child", child_src.path()));
        parent.build().write(dst.path(), false).unwrap();

        let out = fs::read_to_string(dst.path().join("shared.txt")).unwrap();
        assert_eq!(out, "from parent");
    }

    #[test]
    fn test_missing_child_variable_writes_nothing_anywhere() {
        let child_src = skeleton_dir(&[("child.txt", "static")]);
        let parent_src = skeleton_dir(&[("parent.txt", "static")]);
        let dst = TempDir::new().unwrap();

        let child =
            SkeletonConfig::new("child", child_src.path()).var(Var::new("never_set"));
        let parent = SkeletonConfig::new("parent", parent_src.path()).require(child);

        let err = parent.build().write(dst.path(), false).unwrap_err();
        assert!(matches!(err, RenderError::MissingVariable { .. }));
        // Validation covers the whole graph before the first write.
        assert!(!dst.path().join("parent.txt").exists());
        assert!(!dst.path().join("child.txt").exists());
    }

    #[test]
    fn test_collect_missing_prompts_own_then_required_order() {
        let child_src = skeleton_dir(&[]);
        let parent_src = skeleton_dir(&[]);
        let child =
            SkeletonConfig::new("child", child_src.path()).var(Var::new("second"));
        let parent = SkeletonConfig::new("parent", parent_src.path())
            .var(Var::new("first"))
            .require(child);
        let skel = parent.build();

        let mut input = ScriptedInput::new(["one", "two"]);
        skel.collect_missing(&mut input).unwrap();

        assert_eq!(input.prompts, vec!["Enter First", "Enter Second"]);
        assert_eq!(skel.get("first"), Some("one".to_string()));
        assert_eq!(skel.get("second"), Some("two".to_string()));
    }

    #[test]
    fn test_collect_missing_skips_set_but_prompts_defaulted() {
        let src = skeleton_dir(&[]);
        let config = SkeletonConfig::new("demo", src.path())
            .var(Var::new("preset"))
            .var(Var::new("defaulted").with_default("d"));
        let skel = Skeleton::with_values(config, values(&[("preset", "v")]));

        let mut input = ScriptedInput::new(["override"]);
        skel.collect_missing(&mut input).unwrap();

        // Only the defaulted-but-unset variable was prompted.
        assert_eq!(input.prompts, vec!["Enter Defaulted [d]"]);
        assert_eq!(skel.get("preset"), Some("v".to_string()));
        assert_eq!(skel.get("defaulted"), Some("override".to_string()));
    }

    #[test]
    fn test_shared_store_prevents_double_prompting() {
        // Parent and child both declare `author`; the child sees the value
        // collected for the parent through the shared store.
        let child_src = skeleton_dir(&[]);
        let parent_src = skeleton_dir(&[]);
        let child =
            SkeletonConfig::new("child", child_src.path()).var(Var::new("author"));
        let parent = SkeletonConfig::new("parent", parent_src.path())
            .var(Var::new("author"))
            .require(child);
        let skel = parent.build();

        let mut input = ScriptedInput::new(["Ada"]);
        skel.collect_missing(&mut input).unwrap();
        assert_eq!(input.prompts.len(), 1);
    }

    #[test]
    fn test_run_prompts_then_writes() {
        let src = skeleton_dir(&[("{name}.txt_tmpl", "hello {name}")]);
        let dst = TempDir::new().unwrap();
        let config = SkeletonConfig::new("demo", src.path()).var(Var::new("name"));
        let skel = config.build();

        let mut input = ScriptedInput::new(["world"]);
        skel.run(dst.path(), false, &mut input).unwrap();

        let out = fs::read_to_string(dst.path().join("world.txt")).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn test_prepare_hook_derives_variables() {
        fn derive_greeting(skel: &Skeleton) -> Result<(), RenderError> {
            let name = skel.store().get_or("name", "anyone");
            skel.set("greeting", format!("hello {name}"));
            Ok(())
        }

        let src = skeleton_dir(&[("out.txt_tmpl", "{greeting}")]);
        let dst = TempDir::new().unwrap();
        let config = SkeletonConfig::new("demo", src.path())
            .var(Var::new("name"))
            .with_prepare(derive_greeting);
        let skel = Skeleton::with_values(config, values(&[("name", "Ada")]));

        skel.write(dst.path(), false).unwrap();
        let out = fs::read_to_string(dst.path().join("out.txt")).unwrap();
        assert_eq!(out, "hello Ada");
    }

    #[test]
    fn test_source_not_found() {
        let config = SkeletonConfig::new("demo", "/nonexistent/skeleton/source");
        let dst = TempDir::new().unwrap();
        let err = config.build().write(dst.path(), false).unwrap_err();
        assert!(matches!(err, RenderError::SourceNotFound(_)));
    }

    #[test]
    fn test_custom_formatter_is_used() {
        fn shouting(
            template: &str,
            vars: &dyn crate::format::VarLookup,
        ) -> Result<String, FormatError> {
            format_str(template, vars).map(|s| s.to_uppercase())
        }

        let src = skeleton_dir(&[("out.txt_tmpl", "hi {name}")]);
        let dst = TempDir::new().unwrap();
        let config = SkeletonConfig::new("demo", src.path())
            .var(Var::new("name"))
            .with_formatter(shouting);
        let skel = Skeleton::with_values(config, values(&[("name", "ada")]));

        skel.write(dst.path(), false).unwrap();
        // File names run through the same formatter.
        let out = fs::read_to_string(dst.path().join("OUT.TXT")).unwrap();
        assert_eq!(out, "HI ADA");
    }
}
