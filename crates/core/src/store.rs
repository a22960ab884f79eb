//! Two-tier variable store shared across a composed skeleton graph.
//!
//! Explicitly set values live in a map shared (by reference count) with
//! every skeleton instance of one composition; declared defaults live in a
//! per-store map computed from that skeleton's variable list. Reads fall
//! back from the shared layer to the defaults layer; writes only ever touch
//! the shared layer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{Datelike, Utc};
use thiserror::Error;
use tracing::debug;

use crate::format::VarLookup;
use crate::vars::Var;

/// Seeded into every fresh store so license headers and the like can use it.
pub const YEAR_VAR: &str = "year";

/// A variable was read that is neither explicitly set nor defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("variable '{0}' is not set and has no default value")]
pub struct MissingVariable(pub String);

/// Variable store backing one skeleton instance.
///
/// Cloning a `VarStore` clones the handle, not the data: both clones see
/// the same explicitly-set values. Defaults are per-store and are not
/// shared.
#[derive(Debug, Clone)]
pub struct VarStore {
    set: Rc<RefCell<HashMap<String, String>>>,
    defaults: HashMap<String, String>,
}

impl VarStore {
    /// Fresh store for the root of a composition. Seeds the `year`
    /// variable with the current UTC year.
    #[must_use]
    pub fn new(vars: &[Var]) -> Self {
        let mut set = HashMap::new();
        set.insert(YEAR_VAR.to_string(), Utc::now().year().to_string());
        Self {
            set: Rc::new(RefCell::new(set)),
            defaults: defaults_of(vars),
        }
    }

    /// Store for a required skeleton: shares the parent's explicitly-set
    /// map, computes its own defaults from its own variable list. Does not
    /// re-seed `year`.
    #[must_use]
    pub fn derived(parent: &VarStore, vars: &[Var]) -> Self {
        Self {
            set: Rc::clone(&parent.set),
            defaults: defaults_of(vars),
        }
    }

    /// Explicit value if set, declared default otherwise.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.set
            .borrow()
            .get(key)
            .cloned()
            .or_else(|| self.defaults.get(key).cloned())
    }

    /// Like [`VarStore::get`] with a caller-supplied fallback.
    #[must_use]
    pub fn get_or(&self, key: &str, fallback: &str) -> String {
        self.get(key).unwrap_or_else(|| fallback.to_string())
    }

    /// Like [`VarStore::get`], but a missing value is an error.
    ///
    /// # Errors
    ///
    /// [`MissingVariable`] naming the key.
    pub fn required_value(&self, key: &str) -> Result<String, MissingVariable> {
        self.get(key).ok_or_else(|| MissingVariable(key.to_string()))
    }

    /// True iff `key` is explicitly set or has a declared default.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.set.borrow().contains_key(key) || self.defaults.contains_key(key)
    }

    /// True iff `key` is explicitly set, defaults not considered. This is
    /// the test prompting uses: a defaulted-but-unset variable still gets
    /// prompted so the user may override the default.
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.set.borrow().contains_key(key)
    }

    /// Write into the explicitly-set layer. Visible through every store
    /// handle of the composition.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        debug!("setting variable {} = {:?}", key, value);
        self.set.borrow_mut().insert(key, value);
    }

    /// Bulk [`VarStore::set`].
    pub fn update<I>(&self, values: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut set = self.set.borrow_mut();
        for (key, value) in values {
            set.insert(key, value);
        }
    }

    /// Remove an explicitly-set value. A declared default, if any, shows
    /// through again; defaults themselves cannot be removed.
    pub fn unset(&self, key: &str) {
        self.set.borrow_mut().remove(key);
    }

    /// Names that are set or have a default, in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.set.borrow().keys().cloned().collect();
        for key in self.defaults.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys
    }

    /// True iff `other` shares this store's explicitly-set map.
    #[must_use]
    pub fn shares_with(&self, other: &VarStore) -> bool {
        Rc::ptr_eq(&self.set, &other.set)
    }
}

impl VarLookup for VarStore {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
    }
}

fn defaults_of(vars: &[Var]) -> HashMap<String, String> {
    vars.iter()
        .filter_map(|var| {
            var.default().map(|value| (var.name().to_string(), value.to_string()))
        })
        .collect()
}
