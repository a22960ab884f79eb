//! Placeholder substitution for template strings and file names.
//!
//! Templates use `{name}` placeholders with flat key lookup - no
//! conditionals, loops or expressions. A literal brace is written doubled
//! (`{{` or `}}`); that escaping is a contract on template authors, not
//! something the formatter detects for them.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Formatting either fully succeeds or fails; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A placeholder named a variable absent from the lookup.
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    /// A lone `{{` or `}}` that opens no placeholder and escapes nothing.
    #[error("unbalanced brace; double it ('{{{{' or '}}}}') for a literal brace")]
    UnbalancedBrace,
}

/// Key lookup as the formatter needs it. Implemented by [`crate::VarStore`]
/// and by plain maps, so the formatter stays a pure function.
pub trait VarLookup {
    fn lookup(&self, key: &str) -> Option<String>;
}

impl VarLookup for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Signature every formatter must satisfy. A skeleton may swap in an
/// alternative as long as it keeps the same failure contract: unknown
/// placeholder fails, no partial output.
pub type Formatter = fn(&str, &dyn VarLookup) -> Result<String, FormatError>;

static TOKEN: OnceLock<Regex> = OnceLock::new();

/// Substitute every `{name}` placeholder in `template` from `vars`.
///
/// # Errors
///
/// [`FormatError::UnknownVariable`] if a placeholder has no value,
/// [`FormatError::UnbalancedBrace`] on a stray single brace.
pub fn format_str(template: &str, vars: &dyn VarLookup) -> Result<String, FormatError> {
    let re = TOKEN.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}|\{|\}").expect("valid regex")
    });

    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in re.captures_iter(template) {
        let token = caps.get(0).expect("whole match");
        out.push_str(&template[last..token.start()]);
        last = token.end();

        match token.as_str() {
            "{{" => out.push('{'),
            "}}" => out.push('}'),
            "{" | "}" => return Err(FormatError::UnbalancedBrace),
            _ => {
                let name = caps.get(1).expect("placeholder name").as_str();
                let value = vars
                    .lookup(name)
                    .ok_or_else(|| FormatError::UnknownVariable(name.to_string()))?;
                out.push_str(&value);
            }
        }
    }

    out.push_str(&template[last..]);
    Ok(out)
}
