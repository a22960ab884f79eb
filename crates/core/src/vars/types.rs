//! Variable declaration types and response validation.

use thiserror::Error;

/// An interactive response failed the variable's validation rule.
///
/// Recovered locally by re-prompting; never surfaces to render callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// How responses for a variable are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VarKind {
    /// Any non-empty string is accepted verbatim.
    #[default]
    Text,
    /// Accepts y/yes/n/no (case-insensitive), stored as `"true"`/`"false"`.
    Bool,
}

/// A named, described, optionally defaulted input the rendering requires.
///
/// Names should be `snake_case`: they double as constructor keys and as CLI
/// long options, and templates cannot rely on the formatter reshaping them.
#[derive(Debug, Clone)]
pub struct Var {
    name: String,
    description: Option<String>,
    default: Option<String>,
    intro: Option<String>,
    kind: VarKind,
}

impl Var {
    /// Declare a free-text variable.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default: None,
            intro: None,
            kind: VarKind::Text,
        }
    }

    /// Declare a yes/no variable.
    #[must_use]
    pub fn bool(name: impl Into<String>) -> Self {
        Self { kind: VarKind::Bool, ..Self::new(name) }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Text shown once before the variable is first prompted.
    #[must_use]
    pub fn with_intro(mut self, intro: impl Into<String>) -> Self {
        self.intro = Some(intro.into());
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
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    #[must_use]
    pub fn intro(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Name with underscores replaced by spaces and each word title-cased,
    /// for prompts.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .split('_')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Display name plus parenthesized description if one is set. The bool
    /// kind always carries the `y/N` hint.
    #[must_use]
    pub fn full_description(&self) -> String {
        match (self.kind, &self.description) {
            (VarKind::Text, None) => self.display_name(),
            (VarKind::Text, Some(desc)) => {
                format!("{} ({desc})", self.display_name())
            }
            (VarKind::Bool, None) => format!("{} (y/N)", self.display_name()),
            (VarKind::Bool, Some(desc)) => {
                format!("{} ({desc} - y/N)", self.display_name())
            }
        }
    }

    /// The full prompt line, bracketing the default when one exists.
    #[must_use]
    pub fn prompt_text(&self) -> String {
        let mut text = format!("Enter {}", self.full_description());
        if let Some(default) = &self.default {
            match self.kind {
                VarKind::Text => text.push_str(&format!(" [{default}]")),
                VarKind::Bool => {
                    let shown = if default == "true" { "y" } else { "n" };
                    text.push_str(&format!(" [{shown}]"));
                }
            }
        }
        text
    }

    /// Validate one response, resolving an empty response to the default.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] when the response is empty with no default, or
    /// (bool kind) is not a recognizable yes/no.
    pub fn validate(&self, response: &str) -> Result<String, ValidationError> {
        match self.kind {
            VarKind::Text => {
                if !response.is_empty() {
                    return Ok(response.to_string());
                }
                self.default.clone().ok_or_else(|| self.required_error())
            }
            VarKind::Bool => match response.trim().to_uppercase().as_str() {
                "Y" | "YES" => Ok("true".to_string()),
                "N" | "NO" => Ok("false".to_string()),
                "" => self.default.clone().ok_or_else(|| self.required_error()),
                _ => Err(ValidationError(
                    "enter either \"y\" for yes or \"n\" for no".to_string(),
                )),
            },
        }
    }

    fn required_error(&self) -> ValidationError {
        ValidationError(format!("{} is required", self.display_name()))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
