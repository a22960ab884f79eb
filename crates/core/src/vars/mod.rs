//! Variable declarations and interactive completion.
//!
//! A [`Var`] declares one named input a skeleton's templates require, with
//! an optional default, description and intro text. The prompting loop
//! lives here too, driven through the [`PromptInput`] trait so the terminal
//! transport stays a thin external collaborator.

mod prompt;
mod types;

pub use prompt::{PromptError, PromptInput, ScriptedInput};
pub use types::{ValidationError, Var, VarKind};
