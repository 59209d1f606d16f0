//! Generation error types.

use thiserror::Error;

use crate::models::ContentKind;
use crate::templates::Placeholder;

/// Errors raised while drawing or choosing generated content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The bank has no templates for this unit and kind.
    #[error("unit {unit} has no {kind} templates")]
    UnknownUnit { unit: u32, kind: ContentKind },

    /// A placeholder token has no substitution value, or is not one of the
    /// supported tokens.
    #[error("template \"{template}\" cannot be filled: {reason}")]
    MalformedTemplate { template: String, reason: String },

    /// No unit from the starting unit down to unit 1 produced a valid candidate.
    #[error("unable to generate appropriate replacement content (tried units {start_unit} down to 1)")]
    Exhausted { start_unit: u32 },
}

impl GenerateError {
    pub(crate) fn missing_value(template: &str, placeholder: Placeholder) -> Self {
        GenerateError::MalformedTemplate {
            template: template.to_string(),
            reason: format!("no substitution values for {}", placeholder),
        }
    }
}
