//! Error types for the forta-tasks CLI.
//!
//! Uses thiserror for derive macros. Collaborator failures travel through
//! the dispatcher unchanged, so the variant a collaborator picks decides the
//! process exit code.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for forta-tasks operations.
#[derive(Error, Debug)]
pub enum FortaError {
    /// User provided invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// The agent CLI failed or could not be launched.
    #[error("Agent command failed: {0}")]
    CommandFailed(String),

    /// No single agent project could be selected.
    #[error("Agent selection failed: {0}")]
    AgentSelection(String),

    /// The agent project template could not be generated.
    #[error("Template generation failed: {0}")]
    Template(String),
}

impl FortaError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FortaError::UserError(_) => exit_codes::USER_ERROR,
            FortaError::CommandFailed(_) => exit_codes::COMMAND_FAILURE,
            FortaError::AgentSelection(_) => exit_codes::AGENT_SELECTION_FAILURE,
            FortaError::Template(_) => exit_codes::TEMPLATE_FAILURE,
        }
    }
}

/// Result type alias for forta-tasks operations.
pub type Result<T> = std::result::Result<T, FortaError>;
