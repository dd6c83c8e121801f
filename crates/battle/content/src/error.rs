//! Typed content failures callers may want to branch on.
//!
//! I/O and parse failures travel as plain `anyhow` errors; these variants mark
//! content that parsed fine but does not describe a playable encounter.

use battle_core::{EngineError, ErrorSeverity};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("encounter '{0}' is not defined")]
    UnknownEncounter(String),

    #[error("encounter '{0}' has no enemies")]
    EmptyEncounter(String),

    #[error("encounter '{encounter}' references unknown enemy '{enemy}'")]
    UnknownEnemy { encounter: String, enemy: String },
}

impl EngineError for ContentError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEncounter(_) => "CONTENT_UNKNOWN_ENCOUNTER",
            Self::EmptyEncounter(_) => "CONTENT_EMPTY_ENCOUNTER",
            Self::UnknownEnemy { .. } => "CONTENT_UNKNOWN_ENEMY",
        }
    }
}
