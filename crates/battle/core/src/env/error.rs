use crate::error::{EngineError, ErrorSeverity};
use crate::state::{EnemySkillId, SpellId, StatusId};

/// A definition lookup referenced by a roster is missing from the tables.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("status {0} is not defined")]
    MissingStatus(StatusId),

    #[error("spell {0} is not defined")]
    MissingSpell(SpellId),

    #[error("enemy skill {0} is not defined")]
    MissingEnemySkill(EnemySkillId),
}

impl EngineError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingStatus(_) => "ORACLE_MISSING_STATUS",
            Self::MissingSpell(_) => "ORACLE_MISSING_SPELL",
            Self::MissingEnemySkill(_) => "ORACLE_MISSING_ENEMY_SKILL",
        }
    }
}
