use crate::env::OracleError;
use crate::error::{EngineError, ErrorSeverity};
use crate::state::{ActorId, EnemySkillId, Side, SpellId, StatusId};

/// Configuration problems detected before a battle starts.
///
/// The engine never begins a battle it cannot resolve; once
/// [`super::BattleEngine::new`] succeeds, [`super::BattleEngine::run`] always
/// reaches an outcome.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetupError {
    #[error("{side} roster is empty")]
    EmptyRoster { side: Side },

    #[error("{side} roster has {len} actors (max {max})")]
    RosterTooLarge { side: Side, len: usize, max: usize },

    #[error("actor {id} is invalid: {reason}")]
    InvalidActor { id: ActorId, reason: String },

    #[error("status {0} is not defined")]
    MissingStatus(StatusId),

    #[error("spell {0} is not defined")]
    MissingSpell(SpellId),

    #[error("enemy skill {0} is not defined")]
    MissingEnemySkill(EnemySkillId),

    #[error("invalid battle config: {0}")]
    InvalidConfig(String),
}

impl SetupError {
    pub(crate) fn invalid_actor(id: ActorId, reason: impl Into<String>) -> Self {
        Self::InvalidActor {
            id,
            reason: reason.into(),
        }
    }
}

impl From<OracleError> for SetupError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::MissingStatus(id) => Self::MissingStatus(id),
            OracleError::MissingSpell(id) => Self::MissingSpell(id),
            OracleError::MissingEnemySkill(id) => Self::MissingEnemySkill(id),
        }
    }
}

impl EngineError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoster { .. } => "SETUP_EMPTY_ROSTER",
            Self::RosterTooLarge { .. } => "SETUP_ROSTER_TOO_LARGE",
            Self::InvalidActor { .. } => "SETUP_INVALID_ACTOR",
            Self::MissingStatus(_) => "SETUP_MISSING_STATUS",
            Self::MissingSpell(_) => "SETUP_MISSING_SPELL",
            Self::MissingEnemySkill(_) => "SETUP_MISSING_ENEMY_SKILL",
            Self::InvalidConfig(_) => "SETUP_INVALID_CONFIG",
        }
    }
}
