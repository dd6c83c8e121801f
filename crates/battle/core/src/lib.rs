//! Deterministic encounter resolution between two rosters.
//!
//! `battle-core` turns two rosters of pre-computed combatants, a set of static
//! definition tables and a seed into an [`engine::Outcome`], the final rosters
//! and a structured [`log::ActionLog`]. All state mutation flows through
//! [`engine::BattleEngine`]; the same inputs always replay the same log.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod log;
pub mod profile;
pub mod state;

pub use config::{BattleConfig, CombatParams};
pub use engine::{
    ActionChoice, BattleContext, BattleEngine, BattleResult, Outcome, ReactionEvent, SetupError,
    resolve_battle,
};
pub use env::{
    BattleEnv, DefinitionTables, EnemySkillDefinition, EnemySkillKind, EnemySkillOracle,
    OracleError, PcgRng, RandomSource, SpellDefinition, SpellKind, SpellOracle, SpellSchool,
    StatusDefinition, StatusOracle, StatusTags, Targeting, compute_seed,
};
pub use error::{EngineError, ErrorSeverity};
#[cfg(feature = "serde")]
pub use log::compute_log_root;
pub use log::{ActionEntry, ActionKind, ActionLog, Effect, EffectKind};
pub use profile::{
    AbilityDescriptor, AttackMultipliers, ExtraActionDescriptor, ExtraActionTrigger,
    PreemptiveAttack, ProfileBuilder, ReactionAction, ReactionChance, ReactionDescriptor,
    ReactionTarget, ReactionTrigger, SkillEffect, SkillProfile,
};
pub use state::{
    AbilityId, ActionRates, Actor, ActorId, Attribute, BaseAttributes, BuffStat, CombatStats,
    Combatant, DamageType, EnemySkillId, Side, SpellId, SpellSlot, StatusId,
};
