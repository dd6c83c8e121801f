//! Traits describing read-only master data.
//!
//! Oracles expose status, spell and enemy-skill definitions plus the seeded
//! random source. The [`BattleEnv`] aggregate bundles the definition oracles
//! so the engine can reach everything it needs without coupling to a concrete
//! loader.
mod enemy_skills;
mod error;
mod rng;
mod snapshot;
mod spells;
mod statuses;

pub use enemy_skills::{EnemySkillDefinition, EnemySkillKind, EnemySkillOracle};
pub use error::OracleError;
pub use rng::{PcgRng, RandomSource, clamp_percent, compute_seed};
pub use snapshot::DefinitionTables;
pub use spells::{SpellDefinition, SpellKind, SpellOracle, SpellSchool, Targeting};
pub use statuses::{StatusDefinition, StatusOracle, StatusTags};

#[cfg(test)]
pub(crate) use rng::ScriptedRng;

use crate::state::{EnemySkillId, SpellId, StatusId};

/// Aggregates the read-only definition oracles consumed by a battle.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    statuses: &'a dyn StatusOracle,
    spells: &'a dyn SpellOracle,
    enemy_skills: &'a dyn EnemySkillOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        statuses: &'a dyn StatusOracle,
        spells: &'a dyn SpellOracle,
        enemy_skills: &'a dyn EnemySkillOracle,
    ) -> Self {
        Self {
            statuses,
            spells,
            enemy_skills,
        }
    }

    /// Uses one table bundle for every oracle.
    pub fn from_tables(tables: &'a DefinitionTables) -> Self {
        Self::new(tables, tables, tables)
    }

    pub fn status(&self, id: StatusId) -> Option<&'a StatusDefinition> {
        self.statuses.status(id)
    }

    pub fn spell(&self, id: SpellId) -> Option<&'a SpellDefinition> {
        self.spells.spell(id)
    }

    pub fn enemy_skill(&self, id: EnemySkillId) -> Option<&'a EnemySkillDefinition> {
        self.enemy_skills.enemy_skill(id)
    }

    /// Looks up a status, failing with [`OracleError::MissingStatus`].
    pub fn require_status(&self, id: StatusId) -> Result<&'a StatusDefinition, OracleError> {
        self.status(id).ok_or(OracleError::MissingStatus(id))
    }

    /// Looks up a spell, failing with [`OracleError::MissingSpell`].
    pub fn require_spell(&self, id: SpellId) -> Result<&'a SpellDefinition, OracleError> {
        self.spell(id).ok_or(OracleError::MissingSpell(id))
    }

    /// Looks up an enemy skill, failing with [`OracleError::MissingEnemySkill`].
    pub fn require_enemy_skill(
        &self,
        id: EnemySkillId,
    ) -> Result<&'a EnemySkillDefinition, OracleError> {
        self.enemy_skill(id).ok_or(OracleError::MissingEnemySkill(id))
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv").finish_non_exhaustive()
    }
}
