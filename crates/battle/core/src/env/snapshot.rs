//! In-memory definition tables.
//!
//! Content loaders deserialize master data into [`DefinitionTables`], which
//! implements every definition oracle. Maps are ordered so iteration (and
//! therefore any derived behavior) is deterministic.

use std::collections::BTreeMap;

use crate::state::{EnemySkillId, SpellId, StatusId};

use super::{
    EnemySkillDefinition, EnemySkillOracle, SpellDefinition, SpellOracle, StatusDefinition,
    StatusOracle,
};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefinitionTables {
    #[cfg_attr(feature = "serde", serde(default))]
    pub statuses: BTreeMap<StatusId, StatusDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spells: BTreeMap<SpellId, SpellDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemy_skills: BTreeMap<EnemySkillId, EnemySkillDefinition>,
}

impl DefinitionTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds tables from definition lists, keyed by each definition's own id.
    pub fn from_definitions(
        statuses: impl IntoIterator<Item = StatusDefinition>,
        spells: impl IntoIterator<Item = SpellDefinition>,
        enemy_skills: impl IntoIterator<Item = EnemySkillDefinition>,
    ) -> Self {
        Self {
            statuses: statuses.into_iter().map(|d| (d.id, d)).collect(),
            spells: spells.into_iter().map(|d| (d.id, d)).collect(),
            enemy_skills: enemy_skills.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    pub fn with_status(mut self, definition: StatusDefinition) -> Self {
        self.statuses.insert(definition.id, definition);
        self
    }

    pub fn with_spell(mut self, definition: SpellDefinition) -> Self {
        self.spells.insert(definition.id, definition);
        self
    }

    pub fn with_enemy_skill(mut self, definition: EnemySkillDefinition) -> Self {
        self.enemy_skills.insert(definition.id, definition);
        self
    }
}

impl StatusOracle for DefinitionTables {
    fn status(&self, id: StatusId) -> Option<&StatusDefinition> {
        self.statuses.get(&id)
    }
}

impl SpellOracle for DefinitionTables {
    fn spell(&self, id: SpellId) -> Option<&SpellDefinition> {
        self.spells.get(&id)
    }
}

impl EnemySkillOracle for DefinitionTables {
    fn enemy_skill(&self, id: EnemySkillId) -> Option<&EnemySkillDefinition> {
        self.enemy_skills.get(&id)
    }
}
