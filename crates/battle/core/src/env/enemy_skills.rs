use std::collections::BTreeMap;

use crate::state::{BuffStat, EnemySkillId, StatusId};

use super::Targeting;

/// Read-only enemy-only skill rules keyed by [`EnemySkillId`].
pub trait EnemySkillOracle {
    fn enemy_skill(&self, id: EnemySkillId) -> Option<&EnemySkillDefinition>;
}

/// Resolution pipeline an enemy skill goes through.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnemySkillKind {
    Physical,
    Magical,
    Breath,
    /// Heals each target by a percent of its max HP.
    Heal { percent: u8 },
    Status { status: StatusId, chance: f64 },
    Buff {
        buff: u16,
        turns: u8,
        modifiers: BTreeMap<BuffStat, f64>,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemySkillDefinition {
    pub id: EnemySkillId,
    pub name: String,
    pub kind: EnemySkillKind,
    pub targeting: Targeting,
    /// Hits per target for damage skills; picks for `Targeting::Random`.
    #[cfg_attr(feature = "serde", serde(default = "default_one"))]
    pub hits: u8,
    /// Percent chance the skill is chosen when eligible.
    pub chance: f64,
    /// Usage cap per battle.
    #[cfg_attr(feature = "serde", serde(default = "default_one"))]
    pub uses_per_battle: u8,
    #[cfg_attr(feature = "serde", serde(default = "default_multiplier"))]
    pub damage_multiplier: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_multiplier"))]
    pub accuracy_multiplier: f64,
    /// Extra status attempt folded into damage skills.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inflicts: Option<(StatusId, f64)>,
}

#[cfg(feature = "serde")]
fn default_one() -> u8 {
    1
}

#[cfg(feature = "serde")]
fn default_multiplier() -> f64 {
    1.0
}

impl EnemySkillDefinition {
    pub fn new(
        id: EnemySkillId,
        name: impl Into<String>,
        kind: EnemySkillKind,
        targeting: Targeting,
        chance: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            targeting,
            hits: 1,
            chance,
            uses_per_battle: 1,
            damage_multiplier: 1.0,
            accuracy_multiplier: 1.0,
            inflicts: None,
        }
    }

    pub fn with_hits(mut self, hits: u8) -> Self {
        self.hits = hits;
        self
    }

    pub fn with_uses(mut self, uses: u8) -> Self {
        self.uses_per_battle = uses;
        self
    }

    pub fn with_multipliers(mut self, damage: f64, accuracy: f64) -> Self {
        self.damage_multiplier = damage;
        self.accuracy_multiplier = accuracy;
        self
    }

    pub fn is_heal(&self) -> bool {
        matches!(self.kind, EnemySkillKind::Heal { .. })
    }
}
