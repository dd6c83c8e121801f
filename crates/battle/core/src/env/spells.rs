use std::collections::BTreeMap;

use crate::state::{BuffStat, SpellId, StatusId};

/// Read-only spell rules keyed by [`SpellId`].
pub trait SpellOracle {
    fn spell(&self, id: SpellId) -> Option<&SpellDefinition>;
}

/// Who an ability lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Targeting {
    /// One randomly chosen living opponent.
    Single,
    /// `hits` independent picks among living opponents.
    Random,
    /// Every living opponent.
    All,
    SelfOnly,
    /// Every living member of the caster's side.
    AllAllies,
}

impl Targeting {
    /// True when the ability lands on the caster's own side.
    pub const fn is_supportive(self) -> bool {
        matches!(self, Targeting::SelfOnly | Targeting::AllAllies)
    }
}

/// Spell school; selects which category rate governs the cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellSchool {
    Priest,
    Mage,
}

/// What a spell does when it resolves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellKind {
    /// Magical damage through the shared pipeline.
    Attack { multiplier: f64, hits: u8 },
    /// Percent-of-max-HP heal when `flat_percent` is set, otherwise
    /// `magical_healing × multiplier`.
    Heal {
        flat_percent: Option<u8>,
        multiplier: f64,
    },
    /// Status attempt against each target.
    Status { status: StatusId, chance: f64 },
    /// Timed buff on each target.
    Buff {
        buff: u16,
        turns: u8,
        modifiers: BTreeMap<BuffStat, f64>,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellDefinition {
    pub id: SpellId,
    pub name: String,
    pub school: SpellSchool,
    pub kind: SpellKind,
    pub targeting: Targeting,
    /// Higher tiers are preferred by the spell chooser.
    pub tier: u8,
    /// Charges consumed per cast.
    #[cfg_attr(feature = "serde", serde(default = "default_charge_cost"))]
    pub charge_cost: u8,
}

#[cfg(feature = "serde")]
fn default_charge_cost() -> u8 {
    1
}

impl SpellDefinition {
    pub fn new(
        id: SpellId,
        name: impl Into<String>,
        school: SpellSchool,
        kind: SpellKind,
        targeting: Targeting,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            school,
            kind,
            targeting,
            tier: 1,
            charge_cost: 1,
        }
    }

    pub fn with_tier(mut self, tier: u8) -> Self {
        self.tier = tier;
        self
    }

    pub fn is_attack(&self) -> bool {
        matches!(self.kind, SpellKind::Attack { .. })
    }

    pub fn is_heal(&self) -> bool {
        matches!(self.kind, SpellKind::Heal { .. })
    }
}
