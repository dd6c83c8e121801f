use bitflags::bitflags;

use crate::state::StatusId;

/// Read-only status effect rules keyed by [`StatusId`].
pub trait StatusOracle {
    fn status(&self, id: StatusId) -> Option<&StatusDefinition>;
}

bitflags! {
    /// Classification tags attached to a status definition.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct StatusTags: u16 {
        /// Counts as a debuff (redirectable onto a sacrifice target).
        const HARMFUL     = 1 << 0;
        /// Actor attacks its own side instead of choosing an action.
        const CONFUSION   = 1 << 1;
        const SLEEP       = 1 << 2;
        const PARALYSIS   = 1 << 3;
        const PETRIFY     = 1 << 4;
        const POISON      = 1 << 5;
        /// Chance is reduced while the target holds magical barrier charges.
        const SPELL_BOUND = 1 << 6;
    }
}

/// Rules for one status effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusDefinition {
    pub id: StatusId,
    pub name: String,
    /// Turns the status lasts when freshly applied.
    pub duration: u8,
    /// Percent of max HP lost at each end-of-turn tick (0 = no tick).
    #[cfg_attr(feature = "serde", serde(default))]
    pub tick_damage_percent: u8,
    /// Whether the status short-circuits the afflicted actor's turn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub locks_action: bool,
    /// Per-turn chance of recovering before the duration runs out.
    #[cfg_attr(feature = "serde", serde(default))]
    pub recovery_chance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: StatusTags,
}

impl StatusDefinition {
    pub fn new(id: StatusId, name: impl Into<String>, duration: u8) -> Self {
        Self {
            id,
            name: name.into(),
            duration,
            tick_damage_percent: 0,
            locks_action: false,
            recovery_chance: 0.0,
            tags: StatusTags::HARMFUL,
        }
    }

    pub fn with_tick(mut self, percent: u8) -> Self {
        self.tick_damage_percent = percent;
        self
    }

    pub fn locking(mut self) -> Self {
        self.locks_action = true;
        self
    }

    pub fn with_recovery(mut self, chance: f64) -> Self {
        self.recovery_chance = chance;
        self
    }

    pub fn with_tags(mut self, tags: StatusTags) -> Self {
        self.tags = tags;
        self
    }

    #[inline]
    pub fn is_harmful(&self) -> bool {
        self.tags.contains(StatusTags::HARMFUL)
    }

    #[inline]
    pub fn is_confusion(&self) -> bool {
        self.tags.contains(StatusTags::CONFUSION)
    }
}
