//! Reaction descriptors: counters, retaliations and follow-ups.

use crate::state::{AbilityId, Attribute, BaseAttributes, SpellId};

/// Trigger circumstance a reaction listens for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionTrigger {
    /// An ally of the reactor took damage.
    AllyDamaged,
    SelfDamagedPhysical,
    SelfDamagedMagical,
    /// The reactor evaded, parried or blocked an attack.
    SelfEvaded,
    AllyDefeated,
    KilledEnemy,
    AllyCastAttackSpell,
    AttackedWithoutKill,
    AllyCriticalHit,
}

impl ReactionTrigger {
    /// Dispatch priority class: counters 0, retaliations 1, follow-ups 2.
    pub const fn priority(self) -> u8 {
        match self {
            Self::AllyDamaged
            | Self::SelfDamagedPhysical
            | Self::SelfDamagedMagical
            | Self::SelfEvaded => 0,
            Self::AllyDefeated => 1,
            Self::KilledEnemy
            | Self::AllyCastAttackSpell
            | Self::AttackedWithoutKill
            | Self::AllyCriticalHit => 2,
        }
    }
}

/// Proc chance `base + attribute × scale`, in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionChance {
    pub base: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attribute: Option<Attribute>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scale: f64,
}

impl ReactionChance {
    pub const fn flat(base: f64) -> Self {
        Self {
            base,
            attribute: None,
            scale: 0.0,
        }
    }

    pub const fn scaled(base: f64, attribute: Attribute, scale: f64) -> Self {
        Self {
            base,
            attribute: Some(attribute),
            scale,
        }
    }

    /// Unclamped percent for a reactor with `attributes`.
    pub fn percent(&self, attributes: &BaseAttributes) -> f64 {
        let scaled = self
            .attribute
            .map_or(0.0, |attr| attributes.get(attr) as f64 * self.scale);
        self.base + scaled
    }
}

/// Multipliers applied to a physical attack variant.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttackMultipliers {
    pub attack_count: f64,
    pub critical_rate: f64,
    pub damage: f64,
    pub accuracy: f64,
}

impl AttackMultipliers {
    pub const NEUTRAL: Self = Self {
        attack_count: 1.0,
        critical_rate: 1.0,
        damage: 1.0,
        accuracy: 1.0,
    };
}

impl Default for AttackMultipliers {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// What the reactor does when the reaction fires.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionAction {
    Physical(AttackMultipliers),
    /// Casts a known spell; needs a charge.
    Spell { spell: SpellId },
    Breath { damage_multiplier: f64 },
}

/// How the reaction picks its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionTarget {
    /// The attacker or killer carried by the event.
    Attacker,
    /// One of the targets of the triggering action.
    CasterTargets,
    /// A fresh offensive target.
    Random,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReactionDescriptor {
    pub id: AbilityId,
    pub trigger: ReactionTrigger,
    pub chance: ReactionChance,
    pub action: ReactionAction,
    pub target: ReactionTarget,
    /// Only fires when the reactor stands in a row strictly in front of the
    /// attacked ally.
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires_ally_behind: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_per_turn: Option<u8>,
}

impl ReactionDescriptor {
    pub fn new(
        id: AbilityId,
        trigger: ReactionTrigger,
        chance: ReactionChance,
        action: ReactionAction,
        target: ReactionTarget,
    ) -> Self {
        Self {
            id,
            trigger,
            chance,
            action,
            target,
            requires_ally_behind: false,
            max_per_turn: None,
        }
    }

    pub fn behind_only(mut self) -> Self {
        self.requires_ally_behind = true;
        self
    }

    pub fn per_turn(mut self, limit: u8) -> Self {
        self.max_per_turn = Some(limit);
        self
    }
}
