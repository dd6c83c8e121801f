//! Ability descriptors as they arrive from upstream.
//!
//! Each learned ability is a list of [`SkillEffect`]s. The builder folds every
//! effect of every ability into one [`super::SkillProfile`].

use crate::state::{AbilityId, DamageType, SpellId, StatusId};

use super::{ExtraActionDescriptor, PreemptiveAttack, ReactionDescriptor};

/// One learned ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDescriptor {
    pub id: AbilityId,
    pub effects: Vec<SkillEffect>,
}

impl AbilityDescriptor {
    pub fn new(id: AbilityId, effects: Vec<SkillEffect>) -> Self {
        Self { id, effects }
    }
}

/// A single combat modifier.
///
/// Multiplier payloads are factors (`1.2` = +20%), chance payloads are
/// percents.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    // ===== damage multipliers (product) =====
    DamageDealt { damage_type: DamageType, multiplier: f64 },
    DamageTaken { damage_type: DamageType, multiplier: f64 },
    CriticalDamage(f64),
    Martial(f64),
    Healing(f64),
    /// Damage multiplier against defenders of a race.
    RaceBonus { race: u8, multiplier: f64 },
    SpellPower { spell: SpellId, multiplier: f64 },

    // ===== rates =====
    CriticalBonus(f64),
    CriticalCap(f64),
    CriticalRateMultiplier(f64),
    Accuracy(f64),
    AttackCount(f64),
    MagicCritical(f64),
    MagicNullify(f64),
    Parry { bonus: f64 },
    ShieldBlock { bonus: f64 },
    /// Scales reaction proc chances aimed at this actor.
    CounterEvasion(f64),
    /// Scales this actor's own reaction proc chances.
    ReactionProc(f64),

    // ===== ordering =====
    FirstStrike,
    SpeedMultiplier(f64),
    ShuffleOwnOrder,
    ShuffleEnemyOrder,
    ExtraSlots(u8),

    // ===== descriptors =====
    ExtraAction(ExtraActionDescriptor),
    Reaction(ReactionDescriptor),
    Preemptive(PreemptiveAttack),

    // ===== survival =====
    Resurrection { chance: f64, hp_percent: u8, uses: u8 },
    /// Revives a defeated teammate.
    Rescue { chance: f64, hp_percent: u8, uses: u8 },
    Barrier { damage_type: DamageType, guard: bool, charges: u8 },
    /// Damage factor for allies standing behind this actor.
    AllyProtection(f64),
    AutoCure,

    // ===== turn modifiers =====
    Berserk { chance: f64, status: StatusId },
    Sacrifice { interval: u32 },
    Retreat { from_turn: u32, chance: f64 },
    EnemyActionDebuff(f64),
    SkipChance(f64),
    IgnoreRow,

    // ===== on-hit side effects =====
    InflictStatus { status: StatusId, chance: f64 },
    ResistStatus { status: StatusId, multiplier: f64, additive: f64 },
    Absorption(f64),
    ChargeGain(f64),
    ChargeRegen(u8),
    Degradation(f64),
    DegradationRepair(f64),
}
