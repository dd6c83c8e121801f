//! Precompiled skill-effect profile.
//!
//! A [`SkillProfile`] is the immutable bundle of every combat modifier an actor
//! carries. It is built once per battle by [`ProfileBuilder`] from the actor's
//! learned abilities and never recomputed per action.
//!
//! # Groups
//!
//! - [`DamageModifiers`]: dealt/taken multipliers, criticals, race bonuses
//! - [`RateModifiers`]: critical, accuracy, parry/block and nullify rates
//! - [`OrderModifiers`]: first strike, speed, order shuffle, extra slots
//! - [`SustainModifiers`]: absorption, charge upkeep, degradation
//! - descriptor lists: extra actions, reactions, preemptive attacks
//! - optional rules: resurrection, rescue, berserk, sacrifice, retreat
mod builder;
mod effect;
mod extra;
pub mod merge;
mod reaction;

pub use builder::ProfileBuilder;
pub use effect::{AbilityDescriptor, SkillEffect};
pub use extra::{ExtraActionDescriptor, ExtraActionTrigger, PreemptiveAttack};
pub use reaction::{
    AttackMultipliers, ReactionAction, ReactionChance, ReactionDescriptor, ReactionTarget,
    ReactionTrigger,
};

use std::collections::BTreeMap;

use crate::state::{BarrierPools, DamageType, SpellId, StatusId};

/// Default ceiling for physical critical chance.
pub const DEFAULT_CRITICAL_CAP: f64 = 50.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageModifiers {
    pub physical_dealt: f64,
    pub magical_dealt: f64,
    pub breath_dealt: f64,
    pub physical_taken: f64,
    pub magical_taken: f64,
    pub breath_taken: f64,
    pub critical_damage: f64,
    pub martial: f64,
    pub healing: f64,
    pub race: BTreeMap<u8, f64>,
    pub spell_power: BTreeMap<SpellId, f64>,
}

impl Default for DamageModifiers {
    fn default() -> Self {
        Self {
            physical_dealt: 1.0,
            magical_dealt: 1.0,
            breath_dealt: 1.0,
            physical_taken: 1.0,
            magical_taken: 1.0,
            breath_taken: 1.0,
            critical_damage: 1.0,
            martial: 1.0,
            healing: 1.0,
            race: BTreeMap::new(),
            spell_power: BTreeMap::new(),
        }
    }
}

impl DamageModifiers {
    pub fn dealt(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Physical => self.physical_dealt,
            DamageType::Magical => self.magical_dealt,
            DamageType::Breath => self.breath_dealt,
        }
    }

    pub fn taken(&self, damage_type: DamageType) -> f64 {
        match damage_type {
            DamageType::Physical => self.physical_taken,
            DamageType::Magical => self.magical_taken,
            DamageType::Breath => self.breath_taken,
        }
    }

    pub fn race_multiplier(&self, race: u8) -> f64 {
        self.race.get(&race).copied().unwrap_or(1.0)
    }

    pub fn spell_multiplier(&self, spell: SpellId) -> f64 {
        self.spell_power.get(&spell).copied().unwrap_or(1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateModifiers {
    pub critical_bonus: f64,
    pub critical_cap: f64,
    pub critical_rate_multiplier: f64,
    pub accuracy: f64,
    pub attack_count: f64,
    pub magic_critical: f64,
    pub magic_nullify: f64,
    pub can_parry: bool,
    pub parry_bonus: f64,
    pub can_block: bool,
    pub block_bonus: f64,
    pub counter_evasion: f64,
    pub reaction_proc: f64,
}

impl Default for RateModifiers {
    fn default() -> Self {
        Self {
            critical_bonus: 0.0,
            critical_cap: DEFAULT_CRITICAL_CAP,
            critical_rate_multiplier: 1.0,
            accuracy: 1.0,
            attack_count: 1.0,
            magic_critical: 0.0,
            magic_nullify: 0.0,
            can_parry: false,
            parry_bonus: 0.0,
            can_block: false,
            block_bonus: 0.0,
            counter_evasion: 1.0,
            reaction_proc: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderModifiers {
    pub first_strike: bool,
    pub speed_multiplier: f64,
    pub shuffle_own: bool,
    /// Randomizes the order of the whole opposing side.
    pub shuffle_enemies: bool,
    pub extra_slots: u8,
}

impl Default for OrderModifiers {
    fn default() -> Self {
        Self {
            first_strike: false,
            speed_multiplier: 1.0,
            shuffle_own: false,
            shuffle_enemies: false,
            extra_slots: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SustainModifiers {
    /// Percent of dealt physical damage healed back.
    pub absorption_percent: f64,
    /// Percent chance per landing physical action to restore one spell charge.
    pub charge_gain_chance: f64,
    /// Charges restored to every spell counter at end of turn.
    pub charge_regen: u8,
    /// Degradation applied to a defender per landing hit.
    pub degradation_dealt: f64,
    /// Own degradation removed at end of turn.
    pub degradation_repair: f64,
}

/// Self resurrection or ally rescue.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReviveRule {
    pub chance: f64,
    pub hp_percent: u8,
    pub uses: u8,
}

impl ReviveRule {
    fn merge(self, other: Self) -> Self {
        Self {
            chance: merge::max(self.chance, other.chance),
            hp_percent: merge::max(self.hp_percent, other.hp_percent),
            uses: merge::max(self.uses, other.uses),
        }
    }
}

/// Ordered by chance first so the strongest rule wins a `max` merge.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BerserkRule {
    pub chance: f64,
    pub status: StatusId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SacrificeRule {
    /// Selection happens on turns divisible by this interval.
    pub interval: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetreatRule {
    pub from_turn: u32,
    pub chance: f64,
}

impl RetreatRule {
    fn merge(self, other: Self) -> Self {
        Self {
            from_turn: merge::min(self.from_turn, other.from_turn),
            chance: merge::max(self.chance, other.chance),
        }
    }
}

/// Target-side adjustment to an incoming status chance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusResistance {
    pub multiplier: f64,
    pub additive: f64,
}

impl StatusResistance {
    pub const NONE: Self = Self {
        multiplier: 1.0,
        additive: 0.0,
    };

    fn merge(self, other: Self) -> Self {
        Self {
            multiplier: merge::product(self.multiplier, other.multiplier),
            additive: merge::sum(self.additive, other.additive),
        }
    }
}

impl Default for StatusResistance {
    fn default() -> Self {
        Self::NONE
    }
}

/// Compiled skill-effect profile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillProfile {
    pub damage: DamageModifiers,
    pub rates: RateModifiers,
    pub order: OrderModifiers,
    pub sustain: SustainModifiers,
    /// Starting barrier charges.
    pub barriers: BarrierPools,
    /// Damage factor granted to allies in rows behind this actor (`1.0` = none).
    pub ally_protection: f64,
    pub extra_actions: Vec<ExtraActionDescriptor>,
    pub reactions: Vec<ReactionDescriptor>,
    pub preemptive: Vec<PreemptiveAttack>,
    pub resurrection: Option<ReviveRule>,
    pub rescue: Option<ReviveRule>,
    pub berserk: Option<BerserkRule>,
    pub sacrifice: Option<SacrificeRule>,
    pub retreat: Option<RetreatRule>,
    pub auto_cure: bool,
    pub ignores_row: bool,
    pub enemy_action_debuff: f64,
    pub skip_chance: f64,
    pub inflictions: BTreeMap<StatusId, f64>,
    pub resistances: BTreeMap<StatusId, StatusResistance>,
}

impl Default for SkillProfile {
    fn default() -> Self {
        Self {
            damage: DamageModifiers::default(),
            rates: RateModifiers::default(),
            order: OrderModifiers::default(),
            sustain: SustainModifiers::default(),
            barriers: BarrierPools::default(),
            ally_protection: 1.0,
            extra_actions: Vec::new(),
            reactions: Vec::new(),
            preemptive: Vec::new(),
            resurrection: None,
            rescue: None,
            berserk: None,
            sacrifice: None,
            retreat: None,
            auto_cure: false,
            ignores_row: false,
            enemy_action_debuff: 0.0,
            skip_chance: 0.0,
            inflictions: BTreeMap::new(),
            resistances: BTreeMap::new(),
        }
    }
}

impl SkillProfile {
    pub fn resistance(&self, status: StatusId) -> StatusResistance {
        self.resistances.get(&status).copied().unwrap_or_default()
    }

    /// Reactions listening for `trigger`, in declaration order.
    pub fn reactions_for(
        &self,
        trigger: ReactionTrigger,
    ) -> impl Iterator<Item = &ReactionDescriptor> {
        self.reactions.iter().filter(move |r| r.trigger == trigger)
    }

    /// Status ids referenced anywhere in the profile.
    pub fn referenced_statuses(&self) -> Vec<StatusId> {
        let mut ids: Vec<StatusId> = self
            .inflictions
            .keys()
            .chain(self.resistances.keys())
            .copied()
            .collect();
        ids.extend(self.berserk.map(|b| b.status));
        ids.sort();
        ids.dedup();
        ids
    }

    /// Spell ids referenced by reactions.
    pub fn referenced_spells(&self) -> Vec<SpellId> {
        self.reactions
            .iter()
            .filter_map(|r| match r.action {
                ReactionAction::Spell { spell } => Some(spell),
                _ => None,
            })
            .collect()
    }
}
