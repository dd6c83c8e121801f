//! Combatant snapshot consumed from upstream and the in-battle actor.
//!
//! A [`Combatant`] is the flat, precomputed record handed to the engine. It is
//! turned into an [`Actor`] once per battle: the profile is compiled, charges
//! and barrier pools are seeded, and HP is clamped into `0..=max_hp`.

use std::collections::BTreeMap;

use crate::profile::{AbilityDescriptor, ProfileBuilder, SkillProfile};

use super::{
    ActionCharges, ActorId, BarrierPools, BuffStat, Buffs, ChargeKey, EnemySkillId, SpellId,
    StatusEffects,
};

/// One of the six base attribute axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    Strength,
    Wisdom,
    Spirit,
    Vitality,
    Agility,
    Luck,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BaseAttributes {
    pub strength: i32,
    pub wisdom: i32,
    pub spirit: i32,
    pub vitality: i32,
    pub agility: i32,
    pub luck: i32,
}

impl BaseAttributes {
    pub const fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Wisdom => self.wisdom,
            Attribute::Spirit => self.spirit,
            Attribute::Vitality => self.vitality,
            Attribute::Agility => self.agility,
            Attribute::Luck => self.luck,
        }
    }
}

/// Combat scores computed upstream from equipment and level.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatStats {
    pub max_hp: u32,
    pub physical_attack: f64,
    pub magical_attack: f64,
    pub physical_defense: f64,
    pub magical_defense: f64,
    pub hit_score: f64,
    pub evasion_score: f64,
    /// Physical critical chance, percent.
    pub critical_rate: f64,
    pub attack_count: f64,
    pub magical_healing: f64,
    pub breath_power: f64,
}

/// Category lottery weights, percent. `>= 100` always hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionRates {
    pub breath: u8,
    pub priest: u8,
    pub mage: u8,
    pub physical: u8,
}

/// A known spell with its charge cap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellSlot {
    pub spell: SpellId,
    pub max_charges: u8,
    /// Starting charges; defaults to the cap.
    #[cfg_attr(feature = "serde", serde(default))]
    pub current: Option<u8>,
}

/// Flat upstream snapshot of one combatant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub display_id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub race: u8,
    /// Formation row, 0 = front.
    #[cfg_attr(feature = "serde", serde(default))]
    pub row: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: BaseAttributes,
    pub stats: CombatStats,
    /// Current HP; `None` starts at full health.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hp: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rates: ActionRates,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spells: Vec<SpellSlot>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub breath_charges: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enemy_skills: Vec<EnemySkillId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityDescriptor>,
}

impl Combatant {
    pub fn new(display_id: impl Into<String>, name: impl Into<String>, stats: CombatStats) -> Self {
        Self {
            display_id: display_id.into(),
            name: name.into(),
            stats,
            ..Self::default()
        }
    }
}

/// Per-turn transient state, reset at the start of every turn.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnFlags {
    pub guarding: bool,
    /// Slots granted in the turn order this turn.
    pub slots: u8,
    pub extra_actions_taken: u8,
    pub turn_speed: f64,
    pub order_tiebreak: u32,
}

/// A combatant inside a running battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: ActorId,
    pub display_id: String,
    pub name: String,
    pub level: u16,
    pub race: u8,
    pub row: u8,
    pub attributes: BaseAttributes,
    pub stats: CombatStats,
    pub rates: ActionRates,
    /// Known spells in declaration order.
    pub spells: Vec<SpellId>,
    pub enemy_skills: Vec<EnemySkillId>,
    pub profile: SkillProfile,

    pub hp: u32,
    pub charges: ActionCharges,
    pub statuses: StatusEffects,
    pub buffs: Buffs,
    pub barriers: BarrierPools,
    /// Defensive penalty percent.
    pub degradation: f64,
    pub enemy_skill_uses: BTreeMap<EnemySkillId, u8>,
    pub resurrections_used: u8,
    pub rescues_used: u8,
    pub withdrawn: bool,
    pub turn: TurnFlags,
}

impl Actor {
    /// Builds the in-battle actor, compiling the skill profile.
    pub fn from_combatant(id: ActorId, combatant: &Combatant) -> Self {
        let profile = ProfileBuilder::fold(&combatant.abilities);

        let mut charges = ActionCharges::new();
        if combatant.breath_charges > 0 {
            charges.insert(
                ChargeKey::Breath,
                combatant.breath_charges,
                combatant.breath_charges,
            );
        }
        for slot in &combatant.spells {
            charges.insert(
                ChargeKey::Spell(slot.spell),
                slot.current.unwrap_or(slot.max_charges),
                slot.max_charges,
            );
        }

        let max_hp = combatant.stats.max_hp;
        Self {
            id,
            display_id: combatant.display_id.clone(),
            name: combatant.name.clone(),
            level: combatant.level,
            race: combatant.race,
            row: combatant.row,
            attributes: combatant.attributes,
            stats: combatant.stats,
            rates: combatant.rates,
            spells: combatant.spells.iter().map(|s| s.spell).collect(),
            enemy_skills: combatant.enemy_skills.clone(),
            barriers: profile.barriers,
            profile,
            hp: combatant.hp.unwrap_or(max_hp).min(max_hp),
            charges,
            statuses: StatusEffects::empty(),
            buffs: Buffs::empty(),
            degradation: 0.0,
            enemy_skill_uses: BTreeMap::new(),
            resurrections_used: 0,
            rescues_used: 0,
            withdrawn: false,
            turn: TurnFlags::default(),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Alive and still on the field.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_alive() && !self.withdrawn
    }

    pub fn max_hp(&self) -> u32 {
        self.stats.max_hp
    }

    pub fn missing_hp(&self) -> u32 {
        self.max_hp().saturating_sub(self.hp)
    }

    /// Current HP as a percent of max HP.
    pub fn hp_percent(&self) -> f64 {
        if self.max_hp() == 0 {
            return 0.0;
        }
        self.hp as f64 * 100.0 / self.max_hp() as f64
    }

    /// Removes up to `amount` HP, flooring at zero. Returns the HP lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Restores up to `amount` HP, capped at max HP. Returns the HP gained.
    pub fn restore_hp(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.missing_hp());
        self.hp += gained;
        gained
    }

    // ===== buffed scores =====

    pub fn physical_attack(&self) -> f64 {
        self.stats.physical_attack * self.buffs.multiplier(BuffStat::PhysicalAttack)
    }

    pub fn magical_attack(&self) -> f64 {
        self.stats.magical_attack * self.buffs.multiplier(BuffStat::MagicalAttack)
    }

    pub fn physical_defense(&self) -> f64 {
        self.stats.physical_defense * self.buffs.multiplier(BuffStat::PhysicalDefense)
    }

    pub fn magical_defense(&self) -> f64 {
        self.stats.magical_defense * self.buffs.multiplier(BuffStat::MagicalDefense)
    }

    pub fn hit_score(&self) -> f64 {
        self.stats.hit_score * self.buffs.multiplier(BuffStat::HitScore)
    }

    pub fn evasion_score(&self) -> f64 {
        self.stats.evasion_score * self.buffs.multiplier(BuffStat::EvasionScore)
    }

    pub fn critical_rate(&self) -> f64 {
        self.stats.critical_rate * self.buffs.multiplier(BuffStat::CriticalRate)
    }

    /// Base turn speed before shuffling.
    pub fn speed(&self) -> f64 {
        self.attributes.agility.max(0) as f64
            * self.buffs.multiplier(BuffStat::Agility)
            * self.profile.order.speed_multiplier
    }

    pub fn enemy_skill_uses(&self, skill: EnemySkillId) -> u8 {
        self.enemy_skill_uses.get(&skill).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SkillEffect;
    use crate::state::{AbilityId, DamageType};

    fn stats(max_hp: u32) -> CombatStats {
        CombatStats {
            max_hp,
            physical_attack: 30.0,
            ..CombatStats::default()
        }
    }

    #[test]
    fn hp_is_clamped_to_max() {
        let mut combatant = Combatant::new("p0", "Knight", stats(50));
        combatant.hp = Some(80);
        let actor = Actor::from_combatant(ActorId::player(0), &combatant);
        assert_eq!(actor.hp, 50);
    }

    #[test]
    fn damage_and_healing_clamp() {
        let mut actor = Actor::from_combatant(ActorId::player(0), &Combatant::new("p0", "K", stats(20)));
        assert_eq!(actor.take_damage(50), 20);
        assert!(!actor.is_alive());
        assert_eq!(actor.restore_hp(100), 20);
        assert_eq!(actor.hp, 20);
    }

    #[test]
    fn profile_seeds_charges_and_barriers() {
        let mut combatant = Combatant::new("e0", "Drake", stats(100));
        combatant.breath_charges = 2;
        combatant.spells = vec![SpellSlot {
            spell: SpellId(4),
            max_charges: 3,
            current: Some(1),
        }];
        combatant.abilities = vec![AbilityDescriptor::new(
            AbilityId(1),
            vec![SkillEffect::Barrier {
                damage_type: DamageType::Breath,
                guard: false,
                charges: 2,
            }],
        )];
        let actor = Actor::from_combatant(ActorId::enemy(0), &combatant);

        assert_eq!(actor.charges.current(ChargeKey::Breath), 2);
        assert_eq!(actor.charges.current(ChargeKey::Spell(SpellId(4))), 1);
        assert_eq!(actor.barriers.breath, 2);
        assert_eq!(actor.spells, vec![SpellId(4)]);
    }
}
