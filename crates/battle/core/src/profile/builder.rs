use crate::state::DamageType;

use super::{
    AbilityDescriptor, BerserkRule, ReviveRule, RetreatRule, SacrificeRule, SkillEffect,
    SkillProfile, StatusResistance, merge,
};

/// Folds ability descriptors into one immutable [`SkillProfile`].
///
/// Each effect touches exactly one field through one of the [`merge`]
/// functions, so the fold is order independent for scalar fields. Descriptor
/// lists keep ability declaration order.
#[derive(Clone, Debug, Default)]
pub struct ProfileBuilder {
    profile: SkillProfile,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a profile from a full ability list.
    pub fn fold<'a>(abilities: impl IntoIterator<Item = &'a AbilityDescriptor>) -> SkillProfile {
        abilities
            .into_iter()
            .fold(Self::new(), |builder, ability| builder.with_ability(ability))
            .build()
    }

    pub fn with_ability(mut self, ability: &AbilityDescriptor) -> Self {
        for effect in &ability.effects {
            self.apply(effect);
        }
        self
    }

    pub fn with_effect(mut self, effect: &SkillEffect) -> Self {
        self.apply(effect);
        self
    }

    pub fn build(self) -> SkillProfile {
        self.profile
    }

    fn apply(&mut self, effect: &SkillEffect) {
        let p = &mut self.profile;
        match *effect {
            SkillEffect::DamageDealt {
                damage_type,
                multiplier,
            } => {
                let field = match damage_type {
                    DamageType::Physical => &mut p.damage.physical_dealt,
                    DamageType::Magical => &mut p.damage.magical_dealt,
                    DamageType::Breath => &mut p.damage.breath_dealt,
                };
                *field = merge::product(*field, multiplier);
            }
            SkillEffect::DamageTaken {
                damage_type,
                multiplier,
            } => {
                let field = match damage_type {
                    DamageType::Physical => &mut p.damage.physical_taken,
                    DamageType::Magical => &mut p.damage.magical_taken,
                    DamageType::Breath => &mut p.damage.breath_taken,
                };
                *field = merge::product(*field, multiplier);
            }
            SkillEffect::CriticalDamage(m) => {
                p.damage.critical_damage = merge::product(p.damage.critical_damage, m);
            }
            SkillEffect::Martial(m) => p.damage.martial = merge::product(p.damage.martial, m),
            SkillEffect::Healing(m) => p.damage.healing = merge::product(p.damage.healing, m),
            SkillEffect::RaceBonus { race, multiplier } => {
                let entry = p.damage.race.entry(race).or_insert(1.0);
                *entry = merge::product(*entry, multiplier);
            }
            SkillEffect::SpellPower { spell, multiplier } => {
                let entry = p.damage.spell_power.entry(spell).or_insert(1.0);
                *entry = merge::product(*entry, multiplier);
            }

            SkillEffect::CriticalBonus(v) => {
                p.rates.critical_bonus = merge::sum(p.rates.critical_bonus, v);
            }
            SkillEffect::CriticalCap(v) => p.rates.critical_cap = merge::max(p.rates.critical_cap, v),
            SkillEffect::CriticalRateMultiplier(m) => {
                p.rates.critical_rate_multiplier = merge::product(p.rates.critical_rate_multiplier, m);
            }
            SkillEffect::Accuracy(m) => p.rates.accuracy = merge::product(p.rates.accuracy, m),
            SkillEffect::AttackCount(m) => {
                p.rates.attack_count = merge::product(p.rates.attack_count, m);
            }
            SkillEffect::MagicCritical(v) => {
                p.rates.magic_critical = merge::sum(p.rates.magic_critical, v);
            }
            SkillEffect::MagicNullify(v) => {
                p.rates.magic_nullify = merge::sum(p.rates.magic_nullify, v);
            }
            SkillEffect::Parry { bonus } => {
                p.rates.can_parry = merge::max(p.rates.can_parry, true);
                p.rates.parry_bonus = merge::sum(p.rates.parry_bonus, bonus);
            }
            SkillEffect::ShieldBlock { bonus } => {
                p.rates.can_block = merge::max(p.rates.can_block, true);
                p.rates.block_bonus = merge::sum(p.rates.block_bonus, bonus);
            }
            SkillEffect::CounterEvasion(m) => {
                p.rates.counter_evasion = merge::product(p.rates.counter_evasion, m);
            }
            SkillEffect::ReactionProc(m) => {
                p.rates.reaction_proc = merge::product(p.rates.reaction_proc, m);
            }

            SkillEffect::FirstStrike => {
                p.order.first_strike = merge::max(p.order.first_strike, true);
            }
            SkillEffect::SpeedMultiplier(m) => {
                p.order.speed_multiplier = merge::product(p.order.speed_multiplier, m);
            }
            SkillEffect::ShuffleOwnOrder => p.order.shuffle_own = merge::max(p.order.shuffle_own, true),
            SkillEffect::ShuffleEnemyOrder => {
                p.order.shuffle_enemies = merge::max(p.order.shuffle_enemies, true);
            }
            SkillEffect::ExtraSlots(n) => {
                p.order.extra_slots = merge::sum(p.order.extra_slots as u16, n as u16)
                    .min(u8::MAX as u16) as u8;
            }

            SkillEffect::ExtraAction(descriptor) => p.extra_actions.push(descriptor),
            SkillEffect::Reaction(ref descriptor) => p.reactions.push(descriptor.clone()),
            SkillEffect::Preemptive(attack) => p.preemptive.push(attack),

            SkillEffect::Resurrection {
                chance,
                hp_percent,
                uses,
            } => {
                let rule = ReviveRule {
                    chance,
                    hp_percent,
                    uses,
                };
                p.resurrection = merge::option(p.resurrection, rule, ReviveRule::merge);
            }
            SkillEffect::Rescue {
                chance,
                hp_percent,
                uses,
            } => {
                let rule = ReviveRule {
                    chance,
                    hp_percent,
                    uses,
                };
                p.rescue = merge::option(p.rescue, rule, ReviveRule::merge);
            }
            SkillEffect::Barrier {
                damage_type,
                guard,
                charges,
            } => p.barriers.grant(damage_type, guard, charges),
            SkillEffect::AllyProtection(factor) => {
                p.ally_protection = merge::min(p.ally_protection, factor);
            }
            SkillEffect::AutoCure => p.auto_cure = merge::max(p.auto_cure, true),

            SkillEffect::Berserk { chance, status } => {
                p.berserk = merge::option(p.berserk, BerserkRule { chance, status }, merge::max);
            }
            SkillEffect::Sacrifice { interval } => {
                let rule = SacrificeRule {
                    interval: interval.max(1),
                };
                p.sacrifice = merge::option(p.sacrifice, rule, |a, b| SacrificeRule {
                    interval: merge::min(a.interval, b.interval),
                });
            }
            SkillEffect::Retreat { from_turn, chance } => {
                p.retreat =
                    merge::option(p.retreat, RetreatRule { from_turn, chance }, RetreatRule::merge);
            }
            SkillEffect::EnemyActionDebuff(v) => {
                p.enemy_action_debuff = merge::sum(p.enemy_action_debuff, v);
            }
            SkillEffect::SkipChance(v) => p.skip_chance = merge::sum(p.skip_chance, v),
            SkillEffect::IgnoreRow => p.ignores_row = merge::max(p.ignores_row, true),

            SkillEffect::InflictStatus { status, chance } => {
                let entry = p.inflictions.entry(status).or_insert(0.0);
                *entry = merge::sum(*entry, chance);
            }
            SkillEffect::ResistStatus {
                status,
                multiplier,
                additive,
            } => {
                let entry = p.resistances.entry(status).or_default();
                *entry = entry.merge(StatusResistance {
                    multiplier,
                    additive,
                });
            }
            SkillEffect::Absorption(v) => {
                p.sustain.absorption_percent = merge::sum(p.sustain.absorption_percent, v);
            }
            SkillEffect::ChargeGain(v) => {
                p.sustain.charge_gain_chance = merge::sum(p.sustain.charge_gain_chance, v);
            }
            SkillEffect::ChargeRegen(n) => {
                p.sustain.charge_regen = p.sustain.charge_regen.saturating_add(n);
            }
            SkillEffect::Degradation(v) => {
                p.sustain.degradation_dealt = merge::sum(p.sustain.degradation_dealt, v);
            }
            SkillEffect::DegradationRepair(v) => {
                p.sustain.degradation_repair = merge::sum(p.sustain.degradation_repair, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{
        AttackMultipliers, ExtraActionDescriptor, ExtraActionTrigger, ReactionAction,
        ReactionChance, ReactionDescriptor, ReactionTarget, ReactionTrigger,
    };
    use crate::state::{AbilityId, StatusId};

    fn ability(id: u16, effects: Vec<SkillEffect>) -> AbilityDescriptor {
        AbilityDescriptor::new(AbilityId(id), effects)
    }

    #[test]
    fn empty_fold_is_neutral() {
        let profile = ProfileBuilder::fold(&Vec::<AbilityDescriptor>::new());
        assert_eq!(profile, SkillProfile::default());
        assert_eq!(profile.damage.physical_dealt, 1.0);
        assert_eq!(profile.ally_protection, 1.0);
    }

    #[test]
    fn merges_by_field_kind() {
        let abilities = vec![
            ability(
                1,
                vec![
                    SkillEffect::DamageDealt {
                        damage_type: DamageType::Physical,
                        multiplier: 1.2,
                    },
                    SkillEffect::CriticalBonus(5.0),
                    SkillEffect::Sacrifice { interval: 3 },
                    SkillEffect::Resurrection {
                        chance: 30.0,
                        hp_percent: 20,
                        uses: 1,
                    },
                ],
            ),
            ability(
                2,
                vec![
                    SkillEffect::DamageDealt {
                        damage_type: DamageType::Physical,
                        multiplier: 1.5,
                    },
                    SkillEffect::CriticalBonus(10.0),
                    SkillEffect::Sacrifice { interval: 2 },
                    SkillEffect::Resurrection {
                        chance: 50.0,
                        hp_percent: 10,
                        uses: 1,
                    },
                    SkillEffect::AllyProtection(0.8),
                    SkillEffect::AllyProtection(0.6),
                ],
            ),
        ];
        let profile = ProfileBuilder::fold(&abilities);

        assert!((profile.damage.physical_dealt - 1.8).abs() < 1e-9);
        assert_eq!(profile.rates.critical_bonus, 15.0);
        assert_eq!(profile.sacrifice.map(|s| s.interval), Some(2));
        let revive = profile.resurrection.expect("resurrection rule");
        assert_eq!(revive.chance, 50.0);
        assert_eq!(revive.hp_percent, 20);
        assert_eq!(profile.ally_protection, 0.6);
    }

    #[test]
    fn descriptors_keep_declaration_order() {
        let counter = ReactionDescriptor::new(
            AbilityId(10),
            ReactionTrigger::SelfDamagedPhysical,
            ReactionChance::flat(25.0),
            ReactionAction::Physical(AttackMultipliers::NEUTRAL),
            ReactionTarget::Attacker,
        );
        let follow_up = ReactionDescriptor::new(
            AbilityId(11),
            ReactionTrigger::KilledEnemy,
            ReactionChance::flat(40.0),
            ReactionAction::Physical(AttackMultipliers::NEUTRAL),
            ReactionTarget::Random,
        );
        let extra = ExtraActionDescriptor::new(AbilityId(12), ExtraActionTrigger::Always, 100.0, 1);
        let profile = ProfileBuilder::new()
            .with_effect(&SkillEffect::Reaction(counter.clone()))
            .with_effect(&SkillEffect::ExtraAction(extra))
            .with_effect(&SkillEffect::Reaction(follow_up.clone()))
            .build();

        assert_eq!(profile.reactions, vec![counter, follow_up]);
        assert_eq!(profile.extra_actions, vec![extra]);
        assert_eq!(
            profile
                .reactions_for(ReactionTrigger::KilledEnemy)
                .map(|r| r.id)
                .collect::<Vec<_>>(),
            vec![AbilityId(11)]
        );
    }

    #[test]
    fn status_groups_merge() {
        let profile = ProfileBuilder::new()
            .with_effect(&SkillEffect::InflictStatus {
                status: StatusId(2),
                chance: 10.0,
            })
            .with_effect(&SkillEffect::InflictStatus {
                status: StatusId(2),
                chance: 15.0,
            })
            .with_effect(&SkillEffect::ResistStatus {
                status: StatusId(2),
                multiplier: 0.5,
                additive: -5.0,
            })
            .with_effect(&SkillEffect::ResistStatus {
                status: StatusId(2),
                multiplier: 0.5,
                additive: -5.0,
            })
            .with_effect(&SkillEffect::Berserk {
                chance: 20.0,
                status: StatusId(4),
            })
            .build();

        assert_eq!(profile.inflictions.get(&StatusId(2)), Some(&25.0));
        let resist = profile.resistance(StatusId(2));
        assert_eq!(resist.multiplier, 0.25);
        assert_eq!(resist.additive, -10.0);
        assert_eq!(profile.referenced_statuses(), vec![StatusId(2), StatusId(4)]);
    }
}
