//! Damage application.
//!
//! Every instigator (main attack, enemy skill, preemptive strike, reaction)
//! goes through these three strikes, so hit/crit/barrier/side-effect rules
//! are identical wherever damage originates.

use crate::combat::{
    self, MagicalHit, PhysicalHit, attack_count, barrier_absorb, block_chance, breath_damage,
    critical_chance, hit_chance, magical_damage, parry_chance, physical_damage,
};
use crate::env::RandomSource;
use crate::log::{ActionEntry, Effect, EffectKind};
use crate::profile::AttackMultipliers;
use crate::state::{ActorId, ChargeKey, DamageType, SpellId};

use super::BattleEngine;
use super::reaction::{Origin, ReactionEvent};

/// What one strike did to its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct StrikeOutcome {
    /// HP removed from the target.
    pub damage: u32,
    pub landed: bool,
    pub critical: bool,
    pub defeated: bool,
}

impl<R: RandomSource> BattleEngine<'_, R> {
    /// Physical attack sequence against one target.
    ///
    /// Parry and block are rolled once before the hits; either negates the
    /// whole sequence.
    pub(crate) fn physical_strike(
        &mut self,
        attacker: ActorId,
        target: ActorId,
        multipliers: AttackMultipliers,
        origin: Origin,
        entry: &mut ActionEntry,
    ) -> StrikeOutcome {
        if !self.ctx.actor(target).is_active() || !self.ctx.actor(attacker).is_alive() {
            return StrikeOutcome::default();
        }

        if self.roll_guard_negation(attacker, target, entry) {
            self.emit(
                origin,
                ReactionEvent::SelfEvaded {
                    evader: target,
                    attacker,
                },
            );
            return StrikeOutcome::default();
        }

        let params = &self.config.combat;
        let protection = self.ally_protection(target);
        let (hits, accuracy, crit, template, hit_score) = {
            let a = self.ctx.actor(attacker);
            let d = self.ctx.actor(target);
            let rates = &a.profile.rates;
            let hits = attack_count(
                a.stats.attack_count,
                rates.attack_count * multipliers.attack_count,
            );
            let crit = critical_chance(
                a.critical_rate(),
                rates.critical_bonus,
                rates.critical_cap,
                rates.critical_rate_multiplier * multipliers.critical_rate,
            );
            let row_factor = if a.profile.ignores_row {
                1.0
            } else {
                params.row_factor(a.row)
            };
            let template = PhysicalHit {
                degradation: d.degradation,
                critical_damage: a.profile.damage.critical_damage,
                martial: a.profile.damage.martial,
                dealt: a.profile.damage.dealt(DamageType::Physical),
                race: a.profile.damage.race_multiplier(d.race),
                row_factor,
                scaling: multipliers.damage,
                taken: d.profile.damage.taken(DamageType::Physical),
                guarding: d.turn.guarding,
                protection,
                ..PhysicalHit::new(a.physical_attack(), d.physical_defense())
            };
            (
                hits,
                rates.accuracy * multipliers.accuracy,
                crit,
                template,
                a.hit_score(),
            )
        };

        let degradation_before = self.ctx.actor(target).degradation;
        let mut total = 0u32;
        let mut raw_total = 0u32;
        let mut landed = 0u32;
        let mut crits = 0u32;
        for index in 0..hits {
            if !self.ctx.actor(target).is_alive() {
                break;
            }
            let evasion = self.ctx.actor(target).evasion_score();
            let chance = hit_chance(hit_score, evasion, accuracy, index, &self.config.combat);
            if !self.ctx.rng.chance(chance) {
                continue;
            }
            let critical = self.ctx.rng.chance(crit);
            let raw = physical_damage(
                &PhysicalHit {
                    critical,
                    degradation: self.ctx.actor(target).degradation,
                    ..template
                },
                &self.config.combat,
            );
            let damage = self.apply_barrier(target, DamageType::Physical, raw, entry);
            total = total.saturating_add(self.ctx.actor_mut(target).take_damage(damage));
            raw_total = raw_total.saturating_add(raw);
            landed += 1;
            if critical {
                crits += 1;
            }
            self.accrue_degradation(attacker, target);
        }

        if landed == 0 {
            entry.push(Effect::on(EffectKind::Miss, target));
            self.emit(
                origin,
                ReactionEvent::SelfEvaded {
                    evader: target,
                    attacker,
                },
            );
            return StrikeOutcome::default();
        }

        entry.push(
            Effect::on(EffectKind::PhysicalDamage, target)
                .with_value(total)
                .with_raw(raw_total),
        );
        if crits > 0 {
            entry.push(Effect::on(EffectKind::CriticalHit, target).with_value(crits));
        }
        let degradation = self.ctx.actor(target).degradation;
        if degradation > degradation_before {
            entry.push(
                Effect::on(EffectKind::Degradation, target)
                    .with_value(combat::finalize(degradation, 0)),
            );
        }

        self.physical_side_effects(attacker, target, total, entry);

        self.emit(
            origin,
            ReactionEvent::SelfDamagedPhysical {
                victim: target,
                attacker,
            },
        );
        self.emit(
            origin,
            ReactionEvent::AllyDamaged {
                victim: target,
                attacker,
            },
        );
        if crits > 0 {
            self.emit(origin, ReactionEvent::AllyCriticalHit { attacker, target });
        }

        let defeated = self.resolve_if_defeated(target, Some(attacker), origin, entry);
        StrikeOutcome {
            damage: total,
            landed: true,
            critical: crits > 0,
            defeated,
        }
    }

    /// One magical hit. `spell` selects the caster's spell-specific power.
    pub(crate) fn magical_strike(
        &mut self,
        caster: ActorId,
        target: ActorId,
        spell_multiplier: f64,
        spell: Option<SpellId>,
        origin: Origin,
        entry: &mut ActionEntry,
    ) -> StrikeOutcome {
        if !self.ctx.actor(target).is_active() {
            return StrikeOutcome::default();
        }

        let nullify = self.ctx.actor(target).profile.rates.magic_nullify;
        if nullify > 0.0 && self.ctx.rng.chance(nullify) {
            entry.push(Effect::on(EffectKind::MagicNullified, target));
            return StrikeOutcome::default();
        }

        let magic_critical = self.ctx.actor(caster).profile.rates.magic_critical;
        let critical = magic_critical > 0.0 && self.ctx.rng.chance(magic_critical);

        let raw = {
            let c = self.ctx.actor(caster);
            let d = self.ctx.actor(target);
            let hit = MagicalHit {
                degradation: d.degradation,
                critical,
                dealt: c.profile.damage.dealt(DamageType::Magical),
                spell_power: spell.map_or(1.0, |s| c.profile.damage.spell_multiplier(s)),
                taken: d.profile.damage.taken(DamageType::Magical),
                ..MagicalHit::new(c.magical_attack(), spell_multiplier, d.magical_defense())
            };
            magical_damage(&hit, &self.config.combat)
        };
        let damage = self.apply_barrier(target, DamageType::Magical, raw, entry);
        let lost = self.ctx.actor_mut(target).take_damage(damage);

        entry.push(
            Effect::on(EffectKind::MagicalDamage, target)
                .with_value(lost)
                .with_raw(raw),
        );
        if critical {
            entry.push(Effect::on(EffectKind::CriticalHit, target).with_value(1));
        }

        self.emit(
            origin,
            ReactionEvent::SelfDamagedMagical {
                victim: target,
                attacker: caster,
            },
        );
        self.emit(
            origin,
            ReactionEvent::AllyDamaged {
                victim: target,
                attacker: caster,
            },
        );
        if critical {
            self.emit(
                origin,
                ReactionEvent::AllyCriticalHit {
                    attacker: caster,
                    target,
                },
            );
        }

        let defeated = self.resolve_if_defeated(target, Some(caster), origin, entry);
        StrikeOutcome {
            damage: lost,
            landed: true,
            critical,
            defeated,
        }
    }

    /// One breath hit. The caller spends the breath charge.
    pub(crate) fn breath_strike(
        &mut self,
        attacker: ActorId,
        target: ActorId,
        multiplier: f64,
        origin: Origin,
        entry: &mut ActionEntry,
    ) -> StrikeOutcome {
        if !self.ctx.actor(target).is_active() {
            return StrikeOutcome::default();
        }

        let raw = {
            let a = self.ctx.actor(attacker);
            let d = self.ctx.actor(target);
            breath_damage(
                a.stats.breath_power,
                multiplier,
                d.magical_defense(),
                a.profile.damage.dealt(DamageType::Breath),
                d.profile.damage.taken(DamageType::Breath),
                &self.config.combat,
            )
        };
        let damage = self.apply_barrier(target, DamageType::Breath, raw, entry);
        let lost = self.ctx.actor_mut(target).take_damage(damage);
        entry.push(
            Effect::on(EffectKind::BreathDamage, target)
                .with_value(lost)
                .with_raw(raw),
        );

        self.emit(
            origin,
            ReactionEvent::AllyDamaged {
                victim: target,
                attacker,
            },
        );

        let defeated = self.resolve_if_defeated(target, Some(attacker), origin, entry);
        StrikeOutcome {
            damage: lost,
            landed: true,
            critical: false,
            defeated,
        }
    }

    /// Spends `cost` charges of `key`, logging the spend.
    pub(crate) fn spend_charge(
        &mut self,
        actor: ActorId,
        key: ChargeKey,
        cost: u8,
        entry: &mut ActionEntry,
    ) -> bool {
        if !self.ctx.actor_mut(actor).charges.spend(key, cost) {
            return false;
        }
        let mut effect = Effect::on(EffectKind::ChargeSpent, actor).with_value(cost as u32);
        if let ChargeKey::Spell(spell) = key {
            effect = effect.with_raw(spell.0 as u32);
        }
        entry.push(effect);
        true
    }

    /// Parry, then shield block. Logs whichever negated the attack.
    fn roll_guard_negation(
        &mut self,
        attacker: ActorId,
        target: ActorId,
        entry: &mut ActionEntry,
    ) -> bool {
        let (parry, block) = {
            let a = self.ctx.actor(attacker);
            let d = self.ctx.actor(target);
            let rates = &d.profile.rates;
            let params = &self.config.combat;
            let parry = rates
                .can_parry
                .then(|| parry_chance(rates.parry_bonus, &d.attributes, &a.attributes, params));
            let block = rates
                .can_block
                .then(|| block_chance(rates.block_bonus, &d.attributes, &a.attributes, params));
            (parry, block)
        };

        if let Some(chance) = parry {
            if self.ctx.rng.chance(chance) {
                entry.push(Effect::on(EffectKind::Parry, target));
                return true;
            }
        }
        if let Some(chance) = block {
            if self.ctx.rng.chance(chance) {
                entry.push(Effect::on(EffectKind::Block, target));
                return true;
            }
        }
        false
    }

    /// Consumes one barrier charge if available and returns the damage left.
    fn apply_barrier(
        &mut self,
        target: ActorId,
        damage_type: DamageType,
        damage: u32,
        entry: &mut ActionEntry,
    ) -> u32 {
        let guarding = self.ctx.actor(target).turn.guarding;
        match self
            .ctx
            .actor_mut(target)
            .barriers
            .consume(damage_type, guarding)
        {
            Some(hit) => {
                let left = barrier_absorb(damage, &self.config.combat);
                entry.push(
                    Effect::on(EffectKind::BarrierConsumed, target)
                        .with_value(damage - left.min(damage))
                        .with_raw(hit.guard as u32),
                );
                left
            }
            None => damage,
        }
    }

    fn accrue_degradation(&mut self, attacker: ActorId, target: ActorId) {
        let amount = self.ctx.actor(attacker).profile.sustain.degradation_dealt;
        if amount <= 0.0 {
            return;
        }
        let cap = self.config.combat.max_degradation;
        let defender = self.ctx.actor_mut(target);
        defender.degradation = (defender.degradation + amount).min(cap);
    }

    /// Inflictions, absorption and spell-charge gain after a landed sequence.
    fn physical_side_effects(
        &mut self,
        attacker: ActorId,
        target: ActorId,
        damage: u32,
        entry: &mut ActionEntry,
    ) {
        let inflictions: Vec<_> = self
            .ctx
            .actor(attacker)
            .profile
            .inflictions
            .iter()
            .map(|(&status, &chance)| (status, chance))
            .collect();
        for (status, chance) in inflictions {
            if !self.ctx.actor(target).is_alive() {
                break;
            }
            self.try_inflict(attacker, target, status, chance, entry);
        }

        let sustain = self.ctx.actor(attacker).profile.sustain;
        if sustain.absorption_percent > 0.0 && damage > 0 && self.ctx.actor(attacker).is_alive() {
            let amount = combat::finalize(damage as f64 * sustain.absorption_percent / 100.0, 0);
            let gained = self.ctx.actor_mut(attacker).restore_hp(amount);
            if gained > 0 {
                entry.push(Effect::on(EffectKind::Absorb, attacker).with_value(gained));
            }
        }

        if sustain.charge_gain_chance > 0.0 {
            let depleted = self.ctx.actor(attacker).charges.depleted_spells();
            if let Some(&spell) = depleted.first() {
                if self.ctx.rng.chance(sustain.charge_gain_chance) {
                    let gained = self
                        .ctx
                        .actor_mut(attacker)
                        .charges
                        .restore(ChargeKey::Spell(spell), 1);
                    if gained > 0 {
                        entry.push(
                            Effect::on(EffectKind::ChargeGained, attacker)
                                .with_value(gained as u32)
                                .with_raw(spell.0 as u32),
                        );
                    }
                }
            }
        }
    }
}
