//! Action execution: walks a choice chain until one link can be performed.

use crate::combat::heal_amount;
use crate::env::{EnemySkillKind, RandomSource, SpellKind, Targeting};
use crate::log::{ActionEntry, ActionKind, Effect, EffectKind};
use crate::profile::AttackMultipliers;
use crate::state::{ActorId, ChargeKey, EnemySkillId, SpellId};

use super::reaction::{Origin, ReactionEvent};
use super::{ActionChoice, BattleEngine};

impl<R: RandomSource> BattleEngine<'_, R> {
    /// Performs the first feasible link of `chain` and logs it.
    ///
    /// `Guard` always succeeds, so an entry is logged for every call.
    pub(crate) fn perform_chain(&mut self, actor: ActorId, chain: &[ActionChoice], depth: u8) {
        for &choice in chain {
            if let Some(entry) = self.perform(actor, choice, depth) {
                self.ctx.log.push(entry);
                return;
            }
        }
        let entry = self.guard(actor, depth);
        self.ctx.log.push(entry);
    }

    fn perform(&mut self, actor: ActorId, choice: ActionChoice, depth: u8) -> Option<ActionEntry> {
        match choice {
            ActionChoice::EnemySkill(skill) => self.perform_enemy_skill(actor, skill, depth),
            ActionChoice::Breath => self.perform_breath(actor, depth),
            ActionChoice::Spell(school) => {
                let spell = self.choose_spell(actor, school)?;
                let mut entry = self
                    .entry(actor, ActionKind::Spell, depth)
                    .with_ability(spell.0 as u16);
                self.cast_spell(actor, spell, None, Origin::Primary, &mut entry)
                    .then_some(entry)
            }
            ActionChoice::Physical => self.perform_attack(actor, depth),
            ActionChoice::Guard => Some(self.guard(actor, depth)),
        }
    }

    fn entry(&self, actor: ActorId, kind: ActionKind, depth: u8) -> ActionEntry {
        ActionEntry::new(self.ctx.turn, Some(actor), kind).at_depth(depth)
    }

    fn guard(&mut self, actor: ActorId, depth: u8) -> ActionEntry {
        let mut entry = self.entry(actor, ActionKind::Guard, depth);
        self.ctx.actor_mut(actor).turn.guarding = true;
        entry.push(Effect::on(EffectKind::Guarding, actor));
        entry
    }

    fn perform_attack(&mut self, actor: ActorId, depth: u8) -> Option<ActionEntry> {
        let target = self.random_opponent(actor)?;
        let mut entry = self.entry(actor, ActionKind::Attack, depth);
        let outcome = self.physical_strike(
            actor,
            target,
            AttackMultipliers::NEUTRAL,
            Origin::Primary,
            &mut entry,
        );
        if outcome.landed && !outcome.defeated {
            self.emit(
                Origin::Primary,
                ReactionEvent::AttackedWithoutKill {
                    attacker: actor,
                    targets: vec![target],
                },
            );
        }
        Some(entry)
    }

    fn perform_breath(&mut self, actor: ActorId, depth: u8) -> Option<ActionEntry> {
        let targets = self.ctx.active(actor.side.opponent());
        if targets.is_empty() {
            return None;
        }
        let mut entry = self.entry(actor, ActionKind::Breath, depth);
        if !self.spend_charge(actor, ChargeKey::Breath, 1, &mut entry) {
            return None;
        }
        for target in targets {
            self.breath_strike(actor, target, 1.0, Origin::Primary, &mut entry);
        }
        Some(entry)
    }

    /// Confused actors strike a random teammate, or an opponent when alone.
    pub(crate) fn confused_attack(&mut self, actor: ActorId, depth: u8) {
        let mut entry = self.entry(actor, ActionKind::ConfusedAttack, depth);
        let allies = self.ctx.active_allies(actor);
        let target = if allies.is_empty() {
            self.random_opponent(actor)
        } else {
            let pick = self.ctx.rng.index(allies.len());
            Some(allies[pick])
        };
        if let Some(target) = target {
            self.physical_strike(
                actor,
                target,
                AttackMultipliers::NEUTRAL,
                Origin::Primary,
                &mut entry,
            );
        }
        self.ctx.log.push(entry);
    }

    /// Casts `spell`, spending its charge. `preferred` steers single-target
    /// offensive spells (reactions aim at their trigger's attacker).
    ///
    /// Returns `false` when the spell is unknown or out of charges.
    pub(crate) fn cast_spell(
        &mut self,
        caster: ActorId,
        spell: SpellId,
        preferred: Option<ActorId>,
        origin: Origin,
        entry: &mut ActionEntry,
    ) -> bool {
        let Some(def) = self.env.spell(spell) else {
            return false;
        };
        if !self.spend_charge(caster, ChargeKey::Spell(spell), def.charge_cost, entry) {
            return false;
        }
        tracing::trace!(%caster, spell = spell.0, "spell cast");

        match &def.kind {
            SpellKind::Attack { multiplier, hits } => {
                let targets = self.offensive_targets(caster, def.targeting, preferred);
                for &target in &targets {
                    for _ in 0..(*hits).max(1) {
                        self.magical_strike(
                            caster,
                            target,
                            *multiplier,
                            Some(spell),
                            origin,
                            entry,
                        );
                    }
                }
                let hostile: Vec<ActorId> = targets
                    .into_iter()
                    .filter(|t| !t.is_ally_of(caster))
                    .collect();
                if !hostile.is_empty() {
                    self.emit(
                        origin,
                        ReactionEvent::AllyCastAttackSpell {
                            caster,
                            targets: hostile,
                        },
                    );
                }
            }
            SpellKind::Heal {
                flat_percent,
                multiplier,
            } => {
                for target in self.support_targets(caster, def.targeting) {
                    self.heal(caster, target, *flat_percent, *multiplier, entry);
                }
            }
            SpellKind::Status { status, chance } => {
                let targets = if def.targeting.is_supportive() {
                    self.support_targets(caster, def.targeting)
                } else {
                    self.offensive_targets(caster, def.targeting, preferred)
                };
                for target in targets {
                    self.try_inflict(caster, target, *status, *chance, entry);
                }
            }
            SpellKind::Buff {
                buff,
                turns,
                modifiers,
            } => {
                for target in self.support_targets(caster, def.targeting) {
                    self.apply_buff(target, *buff, *turns, modifiers, entry);
                }
            }
        }
        true
    }

    fn heal(
        &mut self,
        healer: ActorId,
        target: ActorId,
        flat_percent: Option<u8>,
        multiplier: f64,
        entry: &mut ActionEntry,
    ) {
        let amount = {
            let h = self.ctx.actor(healer);
            let t = self.ctx.actor(target);
            if !t.is_active() {
                return;
            }
            heal_amount(
                flat_percent,
                t.max_hp(),
                h.stats.magical_healing,
                multiplier,
                h.profile.damage.healing,
            )
        };
        let gained = self.ctx.actor_mut(target).restore_hp(amount);
        entry.push(
            Effect::on(EffectKind::Heal, target)
                .with_value(gained)
                .with_raw(amount),
        );
    }

    fn perform_enemy_skill(
        &mut self,
        actor: ActorId,
        skill: EnemySkillId,
        depth: u8,
    ) -> Option<ActionEntry> {
        let def = self.env.enemy_skill(skill)?;
        let mut entry = self
            .entry(actor, ActionKind::EnemySkill, depth)
            .with_ability(skill.0);
        let origin = Origin::Primary;
        let hits = def.hits.max(1);

        let mut struck = Vec::new();
        match &def.kind {
            EnemySkillKind::Physical => {
                let picks: Vec<ActorId> = if def.targeting == Targeting::Random {
                    (0..hits).filter_map(|_| self.random_opponent(actor)).collect()
                } else {
                    self.offensive_targets(actor, def.targeting, None)
                };
                let multipliers = AttackMultipliers {
                    attack_count: if def.targeting == Targeting::Random {
                        1.0
                    } else {
                        hits as f64
                    },
                    damage: def.damage_multiplier,
                    accuracy: def.accuracy_multiplier,
                    ..AttackMultipliers::NEUTRAL
                };
                for target in picks {
                    if self
                        .physical_strike(actor, target, multipliers, origin, &mut entry)
                        .landed
                    {
                        struck.push(target);
                    }
                }
            }
            EnemySkillKind::Magical => {
                for target in self.offensive_targets(actor, def.targeting, None) {
                    for _ in 0..hits {
                        let outcome = self.magical_strike(
                            actor,
                            target,
                            def.damage_multiplier,
                            None,
                            origin,
                            &mut entry,
                        );
                        if outcome.landed {
                            struck.push(target);
                        }
                    }
                }
            }
            EnemySkillKind::Breath => {
                for target in self.offensive_targets(actor, def.targeting, None) {
                    if self
                        .breath_strike(actor, target, def.damage_multiplier, origin, &mut entry)
                        .landed
                    {
                        struck.push(target);
                    }
                }
            }
            EnemySkillKind::Heal { percent } => {
                for target in self.support_targets(actor, def.targeting) {
                    self.heal(actor, target, Some(*percent), 1.0, &mut entry);
                }
            }
            EnemySkillKind::Status { status, chance } => {
                for target in self.offensive_targets(actor, def.targeting, None) {
                    self.try_inflict(actor, target, *status, *chance, &mut entry);
                }
            }
            EnemySkillKind::Buff {
                buff,
                turns,
                modifiers,
            } => {
                for target in self.support_targets(actor, def.targeting) {
                    self.apply_buff(target, *buff, *turns, modifiers, &mut entry);
                }
            }
        }

        if let Some((status, chance)) = def.inflicts {
            let mut seen = Vec::with_capacity(struck.len());
            for target in struck {
                if seen.contains(&target) {
                    continue;
                }
                seen.push(target);
                if self.ctx.actor(target).is_active() {
                    self.try_inflict(actor, target, status, chance, &mut entry);
                }
            }
        }
        Some(entry)
    }
}
