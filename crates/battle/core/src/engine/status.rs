//! Status and buff lifecycle: infliction, redirection, auto-cure, action
//! locks, berserk, and end-of-turn housekeeping.

use std::collections::BTreeMap;

use crate::combat::{status_chance, tick_damage};
use crate::env::{RandomSource, StatusTags};
use crate::log::{ActionEntry, ActionKind, Effect, EffectKind};
use crate::state::{ActorId, BuffStat, ChargeKey, DamageType, StatusId, TimedBuff};

use super::BattleEngine;
use super::reaction::Origin;

impl<R: RandomSource> BattleEngine<'_, R> {
    /// First action-locking status on `actor`, if any.
    pub(crate) fn locking_status(&self, actor: ActorId) -> Option<StatusId> {
        self.ctx
            .actor(actor)
            .statuses
            .iter()
            .map(|s| s.status)
            .find(|&id| self.env.status(id).is_some_and(|def| def.locks_action))
    }

    pub(crate) fn is_confused(&self, actor: ActorId) -> bool {
        self.ctx
            .actor(actor)
            .statuses
            .iter()
            .any(|s| self.env.status(s.status).is_some_and(|def| def.is_confusion()))
    }

    /// Rolls a status attempt from `source` against `target`.
    pub(crate) fn try_inflict(
        &mut self,
        source: ActorId,
        target: ActorId,
        status: StatusId,
        base_chance: f64,
        entry: &mut ActionEntry,
    ) -> bool {
        let Some(def) = self.env.status(status) else {
            return false;
        };
        let chance = {
            let t = self.ctx.actor(target);
            if !t.is_active() {
                return false;
            }
            let spell_bound = def.tags.contains(StatusTags::SPELL_BOUND)
                && t.barriers.remaining(DamageType::Magical) > 0;
            status_chance(
                base_chance,
                t.profile.resistance(status),
                spell_bound,
                self.config.combat.barrier_status_factor,
            )
        };

        if !self.ctx.rng.chance(chance) {
            entry.push(Effect::on(EffectKind::StatusResisted, target).with_status(status));
            return false;
        }
        self.land_status(Some(source), target, status, entry)
    }

    /// Puts `status` on `target` without a roll.
    ///
    /// Harmful statuses from an opponent are redirected onto the side's
    /// sacrifice target when one was selected this turn. A landed status is
    /// stripped at once when an active ally carries auto-cure.
    pub(crate) fn land_status(
        &mut self,
        source: Option<ActorId>,
        target: ActorId,
        status: StatusId,
        entry: &mut ActionEntry,
    ) -> bool {
        let Some(def) = self.env.status(status) else {
            return false;
        };

        let mut target = target;
        let hostile = source.is_some_and(|s| !s.is_ally_of(target));
        if hostile && def.is_harmful() {
            if let Some(sacrifice) = self.ctx.sacrifice_targets[target.side.slot()] {
                if sacrifice != target && self.ctx.actor(sacrifice).is_active() {
                    entry.push(
                        Effect::on(EffectKind::StatusRedirected, target)
                            .with_status(status)
                            .with_raw(sacrifice.index as u32),
                    );
                    target = sacrifice;
                }
            }
        }

        let applied = self
            .ctx
            .actor_mut(target)
            .statuses
            .apply(status, def.duration, source, 1);
        if !applied.changed() {
            return false;
        }
        entry.push(
            Effect::on(EffectKind::StatusApplied, target)
                .with_status(status)
                .with_value(def.duration as u32),
        );
        tracing::trace!(%target, status = status.0, "status applied");

        let cured = self
            .ctx
            .active_allies(target)
            .into_iter()
            .any(|ally| self.ctx.actor(ally).profile.auto_cure);
        if cured {
            for removed in self.ctx.actor_mut(target).statuses.clear() {
                entry.push(Effect::on(EffectKind::StatusCured, target).with_status(removed));
            }
        }
        true
    }

    pub(crate) fn apply_buff(
        &mut self,
        target: ActorId,
        buff: u16,
        turns: u8,
        modifiers: &BTreeMap<BuffStat, f64>,
        entry: &mut ActionEntry,
    ) -> bool {
        if !self.ctx.actor(target).is_active() || turns == 0 {
            return false;
        }
        let applied = self.ctx.actor_mut(target).buffs.apply(TimedBuff {
            id: buff,
            remaining_turns: turns,
            modifiers: modifiers.clone(),
        });
        if applied {
            entry.push(
                Effect::on(EffectKind::BuffApplied, target)
                    .with_value(turns as u32)
                    .with_raw(buff as u32),
            );
        }
        applied
    }

    /// Berserk roll before an action; a success self-inflicts the rule's
    /// status and logs a `berserk` entry.
    pub(crate) fn roll_berserk(&mut self, actor: ActorId, depth: u8) {
        let Some(rule) = self.ctx.actor(actor).profile.berserk else {
            return;
        };
        if !self.ctx.rng.chance(rule.chance) {
            return;
        }
        let mut entry =
            ActionEntry::new(self.ctx.turn, Some(actor), ActionKind::Berserk).at_depth(depth);
        self.land_status(Some(actor), actor, rule.status, &mut entry);
        self.ctx.log.push(entry);
    }

    /// End-of-turn housekeeping for every active actor, players first.
    pub(crate) fn end_of_turn(&mut self) {
        let mut entry = ActionEntry::new(self.ctx.turn, None, ActionKind::TurnEnd);
        for id in self.ctx.all_ids() {
            if !self.ctx.actor(id).is_active() {
                continue;
            }
            if self.tick_statuses(id, &mut entry) {
                continue;
            }
            self.recover_statuses(id, &mut entry);

            let actor = self.ctx.actor_mut(id);
            for expired in actor.statuses.tick_down() {
                entry.push(Effect::on(EffectKind::StatusExpired, id).with_status(expired));
            }
            for expired in actor.buffs.tick_down() {
                entry.push(Effect::on(EffectKind::BuffExpired, id).with_raw(expired as u32));
            }

            let regen = actor.profile.sustain.charge_regen;
            if regen > 0 {
                for spell in actor.spells.clone() {
                    let gained = actor.charges.restore(ChargeKey::Spell(spell), regen);
                    if gained > 0 {
                        entry.push(
                            Effect::on(EffectKind::ChargeRegenerated, id)
                                .with_value(gained as u32)
                                .with_raw(spell.0 as u32),
                        );
                    }
                }
            }

            let repair = actor.profile.sustain.degradation_repair;
            if repair > 0.0 && actor.degradation > 0.0 {
                let before = actor.degradation;
                actor.degradation = (before - repair).max(0.0);
                entry.push(
                    Effect::on(EffectKind::DegradationRepaired, id)
                        .with_value(crate::combat::finalize(before - actor.degradation, 0)),
                );
            }
        }
        self.ctx.log.push(entry);
        self.dispatch_reactions();
    }

    /// Status damage ticks. Returns `true` when the actor went down.
    fn tick_statuses(&mut self, id: ActorId, entry: &mut ActionEntry) -> bool {
        let ticks: Vec<(StatusId, u8)> = self
            .ctx
            .actor(id)
            .statuses
            .iter()
            .filter_map(|s| {
                self.env
                    .status(s.status)
                    .filter(|def| def.tick_damage_percent > 0)
                    .map(|def| (s.status, def.tick_damage_percent))
            })
            .collect();

        for (status, percent) in ticks {
            let actor = self.ctx.actor_mut(id);
            let damage = tick_damage(actor.max_hp(), percent);
            let lost = actor.take_damage(damage);
            entry.push(
                Effect::on(EffectKind::StatusDamage, id)
                    .with_status(status)
                    .with_value(lost)
                    .with_raw(damage),
            );
            if self.resolve_if_defeated(id, None, Origin::Primary, entry) {
                return true;
            }
        }
        false
    }

    fn recover_statuses(&mut self, id: ActorId, entry: &mut ActionEntry) {
        let rolls: Vec<(StatusId, f64)> = self
            .ctx
            .actor(id)
            .statuses
            .iter()
            .filter_map(|s| {
                self.env
                    .status(s.status)
                    .filter(|def| def.recovery_chance > 0.0)
                    .map(|def| (s.status, def.recovery_chance))
            })
            .collect();

        for (status, chance) in rolls {
            if self.ctx.rng.chance(chance) && self.ctx.actor_mut(id).statuses.remove(status) {
                entry.push(Effect::on(EffectKind::StatusRecovered, id).with_status(status));
            }
        }
    }
}
