//! Pre-turn phase and turn ordering.

use crate::env::RandomSource;
use crate::log::{ActionEntry, ActionKind, Effect, EffectKind};
use crate::state::{ActorId, Side};

use super::BattleEngine;

/// One unit of turn-order participation.
#[derive(Clone, Copy, Debug, PartialEq)]
struct OrderSlot {
    actor: ActorId,
    first_strike: bool,
    speed: f64,
    tiebreak: u32,
}

impl<R: RandomSource> BattleEngine<'_, R> {
    /// Advances the turn counter and runs the pre-turn phase: flag reset,
    /// forced retreat, sacrifice selection and slot modifiers.
    pub(crate) fn begin_turn(&mut self) {
        self.ctx.turn += 1;
        for id in self.ctx.all_ids() {
            let flags = &mut self.ctx.actor_mut(id).turn;
            flags.guarding = false;
            flags.slots = 0;
            flags.extra_actions_taken = 0;
        }
        self.ctx.reaction_uses.clear();
        self.ctx.sacrifice_targets = [None, None];

        let mut entry = ActionEntry::new(self.ctx.turn, None, ActionKind::TurnStart);
        self.roll_withdrawals(&mut entry);
        for side in Side::ALL {
            self.select_sacrifice(side, &mut entry);
        }
        self.assign_slots(&mut entry);
        self.ctx.log.push(entry);
    }

    fn roll_withdrawals(&mut self, entry: &mut ActionEntry) {
        let turn = self.ctx.turn;
        for id in self.ctx.all_ids() {
            let actor = self.ctx.actor(id);
            if !actor.is_active() {
                continue;
            }
            let Some(rule) = actor.profile.retreat else {
                continue;
            };
            if turn < rule.from_turn || !self.ctx.rng.chance(rule.chance) {
                continue;
            }
            self.ctx.actor_mut(id).withdrawn = true;
            entry.push(Effect::on(EffectKind::Withdrawn, id));
            tracing::debug!(actor = %id, turn, "actor withdrew");
        }
    }

    /// The first active holder whose interval divides the turn picks the
    /// lowest-level active ally other than itself, ties by roster index.
    fn select_sacrifice(&mut self, side: Side, entry: &mut ActionEntry) {
        let turn = self.ctx.turn;
        for holder in self.ctx.sacrifice_holders[side.slot()].clone() {
            let actor = self.ctx.actor(holder);
            let Some(rule) = actor.profile.sacrifice else {
                continue;
            };
            if !actor.is_active() || rule.interval == 0 || turn % rule.interval != 0 {
                continue;
            }
            let target = self
                .ctx
                .active_allies(holder)
                .into_iter()
                .min_by_key(|&ally| (self.ctx.actor(ally).level, ally.index));
            if let Some(target) = target {
                self.ctx.sacrifice_targets[side.slot()] = Some(target);
                entry.push(
                    Effect::on(EffectKind::SacrificeSelected, target).with_raw(holder.index as u32),
                );
                return;
            }
        }
    }

    /// Slot counts: one plus bonus slots, reduced by opposing debuffs and
    /// zeroed by a skip proc.
    fn assign_slots(&mut self, entry: &mut ActionEntry) {
        let ids = self.ctx.all_ids();
        for &id in &ids {
            let actor = self.ctx.actor_mut(id);
            if actor.is_active() {
                actor.turn.slots = 1u8.saturating_add(actor.profile.order.extra_slots);
            }
        }

        for &id in &ids {
            let actor = self.ctx.actor(id);
            let debuff = actor.profile.enemy_action_debuff;
            if !actor.is_active() || debuff <= 0.0 {
                continue;
            }
            for opponent in self.ctx.active(id.side.opponent()) {
                if self.ctx.actor(opponent).turn.slots == 0 {
                    continue;
                }
                if self.ctx.rng.chance(debuff) {
                    self.ctx.actor_mut(opponent).turn.slots -= 1;
                    entry.push(Effect::on(EffectKind::ActionDebuffed, opponent));
                }
            }
        }

        for &id in &ids {
            let actor = self.ctx.actor(id);
            let skip = actor.profile.skip_chance;
            if !actor.is_active() || skip <= 0.0 || actor.turn.slots == 0 {
                continue;
            }
            if self.ctx.rng.chance(skip) {
                self.ctx.actor_mut(id).turn.slots = 0;
                entry.push(Effect::on(EffectKind::ActionSkipped, id));
            }
        }
    }

    /// Full slot ordering for this turn.
    ///
    /// Sorted by first strike, then descending speed, then a per-slot random
    /// tiebreak. Shuffled actors draw a uniform speed in `[0, fastest)`.
    pub(crate) fn turn_order(&mut self) -> Vec<ActorId> {
        let active: Vec<ActorId> = self
            .ctx
            .all_ids()
            .into_iter()
            .filter(|&id| self.ctx.actor(id).is_active())
            .collect();
        let fastest = active
            .iter()
            .map(|&id| self.ctx.actor(id).speed())
            .fold(0.0, f64::max)
            .max(1.0);

        let mut slots = Vec::new();
        for id in active {
            let (shuffled, base, first_strike, count) = {
                let actor = self.ctx.actor(id);
                (
                    self.ctx.shuffled_sides[id.side.slot()] || actor.profile.order.shuffle_own,
                    actor.speed(),
                    actor.profile.order.first_strike,
                    actor.turn.slots,
                )
            };
            let speed = if shuffled {
                self.ctx.rng.next_f64() * fastest
            } else {
                base
            };
            self.ctx.actor_mut(id).turn.turn_speed = speed;

            for n in 0..count {
                let tiebreak = self.ctx.rng.next_u32();
                if n == 0 {
                    self.ctx.actor_mut(id).turn.order_tiebreak = tiebreak;
                }
                slots.push(OrderSlot {
                    actor: id,
                    first_strike,
                    speed,
                    tiebreak,
                });
            }
        }

        slots.sort_by(|a, b| {
            b.first_strike
                .cmp(&a.first_strike)
                .then(b.speed.total_cmp(&a.speed))
                .then(a.tiebreak.cmp(&b.tiebreak))
        });
        slots.into_iter().map(|slot| slot.actor).collect()
    }
}
