use crate::env::RandomSource;
use crate::log::{ActionEntry, Effect, EffectKind};
use crate::profile::ReviveRule;
use crate::state::ActorId;

use super::BattleEngine;
use super::reaction::{Origin, ReactionEvent};

impl<R: RandomSource> BattleEngine<'_, R> {
    /// Runs defeat handling if `victim` just dropped to zero HP.
    ///
    /// Returns `true` when the victim stays down.
    pub(crate) fn resolve_if_defeated(
        &mut self,
        victim: ActorId,
        killer: Option<ActorId>,
        origin: Origin,
        entry: &mut ActionEntry,
    ) -> bool {
        if self.ctx.actor(victim).is_alive() {
            return false;
        }
        self.handle_defeat(victim, killer, origin, entry)
    }

    /// Defeat path shared by every damage source: resurrection, then rescue,
    /// then the defeat/kill follow-up events.
    fn handle_defeat(
        &mut self,
        victim: ActorId,
        killer: Option<ActorId>,
        origin: Origin,
        entry: &mut ActionEntry,
    ) -> bool {
        entry.push(Effect::on(EffectKind::Defeated, victim));
        tracing::trace!(%victim, killer = ?killer, turn = self.ctx.turn, "actor defeated");

        if self.try_resurrect(victim, entry) || self.try_rescue(victim, entry) {
            return false;
        }

        self.emit(origin, ReactionEvent::AllyDefeated { victim, killer });
        if let Some(killer) = killer.filter(|k| !k.is_ally_of(victim)) {
            self.emit(origin, ReactionEvent::KilledEnemy { killer, victim });
        }
        true
    }

    fn try_resurrect(&mut self, victim: ActorId, entry: &mut ActionEntry) -> bool {
        let (rule, used) = {
            let actor = self.ctx.actor(victim);
            match actor.profile.resurrection {
                Some(rule) => (rule, actor.resurrections_used),
                None => return false,
            }
        };
        if used >= rule.uses || !self.ctx.rng.chance(rule.chance) {
            return false;
        }

        let actor = self.ctx.actor_mut(victim);
        let hp = revive_hp(actor.max_hp(), rule);
        actor.resurrections_used += 1;
        let restored = actor.restore_hp(hp);
        entry.push(Effect::on(EffectKind::Resurrected, victim).with_value(restored));
        true
    }

    /// Active allies holding a rescue rule roll in roster order; the first
    /// success revives the victim.
    fn try_rescue(&mut self, victim: ActorId, entry: &mut ActionEntry) -> bool {
        for rescuer in self.ctx.active_allies(victim) {
            let (rule, used) = {
                let actor = self.ctx.actor(rescuer);
                match actor.profile.rescue {
                    Some(rule) => (rule, actor.rescues_used),
                    None => continue,
                }
            };
            if used >= rule.uses || !self.ctx.rng.chance(rule.chance) {
                continue;
            }

            self.ctx.actor_mut(rescuer).rescues_used += 1;
            let hp = revive_hp(self.ctx.actor(victim).max_hp(), rule);
            let restored = self.ctx.actor_mut(victim).restore_hp(hp);
            entry.push(
                Effect::on(EffectKind::Rescued, victim)
                    .with_value(restored)
                    .with_raw(rescuer.index as u32),
            );
            return true;
        }
        false
    }
}

/// `max(1, max_hp × percent / 100)`, percent capped at 100.
fn revive_hp(max_hp: u32, rule: ReviveRule) -> u32 {
    let percent = u64::from(rule.hp_percent.min(100));
    ((u64::from(max_hp) * percent / 100) as u32).max(1)
}
