//! Turn loop: battle-start phase, per-turn passes, extra actions and
//! termination.

use crate::env::RandomSource;
use crate::log::{ActionEntry, ActionKind};
use crate::state::{ActorId, Side};

use super::reaction::Origin;
use super::{BattleEngine, Outcome};

impl<R: RandomSource> BattleEngine<'_, R> {
    pub(crate) fn run_battle(&mut self) -> Outcome {
        if let Some(outcome) = self.start_phase() {
            return self.finish(outcome);
        }

        while self.ctx.turn < self.config.max_turns {
            self.begin_turn();
            if let Some(outcome) = self.check_outcome() {
                return self.finish(outcome);
            }

            for actor in self.turn_order() {
                if !self.ctx.actor(actor).is_active() {
                    continue;
                }
                self.take_turn(actor, 0);
                if let Some(outcome) = self.check_outcome() {
                    return self.finish(outcome);
                }
            }

            self.end_of_turn();
            if let Some(outcome) = self.check_outcome() {
                return self.finish(outcome);
            }
            tracing::trace!(turn = self.ctx.turn, "turn complete");
        }

        self.finish(Outcome::Retreat)
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.ctx.queue.clear();
        self.ctx
            .log
            .push(ActionEntry::new(self.ctx.turn, None, ActionKind::BattleEnd));
        outcome
    }

    /// Turn 0: start marker, enemy appearances, preemptive attacks.
    fn start_phase(&mut self) -> Option<Outcome> {
        self.ctx
            .log
            .push(ActionEntry::new(0, None, ActionKind::BattleStart));
        for enemy in self.ctx.active(Side::Enemies) {
            self.ctx
                .log
                .push(ActionEntry::new(0, Some(enemy), ActionKind::EnemyAppeared));
        }

        let mut openers: Vec<ActorId> = self
            .ctx
            .all_ids()
            .into_iter()
            .filter(|&id| {
                let actor = self.ctx.actor(id);
                actor.is_active() && !actor.profile.preemptive.is_empty()
            })
            .collect();
        openers.sort_by(|&a, &b| {
            let speed_a = self.ctx.actor(a).speed();
            let speed_b = self.ctx.actor(b).speed();
            speed_b.total_cmp(&speed_a).then(a.cmp(&b))
        });

        for actor in openers {
            let attacks = self.ctx.actor(actor).profile.preemptive.clone();
            for attack in attacks {
                if !self.ctx.actor(actor).is_active() {
                    break;
                }
                if !self.ctx.rng.chance(attack.chance) {
                    continue;
                }
                let Some(target) = self.random_opponent(actor) else {
                    break;
                };
                let mut entry = ActionEntry::new(0, Some(actor), ActionKind::Preemptive)
                    .with_ability(attack.id.0);
                self.physical_strike(
                    actor,
                    target,
                    attack.multipliers,
                    Origin::Primary,
                    &mut entry,
                );
                self.ctx.log.push(entry);
                self.dispatch_reactions();
                if let Some(outcome) = self.check_outcome() {
                    return Some(outcome);
                }
            }
        }
        self.check_outcome()
    }

    /// One action pass for `actor` at extra-action `depth`.
    ///
    /// Locking statuses end the pass before selection. After the action and
    /// its reactions, each active extra-action descriptor rolls its shots and
    /// every success recurses one level deeper while the depth cap allows.
    pub(crate) fn take_turn(&mut self, actor: ActorId, depth: u8) {
        if !self.ctx.actor(actor).is_active() {
            return;
        }

        if let Some(status) = self.locking_status(actor) {
            let entry = ActionEntry::new(self.ctx.turn, Some(actor), ActionKind::Incapacitated)
                .with_ability(status.0 as u16)
                .at_depth(depth);
            self.ctx.log.push(entry);
            return;
        }

        self.roll_berserk(actor, depth);
        if self.is_confused(actor) {
            self.confused_attack(actor, depth);
        } else {
            let chain = self.choose_actions(actor);
            self.perform_chain(actor, &chain, depth);
        }
        self.dispatch_reactions();
        if self.check_outcome().is_some() {
            return;
        }

        let next = depth.saturating_add(1);
        if next > self.config.max_extra_action_depth {
            return;
        }
        let turn = self.ctx.turn;
        let extras = self.ctx.actor(actor).profile.extra_actions.clone();
        for extra in extras.iter().filter(|e| e.is_active(turn)) {
            for _ in 0..extra.count {
                if !self.ctx.actor(actor).is_active() || self.check_outcome().is_some() {
                    return;
                }
                if !self.ctx.rng.chance(extra.chance) {
                    continue;
                }
                let flags = &mut self.ctx.actor_mut(actor).turn;
                flags.extra_actions_taken = flags.extra_actions_taken.saturating_add(1);
                tracing::trace!(%actor, depth = next, ability = extra.id.0, "extra action");
                self.take_turn(actor, next);
            }
        }
    }

    /// Terminal outcome, if any.
    ///
    /// A side with nobody left on the field and at least one withdrawal has
    /// retreated; that is checked before victory and defeat, so a mutual wipe
    /// is a defeat unless someone withdrew.
    pub(crate) fn check_outcome(&self) -> Option<Outcome> {
        let withdrew = Side::ALL
            .iter()
            .any(|&side| !self.ctx.has_active(side) && self.ctx.any_withdrawn(side));
        if withdrew {
            return Some(Outcome::Retreat);
        }

        let players = self.ctx.has_active(Side::Players);
        let enemies = self.ctx.has_active(Side::Enemies);
        if players && !enemies {
            return Some(Outcome::Victory);
        }
        if !players {
            return Some(Outcome::Defeat);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::BattleConfig;
    use crate::env::{BattleEnv, PcgRng, ScriptedRng};
    use crate::profile::{AbilityDescriptor, ExtraActionDescriptor, ExtraActionTrigger, SkillEffect};
    use crate::state::AbilityId;

    fn engine<'a>(
        tables: &'a crate::env::DefinitionTables,
        config: BattleConfig,
        players: &[crate::state::Combatant],
        enemies: &[crate::state::Combatant],
    ) -> BattleEngine<'a, ScriptedRng> {
        BattleEngine::new(
            BattleEnv::from_tables(tables),
            config,
            players,
            enemies,
            ScriptedRng::always_low(),
        )
        .unwrap()
    }

    #[test]
    fn mutual_wipe_is_defeat_without_withdrawals() {
        let tables = tables();
        let mut engine = engine(
            &tables,
            BattleConfig::default(),
            &[idle("p", 10)],
            &[idle("e", 10)],
        );
        engine.ctx.actor_mut(ActorId::player(0)).hp = 0;
        engine.ctx.actor_mut(ActorId::enemy(0)).hp = 0;
        assert_eq!(engine.check_outcome(), Some(Outcome::Defeat));
    }

    #[test]
    fn mutual_wipe_with_withdrawal_is_retreat() {
        let tables = tables();
        let mut engine = engine(
            &tables,
            BattleConfig::default(),
            &[idle("p", 10), idle("q", 10)],
            &[idle("e", 10)],
        );
        engine.ctx.actor_mut(ActorId::player(0)).hp = 0;
        engine.ctx.actor_mut(ActorId::player(1)).withdrawn = true;
        engine.ctx.actor_mut(ActorId::enemy(0)).hp = 0;
        assert_eq!(engine.check_outcome(), Some(Outcome::Retreat));
    }

    #[test]
    fn victory_and_ongoing() {
        let tables = tables();
        let mut engine = engine(
            &tables,
            BattleConfig::default(),
            &[idle("p", 10)],
            &[idle("e", 10)],
        );
        assert_eq!(engine.check_outcome(), None);
        engine.ctx.actor_mut(ActorId::enemy(0)).hp = 0;
        assert_eq!(engine.check_outcome(), Some(Outcome::Victory));
    }

    #[test]
    fn extra_action_runs_once_per_depth_level() {
        let tables = tables();
        let mut hero = fighter("hero", 2.0, 0.0, 1000, 10);
        hero.abilities.push(AbilityDescriptor::new(
            AbilityId(7),
            vec![SkillEffect::ExtraAction(ExtraActionDescriptor::new(
                AbilityId(7),
                ExtraActionTrigger::Always,
                100.0,
                1,
            ))],
        ));
        let mut engine = engine(
            &tables,
            BattleConfig::default().with_extra_action_depth(1),
            &[hero],
            &[idle("dummy", 1000)],
        );
        engine.ctx.turn = 1;
        engine.take_turn(ActorId::player(0), 0);

        let depths: Vec<u8> = engine
            .ctx
            .log
            .by_actor(ActorId::player(0))
            .map(|entry| entry.depth)
            .collect();
        assert_eq!(depths, vec![0, 1]);
    }

    #[test]
    fn turn_cap_resolves_as_retreat() {
        let tables = tables();
        let engine = BattleEngine::new(
            BattleEnv::from_tables(&tables),
            BattleConfig::default().with_max_turns(3),
            &[idle("p", 10)],
            &[idle("e", 10)],
            PcgRng::new(5),
        )
        .unwrap();
        let result = engine.run();
        assert_eq!(result.outcome, Outcome::Retreat);
        assert_eq!(result.turns, 3);
    }
}
