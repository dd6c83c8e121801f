//! Reaction dispatcher.
//!
//! Damage, evasion and defeat outcomes push [`ReactionEvent`]s onto the
//! context queue tagged with a recursion depth. The dispatcher drains the
//! queue in waves: every living actor with a matching reaction becomes a
//! candidate slot, slots are sorted by priority class, turn speed, order
//! tiebreak and insertion sequence, then resolved one by one through the same
//! damage pipeline as primary actions.
//!
//! Reactions never queue first-order events of their own. Only defeat chains
//! (`AllyDefeated`, `KilledEnemy`) caused by a reaction are re-queued, at
//! `depth + 1`, and dropped once they would exceed the configured maximum.

use crate::env::RandomSource;
use crate::log::{ActionEntry, ActionKind};
use crate::profile::{ReactionAction, ReactionDescriptor, ReactionTarget, ReactionTrigger};
use crate::state::{ActorId, ChargeKey};

use super::BattleEngine;

/// Trigger circumstance carried through the reaction queue.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReactionEvent {
    AllyDamaged { victim: ActorId, attacker: ActorId },
    SelfDamagedPhysical { victim: ActorId, attacker: ActorId },
    SelfDamagedMagical { victim: ActorId, attacker: ActorId },
    SelfEvaded { evader: ActorId, attacker: ActorId },
    AllyDefeated { victim: ActorId, killer: Option<ActorId> },
    KilledEnemy { killer: ActorId, victim: ActorId },
    AllyCastAttackSpell { caster: ActorId, targets: Vec<ActorId> },
    AttackedWithoutKill { attacker: ActorId, targets: Vec<ActorId> },
    AllyCriticalHit { attacker: ActorId, target: ActorId },
}

impl ReactionEvent {
    pub fn trigger(&self) -> ReactionTrigger {
        match self {
            Self::AllyDamaged { .. } => ReactionTrigger::AllyDamaged,
            Self::SelfDamagedPhysical { .. } => ReactionTrigger::SelfDamagedPhysical,
            Self::SelfDamagedMagical { .. } => ReactionTrigger::SelfDamagedMagical,
            Self::SelfEvaded { .. } => ReactionTrigger::SelfEvaded,
            Self::AllyDefeated { .. } => ReactionTrigger::AllyDefeated,
            Self::KilledEnemy { .. } => ReactionTrigger::KilledEnemy,
            Self::AllyCastAttackSpell { .. } => ReactionTrigger::AllyCastAttackSpell,
            Self::AttackedWithoutKill { .. } => ReactionTrigger::AttackedWithoutKill,
            Self::AllyCriticalHit { .. } => ReactionTrigger::AllyCriticalHit,
        }
    }

    /// Defeat-chain events are the only ones a reaction may re-queue.
    pub fn is_defeat_chain(&self) -> bool {
        matches!(self, Self::AllyDefeated { .. } | Self::KilledEnemy { .. })
    }

    /// The attacker or killer an `Attacker` reaction aims at.
    pub fn instigator(&self) -> Option<ActorId> {
        match self {
            Self::AllyDamaged { attacker, .. }
            | Self::SelfDamagedPhysical { attacker, .. }
            | Self::SelfDamagedMagical { attacker, .. }
            | Self::SelfEvaded { attacker, .. } => Some(*attacker),
            Self::AllyDefeated { killer, .. } => *killer,
            Self::KilledEnemy { .. }
            | Self::AllyCastAttackSpell { .. }
            | Self::AttackedWithoutKill { .. }
            | Self::AllyCriticalHit { .. } => None,
        }
    }

    /// Targets of the triggering action, for `CasterTargets` reactions.
    pub fn action_targets(&self) -> Vec<ActorId> {
        match self {
            Self::AllyCastAttackSpell { targets, .. }
            | Self::AttackedWithoutKill { targets, .. } => targets.clone(),
            Self::AllyCriticalHit { target, .. } => vec![*target],
            Self::KilledEnemy { .. } => Vec::new(),
            _ => self.instigator().into_iter().collect(),
        }
    }

    /// The ally a "requires ally behind" reaction protects.
    pub fn protected_ally(&self) -> Option<ActorId> {
        match self {
            Self::AllyDamaged { victim, .. } | Self::AllyDefeated { victim, .. } => Some(*victim),
            _ => None,
        }
    }

    /// Actors that may react, before liveness filtering.
    fn reactors<R>(&self, ctx: &super::BattleContext<R>) -> Vec<ActorId> {
        match self {
            Self::AllyDamaged { victim, .. } | Self::AllyDefeated { victim, .. } => {
                ctx.active_allies(*victim)
            }
            Self::SelfDamagedPhysical { victim, .. } | Self::SelfDamagedMagical { victim, .. } => {
                vec![*victim]
            }
            Self::SelfEvaded { evader, .. } => vec![*evader],
            Self::KilledEnemy { killer, .. } => vec![*killer],
            Self::AttackedWithoutKill { attacker, .. } => vec![*attacker],
            Self::AllyCastAttackSpell { caster, .. } => ctx.active_allies(*caster),
            Self::AllyCriticalHit { attacker, .. } => ctx.active_allies(*attacker),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct QueuedEvent {
    pub event: ReactionEvent,
    pub depth: u8,
    pub seq: u64,
}

/// Where an outcome came from; decides which events it may queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Origin {
    Primary,
    Reaction { depth: u8 },
}

struct CandidateSlot {
    priority: u8,
    speed: f64,
    tiebreak: u32,
    seq: u64,
    event: usize,
    reactor: ActorId,
    descriptor: ReactionDescriptor,
}

impl<R: RandomSource> BattleEngine<'_, R> {
    /// Queues an event produced under `origin`, honoring the depth bound.
    pub(crate) fn emit(&mut self, origin: Origin, event: ReactionEvent) {
        let depth = match origin {
            Origin::Primary => 1,
            Origin::Reaction { depth } => {
                if !event.is_defeat_chain() {
                    return;
                }
                depth.saturating_add(1)
            }
        };
        if depth > self.config.max_reaction_depth {
            return;
        }
        let seq = self.ctx.event_seq;
        self.ctx.event_seq += 1;
        self.ctx.queue.push_back(QueuedEvent { event, depth, seq });
    }

    /// Drains the reaction queue wave by wave.
    pub(crate) fn dispatch_reactions(&mut self) {
        while !self.ctx.queue.is_empty() {
            if self.check_outcome().is_some() {
                self.ctx.queue.clear();
                return;
            }
            let wave: Vec<QueuedEvent> = self.ctx.queue.drain(..).collect();
            let slots = self.candidate_slots(&wave);
            tracing::trace!(events = wave.len(), slots = slots.len(), "reaction wave");

            for slot in slots {
                if self.check_outcome().is_some() {
                    self.ctx.queue.clear();
                    return;
                }
                let queued = &wave[slot.event];
                self.resolve_slot(&slot, &queued.event, queued.depth);
            }
        }
    }

    fn candidate_slots(&self, wave: &[QueuedEvent]) -> Vec<CandidateSlot> {
        let mut slots = Vec::new();
        let mut seq = 0u64;
        for (index, queued) in wave.iter().enumerate() {
            let trigger = queued.event.trigger();
            let instigator = queued.event.instigator();
            for reactor in queued.event.reactors(&self.ctx) {
                let actor = self.ctx.actor(reactor);
                if !actor.is_active() {
                    continue;
                }
                // no counters against one's own side, whatever the target mode
                if trigger.priority() == 0 && instigator.is_some_and(|i| i.is_ally_of(reactor)) {
                    continue;
                }
                for descriptor in actor.profile.reactions_for(trigger) {
                    slots.push(CandidateSlot {
                        priority: trigger.priority(),
                        speed: actor.turn.turn_speed,
                        tiebreak: actor.turn.order_tiebreak,
                        seq,
                        event: index,
                        reactor,
                        descriptor: descriptor.clone(),
                    });
                    seq += 1;
                }
            }
        }
        slots.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(b.speed.total_cmp(&a.speed))
                .then(a.tiebreak.cmp(&b.tiebreak))
                .then(a.seq.cmp(&b.seq))
        });
        slots
    }

    fn resolve_slot(&mut self, slot: &CandidateSlot, event: &ReactionEvent, depth: u8) {
        let reactor = slot.reactor;
        let descriptor = &slot.descriptor;
        {
            let actor = self.ctx.actor(reactor);
            if !actor.is_active() || self.locking_status(reactor).is_some() {
                return;
            }
        }

        if let Some(limit) = descriptor.max_per_turn {
            let used = self
                .ctx
                .reaction_uses
                .get(&(reactor, descriptor.id))
                .copied()
                .unwrap_or(0);
            if used >= limit {
                return;
            }
        }

        if descriptor.requires_ally_behind {
            let Some(ally) = event.protected_ally() else {
                return;
            };
            if self.ctx.actor(reactor).row >= self.ctx.actor(ally).row {
                return;
            }
        }

        if !self.can_perform_reaction(reactor, &descriptor.action) {
            return;
        }

        let Some(target) = self.reaction_target(reactor, descriptor.target, event) else {
            return;
        };

        let chance = {
            let actor = self.ctx.actor(reactor);
            descriptor.chance.percent(&actor.attributes)
                * self.config.reaction_proc_multiplier
                * actor.profile.rates.reaction_proc
                * self.ctx.actor(target).profile.rates.counter_evasion
        };
        if !self.ctx.rng.chance(chance) {
            return;
        }

        let origin = Origin::Reaction { depth };
        let mut entry = ActionEntry::new(self.ctx.turn, Some(reactor), ActionKind::Reaction)
            .with_ability(descriptor.id.0)
            .at_depth(depth);
        if let ReactionAction::Breath { .. } = descriptor.action {
            if !self.spend_charge(reactor, ChargeKey::Breath, 1, &mut entry) {
                return;
            }
        }

        *self
            .ctx
            .reaction_uses
            .entry((reactor, descriptor.id))
            .or_insert(0) += 1;

        tracing::trace!(
            %reactor,
            %target,
            ability = descriptor.id.0,
            depth,
            trigger = ?descriptor.trigger,
            "reaction fired"
        );

        match descriptor.action {
            ReactionAction::Physical(multipliers) => {
                self.physical_strike(reactor, target, multipliers, origin, &mut entry);
            }
            ReactionAction::Spell { spell } => {
                self.cast_spell(reactor, spell, Some(target), origin, &mut entry);
            }
            ReactionAction::Breath { damage_multiplier } => {
                self.breath_strike(reactor, target, damage_multiplier, origin, &mut entry);
            }
        }
        self.ctx.log.push(entry);
    }

    fn can_perform_reaction(&self, reactor: ActorId, action: &ReactionAction) -> bool {
        let actor = self.ctx.actor(reactor);
        match *action {
            ReactionAction::Physical(_) => true,
            ReactionAction::Spell { spell } => self
                .env
                .spell(spell)
                .is_some_and(|def| {
                    actor
                        .charges
                        .can_spend(ChargeKey::Spell(spell), def.charge_cost)
                }),
            ReactionAction::Breath { .. } => actor.charges.can_spend(ChargeKey::Breath, 1),
        }
    }

    /// Resolves a reaction's target. `None` skips the reaction.
    fn reaction_target(
        &mut self,
        reactor: ActorId,
        mode: ReactionTarget,
        event: &ReactionEvent,
    ) -> Option<ActorId> {
        match mode {
            ReactionTarget::Attacker => match event.instigator() {
                // never strike back at one's own side
                Some(instigator) if instigator.is_ally_of(reactor) => None,
                Some(instigator) if self.ctx.actor(instigator).is_active() => Some(instigator),
                _ => self.random_opponent(reactor),
            },
            ReactionTarget::CasterTargets => {
                let candidates: Vec<ActorId> = event
                    .action_targets()
                    .into_iter()
                    .filter(|&t| !t.is_ally_of(reactor) && self.ctx.actor(t).is_active())
                    .collect();
                if candidates.is_empty() {
                    self.random_opponent(reactor)
                } else {
                    let pick = self.ctx.rng.index(candidates.len());
                    Some(candidates[pick])
                }
            }
            ReactionTarget::Random => self.random_opponent(reactor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::BattleConfig;
    use crate::env::{BattleEnv, DefinitionTables, ScriptedRng};
    use crate::log::EffectKind;
    use crate::profile::{AbilityDescriptor, AttackMultipliers, ReactionChance, SkillEffect};
    use crate::state::{AbilityId, Combatant};

    fn guaranteed(id: u16, trigger: ReactionTrigger, target: ReactionTarget) -> ReactionDescriptor {
        ReactionDescriptor::new(
            AbilityId(id),
            trigger,
            ReactionChance::flat(100.0),
            ReactionAction::Physical(AttackMultipliers::NEUTRAL),
            target,
        )
    }

    fn reacting(name: &str, descriptor: ReactionDescriptor) -> Combatant {
        let mut combatant = fighter(name, 10.0, 0.0, 500, 10);
        combatant.abilities.push(AbilityDescriptor::new(
            descriptor.id,
            vec![SkillEffect::Reaction(descriptor)],
        ));
        combatant
    }

    fn engine<'a>(
        tables: &'a DefinitionTables,
        players: &[Combatant],
        enemies: &[Combatant],
    ) -> BattleEngine<'a, ScriptedRng> {
        let mut engine = BattleEngine::new(
            BattleEnv::from_tables(tables),
            BattleConfig::default(),
            players,
            enemies,
            ScriptedRng::always_low(),
        )
        .unwrap();
        engine.ctx.turn = 1;
        engine
    }

    fn fired<R>(engine: &BattleEngine<'_, R>) -> Vec<(Option<ActorId>, Option<u16>)> {
        engine
            .ctx
            .log
            .of_kind(ActionKind::Reaction)
            .map(|entry| (entry.actor, entry.ability))
            .collect()
    }

    #[test]
    fn confused_hit_on_an_ally_draws_no_counter() {
        let tables = tables();
        let mut engine = engine(
            &tables,
            &[
                reacting(
                    "struck",
                    guaranteed(1, ReactionTrigger::SelfDamagedPhysical, ReactionTarget::Random),
                ),
                fighter("confused", 10.0, 0.0, 500, 10),
                reacting(
                    "watcher",
                    guaranteed(2, ReactionTrigger::AllyDamaged, ReactionTarget::Random),
                ),
            ],
            &[fighter("e", 10.0, 0.0, 500, 10)],
        );

        // a zeroed stream picks the first ally
        engine.confused_attack(ActorId::player(1), 0);
        engine.dispatch_reactions();

        assert!(engine.ctx.actor(ActorId::player(0)).hp < 500);
        assert!(fired(&engine).is_empty());
        assert_eq!(engine.ctx.actor(ActorId::enemy(0)).hp, 500);
    }

    #[test]
    fn self_damage_from_own_spell_draws_no_counter() {
        let tables = tables();
        let mut engine = engine(
            &tables,
            &[reacting(
                "caster",
                guaranteed(3, ReactionTrigger::SelfDamagedMagical, ReactionTarget::CasterTargets),
            )],
            &[fighter("e", 10.0, 0.0, 500, 10)],
        );
        let caster = ActorId::player(0);
        let mut entry = ActionEntry::new(1, Some(caster), ActionKind::Spell);
        engine.magical_strike(caster, caster, 1.0, None, Origin::Primary, &mut entry);
        engine.dispatch_reactions();

        assert!(fired(&engine).is_empty());
    }

    #[test]
    fn faster_reactor_resolves_first() {
        let tables = tables();
        let mut engine = engine(
            &tables,
            &[
                fighter("victim", 10.0, 0.0, 500, 10),
                reacting(
                    "slow",
                    guaranteed(11, ReactionTrigger::AllyDamaged, ReactionTarget::Attacker),
                ),
                reacting(
                    "fast",
                    guaranteed(12, ReactionTrigger::AllyDamaged, ReactionTarget::Attacker),
                ),
            ],
            &[fighter("e", 10.0, 0.0, 1000, 10)],
        );
        engine.ctx.actor_mut(ActorId::player(1)).turn.turn_speed = 5.0;
        engine.ctx.actor_mut(ActorId::player(2)).turn.turn_speed = 20.0;

        engine.emit(
            Origin::Primary,
            ReactionEvent::AllyDamaged {
                victim: ActorId::player(0),
                attacker: ActorId::enemy(0),
            },
        );
        engine.dispatch_reactions();

        assert_eq!(
            fired(&engine),
            vec![
                (Some(ActorId::player(2)), Some(12)),
                (Some(ActorId::player(1)), Some(11)),
            ]
        );
    }

    #[test]
    fn counters_run_before_follow_ups_in_one_wave() {
        let tables = tables();
        let mut engine = engine(
            &tables,
            &[
                reacting(
                    "finisher",
                    guaranteed(21, ReactionTrigger::KilledEnemy, ReactionTarget::Random),
                ),
                reacting(
                    "riposte",
                    guaranteed(22, ReactionTrigger::SelfDamagedPhysical, ReactionTarget::Attacker),
                ),
            ],
            &[fighter("e0", 10.0, 0.0, 1000, 10), fighter("e1", 10.0, 0.0, 50, 10)],
        );
        engine.ctx.actor_mut(ActorId::player(0)).turn.turn_speed = 50.0;
        engine.ctx.actor_mut(ActorId::player(1)).turn.turn_speed = 1.0;
        engine.ctx.actor_mut(ActorId::enemy(1)).hp = 0;

        engine.emit(
            Origin::Primary,
            ReactionEvent::KilledEnemy {
                killer: ActorId::player(0),
                victim: ActorId::enemy(1),
            },
        );
        engine.emit(
            Origin::Primary,
            ReactionEvent::SelfDamagedPhysical {
                victim: ActorId::player(1),
                attacker: ActorId::enemy(0),
            },
        );
        engine.dispatch_reactions();

        assert_eq!(
            fired(&engine),
            vec![
                (Some(ActorId::player(1)), Some(22)),
                (Some(ActorId::player(0)), Some(21)),
            ]
        );
    }

    #[test]
    fn ally_behind_reaction_needs_a_forward_row() {
        let tables = tables();
        let fires = |guard_row: u8, ally_row: u8| {
            let mut engine = engine(
                &tables,
                &[
                    fighter("ally", 10.0, 0.0, 500, 10),
                    reacting(
                        "guard",
                        guaranteed(31, ReactionTrigger::AllyDamaged, ReactionTarget::Attacker)
                            .behind_only(),
                    ),
                ],
                &[fighter("e", 10.0, 0.0, 1000, 10)],
            );
            engine.ctx.actor_mut(ActorId::player(0)).row = ally_row;
            engine.ctx.actor_mut(ActorId::player(1)).row = guard_row;
            engine.emit(
                Origin::Primary,
                ReactionEvent::AllyDamaged {
                    victim: ActorId::player(0),
                    attacker: ActorId::enemy(0),
                },
            );
            engine.dispatch_reactions();
            !fired(&engine).is_empty()
        };

        assert!(fires(0, 1));
        assert!(!fires(1, 1));
        assert!(!fires(2, 1));
    }

    #[test]
    fn caster_never_follows_up_its_own_spell() {
        let tables = tables();
        let follow_up = |id| {
            guaranteed(
                id,
                ReactionTrigger::AllyCastAttackSpell,
                ReactionTarget::CasterTargets,
            )
        };
        let mut engine = engine(
            &tables,
            &[
                reacting("caster", follow_up(41)),
                reacting("partner", follow_up(42)),
            ],
            &[fighter("e", 10.0, 0.0, 1000, 10)],
        );

        engine.emit(
            Origin::Primary,
            ReactionEvent::AllyCastAttackSpell {
                caster: ActorId::player(0),
                targets: vec![ActorId::enemy(0)],
            },
        );
        engine.dispatch_reactions();

        assert_eq!(fired(&engine), vec![(Some(ActorId::player(1)), Some(42))]);
    }

    #[test]
    fn breath_reaction_spends_its_charge() {
        let tables = tables();
        let mut breather = reacting(
            "drake",
            ReactionDescriptor::new(
                AbilityId(51),
                ReactionTrigger::SelfDamagedPhysical,
                ReactionChance::flat(100.0),
                ReactionAction::Breath {
                    damage_multiplier: 1.0,
                },
                ReactionTarget::Attacker,
            ),
        );
        breather.breath_charges = 1;
        let mut engine = engine(&tables, &[breather], &[fighter("e", 10.0, 0.0, 1000, 10)]);

        for _ in 0..2 {
            engine.emit(
                Origin::Primary,
                ReactionEvent::SelfDamagedPhysical {
                    victim: ActorId::player(0),
                    attacker: ActorId::enemy(0),
                },
            );
            engine.dispatch_reactions();
        }

        let reactions: Vec<_> = engine.ctx.log.of_kind(ActionKind::Reaction).collect();
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].effects_of(EffectKind::ChargeSpent).count(), 1);
        assert_eq!(reactions[0].effects_of(EffectKind::BreathDamage).count(), 1);
        assert!(
            !engine
                .ctx
                .actor(ActorId::player(0))
                .charges
                .can_spend(ChargeKey::Breath, 1)
        );
    }

    #[test]
    fn instigators_and_targets() {
        let hit = ReactionEvent::SelfDamagedPhysical {
            victim: ActorId::player(0),
            attacker: ActorId::enemy(1),
        };
        assert_eq!(hit.instigator(), Some(ActorId::enemy(1)));
        assert_eq!(hit.trigger().priority(), 0);
        assert!(!hit.is_defeat_chain());

        let kill = ReactionEvent::KilledEnemy {
            killer: ActorId::player(0),
            victim: ActorId::enemy(1),
        };
        assert_eq!(kill.instigator(), None);
        assert!(kill.action_targets().is_empty());
        assert!(kill.is_defeat_chain());

        let cast = ReactionEvent::AllyCastAttackSpell {
            caster: ActorId::player(1),
            targets: vec![ActorId::enemy(0), ActorId::enemy(2)],
        };
        assert_eq!(cast.action_targets().len(), 2);
        assert_eq!(cast.protected_ally(), None);
    }
}
