use std::collections::{BTreeMap, VecDeque};

use crate::log::ActionLog;
use crate::state::{AbilityId, Actor, ActorId, Side};

use super::reaction::QueuedEvent;

/// Mutable simulation state threaded through one battle.
///
/// Single owner for the whole resolution: rosters, turn counter, random
/// stream, log, reaction queue and the per-battle caches all live here.
#[derive(Debug)]
pub struct BattleContext<R> {
    rosters: [Vec<Actor>; 2],
    /// 0 during the battle-start phase, then `1..=max_turns`.
    pub turn: u32,
    pub rng: R,
    pub log: ActionLog,
    pub(crate) queue: VecDeque<QueuedEvent>,
    pub(crate) event_seq: u64,
    /// Sides whose turn order is randomized by an opposing ability.
    pub(crate) shuffled_sides: [bool; 2],
    /// Actors holding a sacrifice ability, per side.
    pub(crate) sacrifice_holders: [Vec<ActorId>; 2],
    /// This turn's sacrifice target per side.
    pub(crate) sacrifice_targets: [Option<ActorId>; 2],
    /// Reaction firings this turn, for `max_per_turn` limits.
    pub(crate) reaction_uses: BTreeMap<(ActorId, AbilityId), u8>,
}

impl<R> BattleContext<R> {
    pub(crate) fn new(players: Vec<Actor>, enemies: Vec<Actor>, rng: R) -> Self {
        let rosters = [players, enemies];

        let mut shuffled_sides = [false; 2];
        let mut sacrifice_holders: [Vec<ActorId>; 2] = [Vec::new(), Vec::new()];
        for side in Side::ALL {
            for actor in &rosters[side.slot()] {
                if actor.profile.order.shuffle_enemies {
                    shuffled_sides[side.opponent().slot()] = true;
                }
                if actor.profile.sacrifice.is_some() {
                    sacrifice_holders[side.slot()].push(actor.id);
                }
            }
        }

        Self {
            rosters,
            turn: 0,
            rng,
            log: ActionLog::new(),
            queue: VecDeque::new(),
            event_seq: 0,
            shuffled_sides,
            sacrifice_holders,
            sacrifice_targets: [None, None],
            reaction_uses: BTreeMap::new(),
        }
    }

    pub fn actor(&self, id: ActorId) -> &Actor {
        &self.rosters[id.side.slot()][id.index as usize]
    }

    pub fn actor_mut(&mut self, id: ActorId) -> &mut Actor {
        &mut self.rosters[id.side.slot()][id.index as usize]
    }

    pub fn roster(&self, side: Side) -> &[Actor] {
        &self.rosters[side.slot()]
    }

    /// Every actor id, players first, in roster order.
    pub fn all_ids(&self) -> Vec<ActorId> {
        Side::ALL
            .iter()
            .flat_map(|&side| self.roster(side).iter().map(|a| a.id))
            .collect()
    }

    /// Active (alive, not withdrawn) members of `side` in roster order.
    pub fn active(&self, side: Side) -> Vec<ActorId> {
        self.roster(side)
            .iter()
            .filter(|a| a.is_active())
            .map(|a| a.id)
            .collect()
    }

    pub fn has_active(&self, side: Side) -> bool {
        self.roster(side).iter().any(Actor::is_active)
    }

    /// Active allies of `id`, excluding `id` itself.
    pub fn active_allies(&self, id: ActorId) -> Vec<ActorId> {
        self.active(id.side)
            .into_iter()
            .filter(|&ally| ally != id)
            .collect()
    }

    pub fn any_withdrawn(&self, side: Side) -> bool {
        self.roster(side).iter().any(|a| a.withdrawn)
    }

    pub(crate) fn into_rosters(self) -> (Vec<Actor>, Vec<Actor>, ActionLog) {
        let [players, enemies] = self.rosters;
        (players, enemies, self.log)
    }
}
