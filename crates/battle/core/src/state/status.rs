//! Status effects and timed buffs carried by an actor.
//!
//! # Turn-based Duration
//!
//! Both collections count remaining turns down at end of turn. An entry whose
//! counter reaches zero is removed and reported to the caller so the expiry
//! can be logged.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

use super::{ActorId, StatusId};

/// One active status instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStatus {
    pub status: StatusId,
    pub remaining_turns: u8,
    /// Actor that applied the status, if any.
    pub source: Option<ActorId>,
    /// Stack value; kept at the highest value seen across re-applications.
    pub stack: u8,
}

/// Result of [`StatusEffects::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusApplication {
    /// A new instance was added.
    Added,
    /// An existing instance had its duration extended.
    Extended,
    /// An existing instance already lasted at least as long.
    Unchanged,
    /// No room for another instance.
    Full,
}

impl StatusApplication {
    /// True when the actor's status state changed.
    pub fn changed(self) -> bool {
        matches!(self, Self::Added | Self::Extended)
    }
}

/// Active status effects on an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<ActiveStatus, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    pub fn has(&self, status: StatusId) -> bool {
        self.effects.iter().any(|e| e.status == status)
    }

    pub fn get(&self, status: StatusId) -> Option<&ActiveStatus> {
        self.effects.iter().find(|e| e.status == status)
    }

    /// Adds a status for `duration` turns.
    ///
    /// Duplicate application keeps one instance with the longer remaining
    /// duration instead of stacking.
    pub fn apply(
        &mut self,
        status: StatusId,
        duration: u8,
        source: Option<ActorId>,
        stack: u8,
    ) -> StatusApplication {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.status == status) {
            existing.stack = existing.stack.max(stack);
            if duration > existing.remaining_turns {
                existing.remaining_turns = duration;
                existing.source = source;
                return StatusApplication::Extended;
            }
            return StatusApplication::Unchanged;
        }

        if self.effects.is_full() {
            return StatusApplication::Full;
        }
        self.effects.push(ActiveStatus {
            status,
            remaining_turns: duration,
            source,
            stack,
        });
        StatusApplication::Added
    }

    /// Removes a status. Returns whether it was present.
    pub fn remove(&mut self, status: StatusId) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| e.status != status);
        before != self.effects.len()
    }

    /// Removes every status, returning the removed ids in application order.
    pub fn clear(&mut self) -> Vec<StatusId> {
        self.effects.drain(..).map(|e| e.status).collect()
    }

    /// Decrements every counter and removes the instances that reach zero.
    pub fn tick_down(&mut self) -> Vec<StatusId> {
        let mut expired = Vec::new();
        for effect in self.effects.iter_mut() {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
            if effect.remaining_turns == 0 {
                expired.push(effect.status);
            }
        }
        self.effects.retain(|e| e.remaining_turns > 0);
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatus> {
        self.effects.iter()
    }

    /// Status ids in application order.
    pub fn ids(&self) -> Vec<StatusId> {
        self.effects.iter().map(|e| e.status).collect()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Stat axis a timed buff can modify.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuffStat {
    PhysicalAttack,
    MagicalAttack,
    PhysicalDefense,
    MagicalDefense,
    HitScore,
    EvasionScore,
    CriticalRate,
    Agility,
}

/// A timed buff. Modifier values are fractional deltas (`0.2` = +20%).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedBuff {
    pub id: u16,
    pub remaining_turns: u8,
    pub modifiers: BTreeMap<BuffStat, f64>,
}

/// Timed buffs on an actor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Buffs {
    buffs: ArrayVec<TimedBuff, { BattleConfig::MAX_BUFFS }>,
}

impl Buffs {
    pub fn empty() -> Self {
        Self {
            buffs: ArrayVec::new(),
        }
    }

    /// Adds or refreshes a buff. A buff with the same id is replaced.
    ///
    /// Returns `false` when there was no room.
    pub fn apply(&mut self, buff: TimedBuff) -> bool {
        if let Some(existing) = self.buffs.iter_mut().find(|b| b.id == buff.id) {
            existing.remaining_turns = existing.remaining_turns.max(buff.remaining_turns);
            existing.modifiers = buff.modifiers;
            return true;
        }
        self.buffs.try_push(buff).is_ok()
    }

    pub fn has(&self, id: u16) -> bool {
        self.buffs.iter().any(|b| b.id == id)
    }

    /// Combined multiplier for `stat`, never below zero.
    pub fn multiplier(&self, stat: BuffStat) -> f64 {
        let delta: f64 = self
            .buffs
            .iter()
            .filter_map(|b| b.modifiers.get(&stat))
            .sum();
        (1.0 + delta).max(0.0)
    }

    /// Decrements every counter and removes expired buffs, returning their ids.
    pub fn tick_down(&mut self) -> Vec<u16> {
        let mut expired = Vec::new();
        for buff in self.buffs.iter_mut() {
            buff.remaining_turns = buff.remaining_turns.saturating_sub(1);
            if buff.remaining_turns == 0 {
                expired.push(buff.id);
            }
        }
        self.buffs.retain(|b| b.remaining_turns > 0);
        expired
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedBuff> {
        self.buffs.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_status_keeps_longer_duration() {
        let mut statuses = StatusEffects::empty();
        assert_eq!(
            statuses.apply(StatusId(1), 2, None, 1),
            StatusApplication::Added
        );
        assert_eq!(
            statuses.apply(StatusId(1), 5, None, 1),
            StatusApplication::Extended
        );
        assert_eq!(
            statuses.apply(StatusId(1), 3, None, 1),
            StatusApplication::Unchanged
        );
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses.get(StatusId(1)).map(|s| s.remaining_turns), Some(5));
    }

    #[test]
    fn tick_down_reports_expired() {
        let mut statuses = StatusEffects::empty();
        statuses.apply(StatusId(1), 1, None, 1);
        statuses.apply(StatusId(2), 2, None, 1);
        assert_eq!(statuses.tick_down(), vec![StatusId(1)]);
        assert!(statuses.has(StatusId(2)));
        assert_eq!(statuses.tick_down(), vec![StatusId(2)]);
        assert!(statuses.is_empty());
    }

    #[test]
    fn full_status_list_rejects() {
        let mut statuses = StatusEffects::empty();
        for id in 0..BattleConfig::MAX_STATUS_EFFECTS as u8 {
            statuses.apply(StatusId(id), 3, None, 1);
        }
        assert_eq!(
            statuses.apply(StatusId(200), 3, None, 1),
            StatusApplication::Full
        );
    }

    #[test]
    fn buff_multiplier_sums_deltas() {
        let mut buffs = Buffs::empty();
        buffs.apply(TimedBuff {
            id: 1,
            remaining_turns: 2,
            modifiers: BTreeMap::from([(BuffStat::PhysicalAttack, 0.25)]),
        });
        buffs.apply(TimedBuff {
            id: 2,
            remaining_turns: 1,
            modifiers: BTreeMap::from([(BuffStat::PhysicalAttack, -0.5)]),
        });
        assert!((buffs.multiplier(BuffStat::PhysicalAttack) - 0.75).abs() < 1e-9);
        assert_eq!(buffs.multiplier(BuffStat::Agility), 1.0);
        assert_eq!(buffs.tick_down(), vec![2]);
        assert!((buffs.multiplier(BuffStat::PhysicalAttack) - 1.25).abs() < 1e-9);
    }
}
