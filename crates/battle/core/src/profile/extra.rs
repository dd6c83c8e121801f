use crate::state::AbilityId;

use super::AttackMultipliers;

/// When an extra-action descriptor becomes active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtraActionTrigger {
    Always,
    /// Active on turn 1 only unless a duration widens the window.
    BattleStart,
    /// Active from the given turn onward.
    AfterTurn(u32),
}

/// Repeatable extra action rolled after the main action.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtraActionDescriptor {
    pub id: AbilityId,
    pub trigger: ExtraActionTrigger,
    /// Window length in turns; `None` is open-ended.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: Option<u32>,
    /// Percent chance per shot.
    pub chance: f64,
    /// Independent shots per action.
    pub count: u8,
}

impl ExtraActionDescriptor {
    pub fn new(id: AbilityId, trigger: ExtraActionTrigger, chance: f64, count: u8) -> Self {
        Self {
            id,
            trigger,
            duration: None,
            chance,
            count,
        }
    }

    pub fn lasting(mut self, turns: u32) -> Self {
        self.duration = Some(turns);
        self
    }

    /// Whether the descriptor may fire on `turn`.
    pub fn is_active(&self, turn: u32) -> bool {
        let (start, default_len) = match self.trigger {
            ExtraActionTrigger::Always => (1, None),
            ExtraActionTrigger::BattleStart => (1, Some(1)),
            ExtraActionTrigger::AfterTurn(n) => (n.max(1), None),
        };
        if turn < start {
            return false;
        }
        match self.duration.or(default_len) {
            Some(len) => turn < start.saturating_add(len),
            None => true,
        }
    }
}

/// Special attack performed during the battle-start phase.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreemptiveAttack {
    pub id: AbilityId,
    pub chance: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub multipliers: AttackMultipliers,
}
