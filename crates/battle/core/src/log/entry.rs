use crate::state::{ActorId, StatusId};

/// Declared kind of a log entry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum ActionKind {
    BattleStart,
    EnemyAppeared,
    Preemptive,
    /// Pre-turn phase: withdrawals, sacrifice selection, slot modifiers.
    TurnStart,
    Attack,
    Spell,
    Breath,
    EnemySkill,
    Guard,
    ConfusedAttack,
    /// Turn lost to an action-locking status.
    Incapacitated,
    Berserk,
    Reaction,
    /// End-of-turn housekeeping.
    TurnEnd,
    BattleEnd,
}

/// One state-changing effect, in production order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum EffectKind {
    PhysicalDamage,
    MagicalDamage,
    BreathDamage,
    StatusDamage,
    Miss,
    Parry,
    Block,
    /// Value is the number of critical hits in the sequence.
    CriticalHit,
    MagicNullified,
    BarrierConsumed,
    Heal,
    Absorb,
    StatusApplied,
    StatusResisted,
    StatusRedirected,
    StatusRecovered,
    StatusExpired,
    StatusCured,
    BuffApplied,
    BuffExpired,
    ChargeSpent,
    ChargeGained,
    ChargeRegenerated,
    Degradation,
    DegradationRepaired,
    Guarding,
    Defeated,
    Resurrected,
    Rescued,
    Withdrawn,
    SacrificeSelected,
    ActionDebuffed,
    ActionSkipped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub kind: EffectKind,
    pub target: Option<ActorId>,
    pub value: Option<u32>,
    /// Pre-mitigation value where it differs from `value`.
    pub raw_value: Option<u32>,
    pub status: Option<StatusId>,
}

impl Effect {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            target: None,
            value: None,
            raw_value: None,
            status: None,
        }
    }

    pub fn on(kind: EffectKind, target: ActorId) -> Self {
        Self::new(kind).with_target(target)
    }

    pub fn with_target(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_raw(mut self, raw: u32) -> Self {
        self.raw_value = Some(raw);
        self
    }

    pub fn with_status(mut self, status: StatusId) -> Self {
        self.status = Some(status);
        self
    }
}

/// One top-level action attempt and everything it caused.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionEntry {
    pub turn: u32,
    pub actor: Option<ActorId>,
    pub kind: ActionKind,
    /// Spell, enemy skill or ability id, depending on `kind`.
    pub ability: Option<u16>,
    /// Reaction or extra-action depth; 0 for primary actions.
    pub depth: u8,
    pub effects: Vec<Effect>,
}

impl ActionEntry {
    pub fn new(turn: u32, actor: Option<ActorId>, kind: ActionKind) -> Self {
        Self {
            turn,
            actor,
            kind,
            ability: None,
            depth: 0,
            effects: Vec::new(),
        }
    }

    pub fn with_ability(mut self, ability: u16) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn at_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn effects_of(&self, kind: EffectKind) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(move |e| e.kind == kind)
    }
}
