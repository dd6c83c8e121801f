//! Value types describing actors and their mutable battle state.
//!
//! Everything here is plain data: no module in `state` rolls dice or reads
//! definition tables. The engine mutates actors through the handles in
//! [`common`].
mod actor;
mod common;
mod resources;
mod status;

pub use actor::{
    ActionRates, Actor, Attribute, BaseAttributes, CombatStats, Combatant, SpellSlot, TurnFlags,
};
pub use common::{AbilityId, ActorId, EnemySkillId, Side, SpellId, StatusId};
pub use resources::{ActionCharges, BarrierHit, BarrierPools, Charge, ChargeKey, DamageType};
pub use status::{ActiveStatus, BuffStat, Buffs, StatusApplication, StatusEffects, TimedBuff};
