//! Parry and shield-block chances.

use crate::config::CombatParams;
use crate::state::BaseAttributes;

/// Parry chance: `bonus + (def.strength - atk.strength) × 0.5`, clamped to
/// `[0, guard_cap]`.
pub fn parry_chance(
    bonus: f64,
    defender: &BaseAttributes,
    attacker: &BaseAttributes,
    params: &CombatParams,
) -> f64 {
    let delta = (defender.strength - attacker.strength) as f64 * 0.5;
    (bonus + delta).clamp(0.0, params.guard_cap)
}

/// Shield-block chance: `bonus + (def.vitality - atk.strength) × 0.5`, clamped
/// to `[0, guard_cap]`.
pub fn block_chance(
    bonus: f64,
    defender: &BaseAttributes,
    attacker: &BaseAttributes,
    params: &CombatParams,
) -> f64 {
    let delta = (defender.vitality - attacker.strength) as f64 * 0.5;
    (bonus + delta).clamp(0.0, params.guard_cap)
}
