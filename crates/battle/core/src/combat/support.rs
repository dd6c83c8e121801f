//! Healing amounts and status application chances.

use crate::env::clamp_percent;
use crate::profile::StatusResistance;

/// Heal amount before clamping to missing HP.
///
/// A flat percent heals that share of the target's max HP. Otherwise the
/// amount is `magical_healing × multiplier × healing_multiplier`.
pub fn heal_amount(
    flat_percent: Option<u8>,
    target_max_hp: u32,
    magical_healing: f64,
    multiplier: f64,
    healing_multiplier: f64,
) -> u32 {
    let raw = match flat_percent {
        Some(percent) => target_max_hp as f64 * percent as f64 / 100.0,
        None => magical_healing * multiplier * healing_multiplier,
    };
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    (raw + 0.5).floor().min(u32::MAX as f64) as u32
}

/// Final status chance, percent.
///
/// `base × resistance.multiplier + resistance.additive`, scaled by
/// `barrier_factor` when the status is spell-bound and the target holds
/// magical barrier charges.
pub fn status_chance(
    base: f64,
    resistance: StatusResistance,
    spell_bound_against_barrier: bool,
    barrier_factor: f64,
) -> f64 {
    let mut chance = base * resistance.multiplier + resistance.additive;
    if spell_bound_against_barrier {
        chance *= barrier_factor;
    }
    clamp_percent(chance)
}

/// Status tick damage: a percent of max HP (capped at 100), at least 1 when
/// the percent is set.
pub fn tick_damage(max_hp: u32, percent: u8) -> u32 {
    if percent == 0 {
        return 0;
    }
    let percent = u64::from(percent.min(100));
    ((u64::from(max_hp) * percent / 100) as u32).max(1)
}
