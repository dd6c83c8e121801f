//! Damage calculation for the three damage channels.
//!
//! All functions return the pre-barrier damage of a single hit. Barrier
//! absorption is applied separately by [`barrier_absorb`] so the caller can log
//! the consumed charge.

use crate::config::CombatParams;

/// Rounds half-up and floors at `min`.
pub fn finalize(raw: f64, min: u32) -> u32 {
    if raw.is_nan() || raw <= 0.0 {
        return min;
    }
    let rounded = (raw + 0.5).floor();
    (rounded.min(u32::MAX as f64) as u32).max(min)
}

/// Inputs for one physical hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalHit {
    pub attack: f64,
    pub defense: f64,
    /// Defender degradation percent.
    pub degradation: f64,
    pub critical: bool,
    /// Profile critical-damage multiplier.
    pub critical_damage: f64,
    pub martial: f64,
    /// Attacker physical-dealt multiplier.
    pub dealt: f64,
    pub race: f64,
    pub row_factor: f64,
    /// Variant/skill damage multiplier.
    pub scaling: f64,
    /// Defender physical-taken multiplier.
    pub taken: f64,
    pub guarding: bool,
    /// Ally protection factor covering the defender.
    pub protection: f64,
}

impl PhysicalHit {
    pub fn new(attack: f64, defense: f64) -> Self {
        Self {
            attack,
            defense,
            degradation: 0.0,
            critical: false,
            critical_damage: 1.0,
            martial: 1.0,
            dealt: 1.0,
            race: 1.0,
            row_factor: 1.0,
            scaling: 1.0,
            taken: 1.0,
            guarding: false,
            protection: 1.0,
        }
    }
}

/// Physical damage for one hit.
///
/// # Formula
///
/// ```text
/// base  = max(attack - defense × (1 - degradation / 100), min_damage)
/// total = base × crit × martial × dealt × race × row × scaling × taken × guard × protection
/// ```
pub fn physical_damage(hit: &PhysicalHit, params: &CombatParams) -> u32 {
    let min = params.min_damage as f64;
    let effective_defense = hit.defense * (1.0 - hit.degradation / 100.0).max(0.0);
    let base = (hit.attack - effective_defense).max(min);

    let crit = if hit.critical {
        params.crit_multiplier * hit.critical_damage
    } else {
        1.0
    };
    let guard = if hit.guarding { params.guard_factor } else { 1.0 };

    let total = base
        * crit
        * hit.martial
        * hit.dealt
        * hit.race
        * hit.row_factor
        * hit.scaling
        * hit.taken
        * guard
        * hit.protection;
    finalize(total, params.min_damage)
}

/// Inputs for one magical hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagicalHit {
    pub magical_attack: f64,
    pub spell_multiplier: f64,
    pub magical_defense: f64,
    pub degradation: f64,
    pub critical: bool,
    pub dealt: f64,
    /// Caster's spell-specific power multiplier.
    pub spell_power: f64,
    pub taken: f64,
}

impl MagicalHit {
    pub fn new(magical_attack: f64, spell_multiplier: f64, magical_defense: f64) -> Self {
        Self {
            magical_attack,
            spell_multiplier,
            magical_defense,
            degradation: 0.0,
            critical: false,
            dealt: 1.0,
            spell_power: 1.0,
            taken: 1.0,
        }
    }
}

/// Magical damage for one hit.
///
/// ```text
/// base  = max(matk × spell_mult - mdef × 0.5 × (1 - degradation / 100), min_damage)
/// total = base × magic_crit × dealt × spell_power × taken
/// ```
pub fn magical_damage(hit: &MagicalHit, params: &CombatParams) -> u32 {
    let min = params.min_damage as f64;
    let mitigation = hit.magical_defense * 0.5 * (1.0 - hit.degradation / 100.0).max(0.0);
    let base = (hit.magical_attack * hit.spell_multiplier - mitigation).max(min);
    let crit = if hit.critical {
        params.magic_crit_multiplier
    } else {
        1.0
    };
    finalize(
        base * crit * hit.dealt * hit.spell_power * hit.taken,
        params.min_damage,
    )
}

/// Breath damage for one target.
///
/// `max(power × multiplier - mdef × 0.25, min_damage) × dealt × taken`
pub fn breath_damage(
    power: f64,
    multiplier: f64,
    magical_defense: f64,
    dealt: f64,
    taken: f64,
    params: &CombatParams,
) -> u32 {
    let min = params.min_damage as f64;
    let base = (power * multiplier - magical_defense * 0.25).max(min);
    finalize(base * dealt * taken, params.min_damage)
}

/// Damage left after a barrier charge absorbs a hit.
pub fn barrier_absorb(damage: u32, params: &CombatParams) -> u32 {
    let reduced = damage as f64 * params.barrier_factor;
    if reduced <= 0.0 {
        return 0;
    }
    (reduced + 0.5).floor() as u32
}
