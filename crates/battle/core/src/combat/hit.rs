//! Hit, critical and attack-count calculations.

use crate::config::CombatParams;
use crate::env::clamp_percent;

/// Chance for hit number `hit_index` (0-based) of a sequence to land.
///
/// # Formula
///
/// ```text
/// base   = clamp(base_hit + (hit - evasion) × hit_scale, hit_min, hit_max)
/// chance = base × accuracy × multi_hit_decay ^ hit_index
/// clamped to [0, 100]
/// ```
pub fn hit_chance(
    hit_score: f64,
    evasion_score: f64,
    accuracy: f64,
    hit_index: u32,
    params: &CombatParams,
) -> f64 {
    let base = (params.base_hit + (hit_score - evasion_score) * params.hit_scale)
        .clamp(params.hit_min, params.hit_max);
    let decay = params.multi_hit_decay.powi(hit_index as i32);
    clamp_percent(base * accuracy * decay)
}

/// Physical critical chance.
///
/// `clamp(rate + bonus, 0, cap) × multiplier`, clamped to [0, 100].
pub fn critical_chance(rate: f64, bonus: f64, cap: f64, multiplier: f64) -> f64 {
    let capped = (rate + bonus).clamp(0.0, cap.max(0.0));
    clamp_percent(capped * multiplier)
}

/// Hits per physical action: `max(1, round(base × multiplier))`.
pub fn attack_count(base: f64, multiplier: f64) -> u32 {
    let scaled = (base * multiplier).round();
    if scaled.is_nan() || scaled < 1.0 {
        1
    } else {
        scaled.min(u8::MAX as f64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_chance_clamps_and_decays() {
        let params = CombatParams::default();
        assert_eq!(hit_chance(100.0, 0.0, 1.0, 0, &params), 100.0);
        assert_eq!(hit_chance(0.0, 100.0, 1.0, 0, &params), 5.0);
        assert_eq!(hit_chance(10.0, 10.0, 1.0, 0, &params), 50.0);
        assert!((hit_chance(10.0, 10.0, 1.0, 2, &params) - 40.5).abs() < 1e-9);
        assert_eq!(hit_chance(100.0, 0.0, 2.0, 0, &params), 100.0);
    }

    #[test]
    fn critical_chance_respects_cap() {
        assert_eq!(critical_chance(40.0, 30.0, 50.0, 1.0), 50.0);
        assert_eq!(critical_chance(10.0, 0.0, 50.0, 2.0), 20.0);
        assert_eq!(critical_chance(-10.0, 0.0, 50.0, 1.0), 0.0);
    }

    #[test]
    fn attack_count_floors_at_one() {
        assert_eq!(attack_count(0.0, 1.0), 1);
        assert_eq!(attack_count(2.0, 1.5), 3);
        assert_eq!(attack_count(3.0, 0.1), 1);
    }
}
