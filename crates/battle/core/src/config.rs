/// Battle configuration constants and tunable parameters.
///
/// Passed explicitly into [`crate::BattleEngine::new`] so balancing and tests can
/// run the same rosters under different turn caps and recursion limits.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Turn cap. Reaching it without a terminal condition resolves as a retreat.
    pub max_turns: u32,
    /// Deepest reaction chain allowed. `0` disables reactions entirely.
    pub max_reaction_depth: u8,
    /// Deepest extra-action pass allowed after a main action.
    pub max_extra_action_depth: u8,
    /// Global scale applied to every reaction proc chance.
    pub reaction_proc_multiplier: f64,
    /// Formula constants for the damage pipeline.
    pub combat: CombatParams,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum actors per side.
    pub const MAX_ROSTER: usize = 12;
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const MAX_BUFFS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_TURNS: u32 = 20;
    pub const DEFAULT_MAX_REACTION_DEPTH: u8 = 3;
    pub const DEFAULT_MAX_EXTRA_ACTION_DEPTH: u8 = 2;

    pub fn new() -> Self {
        Self {
            max_turns: Self::DEFAULT_MAX_TURNS,
            max_reaction_depth: Self::DEFAULT_MAX_REACTION_DEPTH,
            max_extra_action_depth: Self::DEFAULT_MAX_EXTRA_ACTION_DEPTH,
            reaction_proc_multiplier: 1.0,
            combat: CombatParams::default(),
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_reaction_depth(mut self, depth: u8) -> Self {
        self.max_reaction_depth = depth;
        self
    }

    pub fn with_extra_action_depth(mut self, depth: u8) -> Self {
        self.max_extra_action_depth = depth;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Balance constants consumed by the pure functions in [`crate::combat`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatParams {
    pub base_hit: f64,
    pub hit_scale: f64,
    pub hit_min: f64,
    pub hit_max: f64,
    /// Per-hit-index accuracy decay for multi-hit sequences.
    pub multi_hit_decay: f64,
    pub min_damage: u32,
    pub crit_multiplier: f64,
    pub magic_crit_multiplier: f64,
    /// Damage multiplier applied while the defender is guarding.
    pub guard_factor: f64,
    /// Damage multiplier applied when a barrier charge absorbs a hit.
    pub barrier_factor: f64,
    /// Status chance multiplier for spell-bound statuses against barrier holders.
    pub barrier_status_factor: f64,
    /// Upper bound for parry and shield-block chances.
    pub guard_cap: f64,
    /// Physical damage factor by attacker formation row (index = row, last entry repeats).
    pub row_factors: Vec<f64>,
    pub max_degradation: f64,
    /// Allies at or below this HP percent make spellcasters prefer healing.
    pub heal_threshold_percent: u32,
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            base_hit: 50.0,
            hit_scale: 1.0,
            hit_min: 5.0,
            hit_max: 100.0,
            multi_hit_decay: 0.9,
            min_damage: 1,
            crit_multiplier: 1.5,
            magic_crit_multiplier: 1.5,
            guard_factor: 0.5,
            barrier_factor: 1.0 / 3.0,
            barrier_status_factor: 0.5,
            guard_cap: 75.0,
            row_factors: vec![1.0, 0.8, 0.6],
            max_degradation: 50.0,
            heal_threshold_percent: 50,
        }
    }
}

impl CombatParams {
    /// Physical damage factor for an attacker standing in `row`.
    pub fn row_factor(&self, row: u8) -> f64 {
        self.row_factors
            .get(row as usize)
            .or_else(|| self.row_factors.last())
            .copied()
            .unwrap_or(1.0)
    }
}
