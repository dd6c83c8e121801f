//! Turn loop, action selection, reaction dispatch and defeat handling.
//!
//! The [`BattleEngine`] owns one [`BattleContext`] and drives it from the
//! battle-start phase to a terminal [`Outcome`]. Everything stochastic goes
//! through the context's random source in a fixed order, so equal inputs give
//! byte-identical logs.
//!
//! Construction validates rosters and definition references up front; once
//! [`BattleEngine::new`] returns `Ok`, [`BattleEngine::run`] cannot fail.

mod attack;
mod battle;
mod context;
mod defeat;
mod errors;
mod execute;
mod reaction;
mod selection;
mod status;
mod targeting;
mod turns;

pub use context::BattleContext;
pub use errors::SetupError;
pub use reaction::ReactionEvent;
pub use selection::ActionChoice;

use crate::config::BattleConfig;
use crate::env::{BattleEnv, EnemySkillKind, PcgRng, RandomSource, SpellKind};
use crate::log::ActionLog;
use crate::state::{Actor, ActorId, Combatant, Side};

/// Terminal result of a battle.
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
pub enum Outcome {
    Victory,
    Defeat,
    Retreat,
}

/// Everything a caller needs after a battle: outcome, log and final rosters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    pub outcome: Outcome,
    /// Last turn played (0 when the battle ended during the start phase).
    pub turns: u32,
    pub log: ActionLog,
    pub players: Vec<Actor>,
    pub enemies: Vec<Actor>,
}

/// Deterministic battle resolver.
pub struct BattleEngine<'a, R> {
    env: BattleEnv<'a>,
    config: BattleConfig,
    ctx: BattleContext<R>,
}

impl<'a, R: RandomSource> BattleEngine<'a, R> {
    /// Validates the inputs and builds the battle context.
    pub fn new(
        env: BattleEnv<'a>,
        config: BattleConfig,
        players: &[Combatant],
        enemies: &[Combatant],
        rng: R,
    ) -> Result<Self, SetupError> {
        validate_config(&config)?;

        let players = build_roster(&env, Side::Players, players)?;
        let enemies = build_roster(&env, Side::Enemies, enemies)?;

        tracing::debug!(
            players = players.len(),
            enemies = enemies.len(),
            max_turns = config.max_turns,
            "battle prepared"
        );

        Ok(Self {
            env,
            config,
            ctx: BattleContext::new(players, enemies, rng),
        })
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn context(&self) -> &BattleContext<R> {
        &self.ctx
    }

    /// Runs the battle to completion.
    pub fn run(mut self) -> BattleResult {
        let outcome = self.run_battle();
        let turns = self.ctx.turn;
        tracing::info!(%outcome, turns, entries = self.ctx.log.len(), "battle resolved");

        let (players, enemies, log) = self.ctx.into_rosters();
        BattleResult {
            outcome,
            turns,
            log,
            players,
            enemies,
        }
    }
}

/// Resolves one battle with a [`PcgRng`] seeded from `seed`.
pub fn resolve_battle(
    env: BattleEnv<'_>,
    config: BattleConfig,
    players: &[Combatant],
    enemies: &[Combatant],
    seed: u64,
) -> Result<BattleResult, SetupError> {
    Ok(BattleEngine::new(env, config, players, enemies, PcgRng::new(seed))?.run())
}

fn validate_config(config: &BattleConfig) -> Result<(), SetupError> {
    if config.max_turns == 0 {
        return Err(SetupError::InvalidConfig("max_turns must be at least 1".into()));
    }
    let proc = config.reaction_proc_multiplier;
    if proc.is_nan() || proc < 0.0 {
        return Err(SetupError::InvalidConfig(
            "reaction_proc_multiplier must be a non-negative number".into(),
        ));
    }
    if config.combat.row_factors.is_empty() {
        return Err(SetupError::InvalidConfig("row_factors must not be empty".into()));
    }
    Ok(())
}

fn build_roster(
    env: &BattleEnv<'_>,
    side: Side,
    combatants: &[Combatant],
) -> Result<Vec<Actor>, SetupError> {
    if combatants.is_empty() {
        return Err(SetupError::EmptyRoster { side });
    }
    if combatants.len() > BattleConfig::MAX_ROSTER {
        return Err(SetupError::RosterTooLarge {
            side,
            len: combatants.len(),
            max: BattleConfig::MAX_ROSTER,
        });
    }

    combatants
        .iter()
        .enumerate()
        .map(|(index, combatant)| {
            let id = ActorId::new(side, index as u8);
            validate_combatant(env, id, combatant)?;
            Ok(Actor::from_combatant(id, combatant))
        })
        .collect()
}

fn validate_combatant(
    env: &BattleEnv<'_>,
    id: ActorId,
    combatant: &Combatant,
) -> Result<(), SetupError> {
    let max_hp = combatant.stats.max_hp;
    if max_hp == 0 {
        return Err(SetupError::invalid_actor(id, "max_hp must be positive"));
    }
    if combatant.hp.is_some_and(|hp| hp > max_hp) {
        return Err(SetupError::invalid_actor(id, "hp exceeds max_hp"));
    }

    for slot in &combatant.spells {
        let spell = env.require_spell(slot.spell)?;
        if let SpellKind::Status { status, .. } = spell.kind {
            env.require_status(status)?;
        }
    }
    for &skill in &combatant.enemy_skills {
        let skill = env.require_enemy_skill(skill)?;
        if let EnemySkillKind::Status { status, .. } = skill.kind {
            env.require_status(status)?;
        }
        if let Some((status, _)) = skill.inflicts {
            env.require_status(status)?;
        }
    }

    // Profile references are checked on the compiled form.
    let profile = crate::profile::ProfileBuilder::fold(&combatant.abilities);
    for status in profile.referenced_statuses() {
        env.require_status(status)?;
    }
    for spell in profile.referenced_spells() {
        env.require_spell(spell)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for engine unit tests.
    use crate::env::DefinitionTables;
    use crate::state::{ActionRates, CombatStats, Combatant};

    pub fn fighter(name: &str, attack: f64, defense: f64, max_hp: u32, agility: i32) -> Combatant {
        let mut combatant = Combatant::new(
            name,
            name,
            CombatStats {
                max_hp,
                physical_attack: attack,
                physical_defense: defense,
                hit_score: 100.0,
                evasion_score: 0.0,
                critical_rate: 0.0,
                attack_count: 1.0,
                ..CombatStats::default()
            },
        );
        combatant.attributes.agility = agility;
        combatant.rates = ActionRates {
            physical: 100,
            ..ActionRates::default()
        };
        combatant
    }

    pub fn idle(name: &str, max_hp: u32) -> Combatant {
        let mut combatant = fighter(name, 1.0, 0.0, max_hp, 1);
        combatant.rates = ActionRates::default();
        combatant
    }

    pub fn tables() -> DefinitionTables {
        DefinitionTables::new()
    }
}
