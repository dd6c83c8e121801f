//! Command implementations.
//!
//! Each command owns its CLI args; both share [`BattleArgs`] to locate content
//! and derive the battle seed.

mod replay_check;
mod run;

pub use replay_check::ReplayCheck;
pub use run::Run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use battle_content::{ContentFactory, Encounter};
use battle_core::{
    BattleConfig, BattleEnv, BattleResult, Combatant, DefinitionTables, compute_seed,
    resolve_battle,
};
use clap::Args;

use crate::config::{CliConfig, DEFAULT_DATA_DIR};

/// Flags shared by every command that resolves a battle.
#[derive(Args, Clone, Debug)]
pub struct BattleArgs {
    /// Content directory (overrides BATTLE_DATA_DIR)
    #[arg(short, long, value_name = "DIR")]
    data: Option<PathBuf>,

    /// Encounter id from encounters.ron
    #[arg(short, long, value_name = "ID")]
    encounter: String,

    /// Battle seed; when omitted it is derived from BATTLE_SEED, the encounter and the attempt
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,

    /// Attempt number used in seed derivation
    #[arg(long, default_value = "0")]
    attempt: u32,

    /// Override the turn cap
    #[arg(long, value_name = "N")]
    max_turns: Option<u32>,
}

/// Everything needed to resolve one battle, loaded once.
pub struct Prepared {
    pub seed: u64,
    pub config: BattleConfig,
    pub tables: DefinitionTables,
    pub party: Vec<Combatant>,
    pub encounter: Encounter,
}

impl Prepared {
    pub fn resolve(&self) -> Result<BattleResult> {
        resolve_battle(
            BattleEnv::from_tables(&self.tables),
            self.config.clone(),
            &self.party,
            &self.encounter.enemies,
            self.seed,
        )
        .with_context(|| format!("Invalid battle setup for encounter '{}'", self.encounter.id))
    }
}

impl BattleArgs {
    pub fn prepare(&self, env: &CliConfig) -> Result<Prepared> {
        let data_dir = self
            .data
            .clone()
            .or_else(|| env.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        if !data_dir.exists() {
            anyhow::bail!("Data directory not found: {}", data_dir.display());
        }

        let factory = ContentFactory::new(&data_dir);
        let tables = factory.load_tables()?;
        let party = factory.load_party()?;
        let encounter = factory.load_encounter(&self.encounter)?;

        let mut config = encounter.configure(factory.load_config()?);
        if let Some(max_turns) = self.max_turns {
            config.max_turns = max_turns;
        }

        let seed = self.seed.unwrap_or_else(|| {
            compute_seed(env.session_seed.unwrap_or(0), encounter.index, self.attempt)
        });
        tracing::info!(
            data = %data_dir.display(),
            encounter = %encounter.id,
            seed,
            "content loaded"
        );

        Ok(Prepared {
            seed,
            config,
            tables,
            party,
            encounter,
        })
    }
}
