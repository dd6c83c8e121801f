//! Resolve one encounter and print the result.

use anyhow::Result;
use battle_core::compute_log_root;
use clap::Parser;

use super::BattleArgs;
use crate::config::CliConfig;
use crate::render;

/// Resolve one encounter and print its log
#[derive(Parser)]
pub struct Run {
    #[command(flatten)]
    battle: BattleArgs,

    /// Print the full result as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Run {
    pub fn execute(self, env: &CliConfig) -> Result<()> {
        let prepared = self.battle.prepare(env)?;
        let result = prepared.resolve()?;
        let root = hex::encode(compute_log_root(&result.log));

        if self.json {
            let output = serde_json::json!({
                "encounter": prepared.encounter.id,
                "seed": prepared.seed,
                "logRoot": root,
                "result": result,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            render::print_battle(&prepared.encounter, prepared.seed, &result, &root);
        }
        Ok(())
    }
}
