//! Replays one encounter several times and verifies the log roots agree.

use anyhow::Result;
use battle_core::compute_log_root;
use clap::Parser;
use console::style;

use super::BattleArgs;
use crate::config::CliConfig;

/// Resolve an encounter repeatedly and compare log roots
#[derive(Parser)]
pub struct ReplayCheck {
    #[command(flatten)]
    battle: BattleArgs,

    /// Number of replays
    #[arg(short, long, default_value = "2")]
    runs: u32,
}

impl ReplayCheck {
    pub fn execute(self, env: &CliConfig) -> Result<()> {
        let prepared = self.battle.prepare(env)?;
        let runs = self.runs.max(2);

        let mut expected: Option<[u8; 32]> = None;
        for run in 0..runs {
            let result = prepared.resolve()?;
            let root = compute_log_root(&result.log);
            tracing::debug!(run, root = %hex::encode(root), outcome = %result.outcome, "replay");
            match expected {
                None => expected = Some(root),
                Some(first) if first != root => {
                    anyhow::bail!(
                        "Replay {} diverged: {} != {}",
                        run,
                        hex::encode(root),
                        hex::encode(first)
                    );
                }
                Some(_) => {}
            }
        }

        if let Some(root) = expected {
            println!(
                "{} {} runs, seed {}, root {}",
                style("deterministic:").bold().green(),
                runs,
                prepared.seed,
                hex::encode(root)
            );
        }
        Ok(())
    }
}
