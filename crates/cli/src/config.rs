//! Environment-backed defaults for command flags.
use std::env;
use std::path::PathBuf;

/// Directory used when neither `--data` nor `BATTLE_DATA_DIR` is given.
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub session_seed: Option<u64>,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_DATA_DIR` - Content directory (default: `./data`)
    /// - `BATTLE_SEED` - Session seed used to derive battle seeds (default: 0)
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("BATTLE_DATA_DIR").ok().map(PathBuf::from),
            session_seed: read_env::<u64>("BATTLE_SEED"),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
