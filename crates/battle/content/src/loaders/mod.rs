//! Content loaders for reading battle data from files.
//!
//! Each loader turns one RON/TOML file (or a fixed set of them) into
//! `battle-core` types. [`ContentFactory`] ties them to a data directory.

pub mod config;
pub mod encounter;
pub mod factory;
pub mod roster;
pub mod tables;

pub use config::ConfigLoader;
pub use encounter::{Encounter, EncounterLoader, EncounterSpec, EnemyGroup};
pub use factory::ContentFactory;
pub use roster::RosterLoader;
pub use tables::TablesLoader;

use std::path::Path;

use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Reads and parses one RON file.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path, what: &str) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} RON at {}: {}", what, path.display(), e))
}
