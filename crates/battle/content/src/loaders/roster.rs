//! Party and enemy catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::Combatant;

use crate::loaders::{LoadResult, read_ron};

/// Loader for combatant rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load the player party.
    ///
    /// RON format: `Vec<Combatant>` in formation order.
    pub fn load_party(path: &Path) -> LoadResult<Vec<Combatant>> {
        let party: Vec<Combatant> = read_ron(path, "party")?;
        if party.is_empty() {
            anyhow::bail!("Party at {} is empty", path.display());
        }
        tracing::debug!(members = party.len(), "party loaded");
        Ok(party)
    }

    /// Load the enemy catalog keyed by template name.
    ///
    /// RON format: `{ "goblin": Combatant, ... }`
    pub fn load_enemies(path: &Path) -> LoadResult<BTreeMap<String, Combatant>> {
        let catalog: BTreeMap<String, Combatant> = read_ron(path, "enemy catalog")?;
        tracing::debug!(templates = catalog.len(), "enemy catalog loaded");
        Ok(catalog)
    }
}
