//! Definition tables loader.
//!
//! Reads the three master-data files into one [`DefinitionTables`]:
//!
//! ```text
//! statuses.ron      Vec<StatusDefinition>
//! spells.ron        Vec<SpellDefinition>
//! enemy_skills.ron  Vec<EnemySkillDefinition>
//! ```

use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::Path;

use battle_core::{DefinitionTables, EnemySkillDefinition, SpellDefinition, StatusDefinition};

use crate::loaders::{LoadResult, read_ron};

/// Loader for definition tables from RON files.
pub struct TablesLoader;

impl TablesLoader {
    /// Load all definition tables from `dir`.
    ///
    /// Duplicate ids within one file are rejected rather than silently
    /// overwritten.
    pub fn load(dir: &Path) -> LoadResult<DefinitionTables> {
        let statuses: Vec<StatusDefinition> = read_ron(&dir.join("statuses.ron"), "status table")?;
        let spells: Vec<SpellDefinition> = read_ron(&dir.join("spells.ron"), "spell table")?;
        let enemy_skills: Vec<EnemySkillDefinition> =
            read_ron(&dir.join("enemy_skills.ron"), "enemy skill table")?;

        ensure_unique("status", statuses.iter().map(|d| d.id))?;
        ensure_unique("spell", spells.iter().map(|d| d.id))?;
        ensure_unique("enemy skill", enemy_skills.iter().map(|d| d.id))?;

        tracing::debug!(
            statuses = statuses.len(),
            spells = spells.len(),
            enemy_skills = enemy_skills.len(),
            "definition tables loaded"
        );
        Ok(DefinitionTables::from_definitions(
            statuses,
            spells,
            enemy_skills,
        ))
    }
}

fn ensure_unique<K: Ord + Display>(what: &str, ids: impl Iterator<Item = K>) -> LoadResult<()> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if let Some(dup) = seen.replace(id) {
            anyhow::bail!("Duplicate {} id {}", what, dup);
        }
    }
    Ok(())
}
