//! Encounter compositions.
//!
//! An encounter names groups of enemy templates from the catalog; resolving it
//! expands every group into concrete combatants in declaration order.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::{BattleConfig, Combatant};
use serde::{Deserialize, Serialize};

use crate::error::ContentError;
use crate::loaders::{LoadResult, read_ron};

/// A run of identical enemies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyGroup {
    /// Key into the enemy catalog.
    pub enemy: String,
    #[serde(default = "default_count")]
    pub count: u8,
}

fn default_count() -> u8 {
    1
}

/// Encounter entry as written in `encounters.ron`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSpec {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub groups: Vec<EnemyGroup>,
    /// Per-encounter turn cap overriding the configured one.
    #[serde(default)]
    pub max_turns: Option<u32>,
}

/// A resolved encounter ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    pub id: String,
    /// Position in `encounters.ron`; feeds battle seed derivation.
    pub index: u32,
    pub name: String,
    pub enemies: Vec<Combatant>,
    pub max_turns: Option<u32>,
}

impl Encounter {
    /// Applies encounter-level overrides to `config`.
    pub fn configure(&self, mut config: BattleConfig) -> BattleConfig {
        if let Some(max_turns) = self.max_turns {
            config.max_turns = max_turns;
        }
        config
    }
}

/// Loader for encounter definitions from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load every encounter spec.
    ///
    /// RON format: `Vec<EncounterSpec>`
    pub fn load(path: &Path) -> LoadResult<Vec<EncounterSpec>> {
        read_ron(path, "encounter list")
    }

    /// Expands the encounter `id` against `catalog`.
    ///
    /// Repeated templates get lettered display ids (`goblin-A`, `goblin-B`).
    pub fn resolve(
        specs: &[EncounterSpec],
        catalog: &BTreeMap<String, Combatant>,
        id: &str,
    ) -> Result<Encounter, ContentError> {
        let (index, spec) = specs
            .iter()
            .enumerate()
            .find(|(_, spec)| spec.id == id)
            .ok_or_else(|| ContentError::UnknownEncounter(id.to_string()))?;

        let mut enemies = Vec::new();
        for group in &spec.groups {
            let template = catalog
                .get(&group.enemy)
                .ok_or_else(|| ContentError::UnknownEnemy {
                    encounter: spec.id.clone(),
                    enemy: group.enemy.clone(),
                })?;
            for n in 0..group.count {
                let mut enemy = template.clone();
                if group.count > 1 {
                    enemy.display_id = format!("{}-{}", template.display_id, letter(n));
                }
                enemies.push(enemy);
            }
        }
        if enemies.is_empty() {
            return Err(ContentError::EmptyEncounter(spec.id.clone()));
        }

        Ok(Encounter {
            id: spec.id.clone(),
            index: index as u32,
            name: spec.name.clone(),
            enemies,
            max_turns: spec.max_turns,
        })
    }
}

fn letter(n: u8) -> char {
    char::from(b'A' + n % 26)
}
