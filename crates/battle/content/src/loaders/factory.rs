//! Content factory for loading battle inputs from a data directory.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, Combatant, DefinitionTables};

use crate::loaders::{ConfigLoader, Encounter, EncounterLoader, LoadResult, RosterLoader, TablesLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── statuses.ron
/// ├── spells.ron
/// ├── enemy_skills.ron
/// ├── party.ron
/// ├── enemies.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load status, spell and enemy-skill tables.
    pub fn load_tables(&self) -> LoadResult<DefinitionTables> {
        TablesLoader::load(&self.data_dir)
    }

    /// Load the player party from `party.ron`.
    pub fn load_party(&self) -> LoadResult<Vec<Combatant>> {
        RosterLoader::load_party(&self.data_dir.join("party.ron"))
    }

    /// Load and resolve encounter `id` from `encounters.ron` and `enemies.ron`.
    ///
    /// Composition problems surface as [`crate::ContentError`] inside the
    /// returned error, so callers can downcast.
    pub fn load_encounter(&self, id: &str) -> LoadResult<Encounter> {
        let specs = EncounterLoader::load(&self.data_dir.join("encounters.ron"))?;
        let catalog = RosterLoader::load_enemies(&self.data_dir.join("enemies.ron"))?;
        let encounter = EncounterLoader::resolve(&specs, &catalog, id)?;
        tracing::debug!(encounter = id, enemies = encounter.enemies.len(), "encounter resolved");
        Ok(encounter)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentError;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn seeded_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "enemies.ron",
            r#"{ "rat": (display_id: "rat", name: "Rat", stats: (max_hp: 12)) }"#,
        );
        write(
            dir.path(),
            "encounters.ron",
            r#"[
    (id: "cellar", name: "Cellar", groups: [(enemy: "rat", count: 3)]),
    (id: "empty", groups: []),
]"#,
        );
        dir
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContentFactory::new(dir.path()).load_config().unwrap();
        assert_eq!(config, BattleConfig::default());
    }

    #[test]
    fn encounter_resolves_through_factory() {
        let dir = seeded_dir();
        let encounter = ContentFactory::new(dir.path())
            .load_encounter("cellar")
            .unwrap();
        assert_eq!(encounter.name, "Cellar");
        assert_eq!(encounter.enemies.len(), 3);
    }

    #[test]
    fn composition_errors_downcast_to_content_error() {
        let dir = seeded_dir();
        let factory = ContentFactory::new(dir.path());

        let err = factory.load_encounter("empty").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ContentError>(),
            Some(&ContentError::EmptyEncounter("empty".into()))
        );

        let err = factory.load_encounter("attic").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ContentError>(),
            Some(&ContentError::UnknownEncounter("attic".into()))
        );
    }
}
