//! The bundled `data/` directory loads and every encounter resolves.

use std::path::PathBuf;

use battle_content::{ContentFactory, EncounterLoader};
use battle_core::{ActionKind, BattleEnv, compute_log_root, resolve_battle};

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../data")
}

#[test]
fn bundled_content_loads() {
    let factory = ContentFactory::new(data_dir());
    let config = factory.load_config().expect("config.toml should parse");
    let tables = factory.load_tables().expect("definition tables should parse");
    let party = factory.load_party().expect("party.ron should parse");

    assert_eq!(config.max_turns, 20);
    assert!(!tables.statuses.is_empty());
    assert!(!tables.spells.is_empty());
    assert!(!tables.enemy_skills.is_empty());
    assert_eq!(party.len(), 4);
}

/// Every encounter in the bundle is a valid, replayable battle.
#[test]
fn every_bundled_encounter_resolves_deterministically() {
    let factory = ContentFactory::new(data_dir());
    let config = factory.load_config().expect("config.toml should parse");
    let tables = factory.load_tables().expect("definition tables should parse");
    let party = factory.load_party().expect("party.ron should parse");
    let specs = EncounterLoader::load(&data_dir().join("encounters.ron"))
        .expect("encounters.ron should parse");

    for spec in &specs {
        let encounter = factory
            .load_encounter(&spec.id)
            .expect("bundled encounter should resolve");
        let config = encounter.configure(config.clone());

        let run = || {
            resolve_battle(
                BattleEnv::from_tables(&tables),
                config.clone(),
                &party,
                &encounter.enemies,
                0xBA77_1E00 + u64::from(encounter.index),
            )
            .expect("bundled content should pass setup validation")
        };
        let first = run();
        let second = run();

        assert_eq!(
            first.log.last().map(|entry| entry.kind),
            Some(ActionKind::BattleEnd)
        );
        assert!(first.turns <= config.max_turns);
        assert_eq!(
            compute_log_root(&first.log),
            compute_log_root(&second.log),
            "encounter {} must replay identically",
            spec.id
        );
    }
}
