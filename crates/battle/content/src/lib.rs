//! Data-driven battle content and loaders.
//!
//! This crate reads RON/TOML data files into the types `battle-core` consumes:
//! - Definition tables: statuses, spells and enemy skills (RON)
//! - The player party and the enemy catalog (RON)
//! - Encounter compositions built from the enemy catalog (RON)
//! - Battle configuration (TOML)
//!
//! Content is resolved once, before a battle starts, and never appears in
//! battle state.

pub mod error;
pub mod loaders;

pub use error::ContentError;
pub use loaders::{
    ConfigLoader, ContentFactory, Encounter, EncounterLoader, EncounterSpec, EnemyGroup,
    LoadResult, RosterLoader, TablesLoader,
};
