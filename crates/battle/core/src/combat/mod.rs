//! Combat resolution system.
//!
//! Pure functions for resolving combat interactions. Nothing here mutates an
//! actor or draws a random number: the engine rolls, gathers inputs and feeds
//! them in. Generic attacks, variant attacks, enemy skills and reactions all
//! share these functions.
//!
//! # Core Functions
//!
//! - [`hit_chance`]: hit score vs evasion with per-hit decay
//! - [`physical_damage`], [`magical_damage`], [`breath_damage`]
//! - [`parry_chance`], [`block_chance`]
//! - [`heal_amount`], [`status_chance`]

pub mod damage;
pub mod defense;
pub mod hit;
pub mod support;

pub use damage::{
    MagicalHit, PhysicalHit, barrier_absorb, breath_damage, finalize, magical_damage,
    physical_damage,
};
pub use defense::{block_chance, parry_chance};
pub use hit::{attack_count, critical_chance, hit_chance};
pub use support::{heal_amount, status_chance, tick_damage};
