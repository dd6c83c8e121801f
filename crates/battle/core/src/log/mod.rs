//! Append-only structured battle log.
//!
//! The log is the only channel presentation layers read: every HP, status and
//! resource change the engine performs has exactly one [`Effect`]. Entries and
//! their effects are stored in production order and never reordered.
mod entry;
mod root;

pub use entry::{ActionEntry, ActionKind, Effect, EffectKind};
#[cfg(feature = "serde")]
pub use root::compute_log_root;

use crate::state::ActorId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionLog {
    entries: Vec<ActionEntry>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ActionEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ActionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ActionEntry> {
        self.entries.last()
    }

    /// Every effect in log order.
    pub fn effects(&self) -> impl Iterator<Item = (&ActionEntry, &Effect)> {
        self.entries
            .iter()
            .flat_map(|entry| entry.effects.iter().map(move |effect| (entry, effect)))
    }

    /// Entries declared by `actor`.
    pub fn by_actor(&self, actor: ActorId) -> impl Iterator<Item = &ActionEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.actor == Some(actor))
    }

    pub fn of_kind(&self, kind: ActionKind) -> impl Iterator<Item = &ActionEntry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }

    pub fn into_entries(self) -> Vec<ActionEntry> {
        self.entries
    }
}
