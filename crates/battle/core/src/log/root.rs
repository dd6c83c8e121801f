//! Log root: a SHA-256 commitment to an action log.
//!
//! Replay verification compares roots instead of whole logs. Two battles with
//! the same rosters, tables, config and seed produce the same root.

#[cfg(feature = "serde")]
use super::ActionLog;

/// Computes the SHA-256 root of a log.
///
/// Entries are bincode-serialized and hashed in order, so reordering any
/// entry or effect changes the root.
#[cfg(feature = "serde")]
pub fn compute_log_root(log: &ActionLog) -> [u8; 32] {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for entry in log.entries() {
        if let Ok(bytes) = bincode::serialize(entry) {
            hasher.update(&bytes);
        }
    }
    hasher.finalize().into()
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::log::{ActionEntry, ActionKind};

    #[test]
    fn root_depends_on_order() {
        let mut a = ActionLog::new();
        a.push(ActionEntry::new(0, None, ActionKind::BattleStart));
        a.push(ActionEntry::new(1, None, ActionKind::TurnStart));

        let mut b = ActionLog::new();
        b.push(ActionEntry::new(1, None, ActionKind::TurnStart));
        b.push(ActionEntry::new(0, None, ActionKind::BattleStart));

        assert_eq!(compute_log_root(&a), compute_log_root(&a.clone()));
        assert_ne!(compute_log_root(&a), compute_log_root(&b));
    }
}
