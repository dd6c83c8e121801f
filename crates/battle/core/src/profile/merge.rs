//! Field-wise merge functions used by [`super::ProfileBuilder`].
//!
//! Every profile field is folded with exactly one of these:
//!
//! - **sum**: additive bonuses (flat percent bonuses, barrier charges)
//! - **max**: overrides and flags (`false < true`, highest chance wins)
//! - **min**: thresholds where the smaller value is stronger (intervals)
//! - **product**: rate modifiers (damage multipliers)

use core::ops::Add;

/// Additive merge.
#[inline]
pub fn sum<T: Add<Output = T>>(current: T, incoming: T) -> T {
    current + incoming
}

/// Override merge: the larger value wins.
#[inline]
pub fn max<T: PartialOrd>(current: T, incoming: T) -> T {
    if incoming > current {
        incoming
    } else {
        current
    }
}

/// The smaller value wins.
#[inline]
pub fn min<T: PartialOrd>(current: T, incoming: T) -> T {
    if incoming < current {
        incoming
    } else {
        current
    }
}

/// Multiplicative merge for rate modifiers.
#[inline]
pub fn product(current: f64, incoming: f64) -> f64 {
    current * incoming
}

/// Merges an optional rule group, combining field-wise when both are present.
pub fn option<T>(current: Option<T>, incoming: T, merge: impl FnOnce(T, T) -> T) -> Option<T> {
    Some(match current {
        Some(existing) => merge(existing, incoming),
        None => incoming,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_merges() {
        assert_eq!(sum(3, 4), 7);
        assert_eq!(max(3.0, 1.5), 3.0);
        assert_eq!(min(3u32, 1), 1);
        assert!((product(1.5, 0.5) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn flags_merge_with_max() {
        assert!(max(false, true));
        assert!(max(true, false));
        assert!(!max(false, false));
    }

    #[test]
    fn option_merge_combines_both() {
        assert_eq!(option(None, 4, sum), Some(4));
        assert_eq!(option(Some(4), 6, max), Some(6));
        assert_eq!(option(Some(4), 6, min), Some(4));
    }
}
