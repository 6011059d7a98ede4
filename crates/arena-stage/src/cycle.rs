//! Periodic random switching.

use arena_common::RandomSource;

/// Auto-cycle settings and the time of the last switch, on the engine's
/// simulated clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoCycle {
    enabled: bool,
    period_ms: f64,
    last_switch_ms: f64,
}

impl AutoCycle {
    /// A disabled cycle with the given default period.
    #[must_use]
    pub const fn disabled(period_ms: f64) -> Self {
        Self {
            enabled: false,
            period_ms,
            last_switch_ms: 0.0,
        }
    }

    /// Enables cycling every `period_ms`, counting from `now_ms`.
    pub fn enable(&mut self, period_ms: f64, now_ms: f64) {
        self.enabled = true;
        self.period_ms = period_ms.max(0.0);
        self.last_switch_ms = now_ms;
    }

    /// Stops cycling.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether cycling is on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether more than one period has elapsed since the last switch.
    #[must_use]
    pub fn is_due(&self, now_ms: f64) -> bool {
        self.enabled && now_ms - self.last_switch_ms > self.period_ms
    }

    /// Records a switch at `now_ms`.
    pub fn mark(&mut self, now_ms: f64) {
        self.last_switch_ms = now_ms;
    }
}

/// Picks uniformly among the entries of `all` that differ from `current`.
pub fn pick_other<T: Copy + PartialEq>(
    all: &[T],
    current: T,
    rng: &mut dyn RandomSource,
) -> Option<T> {
    let others: Vec<T> = all.iter().copied().filter(|c| *c != current).collect();
    if others.is_empty() {
        return None;
    }
    Some(others[rng.index(others.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedRandom;
    use arena_common::SeededRandom;

    #[test]
    fn test_due_after_period() {
        let mut cycle = AutoCycle::disabled(1000.0);
        assert!(!cycle.is_due(5000.0));

        cycle.enable(1000.0, 100.0);
        assert!(!cycle.is_due(1100.0));
        assert!(cycle.is_due(1100.5));

        cycle.mark(1100.5);
        assert!(!cycle.is_due(2000.0));

        cycle.disable();
        assert!(!cycle.is_due(1_000_000.0));
    }

    #[test]
    fn test_pick_other_never_returns_current() {
        let all = [1, 2, 3, 4, 5];
        let mut rng = SeededRandom::with_seed(3);
        for _ in 0..200 {
            assert_ne!(pick_other(&all, 3, &mut rng), Some(3));
        }
    }

    #[test]
    fn test_pick_other_with_pinned_rng() {
        let all = ['a', 'b', 'c'];
        assert_eq!(pick_other(&all, 'a', &mut FixedRandom(0.0)), Some('b'));
        assert_eq!(pick_other(&all, 'a', &mut FixedRandom(0.99)), Some('c'));
        assert_eq!(pick_other(&['a'], 'a', &mut FixedRandom(0.0)), None);
    }
}
