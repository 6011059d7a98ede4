//! Crossfade progress shared by both engines.

/// Duration of the reference frame all per-frame speeds are expressed in.
pub const REFERENCE_FRAME_MS: f32 = 16.67;

/// A frame delta usable for simulation: negative, NaN and infinite deltas
/// count as zero.
#[must_use]
pub fn clamp_delta(delta_ms: f32) -> f32 {
    if delta_ms.is_finite() {
        delta_ms.max(0.0)
    } else {
        0.0
    }
}

/// How many reference frames `delta_ms` represents, after [`clamp_delta`].
#[must_use]
pub fn frame_factor(delta_ms: f32) -> f32 {
    clamp_delta(delta_ms) / REFERENCE_FRAME_MS
}

/// An in-flight crossfade towards `target`.
///
/// Progress stays in `[0, 1]`; reaching 1 completes the crossfade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossfade<T> {
    target: T,
    progress: f32,
}

impl<T: Copy> Crossfade<T> {
    /// Starts a crossfade at progress 0.
    #[must_use]
    pub fn new(target: T) -> Self {
        Self {
            target,
            progress: 0.0,
        }
    }

    /// What the crossfade is heading towards.
    #[must_use]
    pub fn target(&self) -> T {
        self.target
    }

    /// Progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Advances by `speed` per reference frame. Returns the target once the
    /// crossfade completes; the caller commits it and drops the crossfade.
    pub fn advance(&mut self, speed: f32, delta_ms: f32) -> Option<T> {
        self.progress = (self.progress + speed * frame_factor(delta_ms)).min(1.0);
        (self.progress >= 1.0).then_some(self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_completes_after_expected_frames() {
        let mut fade = Crossfade::new('b');
        let mut frames = 0;
        while fade.advance(0.02, REFERENCE_FRAME_MS).is_none() {
            frames += 1;
            assert!(frames < 100, "crossfade never completed");
        }
        // 0.02 per frame completes on the 50th frame (allowing float drift).
        assert!((49..=50).contains(&frames));
    }

    #[test]
    fn test_non_finite_deltas_count_as_zero() {
        assert_eq!(frame_factor(f32::INFINITY), 0.0);
        assert_eq!(frame_factor(f32::NEG_INFINITY), 0.0);
        assert_eq!(frame_factor(f32::NAN), 0.0);
        assert_eq!(clamp_delta(33.34), 33.34);
    }

    #[test]
    fn test_negative_delta_is_ignored() {
        let mut fade = Crossfade::new(1);
        assert!(fade.advance(0.5, -100.0).is_none());
        assert_eq!(fade.progress(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_progress_in_unit_range(deltas in prop::collection::vec(-50.0f32..5000.0, 1..40)) {
            let mut fade = Crossfade::new(());
            for d in deltas {
                let done = fade.advance(0.01, d).is_some();
                prop_assert!((0.0..=1.0).contains(&fade.progress()));
                if done {
                    break;
                }
            }
        }
    }
}
