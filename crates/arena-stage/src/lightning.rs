//! Lightning flashes for stormy weather.

use arena_common::RandomSource;

use crate::crossfade::frame_factor;

/// Minimum simulated time between two strikes.
pub const MIN_STRIKE_GAP_MS: f64 = 3000.0;

/// Strike probability per reference frame once the gap has elapsed.
pub const STRIKE_CHANCE: f32 = 0.01;

/// Flash alpha lost per reference frame.
pub const FLASH_DECAY: f32 = 0.05;

/// Probability that a strike is followed by thunder.
pub const THUNDER_CHANCE: f32 = 0.7;

/// Shortest delay between a strike and its thunder.
pub const THUNDER_MIN_DELAY_MS: f64 = 300.0;

/// Random extra thunder delay on top of the minimum.
pub const THUNDER_DELAY_SPREAD_MS: f64 = 1000.0;

/// Flash state, strike history and thunder that is still on its way.
///
/// All times are on the owning overlay's simulated clock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lightning {
    active: bool,
    alpha: f32,
    last_strike_ms: Option<f64>,
    strikes: u64,
    pending_thunder: Vec<f64>,
}

impl Lightning {
    /// Creates an idle lightning state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a flash is showing.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current flash alpha.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Time of the most recent strike.
    #[must_use]
    pub fn last_strike_ms(&self) -> Option<f64> {
        self.last_strike_ms
    }

    /// Total strikes so far.
    #[must_use]
    pub fn strikes(&self) -> u64 {
        self.strikes
    }

    /// Thunder cues scheduled but not yet fired.
    #[must_use]
    pub fn pending_thunder(&self) -> usize {
        self.pending_thunder.len()
    }

    /// Runs one update at `now_ms`. An active flash fades; otherwise, once
    /// the minimum gap has passed, a strike may occur. When `thunder` is set
    /// a strike can schedule a thunder cue. Returns true on a new strike.
    pub fn update(
        &mut self,
        now_ms: f64,
        delta_ms: f32,
        rng: &mut dyn RandomSource,
        thunder: bool,
    ) -> bool {
        let factor = frame_factor(delta_ms);
        if self.active {
            self.alpha -= FLASH_DECAY * factor;
            if self.alpha <= 0.0 {
                self.suppress();
            }
            return false;
        }

        let gap_elapsed = self
            .last_strike_ms
            .map_or(true, |last| now_ms - last > MIN_STRIKE_GAP_MS);
        if !gap_elapsed || !rng.chance(STRIKE_CHANCE * factor) {
            return false;
        }

        self.active = true;
        self.alpha = rng.range(0.8, 1.0);
        self.last_strike_ms = Some(now_ms);
        self.strikes += 1;

        if thunder && rng.chance(THUNDER_CHANCE) {
            let delay = THUNDER_MIN_DELAY_MS + f64::from(rng.next_f32()) * THUNDER_DELAY_SPREAD_MS;
            self.pending_thunder.push(now_ms + delay);
        }
        true
    }

    /// Turns the flash off. Scheduled thunder still fires.
    pub fn suppress(&mut self) {
        self.active = false;
        self.alpha = 0.0;
    }

    /// Removes and counts the thunder cues due at `now_ms`.
    pub fn take_due_thunder(&mut self, now_ms: f64) -> usize {
        let before = self.pending_thunder.len();
        self.pending_thunder.retain(|due| *due > now_ms);
        before - self.pending_thunder.len()
    }
}
