//! Logging sound cues.
//!
//! The headless driver has no audio device; cues are logged and counted.

use std::collections::HashMap;

use arena_stage::AudioTrigger;
use parking_lot::Mutex;
use tracing::info;

/// [`AudioTrigger`] that logs and counts cues.
#[derive(Debug, Default)]
pub struct LogAudio {
    enabled: bool,
    played: Mutex<HashMap<String, u64>>,
}

impl LogAudio {
    /// Creates a trigger; `enabled` is what [`AudioTrigger::sound_enabled`]
    /// reports.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            played: Mutex::new(HashMap::new()),
        }
    }

    /// How many times `name` has played.
    #[must_use]
    pub fn count(&self, name: &str) -> u64 {
        self.played.lock().get(name).copied().unwrap_or(0)
    }
}

impl AudioTrigger for LogAudio {
    fn sound_enabled(&self) -> bool {
        self.enabled
    }

    fn play_sound(&self, name: &str) {
        info!("Playing sound: {}", name);
        *self.played.lock().entry(name.to_string()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_stage::THUNDER;

    #[test]
    fn test_counts_cues() {
        let audio = LogAudio::new(true);
        assert!(audio.sound_enabled());
        audio.play_sound(THUNDER);
        audio.play_sound(THUNDER);
        audio.play_sound("gong");
        assert_eq!(audio.count(THUNDER), 2);
        assert_eq!(audio.count("rain"), 0);
    }

    #[test]
    fn test_muted_flag() {
        assert!(!LogAudio::new(false).sound_enabled());
    }
}
