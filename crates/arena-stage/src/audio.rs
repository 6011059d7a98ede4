//! Sound cue capability.
//!
//! The weather overlay does not own any audio playback. It is handed an
//! [`AudioTrigger`] at construction and asks it to play named cues.

/// Name of the cue played after a lightning flash.
pub const THUNDER: &str = "thunder";

/// Something that can play named sound cues.
pub trait AudioTrigger: Send + Sync {
    /// Whether sound is currently enabled. Checked when a cue fires, not
    /// when it is scheduled.
    fn sound_enabled(&self) -> bool;

    /// Plays the cue called `name`.
    fn play_sound(&self, name: &str);
}
