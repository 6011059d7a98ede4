//! # Arena Stage
//!
//! The two visual-effect engines behind a fighting-game stage:
//!
//! - [`BackdropCompositor`]: a catalog of layered parallax scenes with
//!   crossfade transitions, continuous scrolling, time-of-day tinting and
//!   procedurally synthesized placeholder art
//! - [`WeatherOverlay`]: a bounded particle simulation (rain, snow, storm,
//!   fog) with crossfades between weather kinds, a fog veil and a lightning
//!   sub-system that can cue thunder through an [`AudioTrigger`]
//!
//! ## Frame loop
//!
//! Both engines follow the same pattern: a driver calls `update(delta_ms)`
//! and then `draw(surface)` once per rendered frame. Draw the background
//! first and the weather on top. Time is measured only through the deltas
//! passed to `update`, so a simulation is reproducible given a seeded
//! [`RandomSource`](arena_common::RandomSource).
//!
//! Speeds are expressed per reference frame of 16.67 ms (60 fps) and scaled
//! by `delta_ms / 16.67`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod audio;
pub mod background;
pub mod crossfade;
pub mod cycle;
pub mod lightning;
pub mod overlay;
pub mod particles;
pub mod placeholder;
pub mod scene;
pub mod weather;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::audio::*;
    pub use crate::background::*;
    pub use crate::crossfade::*;
    pub use crate::cycle::*;
    pub use crate::lightning::*;
    pub use crate::overlay::*;
    pub use crate::particles::*;
    pub use crate::placeholder::*;
    pub use crate::scene::*;
    pub use crate::weather::*;
}

pub use prelude::*;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use arena_common::{AssetLoadError, RandomSource};
    use arena_kernel::{ImageLoader, Raster};
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use parking_lot::Mutex;

    use crate::audio::AudioTrigger;

    /// Always returns the same value.
    pub struct FixedRandom(pub f32);

    impl RandomSource for FixedRandom {
        fn next_f32(&mut self) -> f32 {
            self.0
        }
    }

    /// Plays back a script, then repeats its last value.
    pub struct ScriptedRandom {
        script: VecDeque<f32>,
        last: f32,
    }

    impl ScriptedRandom {
        pub fn new(values: &[f32]) -> Self {
            Self {
                script: values.iter().copied().collect(),
                last: 0.5,
            }
        }
    }

    impl RandomSource for ScriptedRandom {
        fn next_f32(&mut self) -> f32 {
            if let Some(v) = self.script.pop_front() {
                self.last = v;
            }
            self.last
        }
    }

    /// Every fetch fails.
    pub struct FailingLoader;

    impl ImageLoader for FailingLoader {
        fn load(&self, uri: &str) -> BoxFuture<'static, Result<Raster, AssetLoadError>> {
            futures::future::ready(Err(AssetLoadError::Missing(uri.to_string()))).boxed()
        }
    }

    /// Every fetch succeeds with a tiny solid image; counts requests.
    #[derive(Default)]
    pub struct SolidLoader {
        pub requests: Mutex<Vec<String>>,
    }

    impl ImageLoader for SolidLoader {
        fn load(&self, uri: &str) -> BoxFuture<'static, Result<Raster, AssetLoadError>> {
            self.requests.lock().push(uri.to_string());
            let raster = Raster::solid(2, 2, arena_common::Color::rgb(9, 9, 9));
            futures::future::ready(Ok(raster)).boxed()
        }
    }

    /// Records cues.
    pub struct RecordingAudio {
        pub enabled: bool,
        pub played: Mutex<Vec<String>>,
    }

    impl RecordingAudio {
        pub fn new(enabled: bool) -> Arc<Self> {
            Arc::new(Self {
                enabled,
                played: Mutex::new(Vec::new()),
            })
        }
    }

    impl AudioTrigger for RecordingAudio {
        fn sound_enabled(&self) -> bool {
            self.enabled
        }

        fn play_sound(&self, name: &str) {
            self.played.lock().push(name.to_string());
        }
    }
}
