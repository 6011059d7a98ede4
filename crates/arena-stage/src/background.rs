//! The layered parallax background.
//!
//! [`BackdropCompositor`] keeps a binding for every layer of every scene in
//! the catalog, fetches imagery through an [`ImageLoader`], and falls back
//! to synthesized placeholders for anything that cannot be fetched. Each
//! frame it scrolls the layers, crossfades between scenes and tints the
//! result for the time of day.

use std::sync::Arc;

use arena_common::{RandomSource, StageResult};
use arena_kernel::{ImageLoader, Paint, Raster, Surface};
use tracing::{debug, error, info, warn};

use crate::crossfade::{clamp_delta, frame_factor, Crossfade};
use crate::cycle::{pick_other, AutoCycle};
use crate::placeholder::synthesize;
use crate::scene::{SceneKind, TimeOfDay};

/// Crossfade progress per reference frame.
pub const SCENE_TRANSITION_SPEED: f32 = 0.02;

/// Scroll phase advance per reference frame.
pub const ANIMATION_SPEED: f32 = 0.2;

/// The scroll phase wraps back into `[0, ANIMATION_WRAP)` once it passes
/// this value.
pub const ANIMATION_WRAP: f32 = 1000.0;

/// Screen width player positions are expressed against.
pub const REFERENCE_WIDTH: f32 = 800.0;

/// Parallax offset span between players at the far left and far right.
pub const PARALLAX_RANGE: f32 = 100.0;

/// Default auto-cycle period.
pub const DEFAULT_SCENE_CYCLE_MS: f64 = 60_000.0;

/// Horizontal positions of the two fighters, used to centre the parallax.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPositions {
    /// First player's x.
    pub player1_x: f32,
    /// Second player's x.
    pub player2_x: f32,
}

impl PlayerPositions {
    /// Creates a pair of positions.
    #[must_use]
    pub const fn new(player1_x: f32, player2_x: f32) -> Self {
        Self {
            player1_x,
            player2_x,
        }
    }

    /// Point halfway between the players.
    #[must_use]
    pub fn midpoint(&self) -> f32 {
        (self.player1_x + self.player2_x) / 2.0
    }

    /// Parallax offset for this pair: 0 when centred, up to half of
    /// [`PARALLAX_RANGE`] either way at the screen edges.
    #[must_use]
    pub fn parallax_offset(&self) -> f32 {
        (self.midpoint() / REFERENCE_WIDTH - 0.5) * PARALLAX_RANGE
    }
}

/// What a layer draws.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LayerBinding {
    /// Not fetched yet; the placeholder is drawn meanwhile.
    #[default]
    Unbound,
    /// Fetched image.
    Image(Raster),
    /// Fetch failed; the placeholder is drawn for the rest of the session.
    Placeholder,
}

impl LayerBinding {
    /// Whether a fetch has settled for this layer.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Unbound)
    }
}

/// Multi-layer parallax scene renderer.
pub struct BackdropCompositor {
    width: u32,
    height: u32,
    loader: Arc<dyn ImageLoader>,
    rng: Box<dyn RandomSource>,
    /// Indexed by [`SceneKind::index`], then layer.
    placeholders: Vec<Vec<Raster>>,
    /// Indexed like `placeholders`.
    bindings: Vec<Vec<LayerBinding>>,
    current: SceneKind,
    transition: Option<Crossfade<SceneKind>>,
    animation_offset: f32,
    parallax_offset: f32,
    time_of_day: TimeOfDay,
    auto_cycle: AutoCycle,
    clock_ms: f64,
    load_requests: Vec<SceneKind>,
}

impl BackdropCompositor {
    /// Creates a compositor for a `width` x `height` screen showing the
    /// default scene. Call [`initialize`](Self::initialize) before drawing.
    #[must_use]
    pub fn new(
        width: u32,
        height: u32,
        loader: Arc<dyn ImageLoader>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let bindings = SceneKind::ALL
            .iter()
            .map(|kind| vec![LayerBinding::Unbound; kind.profile().layers.len()])
            .collect();
        Self {
            width,
            height,
            loader,
            rng,
            placeholders: Vec::new(),
            bindings,
            current: SceneKind::default(),
            transition: None,
            animation_offset: 0.0,
            parallax_offset: 0.0,
            time_of_day: TimeOfDay::Day,
            auto_cycle: AutoCycle::disabled(DEFAULT_SCENE_CYCLE_MS),
            clock_ms: 0.0,
            load_requests: Vec::new(),
        }
    }

    /// Synthesizes every placeholder, then loads the current scene.
    pub async fn initialize(&mut self) {
        self.generate_placeholders();
        self.load_kind(self.current).await;
        info!("Background compositor initialized");
    }

    fn generate_placeholders(&mut self) {
        let mut placeholders = Vec::with_capacity(SceneKind::ALL.len());
        for kind in SceneKind::ALL {
            let profile = kind.profile();
            let layers = (0..profile.layers.len())
                .map(|i| synthesize(profile, i, self.width, self.height, self.rng.as_mut()))
                .collect();
            placeholders.push(layers);
        }
        self.placeholders = placeholders;
        debug!(
            "Synthesized background placeholders at {}x{}",
            self.width, self.height
        );
    }

    fn parse_scene(name: &str) -> StageResult<SceneKind> {
        name.parse::<SceneKind>().map_err(|e| {
            error!("Background \"{}\" not found", name);
            e
        })
    }

    /// Fetches every unsettled layer of scene `name` concurrently and waits
    /// for all of them. Failed fetches bind the layer's placeholder, so this
    /// only fails for unknown names.
    pub async fn load_scene(&mut self, name: &str) -> StageResult<()> {
        let kind = Self::parse_scene(name)?;
        self.load_kind(kind).await;
        Ok(())
    }

    /// Typed form of [`load_scene`](Self::load_scene).
    pub async fn load_kind(&mut self, kind: SceneKind) {
        let layers = kind.profile().layers;
        let pending: Vec<usize> = self.bindings[kind.index()]
            .iter()
            .enumerate()
            .filter(|(_, binding)| !binding.is_settled())
            .map(|(i, _)| i)
            .collect();

        let fetches = pending
            .iter()
            .map(|&i| self.loader.load(layers[i].source))
            .collect::<Vec<_>>();
        let results = futures::future::join_all(fetches).await;

        for (i, result) in pending.into_iter().zip(results) {
            self.bindings[kind.index()][i] = match result {
                Ok(image) => LayerBinding::Image(image),
                Err(e) => {
                    warn!("Failed to load background image {}: {}", layers[i].source, e);
                    LayerBinding::Placeholder
                },
            };
        }
        info!("Background \"{}\" loaded", kind);
    }

    /// Switches to scene `name`, loading it first. Unknown names fail and
    /// change nothing.
    pub async fn set_scene(&mut self, name: &str, use_transition: bool) -> StageResult<()> {
        let kind = Self::parse_scene(name)?;
        self.switch_to(kind, use_transition).await;
        Ok(())
    }

    /// Typed form of [`set_scene`](Self::set_scene). Asking for the current
    /// scene while no crossfade runs does nothing. An immediate switch
    /// cancels any running crossfade.
    pub async fn switch_to(&mut self, kind: SceneKind, use_transition: bool) {
        if kind == self.current && self.transition.is_none() {
            return;
        }
        self.load_kind(kind).await;
        if use_transition {
            self.begin_transition(kind);
        } else {
            self.transition = None;
            self.current = kind;
            info!("Background switched to {}", kind);
        }
    }

    /// Starts crossfading towards `kind` without waiting for its imagery.
    pub fn begin_transition(&mut self, kind: SceneKind) {
        self.transition = Some(Crossfade::new(kind));
        info!("Background transition {} -> {}", self.current, kind);
    }

    /// Sets the time-of-day tint.
    pub fn set_time_of_day(&mut self, time: TimeOfDay) {
        self.time_of_day = time;
    }

    /// Sets the tint by name. Unknown names are ignored.
    pub fn set_time_of_day_by_name(&mut self, name: &str) {
        match name.parse::<TimeOfDay>() {
            Ok(time) => self.set_time_of_day(time),
            Err(_) => debug!("Ignoring unknown time of day {:?}", name),
        }
    }

    /// Turns on periodic random scene changes.
    pub fn enable_auto_cycle(&mut self, period_ms: f64) {
        self.auto_cycle.enable(period_ms, self.clock_ms);
        info!(
            "Auto background cycling enabled ({}s per background)",
            period_ms / 1000.0
        );
    }

    /// Turns off periodic scene changes.
    pub fn disable_auto_cycle(&mut self) {
        self.auto_cycle.disable();
        info!("Auto background cycling disabled");
    }

    /// Advances the auto-cycle, the scroll phase and any crossfade.
    ///
    /// An auto-cycle switch starts its crossfade right away and queues the
    /// new scene for [`take_load_requests`](Self::take_load_requests).
    pub fn update(&mut self, delta_ms: f32) {
        let delta_ms = clamp_delta(delta_ms);
        self.clock_ms += f64::from(delta_ms);

        if self.transition.is_none() && self.auto_cycle.is_due(self.clock_ms) {
            if let Some(next) = pick_other(&SceneKind::ALL, self.current, self.rng.as_mut()) {
                info!("Auto-cycling background to {}", next);
                self.begin_transition(next);
                if self.bindings[next.index()].iter().any(|b| !b.is_settled()) {
                    self.load_requests.push(next);
                }
            }
            self.auto_cycle.mark(self.clock_ms);
        }

        self.animation_offset += ANIMATION_SPEED * frame_factor(delta_ms);
        if self.animation_offset > ANIMATION_WRAP {
            self.animation_offset = self.animation_offset.rem_euclid(ANIMATION_WRAP);
        }

        if let Some(fade) = self.transition.as_mut() {
            if let Some(target) = fade.advance(SCENE_TRANSITION_SPEED, delta_ms) {
                self.transition = None;
                self.current = target;
                debug!("Background transition to {} complete", target);
            }
        }
    }

    /// Scenes whose imagery `update` wants fetched. The caller awaits
    /// [`load_kind`](Self::load_kind) for each.
    pub fn take_load_requests(&mut self) -> Vec<SceneKind> {
        std::mem::take(&mut self.load_requests)
    }

    /// Draws the current scene, the crossfade target if any, and the
    /// time-of-day tint. Global alpha is 1 afterwards.
    pub fn draw(&mut self, surface: &mut dyn Surface, players: Option<PlayerPositions>) {
        if let Some(players) = players {
            self.parallax_offset = players.parallax_offset();
        }

        match self.transition {
            Some(fade) => {
                self.draw_layers(surface, self.current, 1.0 - fade.progress());
                self.draw_layers(surface, fade.target(), fade.progress());
            },
            None => self.draw_layers(surface, self.current, 1.0),
        }
        surface.set_global_alpha(1.0);

        if let Some(tint) = self.time_of_day.overlay() {
            surface.fill_screen(&Paint::Solid(tint));
        }
    }

    fn draw_layers(&self, surface: &mut dyn Surface, kind: SceneKind, alpha: f32) {
        let (width, height) = (surface.width(), surface.height());
        surface.set_global_alpha(alpha);
        for (i, layer) in kind.profile().layers.iter().enumerate() {
            let Some(image) = self.drawable(kind, i) else {
                continue;
            };
            let x = self.parallax_offset * layer.parallax;
            let scroll = if layer.parallax > 0.0 {
                (self.animation_offset * layer.parallax) % width
            } else {
                0.0
            };
            surface.draw_image(image, x - scroll, 0.0, width, height);
            if scroll > 0.0 {
                surface.draw_image(image, x - scroll + width, 0.0, width, height);
            }
        }
    }

    /// Image drawn for layer `index` of `kind`: the fetched image, else the
    /// placeholder once placeholders exist.
    #[must_use]
    pub fn drawable(&self, kind: SceneKind, index: usize) -> Option<&Raster> {
        match self.bindings.get(kind.index())?.get(index)? {
            LayerBinding::Image(image) => Some(image),
            LayerBinding::Unbound | LayerBinding::Placeholder => {
                self.placeholders.get(kind.index())?.get(index)
            },
        }
    }

    /// Where fighters stand: screen height minus the current floor height.
    #[must_use]
    pub fn floor_level(&self) -> f32 {
        self.height as f32 - self.current.profile().floor_height
    }

    /// Adapts to a new screen size, regenerating placeholders so layers
    /// that fell back keep matching the screen.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        if !self.placeholders.is_empty() {
            self.generate_placeholders();
        }
        info!("Background resized to {}x{}", width, height);
    }

    /// Scene on screen, or being faded out of.
    #[must_use]
    pub fn current_scene(&self) -> SceneKind {
        self.current
    }

    /// Whether a crossfade is running.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Crossfade progress, 0 when idle.
    #[must_use]
    pub fn transition_progress(&self) -> f32 {
        self.transition.map_or(0.0, |fade| fade.progress())
    }

    /// Scene being faded to.
    #[must_use]
    pub fn transition_target(&self) -> Option<SceneKind> {
        self.transition.map(|fade| fade.target())
    }

    /// Scroll phase in `[0, ANIMATION_WRAP]`.
    #[must_use]
    pub fn animation_offset(&self) -> f32 {
        self.animation_offset
    }

    /// Last parallax offset derived from player positions.
    #[must_use]
    pub fn parallax_offset(&self) -> f32 {
        self.parallax_offset
    }

    /// Current tint.
    #[must_use]
    pub fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    /// Binding of layer `index` of `kind`.
    #[must_use]
    pub fn layer_binding(&self, kind: SceneKind, index: usize) -> Option<&LayerBinding> {
        self.bindings.get(kind.index())?.get(index)
    }

    /// Synthesized placeholder for layer `index` of `kind`.
    #[must_use]
    pub fn placeholder(&self, kind: SceneKind, index: usize) -> Option<&Raster> {
        self.placeholders.get(kind.index())?.get(index)
    }

    /// Auto-cycle settings.
    #[must_use]
    pub fn auto_cycle(&self) -> &AutoCycle {
        &self.auto_cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossfade::REFERENCE_FRAME_MS;
    use crate::test_support::{FailingLoader, FixedRandom, SolidLoader};
    use arena_common::{Color, SeededRandom};
    use arena_kernel::{DrawCall, RecordingSurface};
    use pollster::block_on;
    use proptest::prelude::*;

    fn compositor(loader: Arc<dyn ImageLoader>, width: u32, height: u32) -> BackdropCompositor {
        let mut bg = BackdropCompositor::new(
            width,
            height,
            loader,
            Box::new(SeededRandom::with_seed(42)),
        );
        block_on(bg.initialize());
        bg
    }

    fn solid() -> (Arc<SolidLoader>, BackdropCompositor) {
        let loader = Arc::new(SolidLoader::default());
        let bg = compositor(loader.clone(), 80, 60);
        (loader, bg)
    }

    #[test]
    fn test_known_and_unknown_scenes() {
        let (_, mut bg) = solid();
        for kind in SceneKind::ALL {
            block_on(bg.set_scene(kind.as_str(), false)).expect("known scene");
            assert_eq!(bg.current_scene(), kind);
        }

        let err = block_on(bg.set_scene("volcano", true)).expect_err("unknown scene");
        assert!(err.is_not_found());
        assert_eq!(bg.current_scene(), SceneKind::Forest);
        assert!(!bg.is_transitioning());
        assert!(block_on(bg.load_scene("volcano")).is_err());
    }

    #[test]
    fn test_failed_fetches_fall_back_to_placeholders() {
        let mut bg = compositor(Arc::new(FailingLoader), 40, 30);
        for kind in SceneKind::ALL {
            block_on(bg.load_scene(kind.as_str())).expect("known scene");
            for i in 0..kind.profile().layers.len() {
                assert_eq!(bg.layer_binding(kind, i), Some(&LayerBinding::Placeholder));
                let drawn = bg.drawable(kind, i).expect("drawable");
                assert!(drawn.ptr_eq(bg.placeholder(kind, i).expect("placeholder")));
            }
        }
    }

    #[test]
    fn test_layers_are_fetched_once() {
        let (loader, mut bg) = solid();
        assert_eq!(loader.requests.lock().len(), 2);
        assert!(matches!(
            bg.layer_binding(SceneKind::Dojo, 0),
            Some(LayerBinding::Image(_))
        ));

        block_on(bg.load_scene("mountain")).expect("known scene");
        block_on(bg.load_scene("mountain")).expect("known scene");
        let requests = loader.requests.lock().clone();
        assert_eq!(requests.len(), 6);
        assert!(requests.contains(&"/assets/backgrounds/mountain-far.png".to_string()));
    }

    #[test]
    fn test_same_scene_is_a_no_op() {
        let (loader, mut bg) = solid();
        block_on(bg.set_scene("dojo", true)).expect("known scene");
        assert!(!bg.is_transitioning());
        assert_eq!(bg.current_scene(), SceneKind::Dojo);
        assert_eq!(loader.requests.lock().len(), 2);
    }

    #[test]
    fn test_transition_commits() {
        let (_, mut bg) = solid();
        block_on(bg.set_scene("city", true)).expect("known scene");
        assert_eq!(bg.transition_target(), Some(SceneKind::City));
        assert_eq!(bg.current_scene(), SceneKind::Dojo);

        let mut frames = 0;
        while bg.is_transitioning() {
            bg.update(REFERENCE_FRAME_MS);
            frames += 1;
            assert!(frames < 100, "transition never committed");
        }
        assert_eq!(bg.current_scene(), SceneKind::City);
        assert_eq!(bg.transition_progress(), 0.0);
        assert_eq!(bg.transition_target(), None);
    }

    #[test]
    fn test_immediate_switch_cancels_crossfade() {
        let (_, mut bg) = solid();
        block_on(bg.set_scene("city", true)).expect("known scene");
        block_on(bg.set_scene("beach", false)).expect("known scene");
        assert!(!bg.is_transitioning());
        assert_eq!(bg.current_scene(), SceneKind::Beach);
    }

    #[test]
    fn test_floor_level() {
        let mut bg = BackdropCompositor::new(
            800,
            600,
            Arc::new(FailingLoader),
            Box::new(FixedRandom(0.5)),
        );
        block_on(bg.set_scene("mountain", false)).expect("known scene");
        assert_eq!(bg.floor_level(), 550.0);
    }

    #[test]
    fn test_crossfade_alphas_and_scroll_wrap() {
        let (_, mut bg) = solid();
        block_on(bg.set_scene("mountain", true)).expect("known scene");
        bg.update(REFERENCE_FRAME_MS * 10.0);
        let progress = bg.transition_progress();
        assert!((progress - 0.2).abs() < 1e-4);

        let mut surface = RecordingSurface::new(800.0, 600.0);
        bg.draw(&mut surface, None);
        let blits = surface.image_blits();

        // Dojo: fixed backdrop plus a scrolling floor drawn twice.
        // Mountain: fixed sky plus three scrolling layers drawn twice each.
        assert_eq!(blits.len(), 3 + 7);
        for (_, alpha) in &blits[..3] {
            assert!((alpha - (1.0 - progress)).abs() < 1e-6);
        }
        for (_, alpha) in &blits[3..] {
            assert!((alpha - progress).abs() < 1e-6);
        }

        let scroll = bg.animation_offset() * 0.1;
        assert_eq!(blits[0].0, 0.0);
        assert!((blits[1].0 + scroll).abs() < 1e-4);
        assert!((blits[2].0 - (800.0 - scroll)).abs() < 1e-3);
        assert_eq!(surface.global_alpha(), 1.0);
    }

    #[test]
    fn test_no_second_blit_without_scroll() {
        let (_, mut bg) = solid();
        let mut surface = RecordingSurface::new(800.0, 600.0);
        bg.draw(&mut surface, Some(PlayerPositions::new(600.0, 600.0)));
        // Nothing has scrolled yet, so every layer is drawn once.
        let blits = surface.image_blits();
        assert_eq!(blits.len(), 2);
        assert_eq!(bg.parallax_offset(), 25.0);
        assert!((blits[1].0 - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_parallax_centres_on_players() {
        assert_eq!(PlayerPositions::new(300.0, 500.0).parallax_offset(), 0.0);
        assert_eq!(PlayerPositions::new(0.0, 0.0).parallax_offset(), -50.0);
        assert_eq!(PlayerPositions::new(800.0, 800.0).parallax_offset(), 50.0);
    }

    #[test]
    fn test_time_of_day_tint_is_drawn_last() {
        let (_, mut bg) = solid();
        bg.set_time_of_day_by_name("night");
        bg.set_time_of_day_by_name("teatime");
        assert_eq!(bg.time_of_day(), TimeOfDay::Night);

        let mut surface = RecordingSurface::new(800.0, 600.0);
        bg.draw(&mut surface, None);
        let last = surface.calls().last().expect("calls");
        assert!(matches!(
            last,
            DrawCall::FillRect { paint, alpha, .. }
                if paint.as_solid() == Some(Color::rgba(0, 20, 50, 0.5)) && *alpha == 1.0
        ));
    }

    #[test]
    fn test_auto_cycle_queues_load() {
        let (_, mut bg) = solid();
        bg.enable_auto_cycle(1000.0);
        bg.update(1000.0);
        assert!(!bg.is_transitioning());
        bg.update(1.0);
        let target = bg.transition_target().expect("cycle started");
        assert_ne!(target, SceneKind::Dojo);
        assert_eq!(bg.take_load_requests(), vec![target]);
        assert!(bg.take_load_requests().is_empty());

        block_on(bg.load_kind(target));
        assert!(bg.layer_binding(target, 0).is_some_and(LayerBinding::is_settled));
    }

    #[test]
    fn test_resize_regenerates_placeholders() {
        let mut bg = compositor(Arc::new(FailingLoader), 40, 30);
        bg.resize(64, 48);
        let placeholder = bg.drawable(SceneKind::Dojo, 0).expect("drawable");
        assert_eq!((placeholder.width(), placeholder.height()), (64, 48));
        assert_eq!(bg.floor_level(), -2.0);
    }

    #[test]
    fn test_non_finite_deltas_leave_scroll_alone() {
        let (_, mut bg) = solid();
        bg.update(REFERENCE_FRAME_MS);
        let offset = bg.animation_offset();
        for delta in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            bg.update(delta);
            assert_eq!(bg.animation_offset(), offset);
        }
    }

    proptest! {
        #[test]
        fn prop_animation_offset_stays_wrapped(deltas in prop::collection::vec(0.0f32..100_000.0, 1..60)) {
            let mut bg = BackdropCompositor::new(
                8,
                6,
                Arc::new(FailingLoader),
                Box::new(FixedRandom(0.5)),
            );
            for delta in deltas {
                bg.update(delta);
                prop_assert!(bg.animation_offset() <= ANIMATION_WRAP);
                prop_assert!(bg.animation_offset() >= 0.0);
            }
        }
    }
}
