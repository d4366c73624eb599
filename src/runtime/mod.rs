//! Tick driver and the hook contract a game implements
//!
//! `Runtime` owns the game and an `Engine` (every subsystem plus score and
//! time bookkeeping). The host calls `tick(dt, surface)` from whatever
//! scheduler it has - display refresh, a timer, or a test loop. The driver
//! throttles to the configured frame rate and, per processed frame:
//! 1. applies finished resource loads
//! 2. samples input
//! 3. dispatches on the current phase (game logic, then effects, then drawing)
//! 4. advances the input previous-snapshot

pub mod screens;

use glam::Vec2;

use crate::consts::MAX_FRAME_DELTA;
use crate::input::{Button, InputState};
use crate::renderer::{Surface, colors};
use crate::resources::ResourceTable;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{
    Camera, ParticleField, Phase, PhaseMachine, ScreenEffects, StageSequencer, TileGrid,
};
use crate::Color;

/// Hooks a concrete game provides
///
/// `Stage` is the game's stage record type for the engine's sequencer
/// (use `()` for games without stages).
///
/// `draw_game` runs with the surface in screen space; call
/// `Engine::begin_world` to draw through the camera. Particles and trails are
/// drawn by the game so it controls layering; they are updated by the driver.
pub trait Game {
    type Stage;

    /// Register named image/sound loads
    fn load_assets(&mut self, resources: &mut ResourceTable);

    /// Reset all game-owned state; called on every TITLE -> PLAYING
    fn init_game(&mut self, engine: &mut Engine<Self::Stage>);

    fn update_game(&mut self, engine: &mut Engine<Self::Stage>, dt: f32);

    fn draw_game(&self, engine: &Engine<Self::Stage>, surface: &mut dyn Surface);

    /// Called when the player dismisses the stage-clear screen
    fn on_stage_clear_complete(&mut self, engine: &mut Engine<Self::Stage>) {
        engine.advance_stage_counter();
    }

    /// Runs each frame while in CUTSCENE; end it with `Engine::end_cutscene`
    fn update_cutscene(&mut self, engine: &mut Engine<Self::Stage>, dt: f32) {
        let _ = (engine, dt);
    }
}

/// Everything a game can reach from its hooks
#[derive(Debug)]
pub struct Engine<S> {
    pub input: InputState,
    pub resources: ResourceTable,
    pub particles: ParticleField,
    pub effects: ScreenEffects,
    pub camera: Camera,
    pub tiles: TileGrid,
    pub stages: StageSequencer<S>,
    pub settings: Settings,
    phase: PhaseMachine,
    score: u64,
    stage: u32,
    last_bonus: u64,
    elapsed: f32,
    fps: u32,
}

impl<S> Engine<S> {
    pub fn new(settings: Settings, resources: ResourceTable, seed: u64) -> Self {
        let mut resources = resources;
        resources.set_master_volume(settings.volume());
        Self {
            input: InputState::new()
                .with_joystick(settings.joystick_deadzone, settings.joystick_max_radius),
            resources,
            particles: ParticleField::with_capacity(seed, settings.max_particles()),
            effects: ScreenEffects::new(seed.wrapping_add(1)),
            camera: Camera::default().with_seed(seed.wrapping_add(2)),
            tiles: TileGrid::new(0, 0, 16.0, 16.0),
            stages: StageSequencer::new(),
            settings,
            phase: PhaseMachine::new(Phase::Loading),
            score: 0,
            stage: 1,
            last_bonus: 0,
            elapsed: 0.0,
            fps: 0,
        }
    }

    // === Queries ===

    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    pub fn is(&self, phase: Phase) -> bool {
        self.phase.is(phase)
    }

    pub fn phase_machine(&self) -> &PhaseMachine {
        &self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// One-based stage counter advanced by `on_stage_clear_complete`
    pub fn stage(&self) -> u32 {
        self.stage
    }

    /// Bonus awarded by the most recent `stage_clear`
    pub fn last_bonus(&self) -> u64 {
        self.last_bonus
    }

    /// Seconds of gameplay since the run started
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Camera offset plus screen shake
    pub fn world_offset(&self) -> Vec2 {
        self.camera.offset() + self.effects.shake_offset()
    }

    /// Translate the surface so world coordinates draw through the camera
    pub fn begin_world(&self, surface: &mut dyn Surface) {
        surface.set_translation(-self.world_offset());
    }

    // === Actions ===

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn advance_stage_counter(&mut self) {
        self.stage += 1;
    }

    pub fn game_over(&mut self) {
        self.resources.stop_all_loops();
        self.phase.set_phase(Phase::GameOver);
    }

    pub fn game_clear(&mut self) {
        self.resources.stop_all_loops();
        self.phase.set_phase(Phase::GameClear);
    }

    /// Award `bonus` and show the stage-clear screen
    pub fn stage_clear(&mut self, bonus: u64) {
        self.add_score(bonus);
        self.last_bonus = bonus;
        self.phase.set_phase(Phase::StageClear);
    }

    pub fn start_boss_fight(&mut self) {
        self.phase.set_phase(Phase::Boss);
    }

    pub fn start_cutscene(&mut self) {
        self.phase.set_phase(Phase::Cutscene);
    }

    pub fn end_cutscene(&mut self) {
        self.phase.set_phase(Phase::Playing);
    }

    /// Screen shake honoring the motion settings
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        if self.settings.effective_screen_shake() {
            self.effects.shake(intensity, duration);
        }
    }

    /// Camera-space shake honoring the motion settings
    ///
    /// Unlike `shake`, this moves only what is drawn through `begin_world`,
    /// so screen-space overlays stay put.
    pub fn shake_camera(&mut self, intensity: f32, duration: f32) {
        if self.settings.effective_screen_shake() {
            self.camera.shake(intensity, duration);
        }
    }

    /// Full-screen flash honoring the motion settings
    pub fn flash(&mut self, color: Color, duration: f32) {
        if self.settings.effective_flash() {
            self.effects.flash(color, duration);
        }
    }

    /// Switch quality preset; the particle cap follows immediately
    pub fn set_quality(&mut self, preset: QualityPreset) {
        self.settings.quality = preset;
        self.particles.set_max_particles(self.settings.max_particles());
        log::info!(
            "Quality set to {} ({} particles max)",
            preset.as_str(),
            self.settings.max_particles()
        );
    }

    /// Clear per-run bookkeeping before `init_game`
    fn reset_run(&mut self) {
        self.score = 0;
        self.stage = 1;
        self.last_bonus = 0;
        self.elapsed = 0.0;
        self.particles.clear();
        self.effects.reset();
    }

    fn update_effects(&mut self, dt: f32) {
        self.particles.update(dt);
        self.effects.update(dt);
        self.camera.update(dt);
    }
}

/// Fixed-cadence driver
pub struct Runtime<G: Game> {
    game: G,
    engine: Engine<G::Stage>,
    frame_interval: f32,
    accumulator: f32,
    host_time: f64,
    /// Gameplay phase to return to when unpausing
    resume_phase: Phase,
    frames: u64,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
}

impl<G: Game> Runtime<G> {
    /// Build the driver and register the game's assets; starts in LOADING
    pub fn new(mut game: G, resources: ResourceTable, settings: Settings, seed: u64) -> Self {
        let frame_interval = settings.frame_interval();
        let mut engine = Engine::new(settings, resources, seed);
        game.load_assets(&mut engine.resources);
        log::info!(
            "Runtime started: {} assets queued, {:.1} fps target",
            engine.resources.total(),
            1.0 / frame_interval
        );
        Self {
            game,
            engine,
            frame_interval,
            accumulator: 0.0,
            host_time: 0.0,
            resume_phase: Phase::Playing,
            frames: 0,
            frame_times: [0.0; 60],
            frame_index: 0,
        }
    }

    pub fn engine(&self) -> &Engine<G::Stage> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<G::Stage> {
        &mut self.engine
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.engine.input
    }

    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    /// Frames processed so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn frame_interval(&self) -> f32 {
        self.frame_interval
    }

    /// Feed elapsed host time; runs at most one frame
    ///
    /// Returns true if a frame was processed. Time below one interval is
    /// carried forward, as is the sub-interval remainder after a processed
    /// frame. Whole intervals a slow host could not run are dropped.
    pub fn tick(&mut self, dt: f32, surface: &mut dyn Surface) -> bool {
        let dt = dt.clamp(0.0, MAX_FRAME_DELTA);
        self.host_time += dt as f64;
        self.accumulator += dt;
        if self.accumulator < self.frame_interval {
            return false;
        }
        self.accumulator -= self.frame_interval;
        if self.accumulator >= self.frame_interval {
            self.accumulator %= self.frame_interval;
        }
        self.frame(surface);
        true
    }

    fn frame(&mut self, surface: &mut dyn Surface) {
        let step = self.frame_interval;
        self.frames += 1;
        self.engine.phase.advance_clock(step as f64 * 1000.0);
        self.track_fps();

        self.engine.resources.poll();
        self.engine.input.sample();

        match self.engine.phase() {
            Phase::Loading => self.loading(surface),
            Phase::Title => self.title(surface),
            Phase::Playing | Phase::Boss => self.playing(surface, step),
            Phase::Paused => self.paused(surface),
            Phase::StageClear => self.stage_clear(surface),
            Phase::Cutscene => self.cutscene(surface, step),
            Phase::GameOver | Phase::GameClear => self.terminal(surface),
        }

        screens::draw_input_bar(surface, &self.engine.input);
        if self.engine.settings.show_fps {
            screens::draw_fps(surface, self.engine.fps);
        }

        self.engine.input.end_frame();
    }

    fn loading(&mut self, surface: &mut dyn Surface) {
        surface.clear(colors::BACKGROUND);
        screens::draw_loading(surface, self.engine.resources.progress());
        if self.engine.resources.is_complete() {
            self.engine.phase.set_phase(Phase::Title);
        }
    }

    fn title(&mut self, surface: &mut dyn Surface) {
        surface.clear(colors::BACKGROUND);
        screens::draw_title(
            surface,
            &self.engine.settings.title,
            self.engine.phase.time_in_phase_ms(),
        );
        if self.engine.input.is_just_pressed(Button::A) {
            self.engine.reset_run();
            self.game.init_game(&mut self.engine);
            // init_game may open on a cutscene or boss
            if self.engine.is(Phase::Title) {
                self.engine.phase.set_phase(Phase::Playing);
            }
        }
    }

    fn playing(&mut self, surface: &mut dyn Surface, dt: f32) {
        if self.engine.input.is_just_pressed(Button::Pause) {
            self.resume_phase = self.engine.phase();
            self.engine.phase.set_phase(Phase::Paused);
            self.draw_frame(surface);
            screens::draw_pause(surface);
            return;
        }

        self.game.update_game(&mut self.engine, dt);
        self.engine.update_effects(dt);
        if self.engine.phase().is_gameplay() {
            self.engine.elapsed += dt;
        }
        self.draw_frame(surface);
    }

    fn paused(&mut self, surface: &mut dyn Surface) {
        self.draw_frame(surface);
        screens::draw_pause(surface);
        let input = &self.engine.input;
        if input.is_just_pressed(Button::Pause) || input.is_just_pressed(Button::A) {
            self.engine.phase.set_phase(self.resume_phase);
            self.engine.input.reset_edges();
        }
    }

    fn stage_clear(&mut self, surface: &mut dyn Surface) {
        self.draw_frame(surface);
        screens::draw_stage_clear(
            surface,
            self.engine.stage,
            self.engine.score,
            self.engine.last_bonus,
        );
        if self.engine.input.is_just_pressed(Button::A) {
            self.game.on_stage_clear_complete(&mut self.engine);
            // The hook may have moved on (e.g. to GAME_CLEAR)
            if self.engine.is(Phase::StageClear) {
                self.engine.phase.set_phase(Phase::Playing);
            }
        }
    }

    fn cutscene(&mut self, surface: &mut dyn Surface, dt: f32) {
        self.game.update_cutscene(&mut self.engine, dt);
        self.engine.update_effects(dt);
        self.draw_frame(surface);
    }

    fn terminal(&mut self, surface: &mut dyn Surface) {
        let can_restart = self
            .engine
            .phase
            .can_accept_input(self.engine.settings.restart_delay_ms);
        self.draw_frame(surface);
        if self.engine.is(Phase::GameOver) {
            screens::draw_game_over(surface, self.engine.score, can_restart);
        } else {
            screens::draw_game_clear(surface, self.engine.score, can_restart);
        }
        if can_restart && self.engine.input.is_just_pressed(Button::A) {
            self.engine.phase.set_phase(Phase::Title);
            self.engine.input.reset_edges();
        }
    }

    /// Game frame followed by screen-space flash
    fn draw_frame(&self, surface: &mut dyn Surface) {
        surface.clear(colors::BACKGROUND);
        self.game.draw_game(&self.engine, surface);
        surface.reset_transform();
        surface.set_global_alpha(1.0);
        self.engine.effects.draw_flash(surface);
    }

    fn track_fps(&mut self) {
        let now = self.host_time * 1000.0;
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the next slot to be overwritten
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = now - oldest;
            if elapsed > 0.0 {
                self.engine.fps = (59000.0 / elapsed).round() as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_INTERVAL;
    use crate::renderer::CommandBuffer;
    use crate::resources::{LoadMode, MemorySource};

    #[derive(Default)]
    struct Counter {
        inits: u32,
        updates: u32,
        draws: std::cell::Cell<u32>,
        open_with_cutscene: bool,
    }

    impl Game for Counter {
        type Stage = ();

        fn load_assets(&mut self, _resources: &mut ResourceTable) {}

        fn init_game(&mut self, engine: &mut Engine<()>) {
            self.inits += 1;
            self.updates = 0;
            if self.open_with_cutscene {
                engine.start_cutscene();
            }
        }

        fn update_game(&mut self, _engine: &mut Engine<()>, _dt: f32) {
            self.updates += 1;
        }

        fn draw_game(&self, _engine: &Engine<()>, _surface: &mut dyn Surface) {
            self.draws.set(self.draws.get() + 1);
        }
    }

    fn runtime() -> Runtime<Counter> {
        let resources = ResourceTable::with_mode(MemorySource::new(), LoadMode::Inline);
        Runtime::new(Counter::default(), resources, Settings::default(), 1)
    }

    #[test]
    fn test_short_ticks_are_throttled() {
        let mut rt = runtime();
        let mut surface = CommandBuffer::host();
        assert!(!rt.tick(FRAME_INTERVAL * 0.4, &mut surface));
        assert!(surface.commands().is_empty());
        assert!(!rt.tick(FRAME_INTERVAL * 0.4, &mut surface));
        assert!(rt.tick(FRAME_INTERVAL * 0.4, &mut surface));
        assert_eq!(rt.frames(), 1);
        // 0.2 interval carried forward
        assert!(!rt.tick(FRAME_INTERVAL * 0.7, &mut surface));
        assert!(rt.tick(FRAME_INTERVAL * 0.2, &mut surface));
        assert_eq!(rt.frames(), 2);
    }

    #[test]
    fn test_slow_host_does_not_build_backlog() {
        let mut rt = runtime();
        let mut s = CommandBuffer::host();
        for _ in 0..300 {
            rt.tick(1.0 / 30.0, &mut s);
        }
        let slow = rt.frames();
        assert_eq!(slow, 300);

        // 2.5 s of a fast host afterwards still runs at the target rate
        for _ in 0..300 {
            rt.tick(1.0 / 120.0, &mut s);
        }
        let fast = rt.frames() - slow;
        assert!((148..=151).contains(&fast), "fast frames {}", fast);
    }

    #[test]
    fn test_loading_with_no_assets_goes_to_title() {
        let mut rt = runtime();
        let mut surface = CommandBuffer::host();
        assert_eq!(rt.phase(), Phase::Loading);
        rt.tick(FRAME_INTERVAL, &mut surface);
        assert_eq!(rt.phase(), Phase::Title);
    }

    #[test]
    fn test_pause_freezes_updates_but_draws() {
        let mut rt = runtime();
        let mut s = CommandBuffer::host();
        rt.tick(FRAME_INTERVAL, &mut s);
        rt.input_mut().key_down("Space");
        rt.tick(FRAME_INTERVAL, &mut s);
        rt.input_mut().key_up("Space");
        rt.tick(FRAME_INTERVAL, &mut s);
        let updates = rt.game().updates;
        assert_eq!(updates, 1);

        rt.input_mut().key_down("KeyP");
        rt.tick(FRAME_INTERVAL, &mut s);
        assert_eq!(rt.phase(), Phase::Paused);
        rt.input_mut().key_up("KeyP");
        let draws = rt.game().draws.get();
        rt.tick(FRAME_INTERVAL, &mut s);
        assert_eq!(rt.game().updates, updates);
        assert_eq!(rt.game().draws.get(), draws + 1);
        assert!(s.has_text("PAUSED"));

        rt.input_mut().key_down("KeyP");
        rt.tick(FRAME_INTERVAL, &mut s);
        assert_eq!(rt.phase(), Phase::Playing);
        // Held pause does not immediately re-pause
        rt.tick(FRAME_INTERVAL, &mut s);
        assert_eq!(rt.phase(), Phase::Playing);
    }

    #[test]
    fn test_pause_during_boss_resumes_boss() {
        let mut rt = runtime();
        let mut s = CommandBuffer::host();
        rt.tick(FRAME_INTERVAL, &mut s);
        rt.input_mut().key_down("Space");
        rt.tick(FRAME_INTERVAL, &mut s);
        rt.input_mut().key_up("Space");
        rt.engine_mut().start_boss_fight();
        rt.tick(FRAME_INTERVAL, &mut s);
        assert_eq!(rt.phase(), Phase::Boss);

        rt.input_mut().key_down("KeyP");
        rt.tick(FRAME_INTERVAL, &mut s);
        assert_eq!(rt.phase(), Phase::Paused);
        rt.input_mut().key_up("KeyP");
        rt.tick(FRAME_INTERVAL, &mut s);
        rt.input_mut().key_down("KeyP");
        rt.tick(FRAME_INTERVAL, &mut s);
        assert_eq!(rt.phase(), Phase::Boss);
    }

    #[test]
    fn test_init_game_can_open_on_cutscene() {
        let mut rt = runtime();
        rt.game_mut().open_with_cutscene = true;
        let mut s = CommandBuffer::host();
        rt.tick(FRAME_INTERVAL, &mut s);
        rt.input_mut().key_down("Space");
        rt.tick(FRAME_INTERVAL, &mut s);
        assert_eq!(rt.game().inits, 1);
        assert_eq!(rt.phase(), Phase::Cutscene);
    }

    #[test]
    fn test_boss_uses_gameplay_hooks() {
        let mut rt = runtime();
        let mut s = CommandBuffer::host();
        rt.tick(FRAME_INTERVAL, &mut s);
        rt.input_mut().key_down("KeyZ");
        rt.tick(FRAME_INTERVAL, &mut s);
        rt.engine_mut().start_boss_fight();
        let before = rt.game().updates;
        rt.tick(FRAME_INTERVAL, &mut s);
        assert_eq!(rt.phase(), Phase::Boss);
        assert_eq!(rt.game().updates, before + 1);
    }

    #[test]
    fn test_reduced_motion_suppresses_shake() {
        let mut rt = runtime();
        rt.engine_mut().settings.reduced_motion = true;
        rt.engine_mut().shake(10.0, 1.0);
        rt.engine_mut().flash(Color::WHITE, 1.0);
        assert!(!rt.engine().effects.is_shaking());
        assert!(!rt.engine().effects.is_flashing());

        rt.engine_mut().shake_camera(10.0, 1.0);
        assert!(!rt.engine().camera.is_shaking());
    }

    #[test]
    fn test_camera_shake_moves_world_offset() {
        let mut rt = runtime();
        let mut s = CommandBuffer::host();
        rt.tick(FRAME_INTERVAL, &mut s);
        rt.input_mut().key_down("Space");
        rt.tick(FRAME_INTERVAL, &mut s);

        rt.engine_mut().shake_camera(12.0, 1.0);
        assert!(rt.engine().camera.is_shaking());
        let mut moved = false;
        for _ in 0..10 {
            rt.tick(FRAME_INTERVAL, &mut s);
            let offset = rt.engine().world_offset();
            assert!(offset.x.abs() <= 12.0 && offset.y.abs() <= 12.0);
            moved |= offset != Vec2::ZERO;
        }
        assert!(moved);
        assert!(!rt.engine().effects.is_shaking());
    }

    #[test]
    fn test_lowering_quality_trims_live_particles() {
        let mut rt = runtime();
        let burst = crate::sim::EmitConfig {
            count: 400,
            ..Default::default()
        };
        rt.engine_mut().particles.emit(10.0, 10.0, &burst);
        assert_eq!(rt.engine().particles.len(), 400);

        rt.engine_mut().set_quality(QualityPreset::Low);
        assert_eq!(rt.engine().particles.len(), 100);
        assert_eq!(rt.engine_mut().particles.emit(10.0, 10.0, &burst), 0);

        rt.engine_mut().set_quality(QualityPreset::High);
        assert_eq!(rt.engine_mut().particles.emit(10.0, 10.0, &burst), 400);
    }

    #[test]
    fn test_fps_measured_over_window() {
        let mut rt = runtime();
        rt.engine_mut().settings.show_fps = true;
        let mut s = CommandBuffer::host();
        for _ in 0..120 {
            s.begin_frame();
            rt.tick(FRAME_INTERVAL, &mut s);
        }
        let fps = rt.engine().fps();
        assert!((59..=61).contains(&fps), "fps {}", fps);
        assert!(s.has_text("FPS"));
    }
}
