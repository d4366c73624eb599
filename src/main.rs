//! Arcade Runtime headless demo
//!
//! Runs a tiny dodge game through the full lifecycle with scripted input and
//! prints what happened. Pass a settings JSON path as the first argument.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use arcade_runtime::consts::*;
    use arcade_runtime::renderer::{Surface, TextAlign, colors};
    use arcade_runtime::resources::{LoadMode, MemorySource};
    use arcade_runtime::sim::{EmitConfig, TileGrid, rect_overlap};
    use arcade_runtime::{Color, Engine, Game, Rect, ResourceTable};
    use glam::Vec2;

    const PLAYER_SPEED: f32 = 4.0;
    const ROCK_SPEED: f32 = 3.0;
    const ROCK_SIZE: f32 = 24.0;
    const FLOOR_ROW: usize = 16;
    const POINTS_PER_STAGE: u64 = 300;

    /// Per-stage tuning
    #[derive(Debug, Clone, Copy)]
    pub struct Wave {
        pub spawn_every: u32,
    }

    #[derive(Debug, Default)]
    pub struct Dodge {
        player: Rect,
        rocks: Vec<Rect>,
        frame: u32,
        stage_points: u64,
    }

    impl Dodge {
        fn spawn_every(engine: &Engine<Wave>) -> u32 {
            engine
                .stages
                .current_stage()
                .map(|w| w.spawn_every)
                .unwrap_or(30)
        }
    }

    impl Game for Dodge {
        type Stage = Wave;

        fn load_assets(&mut self, resources: &mut ResourceTable) {
            resources.load_sound("hit", "sfx/hit.raw");
            resources.load_sound("music", "music/loop.raw");
        }

        fn init_game(&mut self, engine: &mut Engine<Wave>) {
            self.player = Rect::new(SCREEN_WIDTH / 2.0 - 12.0, 480.0, 24.0, 24.0);
            self.rocks.clear();
            self.frame = 0;
            self.stage_points = 0;
            engine.stages.load_stages(vec![
                Wave { spawn_every: 40 },
                Wave { spawn_every: 25 },
            ]);

            let mut rows = vec![vec![0; 12]; FLOOR_ROW + 2];
            for cell in rows[FLOOR_ROW + 1].iter_mut() {
                *cell = 1;
            }
            match TileGrid::from_rows(&rows, 30.0, 30.0) {
                Ok(grid) => engine.tiles = grid,
                Err(e) => log::warn!("Floor map rejected: {}", e),
            }
            engine.resources.play_sound_loop("music");
        }

        fn update_game(&mut self, engine: &mut Engine<Wave>, dt: f32) {
            self.frame += 1;
            let step = dt * BASELINE_FPS;

            self.player.x += engine.input.horizontal() as f32 * PLAYER_SPEED * step;
            self.player.x = self.player.x.clamp(0.0, SCREEN_WIDTH - self.player.w);

            if self.frame % Self::spawn_every(engine) == 0 {
                let lane = (self.frame / 7 % 12) as f32;
                self.rocks.push(Rect::new(lane * 30.0 + 3.0, -ROCK_SIZE, ROCK_SIZE, ROCK_SIZE));
            }

            let solid = [1];
            let mut landed = Vec::new();
            for (i, rock) in self.rocks.iter_mut().enumerate() {
                rock.y += ROCK_SPEED * step;
                if engine.tiles.check_collision(rock, &solid) {
                    landed.push(i);
                }
            }
            for i in landed.into_iter().rev() {
                let rock = self.rocks.swap_remove(i);
                let c = rock.center();
                engine.particles.emit(c.x, c.y, &EmitConfig {
                    count: 6,
                    color: Color::from_hex(0x888888),
                    ..EmitConfig::default()
                });
                engine.add_score(10);
                self.stage_points += 10;
            }

            if self.rocks.iter().any(|r| rect_overlap(r, &self.player)) {
                engine.resources.play_sound("hit");
                engine.shake(8.0, 0.3);
                engine.flash(Color::RED, 0.2);
                engine.game_over();
                return;
            }

            if self.stage_points >= POINTS_PER_STAGE {
                self.stage_points = 0;
                self.rocks.clear();
                engine.stage_clear(100);
            }
        }

        fn draw_game(&self, engine: &Engine<Wave>, surface: &mut dyn Surface) {
            // Tile rects come back in screen space
            let view = engine.camera.view_rect();
            engine.tiles.draw(surface, &view, |s, _, rect| {
                s.fill_rect(rect, colors::PROGRESS_TRACK);
            });
            engine.begin_world(surface);
            for rock in &self.rocks {
                surface.fill_rect(*rock, Color::from_hex(0xaa6633));
            }
            surface.fill_rect(self.player, colors::ACCENT);
            engine.particles.draw(surface);
            surface.reset_transform();
            surface.draw_text(
                &format!("{}", engine.score()),
                Vec2::new(8.0, 8.0),
                14.0,
                colors::TEXT,
                TextAlign::Left,
            );
        }

        fn on_stage_clear_complete(&mut self, engine: &mut Engine<Wave>) {
            if engine.stages.next_stage() {
                engine.advance_stage_counter();
            } else {
                engine.game_clear();
            }
        }
    }

    /// Assets served from memory so the demo needs no files on disk
    pub fn resources() -> ResourceTable {
        let source = MemorySource::new()
            .with_file("sfx/hit.raw", vec![0; 64])
            .with_file("music/loop.raw", vec![0; 256]);
        ResourceTable::with_mode(source, LoadMode::Threaded)
    }

    /// Scripted input: wait, start, weave left and right
    pub fn script(frame: u64, engine: &mut Engine<Wave>) {
        let input = &mut engine.input;
        match start_tap(frame) {
            Some(true) => input.key_down("Space"),
            Some(false) => input.key_up("Space"),
            None => {}
        }
        let weave = (frame / 90) % 2 == 0;
        if weave {
            input.key_up("ArrowRight");
            input.key_down("ArrowLeft");
        } else {
            input.key_up("ArrowLeft");
            input.key_down("ArrowRight");
        }
    }

    /// Tap A every couple of seconds
    fn start_tap(frame: u64) -> Option<bool> {
        match frame % 120 {
            10 => Some(true),
            14 => Some(false),
            _ => None,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arcade_runtime::consts::FRAME_INTERVAL;
    use arcade_runtime::{CommandBuffer, Runtime, Settings};

    env_logger::init();
    log::info!("Arcade runtime (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_from(path),
        None => Settings::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut runtime = Runtime::new(demo::Dodge::default(), demo::resources(), settings, seed);
    runtime.engine_mut().resources.wait_all();

    let mut surface = CommandBuffer::host();
    let mut frame = 0u64;
    let mut finished_at = None;
    while frame < 60 * 120 {
        surface.begin_frame();
        demo::script(frame, runtime.engine_mut());
        if runtime.tick(FRAME_INTERVAL, &mut surface) {
            frame += 1;
        }
        if runtime.phase().is_terminal() {
            finished_at = Some(frame);
            break;
        }
    }

    let engine = runtime.engine();
    println!("phase:  {}", engine.phase());
    println!("score:  {}", engine.score());
    println!("stage:  {}", engine.stage());
    println!("frames: {}", runtime.frames());
    println!(
        "draws:  {} commands, {} vertices in last frame",
        surface.commands().len(),
        surface.vertices().len()
    );
    if let Some(at) = finished_at {
        println!("run ended after {:.1}s", at as f32 / 60.0);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; hosts drive `Runtime::tick` themselves
}
