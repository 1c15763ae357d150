//! stepframe demo entry point.
//!
//! Runs the space trip demo headless: a fixed-step loop feeds scripted input
//! into the world, runs the frame schedule and records draw commands instead
//! of putting pixels on screen.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (or `--config`), falling back to defaults
//! 2. Build the ECS world and schedule, entering the title scene
//! 3. For each frame:
//!    - queue the autopilot's raw input
//!    - advance world time by `1 / target_fps`
//!    - run input dispatch, timers, screen update, state transitions, render
//! 4. Stop after `frames` frames or when `quit` is pressed
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 3600 --seed 7
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};

use stepframe::events::input::{Key, RawInput};
use stepframe::game::{GameContext, build_schedule, build_world};
use stepframe::resources::canvas::FrameRecorder;
use stepframe::resources::gameconfig::GameConfig;
use stepframe::resources::gamestate::GameState;
use stepframe::resources::input::RawInputQueue;
use stepframe::resources::worldtime::WorldTime;
use stepframe::systems::time::update_world_time;

/// Frame-stepped timers, tweens and states, shown with a headless demo.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Frames to simulate, overriding the config file.
    #[arg(long)]
    frames: Option<u64>,

    /// Random seed, overriding the config file.
    #[arg(long)]
    seed: Option<u64>,
}

const STEER_EVERY: u64 = 20;
const START_EVERY: u64 = 60;
const PAUSE_AT: u64 = 300;
const PAUSE_FOR: u64 = 60;
const ROUNDS: u32 = 2;

/// Scripted player: presses start on menus, wanders while playing, pauses
/// once per round and quits after a couple of rounds.
struct Autopilot {
    rng: fastrand::Rng,
    held: Option<Key>,
    play_frames: u64,
    rounds: u32,
    last_scene: Option<String>,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Autopilot {
            rng: fastrand::Rng::with_seed(seed),
            held: None,
            play_frames: 0,
            rounds: 0,
            last_scene: None,
        }
    }

    fn inputs(&mut self, frame: u64, state: &GameState) -> Vec<RawInput> {
        let scene = state.current().unwrap_or_default();
        if self.last_scene.as_deref() != Some(scene) {
            if scene == "game_over" {
                self.rounds += 1;
            }
            self.play_frames = 0;
            self.last_scene = Some(scene.to_string());
        }

        let mut out = Vec::new();
        match scene {
            "title" | "game_over" => {
                if let Some(key) = self.held.take() {
                    out.push(RawInput::key_up(key));
                }
                if self.rounds >= ROUNDS {
                    out.push(RawInput::key_down(Key::Escape));
                } else if frame % START_EVERY == 0 {
                    out.push(RawInput::key_down(Key::Return));
                    out.push(RawInput::key_up(Key::Return));
                }
            }
            "play" => {
                let tick = self.play_frames;
                self.play_frames += 1;
                if tick == PAUSE_AT || (state.overlays() > 0 && tick == PAUSE_AT + PAUSE_FOR) {
                    out.push(RawInput::key_down(Key::Char('p')));
                    out.push(RawInput::key_up(Key::Char('p')));
                } else if state.overlays() == 0 && tick % STEER_EVERY == 0 {
                    if let Some(key) = self.held.take() {
                        out.push(RawInput::key_up(key));
                    }
                    let key = [Key::Left, Key::Right, Key::Up, Key::Down][self.rng.usize(..4)];
                    out.push(RawInput::key_down(key));
                    self.held = Some(key);
                }
            }
            _ => {}
        }
        out
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(frames) = cli.frames {
        config.frames = frames;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let mut world = match build_world(&config) {
        Ok(world) => world,
        Err(e) => {
            error!("Failed to build the game world: {}", e);
            std::process::exit(1);
        }
    };
    let mut schedule = build_schedule();
    let mut autopilot = Autopilot::new(config.seed);
    let dt = config.frame_delta();

    info!("Running {} frames at {} fps", config.frames, config.target_fps);
    for frame in 0..config.frames {
        let inputs = autopilot.inputs(frame, world.resource::<GameState>());
        {
            let mut queue = world.resource_mut::<RawInputQueue>();
            for raw in inputs {
                queue.push(raw);
            }
        }
        update_world_time(&mut world, dt);
        schedule.run(&mut world);

        if world.non_send_resource::<GameContext>().quit.get() {
            info!("Quit requested at frame {}", frame);
            break;
        }
    }

    let time = world.resource::<WorldTime>();
    let state = world.resource::<GameState>();
    let ctx = world.non_send_resource::<GameContext>();
    let canvas = world.resource::<FrameRecorder>();
    info!(
        "Simulated {} frames ({:.2}s), {} transitions, ending on {:?}",
        time.frame_count,
        time.elapsed,
        state.transitions(),
        state.current()
    );
    match ctx.last_score {
        Some(score) => info!("Last score: {}", score),
        None => info!("No round finished"),
    }
    info!(
        "{} frames rendered, {} draw commands in the last one",
        canvas.frames(),
        canvas.commands().len()
    );
}
