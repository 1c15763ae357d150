//! Engine tick integration tests: a real world and schedule stepped frame
//! by frame with queued raw input.

use bevy_ecs::observer::{Observer, On};
use bevy_ecs::prelude::*;

use stepframe::events::input::{InputEvent, Key, RawInput};
use stepframe::game::{GameContext, GameScreens, build_schedule, build_world};
use stepframe::resources::canvas::FrameRecorder;
use stepframe::resources::gameconfig::GameConfig;
use stepframe::resources::gamestate::GameState;
use stepframe::resources::input::RawInputQueue;
use stepframe::resources::worldtime::WorldTime;
use stepframe::systems::time::update_world_time;

const DT: f32 = 1.0 / 60.0;
const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> (World, Schedule) {
    let mut config = GameConfig::new();
    config.round_time = 1.0;
    config.star_interval = 0.25;
    (build_world(&config).unwrap(), build_schedule())
}

fn tick(world: &mut World, schedule: &mut Schedule, inputs: &[RawInput]) {
    {
        let mut queue = world.resource_mut::<RawInputQueue>();
        for raw in inputs {
            queue.push(raw.clone());
        }
    }
    update_world_time(world, DT);
    schedule.run(world);
}

fn tap(key: Key) -> [RawInput; 2] {
    [RawInput::key_down(key), RawInput::key_up(key)]
}

fn scene(world: &World) -> Option<String> {
    world.resource::<GameState>().current().map(str::to_string)
}

// ==================== flow ====================

#[test]
fn test_start_moves_title_to_play() {
    let (mut world, mut schedule) = make_world();
    assert_eq!(scene(&world).as_deref(), Some("title"));

    tick(&mut world, &mut schedule, &[]);
    assert_eq!(scene(&world).as_deref(), Some("title"));

    tick(&mut world, &mut schedule, &tap(Key::Return));
    assert_eq!(scene(&world).as_deref(), Some("play"));
    assert_eq!(world.resource::<GameState>().transitions(), 2);
}

#[test]
fn test_round_ends_in_game_over() {
    let (mut world, mut schedule) = make_world();
    tick(&mut world, &mut schedule, &tap(Key::Return));
    for _ in 0..70 {
        tick(&mut world, &mut schedule, &[]);
    }
    assert_eq!(scene(&world).as_deref(), Some("game_over"));
    assert!(world.non_send_resource::<GameContext>().last_score.is_some());

    tick(&mut world, &mut schedule, &tap(Key::Return));
    assert_eq!(scene(&world).as_deref(), Some("play"));
}

#[test]
fn test_pause_overlay_freezes_round() {
    let (mut world, mut schedule) = make_world();
    tick(&mut world, &mut schedule, &tap(Key::Return));
    tick(&mut world, &mut schedule, &tap(Key::Char('p')));
    assert_eq!(world.resource::<GameState>().overlays(), 1);
    assert!(world.non_send_resource::<GameContext>().timers.is_paused());

    // far longer than the round; nothing advances under the overlay
    for _ in 0..120 {
        tick(&mut world, &mut schedule, &[]);
    }
    assert_eq!(scene(&world).as_deref(), Some("play"));
    assert_eq!(
        world.non_send_resource::<GameScreens>().overlay_names(),
        ["pause".to_string()]
    );

    tick(&mut world, &mut schedule, &tap(Key::Char('p')));
    assert_eq!(world.resource::<GameState>().overlays(), 0);
    assert!(!world.non_send_resource::<GameContext>().timers.is_paused());
}

#[test]
fn test_quit_listener_sets_flag() {
    let (mut world, mut schedule) = make_world();
    tick(&mut world, &mut schedule, &[RawInput::key_down(Key::Escape)]);
    assert!(world.non_send_resource::<GameContext>().quit.get());
}

// ==================== systems ====================

#[test]
fn test_world_time_advances_per_tick() {
    let (mut world, mut schedule) = make_world();
    for _ in 0..30 {
        tick(&mut world, &mut schedule, &[]);
    }
    let time = world.resource::<WorldTime>();
    assert_eq!(time.frame_count, 30);
    assert!(approx_eq(time.elapsed, 0.5));
}

#[test]
fn test_render_records_one_frame_per_tick() {
    let (mut world, mut schedule) = make_world();
    for _ in 0..3 {
        tick(&mut world, &mut schedule, &[]);
    }
    let canvas = world.resource::<FrameRecorder>();
    assert_eq!(canvas.frames(), 3);
    assert!(canvas.texts().contains(&"space trip"));
}

#[derive(Resource, Default)]
struct SeenInputs(Vec<String>);

fn record_input(trigger: On<InputEvent>, mut seen: ResMut<SeenInputs>) {
    seen.0.push(trigger.event().input_id.clone());
}

#[test]
fn test_bound_input_triggers_observers() {
    let (mut world, mut schedule) = make_world();
    world.init_resource::<SeenInputs>();
    world.spawn(Observer::new(record_input));
    world.flush();

    tick(
        &mut world,
        &mut schedule,
        &[RawInput::key_down(Key::Left), RawInput::key_down(Key::Char('z'))],
    );
    assert_eq!(world.resource::<SeenInputs>().0, vec!["left".to_string()]);
}
