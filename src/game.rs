//! Space trip demo: states and world assembly.
//!
//! A flying saucer collects stars scrolling past for a fixed round time.
//! Everything that happens later than "now" goes through the timer
//! registry in [`GameContext`]: the title banner drop, the blinking prompt,
//! star spawning, the score pulse and the end of the round.
//!
//! Scenes: `title` → `play` → `game_over` → `play` ... with the `pause`
//! overlay pushable from `play`.
//!
//! # Related
//!
//! - [`build_world`] – resources, non-send resources and observers
//! - [`build_schedule`] – the per-frame system order

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::{debug, info};
use serde_json::{Value, json};

use crate::easing::Easing;
use crate::entities::particles::ParticleSystem;
use crate::entities::ship::Ship;
use crate::entities::starfield::Starfield;
use crate::error::{Error, Result};
use crate::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use crate::events::input::InputData;
use crate::math::Vec2;
use crate::resources::canvas::{Canvas, Color, FrameRecorder, TextStyle};
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamestate::{GameState, NextGameState, StateRequest};
use crate::resources::input::{InputDispatcher, RawInputQueue};
use crate::resources::screens::Screens;
use crate::resources::worldtime::WorldTime;
use crate::state::{State, StateMachine};
use crate::systems::gamestate::apply_pending_state;
use crate::systems::input::dispatch_input;
use crate::systems::screens::{render_screens, update_screens};
use crate::systems::timers::update_timers;
use crate::timer::{Scheduler, TimerHandle, TimerRegistry, Tween, TweenField, TweenPlan};

pub const TITLE: &str = "space trip";
pub const PROMPT: &str = "press start";
const BANNER_START_Y: f32 = -24.0;
const BANNER_DROP_TIME: f32 = 1.2;
const PROMPT_BLINK: f32 = 0.5;
pub const POINTS_PER_STAR: u32 = 100;
const SCORE_PULSE: f32 = 6.0;
const SCORE_PULSE_TIME: f32 = 0.3;
const BURST_PARTICLES: usize = 24;

/// Play settings copied out of [`GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaySettings {
    pub width: f32,
    pub height: f32,
    pub star_interval: f32,
    pub round_time: f32,
}

/// Context threaded through every state hook.
pub struct GameContext {
    pub timers: TimerRegistry,
    pub next_state: NextGameState,
    pub rng: fastrand::Rng,
    pub settings: PlaySettings,
    /// Set by the `quit` input listener; the driving loop stops on it.
    pub quit: Rc<Cell<bool>>,
    /// Score of the most recently finished round.
    pub last_score: Option<u32>,
}

impl GameContext {
    pub fn new(config: &GameConfig) -> Self {
        GameContext {
            timers: TimerRegistry::new(),
            next_state: NextGameState::new(),
            rng: fastrand::Rng::with_seed(config.seed),
            settings: PlaySettings {
                width: config.width as f32,
                height: config.height as f32,
                star_interval: config.star_interval,
                round_time: config.round_time,
            },
            quit: Rc::new(Cell::new(false)),
            last_score: None,
        }
    }

    fn cancel_all(&mut self, handles: &mut Vec<TimerHandle>) {
        for handle in handles.drain(..) {
            self.timers.cancel(handle);
        }
    }
}

pub type GameScreens = Screens<GameContext>;

// ==================== title ====================

/// Banner dropping in with a bounce and a blinking prompt.
pub struct TitleState {
    banner_y: Rc<Cell<f32>>,
    prompt_visible: Rc<Cell<bool>>,
    width: f32,
    handles: Vec<TimerHandle>,
}

impl TitleState {
    pub fn new() -> Self {
        TitleState {
            banner_y: Rc::new(Cell::new(BANNER_START_Y)),
            prompt_visible: Rc::new(Cell::new(true)),
            width: 0.0,
            handles: Vec::new(),
        }
    }

    pub fn banner_y(&self) -> f32 {
        self.banner_y.get()
    }
}

impl Default for TitleState {
    fn default() -> Self {
        Self::new()
    }
}

impl State<GameContext> for TitleState {
    fn enter(&mut self, ctx: &mut GameContext, _params: &Value) -> Result<()> {
        self.width = ctx.settings.width;
        self.banner_y.set(BANNER_START_Y);
        let plan = TweenPlan::new().field(
            TweenField::cell(self.banner_y.clone()),
            ctx.settings.height * 0.3,
        );
        self.handles
            .push(ctx.timers.schedule_tween(BANNER_DROP_TIME, plan, "out_bounce", None)?);

        let visible = self.prompt_visible.clone();
        self.handles.push(ctx.timers.schedule_repeating(
            PROMPT_BLINK,
            move |_| visible.set(!visible.get()),
            None,
            None,
        )?);
        Ok(())
    }

    fn exit(&mut self, ctx: &mut GameContext) {
        ctx.cancel_all(&mut self.handles);
    }

    fn on_input(&mut self, ctx: &mut GameContext, input_id: &str, data: &InputData) {
        if input_id == "start" && data.is_pressed() {
            ctx.next_state.change("play", json!({}));
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let y = self.banner_y.get();
        let x = self.width / 2.0;
        canvas.draw_text(
            TITLE,
            Vec2::new(x, y),
            Color::YELLOW,
            TextStyle::centered().with_shadow(),
        );
        if self.prompt_visible.get() {
            canvas.draw_text(
                PROMPT,
                Vec2::new(x, y + 40.0),
                Color::WHITE,
                TextStyle::centered(),
            );
        }
    }
}

// ==================== play ====================

#[derive(Debug, Default)]
struct Hud {
    pulse: f32,
}

/// One timed round of star collecting.
pub struct PlayState {
    ship: Option<Ship>,
    starfield: Rc<RefCell<Starfield>>,
    hud: Rc<RefCell<Hud>>,
    bursts: Vec<ParticleSystem>,
    score: u32,
    round_over: Rc<Cell<bool>>,
    round_timer: Option<TimerHandle>,
    time_left: f32,
    handles: Vec<TimerHandle>,
}

impl PlayState {
    pub fn new() -> Self {
        PlayState {
            ship: None,
            starfield: Rc::new(RefCell::new(Starfield::new(0.0, 0.0))),
            hud: Rc::new(RefCell::new(Hud::default())),
            bursts: Vec::new(),
            score: 0,
            round_over: Rc::new(Cell::new(false)),
            round_timer: None,
            time_left: 0.0,
            handles: Vec::new(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn steer(ship: &mut Ship, data: &InputData, dir: Vec2) {
        if data.is_pressed() {
            ship.accelerate(dir.x, dir.y);
        } else if data.is_released() {
            // only stop if still moving the way the released key pushed
            let moving = ship.velocity * dir;
            if moving.x > 0.0 || moving.y > 0.0 {
                ship.accelerate(0.0, 0.0);
            }
        }
    }

    fn collect_stars(&mut self, ctx: &mut GameContext) -> Result<()> {
        let Some(ship) = self.ship.as_ref() else {
            return Ok(());
        };
        let hitbox = ship.collision_rect();
        let collected = self.starfield.borrow_mut().collect_colliding(&hitbox);
        if collected == 0 {
            return Ok(());
        }
        self.score += POINTS_PER_STAR * collected as u32;
        debug!("Collected {} star(s), score {}", collected, self.score);

        let center = hitbox.position() + hitbox.size() / 2.0;
        let mut burst = ParticleSystem::new(center, BURST_PARTICLES, ctx.rng.u64(..))
            .with_life_time(0.2, 0.6)
            .with_linear_acceleration(Vec2::new(-80.0, -80.0), Vec2::new(80.0, 80.0))
            .with_area_spread(3.0, 3.0)
            .with_colors(vec![Color::YELLOW, Color::ORANGE, Color::WHITE]);
        burst.generate();
        self.bursts.push(burst);

        self.hud.borrow_mut().pulse = SCORE_PULSE;
        let plan = TweenPlan::new().field(TweenField::of(self.hud.clone(), |h| &mut h.pulse), 0.0);
        let pulse = ctx
            .timers
            .schedule(Tween::new(SCORE_PULSE_TIME, plan).with_easing(Easing::OutQuad))?;
        self.handles.retain(|h| ctx.timers.is_active(*h));
        self.handles.push(pulse);
        Ok(())
    }
}

impl Default for PlayState {
    fn default() -> Self {
        Self::new()
    }
}

impl State<GameContext> for PlayState {
    fn enter(&mut self, ctx: &mut GameContext, _params: &Value) -> Result<()> {
        let settings = ctx.settings;
        let bounds = Vec2::new(settings.width, settings.height);
        self.ship = Some(Ship::new(bounds / 2.0, bounds).map_err(|e| Error::EnterFailed {
            state: "play".into(),
            reason: e.to_string(),
        })?);
        self.starfield = Rc::new(RefCell::new(Starfield::new(settings.width, settings.height)));
        self.score = 0;
        self.round_over.set(false);
        self.time_left = settings.round_time;

        let field = self.starfield.clone();
        let mut spawn_rng = fastrand::Rng::with_seed(ctx.rng.u64(..));
        self.handles.push(ctx.timers.schedule_repeating(
            settings.star_interval,
            move |_| {
                let y = spawn_rng.f32() * field.borrow().max_star_y();
                if let Err(e) = field.borrow_mut().spawn_star(y) {
                    log::error!("Star not spawned: {}", e);
                }
            },
            None,
            None,
        )?);

        let over = self.round_over.clone();
        let round = ctx
            .timers
            .schedule_delayed(settings.round_time, move |_| over.set(true))?;
        self.round_timer = Some(round);
        self.handles.push(round);
        info!("Round started: {}s", settings.round_time);
        Ok(())
    }

    fn exit(&mut self, ctx: &mut GameContext) {
        ctx.cancel_all(&mut self.handles);
        self.round_timer = None;
    }

    fn on_input(&mut self, ctx: &mut GameContext, input_id: &str, data: &InputData) {
        if input_id == "pause" && data.is_pressed() {
            ctx.next_state.push("pause", Value::Null);
            return;
        }
        let Some(ship) = self.ship.as_mut() else {
            return;
        };
        match input_id {
            "left" => Self::steer(ship, data, Vec2::NEG_X),
            "right" => Self::steer(ship, data, Vec2::X),
            "up" => Self::steer(ship, data, Vec2::NEG_Y),
            "down" => Self::steer(ship, data, Vec2::Y),
            _ => {}
        }
    }

    fn update(&mut self, ctx: &mut GameContext, dt: f32) {
        self.starfield.borrow_mut().update(dt);
        if let Some(ship) = self.ship.as_mut() {
            ship.update(dt);
        }
        if let Err(e) = self.collect_stars(ctx) {
            log::error!("Score pulse not scheduled: {}", e);
        }
        for burst in self.bursts.iter_mut() {
            burst.update(dt);
        }
        self.bursts.retain(ParticleSystem::is_active);

        if let Some(item) = self.round_timer.and_then(|h| ctx.timers.get(h)) {
            self.time_left = (item.duration() - item.elapsed()).max(0.0);
        }
        if self.round_over.get() && !ctx.next_state.is_pending() {
            self.round_over.set(false);
            self.time_left = 0.0;
            info!("Round over, score {}", self.score);
            ctx.next_state
                .change("game_over", json!({ "score": self.score }));
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        self.starfield.borrow().render(canvas);
        if let Some(ship) = self.ship.as_ref() {
            ship.render(canvas);
        }
        for burst in &self.bursts {
            burst.render(canvas);
        }
        let pulse = self.hud.borrow().pulse;
        canvas.draw_text(
            &format!("score: {}", self.score),
            Vec2::new(10.0, 10.0 - pulse),
            Color::YELLOW,
            TextStyle::PLAIN.with_shadow(),
        );
        canvas.draw_text(
            &format!("time: {}", self.time_left.ceil() as u32),
            Vec2::new(10.0, 24.0),
            Color::WHITE,
            TextStyle::PLAIN,
        );
    }
}

// ==================== game over ====================

/// Final score; `start` plays again.
#[derive(Debug, Default)]
pub struct GameOverState {
    score: u32,
    width: f32,
}

impl State<GameContext> for GameOverState {
    fn enter(&mut self, ctx: &mut GameContext, params: &Value) -> Result<()> {
        let score = params
            .get("score")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::EnterFailed {
                state: "game_over".into(),
                reason: format!("missing 'score' in {}", params),
            })?;
        self.score = u32::try_from(score).map_err(|_| Error::EnterFailed {
            state: "game_over".into(),
            reason: format!("score {} out of range", score),
        })?;
        self.width = ctx.settings.width;
        ctx.last_score = Some(self.score);
        Ok(())
    }

    fn on_input(&mut self, ctx: &mut GameContext, input_id: &str, data: &InputData) {
        if input_id == "start" && data.is_pressed() {
            ctx.next_state.change("play", json!({}));
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let line = format!("score: {}", self.score);
        let x = self.width / 2.0;
        canvas.draw_text("game over", Vec2::new(x, 80.0), Color::RED, TextStyle::centered());
        canvas.draw_text(
            &line,
            Vec2::new(x, 110.0),
            Color::YELLOW,
            TextStyle::centered().with_shadow(),
        );
    }
}

// ==================== pause ====================

/// Overlay freezing every timer while it is on top.
#[derive(Debug, Default)]
pub struct PauseState;

impl State<GameContext> for PauseState {
    fn enter(&mut self, ctx: &mut GameContext, _params: &Value) -> Result<()> {
        ctx.timers.pause();
        Ok(())
    }

    fn exit(&mut self, ctx: &mut GameContext) {
        ctx.timers.resume();
    }

    fn on_input(&mut self, ctx: &mut GameContext, input_id: &str, data: &InputData) {
        if input_id == "pause" && data.is_pressed() {
            ctx.next_state.pop();
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_text(
            "paused",
            Vec2::new(10.0, 40.0),
            Color::WHITE.with_alpha(200),
            TextStyle::PLAIN,
        );
    }
}

// ==================== assembly ====================

/// Scenes and overlays of the demo.
pub fn game_screens() -> GameScreens {
    Screens::new(
        StateMachine::new()
            .with_state("title", || Box::new(TitleState::new()))
            .with_state("play", || Box::new(PlayState::new()))
            .with_state("game_over", || Box::new(GameOverState::default())),
    )
    .with_overlay("pause", || Box::new(PauseState))
}

/// Build a world ready to run, already showing the title scene.
pub fn build_world(config: &GameConfig) -> Result<World> {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(config.clone());
    world.insert_resource(GameState::new());
    world.insert_resource(RawInputQueue::default());
    world.insert_resource(FrameRecorder::default());

    let mut ctx = GameContext::new(config);
    let mut dispatcher = InputDispatcher::new(config.input_bindings());
    let quit = ctx.quit.clone();
    dispatcher.register_listener(move |input_id, data| {
        if input_id == "quit" && data.is_pressed() {
            quit.set(true);
        }
    });

    let mut screens = game_screens();
    screens.apply(
        StateRequest::Change {
            name: "title".into(),
            params: json!({}),
        },
        &mut ctx,
    )?;
    let current = screens.scene_name().map(str::to_string);

    world.insert_non_send_resource(ctx);
    world.insert_non_send_resource(dispatcher);
    world.insert_non_send_resource(screens);

    world.spawn(Observer::new(observe_gamestate_change_event));
    world.flush();
    world.trigger(GameStateChangedEvent {
        current,
        overlays: 0,
    });
    Ok(world)
}

/// Systems run once per frame, in order.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            dispatch_input,
            update_timers,
            update_screens,
            apply_pending_state,
            render_screens,
        )
            .chain(),
    );
    schedule
}
