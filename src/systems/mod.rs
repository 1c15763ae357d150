//! Engine systems.
//!
//! The per-frame schedule built by [`crate::game::build_schedule`] runs, in
//! order: [`input::dispatch_input`], [`timers::update_timers`],
//! [`screens::update_screens`], [`gamestate::apply_pending_state`] and
//! [`screens::render_screens`]. [`time::update_world_time`] is called by the
//! driving loop before each run.
//!
//! Submodules overview
//! - [`gamestate`] – apply pending state requests and trigger change events
//! - [`input`] – drain raw input through the dispatcher into the screens
//! - [`screens`] – update and render the active scene and overlays
//! - [`time`] – advance simulation time and delta
//! - [`timers`] – step the timer registry

pub mod gamestate;
pub mod input;
pub mod screens;
pub mod time;
pub mod timers;
