//! stepframe library.
//!
//! Frame-stepped building blocks for small games: easing curves, a timer and
//! tween registry, game states with a machine and a stack, input dispatch and
//! frame animation. The `game` module wires them into a bevy_ecs world as a
//! small demo; everything is exposed for integration tests.

pub mod animation;
pub mod easing;
pub mod entities;
pub mod error;
pub mod events;
pub mod game;
pub mod math;
pub mod resources;
pub mod state;
pub mod systems;
pub mod timer;
