//! Demo entities.
//!
//! Plain structs owned by the play state. None of them schedule anything on
//! their own; timers and states drive them.

pub mod factory;
pub mod particles;
pub mod ship;
pub mod starfield;
