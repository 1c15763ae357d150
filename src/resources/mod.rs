//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution. Each submodule documents the
//! semantics and intended usage of its resource(s).
//!
//! Overview
//! - `canvas` – rendering boundary and the headless frame recorder
//! - `gameconfig` – INI-backed settings
//! - `gamestate` – authoritative and pending high-level game state
//! - `input` – bindings, listener dispatch and the raw input queue
//! - `screens` – scene state machine plus overlay stack
//! - `worldtime` – simulation time and delta
pub mod canvas;
pub mod gameconfig;
pub mod gamestate;
pub mod input;
pub mod screens;
pub mod worldtime;
