//! Event types and observers.
//!
//! Submodules:
//! - [`gamestate`] – state transition notifications for the high-level game flow
//! - [`input`] – raw device input, abstract input payloads and [`input::InputEvent`]
pub mod gamestate;
pub mod input;
