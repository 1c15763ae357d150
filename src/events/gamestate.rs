//! Game state transition event and observer.
//!
//! States request a transition through
//! [`NextGameState`](crate::resources::gamestate::NextGameState). The
//! `apply_pending_state` system carries it out on the screens and then emits
//! a [`GameStateChangedEvent`]; the observer in this module copies the
//! result into the [`GameState`] resource so plain systems can read what is
//! on screen without touching the non-send screens.
use crate::resources::gamestate::GameState;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, info};

/// Emitted after a transition request has been applied.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct GameStateChangedEvent {
    /// Scene now active.
    pub current: Option<String>,
    /// Overlays stacked above it.
    pub overlays: usize,
}

/// Observer that records an applied transition in [`GameState`].
pub fn observe_gamestate_change_event(
    trigger: On<GameStateChangedEvent>,
    mut game_state: ResMut<GameState>,
) {
    let event = trigger.event();
    debug!("GameStateChangedEvent triggered");
    info!(
        "Transitioning from {:?} to {:?} ({} overlays)",
        game_state.current(),
        event.current,
        event.overlays
    );
    game_state.set(event.current.clone(), event.overlays);
}
