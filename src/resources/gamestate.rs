//! High-level game state bookkeeping.
//!
//! States never switch scenes directly: they file a request in
//! [`NextGameState`] and the `apply_pending_state` system carries it out
//! after the frame's updates, then triggers a
//! [`GameStateChangedEvent`](crate::events::gamestate::GameStateChangedEvent)
//! whose observer refreshes [`GameState`].

use bevy_ecs::prelude::Resource;
use serde_json::Value;

/// A transition a state asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum StateRequest {
    /// Replace the current scene.
    Change { name: String, params: Value },
    /// Push an overlay on top of the scene.
    Push { name: String, params: Value },
    /// Pop the top overlay.
    Pop,
}

/// Representation of a requested next state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NextGameStates {
    #[default]
    Unchanged,
    Pending(StateRequest),
}

/// Intent to change to a new game state.
///
/// Lives inside the context threaded through states. A later request in the
/// same frame replaces an earlier one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NextGameState {
    next: NextGameStates,
}

impl NextGameState {
    /// Create a new value initialized to [`NextGameStates::Unchanged`].
    pub fn new() -> Self {
        NextGameState {
            next: NextGameStates::Unchanged,
        }
    }

    /// Get the current transition request.
    pub fn get(&self) -> &NextGameStates {
        &self.next
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.next, NextGameStates::Pending(_))
    }

    pub fn set(&mut self, request: StateRequest) {
        self.next = NextGameStates::Pending(request);
    }

    pub fn change(&mut self, name: impl Into<String>, params: Value) {
        self.set(StateRequest::Change {
            name: name.into(),
            params,
        });
    }

    pub fn push(&mut self, name: impl Into<String>, params: Value) {
        self.set(StateRequest::Push {
            name: name.into(),
            params,
        });
    }

    pub fn pop(&mut self) {
        self.set(StateRequest::Pop);
    }

    /// Take the pending request, leaving [`NextGameStates::Unchanged`].
    pub fn take(&mut self) -> Option<StateRequest> {
        match std::mem::take(&mut self.next) {
            NextGameStates::Pending(request) => Some(request),
            NextGameStates::Unchanged => None,
        }
    }

    /// Reset to [`NextGameStates::Unchanged`].
    pub fn reset(&mut self) {
        self.next = NextGameStates::Unchanged;
    }
}

/// Authoritative snapshot of what is on screen, for systems and tests.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Default)]
pub struct GameState {
    current: Option<String>,
    overlays: usize,
    transitions: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the current scene.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Number of overlays stacked on the scene.
    pub fn overlays(&self) -> usize {
        self.overlays
    }

    /// Transitions applied so far.
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    pub fn set(&mut self, current: Option<String>, overlays: usize) {
        self.current = current;
        self.overlays = overlays;
        self.transitions += 1;
    }
}
