use bevy_ecs::prelude::*;
use log::error;

use crate::events::gamestate::GameStateChangedEvent;
use crate::game::{GameContext, GameScreens};

/// Apply the transition a state requested this frame, if any.
///
/// Failures are logged and leave the screens as they were; the change event
/// is triggered either way so [`GameState`](crate::resources::gamestate::GameState)
/// stays in sync.
pub fn apply_pending_state(
    mut commands: Commands,
    mut screens: NonSendMut<GameScreens>,
    mut ctx: NonSendMut<GameContext>,
) {
    let Some(request) = ctx.next_state.take() else {
        return;
    };
    if let Err(e) = screens.apply(request, &mut ctx) {
        error!("State transition failed: {}", e);
    }
    commands.trigger(GameStateChangedEvent {
        current: screens.scene_name().map(str::to_string),
        overlays: screens.overlay_depth(),
    });
}
