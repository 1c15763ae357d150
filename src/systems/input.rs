//! Input dispatch system.
//!
//! Drains [`RawInputQueue`], translates each event through the
//! [`InputDispatcher`] (which notifies its listeners), forwards the result to
//! the active screen and triggers an [`InputEvent`] for any observers.
use bevy_ecs::prelude::*;
use log::trace;

use crate::game::{GameContext, GameScreens};
use crate::resources::input::{InputDispatcher, RawInputQueue};

pub fn dispatch_input(
    mut queue: ResMut<RawInputQueue>,
    mut dispatcher: NonSendMut<InputDispatcher>,
    mut screens: NonSendMut<GameScreens>,
    mut ctx: NonSendMut<GameContext>,
    mut commands: Commands,
) {
    for raw in queue.drain() {
        let Some(event) = dispatcher.handle_input(&raw) else {
            continue;
        };
        trace!("Input {} {:?}", event.input_id, event.data);
        screens.on_input(&mut ctx, &event.input_id, &event.data);
        commands.trigger(event);
    }
}
