use bevy_ecs::prelude::*;

use crate::game::{GameContext, GameScreens};
use crate::resources::canvas::{Canvas, Color, FrameRecorder};
use crate::resources::worldtime::WorldTime;

/// Update the top overlay, or the scene when there is none.
pub fn update_screens(
    time: Res<WorldTime>,
    mut screens: NonSendMut<GameScreens>,
    mut ctx: NonSendMut<GameContext>,
) {
    screens.update(&mut ctx, time.delta);
}

/// Draw the scene and its overlays into a fresh frame.
pub fn render_screens(screens: NonSend<GameScreens>, mut canvas: ResMut<FrameRecorder>) {
    canvas.clear(Color::BLACK);
    screens.render(canvas.as_mut());
}
