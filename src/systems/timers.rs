use bevy_ecs::prelude::*;

use crate::game::GameContext;
use crate::resources::worldtime::WorldTime;

/// Step every timer, delayed call and tween by this frame's delta.
pub fn update_timers(time: Res<WorldTime>, mut ctx: NonSendMut<GameContext>) {
    ctx.timers.update(time.delta);
}
