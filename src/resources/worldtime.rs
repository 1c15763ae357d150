use bevy_ecs::prelude::Resource;

/// Simulation clock advanced once per frame by
/// [`update_world_time`](crate::systems::time::update_world_time).
#[derive(Resource, Debug, Clone, Copy)]
pub struct WorldTime {
    /// Scaled seconds since start.
    pub elapsed: f32,
    /// Scaled seconds of the current frame.
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// World time with a fixed scale, e.g. `0.5` for slow motion.
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
