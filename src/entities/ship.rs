//! The player's flying saucer.
//!
//! Input sets a movement direction; each update turns it into a constant
//! acceleration and integrates velocity with the trapezoid rule. The saucer
//! is clamped to the play area, losing its velocity along the blocked axis.

use crate::animation::{Animation, generate_frames};
use crate::error::Result;
use crate::math::{Rect, Vec2};
use crate::resources::canvas::Canvas;

pub const SHIP_TEXTURE: &str = "ufo";
pub const SHIP_WIDTH: f32 = 32.0;
pub const SHIP_HEIGHT: f32 = 16.0;
/// Acceleration in px/s² for a unit direction.
pub const SHIP_ACCELERATION: f32 = 200.0;
const THRUSTER_FRAMES: u32 = 3;
const THRUSTER_INTERVAL: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Ship {
    pub position: Vec2,
    pub velocity: Vec2,
    movement_direction: Vec2,
    size: Vec2,
    bounds: Vec2,
    thruster: Animation<Rect>,
}

impl Ship {
    /// Spawn centred on `center` inside a `bounds`-sized play area.
    pub fn new(center: Vec2, bounds: Vec2) -> Result<Self> {
        let size = Vec2::new(SHIP_WIDTH, SHIP_HEIGHT);
        let frames = generate_frames(
            SHIP_WIDTH as u32 * THRUSTER_FRAMES,
            SHIP_HEIGHT as u32,
            SHIP_WIDTH as u32,
            SHIP_HEIGHT as u32,
        );
        Ok(Ship {
            position: center - size / 2.0,
            velocity: Vec2::ZERO,
            movement_direction: Vec2::ZERO,
            size,
            bounds,
            thruster: Animation::new(frames, THRUSTER_INTERVAL, None)?,
        })
    }

    /// Set the direction to accelerate in; `(0, 0)` coasts.
    pub fn accelerate(&mut self, x: f32, y: f32) {
        self.movement_direction = Vec2::new(x, y);
    }

    pub fn movement_direction(&self) -> Vec2 {
        self.movement_direction
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Hitbox, inset from the sprite so grazing a star does not count.
    pub fn collision_rect(&self) -> Rect {
        Rect::new(
            self.position.x + 5.0,
            self.position.y + 3.0,
            self.size.x - 10.0,
            self.size.y - 6.0,
        )
    }

    pub fn update(&mut self, dt: f32) {
        if self.movement_direction.length() > 1.0 {
            self.movement_direction = self.movement_direction.normalize();
        }
        let acceleration = self.movement_direction * SHIP_ACCELERATION;
        let v0 = self.velocity;
        let v1 = v0 + acceleration * dt;
        self.position += (v0 + v1) * dt * 0.5;
        self.velocity = v1;
        self.limit_boundaries();
        self.thruster.update(dt);
    }

    fn limit_boundaries(&mut self) {
        let max = self.bounds - self.size;
        if !(0.0 < self.position.x && self.position.x < max.x) {
            self.position.x = self.position.x.clamp(0.0, max.x.max(0.0));
            self.velocity.x = 0.0;
        }
        if !(0.0 < self.position.y && self.position.y < max.y) {
            self.position.y = self.position.y.clamp(0.0, max.y.max(0.0));
            self.velocity.y = 0.0;
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(SHIP_TEXTURE, Some(*self.thruster.current_frame()), self.position);
    }
}
