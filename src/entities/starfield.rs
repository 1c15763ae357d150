//! Scrolling space background and collectible stars.
//!
//! The starfield only moves things. Spawning is driven from outside, by a
//! repeating timer in the play state, which calls [`Starfield::spawn_star`].
//! Stars are built through a [`Factory`], so per-field defaults such as the
//! star speed can be set with [`Starfield::with_star_property`].

use serde::Deserialize;
use serde_json::Value;

use crate::entities::factory::Factory;
use crate::error::Result;
use crate::math::{Rect, Vec2};
use crate::resources::canvas::Canvas;

pub const BACKGROUND_TEXTURE: &str = "background";
pub const STAR_TEXTURE: &str = "star";
pub const BACKGROUND_SPEED: f32 = 20.0;
/// Background offset at which the tiled texture repeats.
pub const BACKGROUND_LOOPING_X: f32 = 256.0;
pub const STAR_SPEED: f32 = 90.0;
pub const STAR_WIDTH: f32 = 12.0;
pub const STAR_HEIGHT: f32 = 12.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "StarProperties")]
pub struct Star {
    pub position: Vec2,
    /// Leftward speed in px/s.
    pub speed: f32,
    pub in_play: bool,
}

#[derive(Deserialize)]
struct StarProperties {
    x: f32,
    y: f32,
    #[serde(default = "default_star_speed")]
    speed: f32,
}

fn default_star_speed() -> f32 {
    STAR_SPEED
}

impl From<StarProperties> for Star {
    fn from(props: StarProperties) -> Self {
        Star {
            position: Vec2::new(props.x, props.y),
            speed: props.speed,
            in_play: true,
        }
    }
}

impl Star {
    pub fn new(x: f32, y: f32) -> Self {
        Star {
            position: Vec2::new(x, y),
            speed: STAR_SPEED,
            in_play: true,
        }
    }

    pub fn collision_rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, STAR_WIDTH, STAR_HEIGHT)
    }

    pub fn update(&mut self, dt: f32) {
        self.position.x -= self.speed * dt;
        if self.position.x < -STAR_WIDTH {
            self.in_play = false;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Starfield {
    scroll_x: f32,
    stars: Vec<Star>,
    factory: Factory<Star>,
    width: f32,
    height: f32,
}

impl Starfield {
    pub fn new(width: f32, height: f32) -> Self {
        Starfield {
            scroll_x: 0.0,
            stars: Vec::new(),
            factory: Factory::new(),
            width,
            height,
        }
    }

    /// Property every spawned star gets, e.g. `("speed", json!(120.0))`.
    pub fn with_star_property(mut self, key: &str, value: Value) -> Self {
        self.factory = self.factory.with_default(key, value);
        self
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    /// Highest `y` at which a star still fits on screen.
    pub fn max_star_y(&self) -> f32 {
        (self.height - STAR_HEIGHT).max(0.0)
    }

    /// Add a star at the right edge of the screen.
    pub fn spawn_star(&mut self, y: f32) -> Result<()> {
        let y = y.clamp(0.0, self.max_star_y());
        let star = self.factory.create(self.width, y, &Value::Null)?;
        self.stars.push(star);
        Ok(())
    }

    /// Take every star overlapping `rect` out of play; returns how many.
    pub fn collect_colliding(&mut self, rect: &Rect) -> usize {
        let mut count = 0;
        for star in self.stars.iter_mut().filter(|s| s.in_play) {
            if rect.intersects(&star.collision_rect()) {
                star.in_play = false;
                count += 1;
            }
        }
        count
    }

    pub fn update(&mut self, dt: f32) {
        self.scroll_x -= BACKGROUND_SPEED * dt;
        if self.scroll_x <= -BACKGROUND_LOOPING_X {
            self.scroll_x = 0.0;
        }
        for star in self.stars.iter_mut() {
            star.update(dt);
        }
        self.stars.retain(|s| s.in_play);
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(BACKGROUND_TEXTURE, None, Vec2::new(self.scroll_x, 0.0));
        for star in &self.stars {
            canvas.draw_sprite(STAR_TEXTURE, None, star.position);
        }
    }
}
