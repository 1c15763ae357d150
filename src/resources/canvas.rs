//! Rendering boundary.
//!
//! States and entities draw through the [`Canvas`] trait and never own the
//! surface behind it. The crate ships one implementation, [`FrameRecorder`],
//! which records draw commands instead of rasterizing them. It is what the
//! headless demo and the tests render into; a windowed front end would
//! provide its own `Canvas`.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::math::{Rect, Vec2};

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 220, 80);
    pub const ORANGE: Color = Color::rgb(255, 140, 40);
    pub const RED: Color = Color::rgb(230, 50, 50);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Color { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Placement and decoration of a `draw_text` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    /// `position` is the centre of the text instead of its top-left corner.
    pub center: bool,
    /// Draw a black copy one pixel down and right, underneath the text.
    pub shadowed: bool,
}

impl TextStyle {
    /// Top-left anchored, no shadow.
    pub const PLAIN: TextStyle = TextStyle {
        center: false,
        shadowed: false,
    };

    pub const fn centered() -> Self {
        TextStyle {
            center: true,
            shadowed: false,
        }
    }

    pub const fn with_shadow(mut self) -> Self {
        self.shadowed = true;
        self
    }
}

/// Offset of a text shadow from the text it belongs to.
pub const SHADOW_OFFSET: Vec2 = Vec2::new(1.0, 1.0);

/// Opaque drawable target handed to `render` hooks.
pub trait Canvas {
    fn clear(&mut self, color: Color);
    /// Draw `source` of `texture` (whole texture when `None`) with its top-left at `position`.
    fn draw_sprite(&mut self, texture: &str, source: Option<Rect>, position: Vec2);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color);
    /// Draw `text` at `position`, anchored and decorated per `style`.
    fn draw_text(&mut self, text: &str, position: Vec2, color: Color, style: TextStyle);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    Sprite {
        texture: String,
        source: Option<Rect>,
        position: Vec2,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Text {
        text: String,
        position: Vec2,
        color: Color,
        center: bool,
        /// Black copy drawn under a shadowed text.
        shadow: bool,
    },
}

/// Headless canvas: keeps the draw calls of the current frame.
///
/// `clear` starts a new frame, dropping the previous frame's commands.
#[derive(Resource, Debug, Default, Clone)]
pub struct FrameRecorder {
    commands: Vec<DrawCmd>,
    frames: u64,
}

impl FrameRecorder {
    /// Commands recorded since the last `clear`.
    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Number of frames started with `clear`.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text of every `draw_text` call, in draw order. Shadows are skipped.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Text {
                    text,
                    shadow: false,
                    ..
                } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count_sprites(&self, texture: &str) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Sprite { texture: t, .. } if t == texture))
            .count()
    }
}

impl Canvas for FrameRecorder {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCmd::Clear(color));
        self.frames += 1;
    }

    fn draw_sprite(&mut self, texture: &str, source: Option<Rect>, position: Vec2) {
        self.commands.push(DrawCmd::Sprite {
            texture: texture.to_string(),
            source,
            position,
        });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color, style: TextStyle) {
        if style.shadowed {
            self.commands.push(DrawCmd::Text {
                text: text.to_string(),
                position: position + SHADOW_OFFSET,
                color: Color::BLACK,
                center: style.center,
                shadow: true,
            });
        }
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            position,
            color,
            center: style.center,
            shadow: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_starts_new_frame() {
        let mut rec = FrameRecorder::default();
        rec.clear(Color::BLACK);
        rec.draw_text("a", Vec2::ZERO, Color::WHITE, TextStyle::PLAIN);
        rec.clear(Color::BLACK);
        rec.draw_sprite("ship", None, Vec2::new(1.0, 2.0));
        assert_eq!(rec.frames(), 2);
        assert_eq!(rec.commands().len(), 2);
        assert!(rec.texts().is_empty());
        assert_eq!(rec.count_sprites("ship"), 1);
    }

    #[test]
    fn test_shadowed_text_draws_black_copy_first() {
        let mut rec = FrameRecorder::default();
        rec.draw_text("hi", Vec2::new(10.0, 20.0), Color::YELLOW, TextStyle::PLAIN.with_shadow());
        assert_eq!(
            rec.commands(),
            &[
                DrawCmd::Text {
                    text: "hi".into(),
                    position: Vec2::new(11.0, 21.0),
                    color: Color::BLACK,
                    center: false,
                    shadow: true,
                },
                DrawCmd::Text {
                    text: "hi".into(),
                    position: Vec2::new(10.0, 20.0),
                    color: Color::YELLOW,
                    center: false,
                    shadow: false,
                },
            ]
        );
        assert_eq!(rec.texts(), vec!["hi"]);
    }

    #[test]
    fn test_centered_text_is_recorded() {
        let mut rec = FrameRecorder::default();
        rec.draw_text("title", Vec2::new(50.0, 5.0), Color::WHITE, TextStyle::centered());
        rec.draw_text("title", Vec2::new(0.0, 0.0), Color::WHITE, TextStyle::PLAIN);
        assert!(matches!(rec.commands()[0], DrawCmd::Text { center: true, .. }));
        assert!(matches!(rec.commands()[1], DrawCmd::Text { center: false, .. }));
        assert_eq!(rec.texts(), vec!["title", "title"]);
    }
}
