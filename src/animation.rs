//! Frame animation sequencer.
//!
//! An [`Animation`] cycles through a list of frames, advancing one frame per
//! elapsed `interval`. Frames are usually sprite-sheet rectangles produced by
//! [`generate_frames`], but any cloneable frame value works.
//!
//! With `loops = Some(n)` the animation keeps advancing until it has wrapped
//! back to the first frame more than `n` times, then freezes on that frame.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::Rect;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation<F> {
    frames: Vec<F>,
    interval: f32,
    loops: Option<u32>,
    timer: f32,
    times_played: u32,
    current_frame: usize,
}

impl<F> Animation<F> {
    /// Create an animation showing each frame for `interval` seconds.
    ///
    /// `loops = None` plays forever.
    pub fn new(frames: Vec<F>, interval: f32, loops: Option<u32>) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::InvalidArgument("animation needs at least one frame".into()));
        }
        if frames.len() > 1 && !(interval.is_finite() && interval > 0.0) {
            return Err(Error::InvalidArgument(format!(
                "animation interval must be positive, got {interval}"
            )));
        }
        Ok(Animation {
            frames,
            interval,
            loops,
            timer: 0.0,
            times_played: 0,
            current_frame: 0,
        })
    }

    /// Back to the first frame with counters cleared.
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.times_played = 0;
        self.current_frame = 0;
    }

    pub fn is_finished(&self) -> bool {
        self.loops.is_some_and(|loops| self.times_played > loops)
    }

    pub fn update(&mut self, dt: f32) {
        if self.frames.len() <= 1 || self.is_finished() {
            return;
        }
        self.timer += dt;
        if self.timer >= self.interval {
            self.timer %= self.interval;
            self.current_frame = (self.current_frame + 1) % self.frames.len();
            if self.current_frame == 0 {
                self.times_played += 1;
            }
        }
    }

    pub fn current_frame(&self) -> &F {
        &self.frames[self.current_frame]
    }

    pub fn frame_index(&self) -> usize {
        self.current_frame
    }

    pub fn times_played(&self) -> u32 {
        self.times_played
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Slice a sprite sheet into equally sized frames, row by row.
///
/// Partial sprites at the right or bottom edge are skipped.
pub fn generate_frames(
    sheet_width: u32,
    sheet_height: u32,
    sprite_width: u32,
    sprite_height: u32,
) -> Vec<Rect> {
    if sprite_width == 0 || sprite_height == 0 {
        return Vec::new();
    }
    let cols = sheet_width / sprite_width;
    let rows = sheet_height / sprite_height;
    (0..rows)
        .flat_map(|row| {
            (0..cols).map(move |col| {
                Rect::new(
                    (col * sprite_width) as f32,
                    (row * sprite_height) as f32,
                    sprite_width as f32,
                    sprite_height as f32,
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_bad_interval() {
        assert!(Animation::<u8>::new(vec![], 0.1, None).is_err());
        assert!(Animation::new(vec![1, 2], 0.0, None).is_err());
        // A single still frame needs no interval.
        assert!(Animation::new(vec![1], 0.0, None).is_ok());
    }

    #[test]
    fn test_advances_and_wraps() {
        let mut anim = Animation::new(vec![4, 5, 6], 0.25, None).unwrap();
        anim.update(0.25);
        assert_eq!(*anim.current_frame(), 5);
        anim.update(0.125);
        assert_eq!(*anim.current_frame(), 5);
        anim.update(0.125);
        assert_eq!(*anim.current_frame(), 6);
        anim.update(0.25);
        assert_eq!(*anim.current_frame(), 4);
        assert_eq!(anim.times_played(), 1);
    }

    #[test]
    fn test_limited_loops_freeze_on_first_frame() {
        let mut anim = Animation::new(vec![4, 5, 6], 0.25, Some(5)).unwrap();
        for _ in 0..40 {
            anim.update(0.25);
        }
        // Six full cycles pass before the limit is exceeded.
        assert!(anim.is_finished());
        assert_eq!(anim.times_played(), 6);
        assert_eq!(*anim.current_frame(), 4);
    }

    #[test]
    fn test_single_frame_never_advances() {
        let mut anim = Animation::new(vec!["idle"], 0.0, None).unwrap();
        anim.update(10.0);
        assert_eq!(*anim.current_frame(), "idle");
        assert_eq!(anim.times_played(), 0);
    }

    #[test]
    fn test_reset() {
        let mut anim = Animation::new(vec![1, 2], 0.5, Some(1)).unwrap();
        for _ in 0..10 {
            anim.update(0.5);
        }
        anim.reset();
        assert_eq!(anim.frame_index(), 0);
        assert_eq!(anim.times_played(), 0);
        assert!(!anim.is_finished());
    }

    #[test]
    fn test_generate_frames_row_major() {
        let frames = generate_frames(80, 160, 16, 16);
        assert_eq!(frames.len(), 50);
        assert_eq!(frames[0], Rect::new(0.0, 0.0, 16.0, 16.0));
        assert_eq!(frames[4], Rect::new(64.0, 0.0, 16.0, 16.0));
        assert_eq!(frames[5], Rect::new(0.0, 16.0, 16.0, 16.0));
        assert_eq!(frames[49], Rect::new(64.0, 144.0, 16.0, 16.0));
    }

    #[test]
    fn test_generate_frames_skips_partial_sprites() {
        assert_eq!(generate_frames(50, 20, 16, 16).len(), 3);
        assert!(generate_frames(10, 10, 0, 16).is_empty());
    }
}
