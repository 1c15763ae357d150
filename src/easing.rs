//! Easing curves for tweens.
//!
//! An easing function maps normalized progress `t` in `[0, 1]` to eased
//! progress. All 31 curves are available both as [`Easing`] variants and by
//! their string key (`"linear"`, `"in_sine"`, `"out_bounce"`, ...), which is
//! how [`TimerRegistry::schedule_tween`](crate::timer::TimerRegistry) and
//! config files refer to them.
//!
//! Every curve satisfies `f(0) == 0` and `f(1) == 1` within `1e-5`. Back and
//! elastic curves overshoot `[0, 1]` between the endpoints, bounce curves are
//! not monotonic; the others are.
//!
//! # Example
//!
//! ```
//! use stepframe::easing::{Easing, ease};
//!
//! let e: Easing = "out_quad".parse().unwrap();
//! assert_eq!(ease(e, 0.5), 0.75);
//! ```

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Tolerance used to snap the expo/elastic endpoints.
const ENDPOINT_EPSILON: f32 = 1e-5;

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;
const BOUNCE_N1: f32 = 7.5625;
const BOUNCE_D1: f32 = 2.75;

/// Named easing curves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed (no easing).
    #[default]
    Linear,
    InSine,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    /// Pulls back slightly below 0 before accelerating.
    InBack,
    /// Overshoots 1 before settling.
    OutBack,
    InOutBack,
    /// Oscillates with growing amplitude.
    InElastic,
    /// Oscillates around 1 with decaying amplitude.
    OutElastic,
    InOutElastic,
    InBounce,
    /// Bounces against 1 like a dropped ball.
    OutBounce,
    InOutBounce,
}

impl Easing {
    /// Every curve, in key-table order.
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InQuart,
        Easing::OutQuart,
        Easing::InOutQuart,
        Easing::InQuint,
        Easing::OutQuint,
        Easing::InOutQuint,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InCirc,
        Easing::OutCirc,
        Easing::InOutCirc,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InElastic,
        Easing::OutElastic,
        Easing::InOutElastic,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];

    /// String key of this curve.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::InSine => "in_sine",
            Easing::OutSine => "out_sine",
            Easing::InOutSine => "in_out_sine",
            Easing::InQuad => "in_quad",
            Easing::OutQuad => "out_quad",
            Easing::InOutQuad => "in_out_quad",
            Easing::InCubic => "in_cubic",
            Easing::OutCubic => "out_cubic",
            Easing::InOutCubic => "in_out_cubic",
            Easing::InQuart => "in_quart",
            Easing::OutQuart => "out_quart",
            Easing::InOutQuart => "in_out_quart",
            Easing::InQuint => "in_quint",
            Easing::OutQuint => "out_quint",
            Easing::InOutQuint => "in_out_quint",
            Easing::InExpo => "in_expo",
            Easing::OutExpo => "out_expo",
            Easing::InOutExpo => "in_out_expo",
            Easing::InCirc => "in_circ",
            Easing::OutCirc => "out_circ",
            Easing::InOutCirc => "in_out_circ",
            Easing::InBack => "in_back",
            Easing::OutBack => "out_back",
            Easing::InOutBack => "in_out_back",
            Easing::InElastic => "in_elastic",
            Easing::OutElastic => "out_elastic",
            Easing::InOutElastic => "in_out_elastic",
            Easing::InBounce => "in_bounce",
            Easing::OutBounce => "out_bounce",
            Easing::InOutBounce => "in_out_bounce",
        }
    }

    /// Whether the curve never decreases over `[0, 1]`.
    pub fn is_monotonic(self) -> bool {
        !matches!(
            self,
            Easing::InBack
                | Easing::OutBack
                | Easing::InOutBack
                | Easing::InElastic
                | Easing::OutElastic
                | Easing::InOutElastic
                | Easing::InBounce
                | Easing::OutBounce
                | Easing::InOutBounce
        )
    }

    /// Shorthand for [`ease`].
    pub fn apply(self, t: f32) -> f32 {
        ease(self, t)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| Error::InvalidEaseName(s.to_string()))
    }
}

fn near(a: f32, b: f32) -> bool {
    (a - b).abs() < ENDPOINT_EPSILON
}

fn at_endpoint(t: f32) -> Option<f32> {
    if near(t, 0.0) {
        Some(0.0)
    } else if near(t, 1.0) {
        Some(1.0)
    } else {
        None
    }
}

fn out_bounce(t: f32) -> f32 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984375
    }
}

/// Apply an easing function to a normalized time value.
///
/// The input `t` is clamped to [0.0, 1.0] and transformed according to the
/// easing curve.
pub fn ease(e: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match e {
        Easing::Linear => t,
        Easing::InSine => 1.0 - ((PI * t) / 2.0).cos(),
        Easing::OutSine => ((PI * t) / 2.0).sin(),
        Easing::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
        Easing::InQuad => t * t,
        Easing::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
        Easing::InOutQuad => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::InCubic => t * t * t,
        Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
        Easing::InOutCubic => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }
        Easing::InQuart => t * t * t * t,
        Easing::OutQuart => 1.0 - (1.0 - t).powi(4),
        Easing::InOutQuart => {
            if t < 0.5 {
                8.0 * t * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
            }
        }
        Easing::InQuint => t * t * t * t * t,
        Easing::OutQuint => 1.0 - (1.0 - t).powi(5),
        Easing::InOutQuint => {
            if t < 0.5 {
                16.0 * t * t * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
            }
        }
        Easing::InExpo => {
            if near(t, 0.0) {
                0.0
            } else {
                2f32.powf(10.0 * t - 10.0)
            }
        }
        Easing::OutExpo => {
            if near(t, 1.0) {
                1.0
            } else {
                1.0 - 2f32.powf(-10.0 * t)
            }
        }
        Easing::InOutExpo => {
            if let Some(v) = at_endpoint(t) {
                v
            } else if t < 0.5 {
                2f32.powf(20.0 * t - 10.0) / 2.0
            } else {
                (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
            }
        }
        Easing::InCirc => 1.0 - (1.0 - t * t).sqrt(),
        Easing::OutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
        Easing::InOutCirc => {
            if t < 0.5 {
                (1.0 - (1.0 - 4.0 * t * t).sqrt()) / 2.0
            } else {
                ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
            }
        }
        Easing::InBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
        Easing::OutBack => 1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2),
        Easing::InOutBack => {
            if t < 0.5 {
                (4.0 * t * t * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
            } else {
                ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2) + 2.0)
                    / 2.0
            }
        }
        Easing::InElastic => match at_endpoint(t) {
            Some(v) => v,
            None => -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin(),
        },
        Easing::OutElastic => match at_endpoint(t) {
            Some(v) => v,
            None => 2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0,
        },
        Easing::InOutElastic => match at_endpoint(t) {
            Some(v) => v,
            None if t < 0.5 => {
                -0.5 * 2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()
            }
            None => {
                2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin() * 0.5 + 1.0
            }
        },
        Easing::InBounce => 1.0 - out_bounce(1.0 - t),
        Easing::OutBounce => out_bounce(t),
        Easing::InOutBounce => {
            if t < 0.5 {
                (1.0 - out_bounce(1.0 - 2.0 * t)) / 2.0
            } else {
                (1.0 + out_bounce(2.0 * t - 1.0)) / 2.0
            }
        }
    }
}

/// Linearly interpolate between two floats.
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
