//! Easing function table mapping linear animation progress to eased progress.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Named easing curves available to animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    #[default]
    EaseOutQuart,
    EaseInOutQuart,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseOutExpo,
    EaseOutCirc,
    EaseOutBounce,
    EaseOutElastic,
}

impl Easing {
    /// Maps progress in `[0, 1]` to eased progress.
    ///
    /// Input outside the unit interval is clamped so callers advancing by
    /// fixed steps never overshoot the curve endpoints.
    #[must_use]
    pub fn apply(self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Self::EaseInQuart => t * t * t * t,
            Self::EaseOutQuart => {
                let u = t - 1.0;
                1.0 - u * u * u * u
            }
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 - 8.0 * u * u * u * u
                }
            }
            Self::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Self::EaseOutSine => (t * PI / 2.0).sin(),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * t)
                }
            }
            Self::EaseOutCirc => {
                let u = t - 1.0;
                (1.0 - u * u).sqrt()
            }
            Self::EaseOutBounce => {
                const N1: f64 = 7.5625;
                const D1: f64 = 2.75;
                if t < 1.0 / D1 {
                    N1 * t * t
                } else if t < 2.0 / D1 {
                    let u = t - 1.5 / D1;
                    N1 * u * u + 0.75
                } else if t < 2.5 / D1 {
                    let u = t - 2.25 / D1;
                    N1 * u * u + 0.9375
                } else {
                    let u = t - 2.625 / D1;
                    N1 * u * u + 0.984375
                }
            }
            Self::EaseOutElastic => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    let c4 = (2.0 * PI) / 3.0;
                    2.0_f64.powf(-10.0 * t) * ((10.0 * t - 0.75) * c4).sin() + 1.0
                }
            }
        }
    }
}
