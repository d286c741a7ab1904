mod controller;

pub use controller::*;

use bevy::prelude::Deref;

/// Self limiting step for the radius walk: a bump peaking at 0.1 at
/// `x = 0.5` that all but vanishes toward 0 and 1.
pub fn sigmoid_step(x: f64) -> f64 {
    let decay = (-12. * (x - 0.5)).exp();
    (1. / 30.) * (12. * decay) / (1. + decay).powi(2)
}

/// Radius of the circle polar placement puts targets on.
#[derive(Debug, Clone, Copy, PartialEq, Deref)]
pub struct DifficultyRadius(f64);

impl Default for DifficultyRadius {
    fn default() -> Self {
        Self(0.7)
    }
}

impl DifficultyRadius {
    pub const MIN: f64 = 0.2;
    pub const MAX: f64 = 0.9;
    /// Where a radius that falls under `MIN` lands.
    pub const FLOOR_RESET: f64 = 0.3;

    #[rustfmt::skip]
    pub fn new(value: f64) -> Self {
        Self(match value {
            value if value.is_nan() => return Self::default(),
            value if Self::MAX < value => Self::MAX,
            value if value < Self::MIN => Self::FLOOR_RESET,
            value => value,
        })
    }
}
