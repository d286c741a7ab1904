use crate::utils::*;
use bevy::math::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Magnitude and an angle that is kept in `[0, 2π)` at all times.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PolarVec2 {
    pub magnitude: f64,
    angle: f64,
}

impl PolarVec2 {
    pub fn new(magnitude: f64, angle: f64) -> Self {
        Self {
            magnitude,
            angle: normalize_angle(angle),
        }
    }

    pub fn from_cartesian(vector: DVec2) -> Self {
        Self::new(vector.length(), vector.y.atan2(vector.x))
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f64) {
        self.angle = normalize_angle(angle);
    }

    /// The x axis is squeezed by `aspect_ratio` (width / height) so that equal
    /// magnitudes look equally long on a non square playfield.
    pub fn to_cartesian(&self, aspect_ratio: f64) -> DVec2 {
        DVec2::new(
            self.magnitude * self.angle.cos() / aspect_ratio,
            self.magnitude * self.angle.sin(),
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Direction pointing from the playfield center through this side.
    pub fn normal_angle(self) -> f64 {
        match self {
            Self::Right => 0.,
            Self::Top => FRAC_PI_2,
            Self::Left => PI,
            Self::Bottom => 3. * FRAC_PI_2,
        }
    }
}

/// The normalized `[-1, 1] x [-1, 1]` play area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playfield {
    aspect_ratio: f64,
}

impl Default for Playfield {
    fn default() -> Self {
        Self { aspect_ratio: 1. }
    }
}

impl Playfield {
    pub fn new(aspect_ratio: f64) -> Self {
        Self { aspect_ratio }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn displacement(&self, distance: f64, angle: f64) -> DVec2 {
        PolarVec2::new(distance, angle).to_cartesian(self.aspect_ratio)
    }

    pub fn contains(&self, position: DVec2) -> bool {
        self.contains_within(position, 0.)
    }

    pub fn contains_within(&self, position: DVec2, slack: f64) -> bool {
        let bound = 1. + slack;
        (-bound..=bound).contains(&position.x) && (-bound..=bound).contains(&position.y)
    }

    pub fn clamp(&self, position: DVec2) -> DVec2 {
        DVec2::new(position.x.clamp(-1., 1.), position.y.clamp(-1., 1.))
    }

    /// Perpendicular distance from `position` to `side`.
    #[rustfmt::skip]
    pub fn distance_to(&self, side: Side, position: DVec2) -> f64 {
        match side {
            Side::Top => (1. - position.y).abs(),
            Side::Right => (1. - position.x).abs(),
            Side::Bottom => (-1. - position.y).abs(),
            Side::Left => (-1. - position.x).abs(),
        }
    }

    pub fn random_position(&self, rng: &mut impl Rng) -> DVec2 {
        DVec2::new(rng.gen::<f64>() * 2. - 1., rng.gen::<f64>() * 2. - 1.)
    }
}
