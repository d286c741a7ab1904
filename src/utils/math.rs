use crate::error::GeometryFault;
use bevy::math::DVec2;
use std::{cmp::Ordering, f64::consts::TAU};

/// Arguments this far outside `[-1, 1]` are rounding noise rather than a bad request.
const ACOS_SLACK: f64 = 1e-9;

/// Wraps an angle into `[0, 2π)`. NaN passes through untouched.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU {
        0.
    } else {
        wrapped
    }
}

pub fn checked_acos(argument: f64, context: &'static str) -> Result<f64, GeometryFault> {
    if argument.is_nan() || (1. + ACOS_SLACK) < argument.abs() {
        return Err(GeometryFault::AcosDomain { argument, context });
    }

    Ok(argument.clamp(-1., 1.).acos())
}

/// Turning direction implied by consecutive target positions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
    /// Fewer than two targets, or nothing but straight lines on record.
    #[default]
    Indeterminate,
}

impl Orientation {
    /// Sign of the shoelace determinant of `oldest -> middle -> newest`.
    #[rustfmt::skip]
    pub fn of(oldest: DVec2, middle: DVec2, newest: DVec2) -> Self {
        let (a, b) = (middle - oldest, newest - oldest);

        match (a.x * b.y - b.x * a.y).partial_cmp(&0.) {
            Some(Ordering::Less) => Self::Clockwise,
            Some(Ordering::Equal) => Self::Collinear,
            Some(Ordering::Greater) => Self::CounterClockwise,
            None => Self::Indeterminate,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
            other => other,
        }
    }

    /// Direction angles are swept in: counter clockwise adds, clockwise subtracts.
    pub fn signum(self) -> f64 {
        match self {
            Self::Clockwise => -1.,
            Self::CounterClockwise => 1.,
            _ => 0.,
        }
    }
}
