mod edge;
mod polar;

pub use polar::*;

use crate::{bounds::*, error::*, geometry::*, history::*, hit::Target, timing::Note, utils::*};
use bevy::{math::DVec2, prelude::debug};
use educe::Educe;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_3, TAU};

#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    Target(Target),
    /// Too fine a subdivision for the current difficulty. Never shown or scored.
    Skip(Note),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementMode {
    /// Spacing driven steps from the previous target.
    #[default]
    Cartesian,
    /// Targets on a circle of the difficulty radius around the center.
    Polar,
}

/// How steps in free space bend relative to the previous step.
#[derive(Debug, Clone, Copy, PartialEq, Educe)]
#[educe(Default)]
pub struct TurnPolicy {
    /// Chance of flipping the current turn direction.
    #[educe(Default = 0.7)]
    pub reverse_chance: f64,
    /// Widest deviation from the previous step's heading.
    #[educe(Default(expression = "2. * FRAC_PI_3"))]
    pub max_buffer_angle: f64,
}

/// Uniform draw between two bounds, in either order.
fn random_between(rng: &mut impl Rng, lower: f64, upper: f64) -> f64 {
    lower + rng.gen::<f64>() * (upper - lower)
}

/// Computes where the next target goes. Borrowed from a session for a single placement.
pub struct Placer<'a, R> {
    pub playfield: &'a Playfield,
    pub history: &'a TargetHistory,
    pub policy: TurnPolicy,
    pub rng: &'a mut R,
}

impl<'a, R: Rng> Placer<'a, R> {
    pub fn first_position(&mut self) -> DVec2 {
        self.playfield.random_position(&mut *self.rng)
    }

    /// Position `spacing` away from the most recent target.
    pub fn next_position(&mut self, spacing: f64) -> Result<DVec2, PlacementError> {
        if spacing.is_nan() {
            return Err(GeometryFault::NonFinite {
                context: "measuring spacing",
            }
            .into());
        }

        if spacing.is_infinite() {
            debug!("notes too far apart for spacing to matter, placing anywhere");
            return Ok(self.first_position());
        }

        let last = self.history.last()?.position;

        let candidate = match close_edges(self.playfield, spacing, last).as_slice() {
            [] => self.free(spacing, last)?,
            [side] => self.along_edge(*side, spacing, last)?,
            sides => {
                debug!("{} close edges at spacing {spacing:.3}, falling back to the center", sides.len());
                return Ok(DVec2::ZERO);
            }
        };

        match candidate.is_finite() {
            true => Ok(self.playfield.clamp(candidate)),
            false => Err(GeometryFault::NonFinite {
                context: "stepping from the previous target",
            }
            .into()),
        }
    }

    fn free(&mut self, spacing: f64, last: DVec2) -> Result<DVec2, PlacementError> {
        let orientation = match self.history.orientation() {
            Orientation::Indeterminate => {
                debug!("no turn on record, stepping at a random angle");
                let angle = self.rng.gen::<f64>() * TAU;
                return Ok(last + self.playfield.displacement(spacing, angle));
            }
            Orientation::Collinear => self.any_turn(),
            turn if self.rng.gen_bool(self.policy.reverse_chance) => turn.reverse(),
            turn => turn,
        };

        let buffer = self.rng.gen::<f64>() * self.policy.max_buffer_angle;
        let angle = self.restriction_angle()? + orientation.signum() * buffer;

        Ok(last + self.playfield.displacement(spacing, angle))
    }

    /// Heading of the step from the second last to the last target.
    fn restriction_angle(&self) -> Result<f64, PlacementError> {
        let (last, second_last) = (self.history.last()?, self.history.second_last()?);
        Ok(PolarVec2::from_cartesian(last.position - second_last.position).angle())
    }

    fn any_turn(&mut self) -> Orientation {
        match self.rng.gen_bool(0.5) {
            true => Orientation::Clockwise,
            false => Orientation::CounterClockwise,
        }
    }
}
