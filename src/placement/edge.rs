use super::*;
use std::f64::consts::{FRAC_PI_2, PI};

/// Rounding noise tolerated before an edge step counts as leaving the playfield.
const EDGE_SLACK: f64 = 1e-9;

/// Headings that step away from `side` without crossing it. The lower bound
/// may sit below zero so the interval stays contiguous.
fn open_interval(side: Side, buffer: f64) -> (f64, f64) {
    match side {
        Side::Right => (buffer, TAU - buffer),
        side => (side.normal_angle() + buffer - TAU, side.normal_angle() - buffer),
    }
}

/// Headings that keep turning in `orientation` while staying clear of `side`.
#[rustfmt::skip]
fn turning_interval(side: Side, buffer: f64, restriction: f64, orientation: Orientation, max_buffer: f64) -> (f64, f64) {
    match (orientation, side) {
        (Orientation::CounterClockwise, Side::Right) => (restriction.max(buffer), restriction + max_buffer),
        (Orientation::CounterClockwise, side) => (restriction.max(side.normal_angle() + buffer), restriction + max_buffer),
        (_, Side::Top) => {
            let signed = if PI < restriction { restriction - TAU } else { restriction };
            (signed - max_buffer, signed.min(FRAC_PI_2 - buffer))
        }
        (_, Side::Right) => (restriction - max_buffer, restriction.min(TAU - buffer)),
        (_, side) => (restriction - max_buffer, restriction.min(side.normal_angle() - buffer)),
    }
}

impl<'a, R: Rng> Placer<'a, R> {
    /// Step from `last` while exactly one side is within reach.
    pub(super) fn along_edge(&mut self, side: Side, spacing: f64, last: DVec2) -> Result<DVec2, PlacementError> {
        let buffer = checked_acos(
            self.playfield.distance_to(side, last) / spacing,
            "bounding a step near an edge",
        )?;

        let (lower, upper) = match self.history.orientation() {
            Orientation::Indeterminate => open_interval(side, buffer),
            Orientation::Collinear => {
                let turn = self.any_turn();
                turning_interval(side, buffer, self.restriction_angle()?, turn, self.policy.max_buffer_angle)
            }
            turn => turning_interval(side, buffer, self.restriction_angle()?, turn, self.policy.max_buffer_angle),
        };

        let angle = random_between(&mut *self.rng, lower, upper);
        let candidate = last + self.playfield.displacement(spacing, angle);

        if self.playfield.contains_within(candidate, EDGE_SLACK) {
            return Ok(candidate);
        }

        debug!("step near the {side:?} edge left the playfield, resampling away from it");
        let (lower, upper) = open_interval(side, buffer);
        let angle = random_between(&mut *self.rng, lower, upper);

        Ok(last + self.playfield.displacement(spacing, angle))
    }
}
