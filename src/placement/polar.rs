use super::*;
use crate::difficulty::DifficultyRadius;

/// Step length between consecutive polar targets.
pub fn chord_length(previous_radius: f64, radius: f64, overall_difficulty: f64) -> Result<f64, GeometryFault> {
    let proposed = overall_difficulty / (10. * radius);
    let limit = radius + previous_radius;

    match proposed {
        _ if limit <= proposed => Err(GeometryFault::TriangleInequality { proposed, limit }),
        _ if proposed < 0. => Ok(0.3),
        _ => Ok(proposed),
    }
}

impl<'a, R: Rng> Placer<'a, R> {
    pub fn first_polar(&mut self, radius: DifficultyRadius) -> PolarVec2 {
        PolarVec2::new(*radius, self.rng.gen::<f64>() * TAU)
    }

    /// Next point on the circle of `radius`, a chord's length away from the last target.
    pub fn next_polar(&mut self, radius: DifficultyRadius, overall_difficulty: f64) -> Result<PolarVec2, PlacementError> {
        let last = self.history.last()?;
        let previous = last
            .polar
            .unwrap_or_else(|| PolarVec2::from_cartesian(last.position));

        let length = chord_length(previous.magnitude, *radius, overall_difficulty)?;
        let turn = checked_acos(
            (length.powi(2) - previous.magnitude.powi(2) - radius.powi(2)) / (-2. * previous.magnitude * *radius),
            "turning along the difficulty circle",
        )?;

        let sign = if self.rng.gen_bool(0.5) { 1. } else { -1. };
        Ok(PolarVec2::new(*radius, previous.angle() + sign * turn))
    }
}
