use crate::geometry::*;
use bevy::math::DVec2;
use tinyvec::ArrayVec;

pub type CloseEdges = ArrayVec<[Side; 4]>;

/// Sides a step of `distance` straight toward them from `previous` would cross.
#[rustfmt::skip]
pub fn close_edges(playfield: &Playfield, distance: f64, previous: DVec2) -> CloseEdges {
    [Side::Right, Side::Top, Side::Left, Side::Bottom]
        .into_iter()
        .filter(|side| !playfield.contains(previous + playfield.displacement(distance, side.normal_angle())))
        .collect()
}
