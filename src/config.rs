use crate::{
    difficulty::ControllerChoice,
    geometry::Playfield,
    history::MAX_HISTORY,
    hit::MISS_AFTER,
    placement::{PlacementMode, TurnPolicy},
};
use bevy::prelude::{warn, Resource};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_3, TAU};

/// Orientation needs three targets, so shorter histories are raised to this.
pub const MIN_HISTORY: usize = 3;

/// Everything a session can be tuned with. Missing fields take their defaults
/// when deserialized.
#[derive(Debug, Clone, PartialEq, Resource, Serialize, Deserialize, Educe)]
#[educe(Default)]
#[serde(default)]
pub struct Settings {
    /// Playfield width over height.
    #[educe(Default = 1.0)]
    pub aspect_ratio: f64,
    #[educe(Default = 15)]
    pub history_capacity: usize,
    pub placement_mode: PlacementMode,
    #[educe(Default = 0.7)]
    pub reverse_chance: f64,
    #[educe(Default(expression = "2. * FRAC_PI_3"))]
    pub max_buffer_angle: f64,
    #[educe(Default = 0.3)]
    pub initial_difficulty: f64,
    pub controller: ControllerChoice,
    /// Fixed seed for reproducible sessions, entropy otherwise.
    pub seed: Option<u64>,
    /// Seconds ahead of the song clock targets are placed.
    #[educe(Default = 0.5)]
    pub lookahead: f64,
    /// Seconds after its start an unanswered target is missed.
    #[educe(Default(expression = "MISS_AFTER"))]
    pub miss_after: f64,
    #[educe(Default = 5)]
    pub max_spawns_per_tick: usize,
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    match value.is_finite() {
        true => value,
        false => fallback,
    }
}

impl Settings {
    /// Pulls every field back into the range placement can work with.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();

        let aspect_ratio = match self.aspect_ratio {
            ratio if ratio.is_finite() && 0. < ratio => ratio,
            ratio => {
                warn!("aspect ratio {ratio} is unusable, assuming a square playfield");
                defaults.aspect_ratio
            }
        };

        Self {
            aspect_ratio,
            history_capacity: self.history_capacity.clamp(MIN_HISTORY, MAX_HISTORY),
            reverse_chance: finite_or(self.reverse_chance, defaults.reverse_chance).clamp(0., 1.),
            max_buffer_angle: finite_or(self.max_buffer_angle, defaults.max_buffer_angle).clamp(0., TAU),
            initial_difficulty: finite_or(self.initial_difficulty, defaults.initial_difficulty).clamp(0., 1.),
            lookahead: finite_or(self.lookahead, defaults.lookahead).max(0.),
            miss_after: finite_or(self.miss_after, defaults.miss_after).max(0.),
            max_spawns_per_tick: self.max_spawns_per_tick.max(1),
            ..self
        }
    }

    pub fn playfield(&self) -> Playfield {
        Playfield::new(self.aspect_ratio)
    }

    pub fn turn_policy(&self) -> TurnPolicy {
        TurnPolicy {
            reverse_chance: self.reverse_chance,
            max_buffer_angle: self.max_buffer_angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::{Calibration, ControllerKind};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn defaults() {
        let settings = Settings::default();

        assert_eq!(settings.history_capacity, 15);
        assert_eq!(settings.placement_mode, PlacementMode::Cartesian);
        assert_eq!(settings.controller, ControllerChoice::Random);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.miss_after, 0.4);
        assert_relative_eq!(settings.max_buffer_angle, 2. * FRAC_PI_3);
        assert_eq!(settings.turn_policy(), TurnPolicy::default());
    }

    #[test]
    fn partial_documents_fill_in_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{
                "aspect_ratio": 1.7777,
                "placement_mode": "Polar",
                "controller": { "Fixed": { "HealthBar": "Aggressive" } },
                "seed": 42
            }"#,
        )
        .unwrap();

        assert_eq!(
            settings,
            Settings {
                aspect_ratio: 1.7777,
                placement_mode: PlacementMode::Polar,
                controller: ControllerChoice::Fixed(ControllerKind::HealthBar(Calibration::Aggressive)),
                seed: Some(42),
                ..Default::default()
            }
        );
    }

    #[test_case(1, 3; "too short for orientation")]
    #[test_case(15, 15; "default")]
    #[test_case(100, MAX_HISTORY; "too long")]
    fn history_capacity_is_bounded(requested: usize, expected: usize) {
        let settings = Settings {
            history_capacity: requested,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(settings.history_capacity, expected);
    }

    #[test]
    fn nonsense_is_pulled_back() {
        let settings = Settings {
            aspect_ratio: -2.,
            reverse_chance: 3.,
            initial_difficulty: f64::NAN,
            lookahead: -1.,
            max_spawns_per_tick: 0,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(settings.aspect_ratio, 1.);
        assert_eq!(settings.reverse_chance, 1.);
        assert_eq!(settings.initial_difficulty, 0.3);
        assert_eq!(settings.lookahead, 0.);
        assert_eq!(settings.max_spawns_per_tick, 1);
    }
}
