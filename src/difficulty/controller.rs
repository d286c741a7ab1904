use super::*;
use crate::hit::Judgement;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

/// Weight of the instantaneous health change in the error integrating controller.
const PROPORTIONAL_GAIN: f64 = 0.001;
/// Weight of the change of that change.
const DERIVATIVE_GAIN: f64 = 0.001;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Calibration {
    /// ±0.01 for Great, ±0.03 for Perfect / Miss.
    #[default]
    Moderate,
    /// ±0.03 for Great, ±0.1 for Perfect / Miss.
    Aggressive,
}

impl Calibration {
    #[rustfmt::skip]
    fn step(self, judgement: Judgement) -> f64 {
        let (fine, coarse) = match self {
            Self::Moderate => (0.01, 0.03),
            Self::Aggressive => (0.03, 0.1),
        };

        match judgement {
            Judgement::Perfect => coarse,
            Judgement::Great => fine,
            Judgement::Okay => 0.,
            Judgement::Meh => -fine,
            Judgement::Miss => -coarse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerKind {
    Constant,
    RadiusWalk,
    HealthBar(Calibration),
    ErrorIntegrating,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerChoice {
    /// Drawn from the same roster play testing used, which favors `Constant`.
    #[default]
    Random,
    Fixed(ControllerKind),
}

impl ControllerChoice {
    pub const ROSTER: [ControllerKind; 6] = [
        ControllerKind::RadiusWalk,
        ControllerKind::HealthBar(Calibration::Moderate),
        ControllerKind::ErrorIntegrating,
        ControllerKind::Constant,
        ControllerKind::Constant,
        ControllerKind::Constant,
    ];

    pub fn select(self, rng: &mut impl Rng) -> ControllerKind {
        match self {
            Self::Fixed(kind) => kind,
            Self::Random => *Self::ROSTER.choose(rng).unwrap_or(&ControllerKind::Constant),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ErrorIntegrator {
    health: f64,
    delta: f64,
    total_delta: f64,
    delta_rate: f64,
    difficulty: f64,
}

impl ErrorIntegrator {
    #[rustfmt::skip]
    fn health_change(judgement: Judgement) -> f64 {
        match judgement {
            Judgement::Perfect => 0.5,
            Judgement::Great => 0.1,
            Judgement::Okay => 0.,
            Judgement::Meh => -0.1,
            Judgement::Miss => -0.5,
        }
    }

    fn judge(&mut self, judgement: Judgement) {
        let (last_health, last_delta) = (self.health, self.delta);

        self.health += Self::health_change(judgement);
        self.delta = self.health - last_health;
        self.total_delta += self.delta;
        self.delta_rate = self.delta - last_delta;
        // the integral term is only reined in after it has been used
        self.difficulty = self.delta * PROPORTIONAL_GAIN + self.total_delta + self.delta_rate * DERIVATIVE_GAIN;
        self.total_delta = self.total_delta.clamp(0., 1.);
    }
}

/// Turns judgements into a difficulty signal. One is picked per session.
#[derive(Debug, Clone, PartialEq)]
pub enum Controller {
    Constant(f64),
    RadiusWalk(DifficultyRadius),
    HealthBar { calibration: Calibration, health: f64 },
    ErrorIntegrating(ErrorIntegrator),
}

impl Controller {
    pub fn new(kind: ControllerKind) -> Self {
        match kind {
            ControllerKind::Constant => Self::Constant(0.),
            ControllerKind::RadiusWalk => Self::RadiusWalk(DifficultyRadius::default()),
            ControllerKind::HealthBar(calibration) => Self::HealthBar {
                calibration,
                health: 0.5,
            },
            ControllerKind::ErrorIntegrating => Self::ErrorIntegrating(ErrorIntegrator::default()),
        }
    }

    pub fn kind(&self) -> ControllerKind {
        match self {
            Self::Constant(_) => ControllerKind::Constant,
            Self::RadiusWalk(_) => ControllerKind::RadiusWalk,
            Self::HealthBar { calibration, .. } => ControllerKind::HealthBar(*calibration),
            Self::ErrorIntegrating(_) => ControllerKind::ErrorIntegrating,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant(_) => "Constant",
            Self::RadiusWalk(_) => "Radius",
            Self::HealthBar { calibration: Calibration::Moderate, .. } => "Alternate",
            Self::HealthBar { calibration: Calibration::Aggressive, .. } => "Aggressive",
            Self::ErrorIntegrating(_) => "PID",
        }
    }

    /// Seeds the controller before the first judgement arrives.
    pub fn set_initial(&mut self, value: f64) {
        match self {
            Self::Constant(constant) => *constant = value,
            Self::RadiusWalk(radius) => *radius = DifficultyRadius::new(value),
            Self::HealthBar { health, .. } => *health = value.clamp(0., 1.),
            Self::ErrorIntegrating(integrator) => integrator.total_delta = value,
        }
    }

    pub fn on_judgement(&mut self, judgement: Judgement) {
        match self {
            Self::Constant(_) => {}
            Self::RadiusWalk(radius) => {
                let step = sigmoid_step(**radius);
                match judgement {
                    Judgement::Great => *radius = DifficultyRadius::new(**radius + step),
                    Judgement::Miss => *radius = DifficultyRadius::new(**radius - step),
                    _ => {}
                }
            }
            Self::HealthBar { calibration, health } => {
                *health = (*health + calibration.step(judgement)).clamp(0., 1.)
            }
            Self::ErrorIntegrating(integrator) => integrator.judge(judgement),
        }
    }

    pub fn current_value(&self) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::RadiusWalk(radius) => **radius,
            Self::HealthBar { health, .. } => *health,
            Self::ErrorIntegrating(integrator) => integrator.difficulty,
        }
    }
}
