use crate::{geometry::PolarVec2, timing::Note};
use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

/// Anything later than this is a miss, and unanswered targets are missed once it elapses.
pub const MISS_AFTER: f64 = 0.4;

/// Quality of a response, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Judgement {
    Perfect,
    Great,
    Okay,
    Meh,
    Miss,
}

impl Judgement {
    pub const ALL: [Self; 5] = [Self::Perfect, Self::Great, Self::Okay, Self::Meh, Self::Miss];

    pub fn points(self) -> u64 {
        match self {
            Self::Perfect => 315,
            Self::Great => 300,
            Self::Okay => 100,
            Self::Meh => 50,
            Self::Miss => 0,
        }
    }

    /// Rates a response `offset` seconds away from the target's start.
    #[rustfmt::skip]
    pub fn from_offset(offset: f64) -> Self {
        match offset.abs() {
            error if error == 0. => Self::Perfect,
            error if error <= 0.1 => Self::Great,
            error if error <= 0.15 => Self::Okay,
            error if error <= MISS_AFTER => Self::Meh,
            _ => Self::Miss,
        }
    }

    pub fn breaks_combo(self) -> bool {
        matches!(self, Self::Meh | Self::Miss)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum JudgementState {
    #[default]
    Pending,
    Resolved(Judgement),
}

/// A placed hit object.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Target {
    /// Normalized playfield coordinates, both axes in `[-1, 1]`.
    pub position: DVec2,
    /// Only recorded by polar placement.
    pub polar: Option<PolarVec2>,
    pub note: Note,
    pub order: usize,
    pub judgement: JudgementState,
}

/// Score and combo. Also the one place that decides whether a judgement is in order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Scoring {
    pub score: u64,
    pub combo: u64,
    judged: usize,
}

impl Scoring {
    /// Order of the only target a judgement is currently accepted for.
    pub fn next_order(&self) -> usize {
        self.judged
    }

    pub fn record(&mut self, judgement: Judgement, order: usize) -> bool {
        if order != self.judged {
            return false;
        }

        self.combo = match judgement.breaks_combo() {
            true => 1,
            false => self.combo + 1,
        };
        self.score += self.combo * judgement.points();
        self.judged += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(0., Judgement::Perfect; "dead on")]
    #[test_case(-0.05, Judgement::Great; "slightly early")]
    #[test_case(0.1, Judgement::Great; "great edge")]
    #[test_case(0.12, Judgement::Okay; "okay")]
    #[test_case(-0.3, Judgement::Meh; "early meh")]
    #[test_case(0.4, Judgement::Meh; "meh edge")]
    #[test_case(0.41, Judgement::Miss; "late")]
    fn hit_windows(offset: f64, expected: Judgement) {
        assert_eq!(Judgement::from_offset(offset), expected);
    }

    #[test]
    fn points_fall_from_best_to_worst() {
        Judgement::ALL
            .windows(2)
            .for_each(|pair| assert!(pair[1].points() < pair[0].points()));
    }

    #[test]
    fn combo_scoring() {
        let mut scoring = Scoring::default();

        assert!(scoring.record(Judgement::Great, 0));
        assert!(scoring.record(Judgement::Perfect, 1));
        assert_eq!((scoring.score, scoring.combo), (300 + 2 * 315, 2));

        assert!(scoring.record(Judgement::Meh, 2));
        assert_eq!((scoring.score, scoring.combo), (300 + 2 * 315 + 50, 1));
    }

    #[test]
    fn out_of_order_judgements_are_rejected() {
        let mut scoring = Scoring::default();

        assert!(!scoring.record(Judgement::Great, 1));
        assert!(scoring.record(Judgement::Miss, 0));
        assert!(!scoring.record(Judgement::Great, 0));
        assert_eq!(scoring.next_order(), 1);
        assert_eq!(scoring.score, 0);
    }
}
