use crate::{error::PlacementError, hit::*, utils::*};
use bevy::math::DVec2;
use itertools::Itertools;
use tinyvec::ArrayVec;

/// Upper bound on how many targets a history can be tuned to remember.
pub const MAX_HISTORY: usize = 16;

/// The most recent targets, oldest first.
#[derive(Debug, Clone)]
pub struct TargetHistory {
    capacity: usize,
    targets: ArrayVec<[Target; MAX_HISTORY]>,
}

impl Default for TargetHistory {
    fn default() -> Self {
        Self::new(15)
    }
}

impl TargetHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.clamp(1, MAX_HISTORY),
            targets: ArrayVec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl '_ + DoubleEndedIterator<Item = &Target> {
        self.targets.iter()
    }

    /// Appends at the tail, evicting the oldest target once full.
    pub fn push(&mut self, target: Target) {
        if self.targets.len() == self.capacity {
            self.targets.remove(0);
        }
        self.targets.push(target);
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn last(&self) -> Result<&Target, PlacementError> {
        self.from_end(0)
    }

    pub fn second_last(&self) -> Result<&Target, PlacementError> {
        self.from_end(1)
    }

    fn from_end(&self, n: usize) -> Result<&Target, PlacementError> {
        self.targets
            .as_slice()
            .from_end(n)
            .ok_or(PlacementError::InsufficientHistory {
                needed: n + 1,
                available: self.targets.len(),
            })
    }

    pub fn resolve(&mut self, order: usize, judgement: Judgement) {
        if let Some(target) = self.targets.iter_mut().find(|target| target.order == order) {
            target.judgement = JudgementState::Resolved(judgement);
        }
    }

    /// Turn direction of the most recent definite turn. Straight runs are
    /// skipped by sliding the three point window further into the past.
    #[rustfmt::skip]
    pub fn orientation(&self) -> Orientation {
        match self.targets.len() {
            0 | 1 => Orientation::Indeterminate,
            2 => Orientation::Collinear,
            _ => self
                .targets
                .iter()
                .rev()
                .map(|target| target.position)
                .tuple_windows()
                .map(|(newest, middle, oldest): (DVec2, DVec2, DVec2)| Orientation::of(oldest, middle, newest))
                .find(|orientation| *orientation != Orientation::Collinear)
                .unwrap_or(Orientation::Indeterminate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn at(x: f64, y: f64) -> Target {
        Target {
            position: DVec2::new(x, y),
            ..Default::default()
        }
    }

    fn history(points: &[(f64, f64)]) -> TargetHistory {
        let mut history = TargetHistory::new(MAX_HISTORY);
        points.iter().for_each(|&(x, y)| history.push(at(x, y)));
        history
    }

    #[test]
    fn evicts_oldest() {
        let mut history = TargetHistory::new(3);
        (0..5).for_each(|i| {
            history.push(Target {
                order: i,
                ..Default::default()
            })
        });

        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().map(|target| target.order).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(history.last().map(|target| target.order), Ok(4));
        assert_eq!(history.second_last().map(|target| target.order), Ok(3));
    }

    #[test]
    fn insufficient_history() {
        let history = history(&[(0., 0.)]);

        assert!(history.last().is_ok());
        assert_eq!(
            history.second_last(),
            Err(PlacementError::InsufficientHistory {
                needed: 2,
                available: 1
            })
        );
    }

    #[test_case(&[], Orientation::Indeterminate; "empty")]
    #[test_case(&[(0., 0.)], Orientation::Indeterminate; "single")]
    #[test_case(&[(0., 0.), (1., 0.)], Orientation::Collinear; "pair")]
    #[test_case(&[(0., 0.), (1., 0.), (1., 1.)], Orientation::CounterClockwise; "left turn")]
    #[test_case(&[(0., 0.), (0., 1.), (1., 0.)], Orientation::Clockwise; "right turn")]
    #[test_case(&[(0., 0.), (1., 0.), (2., 0.)], Orientation::Indeterminate; "all straight")]
    #[test_case(
        &[(0., 0.), (0., 1.), (0.5, 0.5), (1., 0.), (1.5, -0.5)],
        Orientation::Clockwise;
        "straight run after a right turn"
    )]
    #[test_case(
        &[(0., 1.), (0., 0.), (1., 0.), (1., 1.), (2., 0.)],
        Orientation::Clockwise;
        "newest turn wins"
    )]
    fn orientation(points: &[(f64, f64)], expected: Orientation) {
        assert_eq!(history(points).orientation(), expected);
    }

    #[test]
    fn resolves_by_order() {
        let mut history = TargetHistory::new(4);
        (0..3).for_each(|order| history.push(Target { order, ..Default::default() }));

        history.resolve(1, Judgement::Great);
        history.resolve(9, Judgement::Miss);

        assert_eq!(
            history.iter().map(|target| target.judgement).collect::<Vec<_>>(),
            vec![
                JudgementState::Pending,
                JudgementState::Resolved(Judgement::Great),
                JudgementState::Pending,
            ]
        );
    }
}
