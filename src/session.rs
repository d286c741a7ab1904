use crate::{
    config::Settings,
    difficulty::*,
    error::PlacementError,
    geometry::{Playfield, PolarVec2},
    history::TargetHistory,
    hit::*,
    placement::*,
    timing::*,
};
use bevy::{
    math::DVec2,
    prelude::{debug, info, warn},
};
use rand::{rngs::SmallRng, SeedableRng};
use std::fmt;

/// Turns a note stream into targets one note at a time and feeds judgements
/// back into the difficulty. Owns all state for one play through.
pub struct Session {
    settings: Settings,
    playfield: Playfield,
    rng: SmallRng,
    notes: Vec<Note>,
    cursor: usize,
    history: TargetHistory,
    controller: Controller,
    scoring: Scoring,
    overall: f64,
    radius: DifficultyRadius,
    next_order: usize,
}

impl Session {
    pub fn new(settings: Settings, notes: Vec<Note>) -> Self {
        let settings = settings.sanitized();
        let mut rng = settings
            .seed
            .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);

        let mut controller = Controller::new(settings.controller.select(&mut rng));
        controller.set_initial(settings.initial_difficulty);

        let notes = prepare_notes(notes);
        info!(
            "starting a session of {} notes, difficulty managed by {}",
            notes.len(),
            controller.name()
        );

        let initial_difficulty = settings.initial_difficulty;
        let mut session = Self {
            playfield: settings.playfield(),
            history: TargetHistory::new(settings.history_capacity),
            settings,
            rng,
            notes,
            cursor: 0,
            controller,
            scoring: Scoring::default(),
            overall: initial_difficulty,
            radius: DifficultyRadius::default(),
            next_order: 0,
        };
        session.set_difficulty(initial_difficulty);
        session
    }

    pub fn from_tracks(settings: Settings, tracks: &[Track]) -> Self {
        Self::new(settings, merge_tracks(tracks))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &TargetHistory {
        &self.history
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn scoring(&self) -> &Scoring {
        &self.scoring
    }

    /// Pulls placements in note order until the notes run out.
    pub fn targets(&mut self) -> Targets<'_> {
        Targets { session: self }
    }

    pub fn peek_note(&self) -> Option<&Note> {
        self.notes.get(self.cursor)
    }

    pub fn remaining(&self) -> usize {
        self.notes.len() - self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Places the next note. A failed placement still consumes its note.
    pub fn next_placement(&mut self) -> Option<Result<Placement, PlacementError>> {
        let note = *self.notes.get(self.cursor)?;
        self.cursor += 1;

        let placement = self.place(note);
        if let Err(error) = &placement {
            warn!("could not place the note at {:.3}s: {error}", note.start.raw());
        }

        if self.is_finished() {
            info!("all notes placed, {} targets in total", self.next_order);
        }

        Some(placement)
    }

    fn place(&mut self, note: Note) -> Result<Placement, PlacementError> {
        let spacing = match self.history.last().ok() {
            None => None,
            Some(last) => match spacing_for(&last.note, &note, note.tempo.raw(), self.overall) {
                Spacing::Skip => {
                    debug!("skipping the note at {:.3}s at difficulty {:.2}", note.start.raw(), self.overall);
                    return Ok(Placement::Skip(note));
                }
                Spacing::Distance(distance) => Some(distance),
            },
        };

        let mut placer = Placer {
            playfield: &self.playfield,
            history: &self.history,
            policy: self.settings.turn_policy(),
            rng: &mut self.rng,
        };

        let (position, polar): (DVec2, Option<PolarVec2>) = match (self.settings.placement_mode, spacing) {
            (PlacementMode::Cartesian, None) => (placer.first_position(), None),
            (PlacementMode::Cartesian, Some(spacing)) => (placer.next_position(spacing)?, None),
            (PlacementMode::Polar, None) => {
                let polar = placer.first_polar(self.radius);
                (self.playfield.clamp(polar.to_cartesian(self.playfield.aspect_ratio())), Some(polar))
            }
            (PlacementMode::Polar, Some(_)) => {
                let polar = placer.next_polar(self.radius, self.overall)?;
                (self.playfield.clamp(polar.to_cartesian(self.playfield.aspect_ratio())), Some(polar))
            }
        };

        let target = Target {
            position,
            polar,
            note,
            order: self.next_order,
            judgement: JudgementState::Pending,
        };

        self.history.push(target);
        self.next_order += 1;
        Ok(Placement::Target(target))
    }

    /// Scores `judgement` for the target numbered `order` and lets the
    /// controller react. Returns whether it was accepted.
    pub fn process_judgement(&mut self, judgement: Judgement, order: usize) -> bool {
        if self.next_order <= order || !self.scoring.record(judgement, order) {
            warn!(
                "rejected {judgement:?} for target {order}, expecting target {}",
                self.scoring.next_order()
            );
            return false;
        }

        self.history.resolve(order, judgement);
        self.controller.on_judgement(judgement);
        self.set_difficulty(self.controller.current_value());
        true
    }

    /// Overall difficulty for cartesian placement, the difficulty radius for polar.
    pub fn difficulty(&self) -> f64 {
        match self.settings.placement_mode {
            PlacementMode::Cartesian => self.overall,
            PlacementMode::Polar => *self.radius,
        }
    }

    pub fn set_difficulty(&mut self, value: f64) {
        if value.is_nan() {
            warn!("ignoring a NaN difficulty");
            return;
        }

        match self.settings.placement_mode {
            PlacementMode::Cartesian => self.overall = value.clamp(0., 1.),
            PlacementMode::Polar => self.radius = DifficultyRadius::new(value),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            controller: self.controller.name(),
            difficulty: self.difficulty(),
            score: self.scoring.score,
            combo: self.scoring.combo,
        }
    }
}

pub struct Targets<'a> {
    session: &'a mut Session,
}

impl Iterator for Targets<'_> {
    type Item = Result<Placement, PlacementError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.session.next_placement()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.session.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Targets<'_> {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub controller: &'static str,
    pub difficulty: f64,
    pub score: u64,
    pub combo: u64,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "manager:{},difficulty:{},score:{}",
            self.controller, self.difficulty, self.score
        )
    }
}
