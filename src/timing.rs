pub mod landmarks;

use crate::utils::*;
use itertools::Itertools;
use tap::Tap;

/// Overall difficulty below which anything finer than one division per beat is dropped.
const SINGLE_DIVISION_BELOW: f64 = 0.25;
/// Overall difficulty below which anything finer than two divisions per beat is dropped.
const DOUBLE_DIVISION_BELOW: f64 = 0.4;
/// How much playfield distance each unit of overall difficulty adds to a step.
const DIFFICULTY_SPREAD: f64 = 0.3;

/// A musical event. Times are seconds since the start of the song.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub start: R64,
    pub duration: R64,
    pub velocity: u8,
    pub pitch: u8,
    /// Beats per minute at `start`.
    pub tempo: R64,
    pub track: u16,
}

impl Default for Note {
    fn default() -> Self {
        Self {
            start: r64(0.),
            duration: r64(0.),
            velocity: 0,
            pitch: 0,
            tempo: r64(120.),
            track: 0,
        }
    }
}

impl Note {
    pub fn at(start: f64, tempo: f64) -> Self {
        Self {
            start: r64(start),
            tempo: r64(tempo),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub name: String,
    pub notes: Vec<Note>,
}

pub fn merge_tracks(tracks: &[Track]) -> Vec<Note> {
    tracks
        .iter()
        .flat_map(|track| track.notes.iter().copied())
        .collect::<Vec<_>>()
        .tap_mut(|notes| notes.sort_by_key(|note| note.start))
}

/// Sorts by start time and keeps the first note of every distinct start time.
pub fn prepare_notes(notes: Vec<Note>) -> Vec<Note> {
    notes
        .tap_mut(|notes| notes.sort_by_key(|note| note.start))
        .into_iter()
        .dedup_by(|prev, curr| prev.start == curr.start)
        .collect()
}

pub fn seconds_per_beat(tempo: f64) -> f64 {
    60. / tempo
}

/// Nearest whole number of beat subdivisions separating two notes, ties to even.
/// Saturates for coincident notes and rounds to zero for gaps of two beats or more.
pub fn closest_divisor(previous: &Note, note: &Note, current_tempo: f64) -> u32 {
    let gap = (note.start - previous.start).raw();
    (seconds_per_beat(current_tempo) / gap).round_ties_even() as u32
}

pub fn skips(divisor: u32, overall_difficulty: f64) -> bool {
    (overall_difficulty < SINGLE_DIVISION_BELOW && 1 < divisor)
        || (overall_difficulty < DOUBLE_DIVISION_BELOW && 2 < divisor)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spacing {
    Skip,
    /// Required playfield distance from the previous target. Infinite when the
    /// notes are too far apart for their distance to mean anything.
    Distance(f64),
}

pub fn spacing_for(previous: &Note, note: &Note, current_tempo: f64, overall_difficulty: f64) -> Spacing {
    let divisor = closest_divisor(previous, note, current_tempo);

    if skips(divisor, overall_difficulty) {
        return Spacing::Skip;
    }

    Spacing::Distance(
        seconds_per_beat(previous.tempo.raw()) / (2. * divisor as f64)
            + DIFFICULTY_SPREAD * overall_difficulty,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(0.5, 120., 1; "quarter at 120")]
    #[test_case(0.25, 120., 2; "eighth at 120")]
    #[test_case(0.125, 120., 4; "sixteenth at 120")]
    #[test_case(0.5, 90., 1; "slightly long gap rounds down")]
    #[test_case(2., 120., 0; "whole note rounds to zero")]
    #[test_case(1., 120., 0; "half note ties down to zero")]
    #[test_case(0.25, 96., 2; "two and a half ties down to two")]
    fn divisors(gap: f64, tempo: f64, expected: u32) {
        let (previous, note) = (Note::at(1., tempo), Note::at(1. + gap, tempo));
        assert_eq!(closest_divisor(&previous, &note, tempo), expected);
    }

    #[test_case(1, 0.1, false)]
    #[test_case(2, 0.1, true)]
    #[test_case(2, 0.3, false)]
    #[test_case(3, 0.3, true)]
    #[test_case(4, 0.5, false)]
    fn skip_policy(divisor: u32, difficulty: f64, expected: bool) {
        assert_eq!(skips(divisor, difficulty), expected);
    }

    #[test]
    fn skipping_only_fades_as_difficulty_rises() {
        let tempos = [60., 90., 120., 150., 180., 240.];
        let gaps = (1..=40).map(|i| i as f64 * 0.025);

        gaps.cartesian_product(tempos).for_each(|(gap, tempo)| {
            let (previous, note) = (Note::at(0., tempo), Note::at(gap, tempo));

            (1..=5)
                .map(|i| i as f64 * 0.1)
                .map(|difficulty| spacing_for(&previous, &note, tempo, difficulty) == Spacing::Skip)
                .tuple_windows()
                .for_each(|(easier, harder)| assert!(easier || !harder, "gap {gap} at {tempo}"))
        })
    }

    #[test]
    fn spacing_shrinks_with_subdivision_and_grows_with_difficulty() {
        let previous = Note::at(0., 120.);

        let Spacing::Distance(quarter) = spacing_for(&previous, &Note::at(0.5, 120.), 120., 0.5) else {
            panic!("quarter notes are never skipped");
        };
        let Spacing::Distance(eighth) = spacing_for(&previous, &Note::at(0.25, 120.), 120., 0.5) else {
            panic!("eighth notes are kept at 0.5");
        };
        let Spacing::Distance(harder) = spacing_for(&previous, &Note::at(0.5, 120.), 120., 0.9) else {
            panic!("quarter notes are never skipped");
        };

        assert_relative_eq!(quarter, 0.25 + 0.15);
        assert_relative_eq!(eighth, 0.125 + 0.15);
        assert!(quarter < harder);
    }

    #[test]
    fn half_notes_have_infinite_spacing() {
        let spacing = spacing_for(&Note::at(0., 120.), &Note::at(1., 120.), 120., 0.3);
        assert_eq!(spacing, Spacing::Distance(f64::INFINITY));
    }

    #[test]
    fn two_and_a_half_divisions_are_kept_at_moderate_difficulty() {
        let Spacing::Distance(spacing) = spacing_for(&Note::at(0., 96.), &Note::at(0.25, 96.), 96., 0.3) else {
            panic!("two divisions are kept at 0.3");
        };
        assert_relative_eq!(spacing, 0.625 / 4. + 0.09);
    }

    #[test]
    fn distant_notes_have_infinite_spacing() {
        let spacing = spacing_for(&Note::at(0., 120.), &Note::at(3., 120.), 120., 0.1);
        assert_eq!(spacing, Spacing::Distance(f64::INFINITY));
    }

    #[test]
    fn merged_and_deduplicated() {
        let tracks = [
            Track {
                name: "lead".into(),
                notes: vec![Note::at(0., 120.), Note::at(1., 120.)],
            },
            Track {
                name: "bass".into(),
                notes: vec![Note { pitch: 40, ..Note::at(0.5, 120.) }, Note::at(1., 120.)],
            },
        ];

        let merged = merge_tracks(&tracks);
        assert_eq!(
            merged.iter().map(|note| note.start.raw()).collect::<Vec<_>>(),
            vec![0., 0.5, 1., 1.]
        );

        let prepared = prepare_notes(merged);
        assert_eq!(
            prepared.iter().map(|note| note.start.raw()).collect::<Vec<_>>(),
            vec![0., 0.5, 1.]
        );
        assert_eq!(prepared[1].pitch, 40);
    }
}
