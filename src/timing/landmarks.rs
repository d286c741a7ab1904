//! Picks the tracks worth turning into targets out of a multi track song.
use super::*;

/// Spacings under this many milliseconds mark a track as machine gun fast.
const EXTREME_SPEED_MS: f64 = 50.;
/// 100ns ticks per second, the unit the first note penalty was tuned in.
const TICKS_PER_SECOND: f64 = 1e7;

/// Note count, mean/median/min/max spacing of a track, spacings in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackProfile {
    pub distinct_starts: usize,
    pub median_spacing: f64,
    pub mean_spacing: f64,
    pub min_spacing: f64,
    pub max_spacing: f64,
    pub first_start: f64,
    pub note_count: usize,
}

impl TrackProfile {
    pub fn of(track: &Track) -> Option<Self> {
        let spacings = track
            .notes
            .iter()
            .tuple_windows()
            .map(|(prev, curr)| (curr.start - prev.start).raw() * 1000.)
            .collect::<Vec<_>>();

        let (min_spacing, max_spacing) = (
            spacings.iter().copied().filter(|spacing| *spacing != 0.).reduce(f64::min)?,
            spacings.iter().copied().reduce(f64::max)?,
        );

        Some(Self {
            distinct_starts: track.notes.iter().map(|note| note.start).sorted().dedup().count(),
            mean_spacing: spacings.iter().sum::<f64>() / spacings.len() as f64,
            median_spacing: median(spacings)?,
            min_spacing,
            max_spacing,
            first_start: track.notes.first()?.start.raw(),
            note_count: track.notes.len(),
        })
    }

    /// Favors many evenly spaced notes and penalizes long gaps, erratic
    /// spacing, late entries and bursts of extreme speed.
    pub fn score(&self) -> f64 {
        let typical = self.median_spacing + self.mean_spacing;
        let range = self.max_spacing - self.min_spacing;
        let extreme_speed = if self.min_spacing < EXTREME_SPEED_MS { 1. } else { 0. };

        typical * typical * self.note_count as f64
            - self.max_spacing * self.max_spacing
            - range * 0.2
            - self.first_start * TICKS_PER_SECOND
            - range * 100. * extreme_speed
    }
}

/// Tracks dense enough to play, best first. `song_length` is in seconds.
pub fn rank_landmarks(tracks: &[Track], song_length: f64) -> Vec<&Track> {
    tracks
        .iter()
        .filter_map(|track| TrackProfile::of(track).map(|profile| (track, profile)))
        .filter(|(_, profile)| {
            let distinct = profile.distinct_starts as f64;
            song_length / 2. < distinct && distinct < song_length * 8.
        })
        .sorted_by(|(_, a), (_, b)| b.score().total_cmp(&a.score()))
        .map(|(track, _)| track)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn steady(name: &str, count: usize, gap: f64, offset: f64) -> Track {
        Track {
            name: name.into(),
            notes: (0..count).map(|i| Note::at(offset + i as f64 * gap, 120.)).collect(),
        }
    }

    #[test]
    fn profile() {
        let profile = TrackProfile::of(&steady("steady", 5, 0.5, 1.)).unwrap();

        assert_eq!(profile.distinct_starts, 5);
        assert_relative_eq!(profile.median_spacing, 500.);
        assert_relative_eq!(profile.mean_spacing, 500.);
        assert_relative_eq!(profile.min_spacing, 500.);
        assert_relative_eq!(profile.max_spacing, 500.);
        assert_relative_eq!(profile.first_start, 1.);
    }

    #[test]
    fn single_note_tracks_have_no_profile() {
        assert_eq!(TrackProfile::of(&steady("lonely", 1, 0.5, 0.)), None);
    }

    #[test]
    fn ranking() {
        let tracks = [
            steady("sparse", 3, 4., 0.),
            steady("late", 40, 0.5, 2.),
            steady("early", 40, 0.5, 0.),
            steady("frantic", 400, 0.02, 0.),
        ];

        let ranked = rank_landmarks(&tracks, 20.)
            .into_iter()
            .map(|track| track.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(ranked, vec!["early", "late"]);
    }
}
