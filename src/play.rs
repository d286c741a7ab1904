use crate::{
    config::Settings,
    error::PlacementError,
    hit::{Judgement, Target},
    placement::Placement,
    session::Session,
    timing::Note,
    utils::*,
};
use bevy::prelude::*;
use derive_more::From;

/// Seconds since the song started.
#[derive(Debug, Clone, Copy, PartialEq, Deref, DerefMut, From, Resource)]
pub struct SongTime(pub R64);

impl Default for SongTime {
    fn default() -> Self {
        Self(r64(0.))
    }
}

#[derive(Deref, DerefMut, From, Resource)]
pub struct ActiveSession(pub Session);

/// Targets on screen still waiting on a judgement, oldest first.
#[derive(Debug, Default, Deref, DerefMut, Resource)]
pub struct PendingTargets(pub Vec<Target>);

/// Replaces the running session with a fresh one over these notes.
pub struct StartSession(pub Vec<Note>);

#[derive(Debug, Clone, Copy)]
pub struct TargetSpawned(pub Target);

#[derive(Debug, Clone, Copy)]
pub struct NoteSkipped(pub Note);

#[derive(Debug, Clone, Copy)]
pub struct PlacementFailed {
    pub note: Note,
    pub error: PlacementError,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgementEvent {
    pub judgement: Judgement,
    pub order: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyChanged(pub f64);

/// Swaps the new session in before the other systems run this tick. Judgements
/// still queued for the old session are dropped.
pub fn start_sessions(
    mut commands: Commands,
    settings: Res<Settings>,
    session: Option<ResMut<ActiveSession>>,
    mut starts: EventReader<StartSession>,
    mut song_time: ResMut<SongTime>,
    mut pending: ResMut<PendingTargets>,
    mut judgements: ResMut<Events<JudgementEvent>>,
) {
    let Some(StartSession(notes)) = starts.iter().last() else {
        return
    };

    let fresh = Session::new(settings.clone(), notes.clone());
    match session {
        Some(mut session) => session.0 = fresh,
        None => commands.insert_resource(ActiveSession(fresh)),
    }

    *song_time = SongTime::default();
    pending.clear();
    judgements.clear();
}

/// Places every note due within the lookahead, up to the per tick budget.
#[rustfmt::skip]
pub fn spawn_upcoming(
    song_time: Res<SongTime>,
    session: Option<ResMut<ActiveSession>>,
    mut pending: ResMut<PendingTargets>,
    mut spawned: EventWriter<TargetSpawned>,
    mut skipped: EventWriter<NoteSkipped>,
    mut failed: EventWriter<PlacementFailed>,
) {
    let Some(mut session) = session else {
        return
    };

    let horizon = song_time.raw() + session.settings().lookahead;
    let budget = session.settings().max_spawns_per_tick;

    (0..budget)
        .map_while(|_| {
            let note = *session.peek_note().filter(|note| note.start.raw() <= horizon)?;
            session.next_placement().map(|placement| (note, placement))
        })
        .for_each(|(note, placement)| match placement {
            Ok(Placement::Target(target)) => {
                pending.push(target);
                spawned.send(TargetSpawned(target));
            }
            Ok(Placement::Skip(note)) => skipped.send(NoteSkipped(note)),
            Err(error) => failed.send(PlacementFailed { note, error }),
        });
}

/// Misses every pending target the player let slip past the hit window.
pub fn expire_targets(
    song_time: Res<SongTime>,
    session: Option<Res<ActiveSession>>,
    pending: Res<PendingTargets>,
    mut judgements: EventWriter<JudgementEvent>,
) {
    let Some(session) = session else {
        return
    };

    let miss_after = session.settings().miss_after;

    pending
        .iter()
        .filter(|target| target.note.start.raw() + miss_after <= song_time.raw())
        .for_each(|target| {
            judgements.send(JudgementEvent {
                judgement: Judgement::Miss,
                order: target.order,
            })
        });
}

/// The only consumer of judgements, so the controller sees them one at a time.
pub fn apply_judgements(
    session: Option<ResMut<ActiveSession>>,
    mut pending: ResMut<PendingTargets>,
    mut judgements: EventReader<JudgementEvent>,
    mut changes: EventWriter<DifficultyChanged>,
) {
    let Some(mut session) = session else {
        return
    };

    let before = session.difficulty();

    judgements
        .iter()
        .filter(|JudgementEvent { judgement, order }| session.process_judgement(*judgement, *order))
        .for_each(|JudgementEvent { order, .. }| pending.retain(|target| target.order != *order));

    if session.difficulty() != before {
        debug!("difficulty moved from {before:.3} to {:.3}", session.difficulty());
        changes.send(DifficultyChanged(session.difficulty()));
    }
}

pub struct PlayPlugin;

impl Plugin for PlayPlugin {
    fn build(&self, game: &mut App) {
        game.init_resource::<Settings>()
            .init_resource::<SongTime>()
            .init_resource::<PendingTargets>()
            .add_event::<StartSession>()
            .add_event::<TargetSpawned>()
            .add_event::<NoteSkipped>()
            .add_event::<PlacementFailed>()
            .add_event::<JudgementEvent>()
            .add_event::<DifficultyChanged>()
            .add_systems(
                (
                    start_sessions,
                    spawn_upcoming,
                    expire_targets,
                    apply_judgements,
                )
                    .chain(),
            );
    }
}
