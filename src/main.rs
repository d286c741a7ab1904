use bevy::{log::LogPlugin, prelude::*};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use rhythm_placer::{
    hit::{Judgement, MISS_AFTER},
    play::*,
    timing::Note,
    utils::*,
    PlayPlugin, Settings,
};

/// Song time advanced per update.
const TICK: f64 = 0.005;
/// Hard stop in case a session never drains.
const MAX_TICKS: usize = 100_000;

/// Answers targets with a random timing error. Answers later than the hit
/// window are never sent, so expiry has to catch them.
#[derive(Resource)]
struct Player {
    rng: SmallRng,
    responses: Vec<(f64, JudgementEvent)>,
}

fn simulate_player(
    song_time: Res<SongTime>,
    mut player: ResMut<Player>,
    mut spawned: EventReader<TargetSpawned>,
    mut judgements: EventWriter<JudgementEvent>,
) {
    let Player { rng, responses } = &mut *player;

    spawned
        .iter()
        .map(|TargetSpawned(target)| (target, rng.gen_range(-0.15..0.5)))
        .filter(|(_, offset)| *offset <= MISS_AFTER)
        .for_each(|(target, offset)| {
            responses.push((
                target.note.start.raw() + offset,
                JudgementEvent {
                    judgement: Judgement::from_offset(offset),
                    order: target.order,
                },
            ))
        });

    responses.sort_by(|a, b| a.0.total_cmp(&b.0));
    let due = responses
        .iter()
        .take_while(|(at, _)| *at <= song_time.raw())
        .count();

    responses
        .drain(..due)
        .for_each(|(_, judgement)| judgements.send(judgement));
}

/// Quarters, then eighths, then sixteenths with a long rest in between each.
fn demo_song() -> Vec<Note> {
    [(0., 0.5), (18., 0.25), (28., 0.125)]
        .into_iter()
        .flat_map(|(from, gap)| (0..32).map(move |i| Note::at(from + i as f64 * gap, 120.)))
        .collect()
}

fn main() {
    let mut game = App::new();
    game.add_plugin(LogPlugin::default())
        .add_plugin(PlayPlugin)
        .insert_resource(Settings {
            seed: Some(7),
            ..default()
        })
        .insert_resource(Player {
            rng: SmallRng::seed_from_u64(11),
            responses: vec![],
        })
        .add_system(simulate_player.before(apply_judgements));

    game.world.send_event(StartSession(demo_song()));
    game.update();

    for _ in 0..MAX_TICKS {
        let drained = game.world.resource::<PendingTargets>().is_empty()
            && game
                .world
                .get_resource::<ActiveSession>()
                .map_or(false, |session| session.is_finished());

        if drained {
            break;
        }

        let now = game.world.resource::<SongTime>().raw();
        *game.world.resource_mut::<SongTime>() = SongTime(r64(now + TICK));
        game.update();
    }

    match game.world.get_resource::<ActiveSession>() {
        Some(session) => info!("{}", session.summary()),
        None => error!("session never started"),
    }
}
