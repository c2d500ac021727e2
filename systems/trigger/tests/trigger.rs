use greenhouse_core::{Command, Event, MoleculeKind, PointerPosition, TokenState};
use greenhouse_system_trigger::Trigger;
use greenhouse_world::{self as world, query, World};

const ABSORPTION_POINT: PointerPosition = PointerPosition::new(400.0, 520.0);
const LEAF_POINT: PointerPosition = PointerPosition::new(300.0, 180.0);

/// Applies one command, then lets the trigger react to the resulting events
/// until it goes quiet. The settle call after each production cycle stands in
/// for the renderer's animation window completing.
fn pump(world: &mut World, trigger: &mut Trigger, command: Command, log: &mut Vec<Event>) {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);

    loop {
        log.extend(events.iter().copied());

        let snapshot = query::snapshot(world);
        let mut commands = Vec::new();
        trigger.handle(&events, &snapshot, &mut commands);
        if commands.is_empty() {
            break;
        }

        events.clear();
        for command in commands {
            world::apply(world, command, &mut events);
        }
        trigger.settle();
    }
}

fn available_token(world: &World, kind: MoleculeKind) -> greenhouse_core::TokenId {
    query::token_view(world)
        .iter()
        .find(|token| token.kind == kind && token.state == TokenState::Available)
        .map(|token| token.id)
        .expect("pool has an available token of the requested kind")
}

fn deliver(world: &mut World, trigger: &mut Trigger, kind: MoleculeKind, log: &mut Vec<Event>) {
    let token = available_token(world, kind);
    let target = match kind {
        MoleculeKind::Water => ABSORPTION_POINT,
        MoleculeKind::Co2 => LEAF_POINT,
    };
    pump(
        world,
        trigger,
        Command::BeginDrag {
            token,
            pointer: PointerPosition::new(60.0, 400.0),
        },
        log,
    );
    pump(world, trigger, Command::EndDrag { pointer: target }, log);
}

fn count<F>(log: &[Event], predicate: F) -> usize
where
    F: Fn(&Event) -> bool,
{
    log.iter().filter(|event| predicate(event)).count()
}

#[test]
fn night_collection_fires_only_after_daylight_and_both_resources() {
    let mut world = World::new();
    let mut trigger = Trigger::new();
    let mut log = Vec::new();

    // The session starts at 22:00: collecting water must not fire.
    deliver(&mut world, &mut trigger, MoleculeKind::Water, &mut log);
    assert!(log.contains(&Event::MoleculeCollected {
        kind: MoleculeKind::Water
    }));
    assert_eq!(query::snapshot(&world).water_collected, 1);
    assert_eq!(count(&log, |e| matches!(e, Event::PhotosynthesisFired { .. })), 0);

    // Daylight alone is not enough while the CO2 counter is empty.
    pump(&mut world, &mut trigger, Command::SetHour { hour: 12 }, &mut log);
    assert!(log.contains(&Event::DaylightChanged { daytime: true }));
    assert_eq!(count(&log, |e| matches!(e, Event::PhotosynthesisFired { .. })), 0);

    // The first CO2 delivery completes the precondition.
    deliver(&mut world, &mut trigger, MoleculeKind::Co2, &mut log);
    assert!(log.contains(&Event::PhotosynthesisFired {
        glucose_produced: 1
    }));

    let snapshot = query::snapshot(&world);
    assert_eq!(snapshot.water_collected, 0, "firing consumed the water unit");
    assert_eq!(snapshot.co2_collected, 0, "firing consumed the co2 unit");
    assert_eq!(snapshot.glucose_produced, 1);
}

#[test]
fn mismatched_drop_rejects_and_leaves_counters_untouched() {
    let mut world = World::new();
    let mut trigger = Trigger::new();
    let mut log = Vec::new();

    let token = available_token(&world, MoleculeKind::Water);
    pump(
        &mut world,
        &mut trigger,
        Command::BeginDrag {
            token,
            pointer: PointerPosition::new(60.0, 400.0),
        },
        &mut log,
    );
    pump(
        &mut world,
        &mut trigger,
        Command::EndDrag {
            pointer: LEAF_POINT,
        },
        &mut log,
    );

    assert!(log.contains(&Event::DropRejected {
        kind: MoleculeKind::Water
    }));
    assert_eq!(query::snapshot(&world).water_collected, 0);
    let view = query::token_view(&world);
    let reverted = view
        .iter()
        .find(|snapshot| snapshot.id == token)
        .expect("token survives the rejection");
    assert_eq!(reverted.state, TokenState::Available);
}

#[test]
fn session_completes_exactly_once_and_never_refires() {
    let mut world = World::new();
    let mut trigger = Trigger::new();
    let mut log = Vec::new();

    pump(&mut world, &mut trigger, Command::SetHour { hour: 10 }, &mut log);

    let target = query::snapshot(&world).glucose_target;
    for _ in 0..target {
        deliver(&mut world, &mut trigger, MoleculeKind::Water, &mut log);
        deliver(&mut world, &mut trigger, MoleculeKind::Co2, &mut log);
    }

    assert_eq!(
        count(&log, |e| matches!(e, Event::PhotosynthesisFired { .. })),
        target as usize
    );
    assert_eq!(count(&log, |e| matches!(e, Event::GameComplete)), 1);
    assert!(query::snapshot(&world).complete);

    // Further valid deliveries in daylight must not fire past the target.
    deliver(&mut world, &mut trigger, MoleculeKind::Water, &mut log);
    deliver(&mut world, &mut trigger, MoleculeKind::Co2, &mut log);

    assert_eq!(
        count(&log, |e| matches!(e, Event::PhotosynthesisFired { .. })),
        target as usize
    );
    assert_eq!(count(&log, |e| matches!(e, Event::GameComplete)), 1);
    assert_eq!(query::snapshot(&world).glucose_produced, target);
}

#[test]
fn identical_sessions_replay_identically() {
    let first = scripted_run();
    let second = scripted_run();

    assert_eq!(first, second, "replay diverged between runs");
}

fn scripted_run() -> Vec<Event> {
    let mut world = World::new();
    let mut trigger = Trigger::new();
    let mut log = Vec::new();

    deliver(&mut world, &mut trigger, MoleculeKind::Water, &mut log);
    pump(&mut world, &mut trigger, Command::SetHour { hour: 12 }, &mut log);
    deliver(&mut world, &mut trigger, MoleculeKind::Co2, &mut log);
    deliver(&mut world, &mut trigger, MoleculeKind::Co2, &mut log);
    pump(&mut world, &mut trigger, Command::Reset, &mut log);
    deliver(&mut world, &mut trigger, MoleculeKind::Water, &mut log);

    log
}
