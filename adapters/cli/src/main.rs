#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays the Greenhouse experience headlessly.
//!
//! The adapter drives the same command/event loop a graphical front end
//! would: it synthesizes pointer and keyboard frames, feeds them through the
//! input system, applies the resulting commands to the world, and lets the
//! photosynthesis trigger react to the event stream. Because there is no
//! animation to wait for, each frame settles the trigger as soon as its
//! follow-up commands have been applied.

use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use glam::Vec2;
use greenhouse_core::{Command, Event, MoleculeKind, PointerPosition, SessionConfig};
use greenhouse_rendering::{
    present_frame, project_scene, FrameInput, Presentation, RenderingBackend, RenderingError,
    Scene, SkyPhase, SURFACE_SIZE,
};
use greenhouse_system_bootstrap::Bootstrap;
use greenhouse_system_input::{Interaction, KeyFrame, PointerFrame};
use greenhouse_system_trigger::Trigger;
use greenhouse_world::{self as world, query, World};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

mod scenario;

use scenario::{demo_script, ScenarioScript, ScriptedAction};

const WINDOW_TITLE: &str = "Greenhouse";
const DEFAULT_DEMO_SEED: u64 = 2024;

const ABSORPTION_TARGET: Vec2 = Vec2::new(400.0, 530.0);
const LEAF_TARGET: Vec2 = Vec2::new(290.0, 180.0);

#[derive(Parser)]
#[command(name = "greenhouse", about = "Grow a plant by delivering molecules")]
struct Cli {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Plays a scripted session with a shuffled delivery order.
    Demo {
        /// Seed controlling the delivery order.
        #[arg(long, default_value_t = DEFAULT_DEMO_SEED)]
        seed: u64,
    },
    /// Replays an encoded scenario script.
    Replay {
        /// Scenario string produced by the `encode` subcommand.
        script: String,
    },
    /// Prints the built-in demonstration script in shareable form.
    Encode,
}

/// Entry point for the Greenhouse command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(CliCommand::Demo {
        seed: DEFAULT_DEMO_SEED,
    }) {
        CliCommand::Demo { seed } => run_demo(seed),
        CliCommand::Replay { script } => run_replay(&script),
        CliCommand::Encode => {
            println!("{}", demo_script().encode());
            Ok(())
        }
    }
}

/// One headless session: the authoritative world plus the pure systems that
/// orbit it.
struct Session {
    world: World,
    interaction: Interaction,
    trigger: Trigger,
    pointer: Option<Vec2>,
}

impl Session {
    fn new(config: SessionConfig) -> Self {
        Self {
            world: World::with_config(config),
            interaction: Interaction::new(),
            trigger: Trigger::new(),
            pointer: None,
        }
    }

    fn world(&self) -> &World {
        &self.world
    }

    /// Projects the current world state into a drawable scene.
    fn scene(&self) -> Scene {
        project_scene(
            &query::snapshot(&self.world),
            &query::token_view(&self.world),
            query::zones(&self.world),
            query::active_drag(&self.world),
            self.pointer,
        )
    }

    /// Consumes one frame of synthesized input and returns the events it
    /// produced, trigger follow-ups included.
    fn frame(&mut self, input: FrameInput) -> Vec<Event> {
        let token_under_pointer = if input.pressed {
            input
                .pointer
                .and_then(|pointer| self.scene().token_at(pointer))
        } else {
            None
        };

        let pointer = PointerFrame {
            position: input
                .pointer
                .map(|pointer| PointerPosition::new(pointer.x, pointer.y)),
            pressed: input.pressed,
            released: input.released,
            token_under_pointer,
        };
        let keys = KeyFrame {
            step_back: input.step_back,
            step_forward: input.step_forward,
            restart: input.restart,
        };

        let dragging = query::active_drag(&self.world).is_some();
        let mut commands = Vec::new();
        self.interaction.handle(pointer, keys, dragging, &mut commands);

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.pointer = input.pointer;
        self.drain(events)
    }

    /// Applies one command directly, bypassing input synthesis.
    fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.drain(events)
    }

    /// Feeds pending events to the trigger until the world settles, then
    /// settles the trigger itself. Headless frames have no animation window,
    /// so the settle point is the end of the drain.
    fn drain(&mut self, events: Vec<Event>) -> Vec<Event> {
        let mut log = Vec::new();
        let mut pending = events;
        while !pending.is_empty() {
            log.extend(pending.iter().copied());

            let mut follow_ups = Vec::new();
            self.trigger
                .handle(&pending, &query::snapshot(&self.world), &mut follow_ups);

            let mut next = Vec::new();
            for command in follow_ups {
                world::apply(&mut self.world, command, &mut next);
            }
            pending = next;
        }
        self.trigger.settle();
        log
    }
}

fn run_demo(seed: u64) -> Result<()> {
    let config = SessionConfig::default();
    let mut session = Session::new(config);
    let bootstrap = Bootstrap::default();

    println!("{}", bootstrap.welcome_banner(session.world()));
    println!(
        "{} drop zones ready, {} tokens in the trays",
        bootstrap.zones(session.world()).len(),
        bootstrap.tokens(session.world()).iter().count(),
    );

    println!("delivering water while the sky is dark");
    report(&deliver(&mut session, MoleculeKind::Water, ABSORPTION_TARGET)?);

    println!("winding the clock back until the sun is up");
    for _ in 0..24 {
        if query::is_daytime(session.world()) {
            break;
        }
        report(&session.frame(FrameInput {
            step_back: true,
            ..FrameInput::default()
        }));
    }

    let mut deck = demo_deck(config);
    deck.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    for kind in deck {
        println!("delivering {}", kind_label(kind));
        report(&deliver(&mut session, kind, delivery_target(kind))?);
    }

    let mut backend = ConsoleBackend::new(io::stdout());
    present_frame(
        &mut backend,
        &Presentation::new(WINDOW_TITLE, session.scene()),
    )
}

fn run_replay(encoded: &str) -> Result<()> {
    let script = ScenarioScript::decode(encoded)?;
    let mut session = Session::new(script.config);

    println!("{}", Bootstrap::default().welcome_banner(session.world()));
    for action in &script.actions {
        report(&execute(&mut session, *action)?);
    }

    let mut backend = ConsoleBackend::new(io::stdout());
    present_frame(
        &mut backend,
        &Presentation::new(WINDOW_TITLE, session.scene()),
    )
}

fn execute(session: &mut Session, action: ScriptedAction) -> Result<Vec<Event>> {
    match action {
        ScriptedAction::SetHour { hour } => Ok(session.submit(Command::SetHour { hour })),
        ScriptedAction::StepHour { delta } => Ok(session.submit(Command::StepHour { delta })),
        ScriptedAction::Drag { kind, to_x, to_y } => {
            deliver(session, kind, Vec2::new(to_x, to_y))
        }
        ScriptedAction::Reset => Ok(session.submit(Command::Reset)),
    }
}

/// Synthesizes a full drag gesture: press on an available token of the kind,
/// move to the target, release.
fn deliver(session: &mut Session, kind: MoleculeKind, target: Vec2) -> Result<Vec<Event>> {
    let scene = session.scene();
    let Some(sprite) = scene
        .tokens
        .iter()
        .find(|sprite| sprite.kind == kind && !sprite.in_flight)
        .copied()
    else {
        bail!("no {} token left to deliver", kind_label(kind));
    };

    let target = target.clamp(Vec2::ZERO, SURFACE_SIZE);
    let mut events = session.frame(FrameInput {
        pointer: Some(sprite.position),
        pressed: true,
        ..FrameInput::default()
    });
    events.extend(session.frame(FrameInput {
        pointer: Some(target),
        ..FrameInput::default()
    }));
    events.extend(session.frame(FrameInput {
        pointer: Some(target),
        released: true,
        ..FrameInput::default()
    }));
    Ok(events)
}

/// Deliveries still needed after the demo's opening water drop.
fn demo_deck(config: SessionConfig) -> Vec<MoleculeKind> {
    let units = config.glucose_target * config.consumption_per_firing;
    let mut deck = Vec::new();
    for _ in 1..units {
        deck.push(MoleculeKind::Water);
    }
    for _ in 0..units {
        deck.push(MoleculeKind::Co2);
    }
    deck
}

fn delivery_target(kind: MoleculeKind) -> Vec2 {
    match kind {
        MoleculeKind::Water => ABSORPTION_TARGET,
        MoleculeKind::Co2 => LEAF_TARGET,
    }
}

fn kind_label(kind: MoleculeKind) -> &'static str {
    match kind {
        MoleculeKind::Water => "water",
        MoleculeKind::Co2 => "carbon dioxide",
    }
}

fn report(events: &[Event]) {
    for event in events {
        if let Some(line) = describe(event) {
            println!("  {line}");
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    match event {
        Event::DaylightChanged { daytime } => Some(if *daytime {
            "the sun rose".to_owned()
        } else {
            "the sun set".to_owned()
        }),
        Event::MoleculeCollected { kind } => Some(format!("the plant took in {}", kind_label(*kind))),
        Event::DropRejected { kind } => {
            Some(format!("{} slid back to its tray", kind_label(*kind)))
        }
        Event::HoverChanged { .. } => None,
        Event::PhotosynthesisFired { glucose_produced } => Some(format!(
            "photosynthesis fired, glucose at {glucose_produced}"
        )),
        Event::GameComplete => Some("every fruit has grown".to_owned()),
        Event::SessionReset => Some("the session restarted".to_owned()),
    }
}

/// Backend that writes scene summaries to a text sink.
struct ConsoleBackend<W> {
    sink: W,
}

impl<W> ConsoleBackend<W> {
    fn new(sink: W) -> Self {
        Self { sink }
    }
}

impl<W> RenderingBackend for ConsoleBackend<W>
where
    W: Write,
{
    fn present(&mut self, presentation: &Presentation) -> Result<(), RenderingError> {
        let scene = &presentation.scene;
        let sky = match scene.sky {
            SkyPhase::Day => "day",
            SkyPhase::Night => "night",
        };
        let counters = scene.counters;

        writeln!(self.sink, "== {} ==", presentation.window_title).map_err(sink_error)?;
        writeln!(self.sink, "clock {} ({sky})", scene.clock_label).map_err(sink_error)?;
        writeln!(
            self.sink,
            "water {}/{}  co2 {}/{}  glucose {}/{}",
            counters.water_collected,
            counters.water_capacity,
            counters.co2_collected,
            counters.co2_capacity,
            counters.glucose_produced,
            counters.glucose_target,
        )
        .map_err(sink_error)?;
        writeln!(self.sink, "{} tokens resting in the trays", scene.tokens.len())
            .map_err(sink_error)?;
        if scene.complete {
            writeln!(self.sink, "the plant has grown every fruit").map_err(sink_error)?;
        }
        Ok(())
    }
}

fn sink_error(error: io::Error) -> RenderingError {
    RenderingError::new(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_deck_shuffles_deterministically_per_seed() {
        let config = SessionConfig::default();
        let mut first = demo_deck(config);
        let mut second = demo_deck(config);

        first.shuffle(&mut ChaCha8Rng::seed_from_u64(7));
        second.shuffle(&mut ChaCha8Rng::seed_from_u64(7));

        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn demo_script_plays_to_completion() {
        let script = demo_script();
        let mut session = Session::new(script.config);

        let mut log = Vec::new();
        for action in &script.actions {
            log.extend(execute(&mut session, *action).expect("action executes"));
        }

        assert!(log.contains(&Event::GameComplete));
        assert!(session.scene().complete);
    }

    #[test]
    fn drag_gesture_collects_a_matching_token() {
        let mut session = Session::new(SessionConfig::default());

        let events =
            deliver(&mut session, MoleculeKind::Water, ABSORPTION_TARGET).expect("token available");

        assert!(events.contains(&Event::MoleculeCollected {
            kind: MoleculeKind::Water
        }));
        assert_eq!(query::snapshot(session.world()).water_collected, 1);
    }

    #[test]
    fn console_backend_summarizes_the_scene() {
        let session = Session::new(SessionConfig::default());
        let mut backend = ConsoleBackend::new(Vec::new());

        present_frame(
            &mut backend,
            &Presentation::new(WINDOW_TITLE, session.scene()),
        )
        .expect("vector sinks never fail");

        let output = String::from_utf8(backend.sink).expect("summary is utf8");
        assert!(output.contains("22:00"));
        assert!(output.contains("night"));
        assert!(output.contains("glucose 0/3"));
    }
}
