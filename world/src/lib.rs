#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for the Greenhouse.
//!
//! The world owns the clock, the resource counters, the token pool, and the
//! single gesture lock. All mutation flows through [`apply`]; adapters and
//! systems observe the results through the broadcast [`Event`] stream and the
//! read-only [`query`] functions.

use greenhouse_core::{
    Command, Event, HourOfDay, MoleculeKind, PointerPosition, SessionConfig, TokenId, TokenState,
    ZoneBounds, ZoneId, WELCOME_BANNER,
};

const ABSORPTION_ZONE: ZoneId = ZoneId::new(0);
const CANOPY_ZONE: ZoneId = ZoneId::new(1);
const LEAF_WEST_ZONE: ZoneId = ZoneId::new(2);
const LEAF_EAST_ZONE: ZoneId = ZoneId::new(3);

/// Designated target region that accepts tokens of one specific kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zone {
    id: ZoneId,
    accepts: MoleculeKind,
    bounds: ZoneBounds,
}

impl Zone {
    const fn new(id: ZoneId, accepts: MoleculeKind, bounds: ZoneBounds) -> Self {
        Self {
            id,
            accepts,
            bounds,
        }
    }

    /// Identifier assigned to the zone.
    #[must_use]
    pub const fn id(&self) -> ZoneId {
        self.id
    }

    /// Kind of molecule the zone accepts.
    #[must_use]
    pub const fn accepts(&self) -> MoleculeKind {
        self.accepts
    }

    /// Rectangle the zone covers on the interaction surface.
    #[must_use]
    pub const fn bounds(&self) -> ZoneBounds {
        self.bounds
    }
}

#[derive(Clone, Copy, Debug)]
struct Token {
    id: TokenId,
    kind: MoleculeKind,
    state: TokenState,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragState {
    Idle,
    Dragging {
        token: TokenId,
        grabbed_at: PointerPosition,
        candidate: Option<ZoneId>,
    },
}

/// Represents the authoritative Greenhouse session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SessionConfig,
    hour: HourOfDay,
    daytime: bool,
    water_collected: u32,
    co2_collected: u32,
    glucose_produced: u32,
    complete_announced: bool,
    tokens: Vec<Token>,
    zones: Vec<Zone>,
    drag: DragState,
}

impl World {
    /// Creates a new session using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Creates a new session from an explicit configuration.
    #[must_use]
    pub fn with_config(config: SessionConfig) -> Self {
        let hour = config.initial_hour;
        Self {
            banner: WELCOME_BANNER,
            config,
            hour,
            daytime: hour.is_daytime(),
            water_collected: 0,
            co2_collected: 0,
            glucose_produced: 0,
            complete_announced: false,
            tokens: generate_tokens(&config),
            zones: default_zones(),
            drag: DragState::Idle,
        }
    }

    fn restore_initial_state(&mut self) {
        self.hour = self.config.initial_hour;
        self.daytime = self.hour.is_daytime();
        self.water_collected = 0;
        self.co2_collected = 0;
        self.glucose_produced = 0;
        self.complete_announced = false;
        self.tokens = generate_tokens(&self.config);
        self.drag = DragState::Idle;
    }

    fn set_hour(&mut self, hour: HourOfDay, out_events: &mut Vec<Event>) {
        self.hour = hour;
        let daytime = hour.is_daytime();
        if daytime != self.daytime {
            self.daytime = daytime;
            out_events.push(Event::DaylightChanged { daytime });
        }
    }

    fn begin_drag(&mut self, token_id: TokenId, pointer: PointerPosition) {
        if self.drag != DragState::Idle {
            return;
        }

        let Some(token) = self.token_mut(token_id) else {
            return;
        };
        if token.state != TokenState::Available {
            return;
        }

        token.state = TokenState::InFlight;
        self.drag = DragState::Dragging {
            token: token_id,
            grabbed_at: pointer,
            candidate: None,
        };
    }

    fn update_drag(&mut self, pointer: PointerPosition, out_events: &mut Vec<Event>) {
        let DragState::Dragging {
            token,
            grabbed_at,
            candidate,
        } = self.drag
        else {
            return;
        };

        let Some(kind) = self.token_kind(token) else {
            return;
        };

        let next = self.nearest_matching_zone(pointer, kind);
        if next != candidate {
            out_events.push(Event::HoverChanged { zone: next });
        }
        self.drag = DragState::Dragging {
            token,
            grabbed_at,
            candidate: next,
        };
    }

    fn end_drag(&mut self, pointer: PointerPosition, out_events: &mut Vec<Event>) {
        let DragState::Dragging {
            token, candidate, ..
        } = self.drag
        else {
            return;
        };

        let Some(kind) = self.token_kind(token) else {
            self.drag = DragState::Idle;
            return;
        };

        if candidate.is_some() {
            out_events.push(Event::HoverChanged { zone: None });
        }

        let resolved = self.nearest_matching_zone(pointer, kind);
        let accepted = resolved.is_some() && self.pool_has_capacity(kind);

        if accepted {
            if let Some(slot) = self.token_mut(token) {
                slot.state = TokenState::Collected;
            }
            match kind {
                MoleculeKind::Water => self.water_collected += 1,
                MoleculeKind::Co2 => self.co2_collected += 1,
            }
            out_events.push(Event::MoleculeCollected { kind });
        } else {
            if let Some(slot) = self.token_mut(token) {
                slot.state = TokenState::Available;
            }
            out_events.push(Event::DropRejected { kind });
        }

        self.drag = DragState::Idle;
    }

    fn cancel_drag(&mut self, out_events: &mut Vec<Event>) {
        let DragState::Dragging {
            token, candidate, ..
        } = self.drag
        else {
            return;
        };

        if let Some(slot) = self.token_mut(token) {
            slot.state = TokenState::Available;
        }
        if candidate.is_some() {
            out_events.push(Event::HoverChanged { zone: None });
        }
        self.drag = DragState::Idle;
    }

    fn produce_glucose(&mut self, out_events: &mut Vec<Event>) {
        let can_fire = self.water_collected > 0
            && self.co2_collected > 0
            && self.daytime
            && self.glucose_produced < self.config.glucose_target;
        if !can_fire {
            return;
        }

        let consumption = self.config.consumption_per_firing;
        self.water_collected = self.water_collected.saturating_sub(consumption);
        self.co2_collected = self.co2_collected.saturating_sub(consumption);
        self.glucose_produced += 1;
        out_events.push(Event::PhotosynthesisFired {
            glucose_produced: self.glucose_produced,
        });

        if self.glucose_produced >= self.config.glucose_target && !self.complete_announced {
            self.complete_announced = true;
            out_events.push(Event::GameComplete);
        }
    }

    fn nearest_matching_zone(&self, pointer: PointerPosition, kind: MoleculeKind) -> Option<ZoneId> {
        self.zones
            .iter()
            .filter(|zone| zone.accepts == kind && zone.bounds.contains(pointer))
            .min_by(|a, b| a.bounds.area().total_cmp(&b.bounds.area()))
            .map(Zone::id)
    }

    fn pool_has_capacity(&self, kind: MoleculeKind) -> bool {
        match kind {
            MoleculeKind::Water => self.water_collected < self.config.water_tokens,
            MoleculeKind::Co2 => self.co2_collected < self.config.co2_tokens,
        }
    }

    fn token_mut(&mut self, token_id: TokenId) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|token| token.id == token_id)
    }

    fn token_kind(&self, token_id: TokenId) -> Option<MoleculeKind> {
        self.tokens
            .iter()
            .find(|token| token.id == token_id)
            .map(|token| token.kind)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSession { config } => {
            world.config = config;
            world.restore_initial_state();
            out_events.push(Event::SessionReset);
        }
        Command::SetHour { hour } => {
            world.set_hour(HourOfDay::clamped(hour), out_events);
        }
        Command::StepHour { delta } => {
            let stepped = i32::from(world.hour.get()).saturating_add(delta);
            world.set_hour(HourOfDay::clamped(stepped), out_events);
        }
        Command::BeginDrag { token, pointer } => {
            world.begin_drag(token, pointer);
        }
        Command::UpdateDrag { pointer } => {
            world.update_drag(pointer, out_events);
        }
        Command::EndDrag { pointer } => {
            world.end_drag(pointer, out_events);
        }
        Command::CancelDrag => {
            world.cancel_drag(out_events);
        }
        Command::ProduceGlucose => {
            world.produce_glucose(out_events);
        }
        Command::Reset => {
            world.restore_initial_state();
            out_events.push(Event::SessionReset);
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use super::{DragState, World, Zone};
    use greenhouse_core::{
        HourOfDay, SessionSnapshot, TokenId, TokenSnapshot, TokenView, ZoneId,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current hour shown by the session clock.
    #[must_use]
    pub fn hour(world: &World) -> HourOfDay {
        world.hour
    }

    /// Reports whether the clock falls within the daylight window.
    #[must_use]
    pub fn is_daytime(world: &World) -> bool {
        world.daytime
    }

    /// Captures an immutable read of the counters, clock, and completion.
    #[must_use]
    pub fn snapshot(world: &World) -> SessionSnapshot {
        SessionSnapshot {
            hour: world.hour,
            daytime: world.daytime,
            water_collected: world.water_collected,
            co2_collected: world.co2_collected,
            water_capacity: world.config.water_tokens,
            co2_capacity: world.config.co2_tokens,
            glucose_produced: world.glucose_produced,
            glucose_target: world.config.glucose_target,
            complete: world.glucose_produced >= world.config.glucose_target,
        }
    }

    /// Captures a read-only view of the token pool.
    #[must_use]
    pub fn token_view(world: &World) -> TokenView {
        TokenView::from_snapshots(
            world
                .tokens
                .iter()
                .map(|token| TokenSnapshot {
                    id: token.id,
                    kind: token.kind,
                    state: token.state,
                })
                .collect(),
        )
    }

    /// Drop zones laid out on the interaction surface.
    #[must_use]
    pub fn zones(world: &World) -> &[Zone] {
        &world.zones
    }

    /// Describes the gesture currently in progress, if any.
    #[must_use]
    pub fn active_drag(world: &World) -> Option<DragSnapshot> {
        match world.drag {
            DragState::Idle => None,
            DragState::Dragging {
                token, candidate, ..
            } => Some(DragSnapshot { token, candidate }),
        }
    }

    /// Immutable representation of the gesture in progress.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DragSnapshot {
        /// Token currently following the pointer.
        pub token: TokenId,
        /// Zone eligible to accept the token under the pointer, if any.
        pub candidate: Option<ZoneId>,
    }
}

fn generate_tokens(config: &SessionConfig) -> Vec<Token> {
    let total = config.water_tokens.saturating_add(config.co2_tokens) as usize;
    let mut tokens = Vec::with_capacity(total);
    for index in 0..config.water_tokens {
        tokens.push(Token {
            id: TokenId::new(index),
            kind: MoleculeKind::Water,
            state: TokenState::Available,
        });
    }
    for index in 0..config.co2_tokens {
        tokens.push(Token {
            id: TokenId::new(config.water_tokens + index),
            kind: MoleculeKind::Co2,
            state: TokenState::Available,
        });
    }
    tokens
}

/// The default board: an absorption zone at the soil line and a broad canopy
/// with two leaf zones nested inside it, so drops over a leaf resolve to the
/// leaf rather than the canopy.
fn default_zones() -> Vec<Zone> {
    vec![
        Zone::new(
            ABSORPTION_ZONE,
            MoleculeKind::Water,
            ZoneBounds::new(250.0, 480.0, 550.0, 580.0),
        ),
        Zone::new(
            CANOPY_ZONE,
            MoleculeKind::Co2,
            ZoneBounds::new(200.0, 40.0, 600.0, 300.0),
        ),
        Zone::new(
            LEAF_WEST_ZONE,
            MoleculeKind::Co2,
            ZoneBounds::new(220.0, 120.0, 360.0, 240.0),
        ),
        Zone::new(
            LEAF_EAST_ZONE,
            MoleculeKind::Co2,
            ZoneBounds::new(440.0, 120.0, 580.0, 240.0),
        ),
    ]
}
