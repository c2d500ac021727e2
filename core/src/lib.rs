#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Greenhouse simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session world, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! and renderers to react to deterministically. Systems consume event
//! streams, query immutable snapshots, and respond exclusively with new
//! command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Greenhouse.";

/// First hour of the day during which photosynthesis is possible.
pub const DAY_START: u8 = 6;

/// Last hour of the day during which photosynthesis is possible.
pub const DAY_END: u8 = 18;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the session from the provided configuration.
    ConfigureSession {
        /// Configuration describing the new session.
        config: SessionConfig,
    },
    /// Moves the clock to the provided hour, clamping out-of-range values.
    SetHour {
        /// Requested hour of day; values outside `[0, 23]` are clamped.
        hour: i32,
    },
    /// Adjusts the clock by the provided signed number of hours.
    StepHour {
        /// Signed hour delta applied to the current clock value.
        delta: i32,
    },
    /// Requests that a molecule token start following the pointer.
    BeginDrag {
        /// Identifier of the token the player grabbed.
        token: TokenId,
        /// Pointer position at the moment of the grab.
        pointer: PointerPosition,
    },
    /// Reports pointer motion while a token is in flight.
    UpdateDrag {
        /// Current pointer position on the interaction surface.
        pointer: PointerPosition,
    },
    /// Releases the in-flight token at the provided pointer position.
    EndDrag {
        /// Pointer position at the moment of release.
        pointer: PointerPosition,
    },
    /// Aborts the active gesture, returning the token to its origin.
    CancelDrag,
    /// Requests one photosynthesis production cycle.
    ProduceGlucose,
    /// Restores the session to its configured initial state.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the day/night predicate flipped.
    DaylightChanged {
        /// Whether the clock now falls within the daylight window.
        daytime: bool,
    },
    /// Confirms that a molecule token was delivered to a matching zone.
    MoleculeCollected {
        /// Kind of molecule that was collected.
        kind: MoleculeKind,
    },
    /// Reports that a drop was released outside a matching zone.
    DropRejected {
        /// Kind of molecule whose drop was rejected.
        kind: MoleculeKind,
    },
    /// Announces that the highlight candidate under the pointer changed.
    HoverChanged {
        /// Zone currently eligible to accept the in-flight token, if any.
        zone: Option<ZoneId>,
    },
    /// Confirms that one photosynthesis production cycle fired.
    PhotosynthesisFired {
        /// Total glucose units produced so far, including this firing.
        glucose_produced: u32,
    },
    /// Announces that the glucose target was reached. Emitted exactly once.
    GameComplete,
    /// Confirms that the session returned to its initial state.
    SessionReset,
}

/// Kinds of molecule tokens the player can deliver to the plant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoleculeKind {
    /// Water absorbed through the roots.
    Water,
    /// Carbon dioxide captured by the leaves.
    Co2,
}

/// Lifecycle states of a molecule token within one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenState {
    /// The token rests at its origin and may be grabbed.
    Available,
    /// The token follows the pointer under an exclusive gesture lock.
    InFlight,
    /// The token was delivered and its unit counted.
    Collected,
}

/// Unique identifier assigned to a molecule token.
///
/// Identifiers are stable across resets: the pool is recreated with the same
/// values rather than reusing live tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(u32);

impl TokenId {
    /// Creates a new token identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a drop zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(u32);

impl ZoneId {
    /// Creates a new zone identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the zone identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Hour-of-day value clamped to `[0, 23]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// Creates an hour from a trusted in-range value, saturating at 23.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value > 23 {
            Self(23)
        } else {
            Self(value)
        }
    }

    /// Creates an hour from an arbitrary signed value, clamping to `[0, 23]`.
    #[must_use]
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(0, 23) as u8)
    }

    /// Retrieves the underlying hour value.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Reports whether the hour falls within the daylight window.
    #[must_use]
    pub const fn is_daytime(&self) -> bool {
        self.0 >= DAY_START && self.0 <= DAY_END
    }
}

/// Pointer location expressed in logical interaction-surface units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    x: f32,
    y: f32,
}

impl PointerPosition {
    /// Creates a new pointer position from surface coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate on the interaction surface.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate on the interaction surface.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Axis-aligned rectangle bounding a drop zone on the interaction surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneBounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl ZoneBounds {
    /// Creates bounds from opposing corner coordinates.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Reports whether the provided pointer position lies within the bounds.
    #[must_use]
    pub fn contains(&self, pointer: PointerPosition) -> bool {
        pointer.x() >= self.min_x
            && pointer.x() <= self.max_x
            && pointer.y() >= self.min_y
            && pointer.y() <= self.max_y
    }

    /// Surface area covered by the bounds.
    ///
    /// Nested zones are disambiguated by area: the smallest enclosing zone is
    /// the nearest one.
    #[must_use]
    pub fn area(&self) -> f32 {
        (self.max_x - self.min_x).max(0.0) * (self.max_y - self.min_y).max(0.0)
    }

    /// Left edge of the bounds.
    #[must_use]
    pub const fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Top edge of the bounds.
    #[must_use]
    pub const fn min_y(&self) -> f32 {
        self.min_y
    }

    /// Right edge of the bounds.
    #[must_use]
    pub const fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Bottom edge of the bounds.
    #[must_use]
    pub const fn max_y(&self) -> f32 {
        self.max_y
    }
}

/// Configuration describing one session of the experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hour the clock shows when the session starts or resets.
    pub initial_hour: HourOfDay,
    /// Number of water tokens in the pool.
    pub water_tokens: u32,
    /// Number of carbon-dioxide tokens in the pool.
    pub co2_tokens: u32,
    /// Glucose units required to complete the session.
    pub glucose_target: u32,
    /// Units of water and CO2 consumed by each production cycle.
    pub consumption_per_firing: u32,
}

impl SessionConfig {
    /// Creates a configuration with explicit field values.
    #[must_use]
    pub const fn new(
        initial_hour: HourOfDay,
        water_tokens: u32,
        co2_tokens: u32,
        glucose_target: u32,
        consumption_per_firing: u32,
    ) -> Self {
        Self {
            initial_hour,
            water_tokens,
            co2_tokens,
            glucose_target,
            consumption_per_firing,
        }
    }
}

impl Default for SessionConfig {
    /// The canonical session: six tokens per kind, a three-fruit target, one
    /// unit consumed per firing, and a 22:00 start so the player must move
    /// the clock before photosynthesis can fire.
    fn default() -> Self {
        Self {
            initial_hour: HourOfDay::new(22),
            water_tokens: 6,
            co2_tokens: 6,
            glucose_target: 3,
            consumption_per_firing: 1,
        }
    }
}

/// Immutable representation of a single token's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSnapshot {
    /// Identifier assigned to the token.
    pub id: TokenId,
    /// Kind of molecule the token represents.
    pub kind: MoleculeKind,
    /// Lifecycle state the token currently occupies.
    pub state: TokenState,
}

/// Read-only snapshot describing the full token pool.
#[derive(Clone, Debug, Default)]
pub struct TokenView {
    snapshots: Vec<TokenSnapshot>,
}

impl TokenView {
    /// Creates a new token view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TokenSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured token snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TokenSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TokenSnapshot> {
        self.snapshots
    }
}

/// Immutable read of the counters, clock, and completion state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current hour shown by the clock.
    pub hour: HourOfDay,
    /// Whether the clock falls within the daylight window.
    pub daytime: bool,
    /// Water units delivered and not yet consumed.
    pub water_collected: u32,
    /// Carbon-dioxide units delivered and not yet consumed.
    pub co2_collected: u32,
    /// Size of the water token pool.
    pub water_capacity: u32,
    /// Size of the carbon-dioxide token pool.
    pub co2_capacity: u32,
    /// Glucose units produced so far.
    pub glucose_produced: u32,
    /// Glucose units required to complete the session.
    pub glucose_target: u32,
    /// Whether the glucose target has been reached.
    pub complete: bool,
}

#[cfg(test)]
mod tests {
    use super::{HourOfDay, MoleculeKind, PointerPosition, SessionConfig, TokenId, ZoneBounds};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn hour_clamps_out_of_range_input() {
        assert_eq!(HourOfDay::clamped(-5).get(), 0);
        assert_eq!(HourOfDay::clamped(47).get(), 23);
        assert_eq!(HourOfDay::clamped(12).get(), 12);
    }

    #[test]
    fn daytime_window_is_inclusive_at_both_bounds() {
        assert!(!HourOfDay::new(5).is_daytime());
        assert!(HourOfDay::new(6).is_daytime());
        assert!(HourOfDay::new(18).is_daytime());
        assert!(!HourOfDay::new(19).is_daytime());
    }

    #[test]
    fn zone_bounds_contain_edges() {
        let bounds = ZoneBounds::new(10.0, 10.0, 20.0, 30.0);
        assert!(bounds.contains(PointerPosition::new(10.0, 30.0)));
        assert!(bounds.contains(PointerPosition::new(15.0, 20.0)));
        assert!(!bounds.contains(PointerPosition::new(9.9, 20.0)));
        assert_eq!(bounds.area(), 200.0);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn token_id_round_trips_through_bincode() {
        assert_round_trip(&TokenId::new(3));
    }

    #[test]
    fn session_config_round_trips_through_bincode() {
        assert_round_trip(&SessionConfig::default());
        assert_round_trip(&MoleculeKind::Co2);
    }
}
