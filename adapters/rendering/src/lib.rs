#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Greenhouse adapters.
//!
//! Backends receive a [`Presentation`] projected from the world's read-only
//! views. The projection decides where every sprite sits; backends only draw.

use anyhow::{Context, Result as AnyResult};
use glam::Vec2;
use greenhouse_core::{
    MoleculeKind, SessionSnapshot, TokenId, TokenState, TokenView, ZoneId,
};
use greenhouse_world::{query::DragSnapshot, Zone};
use std::{error::Error, fmt};

/// Logical size of the interaction surface in surface units.
pub const SURFACE_SIZE: Vec2 = Vec2::new(800.0, 600.0);

/// Radius used for token sprites and pointer hit testing.
pub const TOKEN_RADIUS: f32 = 16.0;

const WATER_TRAY_ORIGIN: Vec2 = Vec2::new(60.0, 340.0);
const CO2_TRAY_ORIGIN: Vec2 = Vec2::new(740.0, 60.0);
const TRAY_SPACING: f32 = 40.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Day or night sky treatment derived from the session clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkyPhase {
    /// Bright sky with the sun visible.
    Day,
    /// Darkened sky; photosynthesis visuals are muted.
    Night,
}

impl SkyPhase {
    /// Clear color associated with the sky phase.
    #[must_use]
    pub const fn clear_color(self) -> Color {
        match self {
            Self::Day => Color::from_rgb_u8(0x87, 0xce, 0xeb),
            Self::Night => Color::from_rgb_u8(0x1a, 0x1a, 0x2e),
        }
    }
}

/// Input snapshot gathered by adapters before updating the session.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position in surface units, or `None` once the pointer left
    /// the surface.
    pub pointer: Option<Vec2>,
    /// Whether the adapter detected a press edge on this frame.
    pub pressed: bool,
    /// Whether the adapter detected a release edge on this frame.
    pub released: bool,
    /// Whether the player asked to step the clock one hour back.
    pub step_back: bool,
    /// Whether the player asked to step the clock one hour forward.
    pub step_forward: bool,
    /// Whether the player asked to restart the session.
    pub restart: bool,
}

/// Sprite describing one molecule token on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TokenSprite {
    /// Identifier of the token the sprite represents.
    pub id: TokenId,
    /// Kind of molecule the sprite represents.
    pub kind: MoleculeKind,
    /// Center of the sprite in surface units.
    pub position: Vec2,
    /// Whether the sprite is currently following the pointer.
    pub in_flight: bool,
}

/// Shape describing one drop zone on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneShape {
    /// Identifier of the zone the shape represents.
    pub id: ZoneId,
    /// Kind of molecule the zone accepts.
    pub accepts: MoleculeKind,
    /// Upper-left corner of the zone in surface units.
    pub min: Vec2,
    /// Lower-right corner of the zone in surface units.
    pub max: Vec2,
    /// Whether the zone is the current drop candidate and should glow.
    pub highlighted: bool,
}

/// Counter readout shown alongside the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterReadout {
    /// Water units delivered and not yet consumed.
    pub water_collected: u32,
    /// Size of the water token pool.
    pub water_capacity: u32,
    /// Carbon-dioxide units delivered and not yet consumed.
    pub co2_collected: u32,
    /// Size of the carbon-dioxide token pool.
    pub co2_capacity: u32,
    /// Glucose units produced so far.
    pub glucose_produced: u32,
    /// Glucose units required to complete the session.
    pub glucose_target: u32,
}

/// Complete description of one frame ready for a backend to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Sky treatment for the frame.
    pub sky: SkyPhase,
    /// Clock label in `HH:00` form.
    pub clock_label: String,
    /// Drop zones in draw order (outermost first).
    pub zones: Vec<ZoneShape>,
    /// Token sprites in draw order.
    pub tokens: Vec<TokenSprite>,
    /// Counter readout for the frame.
    pub counters: CounterReadout,
    /// Whether the completion celebration should play.
    pub complete: bool,
}

impl Scene {
    /// Finds the topmost token sprite under the provided pointer position.
    #[must_use]
    pub fn token_at(&self, position: Vec2) -> Option<TokenId> {
        self.tokens
            .iter()
            .rev()
            .find(|sprite| sprite.position.distance(position) <= TOKEN_RADIUS)
            .map(|sprite| sprite.id)
    }
}

/// Projects the world's read-only views into a drawable scene.
///
/// Available tokens sit at their tray origins, the in-flight token follows
/// the pointer, and collected tokens leave the surface. The candidate zone
/// reported by the active gesture is flagged for highlighting.
#[must_use]
pub fn project_scene(
    snapshot: &SessionSnapshot,
    tokens: &TokenView,
    zones: &[Zone],
    drag: Option<DragSnapshot>,
    pointer: Option<Vec2>,
) -> Scene {
    let sky = if snapshot.daytime {
        SkyPhase::Day
    } else {
        SkyPhase::Night
    };

    let candidate = drag.and_then(|drag| drag.candidate);
    let zone_shapes = zones
        .iter()
        .map(|zone| {
            let bounds = zone.bounds();
            ZoneShape {
                id: zone.id(),
                accepts: zone.accepts(),
                min: Vec2::new(bounds.min_x(), bounds.min_y()),
                max: Vec2::new(bounds.max_x(), bounds.max_y()),
                highlighted: candidate == Some(zone.id()),
            }
        })
        .collect();

    let in_flight = drag.map(|drag| drag.token);
    let mut water_slot = 0;
    let mut co2_slot = 0;
    let mut sprites = Vec::new();
    for token in tokens.iter() {
        let slot = match token.kind {
            MoleculeKind::Water => &mut water_slot,
            MoleculeKind::Co2 => &mut co2_slot,
        };
        let origin = tray_origin(token.kind, *slot);
        *slot += 1;

        match token.state {
            TokenState::Collected => {}
            TokenState::InFlight => {
                if in_flight == Some(token.id) {
                    sprites.push(TokenSprite {
                        id: token.id,
                        kind: token.kind,
                        position: pointer.unwrap_or(origin),
                        in_flight: true,
                    });
                }
            }
            TokenState::Available => {
                sprites.push(TokenSprite {
                    id: token.id,
                    kind: token.kind,
                    position: origin,
                    in_flight: false,
                });
            }
        }
    }

    Scene {
        sky,
        clock_label: format!("{:02}:00", snapshot.hour.get()),
        zones: zone_shapes,
        tokens: sprites,
        counters: CounterReadout {
            water_collected: snapshot.water_collected,
            water_capacity: snapshot.water_capacity,
            co2_collected: snapshot.co2_collected,
            co2_capacity: snapshot.co2_capacity,
            glucose_produced: snapshot.glucose_produced,
            glucose_target: snapshot.glucose_target,
        },
        complete: snapshot.complete,
    }
}

/// Tray origin for the `slot`-th token of the provided kind.
#[must_use]
pub fn tray_origin(kind: MoleculeKind, slot: u32) -> Vec2 {
    let offset = slot as f32 * TRAY_SPACING;
    match kind {
        MoleculeKind::Water => WATER_TRAY_ORIGIN + Vec2::new(0.0, offset),
        MoleculeKind::Co2 => CO2_TRAY_ORIGIN + Vec2::new(0.0, offset),
    }
}

/// Frame handed to a backend for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title the backend should apply to its window or stream.
    pub window_title: String,
    /// Color the backend should clear with before drawing the scene.
    pub clear_color: Color,
    /// Scene content to draw.
    pub scene: Scene,
}

impl Presentation {
    /// Creates a new presentation for the provided scene.
    #[must_use]
    pub fn new<T>(window_title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color: scene.sky.clear_color(),
            scene,
        }
    }
}

/// Drawing surface implemented by concrete adapters.
pub trait RenderingBackend {
    /// Draws one presentation, returning an error if the surface is lost.
    fn present(&mut self, presentation: &Presentation) -> Result<(), RenderingError>;
}

/// Error raised when a backend cannot present a frame.
#[derive(Debug)]
pub struct RenderingError {
    message: String,
}

impl RenderingError {
    /// Creates a new error with the provided description.
    #[must_use]
    pub fn new<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to present frame: {}", self.message)
    }
}

impl Error for RenderingError {}

/// Presents a frame through the backend, attaching adapter context.
pub fn present_frame<B>(backend: &mut B, presentation: &Presentation) -> AnyResult<()>
where
    B: RenderingBackend,
{
    backend
        .present(presentation)
        .with_context(|| format!("presenting '{}'", presentation.window_title))
}
