#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that translates adapter frames into session commands.

use greenhouse_core::{Command, PointerPosition, TokenId};

/// Pointer observations distilled from one adapter frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerFrame {
    /// Pointer position on the interaction surface, or `None` once the
    /// pointer has left the surface entirely.
    pub position: Option<PointerPosition>,
    /// Whether the adapter detected a press edge on this frame.
    pub pressed: bool,
    /// Whether the adapter detected a release edge on this frame.
    pub released: bool,
    /// Token under the pointer at press time, resolved by the adapter.
    pub token_under_pointer: Option<TokenId>,
}

impl Default for PointerFrame {
    fn default() -> Self {
        Self {
            position: None,
            pressed: false,
            released: false,
            token_under_pointer: None,
        }
    }
}

/// Keyboard observations distilled from one adapter frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct KeyFrame {
    /// Whether the player asked to step the clock one hour back.
    pub step_back: bool,
    /// Whether the player asked to step the clock one hour forward.
    pub step_forward: bool,
    /// Whether the player asked to restart the session.
    pub restart: bool,
}

/// Input system that turns pointer and keyboard frames into command batches.
#[derive(Debug, Default)]
pub struct Interaction {
    last_position: Option<PointerPosition>,
}

impl Interaction {
    /// Creates a new interaction system with no remembered pointer state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one frame of adapter input and emits session commands.
    ///
    /// The `dragging` flag mirrors the world's gesture state so the system
    /// never emits drag updates for a gesture the world is not tracking.
    pub fn handle(
        &mut self,
        pointer: PointerFrame,
        keys: KeyFrame,
        dragging: bool,
        out: &mut Vec<Command>,
    ) {
        match pointer.position {
            None => {
                if dragging {
                    out.push(Command::CancelDrag);
                }
                self.last_position = None;
            }
            Some(position) => {
                if dragging {
                    if pointer.released {
                        out.push(Command::EndDrag { pointer: position });
                    } else if self.last_position != Some(position) {
                        out.push(Command::UpdateDrag { pointer: position });
                    }
                } else if pointer.pressed {
                    if let Some(token) = pointer.token_under_pointer {
                        out.push(Command::BeginDrag {
                            token,
                            pointer: position,
                        });
                    }
                }
                self.last_position = Some(position);
            }
        }

        if keys.step_back {
            out.push(Command::StepHour { delta: -1 });
        }
        if keys.step_forward {
            out.push(Command::StepHour { delta: 1 });
        }
        if keys.restart {
            out.push(Command::Reset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Option<PointerPosition> {
        Some(PointerPosition::new(x, y))
    }

    #[test]
    fn press_over_token_begins_a_drag() {
        let mut interaction = Interaction::new();
        let mut out = Vec::new();

        interaction.handle(
            PointerFrame {
                position: at(12.0, 30.0),
                pressed: true,
                token_under_pointer: Some(TokenId::new(4)),
                ..PointerFrame::default()
            },
            KeyFrame::default(),
            false,
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::BeginDrag {
                token: TokenId::new(4),
                pointer: PointerPosition::new(12.0, 30.0),
            }]
        );
    }

    #[test]
    fn press_over_empty_surface_is_silent() {
        let mut interaction = Interaction::new();
        let mut out = Vec::new();

        interaction.handle(
            PointerFrame {
                position: at(12.0, 30.0),
                pressed: true,
                ..PointerFrame::default()
            },
            KeyFrame::default(),
            false,
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn stationary_pointer_suppresses_redundant_updates() {
        let mut interaction = Interaction::new();
        let mut out = Vec::new();

        interaction.handle(
            PointerFrame {
                position: at(40.0, 40.0),
                ..PointerFrame::default()
            },
            KeyFrame::default(),
            true,
            &mut out,
        );
        interaction.handle(
            PointerFrame {
                position: at(40.0, 40.0),
                ..PointerFrame::default()
            },
            KeyFrame::default(),
            true,
            &mut out,
        );
        interaction.handle(
            PointerFrame {
                position: at(41.0, 40.0),
                ..PointerFrame::default()
            },
            KeyFrame::default(),
            true,
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::UpdateDrag {
                    pointer: PointerPosition::new(40.0, 40.0)
                },
                Command::UpdateDrag {
                    pointer: PointerPosition::new(41.0, 40.0)
                },
            ]
        );
    }

    #[test]
    fn release_ends_the_gesture_in_place() {
        let mut interaction = Interaction::new();
        let mut out = Vec::new();

        interaction.handle(
            PointerFrame {
                position: at(300.0, 180.0),
                released: true,
                ..PointerFrame::default()
            },
            KeyFrame::default(),
            true,
            &mut out,
        );

        assert_eq!(
            out,
            vec![Command::EndDrag {
                pointer: PointerPosition::new(300.0, 180.0)
            }]
        );
    }

    #[test]
    fn leaving_the_surface_cancels_only_active_gestures() {
        let mut interaction = Interaction::new();
        let mut out = Vec::new();

        interaction.handle(PointerFrame::default(), KeyFrame::default(), false, &mut out);
        assert!(out.is_empty());

        interaction.handle(PointerFrame::default(), KeyFrame::default(), true, &mut out);
        assert_eq!(out, vec![Command::CancelDrag]);
    }

    #[test]
    fn keyboard_edges_map_to_clock_and_reset_commands() {
        let mut interaction = Interaction::new();
        let mut out = Vec::new();

        interaction.handle(
            PointerFrame::default(),
            KeyFrame {
                step_back: true,
                step_forward: true,
                restart: true,
            },
            false,
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::StepHour { delta: -1 },
                Command::StepHour { delta: 1 },
                Command::Reset,
            ]
        );
    }
}
