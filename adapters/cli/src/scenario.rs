#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use greenhouse_core::{MoleculeKind, SessionConfig};
use serde::{Deserialize, Serialize};

const SCRIPT_DOMAIN: &str = "garden";
const SCRIPT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded script payload.
pub(crate) const SCRIPT_HEADER: &str = "garden:v1";
/// Delimiter used to separate the prefix, version and payload.
const FIELD_DELIMITER: char = ':';

/// Shareable script describing one scripted session play-through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct ScenarioScript {
    /// Session configuration the script expects to run against.
    pub config: SessionConfig,
    /// Actions performed in order.
    pub actions: Vec<ScriptedAction>,
}

impl ScenarioScript {
    /// Encodes the script into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("scenario script serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SCRIPT_HEADER}:{encoded}")
    }

    /// Decodes a script from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, ScenarioTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ScenarioTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ScenarioTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(ScenarioTransferError::MissingVersion)?;
        let payload = parts.next().ok_or(ScenarioTransferError::MissingPayload)?;

        if domain != SCRIPT_DOMAIN {
            return Err(ScenarioTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SCRIPT_VERSION {
            return Err(ScenarioTransferError::UnsupportedVersion(
                version.to_owned(),
            ));
        }

        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ScenarioTransferError::InvalidEncoding)?;
        serde_json::from_slice(&bytes).map_err(ScenarioTransferError::InvalidPayload)
    }
}

/// Single step within a scenario script.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum ScriptedAction {
    /// Moves the clock to the provided hour.
    SetHour {
        /// Requested hour; out-of-range values clamp like the slider does.
        hour: i32,
    },
    /// Adjusts the clock by the provided number of hours.
    StepHour {
        /// Signed hour delta.
        delta: i32,
    },
    /// Grabs an available token of the kind and releases it at the target.
    Drag {
        /// Kind of token to deliver.
        kind: MoleculeKind,
        /// Horizontal release coordinate in surface units.
        to_x: f32,
        /// Vertical release coordinate in surface units.
        to_y: f32,
    },
    /// Restarts the session.
    Reset,
}

/// The built-in demonstration script: one water delivery at night, a jump to
/// midday, then alternating deliveries until the fruit target is reached.
pub(crate) fn demo_script() -> ScenarioScript {
    let config = SessionConfig::default();
    let mut actions = vec![
        ScriptedAction::Drag {
            kind: MoleculeKind::Water,
            to_x: 400.0,
            to_y: 530.0,
        },
        ScriptedAction::SetHour { hour: 12 },
    ];
    for index in 0..config.glucose_target {
        actions.push(ScriptedAction::Drag {
            kind: MoleculeKind::Co2,
            to_x: 290.0,
            to_y: 180.0,
        });
        if index + 1 < config.glucose_target {
            actions.push(ScriptedAction::Drag {
                kind: MoleculeKind::Water,
                to_x: 400.0,
                to_y: 530.0,
            });
        }
    }
    ScenarioScript { config, actions }
}

/// Errors that can occur while decoding scenario transfer strings.
#[derive(Debug)]
pub(crate) enum ScenarioTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded script.
    MissingPrefix,
    /// The encoded script did not contain a version segment.
    MissingVersion,
    /// The encoded script did not include the payload segment.
    MissingPayload,
    /// The encoded script used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded script used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for ScenarioTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "scenario payload was empty"),
            Self::MissingPrefix => write!(f, "scenario string is missing the prefix"),
            Self::MissingVersion => write!(f, "scenario string is missing the version"),
            Self::MissingPayload => write!(f, "scenario string is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "scenario prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "scenario version '{version}' is not supported")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode scenario payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse scenario payload: {error}")
            }
        }
    }
}

impl Error for ScenarioTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenhouse_core::HourOfDay;

    #[test]
    fn round_trip_demo_script() {
        let script = demo_script();

        let encoded = script.encode();
        assert!(encoded.starts_with(&format!("{SCRIPT_HEADER}:")));

        let decoded = ScenarioScript::decode(&encoded).expect("script decodes");
        assert_eq!(script, decoded);
    }

    #[test]
    fn round_trip_custom_script() {
        let script = ScenarioScript {
            config: SessionConfig::new(HourOfDay::new(8), 2, 2, 1, 1),
            actions: vec![
                ScriptedAction::StepHour { delta: -3 },
                ScriptedAction::Drag {
                    kind: MoleculeKind::Water,
                    to_x: 400.0,
                    to_y: 530.0,
                },
                ScriptedAction::Reset,
            ],
        };

        let decoded = ScenarioScript::decode(&script.encode()).expect("script decodes");
        assert_eq!(script, decoded);
    }

    #[test]
    fn decode_rejects_foreign_prefixes() {
        assert!(matches!(
            ScenarioScript::decode("   "),
            Err(ScenarioTransferError::EmptyPayload)
        ));
        assert!(matches!(
            ScenarioScript::decode("meadow:v1:AAAA"),
            Err(ScenarioTransferError::InvalidPrefix(_))
        ));
        assert!(matches!(
            ScenarioScript::decode("garden:v9:AAAA"),
            Err(ScenarioTransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            ScenarioScript::decode("garden:v1:!!!"),
            Err(ScenarioTransferError::InvalidEncoding(_))
        ));
    }
}
