//! Classifies control payloads and dispatches them
//!
//! Two payload shapes are understood:
//!
//! ```text
//! {"type": "move",    "direction": <string>, "duration": <number>, "speed": <number>}
//! {"type": "command", "command": <string>, "speed": <number optional>}
//! ```
//!
//! Numbers may also arrive as numeric strings and are truncated to whole
//! values. Anything unusable is logged and dropped; nothing here is fatal.

use super::vocabulary::{Direction, PresetCommand};
use crate::behaviors::ModeController;
use crate::common::error::DirectiveError;
use crate::control::{MotionExecutor, MotionRequest};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of classifying a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Move(MotionRequest),
    Preset { command: PresetCommand, speed: u8 },
    UnknownDirection(String),
    UnknownCommand(String),
    /// A `type` this controller has no branch for
    Ignored(String),
}

pub struct DirectiveRouter {
    motion: Arc<MotionExecutor>,
    modes: Arc<ModeController>,
    default_speed: u8,
}

impl DirectiveRouter {
    pub fn new(motion: Arc<MotionExecutor>, modes: Arc<ModeController>, default_speed: u8) -> Self {
        DirectiveRouter {
            motion,
            modes,
            default_speed,
        }
    }

    /// Decode a raw UTF-8 JSON payload and handle it
    pub async fn handle_bytes(&self, bytes: &[u8]) {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(payload) => self.handle(&payload).await,
            Err(err) => {
                let err = DirectiveError::from(err);
                warn!(error = %err, "discarding undecodable directive");
            }
        }
    }

    /// Handle a decoded payload, logging and discarding anything malformed
    pub async fn handle(&self, payload: &Value) {
        info!(%payload, "control payload");
        if let Err(err) = self.try_handle(payload).await {
            warn!(error = %err, %payload, "discarding directive");
        }
    }

    pub async fn try_handle(&self, payload: &Value) -> Result<Routed, DirectiveError> {
        let routed = self.classify(payload)?;
        self.dispatch(&routed).await;
        Ok(routed)
    }

    /// Work out what a payload asks for without acting on it
    pub fn classify(&self, payload: &Value) -> Result<Routed, DirectiveError> {
        let control_type = required_str(payload, "type")?;
        match control_type {
            "move" => {
                let token = required_str(payload, "direction")?;
                let duration = required_int(payload, "duration")?;
                let speed = required_int(payload, "speed")?;

                // A stop halts regardless of the duration and speed it carries.
                let request = match Direction::from_token(token) {
                    Some(Direction::Stop) => MotionRequest {
                        direction: Direction::Stop,
                        duration: Duration::ZERO,
                        speed: 0,
                        blocking: false,
                    },
                    Some(direction) => MotionRequest {
                        direction,
                        duration: duration_secs(duration)?,
                        speed: speed_percent(speed)?,
                        blocking: false,
                    },
                    None => return Ok(Routed::UnknownDirection(token.to_string())),
                };
                Ok(Routed::Move(request))
            }
            "command" => {
                let command = required_str(payload, "command")?;
                let speed = match optional(payload, "speed") {
                    Some(value) => speed_percent(coerce_int(value, "speed")?)?,
                    None => self.default_speed,
                };

                Ok(match PresetCommand::from_token(command) {
                    Some(command) => Routed::Preset { command, speed },
                    None => Routed::UnknownCommand(command.to_string()),
                })
            }
            other => Ok(Routed::Ignored(other.to_string())),
        }
    }

    async fn dispatch(&self, routed: &Routed) {
        match routed {
            Routed::Move(request) => self.motion.execute(*request).await,
            Routed::Preset { command, speed } => self.modes.activate(*command, *speed).await,
            Routed::UnknownDirection(token) => debug!(token = %token, "no direction matches, ignoring"),
            Routed::UnknownCommand(token) => debug!(token = %token, "no preset command matches, ignoring"),
            Routed::Ignored(control_type) => debug!(control_type = %control_type, "unhandled control type"),
        }
    }
}

fn optional<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload.get(name).filter(|value| !value.is_null())
}

fn required<'a>(payload: &'a Value, name: &'static str) -> Result<&'a Value, DirectiveError> {
    optional(payload, name).ok_or(DirectiveError::MissingParameter(name))
}

fn required_str<'a>(payload: &'a Value, name: &'static str) -> Result<&'a str, DirectiveError> {
    required(payload, name)?
        .as_str()
        .ok_or_else(|| DirectiveError::malformed(name, "expected a string"))
}

fn required_int(payload: &Value, name: &'static str) -> Result<i64, DirectiveError> {
    coerce_int(required(payload, name)?, name)
}

/// Integer coercion: numbers truncate toward zero, strings must hold an integer
fn coerce_int(value: &Value, name: &'static str) -> Result<i64, DirectiveError> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            match number.as_f64() {
                Some(float) if float.is_finite() => Ok(float.trunc() as i64),
                _ => Err(DirectiveError::malformed(name, format!("{} is out of range", number))),
            }
        }
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| DirectiveError::malformed(name, format!("`{}` is not an integer", text))),
        other => Err(DirectiveError::malformed(
            name,
            format!("expected a number, got {}", other),
        )),
    }
}

fn duration_secs(value: i64) -> Result<Duration, DirectiveError> {
    if value < 1 {
        return Err(DirectiveError::malformed(
            "duration",
            format!("must be at least one second, got {}", value),
        ));
    }
    Ok(Duration::from_secs(value as u64))
}

fn speed_percent(value: i64) -> Result<u8, DirectiveError> {
    if !(0..=100).contains(&value) {
        return Err(DirectiveError::malformed(
            "speed",
            format!("must be within 0..=100, got {}", value),
        ));
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_truncates_floats_and_parses_strings() {
        assert_eq!(coerce_int(&serde_json::json!(3.9), "duration").unwrap(), 3);
        assert_eq!(coerce_int(&serde_json::json!("42"), "speed").unwrap(), 42);
        assert!(coerce_int(&serde_json::json!("4.5"), "speed").is_err());
        assert!(coerce_int(&serde_json::json!(true), "speed").is_err());
        assert!(coerce_int(&serde_json::json!([1]), "speed").is_err());
    }

    #[test]
    fn range_checks() {
        assert!(duration_secs(0).is_err());
        assert_eq!(duration_secs(5).unwrap(), Duration::from_secs(5));
        assert!(speed_percent(101).is_err());
        assert!(speed_percent(-1).is_err());
        assert_eq!(speed_percent(0).unwrap(), 0);
    }
}
