//! Outbound events sent back to the remote voice agent

use crate::common::error::EventError;
use serde_json::{json, Value};
use tracing::warn;

/// Namespace the remote skill listens on for custom events
pub const EVENT_NAMESPACE: &str = "Custom.Mindstorms.Gadget";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventName {
    Proximity,
    Speech,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::Proximity => "Proximity",
            EventName::Speech => "Speech",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEvent {
    pub name: EventName,
    pub payload: Value,
}

impl OutboundEvent {
    pub fn speech(text: impl Into<String>) -> Self {
        OutboundEvent {
            name: EventName::Speech,
            payload: json!({ "speechOut": text.into() }),
        }
    }

    pub fn proximity(distance_cm: f64) -> Self {
        OutboundEvent {
            name: EventName::Proximity,
            payload: json!({ "distance": distance_cm }),
        }
    }
}

/// The transport side that delivers events to the remote agent
pub trait EventSink: Send + Sync {
    fn send(&self, event: OutboundEvent) -> Result<(), EventError>;
}

/// Send an event, logging instead of failing if the transport rejects it
pub fn emit(sink: &dyn EventSink, event: OutboundEvent) {
    let name = event.name;
    if let Err(err) = sink.send(event) {
        warn!(event = name.as_str(), error = %err, "failed to send event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_use_the_skill_field_names() {
        let speech = OutboundEvent::speech("Tag you are it!");
        assert_eq!(speech.payload, json!({ "speechOut": "Tag you are it!" }));

        let proximity = OutboundEvent::proximity(6.0);
        assert_eq!(proximity.name.as_str(), "Proximity");
        assert_eq!(proximity.payload["distance"], json!(6.0));
    }
}
