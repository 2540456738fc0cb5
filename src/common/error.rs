//! Error types shared by the core and its collaborators

use thiserror::Error;

/// A fault reported by a motor, LED, sound or sensor driver
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("{device} is not connected")]
    Disconnected { device: &'static str },

    #[error("{device} rejected the command: {reason}")]
    Rejected { device: &'static str, reason: String },
}

/// An inbound directive that could not be dispatched
#[derive(Debug, Error)]
pub enum DirectiveError {
    #[error("missing expected parameter `{0}`")]
    MissingParameter(&'static str),

    #[error("malformed parameter `{name}`: {reason}")]
    MalformedParameter { name: &'static str, reason: String },

    #[error("directive payload is not valid JSON")]
    Decode(#[from] serde_json::Error),
}

impl DirectiveError {
    pub fn malformed(name: &'static str, reason: impl Into<String>) -> Self {
        DirectiveError::MalformedParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// The transport could not take an outbound event
#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to encode event")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write event")]
    Io(#[from] std::io::Error),
}
