//! Inbound directives from the remote voice agent
pub mod router;
pub mod vocabulary;

pub use self::router::{DirectiveRouter, Routed};
pub use self::vocabulary::{Direction, PresetCommand};
