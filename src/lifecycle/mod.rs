//! Lifecycle management for Tagbot components
//!
//! [`crate::TagBot`] drives every registered component through the same
//! sequence: configure and activate on startup, then deactivate and clean
//! up (in reverse registration order) on shutdown. Tagbot registers two:
//! the status feedback, which owns the tunes and connection lights, and
//! the behavior supervisor, which owns the seek and wander loop tasks.

use anyhow::Result;
use std::any::Any;

/// Trait for components that follow a lifecycle pattern
pub trait LifecycleNode: Send + Sync {
    /// Bring drivers to a known idle state
    fn on_configure(&mut self) -> Result<()>;

    /// Start doing work; may spawn tasks on the current tokio runtime
    fn on_activate(&mut self) -> Result<()>;

    /// Stop doing work. Spawned tasks are signalled, not awaited.
    fn on_deactivate(&mut self) -> Result<()>;

    /// Clean up the node
    fn on_cleanup(&mut self) -> Result<()>;

    /// Current lifecycle state
    fn state(&self) -> State;

    /// Convert to Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Base implementation for lifecycle nodes
#[derive(Debug)]
pub struct LifecycleNodeBase {
    pub name: String,
    state: State,
}

/// State of a lifecycle node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unconfigured,
    Inactive,
    Active,
}

impl LifecycleNodeBase {
    /// Create a new lifecycle node base
    pub fn new(name: &str) -> Self {
        LifecycleNodeBase {
            name: name.to_string(),
            state: State::Unconfigured,
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> State {
        self.state
    }

    /// Set the state
    pub fn set_state(&mut self, state: State) {
        tracing::debug!(node = %self.name, from = ?self.state, to = ?state, "lifecycle transition");
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_starts_unconfigured_and_tracks_transitions() {
        let mut base = LifecycleNodeBase::new("status_feedback");
        assert_eq!(base.get_state(), State::Unconfigured);

        for state in [State::Inactive, State::Active, State::Inactive, State::Unconfigured] {
            base.set_state(state);
            assert_eq!(base.get_state(), state);
        }
    }
}
