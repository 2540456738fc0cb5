//! Indicator LEDs and sound feedback

use crate::common::error::DeviceError;
use crate::common::types::{LedColor, LedGroup, Note};
use crate::lifecycle::{LifecycleNode, LifecycleNodeBase, State};
use anyhow::Result;
use std::any::Any;
use std::sync::Arc;
use tracing::{info, warn};

pub const STARTUP_SONG: [Note; 3] = [Note::eighth("C4"), Note::eighth("D4"), Note::quarter("E5")];
pub const SHUTDOWN_SONG: [Note; 2] = [Note::eighth("E5"), Note::eighth("C4")];

/// Driver for the brick's status LEDs
pub trait Indicators: Send + Sync {
    /// `brightness` is a fraction in `0.0..=1.0`
    fn set_color(&self, group: LedGroup, color: LedColor, brightness: f32) -> Result<(), DeviceError>;
}

/// Driver for the speaker
pub trait Sound: Send + Sync {
    fn play_song(&self, song: &[Note]) -> Result<(), DeviceError>;
}

/// Set both LEDs to `color`, logging driver faults
pub fn set_all(indicators: &dyn Indicators, color: LedColor, brightness: f32) {
    for group in LedGroup::ALL {
        if let Err(err) = indicators.set_color(group, color, brightness) {
            warn!(error = %err, ?group, ?color, "failed to set indicator");
        }
    }
}

/// Startup/shutdown tunes and connection status lights
pub struct StatusFeedback {
    base: LifecycleNodeBase,
    indicators: Arc<dyn Indicators>,
    sound: Arc<dyn Sound>,
}

impl StatusFeedback {
    pub fn new(indicators: Arc<dyn Indicators>, sound: Arc<dyn Sound>) -> Self {
        StatusFeedback {
            base: LifecycleNodeBase::new("status_feedback"),
            indicators,
            sound,
        }
    }

    /// The remote agent paired with the robot
    pub fn connected(&self, device_addr: &str) {
        info!(device_addr, "connected to voice agent");
        set_all(self.indicators.as_ref(), LedColor::Green, 1.0);
    }

    /// The remote agent went away
    pub fn disconnected(&self, device_addr: &str) {
        info!(device_addr, "disconnected from voice agent");
        set_all(self.indicators.as_ref(), LedColor::Black, 1.0);
    }

    fn play(&self, song: &[Note]) {
        if let Err(err) = self.sound.play_song(song) {
            warn!(error = %err, "failed to play tone sequence");
        }
    }
}

impl LifecycleNode for StatusFeedback {
    fn on_configure(&mut self) -> Result<()> {
        set_all(self.indicators.as_ref(), LedColor::Black, 1.0);
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_activate(&mut self) -> Result<()> {
        self.play(&STARTUP_SONG);
        set_all(self.indicators.as_ref(), LedColor::Green, 1.0);
        self.base.set_state(State::Active);
        Ok(())
    }

    fn on_deactivate(&mut self) -> Result<()> {
        self.play(&SHUTDOWN_SONG);
        set_all(self.indicators.as_ref(), LedColor::Black, 1.0);
        self.base.set_state(State::Inactive);
        Ok(())
    }

    fn on_cleanup(&mut self) -> Result<()> {
        self.base.set_state(State::Unconfigured);
        Ok(())
    }

    fn state(&self) -> State {
        self.base.get_state()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
