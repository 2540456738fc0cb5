//! Simulated drivers for running the game without a robot attached

use crate::common::error::{DeviceError, EventError};
use crate::common::types::{LedColor, LedGroup, Note, WheelSpeeds};
use crate::config::DriveConfig;
use crate::control::MotorPair;
use crate::events::{EventSink, OutboundEvent, EVENT_NAMESPACE};
use crate::feedback::{Indicators, Sound};
use crate::perception::ProximitySensor;
use crate::Peripherals;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Logs motor commands against the configured ports
#[derive(Debug)]
pub struct SimMotors {
    left_port: String,
    right_port: String,
}

impl SimMotors {
    pub fn new(config: &DriveConfig) -> Self {
        SimMotors {
            left_port: config.left_motor_port.clone(),
            right_port: config.right_motor_port.clone(),
        }
    }
}

impl MotorPair for SimMotors {
    fn run(&self, speeds: WheelSpeeds) -> Result<(), DeviceError> {
        debug!(
            target: "sim::motors",
            left_port = %self.left_port,
            right_port = %self.right_port,
            left = speeds.left,
            right = speeds.right,
            "run"
        );
        Ok(())
    }

    fn stop(&self) -> Result<(), DeviceError> {
        debug!(target: "sim::motors", "stop");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SimIndicators;

impl Indicators for SimIndicators {
    fn set_color(&self, group: LedGroup, color: LedColor, brightness: f32) -> Result<(), DeviceError> {
        debug!(target: "sim::leds", ?group, ?color, brightness, "set color");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SimSound;

impl Sound for SimSound {
    fn play_song(&self, song: &[Note]) -> Result<(), DeviceError> {
        let pitches: Vec<&str> = song.iter().map(|note| note.pitch).collect();
        debug!(target: "sim::sound", ?pitches, "play song");
        Ok(())
    }
}

/// A target the robot closes in on by a fixed step per reading. Once it
/// is within reach it stays put for a few readings, then runs off to the
/// starting distance again.
#[derive(Debug)]
pub struct ApproachingTarget {
    start_cm: f64,
    step_cm: f64,
    floor_cm: f64,
    hold_readings: u32,
    track: Mutex<(f64, u32)>,
}

impl ApproachingTarget {
    pub fn new(start_cm: f64, step_cm: f64, floor_cm: f64, hold_readings: u32) -> Self {
        ApproachingTarget {
            start_cm,
            step_cm,
            floor_cm,
            hold_readings,
            track: Mutex::new((start_cm, 0)),
        }
    }
}

impl ProximitySensor for ApproachingTarget {
    fn name(&self) -> &str {
        "sim-ultrasonic"
    }

    fn distance_cm(&self) -> Result<f64, DeviceError> {
        let mut track = self.track.lock().unwrap_or_else(PoisonError::into_inner);
        let (distance, held) = *track;
        *track = if distance > self.floor_cm {
            ((distance - self.step_cm).max(self.floor_cm), 0)
        } else if held + 1 >= self.hold_readings {
            (self.start_cm, 0)
        } else {
            (distance, held + 1)
        };
        Ok(distance)
    }
}

/// Logs outbound events instead of sending them anywhere
#[derive(Debug, Default)]
pub struct LoggingEventSink;

impl EventSink for LoggingEventSink {
    fn send(&self, event: OutboundEvent) -> Result<(), EventError> {
        info!(
            namespace = EVENT_NAMESPACE,
            name = event.name.as_str(),
            payload = %event.payload,
            "event"
        );
        Ok(())
    }
}

/// Simulated peripherals with the given event sink
pub fn peripherals(config: &DriveConfig, events: Arc<dyn EventSink>) -> Peripherals {
    Peripherals {
        motors: Arc::new(SimMotors::new(config)),
        indicators: Arc::new(SimIndicators),
        sound: Arc::new(SimSound),
        proximity: Arc::new(ApproachingTarget::new(120.0, 8.0, 5.0, 6)),
        events,
    }
}
