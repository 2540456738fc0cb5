//! Recording fakes for every peripheral, for unit and integration tests

use crate::common::error::{DeviceError, EventError};
use crate::common::types::{LedColor, LedGroup, Note, WheelSpeeds};
use crate::control::MotorPair;
use crate::events::{EventName, EventSink, OutboundEvent};
use crate::feedback::{Indicators, Sound};
use crate::perception::ProximitySensor;
use crate::Peripherals;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorCall {
    Run(WheelSpeeds),
    Stop,
}

#[derive(Debug, Default)]
pub struct RecordingMotors {
    calls: Mutex<Vec<MotorCall>>,
}

impl RecordingMotors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<MotorCall> {
        lock(&self.calls).clone()
    }

    /// Only the speeds of `run` calls, in order
    pub fn runs(&self) -> Vec<WheelSpeeds> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                MotorCall::Run(speeds) => Some(*speeds),
                MotorCall::Stop => None,
            })
            .collect()
    }

    pub fn stops(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| **call == MotorCall::Stop)
            .count()
    }
}

impl MotorPair for RecordingMotors {
    fn run(&self, speeds: WheelSpeeds) -> Result<(), DeviceError> {
        lock(&self.calls).push(MotorCall::Run(speeds));
        Ok(())
    }

    fn stop(&self) -> Result<(), DeviceError> {
        lock(&self.calls).push(MotorCall::Stop);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingIndicators {
    changes: Mutex<Vec<(LedGroup, LedColor, f32)>>,
}

impl RecordingIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<(LedGroup, LedColor, f32)> {
        lock(&self.changes).clone()
    }

    /// Last color set on `group`
    pub fn current(&self, group: LedGroup) -> Option<LedColor> {
        lock(&self.changes)
            .iter()
            .rev()
            .find(|(changed, _, _)| *changed == group)
            .map(|(_, color, _)| *color)
    }
}

impl Indicators for RecordingIndicators {
    fn set_color(&self, group: LedGroup, color: LedColor, brightness: f32) -> Result<(), DeviceError> {
        lock(&self.changes).push((group, color, brightness));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingSound {
    songs: Mutex<Vec<Vec<Note>>>,
}

impl RecordingSound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn songs(&self) -> Vec<Vec<Note>> {
        lock(&self.songs).clone()
    }
}

impl Sound for RecordingSound {
    fn play_song(&self, song: &[Note]) -> Result<(), DeviceError> {
        lock(&self.songs).push(song.to_vec());
        Ok(())
    }
}

/// Replays a fixed sequence of readings, then a fallback distance forever.
/// A `None` entry simulates a failed read.
#[derive(Debug)]
pub struct ScriptedProximity {
    script: Mutex<VecDeque<Option<f64>>>,
    fallback_cm: f64,
    reads: Mutex<usize>,
}

impl ScriptedProximity {
    pub fn new(readings: &[f64], fallback_cm: f64) -> Self {
        Self::with_faults(&readings.iter().copied().map(Some).collect::<Vec<_>>(), fallback_cm)
    }

    pub fn with_faults(script: &[Option<f64>], fallback_cm: f64) -> Self {
        ScriptedProximity {
            script: Mutex::new(script.iter().copied().collect()),
            fallback_cm,
            reads: Mutex::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        *lock(&self.reads)
    }
}

impl ProximitySensor for ScriptedProximity {
    fn name(&self) -> &str {
        "scripted"
    }

    fn distance_cm(&self) -> Result<f64, DeviceError> {
        *lock(&self.reads) += 1;
        match lock(&self.script).pop_front() {
            Some(Some(distance)) => Ok(distance),
            Some(None) => Err(DeviceError::Rejected {
                device: "scripted",
                reason: "simulated fault".to_string(),
            }),
            None => Ok(self.fallback_cm),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<OutboundEvent>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<OutboundEvent> {
        lock(&self.events).clone()
    }

    pub fn named(&self, name: EventName) -> Vec<OutboundEvent> {
        lock(&self.events)
            .iter()
            .filter(|event| event.name == name)
            .cloned()
            .collect()
    }
}

impl EventSink for RecordingEvents {
    fn send(&self, event: OutboundEvent) -> Result<(), EventError> {
        lock(&self.events).push(event);
        Ok(())
    }
}

/// A full set of recording peripherals with typed handles kept for asserts
pub struct TestRig {
    pub motors: Arc<RecordingMotors>,
    pub indicators: Arc<RecordingIndicators>,
    pub sound: Arc<RecordingSound>,
    pub proximity: Arc<ScriptedProximity>,
    pub events: Arc<RecordingEvents>,
}

impl TestRig {
    pub fn new(proximity: ScriptedProximity) -> Self {
        TestRig {
            motors: Arc::new(RecordingMotors::new()),
            indicators: Arc::new(RecordingIndicators::new()),
            sound: Arc::new(RecordingSound::new()),
            proximity: Arc::new(proximity),
            events: Arc::new(RecordingEvents::new()),
        }
    }

    /// A rig whose target never comes close
    pub fn far_away() -> Self {
        Self::new(ScriptedProximity::new(&[], 255.0))
    }

    pub fn peripherals(&self) -> Peripherals {
        Peripherals {
            motors: self.motors.clone(),
            indicators: self.indicators.clone(),
            sound: self.sound.clone(),
            proximity: self.proximity.clone(),
            events: self.events.clone(),
        }
    }
}
