//! Preset commands: canned maneuvers and tag mode switches

use super::{BehaviorState, EVADE_ANNOUNCEMENT, SEEK_ANNOUNCEMENT};
use crate::common::types::{LedColor, WheelSpeeds};
use crate::control::MotionExecutor;
use crate::directive::{Direction, PresetCommand};
use crate::events::{emit, EventSink, OutboundEvent};
use crate::feedback::{set_all, Indicators};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const CIRCLE_DURATION: Duration = Duration::from_secs(12);
const CIRCLE_INNER_SPEED: i8 = 5;

const SQUARE_SIDES: usize = 4;
const SQUARE_SIDE_DURATION: Duration = Duration::from_secs(2);

const SHIMMY_STEP: Duration = Duration::from_millis(200);
const SHIMMY_PAUSE: Duration = Duration::from_millis(300);

pub struct ModeController {
    state: Arc<BehaviorState>,
    motion: Arc<MotionExecutor>,
    indicators: Arc<dyn Indicators>,
    events: Arc<dyn EventSink>,
}

impl ModeController {
    pub fn new(
        state: Arc<BehaviorState>,
        motion: Arc<MotionExecutor>,
        indicators: Arc<dyn Indicators>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        ModeController {
            state,
            motion,
            indicators,
            events,
        }
    }

    /// Run a preset command at `speed` percent
    pub async fn activate(&self, command: PresetCommand, speed: u8) {
        info!(%command, speed, "activate command");
        match command {
            PresetCommand::MoveCircle => {
                let speeds = WheelSpeeds::new(speed.min(100) as i8, CIRCLE_INNER_SPEED);
                self.motion.drive_for(speeds, CIRCLE_DURATION, true).await;
            }
            PresetCommand::MoveSquare => {
                for _ in 0..SQUARE_SIDES {
                    self.motion
                        .move_direction(Direction::Right, SQUARE_SIDE_DURATION, speed, true)
                        .await;
                }
            }
            PresetCommand::TagSeekActivate => {
                self.state.set_seeking(true);
                emit(self.events.as_ref(), OutboundEvent::speech(SEEK_ANNOUNCEMENT));
            }
            PresetCommand::TagEvadeActivate => {
                self.state.set_evading(true);
                emit(self.events.as_ref(), OutboundEvent::speech(EVADE_ANNOUNCEMENT));
                self.shimmy().await;
                set_all(self.indicators.as_ref(), LedColor::Yellow, 1.0);
            }
        }
    }

    async fn shimmy(&self) {
        self.motion.drive_for(WheelSpeeds::new(80, -80), SHIMMY_STEP, true).await;
        tokio::time::sleep(SHIMMY_PAUSE).await;
        self.motion.drive_for(WheelSpeeds::new(-40, 40), SHIMMY_STEP, true).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::LedGroup;
    use crate::events::EventName;
    use crate::testing::{MotorCall, RecordingEvents, RecordingIndicators, RecordingMotors};

    struct Fixture {
        state: Arc<BehaviorState>,
        motors: Arc<RecordingMotors>,
        indicators: Arc<RecordingIndicators>,
        events: Arc<RecordingEvents>,
        modes: ModeController,
    }

    fn fixture() -> Fixture {
        let state = Arc::new(BehaviorState::new());
        let motors = Arc::new(RecordingMotors::new());
        let indicators = Arc::new(RecordingIndicators::new());
        let events = Arc::new(RecordingEvents::new());
        let motion = Arc::new(MotionExecutor::new(
            motors.clone(),
            Arc::clone(&state),
            Duration::from_secs(2),
        ));
        let modes = ModeController::new(
            Arc::clone(&state),
            motion,
            indicators.clone(),
            events.clone(),
        );
        Fixture {
            state,
            motors,
            indicators,
            events,
            modes,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn seek_activation_raises_flag_and_announces_once() {
        let f = fixture();
        f.modes.activate(PresetCommand::TagSeekActivate, 50).await;

        assert!(f.state.is_seeking());
        assert!(!f.state.is_evading());
        assert_eq!(f.events.events(), vec![OutboundEvent::speech(SEEK_ANNOUNCEMENT)]);
        assert!(f.motors.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn evade_activation_shimmies_and_turns_yellow() {
        let f = fixture();
        f.modes.activate(PresetCommand::TagEvadeActivate, 50).await;

        assert!(f.state.is_evading());
        assert_eq!(f.events.named(EventName::Speech).len(), 1);
        assert_eq!(
            f.motors.runs(),
            vec![WheelSpeeds::new(80, -80), WheelSpeeds::new(-40, 40)]
        );
        assert_eq!(f.indicators.current(LedGroup::Left), Some(LedColor::Yellow));
        assert_eq!(f.indicators.current(LedGroup::Right), Some(LedColor::Yellow));
    }

    #[tokio::test(start_paused = true)]
    async fn circle_is_one_long_asymmetric_drive() {
        let f = fixture();
        let started = tokio::time::Instant::now();
        f.modes.activate(PresetCommand::MoveCircle, 60).await;

        assert!(started.elapsed() >= CIRCLE_DURATION);
        assert_eq!(
            f.motors.calls(),
            vec![MotorCall::Run(WheelSpeeds::new(60, 5)), MotorCall::Stop]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn square_runs_four_blocking_turn_and_drive_cycles() {
        for speed in [25, 100] {
            let f = fixture();
            let started = tokio::time::Instant::now();
            f.modes.activate(PresetCommand::MoveSquare, speed).await;

            let pivot = WheelSpeeds::new(speed as i8, 0);
            let ahead = WheelSpeeds::straight(speed as i8);
            let expected: Vec<WheelSpeeds> = (0..4).flat_map(|_| [pivot, ahead]).collect();
            assert_eq!(f.motors.runs(), expected);
            // Every leg ran to completion before the next one started.
            assert_eq!(f.motors.stops(), 8);
            assert!(started.elapsed() >= Duration::from_secs(16));
        }
    }
}
