//! Control module for the Tagbot robot
pub mod controllers;

use self::controllers::DifferentialDriveController;
use crate::behaviors::BehaviorState;
use crate::common::error::DeviceError;
use crate::common::types::WheelSpeeds;
use crate::directive::Direction;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Driver for the two large drive motors
pub trait MotorPair: Send + Sync {
    /// Start both wheels at the given speeds and keep them running
    fn run(&self, speeds: WheelSpeeds) -> Result<(), DeviceError>;

    /// Halt both wheels
    fn stop(&self) -> Result<(), DeviceError>;
}

/// A single directional move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionRequest {
    pub direction: Direction,
    pub duration: Duration,
    pub speed: u8,
    /// Suspend the caller until the timed motion completes
    pub blocking: bool,
}

/// Executes directional moves and timed drives on the motor pair
///
/// Every motor command bumps a generation counter. A non-blocking drive
/// leaves a timer behind that stops the motors when its duration elapses,
/// but only if no newer command has been issued in the meantime.
pub struct MotionExecutor {
    motors: Arc<dyn MotorPair>,
    controller: DifferentialDriveController,
    state: Arc<BehaviorState>,
    turn_duration: Duration,
    generation: Arc<AtomicU64>,
}

impl MotionExecutor {
    pub fn new(motors: Arc<dyn MotorPair>, state: Arc<BehaviorState>, turn_duration: Duration) -> Self {
        MotionExecutor {
            motors,
            controller: DifferentialDriveController::new(),
            state,
            turn_duration,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn execute(&self, request: MotionRequest) {
        self.move_direction(request.direction, request.duration, request.speed, request.blocking)
            .await;
    }

    /// Handle a directional move.
    ///
    /// Left and right moves pivot for the turn duration (always blocking)
    /// before driving straight. Right and left can under or over turn
    /// depending on the surface.
    pub async fn move_direction(&self, direction: Direction, duration: Duration, speed: u8, blocking: bool) {
        debug!(%direction, speed, ?duration, blocking, "move command");

        if direction == Direction::Stop {
            self.halt();
            self.state.clear_patrolling();
            return;
        }

        if let Some(turn) = self.controller.turn_speeds(direction, speed) {
            self.drive_for(turn, self.turn_duration, true).await;
        }

        let speeds = self.controller.drive_speeds(direction, speed);
        self.drive_for(speeds, duration, blocking).await;
    }

    /// Run the wheels at `speeds` for `duration`
    pub async fn drive_for(&self, speeds: WheelSpeeds, duration: Duration, blocking: bool) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Err(err) = self.motors.run(speeds) {
            warn!(error = %err, ?speeds, "motor run failed");
        }

        if blocking {
            tokio::time::sleep(duration).await;
            stop_if_current(self.motors.as_ref(), &self.generation, generation);
        } else {
            let motors = Arc::clone(&self.motors);
            let current = Arc::clone(&self.generation);
            tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                stop_if_current(motors.as_ref(), &current, generation);
            });
        }
    }

    /// Stop both wheels immediately, cancelling any pending timed drive
    pub fn halt(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(err) = self.motors.stop() {
            warn!(error = %err, "motor stop failed");
        }
    }
}

fn stop_if_current(motors: &dyn MotorPair, current: &AtomicU64, generation: u64) {
    if current.load(Ordering::SeqCst) != generation {
        return;
    }
    if let Err(err) = motors.stop() {
        warn!(error = %err, "motor stop failed");
    }
}
