//! Controllers for the robot

use crate::common::types::{SpeedPercent, WheelSpeeds};
use crate::directive::Direction;

/// Maps directional moves onto wheel speeds for a differential drive robot
#[derive(Debug, Clone, Copy, Default)]
pub struct DifferentialDriveController;

impl DifferentialDriveController {
    pub fn new() -> Self {
        DifferentialDriveController
    }

    /// Wheel speeds for the main leg of a move.
    ///
    /// Left and right turns pivot first (see [`Self::turn_speeds`]) and then
    /// drive straight ahead, so their main leg matches `Forward`.
    pub fn drive_speeds(&self, direction: Direction, speed: u8) -> WheelSpeeds {
        let speed = clamp_percent(speed);
        match direction {
            Direction::Forward | Direction::Left | Direction::Right => WheelSpeeds::straight(speed),
            Direction::Backward => WheelSpeeds::straight(-speed),
            Direction::Stop => WheelSpeeds::STOPPED,
        }
    }

    /// Pivot speeds for the turn sub-maneuver, `None` for non-turning moves
    pub fn turn_speeds(&self, direction: Direction, speed: u8) -> Option<WheelSpeeds> {
        let speed = clamp_percent(speed);
        match direction {
            Direction::Left => Some(WheelSpeeds::new(0, speed)),
            Direction::Right => Some(WheelSpeeds::new(speed, 0)),
            _ => None,
        }
    }
}

fn clamp_percent(speed: u8) -> SpeedPercent {
    speed.min(100) as SpeedPercent
}
