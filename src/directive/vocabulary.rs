//! Directional and preset command vocabularies
//!
//! The synonym lists match the slot values of the voice skill. Matching is
//! an exact, case-sensitive membership test.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl Direction {
    pub const ALL: [Direction; 5] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
        Direction::Stop,
    ];

    /// Every direction that actually moves the robot
    pub const MOVING: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Direction::Forward => &["forward", "forwards", "go forward"],
            Direction::Backward => &["back", "backward", "go backward"],
            Direction::Left => &["left", "go left"],
            Direction::Right => &["right", "go right"],
            Direction::Stop => &["stop", "brake", "halt"],
        }
    }

    pub fn canonical(&self) -> &'static str {
        self.synonyms()[0]
    }

    pub fn from_token(token: &str) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| direction.synonyms().contains(&token))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetCommand {
    MoveCircle,
    MoveSquare,
    /// The player tagged the robot: it is now "it" and starts seeking
    TagSeekActivate,
    /// The player is "it": the robot runs away
    TagEvadeActivate,
}

impl PresetCommand {
    pub const ALL: [PresetCommand; 4] = [
        PresetCommand::MoveCircle,
        PresetCommand::MoveSquare,
        PresetCommand::TagSeekActivate,
        PresetCommand::TagEvadeActivate,
    ];

    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            PresetCommand::MoveCircle => &["circle", "move around"],
            PresetCommand::MoveSquare => &["square"],
            PresetCommand::TagSeekActivate => &["tag you're it", "tag you are it"],
            PresetCommand::TagEvadeActivate => &["tag i'm it", "tag i am it"],
        }
    }

    pub fn from_token(token: &str) -> Option<PresetCommand> {
        PresetCommand::ALL
            .into_iter()
            .find(|command| command.synonyms().contains(&token))
    }
}

impl fmt::Display for PresetCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.synonyms()[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_synonym_maps_back_to_its_direction() {
        for direction in Direction::ALL {
            for token in direction.synonyms() {
                assert_eq!(Direction::from_token(token), Some(direction));
            }
        }
    }

    #[test]
    fn matching_is_exact_and_case_sensitive() {
        assert_eq!(Direction::from_token("Forward"), None);
        assert_eq!(Direction::from_token(" left"), None);
        assert_eq!(Direction::from_token("forwardz"), None);
        assert_eq!(PresetCommand::from_token("Square"), None);
        assert_eq!(
            PresetCommand::from_token("tag you're it"),
            Some(PresetCommand::TagSeekActivate)
        );
        assert_eq!(
            PresetCommand::from_token("tag i am it"),
            Some(PresetCommand::TagEvadeActivate)
        );
    }

    #[test]
    fn moving_directions_exclude_stop() {
        assert!(!Direction::MOVING.contains(&Direction::Stop));
        assert_eq!(Direction::MOVING.len(), Direction::ALL.len() - 1);
    }
}
