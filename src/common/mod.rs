//! Common utilities and types for the Tagbot robot

pub mod error;

/// Common types used across the codebase
pub mod types {
    /// Signed speed percentage for a single wheel, in `-100..=100`
    pub type SpeedPercent = i8;

    /// A left/right wheel speed pair for the differential drive
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WheelSpeeds {
        pub left: SpeedPercent,
        pub right: SpeedPercent,
    }

    impl WheelSpeeds {
        pub const STOPPED: WheelSpeeds = WheelSpeeds { left: 0, right: 0 };

        pub fn new(left: SpeedPercent, right: SpeedPercent) -> Self {
            WheelSpeeds { left, right }
        }

        /// Both wheels at the same speed
        pub fn straight(speed: SpeedPercent) -> Self {
            WheelSpeeds::new(speed, speed)
        }
    }

    /// Which side of the brick an indicator LED sits on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum LedGroup {
        Left,
        Right,
    }

    impl LedGroup {
        pub const ALL: [LedGroup; 2] = [LedGroup::Left, LedGroup::Right];
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LedColor {
        Black,
        Green,
        Red,
        Yellow,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum NoteLength {
        Eighth,
        Quarter,
    }

    /// A single note of a tone sequence, e.g. `("C4", Eighth)`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Note {
        pub pitch: &'static str,
        pub length: NoteLength,
    }

    impl Note {
        pub const fn eighth(pitch: &'static str) -> Self {
            Note {
                pitch,
                length: NoteLength::Eighth,
            }
        }

        pub const fn quarter(pitch: &'static str) -> Self {
            Note {
                pitch,
                length: NoteLength::Quarter,
            }
        }
    }
}
