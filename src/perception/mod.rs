//! Perception module for the Tagbot robot
pub mod filters;
pub mod sensors;

pub use self::filters::ProximityBreachCounter;
pub use self::sensors::ProximitySensor;
