//! Sensor interfaces for the Tagbot robot

use crate::common::error::DeviceError;

/// A sensor reporting the distance to the nearest target
pub trait ProximitySensor: Send + Sync {
    /// Get the sensor name
    fn name(&self) -> &str;

    /// Take a fresh reading, in centimeters
    fn distance_cm(&self) -> Result<f64, DeviceError>;
}
