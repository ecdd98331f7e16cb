//! General functionality for the `cadence-logger` workspace: sensor sample types, sensor
//! identifiers and the traits that connect sensor sources with their consumers.

#[doc(hidden)]
pub mod traits;
#[doc(hidden)]
pub mod types;

// Re-export traits
#[doc(inline)]
pub use traits::{IMUReadings, IMUSample, IMUSink, IMUSource, IMUUntimedSample, Notifiable};

// Re-export types
#[doc(inline)]
pub use types::{
    buffers, Callback, Clock, Sample3D, SensorReadings, SensorTag, SensorType, XYZ,
};
