pub mod imu;
pub mod publisher;

pub use crate::traits::imu::{IMUReadings, IMUSample, IMUSink, IMUSource, IMUUntimedSample};

pub use crate::traits::publisher::Notifiable;
