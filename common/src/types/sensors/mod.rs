pub mod sensor_readings;
pub mod sensor_tag;
pub mod sensor_type;

pub use crate::types::sensors::sensor_readings::SensorReadings;
pub use crate::types::sensors::sensor_tag::SensorTag;
pub use crate::types::sensors::sensor_type::SensorType;
