pub mod buffers;
pub mod callback;
pub mod clock;
pub mod sensors;
pub mod timed;
pub mod untimed;

pub use callback::Callback;
pub use clock::Clock;
pub use sensors::{SensorReadings, SensorTag, SensorType};
pub use timed::Sample3D;
pub use untimed::XYZ;
