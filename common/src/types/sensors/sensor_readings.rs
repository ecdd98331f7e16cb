use super::{SensorTag, SensorType};
use crate::{IMUReadings, IMUSample};

const DEFAULT_SENSOR_BUFFER_CAPACITY: usize = 64;

/// Batch of samples captured by one sensor.
#[derive(Clone, Debug)]
pub struct SensorReadings<T> {
    buffer: Vec<T>,
    tag: SensorTag,
    sensor_type: SensorType,
}

impl<T: IMUSample> SensorReadings<T> {
    pub fn new(tag: &str, sensor_type: SensorType) -> Self {
        Self {
            tag: SensorTag::new(tag),
            buffer: Vec::with_capacity(DEFAULT_SENSOR_BUFFER_CAPACITY),
            sensor_type,
        }
    }

    pub fn add_sample(&mut self, elem: T) {
        self.buffer.push(elem);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: IMUSample> IMUReadings<T> for SensorReadings<T> {
    fn get_samples_ref(&self) -> &[T] {
        &self.buffer
    }
    fn get_samples(&self) -> Vec<T> {
        self.buffer.clone()
    }
    fn get_sensor_tag(&self) -> &str {
        self.tag.inner()
    }
    fn get_sensor_type(&self) -> &SensorType {
        &self.sensor_type
    }

    fn extend(&mut self, elems: Vec<T>) {
        self.buffer.extend(elems);
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    fn from_vec(tag: &str, sensor_type: SensorType, data: Vec<T>) -> Self {
        Self {
            tag: SensorTag::new(tag),
            sensor_type,
            buffer: data,
        }
    }
}
