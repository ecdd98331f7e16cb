use async_trait::async_trait;
use std::iter::Iterator;
use std::sync::Arc;
use uuid::Uuid;

use crate::traits::Notifiable;
use crate::types::sensors::SensorType;

/// Untimed sample from an IMU (Inertial Measurement Unit).
pub trait IMUUntimedSample: Send + Sync + Clone + Default + std::fmt::Debug + 'static {
    ///  Returns the measurement components as a vector of `f64` values.
    fn components(&self) -> Vec<f64>;
}

/// Timed sample from an IMU (Inertial Measurement Unit).
pub trait IMUSample: Send + Sync + Clone + Default + std::fmt::Debug + 'static {
    type Untimed: IMUUntimedSample;

    ///  Returns the timestamp of the sample in seconds.
    fn get_timestamp(&self) -> f64;
    ///  Returns the measurement data
    fn get_measurement(&self) -> Self::Untimed;
    /// Builds a sample from a timestamp and a measurement
    fn from_measurement(timestamp: f64, measurement: Self::Untimed) -> Self;
}

/// Collection of sensor readings from an IMU (Inertial Measurement Unit).
pub trait IMUReadings<T: IMUSample>: Send + Sync + Clone {
    ///  Returns the sensor tag
    fn get_sensor_tag(&self) -> &str;
    ///  Returns the sensor type
    fn get_sensor_type(&self) -> &SensorType;
    ///   Returns a slice to samples.
    fn get_samples_ref(&self) -> &[T];
    ///   Returns samples
    fn get_samples(&self) -> Vec<T>;
    fn extend(&mut self, elems: Vec<T>);
    fn clear(&mut self);
    fn from_vec(tag: &str, sensor_type: SensorType, data: Vec<T>) -> Self;
    /// Returns an iterator over references to the samples.
    fn iter_samples(&self) -> impl Iterator<Item = &T> {
        self.get_samples_ref().iter()
    }
    /// Returns an iterator over samples.
    fn into_iter_samples(&self) -> impl Iterator<Item = T> {
        self.get_samples().into_iter()
    }
}

/// Producer of sensor readings. Consumers register listeners per sensor.
#[async_trait]
pub trait IMUSource<T, S>: Send + Sync
where
    T: IMUReadings<S>,
    S: IMUSample,
{
    fn get_tag(&self) -> &str;
    async fn get_available_sensors(&self) -> Result<Vec<SensorType>, String>;
    async fn register_listener(
        &self,
        listener: &mut dyn Notifiable<T>,
        sensor_type: &SensorType,
    ) -> Result<Uuid, String>;
    async fn unregister_listener(&self, id: Uuid);
    async fn notify_listeners(&self, sensor_type: SensorType, data: Arc<T>);
}

/// Consumer of sensor readings.
#[async_trait]
pub trait IMUSink<T, S>: Send + Sync
where
    T: IMUReadings<S>,
    S: IMUSample,
{
    /// Registers one listener per sensor in `sensor_cluster` and returns their ids
    async fn attach_listeners(
        &self,
        source: &dyn IMUSource<T, S>,
        sensor_cluster: &[SensorType],
    ) -> Result<Vec<Uuid>, String>;
    async fn detach_listener(&self, source: &dyn IMUSource<T, S>, id: Uuid);
    async fn process_samples(&self, id: Uuid, samples: Arc<T>);
}
