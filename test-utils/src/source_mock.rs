use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use common::traits::{IMUReadings, IMUSource, Notifiable};
use common::types::sensors::{SensorReadings, SensorType};
use common::types::timed::Sample3D;
use publisher::PublisherManager;

const SOURCE_MOCK_TAG: &str = "SourceMock";

/// Sensor source whose readings are pushed by hand. Registrations for a sensor can be made to
/// fail a given number of times.
#[derive(Clone)]
pub struct SourceMock {
    sensors: Vec<SensorType>,
    publishers: PublisherManager<SensorReadings<Sample3D>, SensorType>,
    failures: Arc<Mutex<HashMap<SensorType, usize>>>,
}

impl SourceMock {
    pub fn new(sensors: Vec<SensorType>) -> Self {
        Self {
            publishers: PublisherManager::new(&sensors),
            sensors,
            failures: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The next `n` registrations for `sensor` are rejected
    pub async fn fail_registrations(&self, sensor: &SensorType, n: usize) {
        self.failures.lock().await.insert(sensor.clone(), n);
    }

    /// Publishes one sample of `sensor`
    pub async fn push(&self, sensor: &SensorType, values: [f64; 3]) {
        let readings = SensorReadings::from_vec(
            SOURCE_MOCK_TAG,
            sensor.clone(),
            vec![Sample3D::new(0.0, values)],
        );
        self.publishers
            .notify_listeners(sensor.clone(), Arc::new(readings))
            .await;
    }

    pub fn n_listeners(&self) -> usize {
        self.publishers.n_listeners()
    }
}

#[async_trait]
impl IMUSource<SensorReadings<Sample3D>, Sample3D> for SourceMock {
    fn get_tag(&self) -> &str {
        SOURCE_MOCK_TAG
    }

    async fn get_available_sensors(&self) -> Result<Vec<SensorType>, String> {
        Ok(self.sensors.clone())
    }

    async fn register_listener(
        &self,
        listener: &mut dyn Notifiable<SensorReadings<Sample3D>>,
        sensor_type: &SensorType,
    ) -> Result<Uuid, String> {
        if let Some(left) = self.failures.lock().await.get_mut(sensor_type) {
            if *left > 0 {
                *left -= 1;
                return Err(format!("Registration of {:?} rejected", sensor_type));
            }
        }
        self.publishers.add_listener(listener, sensor_type).await
    }

    async fn unregister_listener(&self, id: Uuid) {
        let _ = self.publishers.remove_listener(id).await;
    }

    async fn notify_listeners(&self, sensor_type: SensorType, data: Arc<SensorReadings<Sample3D>>) {
        self.publishers.notify_listeners(sensor_type, data).await
    }
}
