use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::traits::{IMUReadings, IMUSink, IMUSource};
use common::types::sensors::{SensorReadings, SensorType};
use common::types::timed::Sample3D;
use publisher::listener;

/// Sink that stores every sample it receives, grouped by sensor.
#[derive(Clone, Default)]
pub struct SinkMock {
    control: Arc<RwLock<HashMap<Uuid, SensorType>>>,
    received: Arc<RwLock<HashMap<SensorType, Vec<Sample3D>>>>,
    tags: Arc<RwLock<Vec<String>>>,
}

impl SinkMock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples received so far from `sensor_type`
    pub async fn samples(&self, sensor_type: &SensorType) -> Vec<Sample3D> {
        self.received
            .read()
            .await
            .get(sensor_type)
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of samples received from all sensors
    pub async fn n_samples(&self) -> usize {
        self.received.read().await.values().map(|s| s.len()).sum()
    }

    /// Sensor tags of every batch received
    pub async fn tags(&self) -> Vec<String> {
        self.tags.read().await.clone()
    }

    pub async fn n_listeners(&self) -> usize {
        self.control.read().await.len()
    }
}

#[async_trait]
impl IMUSink<SensorReadings<Sample3D>, Sample3D> for SinkMock {
    async fn attach_listeners(
        &self,
        source: &dyn IMUSource<SensorReadings<Sample3D>, Sample3D>,
        sensor_cluster: &[SensorType],
    ) -> Result<Vec<Uuid>, String> {
        let mut ids = Vec::with_capacity(sensor_cluster.len());
        for sensor_type in sensor_cluster {
            let mut listener = listener!(self.process_samples);
            let id = source.register_listener(&mut listener, sensor_type).await?;
            self.control.write().await.insert(id, sensor_type.clone());
            ids.push(id);
        }
        Ok(ids)
    }

    async fn detach_listener(
        &self,
        source: &dyn IMUSource<SensorReadings<Sample3D>, Sample3D>,
        id: Uuid,
    ) {
        source.unregister_listener(id).await;
        self.control.write().await.remove(&id);
    }

    async fn process_samples(&self, id: Uuid, samples: Arc<SensorReadings<Sample3D>>) {
        let sensor_type = match self.control.read().await.get(&id) {
            Some(sensor_type) => sensor_type.clone(),
            None => return,
        };
        self.tags
            .write()
            .await
            .push(samples.get_sensor_tag().to_string());
        self.received
            .write()
            .await
            .entry(sensor_type)
            .or_default()
            .extend(samples.get_samples());
    }
}

impl std::fmt::Debug for SinkMock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkMock")
            .field("control", &self.control)
            .finish()
    }
}
