use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::traits::{IMUReadings, IMUSample, IMUSink, IMUSource};
use common::types::{Clock, Sample3D, SensorReadings, SensorType};
use publisher::listener;

use crate::record::SampleRecord;
use crate::session::Session;

/// Turns every reading published by a sensor source into a [`SampleRecord`] of the session,
/// tagged with the current cadence.
#[derive(Clone)]
pub struct RecordingSink {
    session: Session,
    cadence: Arc<RwLock<String>>,
    control: Arc<RwLock<HashMap<Uuid, SensorType>>>,
}

impl RecordingSink {
    pub fn new(session: Session, cadence: Arc<RwLock<String>>) -> Self {
        Self {
            session,
            cadence,
            control: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Sensors of `sensors` without a registered listener
    pub async fn missing_sensors(&self, sensors: &[SensorType]) -> Vec<SensorType> {
        let control = self.control.read().await;
        sensors
            .iter()
            .filter(|sensor| !control.values().any(|attached| attached == *sensor))
            .cloned()
            .collect()
    }

    /// Unregisters every listener from `source`
    pub async fn detach_all(&self, source: &dyn IMUSource<SensorReadings<Sample3D>, Sample3D>) {
        let ids: Vec<Uuid> = self.control.read().await.keys().copied().collect();
        for id in ids {
            self.detach_listener(source, id).await;
        }
    }
}

/// Wall clock time of each sample. The source only knows when the phone captured a sample
/// relative to the others, so the newest sample of the batch is anchored to the reception time.
fn sample_wall_clock_millis(readings: &SensorReadings<Sample3D>, received_millis: u64) -> Vec<u64> {
    let newest = readings
        .iter_samples()
        .map(|s| s.get_timestamp())
        .fold(f64::MIN, f64::max);
    readings
        .iter_samples()
        .map(|s| {
            let age_millis = ((newest - s.get_timestamp()).max(0.0) * 1000.0).round() as u64;
            received_millis.saturating_sub(age_millis)
        })
        .collect()
}

#[async_trait]
impl IMUSink<SensorReadings<Sample3D>, Sample3D> for RecordingSink {
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
        let cadence = self.cadence.read().await.clone();
        let timestamps = sample_wall_clock_millis(&samples, Clock::now().as_millis());

        let records: Vec<SampleRecord> = samples
            .iter_samples()
            .zip(timestamps)
            .filter_map(|(sample, timestamp)| {
                SampleRecord::from_reading(
                    timestamp,
                    &sensor_type,
                    &sample.get_measurement(),
                    &cadence,
                )
            })
            .collect();
        self.session.extend(records).await;
    }
}
