use async_trait::async_trait;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

use super::gaussian::GaussianNoise;
use super::timestamp::Timestamp;
use crate::constants::{ACCELEROMETER_IDX, GYROSCOPE_IDX, N_SENSORS};
use crate::models::errors::PhyphoxError;
use crate::ports::{PhyphoxPort, SensorPublishers};
use common::traits::{IMUReadings, IMUSample};
use common::types::buffers::CircularReader;
use common::types::sensors::sensor_type;
use common::types::sensors::{SensorReadings, SensorType};
use common::types::timed::Sample3D;
use common::types::untimed::XYZ;
use test_utils::csv_loader::{self, CsvColumnMapper, SENSOR_READINGS_CSV};

const GAUSSIAN_TIME_MEAN: f64 = 0f64;
const GAUSSIAN_TIME_STDEV_RATIO: f64 = 0.05;
const GAUSSIAN_SENSOR_MEAN: f64 = 0f64;
const GAUSSIAN_SENSOR_STDEV: f64 = 0.05;

/// Replays the bundled recording as if a phone were capturing it
pub struct PhyphoxMock {
    readings: Mutex<[CircularReader<Sample3D>; N_SENSORS]>,
    timestamps: Mutex<Timestamp>,
    capture_sampling_period_secs: f64,
    time_delta: GaussianNoise,
    sensor_noise: Option<GaussianNoise>,
    sensor_cluster_tag: String,
    sensor_cluster: Vec<SensorType>,
}

fn load_readings(mapper: &CsvColumnMapper) -> Result<CircularReader<Sample3D>, PhyphoxError> {
    let samples = csv_loader::load_csv_columns::<Sample3D>(SENSOR_READINGS_CSV, &mapper.columns())
        .map_err(|e| PhyphoxError::Other(e.to_string()))?;
    CircularReader::try_from(samples).map_err(PhyphoxError::Other)
}

/// Index of the replay buffer backing `sensor`. Sensors other than accelerometer and
/// gyroscope have no recording.
fn sensor_index(sensor: &SensorType) -> Option<usize> {
    match usize::from(sensor) {
        sensor_type::ACCELEROMETER_OFFSET..sensor_type::GYROSCOPE_OFFSET => Some(ACCELEROMETER_IDX),
        sensor_type::GYROSCOPE_OFFSET..sensor_type::OTHER_OFFSET => Some(GYROSCOPE_IDX),
        _ => None,
    }
}

impl PhyphoxMock {
    /// Creates a new `PhyphoxMock` producing one sample every `capture_sampling_period_millis`
    /// per sensor. Returns an Other error if the recording cannot be loaded.
    pub(crate) fn new(
        sensor_cluster_tag: &str,
        sensor_cluster: Vec<SensorType>,
        capture_sampling_period_millis: f64,
        add_sensor_noise: bool,
    ) -> Result<Self, PhyphoxError> {
        if !capture_sampling_period_millis.is_finite() || capture_sampling_period_millis <= 0.0 {
            return Err(PhyphoxError::Other(format!(
                "Invalid sampling period {}",
                capture_sampling_period_millis
            )));
        }
        let capture_sampling_period_secs = capture_sampling_period_millis / 1000.0;

        let mut accel_mapper = CsvColumnMapper::new();
        accel_mapper.add_timestamp().add_accel();
        let accel_readings = load_readings(&accel_mapper)?;

        let mut gyro_mapper = CsvColumnMapper::new();
        gyro_mapper.add_timestamp().add_gyro();
        let gyro_readings = load_readings(&gyro_mapper)?;

        let sensor_noise = if add_sensor_noise {
            Some(GaussianNoise::new(
                GAUSSIAN_SENSOR_MEAN,
                GAUSSIAN_SENSOR_STDEV,
            )?)
        } else {
            None
        };

        Ok(Self {
            sensor_cluster_tag: sensor_cluster_tag.to_string(),
            readings: Mutex::new([accel_readings, gyro_readings]),
            timestamps: Mutex::new(Timestamp::new()),
            capture_sampling_period_secs,
            time_delta: GaussianNoise::new(
                GAUSSIAN_TIME_MEAN,
                capture_sampling_period_secs * GAUSSIAN_TIME_STDEV_RATIO,
            )?,
            sensor_noise,
            sensor_cluster,
        })
    }

    /// Produces the samples that sensor `buffer_idx` captured since its previous sample, up to
    /// the current simulated time. Each sample takes the next row of the recording.
    async fn get_next_samples(&self, buffer_idx: usize) -> Result<Vec<Sample3D>, PhyphoxError> {
        let mut new_samples = Vec::new();
        let mut rng = StdRng::from_entropy();
        let mut readings = self.readings.lock().await;
        let mut timestamps = self.timestamps.lock().await;
        let current_timestamp = timestamps.get_current_timestamp();
        let mut last_timestamp = timestamps.get_reading_timestamp(buffer_idx);

        loop {
            let sample_timestamp = self.time_delta.add_jitter(
                &mut rng,
                last_timestamp + self.capture_sampling_period_secs,
            );
            if sample_timestamp >= current_timestamp {
                break;
            }

            let mut next_measurement: Vec<f64> =
                readings[buffer_idx].next_element().get_measurement().into();
            if let Some(noise) = self.sensor_noise.as_ref() {
                next_measurement = noise.add_noise_vec(&mut rng, next_measurement);
            }
            let next_measurement = XYZ::try_from(next_measurement)
                .map_err(|e| PhyphoxError::IncorrectDataFormat(e.to_string()))?;

            new_samples.push(Sample3D::from_measurement(
                sample_timestamp,
                next_measurement,
            ));
            last_timestamp = sample_timestamp;
        }

        timestamps.set_reading_timestamp(buffer_idx, last_timestamp);
        Ok(new_samples)
    }
}

#[async_trait]
impl PhyphoxPort for PhyphoxMock {
    /// Starts the replay. Every `period_millis` the simulated clock advances by the same
    /// amount and the new samples are published. Stops when `abort_signal` is notified.
    async fn start(
        &self,
        period_millis: Duration,
        abort_signal: Option<Arc<Notify>>,
        publishers: Option<SensorPublishers>,
    ) -> Result<(), PhyphoxError> {
        let abort_signal = abort_signal.unwrap_or_default();
        let active_sensors = self
            .get_available_sensors()
            .await
            .map_err(PhyphoxError::Other)?;

        loop {
            tokio::select! {
                _ = abort_signal.notified() => {
                    break;
                }
                _ = tokio::time::sleep(period_millis) => {
                    {
                        let mut timestamp = self.timestamps.lock().await;
                        timestamp.incr_current_timestamp(period_millis.as_secs_f64());
                    }

                    for sensor in active_sensors.iter() {
                        let Some(sensor_idx) = sensor_index(sensor) else {
                            continue;
                        };
                        let samples = self.get_next_samples(sensor_idx).await?;
                        if samples.is_empty() {
                            continue;
                        }
                        let buffer = SensorReadings::from_vec(&self.sensor_cluster_tag, sensor.clone(), samples);
                        if let Some(publishers) = publishers.as_ref() {
                            publishers.notify_listeners(sensor.clone(), Arc::new(buffer)).await;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn get_tag(&self) -> &str {
        self.sensor_cluster_tag.as_str()
    }

    async fn get_available_sensors(&self) -> Result<Vec<SensorType>, String> {
        Ok(self
            .sensor_cluster
            .iter()
            .filter(|sensor| sensor_index(sensor).is_some())
            .cloned()
            .collect())
    }

    fn get_sensor_cluster(&self) -> Vec<SensorType> {
        self.sensor_cluster.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sensor_cluster() -> Vec<SensorType> {
        vec![
            SensorType::Accelerometer(Uuid::new_v4()),
            SensorType::Gyroscope(Uuid::new_v4()),
        ]
    }

    #[tokio::test]
    async fn test_phyphox_mock_new() {
        let phyphox_mock = PhyphoxMock::new("Test", sensor_cluster(), 10.0, false);
        assert!(phyphox_mock.is_ok());
    }

    #[tokio::test]
    async fn test_phyphox_mock_invalid_period() {
        assert!(PhyphoxMock::new("Test", sensor_cluster(), 0.0, false).is_err());
    }

    #[tokio::test]
    async fn test_available_sensors_skip_unknown() {
        let mut cluster = sensor_cluster();
        cluster.push(SensorType::Other(Uuid::new_v4(), "light".to_string()));
        let phyphox_mock = PhyphoxMock::new("Test", cluster.clone(), 10.0, false).unwrap();

        let available = phyphox_mock.get_available_sensors().await.unwrap();
        assert_eq!(available, cluster[..2].to_vec());
        assert_eq!(phyphox_mock.get_sensor_cluster().len(), 3);
    }

    #[tokio::test]
    async fn test_phyphox_mock_start_stop() {
        let phyphox_mock = Arc::new(PhyphoxMock::new("Test", sensor_cluster(), 10.0, false).unwrap());
        let period = Duration::from_millis(50);

        let phyphox_mock_clone = Arc::clone(&phyphox_mock);
        let abort_signal = Arc::new(Notify::new());
        let shutdown_signal = abort_signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            shutdown_signal.notify_one();
        });

        let start_handle = tokio::spawn(async move {
            phyphox_mock_clone
                .start(period, Some(abort_signal), None)
                .await
                .unwrap();
        });

        start_handle.await.unwrap();
        assert!(phyphox_mock.timestamps.lock().await.get_current_timestamp() > 0.0);
    }

    #[tokio::test]
    async fn test_get_next_samples() {
        let phyphox_mock = PhyphoxMock::new("Test", sensor_cluster(), 10.0, true).unwrap();
        assert!(phyphox_mock
            .get_next_samples(ACCELEROMETER_IDX)
            .await
            .unwrap()
            .is_empty());

        phyphox_mock
            .timestamps
            .lock()
            .await
            .incr_current_timestamp(0.1);

        let samples = phyphox_mock.get_next_samples(ACCELEROMETER_IDX).await.unwrap();
        // one sample every 10ms, minus the jitter
        assert!(!samples.is_empty() && samples.len() <= 10);
        let mut previous = 0.0;
        for sample in samples.iter() {
            assert!(sample.get_timestamp() > previous);
            assert!(sample.get_timestamp() < 0.1);
            previous = sample.get_timestamp();
        }

        // nothing left until the clock moves again
        assert!(phyphox_mock
            .get_next_samples(ACCELEROMETER_IDX)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_samples_follow_recording() {
        let phyphox_mock = PhyphoxMock::new("Test", sensor_cluster(), 10.0, false).unwrap();
        phyphox_mock
            .timestamps
            .lock()
            .await
            .incr_current_timestamp(0.05);

        let samples = phyphox_mock.get_next_samples(GYROSCOPE_IDX).await.unwrap();
        let mut mapper = CsvColumnMapper::new();
        mapper.add_timestamp().add_gyro();
        let recording =
            csv_loader::load_csv_columns::<Sample3D>(SENSOR_READINGS_CSV, &mapper.columns())
                .unwrap();

        for (sample, recorded) in samples.iter().zip(recording.iter()) {
            assert_eq!(sample.get_measurement(), recorded.get_measurement());
        }
    }
}
