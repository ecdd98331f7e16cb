use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use async_trait::async_trait;

use common::types::timed::Sample3D;
use common::types::{SensorReadings, SensorType};
use publisher::PublisherManager;

use crate::models::errors::PhyphoxError;

pub(crate) type SensorPublishers = PublisherManager<SensorReadings<Sample3D>, SensorType>;

#[async_trait]
pub trait PhyphoxPort {
    /// Starts the data acquisition process. The process is stopped when `abort_signal` is notified.
    /// Every batch of readings is published to the listeners registered for its sensor.
    /// Returns FetchData error if it can't connect to REST API.
    async fn start(
        &self,
        period_millis: Duration,
        abort_signal: Option<Arc<Notify>>,
        publishers: Option<SensorPublishers>,
    ) -> Result<(), PhyphoxError>;

    fn get_tag(&self) -> &str;
    async fn get_available_sensors(&self) -> Result<Vec<SensorType>, String>;
    fn get_sensor_cluster(&self) -> Vec<SensorType>;
}
