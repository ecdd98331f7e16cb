// Functionality for data acquisition from accelerometer and gyroscope phone sensors
// via the Phyphox HTTP API. It includes methods to fetch sensor data,
// control the measurement, and publish incoming data to registered listeners.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Notify;

use common::traits::{IMUReadings, IMUSample};
use common::types::sensors::{SensorReadings, SensorType};
use common::types::timed::Sample3D;
use common::types::untimed::XYZ;

use crate::helpers;
use crate::models::errors::PhyphoxError;
use crate::models::http_client::HttpClient;
use crate::ports::{PhyphoxPort, SensorPublishers};

/// Constants for HTTP endpoints and buffer keys.
const GET_CMD: &str = "/get?";
const CONTROL_CMD: &str = "/control?cmd=";
const START_CMD: &str = "start";
const STOP_CMD: &str = "stop";
const CLEAR_CMD: &str = "clear";
const CONFIG_CMD: &str = "/config?";

/// Subset of the experiment configuration returned by `/config?`
#[derive(Debug, Deserialize)]
struct ExperimentConfig {
    #[serde(default)]
    export: Vec<ExportSet>,
}

#[derive(Debug, Deserialize)]
struct ExportSet {
    set: String,
}

/// Configures data acquisition
pub struct Phyphox {
    client: HttpClient,
    sensor_cluster_tag: String,
    sensor_cluster: Vec<SensorType>,
}

impl Phyphox {
    /// Creates a new `Phyphox` instance with the specified configuration.
    /// Returns an ClientBuild error if Http client to connect to Phyphox API cannot be created
    pub(crate) fn new(
        base_url: &str,
        sensor_cluster_tag: &str,
        sensor_cluster: Vec<SensorType>,
    ) -> Result<Self, PhyphoxError> {
        let client = HttpClient::new(base_url.to_string())?;

        Ok(Self {
            client,
            sensor_cluster_tag: sensor_cluster_tag.to_string(),
            sensor_cluster,
        })
    }

    /// Returns JSON data from the specified path or FetchData error if it couldnt retrieve data from REST API
    async fn fetch_json(&self, path: &str) -> Result<Value, PhyphoxError> {
        self.client.fetch_json(path).await
    }

    /// Returns a tuple containing the retrieved sensor data and a flag indicating if sensor is still active
    /// # Errors
    /// - FetchData if there is an error connecting to REST API
    /// - IncorrectDataFormat if the data retrieved from the API has an unexpected format
    async fn get_data(
        &self,
        time_var: &str,
        since: Option<f64>,
        variables: &[&str],
    ) -> Result<(Vec<f64>, Vec<XYZ>, bool), PhyphoxError> {
        let query = helpers::build_query(variables, time_var, since);
        let data = self.fetch_json(&format!("{GET_CMD}{}", query)).await?;
        let status = helpers::get_status_from_json(&data)?;
        if !status {
            return Ok((vec![], vec![], status));
        }
        let results = helpers::parse_results(&data, variables, time_var)?;
        let (timestamp, untimed_data) = helpers::combine_results(results);

        Ok((timestamp, untimed_data, status))
    }

    /// Sends a control command to the Phyphox server. Returns FetchData error if it can't connect with
    /// the REST API
    async fn control(&self, command: &str) -> Result<(), PhyphoxError> {
        self.fetch_json(&format!("{CONTROL_CMD}{}", command))
            .await?;
        Ok(())
    }
    // Clears data from the phone
    async fn clear_cmd(&self) -> Result<(), PhyphoxError> {
        log::info!("Clearing data...");
        self.control(CLEAR_CMD).await
    }
    // Starts measurement capture on the phone
    async fn start_cmd(&self) -> Result<(), PhyphoxError> {
        log::info!("Starting recording...");
        self.control(START_CMD).await
    }
    // Stops measurement capture on the phone
    async fn stop_cmd(&self) -> Result<(), PhyphoxError> {
        log::info!("Stopping recording...");
        self.control(STOP_CMD).await
    }
}

#[async_trait]
impl PhyphoxPort for Phyphox {
    async fn start(
        &self,
        period_millis: Duration,
        abort_signal: Option<Arc<Notify>>,
        publishers: Option<SensorPublishers>,
    ) -> Result<(), PhyphoxError> {
        self.clear_cmd().await?;
        self.start_cmd().await?;

        let mut last_time: HashMap<SensorType, f64> = HashMap::new();

        let active_sensors = self
            .get_available_sensors()
            .await
            .map_err(PhyphoxError::Other)?;

        log::info!("Fetching data...");

        let abort_signal = abort_signal.unwrap_or_default();

        'acquisition: loop {
            tokio::select! {
                _ = abort_signal.notified() => {
                    break;
                }

                _ = tokio::time::sleep(period_millis) => {
                    for sensor in active_sensors.iter() {
                        let (time_str, variables) = helpers::control_str(sensor)?;
                        let since = last_time.entry(sensor.clone()).or_insert(0.0);
                        let (timestamp_info, untimed_data_info, is_measuring) = match self
                            .get_data(time_str, Some(*since), &variables)
                            .await {
                                Ok(result) => result,
                                Err(e) => {
                                    log::error!("Error fetching data: {:?}", e);
                                    break;
                                }
                        };

                        if !is_measuring {
                            log::info!("Recording stopped.");
                            break 'acquisition;
                        }

                        helpers::update_measurement_time(&timestamp_info, since);

                        if timestamp_info.is_empty() {
                            continue;
                        }

                        let timed_samples: Vec<Sample3D> = timestamp_info
                            .into_iter()
                            .zip(untimed_data_info)
                            .map(|(t, s)| Sample3D::from_measurement(t, s))
                            .collect();
                        let buffer = SensorReadings::from_vec(&self.sensor_cluster_tag, sensor.clone(), timed_samples);

                        if let Some(publishers) = publishers.as_ref() {
                            publishers.notify_listeners(sensor.clone(), Arc::new(buffer)).await;
                        }
                    }
                }
            }
        }

        self.stop_cmd().await?;
        Ok(())
    }

    fn get_tag(&self) -> &str {
        self.sensor_cluster_tag.as_str()
    }

    /// Returns the sensors of the cluster that the running Phyphox experiment exports
    async fn get_available_sensors(&self) -> Result<Vec<SensorType>, String> {
        let config: ExperimentConfig = self
            .client
            .fetch(CONFIG_CMD)
            .await
            .map_err(|e| format!("Error retrieving available sensors: {}", e))?;

        let available_sensors = self
            .sensor_cluster
            .iter()
            .filter(|sensor| {
                config
                    .export
                    .iter()
                    .any(|entry| sensor.matches_kind(&entry.set))
            })
            .cloned()
            .collect();
        Ok(available_sensors)
    }

    fn get_sensor_cluster(&self) -> Vec<SensorType> {
        self.sensor_cluster.clone()
    }
}
