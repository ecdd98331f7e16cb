use async_trait::async_trait;
use log::{debug, error};
use publisher::PublisherManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::adapters::{mock::PhyphoxMock, production::Phyphox};
/// Generic Phyphox service
use crate::models::errors::PhyphoxError;
use crate::models::shutdown;
use crate::ports::PhyphoxPort;
use common::traits::{IMUSource, Notifiable};
use common::types::sensors::{SensorReadings, SensorType};
use common::types::timed::Sample3D;

/// Configuration of Phyphox service
pub struct PhyphoxService<C>
where
    C: PhyphoxPort,
{
    client: C,
    publishers: PublisherManager<SensorReadings<Sample3D>, SensorType>,
    abort_signal: Arc<Notify>,
}

impl<C> PhyphoxService<C>
where
    C: PhyphoxPort,
{
    /// Creates a new service around `client`, with one publisher per sensor of its cluster.
    pub fn new(client: C) -> Self {
        let abort_signal = Arc::new(Notify::new());
        let sensor_cluster = client.get_sensor_cluster();

        let publishers = PublisherManager::new(&sensor_cluster);

        PhyphoxService {
            client,
            abort_signal,
            publishers,
        }
    }

    /// Starts the data acquisition process. The process is stopped with a SIGINT signal, after
    /// `run_for_millis` if given, or by [`PhyphoxService::stop`].
    /// Returns FetchData error if it can't connect to REST API.
    pub async fn start(
        &self,
        period_millis: Duration,
        run_for_millis: Option<u64>,
    ) -> Result<(), PhyphoxError> {
        let shutdown_handle =
            shutdown::listen_for_shutdown(Arc::clone(&self.abort_signal), run_for_millis);
        let result = self
            .client
            .start(
                period_millis,
                Some(self.abort_signal.clone()),
                Some(self.publishers.clone()),
            )
            .await;
        shutdown_handle.abort();
        result
    }

    /// Requests the acquisition loop to finish
    pub fn stop(&self) {
        // notify_one keeps a permit in case the loop is busy publishing
        self.abort_signal.notify_one();
    }
}

#[async_trait]
impl<C> IMUSource<SensorReadings<Sample3D>, Sample3D> for PhyphoxService<C>
where
    C: PhyphoxPort + Send + Sync,
{
    async fn get_available_sensors(&self) -> Result<Vec<SensorType>, String> {
        self.client.get_available_sensors().await
    }

    fn get_tag(&self) -> &str {
        self.client.get_tag()
    }

    async fn unregister_listener(&self, id: Uuid) {
        if let Err(e) = self.publishers.remove_listener(id).await {
            debug!("Cannot unregister listener {}: {}", id, e);
        }
        debug!("{} listeners registered", self.publishers.n_listeners());
    }

    async fn register_listener(
        &self,
        listener: &mut dyn Notifiable<SensorReadings<Sample3D>>,
        sensor_type: &SensorType,
    ) -> Result<Uuid, String> {
        self.publishers.add_listener(listener, sensor_type).await
    }

    async fn notify_listeners(&self, sensor_type: SensorType, data: Arc<SensorReadings<Sample3D>>) {
        self.publishers.notify_listeners(sensor_type, data).await
    }
}

/// Starts the phyphox service asynchronously, polling the phone every `update_period_millis`.
///
/// An error ClientBuild is returned if http client connecting with phyphox app REST API cannot be created.
///
/// # Returns
///
/// Returns a tuple containing:
/// * A `tokio::task::JoinHandle<()>` representing the spawned asynchronous task.
/// * An `Arc<PhyphoxService<Phyphox>>` instance, allowing further interaction with the sensor system.
pub fn run_service(
    base_url: &str,
    sensor_cluster_tag: &str,
    sensor_cluster: Vec<SensorType>,
    update_period_millis: u64,
) -> Result<(tokio::task::JoinHandle<()>, Arc<PhyphoxService<Phyphox>>), PhyphoxError> {
    let phyphox = Phyphox::new(base_url, sensor_cluster_tag, sensor_cluster)?;
    let phyphox_service: Arc<PhyphoxService<Phyphox>> = Arc::new(PhyphoxService::new(phyphox));

    let handle = tokio::spawn({
        let phyphox_service_clone = phyphox_service.clone();
        async move {
            if let Err(e) = phyphox_service_clone
                .start(
                    Duration::from_millis(update_period_millis),
                    None, // run until ctrl-c signal
                )
                .await
            {
                error!("Error in Phyphox loop: {:?}", e);
            }
        }
    });
    Ok((handle, phyphox_service))
}

/// Starts a mock phyphox service that replays the bundled recording.
///
/// The mock captures one sample per sensor every `capture_sampling_period_millis` and publishes
/// them every `update_period_millis`. It runs until Ctrl+C, or for `run_for_millis` if given.
///
/// Returns a tuple containing:
/// - A `tokio::task::JoinHandle<()>` representing the spawned asynchronous task.
/// - An `Arc<PhyphoxService<PhyphoxMock>>` instance, allowing further interaction with the sensor system.
pub fn run_mock_service(
    sensor_cluster_tag: &str,
    sensor_cluster: Vec<SensorType>,
    update_period_millis: u64,
    capture_sampling_period_millis: f64,
    add_sensor_noise: bool,
    run_for_millis: Option<u64>,
) -> Result<
    (
        tokio::task::JoinHandle<()>,
        Arc<PhyphoxService<PhyphoxMock>>,
    ),
    PhyphoxError,
> {
    let phyphox = PhyphoxMock::new(
        sensor_cluster_tag,
        sensor_cluster,
        capture_sampling_period_millis,
        add_sensor_noise,
    )?;
    let phyphox_service: Arc<PhyphoxService<PhyphoxMock>> = Arc::new(PhyphoxService::new(phyphox));
    let handle = tokio::spawn({
        let phyphox_service_clone = phyphox_service.clone();
        async move {
            if let Err(e) = phyphox_service_clone
                .start(Duration::from_millis(update_period_millis), run_for_millis)
                .await
            {
                error!("Error in Phyphox loop: {:?}", e);
            }
        }
    });
    Ok((handle, phyphox_service))
}
