use chrono::Local;
use log::{debug, warn};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::task::JoinHandle;

use common::traits::{IMUSink, IMUSource};
use common::types::{Sample3D, SensorReadings, SensorType};

use crate::config::LoggerConfig;
use crate::errors::RecorderError;
use crate::export::{self, CSV_MIME_TYPE};
use crate::messages::MessageBoard;
use crate::session::Session;
use crate::sink::RecordingSink;
use crate::viewer::Viewer;

/// Sensor source the controller records from
pub type SensorSource = dyn IMUSource<SensorReadings<Sample3D>, Sample3D>;

pub const MSG_SENSORS_NOT_AVAILABLE: &str = "Sensors are not available.";
pub const MSG_MEASUREMENT_STARTED: &str = "Measurement started";
pub const MSG_MEASUREMENT_STOPPED: &str = "Measurement stopped";
pub const MSG_NO_DATA: &str = "No data to save.";
pub const MSG_DOWNLOADED: &str = "File saved to the downloads folder.";
pub const MSG_NO_VIEWER: &str = "No app available to open the file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementState {
    Idle,
    /// Start countdown running
    Pending,
    Measuring,
}

impl fmt::Display for MeasurementState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementState::Idle => write!(f, "idle"),
            MeasurementState::Pending => write!(f, "starting"),
            MeasurementState::Measuring => write!(f, "measuring"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub start_delay: Duration,
    pub sampling_interval: Duration,
    pub documents_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub open_after_save: bool,
}

impl From<&LoggerConfig> for ControllerSettings {
    fn from(config: &LoggerConfig) -> Self {
        Self {
            start_delay: config.measurement.start_delay(),
            sampling_interval: config.measurement.sampling_interval(),
            documents_dir: config.storage.documents_dir.clone(),
            downloads_dir: config.storage.downloads_dir.clone(),
            open_after_save: config.viewer.open_after_save,
        }
    }
}

/// Snapshot of the controller, for the operator
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub state: MeasurementState,
    pub cadence: String,
    pub n_records: usize,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state: {}, cadence: {:?}, records: {}",
            self.state, self.cadence, self.n_records
        )
    }
}

struct Control {
    state: MeasurementState,
    countdown: Option<JoinHandle<()>>,
    watchdog: Option<JoinHandle<()>>,
}

/// Drives a measurement session: start (optionally after a countdown), stop, cadence updates
/// and export of the collected records.
///
/// Cloning gives another handle to the same controller.
#[derive(Clone)]
pub struct MeasurementController {
    source: Arc<SensorSource>,
    settings: ControllerSettings,
    session: Session,
    cadence: Arc<RwLock<String>>,
    sink: RecordingSink,
    messages: MessageBoard,
    viewer: Arc<dyn Viewer>,
    control: Arc<Mutex<Control>>,
}

impl MeasurementController {
    pub fn new(
        source: Arc<SensorSource>,
        settings: ControllerSettings,
        viewer: Arc<dyn Viewer>,
    ) -> Self {
        let session = Session::new();
        let cadence = Arc::new(RwLock::new(String::new()));
        let sink = RecordingSink::new(session.clone(), cadence.clone());
        Self {
            source,
            settings,
            session,
            cadence,
            sink,
            messages: MessageBoard::new(),
            viewer,
            control: Arc::new(Mutex::new(Control {
                state: MeasurementState::Idle,
                countdown: None,
                watchdog: None,
            })),
        }
    }

    pub fn messages(&self) -> &MessageBoard {
        &self.messages
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn state(&self) -> MeasurementState {
        self.control.lock().await.state
    }

    pub async fn status(&self) -> Status {
        Status {
            state: self.state().await,
            cadence: self.cadence().await,
            n_records: self.session.len().await,
        }
    }

    pub async fn cadence(&self) -> String {
        self.cadence.read().await.clone()
    }

    /// Readings received from now on carry `cadence`
    pub async fn set_cadence(&self, cadence: &str) {
        *self.cadence.write().await = cadence.to_string();
        debug!("Cadence set to {:?}", cadence);
    }

    /// Starts the measurement once the configured delay has elapsed
    pub async fn start_with_delay(&self) {
        let mut control = self.control.lock().await;
        if control.state != MeasurementState::Idle {
            warn!("Start requested while {}, ignored", control.state);
            return;
        }
        control.state = MeasurementState::Pending;

        let delay = self.settings.start_delay;
        self.messages
            .show(format!(
                "Measurement starts in {} seconds...",
                delay.as_secs()
            ))
            .await;

        let this = self.clone();
        control.countdown = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut control = this.control.lock().await;
            if control.state != MeasurementState::Pending {
                return;
            }
            control.countdown.take();
            this.begin(control).await;
        }));
    }

    /// Starts the measurement right away, if both an accelerometer and a gyroscope are
    /// available. Clears the records of the previous session.
    pub async fn start(&self) {
        let mut control = self.control.lock().await;
        if control.state == MeasurementState::Measuring {
            warn!("Start requested while measuring, ignored");
            return;
        }
        if let Some(countdown) = control.countdown.take() {
            countdown.abort();
        }
        self.begin(control).await;
    }

    async fn begin(&self, mut control: MutexGuard<'_, Control>) {
        let sensors = match self.select_sensors().await {
            Some(sensors) => sensors,
            None => {
                control.state = MeasurementState::Idle;
                drop(control);
                self.messages.show(MSG_SENSORS_NOT_AVAILABLE).await;
                return;
            }
        };

        self.session.clear().await;
        if let Err(e) = self.sink.attach_listeners(self.source.as_ref(), &sensors).await {
            // the watchdog registers the missing ones
            warn!("Error registering sensor listeners: {}", e);
        }
        control.state = MeasurementState::Measuring;
        control.watchdog = Some(self.spawn_watchdog(sensors));
        drop(control);

        self.messages.show(MSG_MEASUREMENT_STARTED).await;
    }

    /// Stops the measurement or cancels a pending start. No-op while idle.
    pub async fn stop(&self) {
        let mut control = self.control.lock().await;
        match control.state {
            MeasurementState::Idle => {
                debug!("Stop requested while idle");
                return;
            }
            MeasurementState::Pending => {
                if let Some(countdown) = control.countdown.take() {
                    countdown.abort();
                }
            }
            MeasurementState::Measuring => {
                if let Some(watchdog) = control.watchdog.take() {
                    watchdog.abort();
                }
                self.sink.detach_all(self.source.as_ref()).await;
            }
        }
        control.state = MeasurementState::Idle;
        drop(control);

        self.messages.show(MSG_MEASUREMENT_STOPPED).await;
    }

    /// Writes the session to the documents directory, copies it to the downloads directory
    /// and opens the copy. Every outcome is reported on the message board.
    ///
    /// Returns the path of the downloaded copy, or None if there was nothing to save.
    pub async fn save(&self) -> Result<Option<PathBuf>, RecorderError> {
        let records = self.session.snapshot().await;
        if records.is_empty() {
            self.messages.show(MSG_NO_DATA).await;
            return Ok(None);
        }

        let file_name = export::session_file_name(&self.cadence().await, &Local::now());
        let documents_dir = self.settings.documents_dir.clone();
        let written = tokio::task::spawn_blocking(move || {
            export::write_session_csv(&documents_dir, &file_name, &records)
        })
        .await
        .map_err(|e| RecorderError::Task(e.to_string()))
        .and_then(|result| result);

        let path = match written {
            Ok(path) => {
                self.messages
                    .show(format!("File saved: {}", path.display()))
                    .await;
                path
            }
            Err(e) => {
                self.messages.show(format!("File save failed: {}", e)).await;
                return Err(e);
            }
        };

        let downloads_dir = self.settings.downloads_dir.clone();
        let copied = tokio::task::spawn_blocking(move || {
            export::copy_to_downloads(&path, &downloads_dir)
        })
        .await
        .map_err(|e| RecorderError::Task(e.to_string()))
        .and_then(|result| result);

        let download = match copied {
            Ok(download) => {
                self.messages.show(MSG_DOWNLOADED).await;
                download
            }
            Err(e) => {
                self.messages.show(format!("Download failed: {}", e)).await;
                return Err(e);
            }
        };

        if self.settings.open_after_save {
            if let Err(e) = self.viewer.open(&download, CSV_MIME_TYPE).await {
                warn!("Cannot open {}: {}", download.display(), e);
                self.messages.show(MSG_NO_VIEWER).await;
            }
        }

        Ok(Some(download))
    }

    /// First accelerometer and first gyroscope reported by the source
    async fn select_sensors(&self) -> Option<Vec<SensorType>> {
        let available = match self.source.get_available_sensors().await {
            Ok(available) => available,
            Err(e) => {
                warn!("Cannot query available sensors: {}", e);
                return None;
            }
        };
        let accelerometer = available
            .iter()
            .find(|s| matches!(s, SensorType::Accelerometer(_)))?;
        let gyroscope = available
            .iter()
            .find(|s| matches!(s, SensorType::Gyroscope(_)))?;
        Some(vec![accelerometer.clone(), gyroscope.clone()])
    }

    /// Registers again, while measuring, the listener of every sensor that has none
    fn spawn_watchdog(&self, sensors: Vec<SensorType>) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(this.settings.sampling_interval);
            loop {
                interval.tick().await;
                if this.state().await != MeasurementState::Measuring {
                    break;
                }
                let missing = this.sink.missing_sensors(&sensors).await;
                if missing.is_empty() {
                    continue;
                }
                debug!("No listener for {:?}, registering again", missing);
                if let Err(e) = this
                    .sink
                    .attach_listeners(this.source.as_ref(), &missing)
                    .await
                {
                    warn!("Error registering sensor listeners: {}", e);
                }
            }
        })
    }
}
