//! # Crate cadence-logger
//!
//! Records accelerometer and gyroscope readings from a sensor source, tags every sample with the
//! cadence typed by the operator and exports the session as a CSV file.
//!
//! A session goes through:
//! - registration of listeners on the source when the measurement starts,
//! - one [`record::SampleRecord`] per reading, appended to the in-memory [`session::Session`],
//! - on save, a CSV file in the documents directory, copied to the downloads directory and
//!   handed to a [`viewer::Viewer`].
//!
//! Operator feedback goes through the [`messages::MessageBoard`].

pub mod commands;
pub mod config;
pub mod controller;
pub mod errors;
pub mod export;
pub mod logger;
pub mod messages;
pub mod record;
pub mod session;
pub mod sink;
pub mod viewer;

pub use config::LoggerConfig;
pub use controller::{ControllerSettings, MeasurementController, MeasurementState, SensorSource};
pub use errors::{ConfigError, RecorderError};
