//! # Crate phyphox-rs
//!
//! ## phyphox-rs
//!
//! The `phyphox-rs` crate provides a convenient wrapper to interact with [`Phyphox`](https://phyphox.org/), a mobile phone app
//! that allows to capture sensor data from the smart phone. `phyphox-rs` interacts with a REST API enabled in the phone and
//! records the data from the selected sensors.
//!
//! Features include:
//! - Recording of 3-axis Accelerometer [m/s^2] and Gyroscope [rad/s]
//! - Tagging sensors so that readings from different phones can be distinguished.
//! - Selection of read frequency. Note that the sample rate is configured in the mobile app.
//! - Registration of listeners to receive sensor data once received.
//! - A mock service that replays a bundled recording, for tests and demos without a phone.

pub(crate) mod adapters;
pub(crate) mod constants;
mod helpers;
pub(crate) mod models;
pub(crate) mod ports;
pub mod services;

pub use models::errors::PhyphoxError;
pub use models::shutdown::listen_for_shutdown;
pub use services::{run_mock_service, run_service, PhyphoxService};
