//! Module errors

use std::fmt;

/// Represents the different types of errors that can occur in the Phyphox library.
#[derive(Debug, Clone, PartialEq)]
pub enum PhyphoxError {
    /// Error indicating that there was an issue building the client.
    ClientBuild(String),

    /// Error indicating that there was an issue fetching data.
    FetchData(String),

    /// Error indicating that the received data format is incorrect.
    IncorrectDataFormat(String),

    Other(String),
}

impl fmt::Display for PhyphoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhyphoxError::ClientBuild(e) => write!(f, "Cannot build http client: {}", e),
            PhyphoxError::FetchData(e) => write!(f, "Cannot fetch data: {}", e),
            PhyphoxError::IncorrectDataFormat(e) => write!(f, "Incorrect data format: {}", e),
            PhyphoxError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PhyphoxError {}
