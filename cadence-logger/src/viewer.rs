use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::errors::RecorderError;

/// Environment variable carrying the MIME type of the file handed to the viewer program
pub const VIEWER_MIME_ENV: &str = "CADENCE_LOGGER_MIME_TYPE";

/// Opens an exported file with some external application
#[async_trait]
pub trait Viewer: Send + Sync {
    async fn open(&self, path: &Path, mime_type: &str) -> Result<(), RecorderError>;
}

/// Launches a program with the file path as its only argument, without waiting for it to exit.
#[derive(Debug, Clone)]
pub struct CommandViewer {
    program: Option<String>,
}

impl CommandViewer {
    /// A blank `program` leaves the viewer unconfigured
    pub fn new(program: &str) -> Self {
        let program = Some(program.trim().to_string()).filter(|p| !p.is_empty());
        Self { program }
    }
}

#[async_trait]
impl Viewer for CommandViewer {
    async fn open(&self, path: &Path, mime_type: &str) -> Result<(), RecorderError> {
        let program = self.program.as_ref().ok_or(RecorderError::NoViewer)?;
        let child = Command::new(program)
            .arg(path)
            .env(VIEWER_MIME_ENV, mime_type)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RecorderError::Viewer(format!("{}: {}", program, e)))?;
        log::debug!("Viewer {} started (pid {:?})", program, child.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_program() {
        let viewer = CommandViewer::new("  ");
        let result = viewer.open(Path::new("file.csv"), "text/csv").await;
        assert!(matches!(result, Err(RecorderError::NoViewer)));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let viewer = CommandViewer::new("surely-not-an-installed-viewer");
        let result = viewer.open(Path::new("file.csv"), "text/csv").await;
        assert!(matches!(result, Err(RecorderError::Viewer(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_program_started() {
        let viewer = CommandViewer::new("true");
        assert!(viewer.open(Path::new("file.csv"), "text/csv").await.is_ok());
    }
}
