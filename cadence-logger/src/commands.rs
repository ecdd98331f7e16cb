use log::warn;
use std::str::FromStr;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::controller::MeasurementController;

pub const HELP: &str = "\
Commands:
  start           start measuring after the countdown
  start now       start measuring right away
  stop            stop measuring, or cancel a pending start
  cadence <text>  tag the readings received from now on
  save            export the session and open it
  status          show the measurement state
  help            show this help
  quit            stop and exit";

/// One line typed by the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Start,
    StartNow,
    Stop,
    Save,
    Cadence(String),
    Status,
    Help,
    Quit,
}

impl FromStr for OperatorCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word.to_lowercase().as_str(), rest) {
            ("start", "") => Ok(OperatorCommand::Start),
            ("start", "now") => Ok(OperatorCommand::StartNow),
            ("stop", "") => Ok(OperatorCommand::Stop),
            ("save", "") => Ok(OperatorCommand::Save),
            ("cadence", value) => Ok(OperatorCommand::Cadence(value.to_string())),
            ("status", "") => Ok(OperatorCommand::Status),
            ("help", "") | ("?", "") => Ok(OperatorCommand::Help),
            ("quit", "") | ("exit", "") => Ok(OperatorCommand::Quit),
            ("", _) => Err("Empty command".to_string()),
            _ => Err(format!("Unknown command: {}", line)),
        }
    }
}

/// What the operator loop does after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    /// Text to print for the operator
    Reply(String),
    Quit,
}

/// Runs one operator command against `controller`
pub async fn execute(controller: &MeasurementController, command: OperatorCommand) -> CommandOutcome {
    match command {
        OperatorCommand::Start => controller.start_with_delay().await,
        OperatorCommand::StartNow => controller.start().await,
        OperatorCommand::Stop => controller.stop().await,
        OperatorCommand::Cadence(cadence) => {
            controller.set_cadence(&cadence).await;
            return CommandOutcome::Reply(format!("Cadence: {:?}", cadence));
        }
        OperatorCommand::Save => {
            // failures are already on the message board
            let _ = controller.save().await;
        }
        OperatorCommand::Status => {
            return CommandOutcome::Reply(controller.status().await.to_string())
        }
        OperatorCommand::Help => return CommandOutcome::Reply(HELP.to_string()),
        OperatorCommand::Quit => return CommandOutcome::Quit,
    }
    CommandOutcome::Continue
}

/// Stops any measurement, then asks the sensor source to finish and waits up to `timeout` for
/// its acquisition task. Returns false if the task did not finish in time.
pub async fn teardown<F>(
    controller: &MeasurementController,
    stop_source: F,
    acquisition: JoinHandle<()>,
    timeout: Duration,
) -> bool
where
    F: FnOnce(),
{
    controller.stop().await;
    stop_source();
    match tokio::time::timeout(timeout, acquisition).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("Sensor source task failed: {}", e);
            true
        }
        Err(_) => {
            warn!("Sensor source did not stop in time");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{ControllerSettings, MeasurementState};
    use crate::viewer::CommandViewer;
    use common::types::SensorType;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use test_utils::SourceMock;
    use tokio::sync::Notify;
    use uuid::Uuid;

    fn controller(source: Arc<SourceMock>, dir: &std::path::Path) -> MeasurementController {
        let settings = ControllerSettings {
            start_delay: Duration::from_millis(100),
            sampling_interval: Duration::from_millis(5),
            documents_dir: dir.join("documents"),
            downloads_dir: dir.join("downloads"),
            open_after_save: false,
        };
        MeasurementController::new(source, settings, Arc::new(CommandViewer::new("")))
    }

    fn phone_source() -> Arc<SourceMock> {
        Arc::new(SourceMock::new(vec![
            SensorType::Accelerometer(Uuid::new_v4()),
            SensorType::Gyroscope(Uuid::new_v4()),
        ]))
    }

    #[tokio::test]
    async fn test_execute_commands() {
        let dir = tempfile::tempdir().unwrap();
        let source = phone_source();
        let controller = controller(source.clone(), dir.path());

        assert_eq!(
            execute(&controller, OperatorCommand::Cadence("110".to_string())).await,
            CommandOutcome::Reply("Cadence: \"110\"".to_string())
        );
        assert_eq!(
            execute(&controller, OperatorCommand::StartNow).await,
            CommandOutcome::Continue
        );
        assert_eq!(controller.state().await, MeasurementState::Measuring);
        assert_eq!(
            execute(&controller, OperatorCommand::Status).await,
            CommandOutcome::Reply("state: measuring, cadence: \"110\", records: 0".to_string())
        );
        assert_eq!(
            execute(&controller, OperatorCommand::Help).await,
            CommandOutcome::Reply(HELP.to_string())
        );
        execute(&controller, OperatorCommand::Stop).await;
        assert_eq!(controller.state().await, MeasurementState::Idle);
    }

    #[tokio::test]
    async fn test_quit_while_measuring_stops_everything() {
        let dir = tempfile::tempdir().unwrap();
        let source = phone_source();
        let controller = controller(source.clone(), dir.path());
        execute(&controller, OperatorCommand::StartNow).await;
        assert_eq!(source.n_listeners(), 2);

        assert_eq!(
            execute(&controller, OperatorCommand::Quit).await,
            CommandOutcome::Quit
        );

        let stop = Arc::new(Notify::new());
        let stopped = Arc::new(AtomicBool::new(false));
        let acquisition = tokio::spawn({
            let stop = stop.clone();
            async move { stop.notified().await }
        });
        let finished = teardown(
            &controller,
            {
                let stopped = stopped.clone();
                move || {
                    stopped.store(true, Ordering::SeqCst);
                    stop.notify_one();
                }
            },
            acquisition,
            Duration::from_secs(1),
        )
        .await;

        assert!(finished);
        assert!(stopped.load(Ordering::SeqCst));
        assert_eq!(controller.state().await, MeasurementState::Idle);
        assert_eq!(source.n_listeners(), 0);
    }

    #[tokio::test]
    async fn test_teardown_cancels_countdown() {
        let dir = tempfile::tempdir().unwrap();
        let source = phone_source();
        let controller = controller(source.clone(), dir.path());
        execute(&controller, OperatorCommand::Start).await;
        assert_eq!(controller.state().await, MeasurementState::Pending);

        let finished = teardown(&controller, || {}, tokio::spawn(async {}), Duration::from_secs(1)).await;
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(finished);
        assert_eq!(controller.state().await, MeasurementState::Idle);
        assert_eq!(source.n_listeners(), 0);
    }

    #[tokio::test]
    async fn test_teardown_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let controller = controller(phone_source(), dir.path());
        let stuck = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        assert!(!teardown(&controller, || {}, stuck, Duration::from_millis(20)).await);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("start".parse(), Ok(OperatorCommand::Start));
        assert_eq!(" START now ".parse(), Ok(OperatorCommand::StartNow));
        assert_eq!("stop".parse(), Ok(OperatorCommand::Stop));
        assert_eq!("save".parse(), Ok(OperatorCommand::Save));
        assert_eq!("status".parse(), Ok(OperatorCommand::Status));
        assert_eq!("?".parse(), Ok(OperatorCommand::Help));
        assert_eq!("exit".parse(), Ok(OperatorCommand::Quit));
    }

    #[test]
    fn test_parse_cadence() {
        assert_eq!(
            "cadence   fast, uphill ".parse(),
            Ok(OperatorCommand::Cadence("fast, uphill".to_string()))
        );
        assert_eq!(
            "cadence".parse(),
            Ok(OperatorCommand::Cadence(String::new()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<OperatorCommand>().is_err());
        assert!("stop now".parse::<OperatorCommand>().is_err());
        assert!("jump".parse::<OperatorCommand>().is_err());
    }
}
