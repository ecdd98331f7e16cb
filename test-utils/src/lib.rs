//! Helpers shared by the workspace tests: loading of the bundled sensor recording, a sink that
//! collects whatever a sensor source publishes and a source driven by hand.

pub mod csv_loader;
pub mod sink_mock;
pub mod source_mock;

pub use sink_mock::SinkMock;
pub use source_mock::SourceMock;
