use std::sync::Arc;
use tokio::sync::Mutex;

use crate::record::SampleRecord;

/// Records collected during the current measurement, in arrival order.
///
/// Cloning gives another handle to the same buffer.
#[derive(Clone, Debug, Default)]
pub struct Session {
    records: Arc<Mutex<Vec<SampleRecord>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn clear(&self) {
        self.records.lock().await.clear();
    }

    pub async fn push(&self, record: SampleRecord) {
        self.records.lock().await.push(record);
    }

    pub async fn extend(&self, records: Vec<SampleRecord>) {
        self.records.lock().await.extend(records);
    }

    /// Copy of the records collected so far
    pub async fn snapshot(&self) -> Vec<SampleRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::{SensorType, XYZ};
    use uuid::Uuid;

    fn record(ts: u64) -> SampleRecord {
        SampleRecord::from_reading(
            ts,
            &SensorType::Accelerometer(Uuid::new_v4()),
            &XYZ::new([1.0, 2.0, 3.0]),
            "80",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_append_order() {
        let session = Session::new();
        session.push(record(1)).await;
        session.extend(vec![record(2), record(3)]).await;

        let timestamps: Vec<u64> = session
            .snapshot()
            .await
            .iter()
            .map(|r| r.timestamp_millis())
            .collect();
        assert_eq!(timestamps, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_clear_shared_handle() {
        let session = Session::new();
        let handle = session.clone();
        handle.push(record(1)).await;
        assert_eq!(session.len().await, 1);

        session.clear().await;
        assert!(handle.is_empty().await);
    }
}
