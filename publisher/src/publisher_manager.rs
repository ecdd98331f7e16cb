use dashmap::DashMap;
use std::cmp::Eq;
use std::hash::Hash;
use std::sync::Arc;
use uuid::Uuid;

use crate::Publishable;

use super::publisher::Publisher;
use common::traits::publisher::Notifiable;

/// One [`Publisher`] per key, typically one per sensor of a cluster. The set of keys is fixed
/// when the manager is built. Listeners are registered against a key and removed by id alone,
/// the manager remembers which publisher each id belongs to.
///
/// Cloning gives another handle to the same publishers.
///
/// # Example
///
/// ```rust
/// use uuid::Uuid;
/// use publisher::{Listener, PublisherManager};
/// use common::types::sensors::SensorType;
/// use common::types::timed::Sample3D;
/// use std::sync::Arc;
/// use tokio::runtime::Runtime;
///
/// let rt = Runtime::new().unwrap();
/// rt.block_on(async {
///     let accelerometer = SensorType::Accelerometer(Uuid::new_v4());
///     let manager = PublisherManager::<Vec<Sample3D>, SensorType>::new(&[accelerometer.clone()]);
///
///     let mut listener = Listener::new(|_id, samples: Arc<Vec<Sample3D>>| async move {
///         println!("{} accelerometer samples", samples.len());
///     });
///     let id = manager.add_listener(&mut listener, &accelerometer).await.unwrap();
///
///     manager.notify_listeners(accelerometer, Arc::new(vec![Sample3D::default()])).await;
///     manager.remove_listener(id).await.unwrap();
/// });
/// ```
pub struct PublisherManager<T, S> {
    publishers: Arc<DashMap<S, Publisher<T>>>,
    control: Arc<DashMap<Uuid, S>>,
}

impl<T, S> Clone for PublisherManager<T, S> {
    fn clone(&self) -> Self {
        Self {
            publishers: self.publishers.clone(),
            control: self.control.clone(),
        }
    }
}

impl<T, S> PublisherManager<T, S>
where
    T: Send + Sync + 'static,
    S: Send + Sync + Hash + Eq + Clone,
{
    pub fn new(publisher_types: &[S]) -> Self {
        let publishers = DashMap::<S, Publisher<T>>::new();
        for publisher_type in publisher_types {
            publishers.insert(publisher_type.clone(), Publisher::new());
        }

        Self {
            publishers: Arc::new(publishers),
            control: Arc::new(DashMap::new()),
        }
    }

    /// Registers `listener` with the publisher of `publisher_type`. Fails if there is no such
    /// publisher.
    pub async fn add_listener(
        &self,
        listener: &mut dyn Notifiable<T>,
        publisher_type: &S,
    ) -> Result<Uuid, String> {
        let publisher = self
            .get_publisher(publisher_type)
            .ok_or_else(|| "Publisher doesnt exist".to_string())?;
        let id = publisher.register_listener(listener).await;
        self.control.insert(id, publisher_type.clone());
        Ok(id)
    }

    pub async fn remove_listener(&self, id: Uuid) -> Result<(), String> {
        let (_, publisher_type) = self
            .control
            .remove(&id)
            .ok_or_else(|| "Listener Id not found".to_string())?;
        let publisher = self
            .get_publisher(&publisher_type)
            .ok_or_else(|| "Publisher doesnt exist".to_string())?;
        publisher.unregister_listener(id).await;
        Ok(())
    }

    /// Sends `data` to the listeners of `publisher_type`. Unknown types are ignored.
    pub async fn notify_listeners(&self, publisher_type: S, data: Arc<T>) {
        if let Some(publisher) = self.get_publisher(&publisher_type) {
            publisher.notify_listeners(data).await;
        }
    }

    /// Returns a copy of the publisher registered under `publisher_type`
    pub fn get_publisher(&self, publisher_type: &S) -> Option<Publisher<T>> {
        self.publishers
            .get(publisher_type)
            .map(|publisher| publisher.clone())
    }

    /// Number of listeners currently registered across all publishers
    pub fn n_listeners(&self) -> usize {
        self.control.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener;
    use common::types::sensors::SensorType;
    use common::types::timed::Sample3D;
    use tokio::sync::Mutex;

    /// Counts the samples received per listener id
    #[derive(Clone, Default)]
    struct SampleCounter {
        counts: Arc<Mutex<Vec<(Uuid, usize)>>>,
    }

    impl SampleCounter {
        async fn handle(&self, id: Uuid, samples: Arc<Vec<Sample3D>>) {
            self.counts.lock().await.push((id, samples.len()));
        }

        async fn received_by(&self, id: Uuid) -> usize {
            self.counts
                .lock()
                .await
                .iter()
                .filter(|(listener_id, _)| *listener_id == id)
                .map(|(_, n)| n)
                .sum()
        }
    }

    fn cluster() -> (SensorType, SensorType) {
        (
            SensorType::Accelerometer(Uuid::new_v4()),
            SensorType::Gyroscope(Uuid::new_v4()),
        )
    }

    fn samples(n: usize) -> Arc<Vec<Sample3D>> {
        Arc::new(vec![Sample3D::default(); n])
    }

    #[tokio::test]
    async fn test_add_listener_to_unknown_publisher() {
        let (acc, gyro) = cluster();
        let manager = PublisherManager::<Vec<Sample3D>, SensorType>::new(&[acc]);
        let counter = SampleCounter::default();
        let mut listener = listener!(counter.handle);

        assert!(manager.add_listener(&mut listener, &gyro).await.is_err());
        assert_eq!(manager.n_listeners(), 0);
    }

    #[tokio::test]
    async fn test_notifications_routed_by_sensor() {
        let (acc, gyro) = cluster();
        let manager =
            PublisherManager::<Vec<Sample3D>, SensorType>::new(&[acc.clone(), gyro.clone()]);
        let counter = SampleCounter::default();

        let mut acc_listener = listener!(counter.handle);
        let mut gyro_listener = listener!(counter.handle);
        let acc_id = manager.add_listener(&mut acc_listener, &acc).await.unwrap();
        let gyro_id = manager
            .add_listener(&mut gyro_listener, &gyro)
            .await
            .unwrap();
        assert_eq!(acc_listener.get_id(), Some(acc_id));
        assert_eq!(manager.n_listeners(), 2);

        manager.notify_listeners(acc.clone(), samples(3)).await;
        manager.notify_listeners(gyro.clone(), samples(2)).await;
        manager.notify_listeners(acc, samples(1)).await;

        assert_eq!(counter.received_by(acc_id).await, 4);
        assert_eq!(counter.received_by(gyro_id).await, 2);
    }

    #[tokio::test]
    async fn test_notify_unknown_sensor_is_ignored() {
        let (acc, gyro) = cluster();
        let manager = PublisherManager::<Vec<Sample3D>, SensorType>::new(&[acc.clone()]);
        let counter = SampleCounter::default();
        let mut listener = listener!(counter.handle);
        manager.add_listener(&mut listener, &acc).await.unwrap();

        manager.notify_listeners(gyro, samples(5)).await;
        assert!(counter.counts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_listener() {
        let (acc, _gyro) = cluster();
        let manager = PublisherManager::<Vec<Sample3D>, SensorType>::new(&[acc.clone()]);
        let counter = SampleCounter::default();
        let mut listener = listener!(counter.handle);
        let id = manager.add_listener(&mut listener, &acc).await.unwrap();

        manager.remove_listener(id).await.unwrap();
        assert_eq!(manager.n_listeners(), 0);
        assert!(manager.get_publisher(&acc).unwrap().is_empty());

        manager.notify_listeners(acc, samples(2)).await;
        assert_eq!(counter.received_by(id).await, 0);

        assert!(manager.remove_listener(id).await.is_err());
    }

    #[tokio::test]
    async fn test_clones_share_publishers() {
        let (acc, _gyro) = cluster();
        let manager = PublisherManager::<Vec<Sample3D>, SensorType>::new(&[acc.clone()]);
        let handle = manager.clone();
        let counter = SampleCounter::default();
        let mut listener = listener!(counter.handle);

        let id = handle.add_listener(&mut listener, &acc).await.unwrap();
        manager.notify_listeners(acc, samples(2)).await;

        assert_eq!(counter.received_by(id).await, 2);
        assert_eq!(manager.n_listeners(), 1);
    }
}
