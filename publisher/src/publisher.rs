use async_trait::async_trait;
use dashmap::DashMap;
use futures::future::join_all;
use std::sync::Arc;
use uuid::Uuid;

use common::traits::Notifiable;
use common::types::Callback;

#[async_trait]
pub trait Publishable<T> {
    async fn register_listener(&self, listener: &mut dyn Notifiable<T>) -> Uuid;
    async fn unregister_listener(&self, listener_id: Uuid);
    async fn notify_listeners(&self, data: Arc<T>);
}

/// Record of registered listeners that will be notified of updates
pub struct Publisher<T> {
    listeners: Arc<DashMap<Uuid, Callback<T>>>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Publisher<T> {
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(DashMap::new()),
        }
    }

    // Returns true if no listeners registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    // Returns number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

#[async_trait]
impl<T> Publishable<T> for Publisher<T>
where
    T: Send + Sync + 'static,
{
    async fn register_listener(&self, listener: &mut dyn Notifiable<T>) -> Uuid {
        let callback = listener.get_callback();
        let listener_id = Uuid::new_v4();
        listener.set_id(listener_id);
        self.listeners.insert(listener_id, callback);
        listener_id
    }

    async fn unregister_listener(&self, listener_id: Uuid) {
        self.listeners.remove(&listener_id);
    }

    /// Calls every registered listener with the same data and waits for all of them.
    async fn notify_listeners(&self, data: Arc<T>) {
        // Collect first so no map guard is held across the awaits below
        let listeners: Vec<(Uuid, Callback<T>)> = self
            .listeners
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        join_all(
            listeners
                .into_iter()
                .map(|(id, callback)| callback(id, data.clone())),
        )
        .await;
    }
}
