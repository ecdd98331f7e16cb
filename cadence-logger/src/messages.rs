use log::info;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::traits::Notifiable;
use publisher::{Publishable, Publisher};

/// Operator facing status line. Keeps the latest message and forwards every new one to the
/// registered listeners.
#[derive(Clone, Default)]
pub struct MessageBoard {
    latest: Arc<RwLock<Option<String>>>,
    publisher: Publisher<String>,
}

impl MessageBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn show(&self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        *self.latest.write().await = Some(message.clone());
        self.publisher.notify_listeners(Arc::new(message)).await;
    }

    pub async fn latest(&self) -> Option<String> {
        self.latest.read().await.clone()
    }

    pub async fn subscribe(&self, listener: &mut dyn Notifiable<String>) -> Uuid {
        self.publisher.register_listener(listener).await
    }
}
