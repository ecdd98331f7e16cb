//! # Crate publisher
//!
//! ## publisher
//!
//! The `publisher` crate provides a mechanism for registering and notifying listeners
//! of new events of type `T`.
//!
//! Listeners wrap asynchronous callbacks (`Fn(Uuid, Arc<T>) -> Future`). A [`Publisher`] keeps
//! a set of listeners for one stream of events, and a [`PublisherManager`] keeps one publisher
//! per key (typically a sensor), routing each registered listener to the right publisher.
//!
//! ### Example
//!
//! ```ignore
//! let publisher = Publisher::<String>::new();
//!
//! let mut listener = Listener::new(|_id, message: Arc<String>| async move {
//!     println!("Listener received: {}", message);
//! });
//!
//! let id = publisher.register_listener(&mut listener).await;
//! publisher.notify_listeners(Arc::new("Hello, World!".to_string())).await;
//! publisher.unregister_listener(id).await;
//! ```

pub mod listener;
pub mod macros;
pub mod publisher;
pub mod publisher_manager;

pub use listener::Listener;
pub use publisher::{Publishable, Publisher};
pub use publisher_manager::PublisherManager;
