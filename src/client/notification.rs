//! Notification fan-out.
//!
//! Dispatches inbound server notifications to registered observers.
//! Observers live for the session; each invocation runs on its own task so
//! a slow observer can neither stall the read loop nor block its peers.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tracing::{ debug, warn };

use crate::protocol::{ Error, JSONRPCNotification };

/// Type alias for a notification observer callback.
pub type NotificationHandler = Arc<
    dyn (Fn(JSONRPCNotification) -> BoxFuture<'static, Result<(), Error>>) + Send + Sync
>;

/// Router for server-originated notifications.
pub struct NotificationRouter {
    /// Registered observers, in registration order. Dispatch takes a read
    /// hold; subscribe takes a write hold.
    observers: RwLock<Vec<NotificationHandler>>,
}

impl NotificationRouter {
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Append an observer. Observers cannot be removed; they are scoped to
    /// the session's lifetime.
    pub async fn subscribe<F, Fut>(&self, observer: F)
        where
            F: Fn(JSONRPCNotification) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Result<(), Error>> + Send + 'static
    {
        let handler: NotificationHandler = Arc::new(move |notification| {
            Box::pin(observer(notification))
        });
        self.observers.write().await.push(handler);
        debug!("registered notification observer");
    }

    /// Invoke every observer with `notification`, each on an independent
    /// task. An observer that fails is logged and does not affect peers.
    pub async fn dispatch(&self, notification: JSONRPCNotification) {
        let observers: Vec<NotificationHandler> = self.observers.read().await.clone();

        if observers.is_empty() {
            debug!(method = %notification.method, "notification with no observers");
            return;
        }

        for observer in observers {
            let notification = notification.clone();
            tokio::spawn(async move {
                if let Err(e) = observer(notification).await {
                    warn!("notification observer failed: {}", e);
                }
            });
        }
    }

    /// Number of registered observers.
    pub async fn observer_count(&self) -> usize {
        self.observers.read().await.len()
    }
}

impl Default for NotificationRouter {
    fn default() -> Self {
        Self::new()
    }
}
