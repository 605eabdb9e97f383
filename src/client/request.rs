//! Request tracking and correlation.
//!
//! Generates request IDs, tracks pending requests, and matches inbound
//! replies to their waiters. Each pending request owns a single-use oneshot
//! slot; a reply for an id with no slot is late or unsolicited and is
//! dropped by the dispatcher with a diagnostic.

use std::collections::HashMap;
use std::sync::atomic::{ AtomicI64, Ordering };
use std::sync::Mutex;

use tokio::sync::oneshot;
use tracing::debug;

use crate::protocol::Error;

/// What a waiter eventually receives: the raw result value, or an error.
pub type ResponseOutcome = Result<serde_json::Value, Error>;

/// Registry of in-flight requests, shared between caller tasks (inserts)
/// and the read loop (completions).
pub struct RequestManager {
    /// Counter for generating unique request IDs. Starts at 1; IDs are
    /// strictly increasing and never reused within a session.
    next_id: AtomicI64,

    /// Pending delivery slots by request ID. The lock is never held across
    /// an await; every operation is a short synchronous critical section.
    pending: Mutex<HashMap<i64, oneshot::Sender<ResponseOutcome>>>,
}

impl RequestManager {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Allocate the next request ID.
    pub fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Register a pending request and get the receiver for its reply.
    pub fn register(&self, id: i64) -> oneshot::Receiver<ResponseOutcome> {
        let (tx, rx) = oneshot::channel();
        let previous = self.pending.lock().expect("pending lock poisoned").insert(id, tx);
        debug_assert!(previous.is_none(), "request id {id} already pending");
        rx
    }

    /// Deliver an outcome to the waiter for `id` and remove the slot.
    /// Returns false when no slot exists (late or duplicate reply).
    pub fn complete(&self, id: i64, outcome: ResponseOutcome) -> bool {
        let sender = self.pending.lock().expect("pending lock poisoned").remove(&id);
        match sender {
            Some(sender) => {
                if sender.send(outcome).is_err() {
                    debug!(id, "waiter went away before delivery");
                }
                true
            }
            None => false,
        }
    }

    /// Remove the slot for `id`, yielding `Cancelled` to any remaining
    /// waiter. A reply that arrives later takes the unsolicited path.
    pub fn cancel(&self, id: i64) {
        if let Some(sender) = self.pending.lock().expect("pending lock poisoned").remove(&id) {
            let _ = sender.send(Err(Error::Cancelled));
            debug!(id, "pending request cancelled");
        }
    }

    /// Remove every slot, yielding `cause` to each waiter. Used on shutdown
    /// and when the read loop dies.
    pub fn abort_all(&self, cause: &Error) {
        let drained: Vec<_> = self.pending
            .lock()
            .expect("pending lock poisoned")
            .drain()
            .collect();
        for (id, sender) in drained {
            if sender.send(Err(cause.clone())).is_err() {
                debug!(id, "waiter went away before abort delivery");
            }
        }
    }

    /// Number of requests currently in flight.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().expect("pending lock poisoned").len()
    }
}

impl Default for RequestManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing_from_one() {
        let manager = RequestManager::new();
        let ids: Vec<i64> = (0..5).map(|_| manager.next_id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn complete_delivers_once_and_removes_the_slot() {
        let manager = RequestManager::new();
        let id = manager.next_id();
        let rx = manager.register(id);

        assert!(manager.complete(id, Ok(serde_json::json!({ "ok": true }))));
        assert_eq!(rx.await.unwrap().unwrap()["ok"], true);

        // The slot is gone; a duplicate reply is a no-op.
        assert!(!manager.complete(id, Ok(serde_json::Value::Null)));
        assert_eq!(manager.pending_count(), 0);
    }

    #[tokio::test]
    async fn cancel_yields_cancelled_to_the_waiter() {
        let manager = RequestManager::new();
        let id = manager.next_id();
        let rx = manager.register(id);

        manager.cancel(id);

        assert!(matches!(rx.await.unwrap(), Err(Error::Cancelled)));
        // The reply arriving after cancellation is dropped as late.
        assert!(!manager.complete(id, Ok(serde_json::Value::Null)));
    }

    #[tokio::test]
    async fn abort_all_fans_out_to_every_waiter() {
        let manager = RequestManager::new();
        let receivers: Vec<_> = (0..3)
            .map(|_| {
                let id = manager.next_id();
                manager.register(id)
            })
            .collect();

        manager.abort_all(&Error::TransportClosed);

        for rx in receivers {
            assert!(matches!(rx.await.unwrap(), Err(Error::TransportClosed)));
        }
        assert_eq!(manager.pending_count(), 0);
    }

    #[test]
    fn complete_on_unknown_id_is_a_no_op() {
        let manager = RequestManager::new();
        assert!(!manager.complete(99, Ok(serde_json::Value::Null)));
    }
}
