//! Session lifecycle state machine.
//!
//! Tracks the session's state, validates transitions, and gates requests
//! and notifications on the MCP handshake: nothing but `initialize` may be
//! sent before the handshake completes, and nothing at all after close.

use std::sync::RwLock;

use tracing::debug;

use crate::protocol::{ Error, Method };

/// The states a session moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Constructed; the handshake has not started.
    Uninitialized,

    /// The initialize request is in flight.
    Initializing,

    /// Handshake complete; ordinary traffic may flow.
    Ready,

    /// Close has begun; no new traffic.
    Closing,

    /// Terminal. Reached by close, handshake failure, or read-loop exit.
    Closed,
}

/// Guards the session state and validates every transition.
pub struct LifecycleManager {
    state: RwLock<SessionState>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState::Uninitialized),
        }
    }

    /// Get the current state.
    pub fn current(&self) -> SessionState {
        *self.state.read().expect("state lock poisoned")
    }

    /// Transition to `next`, rejecting anything outside the machine:
    ///
    /// ```text
    /// Uninitialized -> Initializing -> Ready -> Closing -> Closed
    ///       \               \___________________________/^
    ///        \______________________________________________^
    /// ```
    ///
    /// `Closed` is terminal and reachable from every state (handshake
    /// failure and read-loop exit jump straight to it).
    pub fn transition_to(&self, next: SessionState) -> Result<(), Error> {
        let mut state = self.state.write().expect("state lock poisoned");

        let allowed = matches!(
            (*state, next),
            (SessionState::Uninitialized, SessionState::Initializing) |
                (SessionState::Initializing, SessionState::Ready) |
                (
                    SessionState::Uninitialized | SessionState::Initializing | SessionState::Ready,
                    SessionState::Closing,
                ) |
                (_, SessionState::Closed)
        );

        if !allowed {
            return Err(
                Error::InvalidState(format!("cannot transition from {:?} to {:?}", *state, next))
            );
        }

        debug!(from = ?*state, to = ?next, "session state transition");
        *state = next;
        Ok(())
    }

    /// Mark the session closed unconditionally. Used when the read loop
    /// terminates underneath the session.
    pub fn mark_closed(&self) {
        let mut state = self.state.write().expect("state lock poisoned");
        if *state != SessionState::Closed {
            debug!(from = ?*state, "session closed");
            *state = SessionState::Closed;
        }
    }

    /// Validate that `method` may be sent as a request right now. The
    /// `initialize` request is reserved for the session controller, which
    /// performs its own transition before sending.
    pub fn ensure_can_request(&self, method: &Method) -> Result<(), Error> {
        if *method == Method::Initialize {
            return Err(
                Error::InvalidState("initialize is performed by the session, not sent directly".to_string())
            );
        }

        match self.current() {
            SessionState::Ready => Ok(()),
            SessionState::Closing | SessionState::Closed => Err(Error::TransportClosed),
            state =>
                Err(
                    Error::InvalidState(
                        format!("cannot send request {} in state {:?}", method, state)
                    )
                ),
        }
    }

    /// Validate that `method` may be sent as a notification right now.
    /// `notifications/initialized` is additionally allowed while the
    /// handshake is in flight.
    pub fn ensure_can_notify(&self, method: &Method) -> Result<(), Error> {
        match self.current() {
            SessionState::Ready => Ok(()),
            SessionState::Initializing if *method == Method::NotificationsInitialized => Ok(()),
            SessionState::Closing | SessionState::Closed => Err(Error::TransportClosed),
            state =>
                Err(
                    Error::InvalidState(
                        format!("cannot send notification {} in state {:?}", method, state)
                    )
                ),
        }
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}
