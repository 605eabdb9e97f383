//! Error handling for the MCP client.
//!
//! One crate-wide error type. Per-request failures (server errors,
//! cancellation) reach only the originating caller; session-wide failures
//! (`TransportClosed`) fan out to every waiter when the read loop ends.

use thiserror::Error;

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    /// Parse error
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid request
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// The main error type for the MCP client library.
#[derive(Error, Debug)]
pub enum Error {
    /// The server subprocess could not be started.
    #[error("failed to spawn server process: {0}")]
    Spawn(#[source] std::io::Error),

    /// An outbound write to the server's input stream failed.
    #[error("failed to write to server: {0}")]
    Write(#[source] std::io::Error),

    /// Awaiting the server subprocess's exit failed.
    #[error("failed to await server exit: {0}")]
    Wait(#[source] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server returned a JSON-RPC error for a specific request.
    /// Code, message, and data are propagated verbatim.
    #[error("server error {code}: {message}")]
    Protocol {
        code: i32,
        message: String,
        data: Option<serde_json::Value>,
    },

    /// An operation was attempted while the session forbids it, e.g. a
    /// request before `initialize` completed.
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// The caller cancelled before the reply arrived.
    #[error("request cancelled")]
    Cancelled,

    /// The server's streams are closed, the child exited, or the read loop
    /// terminated. Terminal for the session.
    #[error("transport closed")]
    TransportClosed,

    /// An inbound frame failed to parse. Diagnostic only; never surfaced to
    /// a specific caller.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

// Clone is needed so a single terminal cause can fan out to every pending
// waiter. Source errors that are not Clone degrade to carrying their message.
impl Clone for Error {
    fn clone(&self) -> Self {
        match self {
            Error::Spawn(e) => Error::Spawn(std::io::Error::new(e.kind(), e.to_string())),
            Error::Write(e) => Error::Write(std::io::Error::new(e.kind(), e.to_string())),
            Error::Wait(e) => Error::Wait(std::io::Error::new(e.kind(), e.to_string())),
            Error::Json(e) => Error::MalformedFrame(e.to_string()),
            Error::Protocol { code, message, data } =>
                Error::Protocol {
                    code: *code,
                    message: message.clone(),
                    data: data.clone(),
                },
            Error::InvalidState(s) => Error::InvalidState(s.clone()),
            Error::Cancelled => Error::Cancelled,
            Error::TransportClosed => Error::TransportClosed,
            Error::MalformedFrame(s) => Error::MalformedFrame(s.clone()),
        }
    }
}
