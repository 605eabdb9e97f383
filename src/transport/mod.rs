//! Transport layer for MCP communication.
//!
//! The `Transport` trait is the seam between the session and the wire. The
//! shipped implementation is [`stdio::StdioTransport`], which runs the server
//! as a local subprocess; tests provide in-memory mocks behind the same
//! trait.

pub mod codec;
pub mod stdio;

use async_trait::async_trait;
use std::process::ExitStatus;

use crate::protocol::{ Error, JSONRPCMessage };

/// A bidirectional, message-oriented channel to an MCP server.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one message. The whole frame is written atomically with respect
    /// to other `send` calls.
    async fn send(&self, message: &JSONRPCMessage) -> Result<(), Error>;

    /// Receive the next inbound message. Returns `Error::TransportClosed`
    /// once the peer's output has ended.
    async fn receive(&self) -> Result<JSONRPCMessage, Error>;

    /// Close the channel and release its resources. Subprocess transports
    /// return the child's exit status; others return `None`.
    async fn close(&self) -> Result<Option<ExitStatus>, Error>;
}
