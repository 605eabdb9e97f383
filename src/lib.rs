//! MCP client library.
//!
//! This crate provides a Rust client for the Model Context Protocol (MCP),
//! speaking JSON-RPC 2.0 to a capability-provider server over newline-
//! delimited frames. The shipped transport runs the server as a local
//! subprocess and owns its standard streams; sessions correlate concurrent
//! requests by id, fan server notifications out to observers, and enforce
//! the MCP initialization handshake.
//!
//! ```no_run
//! # async fn run() -> Result<(), mcp_client::Error> {
//! let session = mcp_client::connect_stdio("mcp-server", &["--flag"], &[]).await?;
//! let tools = session.list_tools(None).await?;
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::{ ClientSession, ClientSessionBuilder, ClientSessionConfig, SessionState };
pub use protocol::{ Error, Method };
pub use transport::stdio::StdioTransport;
pub use transport::Transport;

/// Connect to an MCP server over the provided transport and perform the
/// initialization handshake.
pub async fn connect<T: Transport + 'static>(transport: T) -> Result<ClientSession, Error> {
    let session = ClientSession::new(transport);
    session.initialize().await?;
    Ok(session)
}

/// Spawn `command [args...]` as an MCP server subprocess, connect over its
/// standard streams, and perform the initialization handshake. `env`
/// overlays the inherited parent environment (later entries win).
pub async fn connect_stdio(
    command: &str,
    args: &[&str],
    env: &[(&str, &str)]
) -> Result<ClientSession, Error> {
    let transport = StdioTransport::spawn(command, args, env)?;
    connect(transport).await
}
