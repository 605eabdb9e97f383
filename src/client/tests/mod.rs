//! Client test support.
//!
//! `MockTransport` implements the transport seam over in-memory channels so
//! session tests can script a server deterministically: the test holds the
//! server end, reads the frames the session writes, and injects replies and
//! notifications.

mod session_tests;

use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{ mpsc, Mutex };
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::client::session::ClientSession;
use crate::protocol::{
    Error,
    JSONRPCError,
    JSONRPCErrorDetails,
    JSONRPCMessage,
    JSONRPCNotification,
    JSONRPCRequest,
    JSONRPCResponse,
    JSONRPC_VERSION,
};
use crate::transport::Transport;

/// In-memory transport; the paired [`MockServer`] plays the server role.
pub struct MockTransport {
    inbound: Mutex<mpsc::UnboundedReceiver<JSONRPCMessage>>,
    outbound_tx: mpsc::UnboundedSender<JSONRPCMessage>,
    closed: CancellationToken,
}

/// The server end of a [`MockTransport`] pair.
pub struct MockServer {
    inbound_tx: Option<mpsc::UnboundedSender<JSONRPCMessage>>,
    outbound_rx: mpsc::UnboundedReceiver<JSONRPCMessage>,
}

/// Route test logs through the tracing subscriber when RUST_LOG is set.
fn init_tracing() {
    let _ = tracing_subscriber
        ::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn mock_transport() -> (MockTransport, MockServer) {
    init_tracing();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

    (
        MockTransport {
            inbound: Mutex::new(inbound_rx),
            outbound_tx,
            closed: CancellationToken::new(),
        },
        MockServer {
            inbound_tx: Some(inbound_tx),
            outbound_rx,
        },
    )
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, message: &JSONRPCMessage) -> Result<(), Error> {
        self.outbound_tx.send(message.clone()).map_err(|_| Error::TransportClosed)
    }

    async fn receive(&self) -> Result<JSONRPCMessage, Error> {
        let mut inbound = self.inbound.lock().await;
        tokio::select! {
            message = inbound.recv() => message.ok_or(Error::TransportClosed),
            _ = self.closed.cancelled() => Err(Error::TransportClosed),
        }
    }

    // The read loop may be parked inside receive() holding the inbound
    // lock, so close must not take it; the token unblocks the loop instead.
    async fn close(&self) -> Result<Option<ExitStatus>, Error> {
        self.closed.cancel();
        Ok(None)
    }
}

impl MockServer {
    /// Next frame the session wrote, failing the test after a second.
    pub async fn next_frame(&mut self) -> JSONRPCMessage {
        timeout(Duration::from_secs(1), self.outbound_rx.recv()).await
            .expect("timed out waiting for a frame from the session")
            .expect("session hung up the outbound channel")
    }

    /// Next frame, asserted to be a request.
    pub async fn expect_request(&mut self) -> JSONRPCRequest {
        match self.next_frame().await {
            JSONRPCMessage::Request(request) => request,
            other => panic!("expected request, got {:?}", other),
        }
    }

    /// Next frame, asserted to be a notification.
    pub async fn expect_notification(&mut self) -> JSONRPCNotification {
        match self.next_frame().await {
            JSONRPCMessage::Notification(notification) => notification,
            other => panic!("expected notification, got {:?}", other),
        }
    }

    /// True when the session has written nothing (yet).
    pub fn no_frames_written(&mut self) -> bool {
        self.outbound_rx.try_recv().is_err()
    }

    /// Send a successful reply for `id`.
    pub fn reply(&self, id: i64, result: serde_json::Value) {
        self.inject(
            JSONRPCMessage::Response(JSONRPCResponse {
                jsonrpc: JSONRPC_VERSION.to_string(),
                id,
                result,
            })
        );
    }

    /// Send an error reply for `id`.
    pub fn reply_error(&self, id: i64, code: i32, message: &str) {
        self.inject(
            JSONRPCMessage::Error(JSONRPCError {
                jsonrpc: JSONRPC_VERSION.to_string(),
                id,
                error: JSONRPCErrorDetails {
                    code,
                    message: message.to_string(),
                    data: None,
                },
            })
        );
    }

    /// Send a server-originated notification.
    pub fn notify(&self, method: &str, params: serde_json::Value) {
        self.inject(
            JSONRPCMessage::Notification(JSONRPCNotification {
                jsonrpc: JSONRPC_VERSION.to_string(),
                method: method.to_string(),
                params: Some(params),
            })
        );
    }

    fn inject(&self, message: JSONRPCMessage) {
        self.inbound_tx
            .as_ref()
            .expect("server already hung up")
            .send(message)
            .expect("session inbound channel closed");
    }

    /// Close the server's output stream, as a dying subprocess would.
    pub fn hang_up(&mut self) {
        self.inbound_tx = None;
    }
}

/// A canned initialize result the mock server hands out.
pub fn initialize_result_json() -> serde_json::Value {
    serde_json::json!({
        "protocolVersion": "2024-11-05",
        "serverInfo": { "name": "mock", "version": "1.0" },
        "capabilities": {}
    })
}

/// Drive a fresh session through the handshake against a mock server.
pub async fn initialized_session() -> (Arc<ClientSession>, MockServer) {
    let (transport, mut server) = mock_transport();
    let session = Arc::new(ClientSession::new(transport));

    let handshake = {
        let session = session.clone();
        tokio::spawn(async move { session.initialize().await })
    };

    let request = server.expect_request().await;
    assert_eq!(request.method, "initialize");
    server.reply(request.id, initialize_result_json());

    let notification = server.expect_notification().await;
    assert_eq!(notification.method, "notifications/initialized");

    handshake.await.unwrap().expect("handshake failed");
    (session, server)
}
