//! MCP client session.
//!
//! Owns the transport, the pending-request registry, the notification
//! router, and the lifecycle state machine. A single read-loop task drains
//! the transport for the session's lifetime, correlating responses to their
//! waiters and fanning notifications out to observers. The session enforces
//! the MCP handshake: `initialize` first, then `notifications/initialized`,
//! then ordinary traffic.

use std::process::ExitStatus;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{ Mutex, RwLock };
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{ debug, error, info, warn };
use uuid::Uuid;

use crate::client::lifecycle::{ LifecycleManager, SessionState };
use crate::client::notification::NotificationRouter;
use crate::client::request::RequestManager;
use crate::protocol::{ Error, JSONRPCMessage, Method, PROTOCOL_VERSION };
use crate::transport::Transport;
use crate::types::{
    CallToolParams,
    CallToolResult,
    ClientCapabilities,
    CompleteParams,
    CompleteResult,
    GetPromptParams,
    GetPromptResult,
    Implementation,
    InitializeParams,
    InitializeResult,
    ListPromptsResult,
    ListResourceTemplatesResult,
    ListResourcesResult,
    ListToolsResult,
    PaginatedParams,
    ReadResourceParams,
    ReadResourceResult,
    SetLevelParams,
    SubscribeParams,
};

/// Configuration for a client session.
#[derive(Debug, Clone)]
pub struct ClientSessionConfig {
    /// Client information sent in the initialize request.
    pub client_info: Implementation,

    /// Capabilities advertised in the initialize request.
    pub capabilities: ClientCapabilities,
}

impl Default for ClientSessionConfig {
    fn default() -> Self {
        Self {
            client_info: Implementation {
                name: "mcp-client".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: ClientCapabilities::default(),
        }
    }
}

/// A connected MCP client session.
///
/// Created over a transport (usually [`crate::transport::stdio::StdioTransport`]);
/// call [`initialize`](Self::initialize) before anything else, and
/// [`close`](Self::close) to shut the server down cleanly.
pub struct ClientSession {
    /// Collision-resistant session identity, carried in log output.
    session_id: Uuid,
    transport: Arc<dyn Transport>,
    requests: Arc<RequestManager>,
    notifications: Arc<NotificationRouter>,
    lifecycle: Arc<LifecycleManager>,
    config: ClientSessionConfig,
    /// Initialize result from the server, populated by the handshake.
    server_info: RwLock<Option<InitializeResult>>,
    /// The read-loop task, joined during close.
    read_task: Mutex<Option<JoinHandle<()>>>,
    /// Recorded close outcome. `Some` once the first close completes; later
    /// closes return it unchanged.
    recorded_exit: Mutex<Option<Option<ExitStatus>>>,
}

impl ClientSession {
    /// Create a session over `transport` with default configuration and
    /// start its read loop.
    pub fn new<T: Transport + 'static>(transport: T) -> Self {
        Self::with_config(transport, ClientSessionConfig::default())
    }

    /// Create a session with explicit configuration.
    pub fn with_config<T: Transport + 'static>(
        transport: T,
        config: ClientSessionConfig
    ) -> Self {
        let session_id = Uuid::new_v4();
        let transport: Arc<dyn Transport> = Arc::new(transport);
        let requests = Arc::new(RequestManager::new());
        let notifications = Arc::new(NotificationRouter::new());
        let lifecycle = Arc::new(LifecycleManager::new());

        let read_task = spawn_read_loop(
            session_id,
            transport.clone(),
            requests.clone(),
            notifications.clone(),
            lifecycle.clone()
        );

        debug!(session = %session_id, "client session created");

        Self {
            session_id,
            transport,
            requests,
            notifications,
            lifecycle,
            config,
            server_info: RwLock::new(None),
            read_task: Mutex::new(Some(read_task)),
            recorded_exit: Mutex::new(None),
        }
    }

    /// Create a builder for customizing the session configuration.
    pub fn builder<T: Transport + 'static>(transport: T) -> ClientSessionBuilder {
        ClientSessionBuilder {
            transport: Arc::new(transport),
            config: ClientSessionConfig::default(),
        }
    }

    /// This session's unique identity.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.lifecycle.current()
    }

    /// The server's initialize result, once the handshake has completed.
    pub async fn server_info(&self) -> Option<InitializeResult> {
        self.server_info.read().await.clone()
    }

    /// Perform the MCP handshake with parameters built from the session
    /// configuration.
    pub async fn initialize(&self) -> Result<InitializeResult, Error> {
        let params = InitializeParams {
            protocol_version: PROTOCOL_VERSION.to_string(),
            client_info: self.config.client_info.clone(),
            capabilities: self.config.capabilities.clone(),
        };
        self.initialize_with(params).await
    }

    /// Perform the MCP handshake: send `initialize`, await the server's
    /// reply, then send `notifications/initialized`. Allowed exactly once,
    /// on a fresh session. Any failure closes the session; the subprocess
    /// is not reused.
    pub async fn initialize_with(&self, params: InitializeParams) -> Result<InitializeResult, Error> {
        self.lifecycle.transition_to(SessionState::Initializing)?;
        info!(session = %self.session_id, "initializing MCP session");

        match self.perform_handshake(params).await {
            Ok(result) => {
                *self.server_info.write().await = Some(result.clone());
                self.lifecycle.transition_to(SessionState::Ready)?;
                info!(
                    session = %self.session_id,
                    server = %result.server_info.name,
                    version = %result.server_info.version,
                    "MCP session ready"
                );
                Ok(result)
            }
            Err(e) => {
                error!(session = %self.session_id, "initialization failed: {}", e);
                self.lifecycle.mark_closed();
                Err(e)
            }
        }
    }

    async fn perform_handshake(&self, params: InitializeParams) -> Result<InitializeResult, Error> {
        let reply = self.request_internal(
            &Method::Initialize,
            serde_json::to_value(&params)?
        ).await?;
        let result: InitializeResult = serde_json::from_value(reply)?;

        self.notify_internal(&Method::NotificationsInitialized, serde_json::Value::Null).await?;

        Ok(result)
    }

    /// Send a request and await its raw result.
    ///
    /// Allowed only once the session is Ready; `initialize` is reserved for
    /// the session itself. Cancellation is the caller's: dropping the
    /// returned future (losing a `select!` race, a `timeout`) cancels the
    /// pending slot, and a reply that arrives afterwards is discarded as
    /// unsolicited. The session imposes no timeout of its own.
    pub async fn send_request<P: Serialize>(
        &self,
        method: Method,
        params: P
    ) -> Result<serde_json::Value, Error> {
        self.lifecycle.ensure_can_request(&method)?;
        self.request_internal(&method, serde_json::to_value(params)?).await
    }

    /// Like [`send_request`](Self::send_request), returning
    /// `Error::Cancelled` promptly when `cancel` fires first.
    pub async fn send_request_cancellable<P: Serialize>(
        &self,
        method: Method,
        params: P,
        cancel: &CancellationToken
    ) -> Result<serde_json::Value, Error> {
        self.lifecycle.ensure_can_request(&method)?;
        let request = self.request_internal(&method, serde_json::to_value(params)?);
        tokio::select! {
            result = request => result,
            _ = cancel.cancelled() => Err(Error::Cancelled),
        }
    }

    /// Send a one-way notification. Allowed when Ready, or during the
    /// handshake for `notifications/initialized` only.
    pub async fn send_notification<P: Serialize>(
        &self,
        method: Method,
        params: P
    ) -> Result<(), Error> {
        self.lifecycle.ensure_can_notify(&method)?;
        self.notify_internal(&method, serde_json::to_value(params)?).await
    }

    /// Register an observer invoked for every inbound notification, in
    /// arrival order. Observers run on independent tasks and live for the
    /// session.
    pub async fn subscribe_notifications<F, Fut>(&self, observer: F)
        where
            F: Fn(crate::protocol::JSONRPCNotification) -> Fut + Send + Sync + 'static,
            Fut: std::future::Future<Output = Result<(), Error>> + Send + 'static
    {
        self.notifications.subscribe(observer).await;
    }

    /// Close the session: stop accepting traffic, abort every pending
    /// request with `TransportClosed`, close the child's input, await its
    /// exit, and drain the read loop. Idempotent; later calls return the
    /// recorded exit status.
    pub async fn close(&self) -> Result<Option<ExitStatus>, Error> {
        let mut recorded = self.recorded_exit.lock().await;
        if let Some(status) = *recorded {
            debug!(session = %self.session_id, "close called again, returning recorded status");
            return Ok(status);
        }

        info!(session = %self.session_id, "closing MCP session");
        // Already-Closed sessions (read loop died first) skip the Closing
        // hop but still reap the child below.
        let _ = self.lifecycle.transition_to(SessionState::Closing);

        self.requests.abort_all(&Error::TransportClosed);

        let status = self.transport.close().await?;

        if let Some(task) = self.read_task.lock().await.take() {
            let _ = task.await;
        }

        self.lifecycle.mark_closed();
        *recorded = Some(status);
        debug!(session = %self.session_id, code = ?status.and_then(|s| s.code()), "session closed");
        Ok(status)
    }

    // Sends a request frame and awaits the reply without a state gate; the
    // public paths gate first, the handshake transitions first.
    async fn request_internal(
        &self,
        method: &Method,
        params: serde_json::Value
    ) -> Result<serde_json::Value, Error> {
        let id = self.requests.next_id();
        let rx = self.requests.register(id);
        let guard = PendingGuard::new(self.requests.clone(), id);

        let message = JSONRPCMessage::request(id, method, Some(params));
        debug!(session = %self.session_id, id, %method, "sending request");
        self.transport.send(&message).await?;

        let outcome = rx.await;
        guard.disarm();

        match outcome {
            Ok(outcome) => outcome,
            // The slot vanished without a delivery; the registry is gone.
            Err(_) => Err(Error::TransportClosed),
        }
    }

    async fn notify_internal(
        &self,
        method: &Method,
        params: serde_json::Value
    ) -> Result<(), Error> {
        let message = JSONRPCMessage::notification(method, Some(params));
        debug!(session = %self.session_id, %method, "sending notification");
        self.transport.send(&message).await
    }

    async fn typed_request<P: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        params: P
    ) -> Result<R, Error> {
        let reply = self.send_request(method, params).await?;
        Ok(serde_json::from_value(reply)?)
    }

    // ---- Typed request surface -------------------------------------------

    /// Check that the server is alive.
    pub async fn ping(&self) -> Result<(), Error> {
        self.send_request(Method::Ping, serde_json::Value::Null).await?;
        Ok(())
    }

    /// List the server's resources.
    pub async fn list_resources(
        &self,
        params: Option<PaginatedParams>
    ) -> Result<ListResourcesResult, Error> {
        self.typed_request(Method::ResourcesList, params.unwrap_or_default()).await
    }

    /// List the server's resource templates.
    pub async fn list_resource_templates(
        &self,
        params: Option<PaginatedParams>
    ) -> Result<ListResourceTemplatesResult, Error> {
        self.typed_request(Method::ResourcesTemplatesList, params.unwrap_or_default()).await
    }

    /// Read a specific resource.
    pub async fn read_resource(
        &self,
        params: ReadResourceParams
    ) -> Result<ReadResourceResult, Error> {
        self.typed_request(Method::ResourcesRead, params).await
    }

    /// Request update notifications for a resource.
    pub async fn subscribe_resource(&self, params: SubscribeParams) -> Result<(), Error> {
        self.send_request(Method::ResourcesSubscribe, params).await?;
        Ok(())
    }

    /// Cancel update notifications for a resource.
    pub async fn unsubscribe_resource(&self, params: SubscribeParams) -> Result<(), Error> {
        self.send_request(Method::ResourcesUnsubscribe, params).await?;
        Ok(())
    }

    /// List the server's prompts.
    pub async fn list_prompts(
        &self,
        params: Option<PaginatedParams>
    ) -> Result<ListPromptsResult, Error> {
        self.typed_request(Method::PromptsList, params.unwrap_or_default()).await
    }

    /// Fetch a prompt, optionally templated with arguments.
    pub async fn get_prompt(&self, params: GetPromptParams) -> Result<GetPromptResult, Error> {
        self.typed_request(Method::PromptsGet, params).await
    }

    /// List the server's tools.
    pub async fn list_tools(
        &self,
        params: Option<PaginatedParams>
    ) -> Result<ListToolsResult, Error> {
        self.typed_request(Method::ToolsList, params.unwrap_or_default()).await
    }

    /// Invoke a tool on the server.
    pub async fn call_tool(&self, params: CallToolParams) -> Result<CallToolResult, Error> {
        self.typed_request(Method::ToolsCall, params).await
    }

    /// Adjust the server's logging level.
    pub async fn set_level(&self, params: SetLevelParams) -> Result<(), Error> {
        self.send_request(Method::LoggingSetLevel, params).await?;
        Ok(())
    }

    /// Request completion options for a prompt or resource argument.
    pub async fn complete(&self, params: CompleteParams) -> Result<CompleteResult, Error> {
        self.typed_request(Method::CompletionComplete, params).await
    }
}

/// Builder for [`ClientSession`] instances.
pub struct ClientSessionBuilder {
    transport: Arc<dyn Transport>,
    config: ClientSessionConfig,
}

impl ClientSessionBuilder {
    /// Set the client name sent in the initialize request.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.client_info.name = name.into();
        self
    }

    /// Set the client version sent in the initialize request.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.client_info.version = version.into();
        self
    }

    /// Set the capabilities advertised in the initialize request.
    pub fn capabilities(mut self, capabilities: ClientCapabilities) -> Self {
        self.config.capabilities = capabilities;
        self
    }

    /// Build the session and start its read loop. Call
    /// [`ClientSession::initialize`] before using it.
    pub fn build(self) -> ClientSession {
        let session_id = Uuid::new_v4();
        let requests = Arc::new(RequestManager::new());
        let notifications = Arc::new(NotificationRouter::new());
        let lifecycle = Arc::new(LifecycleManager::new());

        let read_task = spawn_read_loop(
            session_id,
            self.transport.clone(),
            requests.clone(),
            notifications.clone(),
            lifecycle.clone()
        );

        ClientSession {
            session_id,
            transport: self.transport,
            requests,
            notifications,
            lifecycle,
            config: self.config,
            server_info: RwLock::new(None),
            read_task: Mutex::new(Some(read_task)),
            recorded_exit: Mutex::new(None),
        }
    }
}

/// Removes the pending slot if the caller goes away before the reply lands,
/// so a dropped `send_request` future leaves nothing behind.
struct PendingGuard {
    requests: Arc<RequestManager>,
    id: i64,
    armed: bool,
}

impl PendingGuard {
    fn new(requests: Arc<RequestManager>, id: i64) -> Self {
        Self { requests, id, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.armed {
            self.requests.cancel(self.id);
        }
    }
}

/// The read loop: sole consumer of the transport's inbound stream and sole
/// writer on the completion path. When it unwinds it aborts every pending
/// slot, so the session never leaves a waiter stuck.
fn spawn_read_loop(
    session_id: Uuid,
    transport: Arc<dyn Transport>,
    requests: Arc<RequestManager>,
    notifications: Arc<NotificationRouter>,
    lifecycle: Arc<LifecycleManager>
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match transport.receive().await {
                Ok(message) => {
                    dispatch_message(session_id, message, &requests, &notifications).await;
                }
                Err(e) => {
                    debug!(session = %session_id, "read loop ending: {}", e);
                    break;
                }
            }
        }

        requests.abort_all(&Error::TransportClosed);
        lifecycle.mark_closed();
        debug!(session = %session_id, "read loop exited");
    })
}

async fn dispatch_message(
    session_id: Uuid,
    message: JSONRPCMessage,
    requests: &RequestManager,
    notifications: &NotificationRouter
) {
    match message {
        JSONRPCMessage::Response(response) => {
            let id = response.id;
            if !requests.complete(id, Ok(response.result)) {
                warn!(session = %session_id, id, "unsolicited response");
            }
        }
        JSONRPCMessage::Error(reply) => {
            let id = reply.id;
            let outcome = Err(Error::Protocol {
                code: reply.error.code,
                message: reply.error.message,
                data: reply.error.data,
            });
            if !requests.complete(id, outcome) {
                warn!(session = %session_id, id, "unsolicited error response");
            }
        }
        JSONRPCMessage::Notification(notification) => {
            debug!(session = %session_id, method = %notification.method, "inbound notification");
            notifications.dispatch(notification).await;
        }
        JSONRPCMessage::Request(request) => {
            // Server-to-client requests (sampling, roots) are not part of
            // this client's surface.
            warn!(
                session = %session_id,
                id = request.id,
                method = %request.method,
                "ignoring server-to-client request"
            );
        }
    }
}
