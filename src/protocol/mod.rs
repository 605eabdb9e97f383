//! JSON-RPC 2.0 envelope types for the Model Context Protocol (MCP).
//!
//! Every wire message carries the literal `jsonrpc: "2.0"` field and is framed
//! as a single newline-delimited JSON object. Request IDs are integers,
//! allocated monotonically per session and never reused.

use schemars::JsonSchema;
use serde::{ Deserialize, Serialize };

pub mod errors;
pub mod method;

pub use errors::{ error_codes, Error };
pub use method::Method;

/// The JSON-RPC version string carried by every message.
pub const JSONRPC_VERSION: &str = "2.0";

/// The MCP protocol revision this client speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// A JSON-RPC request that expects a response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JSONRPCRequest {
    /// The JSON-RPC version (always "2.0").
    pub jsonrpc: String,

    /// The request ID.
    pub id: i64,

    /// The method name.
    pub method: String,

    /// The request parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// A JSON-RPC notification which does not expect a response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JSONRPCNotification {
    /// The JSON-RPC version (always "2.0").
    pub jsonrpc: String,

    /// The method name.
    pub method: String,

    /// The notification parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

/// A successful JSON-RPC response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JSONRPCResponse {
    /// The JSON-RPC version (always "2.0").
    pub jsonrpc: String,

    /// The request ID this is responding to.
    pub id: i64,

    /// The raw response result. The typed request surface deserializes this
    /// into the method-specific result type.
    pub result: serde_json::Value,
}

/// A JSON-RPC error response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JSONRPCError {
    /// The JSON-RPC version (always "2.0").
    pub jsonrpc: String,

    /// The request ID this error is for.
    pub id: i64,

    /// The error details.
    pub error: JSONRPCErrorDetails,
}

/// Details of a JSON-RPC error.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JSONRPCErrorDetails {
    /// The error code.
    pub code: i32,

    /// A short description of the error.
    pub message: String,

    /// Additional information about the error. Preserved verbatim, never
    /// interpreted by the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Any JSON-RPC message type.
///
/// Variant order matters for untagged deserialization: requests carry both
/// `id` and `method`, so they must be tried before notifications (which lack
/// `id`) and responses (which lack `method`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum JSONRPCMessage {
    Request(JSONRPCRequest),
    Notification(JSONRPCNotification),
    Response(JSONRPCResponse),
    Error(JSONRPCError),
}

impl JSONRPCMessage {
    /// Build a request envelope.
    pub fn request(id: i64, method: &Method, params: Option<serde_json::Value>) -> Self {
        JSONRPCMessage::Request(JSONRPCRequest {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.as_str().to_string(),
            params,
        })
    }

    /// Build a notification envelope.
    pub fn notification(method: &Method, params: Option<serde_json::Value>) -> Self {
        JSONRPCMessage::Notification(JSONRPCNotification {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.as_str().to_string(),
            params,
        })
    }

    /// The version string this message claims.
    pub fn jsonrpc(&self) -> &str {
        match self {
            JSONRPCMessage::Request(m) => &m.jsonrpc,
            JSONRPCMessage::Notification(m) => &m.jsonrpc,
            JSONRPCMessage::Response(m) => &m.jsonrpc,
            JSONRPCMessage::Error(m) => &m.jsonrpc,
        }
    }

    /// Get the request ID if this is a request, response, or error.
    pub fn id(&self) -> Option<i64> {
        match self {
            JSONRPCMessage::Request(req) => Some(req.id),
            JSONRPCMessage::Response(resp) => Some(resp.id),
            JSONRPCMessage::Error(err) => Some(err.id),
            JSONRPCMessage::Notification(_) => None,
        }
    }

    /// Get the method name if this is a request or notification.
    pub fn method(&self) -> Option<&str> {
        match self {
            JSONRPCMessage::Request(req) => Some(&req.method),
            JSONRPCMessage::Notification(notification) => Some(&notification.method),
            JSONRPCMessage::Response(_) | JSONRPCMessage::Error(_) => None,
        }
    }
}
