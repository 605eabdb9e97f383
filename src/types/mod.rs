//! Typed MCP payloads exchanged by the client.
//!
//! These mirror the MCP schema definitions. The transport layer treats them
//! as opaque `serde_json::Value`s; the typed request surface serializes
//! params and deserializes results through these types.

use schemars::JsonSchema;
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;

pub mod prompts;
pub mod resources;
pub mod tools;

pub use prompts::*;
pub use resources::*;
pub use tools::*;

/// Describes the name and version of an MCP implementation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Implementation {
    /// The name of the implementation.
    pub name: String,

    /// The version of the implementation.
    pub version: String,
}

/// Capabilities a client may support.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ClientCapabilities {
    /// Present if the client supports sampling from an LLM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling: Option<HashMap<String, serde_json::Value>>,

    /// Present if the client supports listing roots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roots: Option<RootsCapability>,

    /// Experimental, non-standard capabilities that the client supports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<HashMap<String, serde_json::Value>>,
}

/// Roots capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RootsCapability {
    /// Whether the client supports notifications for changes to the roots list.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "listChanged")]
    pub list_changed: Option<bool>,
}

/// Capabilities that a server may support.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ServerCapabilities {
    /// Present if the server offers any resources to read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesCapability>,

    /// Present if the server offers any prompt templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptsCapability>,

    /// Present if the server offers any tools to call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,

    /// Present if the server supports sending log messages to the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<HashMap<String, serde_json::Value>>,

    /// Experimental, non-standard capabilities that the server supports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental: Option<HashMap<String, serde_json::Value>>,
}

/// Resources capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourcesCapability {
    /// Whether this server supports subscribing to resource updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<bool>,

    /// Whether this server supports notifications for changes to the resource list.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "listChanged")]
    pub list_changed: Option<bool>,
}

/// Prompts capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PromptsCapability {
    /// Whether this server supports notifications for changes to the prompt list.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "listChanged")]
    pub list_changed: Option<bool>,
}

/// Tools capability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolsCapability {
    /// Whether this server supports notifications for changes to the tool list.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "listChanged")]
    pub list_changed: Option<bool>,
}

/// Initialize request parameters.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InitializeParams {
    /// The latest version of the Model Context Protocol that the client supports.
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,

    /// Information about the client.
    #[serde(rename = "clientInfo")]
    pub client_info: Implementation,

    /// The client's capabilities. Always present on the wire.
    pub capabilities: ClientCapabilities,
}

/// After receiving an initialize request from the client, the server sends
/// this response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InitializeResult {
    /// The version of the Model Context Protocol that the server wants to use.
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,

    /// Information about the server.
    #[serde(rename = "serverInfo")]
    pub server_info: Implementation,

    /// The server's capabilities.
    pub capabilities: ServerCapabilities,

    /// Instructions describing how to use the server and its features.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Optional metadata for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _meta: Option<HashMap<String, serde_json::Value>>,
}

/// An opaque token used to represent a cursor for pagination.
pub type Cursor = String;

/// Parameters for paginated list requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct PaginatedParams {
    /// An opaque token representing the current pagination position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Cursor>,
}

/// The sender or recipient of messages and data in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

/// Text provided to or from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextContent {
    /// The type of content (always "text").
    #[serde(rename = "type")]
    pub type_field: String,

    /// The text content of the message.
    pub text: String,
}

/// An image provided to or from an LLM.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImageContent {
    /// The type of content (always "image").
    #[serde(rename = "type")]
    pub type_field: String,

    /// The base64-encoded image data.
    pub data: String,

    /// The MIME type of the image.
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// The contents of a resource, embedded into a prompt or tool call result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmbeddedResource {
    /// The type of content (always "resource").
    #[serde(rename = "type")]
    pub type_field: String,

    /// The resource content.
    pub resource: ResourceContents,
}

/// Content that can be included in messages.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Content {
    Text(TextContent),
    Image(ImageContent),
    Resource(EmbeddedResource),
}

/// The severity of a log message, based on RFC-5424 syslog severities.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

/// Parameters for a logging/setLevel request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetLevelParams {
    /// The level of logging the client wants to receive from the server.
    pub level: LoggingLevel,
}

/// Parameters for a completion/complete request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompleteParams {
    /// The reference to complete against.
    #[serde(rename = "ref")]
    pub ref_: Reference,

    /// The argument's information.
    pub argument: CompleteArgument,
}

/// The argument information for completion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompleteArgument {
    /// The name of the argument.
    pub name: String,

    /// The value of the argument to use for completion matching.
    pub value: String,
}

/// A reference for completion, either a prompt or resource.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Reference {
    Prompt(PromptReference),
    Resource(ResourceReference),
}

/// The server's response to a completion/complete request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompleteResult {
    /// The completion information.
    pub completion: CompletionInfo,

    /// Optional metadata for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _meta: Option<HashMap<String, serde_json::Value>>,
}

/// Completion information.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompletionInfo {
    /// An array of completion values.
    pub values: Vec<String>,

    /// The total number of completion options available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,

    /// Indicates whether there are additional completion options.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "hasMore")]
    pub has_more: Option<bool>,
}
