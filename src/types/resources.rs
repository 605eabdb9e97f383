//! Resource-related MCP payload types.

use schemars::JsonSchema;
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;

use super::Cursor;

/// A known resource that the server is capable of reading.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Resource {
    /// The URI of this resource.
    pub uri: String,

    /// A human-readable name for this resource.
    pub name: String,

    /// A description of what this resource represents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The MIME type of this resource, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,

    /// The size of the raw resource content, in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

/// A template description for resources available on the server.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourceTemplate {
    /// A URI template (RFC 6570) that can be used to construct resource URIs.
    #[serde(rename = "uriTemplate")]
    pub uri_template: String,

    /// A human-readable name for the type of resource this template refers to.
    pub name: String,

    /// A description of what this template is for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The MIME type for all resources that match this template, if uniform.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
}

/// The server's response to a resources/list request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListResourcesResult {
    /// The list of resources.
    pub resources: Vec<Resource>,

    /// An opaque token representing the pagination position after the last
    /// returned result.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<Cursor>,

    /// Optional metadata for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _meta: Option<HashMap<String, serde_json::Value>>,
}

/// The server's response to a resources/templates/list request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListResourceTemplatesResult {
    /// The list of resource templates.
    #[serde(rename = "resourceTemplates")]
    pub resource_templates: Vec<ResourceTemplate>,

    /// An opaque token representing the pagination position after the last
    /// returned result.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<Cursor>,

    /// Optional metadata for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _meta: Option<HashMap<String, serde_json::Value>>,
}

/// Parameters for a resources/read request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadResourceParams {
    /// The URI of the resource to read.
    pub uri: String,
}

/// The server's response to a resources/read request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadResourceResult {
    /// The contents of the resource.
    pub contents: Vec<ResourceContents>,

    /// Optional metadata for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _meta: Option<HashMap<String, serde_json::Value>>,
}

/// The contents of a resource, which can be either text or binary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ResourceContents {
    Text(TextResourceContents),
    Blob(BlobResourceContents),
}

/// The contents of a resource that is text-based.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextResourceContents {
    /// The URI of this resource.
    pub uri: String,

    /// The text of the item.
    pub text: String,

    /// The MIME type of this resource, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
}

/// The contents of a resource that is binary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BlobResourceContents {
    /// The URI of this resource.
    pub uri: String,

    /// A base64-encoded string representing the binary data of the item.
    pub blob: String,

    /// The MIME type of this resource, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
}

/// Parameters for resources/subscribe and resources/unsubscribe requests.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubscribeParams {
    /// The URI of the resource to (un)subscribe.
    pub uri: String,
}

/// Identifies a resource for completion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourceReference {
    /// The type of reference (always "ref/resource").
    #[serde(rename = "type")]
    pub type_field: String,

    /// The URI or URI template of the resource.
    pub uri: String,
}
