//! Tool-related MCP payload types.

use schemars::JsonSchema;
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;

use super::{ Content, Cursor };

/// Definition for a tool the client can call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Tool {
    /// The name of the tool.
    pub name: String,

    /// A JSON Schema object defining the expected parameters for the tool.
    #[serde(rename = "inputSchema")]
    pub input_schema: ToolInputSchema,

    /// A human-readable description of the tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A JSON Schema object defining the expected parameters for a tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolInputSchema {
    /// The type of the input (always "object").
    #[serde(rename = "type")]
    pub type_field: String,

    /// The properties of the object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, serde_json::Value>>,

    /// The required properties of the object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

/// The server's response to a tools/list request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListToolsResult {
    /// The list of tools.
    pub tools: Vec<Tool>,

    /// An opaque token representing the pagination position after the last
    /// returned result.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<Cursor>,

    /// Optional metadata for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _meta: Option<HashMap<String, serde_json::Value>>,
}

/// Parameters for a tools/call request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CallToolParams {
    /// The name of the tool to call.
    pub name: String,

    /// The arguments to pass to the tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<HashMap<String, serde_json::Value>>,
}

/// The server's response to a tool call.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CallToolResult {
    /// The content returned by the tool.
    pub content: Vec<Content>,

    /// Whether the tool call ended in an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "isError")]
    pub is_error: Option<bool>,

    /// Optional metadata for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _meta: Option<HashMap<String, serde_json::Value>>,
}
