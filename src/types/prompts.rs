//! Prompt-related MCP payload types.

use schemars::JsonSchema;
use serde::{ Deserialize, Serialize };
use std::collections::HashMap;

use super::{ Content, Cursor, Role };

/// A prompt or prompt template that the server offers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Prompt {
    /// The name of the prompt or prompt template.
    pub name: String,

    /// An optional description of what this prompt provides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// A list of arguments to use for templating the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<PromptArgument>>,
}

/// Describes an argument that a prompt can accept.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PromptArgument {
    /// The name of the argument.
    pub name: String,

    /// A human-readable description of the argument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether this argument must be provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// The server's response to a prompts/list request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListPromptsResult {
    /// The list of prompts.
    pub prompts: Vec<Prompt>,

    /// An opaque token representing the pagination position after the last
    /// returned result.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "nextCursor")]
    pub next_cursor: Option<Cursor>,

    /// Optional metadata for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _meta: Option<HashMap<String, serde_json::Value>>,
}

/// Parameters for a prompts/get request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetPromptParams {
    /// The name of the prompt or prompt template.
    pub name: String,

    /// Arguments to use for templating the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<HashMap<String, String>>,
}

/// The server's response to a prompts/get request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetPromptResult {
    /// The messages that make up the prompt.
    pub messages: Vec<PromptMessage>,

    /// An optional description for the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional metadata for the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _meta: Option<HashMap<String, serde_json::Value>>,
}

/// Describes a message returned as part of a prompt.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PromptMessage {
    /// The sender of the message.
    pub role: Role,

    /// The content of the message.
    pub content: Content,
}

/// Identifies a prompt for completion.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PromptReference {
    /// The type of reference (always "ref/prompt").
    #[serde(rename = "type")]
    pub type_field: String,

    /// The name of the prompt or prompt template.
    pub name: String,
}
