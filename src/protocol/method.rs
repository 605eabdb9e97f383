//! Type-safe definitions for the MCP method identifiers used by the client.

use schemars::JsonSchema;
use serde::{ Deserialize, Serialize };
use std::fmt::{ self, Display };

/// The MCP methods a client can send, plus the notification methods a server
/// may send back. Inbound notifications keep their raw method string so
/// unknown methods still reach observers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum Method {
    /// Core initialization
    #[serde(rename = "initialize")]
    Initialize,

    /// Simple ping to check connection
    #[serde(rename = "ping")]
    Ping,

    /// Notification that initialization is complete
    #[serde(rename = "notifications/initialized")]
    NotificationsInitialized,

    /// Progress update notification
    #[serde(rename = "notifications/progress")]
    NotificationsProgress,

    /// Request cancellation notification
    #[serde(rename = "notifications/cancelled")]
    NotificationsCancelled,

    /// List available resources
    #[serde(rename = "resources/list")]
    ResourcesList,

    /// List resource templates
    #[serde(rename = "resources/templates/list")]
    ResourcesTemplatesList,

    /// Read a specific resource
    #[serde(rename = "resources/read")]
    ResourcesRead,

    /// Subscribe to resource updates
    #[serde(rename = "resources/subscribe")]
    ResourcesSubscribe,

    /// Unsubscribe from resource updates
    #[serde(rename = "resources/unsubscribe")]
    ResourcesUnsubscribe,

    /// Notification of resource list changes
    #[serde(rename = "notifications/resources/list_changed")]
    NotificationsResourcesListChanged,

    /// Notification of resource updates
    #[serde(rename = "notifications/resources/updated")]
    NotificationsResourcesUpdated,

    /// List available prompts
    #[serde(rename = "prompts/list")]
    PromptsList,

    /// Get a specific prompt
    #[serde(rename = "prompts/get")]
    PromptsGet,

    /// Notification of prompt list changes
    #[serde(rename = "notifications/prompts/list_changed")]
    NotificationsPromptsListChanged,

    /// List available tools
    #[serde(rename = "tools/list")]
    ToolsList,

    /// Call a tool
    #[serde(rename = "tools/call")]
    ToolsCall,

    /// Notification of tool list changes
    #[serde(rename = "notifications/tools/list_changed")]
    NotificationsToolsListChanged,

    /// Set logging level
    #[serde(rename = "logging/setLevel")]
    LoggingSetLevel,

    /// Logging message notification
    #[serde(rename = "notifications/logging/message")]
    NotificationsLoggingMessage,

    /// Get completion options
    #[serde(rename = "completion/complete")]
    CompletionComplete,
}

impl Method {
    /// Get the wire representation of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::Ping => "ping",
            Method::NotificationsInitialized => "notifications/initialized",
            Method::NotificationsProgress => "notifications/progress",
            Method::NotificationsCancelled => "notifications/cancelled",
            Method::ResourcesList => "resources/list",
            Method::ResourcesTemplatesList => "resources/templates/list",
            Method::ResourcesRead => "resources/read",
            Method::ResourcesSubscribe => "resources/subscribe",
            Method::ResourcesUnsubscribe => "resources/unsubscribe",
            Method::NotificationsResourcesListChanged => "notifications/resources/list_changed",
            Method::NotificationsResourcesUpdated => "notifications/resources/updated",
            Method::PromptsList => "prompts/list",
            Method::PromptsGet => "prompts/get",
            Method::NotificationsPromptsListChanged => "notifications/prompts/list_changed",
            Method::ToolsList => "tools/list",
            Method::ToolsCall => "tools/call",
            Method::NotificationsToolsListChanged => "notifications/tools/list_changed",
            Method::LoggingSetLevel => "logging/setLevel",
            Method::NotificationsLoggingMessage => "notifications/logging/message",
            Method::CompletionComplete => "completion/complete",
        }
    }

    /// Whether this method is a notification (sent without an id).
    pub fn is_notification(&self) -> bool {
        self.as_str().starts_with("notifications/")
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
