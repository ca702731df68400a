//! Remote plugin protocol types
//!
//! Plugins communicate via JSON messages over stdin/stdout, one request and
//! one response per invocation. Each plugin must support the `--manifest`
//! flag to declare its capabilities.

use serde::{Deserialize, Serialize};
use serde_json::json;

/// Fetch a workspace document
pub const OP_GET: &str = "get";

/// Store a workspace document
pub const OP_PUT: &str = "put";

/// Check connectivity and credentials
pub const OP_TEST: &str = "test";

/// Plugin manifest declaring capabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginManifest {
    /// Plugin name (e.g., "c4-remote-structurizr")
    pub name: String,

    /// Plugin version
    pub version: String,

    /// Human-readable description
    pub description: String,

    /// Supported operations
    pub operations: Vec<String>,
}

impl PluginManifest {
    pub fn supports(&self, operation: &str) -> bool {
        self.operations.iter().any(|op| op == operation)
    }
}

/// One operation for a plugin, written as a single JSON line on its stdin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginRequest {
    pub operation: String,

    /// `workspace_id`, plus `workspace` for puts
    pub params: serde_json::Value,
}

impl PluginRequest {
    pub fn new(operation: impl Into<String>, params: impl Into<serde_json::Value>) -> Self {
        Self {
            operation: operation.into(),
            params: params.into(),
        }
    }

    pub fn get(workspace_id: i64) -> Self {
        Self::new(OP_GET, json!({ "workspace_id": workspace_id }))
    }

    /// `workspace` is the exchange document as a JSON value, not as text
    pub fn put(workspace_id: i64, workspace: serde_json::Value) -> Self {
        Self::new(
            OP_PUT,
            json!({ "workspace_id": workspace_id, "workspace": workspace }),
        )
    }

    pub fn test() -> Self {
        Self::new(OP_TEST, json!({}))
    }
}

/// A response from a plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginResponse {
    /// Whether the operation succeeded
    pub success: bool,

    /// Result data (if success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Error message (if failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PluginResponse {
    pub fn success(data: impl Into<serde_json::Value>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Converts a failed response into an error naming the operation
    pub fn into_result(self, operation: &str) -> anyhow::Result<Option<serde_json::Value>> {
        if !self.success {
            anyhow::bail!(
                "Remote {} failed: {}",
                operation,
                self.error.unwrap_or_else(|| "Unknown error".to_string())
            );
        }
        Ok(self.data.filter(|d| !d.is_null()))
    }
}
