use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A skill currently installed in a target's skills directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledSkill {
    pub name: String,
    pub path: PathBuf,
}

/// Result envelope exchanged with an installer backend.
///
/// Mirrors the `{success, data?, error?, message?}` shape written to stdout
/// by installer scripts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub success: bool,
    /// Payload; older installer scripts report listings under `skills`.
    #[serde(default, alias = "skills", skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DispatchResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Turn a `success: false` envelope into a `DispatchFailure`.
    pub fn into_result(self) -> crate::Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(crate::RouterError::DispatchFailure(
                self.error.unwrap_or_else(|| "Unknown error".into()),
            ))
        }
    }
}
