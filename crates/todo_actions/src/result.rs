//! Uniform response envelope returned by every action.

use serde::{Deserialize, Serialize};

/// `{success, message?, error?, data?}` response shape.
///
/// UI code branches only on `success`/`error`; it never sees error types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            error: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    /// Success without payload.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
            data: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            data: None,
        }
    }

    /// Converts into a `Result`, using the error text (or a fallback) on failure.
    ///
    /// A successful envelope without data maps to `Err` when `T` is required;
    /// use [`ActionResult::is_success`] for payload-less actions.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err("action succeeded without data".to_string()),
            (false, _) => Err(self
                .error
                .unwrap_or_else(|| "action failed".to_string())),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl<T: Serialize> ActionResult<T> {
    /// Serializes the envelope to JSON, omitting absent fields.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
