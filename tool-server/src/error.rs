//! Translates internal errors into the wire `{ code, message, details }`
//! shape every tool response uses on failure (`spec.md` §6, §7).

use serde::Serialize;
use serde_json::Value;

/// A tool-invocation failure ready to serialise onto the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ToolError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolError {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into(), details: None }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// An unrecognised `tool_name`.
    #[must_use]
    pub fn unknown_tool(tool_name: &str) -> Self {
        Self::new("unknown_tool", format!("no tool named '{tool_name}'"))
    }

    /// A required parameter was missing or had the wrong type.
    #[must_use]
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::new("bad_params", message.into())
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for ToolError {}

impl From<reasoning_core::Error> for ToolError {
    fn from(err: reasoning_core::Error) -> Self {
        use reasoning_core::Error as E;
        let code = match &err {
            E::Validation(_) => "validation_error",
            E::NotFound(_) => "not_found",
            E::ConflictingWrite(_) => "conflicting_write",
            E::ExternalUnavailable(_) => "external_unavailable",
            E::Timeout(_) => "timeout",
            E::Cancelled => "cancelled",
            E::InternalInvariant(_) => "internal_invariant",
            E::Serialization(_) => "serialization_error",
            E::Configuration(_) => "configuration_error",
            E::Io(_) => "io_error",
            E::Storage(_) => "storage_error",
        };
        Self::new(code, err.to_string())
    }
}

impl From<anyhow::Error> for ToolError {
    fn from(err: anyhow::Error) -> Self {
        Self::new("internal_error", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_validation_errors_to_a_stable_code() {
        let err: ToolError = reasoning_core::Error::Validation("bad input".into()).into();
        assert_eq!(err.code, "validation_error");
    }

    #[test]
    fn maps_not_found_to_a_stable_code() {
        let err: ToolError = reasoning_core::Error::NotFound("missing".into()).into();
        assert_eq!(err.code, "not_found");
    }
}
