use serde::Serialize;
use std::fmt;

/// Success flag plus a short human-readable message, the shape every
/// front-end facing operation resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Collapses a service result, rendering errors through `Display`.
    pub fn from_result<T, E: fmt::Display>(
        result: Result<T, E>,
        on_success: impl FnOnce(T) -> String,
    ) -> Self {
        match result {
            Ok(value) => Self::ok(on_success(value)),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
