//! Interaction outcomes
//!
//! Every utility operation returns `Result<T, InteractionError>`. Whether a
//! failure is fatal is up to the caller: propagate it with `?`, or call
//! [`InteractionResultExt::soft`] to log it and carry on.

use tracing::warn;

use crate::bridge::BridgeError;

#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    #[error("Timed out after {timeout_ms}ms waiting for {selector}")]
    Timeout { selector: String, timeout_ms: u64 },

    #[error("No element matches {selector}")]
    NotFound { selector: String },

    #[error("Occurrence {occurrence} requested but {selector} matched {count} element(s)")]
    OccurrenceOutOfRange {
        selector: String,
        occurrence: usize,
        count: usize,
    },

    #[error("Column Name \"{column}\" not found in Table Grid for selector {header_selector}")]
    ColumnNotFound {
        column: String,
        header_selector: String,
    },

    #[error("Unexpected value from {selector}: {message}")]
    UnexpectedValue { selector: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Driver error: {0}")]
    Driver(#[from] BridgeError),
}

impl InteractionError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, InteractionError::Timeout { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            InteractionError::NotFound { .. } | InteractionError::OccurrenceOutOfRange { .. }
        )
    }

    /// Attach selector context to a driver failure
    pub(crate) fn from_driver(err: BridgeError, selector: &str, timeout_ms: u64) -> Self {
        match err {
            BridgeError::Timeout(_) => InteractionError::Timeout {
                selector: selector.to_string(),
                timeout_ms,
            },
            other => InteractionError::Driver(other),
        }
    }
}

/// Opt-in swallowing for optional interactions
pub trait InteractionResultExt<T> {
    /// Log the failure and continue with `None`
    fn soft(self) -> Option<T>;
}

impl<T> InteractionResultExt<T> for Result<T, InteractionError> {
    fn soft(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "ignoring failed interaction");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_timeout_becomes_interaction_timeout() {
        let err = InteractionError::from_driver(
            BridgeError::Timeout("locator.waitFor".to_string()),
            "//button",
            500,
        );
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Timed out after 500ms waiting for //button");
    }

    #[test]
    fn test_other_driver_errors_pass_through() {
        let err = InteractionError::from_driver(BridgeError::Disconnected, "#a", 500);
        assert!(matches!(err, InteractionError::Driver(BridgeError::Disconnected)));
    }

    #[test]
    fn test_soft_swallows_errors() {
        let ok: Result<u8, InteractionError> = Ok(3);
        assert_eq!(ok.soft(), Some(3));

        let err: Result<u8, InteractionError> = Err(InteractionError::NotFound {
            selector: "#gone".to_string(),
        });
        assert!(err.soft().is_none());
    }

    #[test]
    fn test_column_not_found_message_names_column_and_selector() {
        let err = InteractionError::ColumnNotFound {
            column: "Status".to_string(),
            header_selector: "//th".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"Status\""));
        assert!(msg.contains("//th"));
    }
}
