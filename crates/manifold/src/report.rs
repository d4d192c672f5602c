//! Uniform progress notices.
//!
//! Every filesystem or rendering step reports one of three outcomes:
//! success, neutral (nothing to do) or failure. Notices are tracing events,
//! so they share the log formatting and filtering of the rest of the tool.

use std::fmt::Display;

use tracing::{error, info};

pub fn success_message(action: impl Display) -> String {
    format!("Succeeded to {}", action)
}

pub fn failure_message(error: &anyhow::Error) -> String {
    format!("Failed to {:#}", error)
}

/// Reports that `action` (a verb phrase such as `create file out.xml`) completed.
pub fn success(action: impl Display) {
    info!("{}", success_message(action));
}

/// Reports a step that was skipped or needed no work.
pub fn neutral(message: impl Display) {
    info!("{}", message);
}

/// Reports a failed step. The error's context chain should read as verb phrases.
pub fn failure(error: &anyhow::Error) {
    error!("{}", failure_message(error));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_message() {
        assert_eq!(
            success_message("create file out.xml"),
            "Succeeded to create file out.xml"
        );
    }

    #[test]
    fn test_failure_message_includes_cause_chain() {
        let err = anyhow::anyhow!("permission denied").context("create file out.xml");
        assert_eq!(
            failure_message(&err),
            "Failed to create file out.xml: permission denied"
        );
    }
}
