//! Where a quotation conversion stands.

use serde::{Deserialize, Serialize};

/// Progress of one quotation-to-order conversion.
///
/// ```text
/// NotStarted ──► Running ──┬──► Completed
///                          ├──► Compensating ──► Failed
///                          └──► Failed
/// ```
///
/// If placing the order fails there is nothing to cancel, so the saga moves
/// straight to `Failed`. If marking the quotation fails after the order was
/// placed, the saga passes through `Compensating` while that order is
/// cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SagaState {
    #[default]
    NotStarted,

    /// Placing the order or marking the quotation converted.
    Running,

    /// The quotation could not be marked and the placed order is being
    /// cancelled.
    Compensating,

    /// The order is live and the quotation points at it.
    Completed,

    /// No live order remains; the quotation is still approved and can be
    /// converted again.
    Failed,
}

impl SagaState {
    /// No further steps will be recorded.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaState::Completed | SagaState::Failed)
    }

    /// Staff may retry the conversion from the quotation.
    pub fn allows_retry(&self) -> bool {
        matches!(self, SagaState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SagaState::NotStarted => "NotStarted",
            SagaState::Running => "Running",
            SagaState::Compensating => "Compensating",
            SagaState::Completed => "Completed",
            SagaState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_starts_not_started() {
        assert_eq!(SagaState::default(), SagaState::NotStarted);
        assert!(!SagaState::default().is_terminal());
    }

    #[test]
    fn converted_and_failed_conversions_are_finished() {
        assert!(SagaState::Completed.is_terminal());
        assert!(SagaState::Failed.is_terminal());
        assert!(!SagaState::Running.is_terminal());
        assert!(!SagaState::Compensating.is_terminal());
    }

    #[test]
    fn only_failed_conversions_invite_a_retry() {
        assert!(SagaState::Failed.allows_retry());
        assert!(!SagaState::Completed.allows_retry());
        assert!(!SagaState::Compensating.allows_retry());
        assert_eq!(SagaState::Compensating.to_string(), "Compensating");
    }
}
