use crate::orders::error::FailureKind;
use std::fmt;
use tracing::debug;

/// Where an order-assembly run currently is.
///
/// Runs move strictly forward through the success states; any of them may drop
/// into [`WorkflowState::Failed`], which is terminal like `Persisted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Validating,
    Fetching,
    ItemsResolved,
    ReferencesResolved,
    PaymentAuthorized,
    ShipmentObtained,
    Persisted,
    Failed(FailureKind),
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Persisted | WorkflowState::Failed(_))
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowState::Failed(kind) => write!(f, "Failed({kind:?})"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// The states a run passed through, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLog {
    states: Vec<WorkflowState>,
}

impl StateLog {
    pub(crate) fn new() -> Self {
        Self {
            states: vec![WorkflowState::Validating],
        }
    }

    pub(crate) fn advance(&mut self, next: WorkflowState) {
        debug!(from = %self.current(), to = %next, "Transition");
        self.states.push(next);
    }

    pub fn current(&self) -> WorkflowState {
        // Never empty: a log always starts in `Validating`.
        self.states
            .last()
            .copied()
            .unwrap_or(WorkflowState::Validating)
    }

    pub fn states(&self) -> &[WorkflowState] {
        &self.states
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_tracks_transitions() {
        let mut log = StateLog::new();
        assert_eq!(log.current(), WorkflowState::Validating);

        log.advance(WorkflowState::Fetching);
        log.advance(WorkflowState::Failed(FailureKind::Timeout));

        assert!(log.current().is_terminal());
        assert_eq!(
            log.states(),
            &[
                WorkflowState::Validating,
                WorkflowState::Fetching,
                WorkflowState::Failed(FailureKind::Timeout)
            ]
        );
        assert_eq!(log.current().to_string(), "Failed(Timeout)");
    }
}
