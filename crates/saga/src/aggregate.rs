//! Saga instance aggregate.

use common::AggregateId;
use domain::{Aggregate, DocumentNumber};
use event_store::Version;
use serde::{Deserialize, Serialize};

use crate::error::SagaError;
use crate::events::SagaEvent;
use crate::state::SagaState;

/// An event-sourced conversion saga.
///
/// Records which quotation is being converted, the steps completed so far
/// and the order the first step produced, so a failed run can be inspected
/// and compensated from its own history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SagaInstance {
    id: Option<AggregateId>,
    version: Version,
    saga_type: String,
    quotation_id: Option<AggregateId>,
    state: SagaState,
    current_step: usize,
    completed_steps: Vec<String>,
    order_id: Option<AggregateId>,
    order_number: Option<DocumentNumber>,
    failed_step: Option<String>,
    failure_reason: Option<String>,
}

impl Aggregate for SagaInstance {
    type Event = SagaEvent;
    type Error = SagaError;

    fn aggregate_type() -> &'static str {
        "QuotationConversionSaga"
    }

    fn id(&self) -> Option<AggregateId> {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            SagaEvent::SagaStarted(data) => {
                self.id = Some(data.saga_id);
                self.quotation_id = Some(data.quotation_id);
                self.saga_type = data.saga_type;
                self.state = SagaState::Running;
            }
            SagaEvent::StepStarted(_) => {
                self.current_step += 1;
            }
            SagaEvent::StepCompleted(data) => {
                self.completed_steps.push(data.step_name);
                if let Some(order_id) = data.order_id {
                    self.order_id = Some(order_id);
                }
                if let Some(number) = data.order_number {
                    self.order_number = Some(number);
                }
            }
            SagaEvent::StepFailed(data) => {
                self.failed_step = Some(data.step_name);
                self.failure_reason = Some(data.error);
            }
            SagaEvent::CompensationStarted(_) => {
                self.state = SagaState::Compensating;
            }
            SagaEvent::CompensationStepCompleted(_) | SagaEvent::CompensationStepFailed(_) => {}
            SagaEvent::SagaCompleted(_) => {
                self.state = SagaState::Completed;
            }
            SagaEvent::SagaFailed(data) => {
                self.state = SagaState::Failed;
                if self.failure_reason.is_none() {
                    self.failure_reason = Some(data.reason);
                }
            }
        }
    }
}

impl SagaInstance {
    pub fn state(&self) -> SagaState {
        self.state
    }

    pub fn saga_type(&self) -> &str {
        &self.saga_type
    }

    pub fn quotation_id(&self) -> Option<AggregateId> {
        self.quotation_id
    }

    /// Index of the most recently started step, counting from one.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn completed_steps(&self) -> &[String] {
        &self.completed_steps
    }

    pub fn has_completed(&self, step: &str) -> bool {
        self.completed_steps.iter().any(|s| s == step)
    }

    /// The order placed by the first step, if it ran.
    pub fn order_id(&self) -> Option<AggregateId> {
        self.order_id
    }

    pub fn order_number(&self) -> Option<&DocumentNumber> {
        self.order_number.as_ref()
    }

    pub fn failed_step(&self) -> Option<&str> {
        self.failed_step.as_deref()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{SAGA_TYPE, STEP_MARK_CONVERTED, STEP_PLACE_ORDER};

    fn started() -> (SagaInstance, AggregateId) {
        let mut saga = SagaInstance::default();
        let quotation_id = AggregateId::new();
        saga.apply(SagaEvent::saga_started(AggregateId::new(), quotation_id, SAGA_TYPE));
        (saga, quotation_id)
    }

    #[test]
    fn default_instance_has_not_started() {
        let saga = SagaInstance::default();
        assert!(saga.id().is_none());
        assert_eq!(saga.state(), SagaState::NotStarted);
        assert!(saga.completed_steps().is_empty());
    }

    #[test]
    fn started_saga_records_quotation() {
        let (saga, quotation_id) = started();
        assert!(saga.id().is_some());
        assert_eq!(saga.quotation_id(), Some(quotation_id));
        assert_eq!(saga.saga_type(), SAGA_TYPE);
        assert_eq!(saga.state(), SagaState::Running);
    }

    #[test]
    fn successful_run_captures_order() {
        let (mut saga, _) = started();
        let order_id = AggregateId::new();

        saga.apply(SagaEvent::step_started(STEP_PLACE_ORDER));
        saga.apply(SagaEvent::order_placed(
            STEP_PLACE_ORDER,
            order_id,
            DocumentNumber::normalize("ORD-20250115-0001"),
        ));
        saga.apply(SagaEvent::step_started(STEP_MARK_CONVERTED));
        saga.apply(SagaEvent::step_completed(STEP_MARK_CONVERTED));
        saga.apply(SagaEvent::saga_completed());

        assert_eq!(saga.current_step(), 2);
        assert_eq!(saga.completed_steps(), &[STEP_PLACE_ORDER, STEP_MARK_CONVERTED]);
        assert_eq!(saga.order_id(), Some(order_id));
        assert_eq!(saga.order_number().map(|n| n.as_str()), Some("ORD-20250115-0001"));
        assert_eq!(saga.state(), SagaState::Completed);
        assert!(saga.failure_reason().is_none());
    }

    #[test]
    fn failed_run_keeps_step_error_over_summary() {
        let (mut saga, _) = started();

        saga.apply(SagaEvent::step_started(STEP_PLACE_ORDER));
        saga.apply(SagaEvent::order_placed(
            STEP_PLACE_ORDER,
            AggregateId::new(),
            DocumentNumber::normalize("ORD-20250115-0002"),
        ));
        saga.apply(SagaEvent::step_started(STEP_MARK_CONVERTED));
        saga.apply(SagaEvent::step_failed(STEP_MARK_CONVERTED, "version conflict"));
        saga.apply(SagaEvent::compensation_started(STEP_MARK_CONVERTED));
        assert_eq!(saga.state(), SagaState::Compensating);

        saga.apply(SagaEvent::compensation_step_completed(STEP_PLACE_ORDER));
        saga.apply(SagaEvent::saga_failed("compensated"));

        assert_eq!(saga.state(), SagaState::Failed);
        assert_eq!(saga.failed_step(), Some(STEP_MARK_CONVERTED));
        assert_eq!(saga.failure_reason(), Some("version conflict"));
        assert!(saga.has_completed(STEP_PLACE_ORDER));
        assert!(!saga.has_completed(STEP_MARK_CONVERTED));
    }
}
