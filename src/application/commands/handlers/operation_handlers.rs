//! Operation Command Handlers

use std::sync::Arc;

use crate::application::commands::CancelOperation;
use crate::application::error::ApplicationError;
use crate::application::ports::{OperationRecord, OperationTrackerPort};

/// CancelOperation Handler - 取消进行中的委托操作
///
/// 只触发取消令牌并记录终态，发起方 handler 负责丢弃引擎结果。
pub struct CancelOperationHandler {
    tracker: Arc<dyn OperationTrackerPort>,
}

impl CancelOperationHandler {
    pub fn new(tracker: Arc<dyn OperationTrackerPort>) -> Self {
        Self { tracker }
    }

    pub async fn handle(
        &self,
        command: CancelOperation,
    ) -> Result<OperationRecord, ApplicationError> {
        self.tracker.cancel(command.operation_id)?;
        let record = self
            .tracker
            .get(command.operation_id)
            .ok_or_else(|| ApplicationError::not_found("Operation", command.operation_id))?;

        tracing::info!(operation_id = %command.operation_id, "Operation cancelled by client");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{OperationKind, OperationScope, OperationState};
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::memory::InMemoryOperationTracker;
    use uuid::Uuid;

    fn tracker() -> Arc<InMemoryOperationTracker> {
        InMemoryOperationTracker::new(EventPublisher::new().arc()).arc()
    }

    #[tokio::test]
    async fn test_cancel_running_operation() {
        let tracker = tracker();
        let started = tracker
            .start(OperationKind::IdentityResearch, OperationScope::Persona)
            .unwrap();

        let handler = CancelOperationHandler::new(tracker.clone());
        let record = handler
            .handle(CancelOperation {
                operation_id: started.id,
            })
            .await
            .unwrap();

        assert_eq!(record.state, OperationState::Cancelled);
        assert!(started.token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_unknown_operation() {
        let handler = CancelOperationHandler::new(tracker());

        let result = handler
            .handle(CancelOperation {
                operation_id: Uuid::new_v4(),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_cancel_finished_operation_rejected() {
        let tracker = tracker();
        let started = tracker
            .start(OperationKind::IdentityResearch, OperationScope::Persona)
            .unwrap();
        tracker.complete(started.id);

        let handler = CancelOperationHandler::new(tracker.clone());
        let result = handler
            .handle(CancelOperation {
                operation_id: started.id,
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::InvalidState(_))));
    }
}
