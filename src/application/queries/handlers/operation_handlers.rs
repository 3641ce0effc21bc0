//! Operation Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{OperationRecord, OperationTrackerPort};
use crate::application::queries::{GetOperation, ListRecentOperations};

/// 未显式指定时返回的最近操作条数
const DEFAULT_RECENT_LIMIT: usize = 20;

// ============================================================================
// Response DTOs
// ============================================================================

/// 操作记录视图
#[derive(Debug, Clone)]
pub struct OperationView {
    pub id: Uuid,
    pub kind: String,
    pub scope: String,
    pub state: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub error: Option<String>,
}

impl From<OperationRecord> for OperationView {
    fn from(record: OperationRecord) -> Self {
        Self {
            id: record.id,
            kind: record.kind.as_str().to_string(),
            scope: record.scope.to_string(),
            state: record.state.as_str().to_string(),
            started_at: record.started_at.to_rfc3339(),
            finished_at: record.finished_at.map(|t| t.to_rfc3339()),
            error: record.error,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetOperation Handler
pub struct GetOperationHandler {
    tracker: Arc<dyn OperationTrackerPort>,
}

impl GetOperationHandler {
    pub fn new(tracker: Arc<dyn OperationTrackerPort>) -> Self {
        Self { tracker }
    }

    pub async fn handle(&self, query: GetOperation) -> Result<OperationView, ApplicationError> {
        let record = self
            .tracker
            .get(query.operation_id)
            .ok_or_else(|| ApplicationError::not_found("Operation", query.operation_id))?;

        Ok(OperationView::from(record))
    }
}

/// ListRecentOperations Handler
pub struct ListRecentOperationsHandler {
    tracker: Arc<dyn OperationTrackerPort>,
}

impl ListRecentOperationsHandler {
    pub fn new(tracker: Arc<dyn OperationTrackerPort>) -> Self {
        Self { tracker }
    }

    pub async fn handle(
        &self,
        query: ListRecentOperations,
    ) -> Result<Vec<OperationView>, ApplicationError> {
        let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        let records = self.tracker.recent(limit);
        Ok(records.into_iter().map(OperationView::from).collect())
    }
}
