//! In-Memory Operation Tracker Implementation
//!
//! 操作登记簿的内存实现，同时是唯一的操作生命周期事件发布点。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::ports::{
    OperationError, OperationKind, OperationRecord, OperationScope, OperationState,
    OperationTrackerPort, StartedOperation,
};
use crate::infrastructure::events::EventPublisher;

/// 登记簿保留的最大条目数，超出后淘汰最早结束的终态条目
const MAX_RETAINED: usize = 256;

/// 登记条目: 记录 + 取消令牌
struct OperationEntry {
    record: OperationRecord,
    token: CancellationToken,
}

/// 内存操作登记簿
pub struct InMemoryOperationTracker {
    /// operation_id -> entry
    operations: DashMap<Uuid, OperationEntry>,
    /// 串行化冲突扫描与注册，防止两个冲突操作同时通过检查
    start_lock: Mutex<()>,
    event_publisher: Arc<EventPublisher>,
}

impl InMemoryOperationTracker {
    pub fn new(event_publisher: Arc<EventPublisher>) -> Self {
        Self {
            operations: DashMap::new(),
            start_lock: Mutex::new(()),
            event_publisher,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 查找与给定作用域冲突的进行中操作
    fn find_running_conflict(&self, scope: &OperationScope) -> Option<(OperationKind, OperationScope)> {
        self.operations.iter().find_map(|entry| {
            (entry.record.state == OperationState::Running
                && entry.record.scope.conflicts_with(scope))
            .then(|| (entry.record.kind, entry.record.scope))
        })
    }

    fn prune_finished(&self) {
        if self.operations.len() <= MAX_RETAINED {
            return;
        }

        let mut finished: Vec<(Uuid, DateTime<Utc>)> = self
            .operations
            .iter()
            .filter_map(|e| e.record.finished_at.map(|t| (e.record.id, t)))
            .collect();
        finished.sort_by_key(|(_, finished_at)| *finished_at);

        let excess = self.operations.len().saturating_sub(MAX_RETAINED);
        for (id, _) in finished.into_iter().take(excess) {
            self.operations.remove(&id);
        }
    }
}

impl OperationTrackerPort for InMemoryOperationTracker {
    fn start(
        &self,
        kind: OperationKind,
        scope: OperationScope,
    ) -> Result<StartedOperation, OperationError> {
        let id = Uuid::new_v4();
        let token = CancellationToken::new();

        {
            let _guard = self.start_lock.lock().unwrap_or_else(|e| e.into_inner());

            if let Some((running_kind, running_scope)) = self.find_running_conflict(&scope) {
                return Err(OperationError::ScopeBusy {
                    kind: running_kind,
                    scope: running_scope,
                });
            }

            let record = OperationRecord {
                id,
                kind,
                scope,
                state: OperationState::Running,
                started_at: Utc::now(),
                finished_at: None,
                error: None,
            };
            self.operations.insert(
                id,
                OperationEntry {
                    record,
                    token: token.clone(),
                },
            );
        }

        self.prune_finished();
        self.event_publisher
            .publish_operation_started(id, kind.as_str(), &scope.to_string());
        tracing::debug!(operation_id = %id, kind = %kind, scope = %scope, "Operation started");

        Ok(StartedOperation { id, token })
    }

    fn ensure_free(&self, scope: &OperationScope) -> Result<(), OperationError> {
        let _guard = self.start_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((running_kind, running_scope)) = self.find_running_conflict(scope) {
            return Err(OperationError::ScopeBusy {
                kind: running_kind,
                scope: running_scope,
            });
        }
        Ok(())
    }

    fn complete(&self, id: Uuid) {
        if let Some(mut entry) = self.operations.get_mut(&id) {
            // cancel 可能先一步终态化，此时结果已被调用方丢弃
            if entry.record.state != OperationState::Running {
                return;
            }
            entry.record.state = OperationState::Completed;
            entry.record.finished_at = Some(Utc::now());
            let (kind, scope) = (entry.record.kind, entry.record.scope);
            drop(entry);

            self.event_publisher
                .publish_operation_completed(id, kind.as_str(), &scope.to_string());
            tracing::debug!(operation_id = %id, kind = %kind, "Operation completed");
        }
    }

    fn fail(&self, id: Uuid, error: String) {
        if let Some(mut entry) = self.operations.get_mut(&id) {
            if entry.record.state != OperationState::Running {
                return;
            }
            entry.record.state = OperationState::Failed;
            entry.record.finished_at = Some(Utc::now());
            entry.record.error = Some(error.clone());
            let (kind, scope) = (entry.record.kind, entry.record.scope);
            drop(entry);

            self.event_publisher
                .publish_operation_failed(id, kind.as_str(), &scope.to_string(), &error);
            tracing::warn!(operation_id = %id, kind = %kind, error = %error, "Operation failed");
        }
    }

    fn abandon(&self, id: Uuid) {
        if let Some(mut entry) = self.operations.get_mut(&id) {
            if entry.record.state != OperationState::Running {
                return;
            }
            entry.record.state = OperationState::Cancelled;
            entry.record.finished_at = Some(Utc::now());
            entry.record.error = Some("abandoned by caller".to_string());
            let (kind, scope) = (entry.record.kind, entry.record.scope);
            drop(entry);

            self.event_publisher
                .publish_operation_cancelled(id, kind.as_str(), &scope.to_string());
            tracing::warn!(operation_id = %id, kind = %kind, "Operation abandoned");
        }
    }

    fn cancel(&self, id: Uuid) -> Result<(), OperationError> {
        let mut entry = self
            .operations
            .get_mut(&id)
            .ok_or(OperationError::NotFound(id))?;

        if entry.record.state.is_terminal() {
            return Err(OperationError::AlreadyFinished(id));
        }

        entry.token.cancel();
        entry.record.state = OperationState::Cancelled;
        entry.record.finished_at = Some(Utc::now());
        let (kind, scope) = (entry.record.kind, entry.record.scope);
        drop(entry);

        self.event_publisher
            .publish_operation_cancelled(id, kind.as_str(), &scope.to_string());
        tracing::info!(operation_id = %id, kind = %kind, "Operation cancelled");
        Ok(())
    }

    fn get(&self, id: Uuid) -> Option<OperationRecord> {
        self.operations.get(&id).map(|e| e.record.clone())
    }

    fn recent(&self, limit: usize) -> Vec<OperationRecord> {
        let mut records: Vec<OperationRecord> = self
            .operations
            .iter()
            .map(|e| e.record.clone())
            .collect();
        records.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        records.truncate(limit);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::OperationGuard;
    use crate::domain::project::{ChapterId, ProjectId};
    use std::time::Duration;

    fn tracker() -> InMemoryOperationTracker {
        InMemoryOperationTracker::new(EventPublisher::new().arc())
    }

    fn chapter_scope() -> OperationScope {
        OperationScope::Chapter {
            project_id: ProjectId::new(),
            chapter_id: ChapterId::new(),
        }
    }

    #[test]
    fn test_lifecycle_running_to_completed() {
        let tracker = tracker();
        let scope = chapter_scope();

        let started = tracker.start(OperationKind::ChapterDraft, scope).unwrap();
        let record = tracker.get(started.id).unwrap();
        assert_eq!(record.state, OperationState::Running);
        assert!(record.finished_at.is_none());

        tracker.complete(started.id);
        let record = tracker.get(started.id).unwrap();
        assert_eq!(record.state, OperationState::Completed);
        assert!(record.finished_at.is_some());
    }

    #[test]
    fn test_conflicting_scope_rejected_until_finished() {
        let tracker = tracker();
        let scope = chapter_scope();

        let started = tracker.start(OperationKind::ChapterDraft, scope).unwrap();

        let rejected = tracker.start(OperationKind::IntegrityCheck, scope);
        assert!(matches!(rejected, Err(OperationError::ScopeBusy { .. })));
        assert!(tracker.ensure_free(&scope).is_err());

        tracker.complete(started.id);
        assert!(tracker.ensure_free(&scope).is_ok());
        assert!(tracker.start(OperationKind::IntegrityCheck, scope).is_ok());
    }

    #[test]
    fn test_outline_scope_blocks_chapter_scope() {
        let tracker = tracker();
        let project_id = ProjectId::new();

        tracker
            .start(
                OperationKind::OutlineGeneration,
                OperationScope::Outline { project_id },
            )
            .unwrap();

        let rejected = tracker.start(
            OperationKind::ChapterDraft,
            OperationScope::Chapter {
                project_id,
                chapter_id: ChapterId::new(),
            },
        );
        assert!(matches!(rejected, Err(OperationError::ScopeBusy { .. })));
    }

    #[test]
    fn test_cancel_triggers_token_and_wins_over_complete() {
        let tracker = tracker();
        let started = tracker
            .start(OperationKind::HumanizeRewrite, chapter_scope())
            .unwrap();

        tracker.cancel(started.id).unwrap();
        assert!(started.token.is_cancelled());

        let record = tracker.get(started.id).unwrap();
        assert_eq!(record.state, OperationState::Cancelled);

        // 迟到的 complete 不得改写终态
        tracker.complete(started.id);
        let record = tracker.get(started.id).unwrap();
        assert_eq!(record.state, OperationState::Cancelled);
    }

    #[test]
    fn test_cancel_finished_operation_rejected() {
        let tracker = tracker();
        let started = tracker
            .start(OperationKind::CoverArt, OperationScope::Cover {
                project_id: ProjectId::new(),
            })
            .unwrap();
        tracker.complete(started.id);

        let result = tracker.cancel(started.id);
        assert!(matches!(result, Err(OperationError::AlreadyFinished(_))));

        let missing = tracker.cancel(Uuid::new_v4());
        assert!(matches!(missing, Err(OperationError::NotFound(_))));
    }

    #[test]
    fn test_guard_drop_abandons_and_frees_scope() {
        let tracker = Arc::new(tracker());
        let scope = chapter_scope();

        let guard = OperationGuard::begin(
            tracker.clone() as Arc<dyn OperationTrackerPort>,
            OperationKind::ChapterDraft,
            scope,
        )
        .unwrap();
        let id = guard.id();
        assert!(tracker.ensure_free(&scope).is_err());

        drop(guard);

        let record = tracker.get(id).unwrap();
        assert_eq!(record.state, OperationState::Cancelled);
        assert_eq!(record.error.as_deref(), Some("abandoned by caller"));
        assert!(tracker.ensure_free(&scope).is_ok());
    }

    #[tokio::test]
    async fn test_recent_newest_first() {
        let tracker = tracker();

        let first = tracker
            .start(OperationKind::IdentityResearch, OperationScope::Persona)
            .unwrap();
        tracker.complete(first.id);
        tokio::time::sleep(Duration::from_millis(2)).await;

        let second = tracker
            .start(OperationKind::CoverArt, OperationScope::Cover {
                project_id: ProjectId::new(),
            })
            .unwrap();
        tracker.complete(second.id);
        tokio::time::sleep(Duration::from_millis(2)).await;

        let third = tracker
            .start(OperationKind::ChapterDraft, chapter_scope())
            .unwrap();

        let recent = tracker.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, third.id);
        assert_eq!(recent[1].id, second.id);

        let all = tracker.recent(10);
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].id, first.id);
    }
}
