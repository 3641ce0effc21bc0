//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现
//!
//! 工作台是单人控制台，所有事件走同一条全局广播通道，
//! 前端靠事件刷新操作登记簿与章节状态，不做按会话隔离。

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

/// WebSocket 事件类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum WsEvent {
    /// 操作开始
    OperationStarted {
        operation_id: Uuid,
        kind: String,
        scope: String,
    },
    /// 操作完成
    OperationCompleted {
        operation_id: Uuid,
        kind: String,
        scope: String,
    },
    /// 操作失败
    OperationFailed {
        operation_id: Uuid,
        kind: String,
        scope: String,
        error: String,
    },
    /// 操作取消（显式取消或持有方中途弃置）
    OperationCancelled {
        operation_id: Uuid,
        kind: String,
        scope: String,
    },
    /// 大纲生成完毕，章节列表已重建
    OutlineReady {
        project_id: Uuid,
        title: String,
        chapter_count: usize,
    },
    /// 章节状态变更
    ChapterStatusChanged {
        project_id: Uuid,
        chapter_id: Uuid,
        number: u32,
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        integrity_score: Option<u8>,
    },
    /// 封面生成完毕（封面本体走查询接口，事件不携带图像数据）
    CoverReady {
        project_id: Uuid,
    },
}

/// 事件发布器
pub struct EventPublisher {
    /// Global broadcast channel, shared by all WebSocket clients
    global_channel: broadcast::Sender<WsEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (global_tx, _) = broadcast::channel(100);
        Self {
            global_channel: global_tx,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全局事件
    pub fn subscribe(&self) -> broadcast::Receiver<WsEvent> {
        self.global_channel.subscribe()
    }

    /// 发布操作开始事件
    pub fn publish_operation_started(&self, operation_id: Uuid, kind: &str, scope: &str) {
        self.publish(WsEvent::OperationStarted {
            operation_id,
            kind: kind.to_string(),
            scope: scope.to_string(),
        });
    }

    /// 发布操作完成事件
    pub fn publish_operation_completed(&self, operation_id: Uuid, kind: &str, scope: &str) {
        self.publish(WsEvent::OperationCompleted {
            operation_id,
            kind: kind.to_string(),
            scope: scope.to_string(),
        });
    }

    /// 发布操作失败事件
    pub fn publish_operation_failed(&self, operation_id: Uuid, kind: &str, scope: &str, error: &str) {
        self.publish(WsEvent::OperationFailed {
            operation_id,
            kind: kind.to_string(),
            scope: scope.to_string(),
            error: error.to_string(),
        });
    }

    /// 发布操作取消事件
    pub fn publish_operation_cancelled(&self, operation_id: Uuid, kind: &str, scope: &str) {
        self.publish(WsEvent::OperationCancelled {
            operation_id,
            kind: kind.to_string(),
            scope: scope.to_string(),
        });
    }

    /// 发布大纲就绪事件
    pub fn publish_outline_ready(&self, project_id: Uuid, title: &str, chapter_count: usize) {
        self.publish(WsEvent::OutlineReady {
            project_id,
            title: title.to_string(),
            chapter_count,
        });
    }

    /// 发布章节状态变更事件
    pub fn publish_chapter_status(
        &self,
        project_id: Uuid,
        chapter_id: Uuid,
        number: u32,
        status: &str,
        integrity_score: Option<u8>,
    ) {
        self.publish(WsEvent::ChapterStatusChanged {
            project_id,
            chapter_id,
            number,
            status: status.to_string(),
            integrity_score,
        });
    }

    /// 发布封面就绪事件
    pub fn publish_cover_ready(&self, project_id: Uuid) {
        self.publish(WsEvent::CoverReady { project_id });
    }

    fn publish(&self, event: WsEvent) {
        if let Err(e) = self.global_channel.send(event) {
            tracing::debug!(
                error = %e,
                "Failed to publish event (no receivers)"
            );
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        let project_id = Uuid::new_v4();
        publisher.publish_outline_ready(project_id, "数字极简主义", 10);

        let event = rx.recv().await.unwrap();
        match event {
            WsEvent::OutlineReady {
                project_id: pid,
                title,
                chapter_count,
            } => {
                assert_eq!(pid, project_id);
                assert_eq!(title, "数字极简主义");
                assert_eq!(chapter_count, 10);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_receivers_does_not_panic() {
        let publisher = EventPublisher::new();
        publisher.publish_cover_ready(Uuid::new_v4());
    }

    #[tokio::test]
    async fn test_event_wire_format() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        let project_id = Uuid::new_v4();
        let chapter_id = Uuid::new_v4();
        publisher.publish_chapter_status(project_id, chapter_id, 3, "flagged", Some(72));

        let event = rx.recv().await.unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "chapter_status_changed");
        assert_eq!(json["data"]["number"], 3);
        assert_eq!(json["data"]["status"], "flagged");
        assert_eq!(json["data"]["integrity_score"], 72);
    }
}
