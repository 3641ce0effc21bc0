//! Operation Tracker Port - 委托操作注册表
//!
//! 每次委托调用都注册为一个可查询、可取消的操作。注册表同时承担
//! 并发控制: 作用域冲突的第二个操作直接拒绝（不排队），
//! 同步修改在落盘前探测作用域是否空闲。
//!
//! 具体实现在 infrastructure/memory 层。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::project::{ChapterId, ProjectId};

/// Operation Tracker 错误
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Operation not found: {0}")]
    NotFound(Uuid),

    #[error("Scope busy: {kind} already running on {scope}")]
    ScopeBusy {
        kind: OperationKind,
        scope: OperationScope,
    },

    #[error("Operation already finished: {0}")]
    AlreadyFinished(Uuid),
}

/// 操作种类（与委托意图一一对应）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// 身份调研
    IdentityResearch,
    /// 大纲生成
    OutlineGeneration,
    /// 章节起草
    ChapterDraft,
    /// 内容检测
    IntegrityCheck,
    /// 润色改写
    HumanizeRewrite,
    /// 局部修改
    SelectionTweak,
    /// 封面生成
    CoverArt,
    /// 朗读合成
    Narration,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::IdentityResearch => "identity_research",
            OperationKind::OutlineGeneration => "outline_generation",
            OperationKind::ChapterDraft => "chapter_draft",
            OperationKind::IntegrityCheck => "integrity_check",
            OperationKind::HumanizeRewrite => "humanize_rewrite",
            OperationKind::SelectionTweak => "selection_tweak",
            OperationKind::CoverArt => "cover_art",
            OperationKind::Narration => "narration",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 操作作用域
///
/// 冲突规则（对称）:
/// - persona 只与自身冲突
/// - outline 与同项目的 outline、chapter 冲突
///   （大纲重建会整体替换章节序列，不允许与任何章节级变更并行）
/// - chapter 与同章节的 chapter、同项目的 outline 冲突
/// - cover / narration 只与自身冲突（narration 只读，仅防重复触发）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationScope {
    Persona,
    Outline {
        project_id: ProjectId,
    },
    Chapter {
        project_id: ProjectId,
        chapter_id: ChapterId,
    },
    Cover {
        project_id: ProjectId,
    },
    Narration {
        project_id: ProjectId,
        chapter_id: ChapterId,
    },
}

impl OperationScope {
    pub fn conflicts_with(&self, other: &OperationScope) -> bool {
        use OperationScope::*;
        match (self, other) {
            (Persona, Persona) => true,
            (Outline { project_id: a }, Outline { project_id: b }) => a == b,
            (Outline { project_id: a }, Chapter { project_id: b, .. })
            | (Chapter { project_id: a, .. }, Outline { project_id: b }) => a == b,
            (
                Chapter {
                    project_id: pa,
                    chapter_id: ca,
                },
                Chapter {
                    project_id: pb,
                    chapter_id: cb,
                },
            ) => pa == pb && ca == cb,
            (Cover { project_id: a }, Cover { project_id: b }) => a == b,
            (
                Narration {
                    project_id: pa,
                    chapter_id: ca,
                },
                Narration {
                    project_id: pb,
                    chapter_id: cb,
                },
            ) => pa == pb && ca == cb,
            _ => false,
        }
    }
}

impl std::fmt::Display for OperationScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationScope::Persona => write!(f, "persona"),
            OperationScope::Outline { project_id } => write!(f, "outline/{}", project_id),
            OperationScope::Chapter {
                project_id,
                chapter_id,
            } => write!(f, "chapter/{}/{}", project_id, chapter_id),
            OperationScope::Cover { project_id } => write!(f, "cover/{}", project_id),
            OperationScope::Narration {
                project_id,
                chapter_id,
            } => write!(f, "narration/{}/{}", project_id, chapter_id),
        }
    }
}

/// 操作状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationState {
    /// 进行中
    Running,
    /// 已完成
    Completed,
    /// 已失败
    Failed,
    /// 已取消
    Cancelled,
}

impl OperationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationState::Running => "running",
            OperationState::Completed => "completed",
            OperationState::Failed => "failed",
            OperationState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OperationState::Running)
    }
}

/// 操作记录（对外可查询的快照）
#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub id: Uuid,
    pub kind: OperationKind,
    pub scope: OperationScope,
    pub state: OperationState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// start 的返回: 操作 ID 与取消令牌
#[derive(Debug, Clone)]
pub struct StartedOperation {
    pub id: Uuid,
    pub token: CancellationToken,
}

/// Operation Tracker Port
pub trait OperationTrackerPort: Send + Sync {
    /// 注册并启动操作；与任一进行中操作的作用域冲突时拒绝
    fn start(
        &self,
        kind: OperationKind,
        scope: OperationScope,
    ) -> Result<StartedOperation, OperationError>;

    /// 探测作用域是否空闲（同步修改在落盘前调用）
    fn ensure_free(&self, scope: &OperationScope) -> Result<(), OperationError>;

    /// 标记完成
    fn complete(&self, id: Uuid);

    /// 标记失败并记录错误
    fn fail(&self, id: Uuid, error: String);

    /// 标记因调用方放弃而中止（guard Drop 路径，如客户端断连）
    fn abandon(&self, id: Uuid);

    /// 取消进行中的操作（触发其取消令牌）
    fn cancel(&self, id: Uuid) -> Result<(), OperationError>;

    /// 查询单个操作
    fn get(&self, id: Uuid) -> Option<OperationRecord>;

    /// 最近的操作（按开始时间倒序）
    fn recent(&self, limit: usize) -> Vec<OperationRecord>;
}

/// 操作守卫: 确保每个已注册操作都会走到终态
///
/// 持有方显式调用 complete/fail/cancelled；若守卫在此之前被 Drop
/// （调用方 future 被丢弃），操作标记为中止，作用域随之释放。
pub struct OperationGuard {
    tracker: Arc<dyn OperationTrackerPort>,
    id: Uuid,
    token: CancellationToken,
    finished: bool,
}

impl OperationGuard {
    /// 注册并启动操作
    pub fn begin(
        tracker: Arc<dyn OperationTrackerPort>,
        kind: OperationKind,
        scope: OperationScope,
    ) -> Result<Self, OperationError> {
        let started = tracker.start(kind, scope)?;
        Ok(Self {
            tracker,
            id: started.id,
            token: started.token,
            finished: false,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 取消令牌（与引擎调用一起 select）
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// 操作成功
    pub fn complete(mut self) {
        self.finished = true;
        self.tracker.complete(self.id);
    }

    /// 操作失败
    pub fn fail(mut self, error: impl Into<String>) {
        self.finished = true;
        self.tracker.fail(self.id, error.into());
    }

    /// 操作已被 cancel 终态化，守卫只做释放
    pub fn cancelled(mut self) {
        self.finished = true;
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        if !self.finished {
            self.tracker.abandon(self.id);
        }
    }
}
