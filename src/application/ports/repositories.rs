//! Repository Ports - 出站端口
//!
//! 定义状态存取的抽象接口，具体实现在 infrastructure/memory 层。
//!
//! 章节级访问（get_chapter / replace_chapter）是刻意收窄的接口:
//! 替换式更新的身份不变量在聚合与存储两层集中执行，
//! 调用方不能绕过它直接改写章节序列。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::persona::AuthorPersona;
use crate::domain::project::{Chapter, ChapterId, EbookProject, ProjectId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Persona Repository Port
///
/// 工作区人设是单例: load 永远有值（初始为空人设）。
#[async_trait]
pub trait PersonaRepositoryPort: Send + Sync {
    /// 读取工作区人设
    async fn load(&self) -> Result<AuthorPersona, RepositoryError>;

    /// 写回工作区人设
    async fn store(&self, persona: &AuthorPersona) -> Result<(), RepositoryError>;
}

/// Project Repository Port
#[async_trait]
pub trait ProjectRepositoryPort: Send + Sync {
    /// 保存项目（插入或整体替换）
    async fn save(&self, project: &EbookProject) -> Result<(), RepositoryError>;

    /// 根据 ID 查找项目
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<EbookProject>, RepositoryError>;

    /// 获取所有项目
    async fn find_all(&self) -> Result<Vec<EbookProject>, RepositoryError>;

    /// 读取单个章节
    async fn get_chapter(
        &self,
        project_id: &ProjectId,
        chapter_id: &ChapterId,
    ) -> Result<Option<Chapter>, RepositoryError>;

    /// 以替换方式更新章节（原子操作，身份不变量由聚合执行）
    async fn replace_chapter(
        &self,
        project_id: &ProjectId,
        next: Chapter,
    ) -> Result<(), RepositoryError>;

    /// 设置项目封面引用
    async fn set_cover(
        &self,
        project_id: &ProjectId,
        cover_ref: String,
    ) -> Result<(), RepositoryError>;
}
