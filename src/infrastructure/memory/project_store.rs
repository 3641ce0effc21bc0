//! In-Memory Project Store Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{ProjectRepositoryPort, RepositoryError};
use crate::domain::project::{Chapter, ChapterId, EbookProject, ProjectError, ProjectId};

/// 内存项目存储
///
/// 章节级更新在 DashMap 条目锁内走聚合方法，
/// replace_chapter 的读-改-写对外表现为原子操作。
pub struct InMemoryProjectStore {
    /// project_id -> EbookProject
    projects: DashMap<ProjectId, EbookProject>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self {
            projects: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl ProjectRepositoryPort for InMemoryProjectStore {
    async fn save(&self, project: &EbookProject) -> Result<(), RepositoryError> {
        self.projects.insert(*project.id(), project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<EbookProject>, RepositoryError> {
        Ok(self.projects.get(id).map(|p| p.clone()))
    }

    async fn find_all(&self) -> Result<Vec<EbookProject>, RepositoryError> {
        let mut projects: Vec<EbookProject> =
            self.projects.iter().map(|entry| entry.clone()).collect();
        projects.sort_by_key(|p| p.created_at());
        Ok(projects)
    }

    async fn get_chapter(
        &self,
        project_id: &ProjectId,
        chapter_id: &ChapterId,
    ) -> Result<Option<Chapter>, RepositoryError> {
        Ok(self
            .projects
            .get(project_id)
            .and_then(|p| p.chapter(chapter_id).cloned()))
    }

    async fn replace_chapter(
        &self,
        project_id: &ProjectId,
        next: Chapter,
    ) -> Result<(), RepositoryError> {
        let mut entry = self
            .projects
            .get_mut(project_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("project {}", project_id)))?;

        entry.replace_chapter(next).map_err(|e| match e {
            ProjectError::ChapterNotFound(id) => {
                RepositoryError::NotFound(format!("chapter {}", id))
            }
            other => RepositoryError::InvariantViolation(other.to_string()),
        })?;
        Ok(())
    }

    async fn set_cover(
        &self,
        project_id: &ProjectId,
        cover_ref: String,
    ) -> Result<(), RepositoryError> {
        let mut entry = self
            .projects
            .get_mut(project_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("project {}", project_id)))?;
        entry.set_cover(cover_ref);
        Ok(())
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}
