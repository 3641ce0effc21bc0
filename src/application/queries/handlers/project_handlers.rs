//! Project Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::ProjectRepositoryPort;
use crate::application::queries::{GetChapter, GetProject, GetReadiness, ListProjects};
use crate::domain::project::{Chapter, EbookProject};

// ============================================================================
// Response DTOs
// ============================================================================

/// 章节视图
#[derive(Debug, Clone)]
pub struct ChapterView {
    pub id: Uuid,
    pub number: u32,
    pub title: String,
    pub overview: String,
    pub content: String,
    pub summary: String,
    pub pointers: String,
    pub status: String,
    pub integrity_score: Option<u8>,
    pub integrity_report: Option<String>,
}

impl From<&Chapter> for ChapterView {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: *chapter.id().as_uuid(),
            number: chapter.number(),
            title: chapter.title().to_string(),
            overview: chapter.overview().to_string(),
            content: chapter.content().to_string(),
            summary: chapter.summary().to_string(),
            pointers: chapter.pointers().to_string(),
            status: chapter.status().as_str().to_string(),
            integrity_score: chapter.integrity_score().map(|s| s.value()),
            integrity_report: chapter.integrity_report().map(|r| r.to_string()),
        }
    }
}

/// 项目详情视图（含全部章节）
#[derive(Debug, Clone)]
pub struct ProjectView {
    pub id: Uuid,
    pub theme: String,
    pub title: String,
    pub subtitle: String,
    pub target_audience: String,
    pub cover_ref: Option<String>,
    pub chapters: Vec<ChapterView>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&EbookProject> for ProjectView {
    fn from(project: &EbookProject) -> Self {
        Self {
            id: *project.id().as_uuid(),
            theme: project.theme().to_string(),
            title: project.title().to_string(),
            subtitle: project.subtitle().to_string(),
            target_audience: project.target_audience().to_string(),
            cover_ref: project.cover_ref().map(|r| r.to_string()),
            chapters: project.chapters().iter().map(ChapterView::from).collect(),
            created_at: project.created_at().to_rfc3339(),
            updated_at: project.updated_at().to_rfc3339(),
        }
    }
}

/// 项目列表视图（不携带章节正文）
#[derive(Debug, Clone)]
pub struct ProjectSummaryView {
    pub id: Uuid,
    pub theme: String,
    pub title: String,
    pub subtitle: String,
    pub chapter_count: usize,
    pub has_cover: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&EbookProject> for ProjectSummaryView {
    fn from(project: &EbookProject) -> Self {
        Self {
            id: *project.id().as_uuid(),
            theme: project.theme().to_string(),
            title: project.title().to_string(),
            subtitle: project.subtitle().to_string(),
            chapter_count: project.chapters().len(),
            has_cover: project.cover_ref().is_some(),
            created_at: project.created_at().to_rfc3339(),
            updated_at: project.updated_at().to_rfc3339(),
        }
    }
}

/// 就绪度行（逐章）
#[derive(Debug, Clone)]
pub struct ReadinessRow {
    pub chapter_id: Uuid,
    pub number: u32,
    pub title: String,
    pub status: String,
    pub publication_ready: bool,
}

/// 出版就绪度视图
#[derive(Debug, Clone)]
pub struct ReadinessView {
    pub total: usize,
    pub completed: usize,
    pub percent: u8,
    pub has_cover: bool,
    pub chapters: Vec<ReadinessRow>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetProject Handler
pub struct GetProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl GetProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, query: GetProject) -> Result<ProjectView, ApplicationError> {
        let project = self
            .project_repo
            .find_by_id(&query.project_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Project", *query.project_id.as_uuid()))?;

        Ok(ProjectView::from(&project))
    }
}

/// ListProjects Handler
pub struct ListProjectsHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl ListProjectsHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(
        &self,
        _query: ListProjects,
    ) -> Result<Vec<ProjectSummaryView>, ApplicationError> {
        let projects = self.project_repo.find_all().await?;
        Ok(projects.iter().map(ProjectSummaryView::from).collect())
    }
}

/// GetChapter Handler
pub struct GetChapterHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterView, ApplicationError> {
        let chapter = self
            .project_repo
            .get_chapter(&query.project_id, &query.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", *query.chapter_id.as_uuid()))?;

        Ok(ChapterView::from(&chapter))
    }
}

/// GetReadiness Handler
pub struct GetReadinessHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl GetReadinessHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, query: GetReadiness) -> Result<ReadinessView, ApplicationError> {
        let project = self
            .project_repo
            .find_by_id(&query.project_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Project", *query.project_id.as_uuid()))?;

        let report = project.readiness();
        let chapters = project
            .chapters()
            .iter()
            .map(|c| ReadinessRow {
                chapter_id: *c.id().as_uuid(),
                number: c.number(),
                title: c.title().to_string(),
                status: c.status().as_str().to_string(),
                publication_ready: c.is_publication_ready(),
            })
            .collect();

        Ok(ReadinessView {
            total: report.total,
            completed: report.completed,
            percent: report.percent,
            has_cover: project.cover_ref().is_some(),
            chapters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::persona::AuthorPersona;
    use crate::domain::project::{PlannedChapter, ProjectPlan};
    use crate::infrastructure::memory::InMemoryProjectStore;

    async fn seeded_store() -> (Arc<InMemoryProjectStore>, EbookProject) {
        let store = InMemoryProjectStore::new().arc();
        let mut project = EbookProject::new("数字极简主义".to_string(), AuthorPersona::empty());
        project
            .apply_plan(
                "数字极简主义".to_string(),
                ProjectPlan {
                    title: "少即是多".to_string(),
                    subtitle: String::new(),
                    target_audience: String::new(),
                    chapters: vec![
                        PlannedChapter {
                            title: "第一章".to_string(),
                            overview: "开篇".to_string(),
                        },
                        PlannedChapter {
                            title: "第二章".to_string(),
                            overview: "展开".to_string(),
                        },
                    ],
                },
            )
            .unwrap();

        // 第一章给正文并定稿
        let drafted = project.chapters()[0]
            .clone()
            .with_content("正文".to_string())
            .approved()
            .unwrap();
        project.replace_chapter(drafted).unwrap();
        store.save(&project).await.unwrap();
        (store, project)
    }

    #[tokio::test]
    async fn test_readiness_composes_rows_and_counts() {
        let (store, project) = seeded_store().await;
        let handler = GetReadinessHandler::new(store);

        let view = handler
            .handle(GetReadiness {
                project_id: *project.id(),
            })
            .await
            .unwrap();

        assert_eq!(view.total, 2);
        assert_eq!(view.completed, 1);
        assert_eq!(view.percent, 50);
        assert!(!view.has_cover);
        assert_eq!(view.chapters.len(), 2);
        assert!(view.chapters[0].publication_ready);
        assert_eq!(view.chapters[0].status, "final");
        assert!(!view.chapters[1].publication_ready);
    }

    #[tokio::test]
    async fn test_list_projects_omits_chapter_bodies() {
        let (store, _) = seeded_store().await;
        let handler = ListProjectsHandler::new(store);

        let views = handler.handle(ListProjects).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].title, "少即是多");
        assert_eq!(views[0].chapter_count, 2);
        assert!(!views[0].has_cover);
    }
}
