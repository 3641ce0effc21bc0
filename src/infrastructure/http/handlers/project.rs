//! Project HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateProject, GenerateCover, GeneratePlan, GetProject, GetReadiness, ListProjects,
    ProjectSummaryView, ProjectView, ReadinessRow, ReadinessView,
};
use crate::domain::project::ProjectId;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::handlers::chapter::ChapterResponse;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub theme: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetProjectRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub project_id: Uuid,
    pub theme: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCoverRequest {
    pub project_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ReadinessRequest {
    pub project_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub theme: String,
    pub title: String,
    pub subtitle: String,
    pub target_audience: String,
    pub cover_ref: Option<String>,
    pub chapters: Vec<ChapterResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProjectView> for ProjectResponse {
    fn from(view: ProjectView) -> Self {
        Self {
            id: view.id,
            theme: view.theme,
            title: view.title,
            subtitle: view.subtitle,
            target_audience: view.target_audience,
            cover_ref: view.cover_ref,
            chapters: view.chapters.into_iter().map(ChapterResponse::from).collect(),
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

/// 项目列表条目，不携带章节正文
#[derive(Debug, Serialize)]
pub struct ProjectSummaryResponse {
    pub id: Uuid,
    pub theme: String,
    pub title: String,
    pub subtitle: String,
    pub chapter_count: usize,
    pub has_cover: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ProjectSummaryView> for ProjectSummaryResponse {
    fn from(view: ProjectSummaryView) -> Self {
        Self {
            id: view.id,
            theme: view.theme,
            title: view.title,
            subtitle: view.subtitle,
            chapter_count: view.chapter_count,
            has_cover: view.has_cover,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadinessRowResponse {
    pub chapter_id: Uuid,
    pub number: u32,
    pub title: String,
    pub status: String,
    pub publication_ready: bool,
}

impl From<ReadinessRow> for ReadinessRowResponse {
    fn from(row: ReadinessRow) -> Self {
        Self {
            chapter_id: row.chapter_id,
            number: row.number,
            title: row.title,
            status: row.status,
            publication_ready: row.publication_ready,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub total: usize,
    pub completed: usize,
    pub percent: u8,
    pub has_cover: bool,
    pub chapters: Vec<ReadinessRowResponse>,
}

impl From<ReadinessView> for ReadinessResponse {
    fn from(view: ReadinessView) -> Self {
        Self {
            total: view.total,
            completed: view.completed,
            percent: view.percent,
            has_cover: view.has_cover,
            chapters: view
                .chapters
                .into_iter()
                .map(ReadinessRowResponse::from)
                .collect(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建书籍项目
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let command = CreateProject { theme: req.theme };

    let project = state.create_project_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ProjectResponse::from(
        ProjectView::from(&project),
    ))))
}

/// 项目列表
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ProjectSummaryResponse>>>, ApiError> {
    let views = state.list_projects_handler.handle(ListProjects).await?;
    let projects = views
        .into_iter()
        .map(ProjectSummaryResponse::from)
        .collect();

    Ok(Json(ApiResponse::success(projects)))
}

/// 获取项目详情（含全部章节）
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let query = GetProject {
        project_id: ProjectId::from_uuid(req.id),
    };

    let view = state.get_project_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(ProjectResponse::from(view))))
}

/// 生成主控大纲，覆盖项目元信息并重建全部章节
pub async fn generate_plan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let command = GeneratePlan {
        project_id: ProjectId::from_uuid(req.project_id),
        theme: req.theme,
    };

    let project = state.generate_plan_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ProjectResponse::from(
        ProjectView::from(&project),
    ))))
}

/// 生成封面
pub async fn generate_cover(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateCoverRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let command = GenerateCover {
        project_id: ProjectId::from_uuid(req.project_id),
    };

    let project = state.generate_cover_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ProjectResponse::from(
        ProjectView::from(&project),
    ))))
}

/// 出版就绪度
pub async fn get_readiness(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReadinessRequest>,
) -> Result<Json<ApiResponse<ReadinessResponse>>, ApiError> {
    let query = GetReadiness {
        project_id: ProjectId::from_uuid(req.project_id),
    };

    let view = state.get_readiness_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(ReadinessResponse::from(view))))
}
