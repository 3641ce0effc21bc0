//! Chapter HTTP Handlers
//!
//! 章节全部走 POST + JSON body，请求体里同时带项目与章节 ID。
//! 委托引擎的端点（draft/check/humanize/tweak/narrate）会阻塞到
//! 引擎返回、出错或操作被取消为止，进行中的进度走 WebSocket。

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    ApproveChapter, ChapterView, CheckIntegrity, DraftChapter, EditChapterContent, GetChapter,
    HumanizeChapter, NarrateChapter, TweakSelection, UpdatePointers,
};
use crate::domain::project::{ChapterId, ProjectId};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

/// 多数章节端点只需要定位一个章节，共用这个请求体
#[derive(Debug, Deserialize)]
pub struct ChapterRefRequest {
    pub project_id: Uuid,
    pub chapter_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TweakSelectionRequest {
    pub project_id: Uuid,
    pub chapter_id: Uuid,
    /// 选区起始字节偏移（含）
    pub start: usize,
    /// 选区结束字节偏移（不含）
    pub end: usize,
    pub instruction: String,
    /// 客户端取词时的正文指纹，正文已变更则请求被拒绝
    pub content_digest: String,
}

#[derive(Debug, Deserialize)]
pub struct EditChapterRequest {
    pub project_id: Uuid,
    pub chapter_id: Uuid,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePointersRequest {
    pub project_id: Uuid,
    pub chapter_id: Uuid,
    pub pointers: String,
}

/// 章节响应。前文摘要是起草的内部上下文，不对外暴露。
#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub id: Uuid,
    pub number: u32,
    pub title: String,
    pub overview: String,
    pub content: String,
    pub pointers: String,
    pub status: String,
    pub integrity_score: Option<u8>,
    pub integrity_report: Option<String>,
}

impl From<ChapterView> for ChapterResponse {
    fn from(view: ChapterView) -> Self {
        Self {
            id: view.id,
            number: view.number,
            title: view.title,
            overview: view.overview,
            content: view.content,
            pointers: view.pointers,
            status: view.status,
            integrity_score: view.integrity_score,
            integrity_report: view.integrity_report,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NarrationResponse {
    pub audio_ref: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// 获取单个章节
pub async fn get_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterRefRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let query = GetChapter {
        project_id: ProjectId::from_uuid(req.project_id),
        chapter_id: ChapterId::from_uuid(req.chapter_id),
    };

    let view = state.get_chapter_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(ChapterResponse::from(view))))
}

/// 起草章节全文
pub async fn draft_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterRefRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let command = DraftChapter {
        project_id: ProjectId::from_uuid(req.project_id),
        chapter_id: ChapterId::from_uuid(req.chapter_id),
    };

    let chapter = state.draft_chapter_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ChapterResponse::from(
        ChapterView::from(&chapter),
    ))))
}

/// 原创性检测
pub async fn check_integrity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterRefRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let command = CheckIntegrity {
        project_id: ProjectId::from_uuid(req.project_id),
        chapter_id: ChapterId::from_uuid(req.chapter_id),
    };

    let chapter = state.check_integrity_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ChapterResponse::from(
        ChapterView::from(&chapter),
    ))))
}

/// 人声化整章重写
pub async fn humanize_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterRefRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let command = HumanizeChapter {
        project_id: ProjectId::from_uuid(req.project_id),
        chapter_id: ChapterId::from_uuid(req.chapter_id),
    };

    let chapter = state.humanize_chapter_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ChapterResponse::from(
        ChapterView::from(&chapter),
    ))))
}

/// 选区改写
pub async fn tweak_selection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TweakSelectionRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let command = TweakSelection {
        project_id: ProjectId::from_uuid(req.project_id),
        chapter_id: ChapterId::from_uuid(req.chapter_id),
        start: req.start,
        end: req.end,
        instruction: req.instruction,
        content_digest: req.content_digest,
    };

    let chapter = state.tweak_selection_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ChapterResponse::from(
        ChapterView::from(&chapter),
    ))))
}

/// 手工编辑正文
pub async fn edit_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EditChapterRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let command = EditChapterContent {
        project_id: ProjectId::from_uuid(req.project_id),
        chapter_id: ChapterId::from_uuid(req.chapter_id),
        content: req.content,
    };

    let chapter = state.edit_chapter_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ChapterResponse::from(
        ChapterView::from(&chapter),
    ))))
}

/// 更新写作要点
pub async fn update_pointers(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdatePointersRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let command = UpdatePointers {
        project_id: ProjectId::from_uuid(req.project_id),
        chapter_id: ChapterId::from_uuid(req.chapter_id),
        pointers: req.pointers,
    };

    let chapter = state.update_pointers_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ChapterResponse::from(
        ChapterView::from(&chapter),
    ))))
}

/// 章节定稿
pub async fn approve_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterRefRequest>,
) -> Result<Json<ApiResponse<ChapterResponse>>, ApiError> {
    let command = ApproveChapter {
        project_id: ProjectId::from_uuid(req.project_id),
        chapter_id: ChapterId::from_uuid(req.chapter_id),
    };

    let chapter = state.approve_chapter_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(ChapterResponse::from(
        ChapterView::from(&chapter),
    ))))
}

/// 旁白试听，音频只随响应返回，不落盘
pub async fn narrate_chapter(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChapterRefRequest>,
) -> Result<Json<ApiResponse<NarrationResponse>>, ApiError> {
    let command = NarrateChapter {
        project_id: ProjectId::from_uuid(req.project_id),
        chapter_id: ChapterId::from_uuid(req.chapter_id),
    };

    let result = state.narrate_chapter_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(NarrationResponse {
        audio_ref: result.audio_ref,
    })))
}
