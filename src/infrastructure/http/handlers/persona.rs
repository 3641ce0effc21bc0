//! Persona HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{GetPersona, PersonaView, ResearchIdentity, UpdatePersona};
use crate::domain::persona::PersonaPatch;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdatePersonaRequest {
    pub name: Option<String>,
    pub professional_history: Option<String>,
    pub writing_style: Option<String>,
    pub core_why: Option<String>,
    pub personal_stories: Option<String>,
    pub social_handles: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PersonaResponse {
    pub name: String,
    pub professional_history: String,
    pub writing_style: String,
    pub core_why: String,
    pub personal_stories: String,
    pub social_handles: String,
    pub updated_at: String,
}

impl From<PersonaView> for PersonaResponse {
    fn from(view: PersonaView) -> Self {
        Self {
            name: view.name,
            professional_history: view.professional_history,
            writing_style: view.writing_style,
            core_why: view.core_why,
            personal_stories: view.personal_stories,
            social_handles: view.social_handles,
            updated_at: view.updated_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 获取工作区人设
pub async fn get_persona(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PersonaResponse>>, ApiError> {
    let view = state.get_persona_handler.handle(GetPersona).await?;
    Ok(Json(ApiResponse::success(PersonaResponse::from(view))))
}

/// 更新人设（为 None 的字段不动）
pub async fn update_persona(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdatePersonaRequest>,
) -> Result<Json<ApiResponse<PersonaResponse>>, ApiError> {
    let command = UpdatePersona {
        patch: PersonaPatch {
            name: req.name,
            professional_history: req.professional_history,
            writing_style: req.writing_style,
            core_why: req.core_why,
            personal_stories: req.personal_stories,
            social_handles: req.social_handles,
        },
    };

    let persona = state.update_persona_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(PersonaResponse::from(
        PersonaView::from(&persona),
    ))))
}

/// 触发身份调研（响应在引擎返回或操作被取消后给出）
pub async fn research_identity(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PersonaResponse>>, ApiError> {
    let persona = state
        .research_identity_handler
        .handle(ResearchIdentity)
        .await?;

    Ok(Json(ApiResponse::success(PersonaResponse::from(
        PersonaView::from(&persona),
    ))))
}
