//! Operation HTTP Handlers
//!
//! 操作登记簿的查询与取消。取消是协作式的：端点返回时记录已是
//! 终态，被取消的那次委托调用各自以 errno 499 结束。

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CancelOperation, GetOperation, ListRecentOperations, OperationView,
};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GetOperationRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RecentOperationsRequest {
    /// 省略时由服务端取默认条数
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct CancelOperationRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct OperationResponse {
    pub id: Uuid,
    pub kind: String,
    pub scope: String,
    pub state: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub error: Option<String>,
}

impl From<OperationView> for OperationResponse {
    fn from(view: OperationView) -> Self {
        Self {
            id: view.id,
            kind: view.kind,
            scope: view.scope,
            state: view.state,
            started_at: view.started_at,
            finished_at: view.finished_at,
            error: view.error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecentOperationsResponse {
    pub total: usize,
    pub operations: Vec<OperationResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 查询单个操作
pub async fn get_operation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetOperationRequest>,
) -> Result<Json<ApiResponse<OperationResponse>>, ApiError> {
    let query = GetOperation {
        operation_id: req.id,
    };

    let view = state.get_operation_handler.handle(query).await?;
    Ok(Json(ApiResponse::success(OperationResponse::from(view))))
}

/// 最近操作列表，新的在前
pub async fn recent_operations(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecentOperationsRequest>,
) -> Result<Json<ApiResponse<RecentOperationsResponse>>, ApiError> {
    let query = ListRecentOperations { limit: req.limit };

    let views = state
        .list_recent_operations_handler
        .handle(query)
        .await?;
    let operations: Vec<OperationResponse> =
        views.into_iter().map(OperationResponse::from).collect();

    Ok(Json(ApiResponse::success(RecentOperationsResponse {
        total: operations.len(),
        operations,
    })))
}

/// 取消运行中的操作
pub async fn cancel_operation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CancelOperationRequest>,
) -> Result<Json<ApiResponse<OperationResponse>>, ApiError> {
    let command = CancelOperation {
        operation_id: req.id,
    };

    let record = state.cancel_operation_handler.handle(command).await?;
    Ok(Json(ApiResponse::success(OperationResponse::from(
        OperationView::from(record),
    ))))
}
