//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/persona/get       GET   获取工作区人设
//! - /api/persona/update    POST  局部更新人设
//! - /api/persona/research  POST  身份调研（委托引擎）
//! - /api/project/create    POST  创建书籍项目
//! - /api/project/list      GET   列出所有项目
//! - /api/project/get       POST  获取项目详情
//! - /api/project/plan      POST  生成主控大纲（委托引擎）
//! - /api/project/cover     POST  生成封面（委托引擎）
//! - /api/project/readiness POST  出版就绪度
//! - /api/chapter/get       POST  获取章节
//! - /api/chapter/draft     POST  起草章节全文（委托引擎）
//! - /api/chapter/check     POST  原创性检测（委托引擎）
//! - /api/chapter/humanize  POST  人声化重写（委托引擎）
//! - /api/chapter/tweak     POST  选区改写（委托引擎）
//! - /api/chapter/edit      POST  手工编辑正文
//! - /api/chapter/pointers  POST  更新写作要点
//! - /api/chapter/approve   POST  章节定稿
//! - /api/chapter/narrate   POST  旁白试听（委托引擎，音频不落盘）
//! - /api/operation/get     POST  查询单个操作
//! - /api/operation/recent  POST  最近操作列表
//! - /api/operation/cancel  POST  取消运行中的操作
//! - /ws/events             WS    全局事件 WebSocket

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/persona", persona_routes())
        .nest("/project", project_routes())
        .nest("/chapter", chapter_routes())
        .nest("/operation", operation_routes())
}

/// Persona 路由
fn persona_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", get(handlers::get_persona))
        .route("/update", post(handlers::update_persona))
        .route("/research", post(handlers::research_identity))
}

/// Project 路由
fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_project))
        .route("/list", get(handlers::list_projects))
        .route("/get", post(handlers::get_project))
        .route("/plan", post(handlers::generate_plan))
        .route("/cover", post(handlers::generate_cover))
        .route("/readiness", post(handlers::get_readiness))
}

/// Chapter 路由
fn chapter_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_chapter))
        .route("/draft", post(handlers::draft_chapter))
        .route("/check", post(handlers::check_integrity))
        .route("/humanize", post(handlers::humanize_chapter))
        .route("/tweak", post(handlers::tweak_selection))
        .route("/edit", post(handlers::edit_chapter))
        .route("/pointers", post(handlers::update_pointers))
        .route("/approve", post(handlers::approve_chapter))
        .route("/narrate", post(handlers::narrate_chapter))
}

/// Operation 路由
fn operation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_operation))
        .route("/recent", post(handlers::recent_operations))
        .route("/cancel", post(handlers::cancel_operation))
}
