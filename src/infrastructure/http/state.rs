//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    ApproveChapterHandler, CancelOperationHandler, CheckIntegrityHandler, CreateProjectHandler,
    DraftChapterHandler, EditChapterContentHandler, GenerateCoverHandler, GeneratePlanHandler,
    HumanizeChapterHandler, NarrateChapterHandler, ResearchIdentityHandler,
    TweakSelectionHandler, UpdatePersonaHandler, UpdatePointersHandler,
    // Query handlers
    GetChapterHandler, GetOperationHandler, GetPersonaHandler, GetProjectHandler,
    GetReadinessHandler, ListProjectsHandler, ListRecentOperationsHandler,
    // Ports
    GenerationEnginePort, OperationTrackerPort, PersonaRepositoryPort, ProjectRepositoryPort,
};
use crate::config::AppConfig;
use crate::infrastructure::events::EventPublisher;

/// 应用状态
///
/// 仓储与操作注册表均为内存实现，随进程生命周期存续。
pub struct AppState {
    // ========== Ports ==========
    pub persona_repo: Arc<dyn PersonaRepositoryPort>,
    pub project_repo: Arc<dyn ProjectRepositoryPort>,
    pub tracker: Arc<dyn OperationTrackerPort>,
    pub engine: Arc<dyn GenerationEnginePort>,
    pub event_publisher: Arc<EventPublisher>,

    // ========== Command Handlers ==========
    pub update_persona_handler: UpdatePersonaHandler,
    pub research_identity_handler: ResearchIdentityHandler,
    pub create_project_handler: CreateProjectHandler,
    pub generate_plan_handler: GeneratePlanHandler,
    pub draft_chapter_handler: DraftChapterHandler,
    pub check_integrity_handler: CheckIntegrityHandler,
    pub humanize_chapter_handler: HumanizeChapterHandler,
    pub tweak_selection_handler: TweakSelectionHandler,
    pub edit_chapter_handler: EditChapterContentHandler,
    pub update_pointers_handler: UpdatePointersHandler,
    pub approve_chapter_handler: ApproveChapterHandler,
    pub generate_cover_handler: GenerateCoverHandler,
    pub narrate_chapter_handler: NarrateChapterHandler,
    pub cancel_operation_handler: CancelOperationHandler,

    // ========== Query Handlers ==========
    pub get_persona_handler: GetPersonaHandler,
    pub get_project_handler: GetProjectHandler,
    pub list_projects_handler: ListProjectsHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub get_readiness_handler: GetReadinessHandler,
    pub get_operation_handler: GetOperationHandler,
    pub list_recent_operations_handler: ListRecentOperationsHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        persona_repo: Arc<dyn PersonaRepositoryPort>,
        project_repo: Arc<dyn ProjectRepositoryPort>,
        tracker: Arc<dyn OperationTrackerPort>,
        engine: Arc<dyn GenerationEnginePort>,
        event_publisher: Arc<EventPublisher>,
        config: &AppConfig,
    ) -> Self {
        Self {
            // Ports
            persona_repo: persona_repo.clone(),
            project_repo: project_repo.clone(),
            tracker: tracker.clone(),
            engine: engine.clone(),
            event_publisher: event_publisher.clone(),

            // Command handlers
            update_persona_handler: UpdatePersonaHandler::new(persona_repo.clone()),
            research_identity_handler: ResearchIdentityHandler::new(
                persona_repo.clone(),
                engine.clone(),
                tracker.clone(),
            ),
            create_project_handler: CreateProjectHandler::new(
                persona_repo.clone(),
                project_repo.clone(),
            ),
            generate_plan_handler: GeneratePlanHandler::new(
                persona_repo.clone(),
                project_repo.clone(),
                engine.clone(),
                tracker.clone(),
                event_publisher.clone(),
            ),
            draft_chapter_handler: DraftChapterHandler::new(
                persona_repo.clone(),
                project_repo.clone(),
                engine.clone(),
                tracker.clone(),
                event_publisher.clone(),
            ),
            check_integrity_handler: CheckIntegrityHandler::new(
                project_repo.clone(),
                engine.clone(),
                tracker.clone(),
                event_publisher.clone(),
                config.integrity.risk_threshold,
                config.integrity.max_chars,
            ),
            humanize_chapter_handler: HumanizeChapterHandler::new(
                project_repo.clone(),
                engine.clone(),
                tracker.clone(),
                event_publisher.clone(),
            ),
            tweak_selection_handler: TweakSelectionHandler::new(
                project_repo.clone(),
                engine.clone(),
                tracker.clone(),
                event_publisher.clone(),
            ),
            edit_chapter_handler: EditChapterContentHandler::new(
                project_repo.clone(),
                tracker.clone(),
                event_publisher.clone(),
            ),
            update_pointers_handler: UpdatePointersHandler::new(
                project_repo.clone(),
                tracker.clone(),
            ),
            approve_chapter_handler: ApproveChapterHandler::new(
                project_repo.clone(),
                tracker.clone(),
                event_publisher.clone(),
            ),
            generate_cover_handler: GenerateCoverHandler::new(
                project_repo.clone(),
                engine.clone(),
                tracker.clone(),
                event_publisher.clone(),
            ),
            narrate_chapter_handler: NarrateChapterHandler::new(
                project_repo.clone(),
                engine.clone(),
                tracker.clone(),
                config.narration.preview_chars,
            ),
            cancel_operation_handler: CancelOperationHandler::new(tracker.clone()),

            // Query handlers
            get_persona_handler: GetPersonaHandler::new(persona_repo.clone()),
            get_project_handler: GetProjectHandler::new(project_repo.clone()),
            list_projects_handler: ListProjectsHandler::new(project_repo.clone()),
            get_chapter_handler: GetChapterHandler::new(project_repo.clone()),
            get_readiness_handler: GetReadinessHandler::new(project_repo.clone()),
            get_operation_handler: GetOperationHandler::new(tracker.clone()),
            list_recent_operations_handler: ListRecentOperationsHandler::new(tracker.clone()),
        }
    }
}
