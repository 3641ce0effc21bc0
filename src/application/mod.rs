//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（GenerationEngine、Repository、OperationTracker）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Persona commands
    ResearchIdentity,
    UpdatePersona,
    // Project commands
    CreateProject,
    GeneratePlan,
    // Chapter commands
    ApproveChapter,
    CheckIntegrity,
    DraftChapter,
    EditChapterContent,
    HumanizeChapter,
    TweakSelection,
    UpdatePointers,
    // Asset commands
    GenerateCover,
    NarrateChapter,
    NarrationResult,
    // Operation commands
    CancelOperation,
    // Handlers
    handlers::{
        ApproveChapterHandler, CancelOperationHandler, CheckIntegrityHandler,
        CreateProjectHandler, DraftChapterHandler, EditChapterContentHandler,
        GenerateCoverHandler, GeneratePlanHandler, HumanizeChapterHandler,
        NarrateChapterHandler, ResearchIdentityHandler, TweakSelectionHandler,
        UpdatePersonaHandler, UpdatePointersHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Generation engine
    CoverRequest,
    DraftRequest,
    DraftResult,
    GenerationEnginePort,
    GenerationError,
    HumanizeRequest,
    IdentityResearchRequest,
    IntegrityRequest,
    IntegrityVerdict,
    NarrationRequest,
    OutlineChapter,
    OutlinePlan,
    OutlineRequest,
    TweakRequest,
    // Operation tracker
    OperationError,
    OperationGuard,
    OperationKind,
    OperationRecord,
    OperationScope,
    OperationState,
    OperationTrackerPort,
    StartedOperation,
    // Repositories
    PersonaRepositoryPort,
    ProjectRepositoryPort,
    RepositoryError,
};

pub use queries::{
    // Persona queries
    GetPersona,
    // Project queries
    GetChapter,
    GetProject,
    GetReadiness,
    ListProjects,
    // Operation queries
    GetOperation,
    ListRecentOperations,
    // Handlers
    handlers::{
        ChapterView, GetChapterHandler, GetOperationHandler, GetPersonaHandler,
        GetProjectHandler, GetReadinessHandler, ListProjectsHandler,
        ListRecentOperationsHandler, OperationView, PersonaView, ProjectSummaryView,
        ProjectView, ReadinessRow, ReadinessView,
    },
};
