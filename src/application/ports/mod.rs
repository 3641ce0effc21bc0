//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod generation_engine;
mod operation_tracker;
mod repositories;

pub use generation_engine::{
    CoverRequest, DraftRequest, DraftResult, GenerationEnginePort, GenerationError,
    HumanizeRequest, IdentityResearchRequest, IntegrityRequest, IntegrityVerdict,
    NarrationRequest, OutlineChapter, OutlinePlan, OutlineRequest, TweakRequest,
};
pub use operation_tracker::{
    OperationError, OperationGuard, OperationKind, OperationRecord, OperationScope,
    OperationState, OperationTrackerPort, StartedOperation,
};
pub use repositories::{PersonaRepositoryPort, ProjectRepositoryPort, RepositoryError};
