//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 业务规则违反
    #[error("Business rule violation: {0}")]
    BusinessRuleViolation(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 并发冲突（作用域占用 / 选区失效）
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 操作已被取消
    #[error("Operation cancelled: {0}")]
    Cancelled(Uuid),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建业务规则违反错误
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 创建冲突错误
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<crate::application::ports::RepositoryError> for ApplicationError {
    fn from(err: crate::application::ports::RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<crate::application::ports::GenerationError> for ApplicationError {
    fn from(err: crate::application::ports::GenerationError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<crate::application::ports::OperationError> for ApplicationError {
    fn from(err: crate::application::ports::OperationError) -> Self {
        use crate::application::ports::OperationError;
        match err {
            OperationError::ScopeBusy { .. } => Self::Conflict(err.to_string()),
            OperationError::NotFound(id) => Self::not_found("Operation", id),
            OperationError::AlreadyFinished(_) => Self::InvalidState(err.to_string()),
        }
    }
}

impl From<crate::domain::persona::PersonaError> for ApplicationError {
    fn from(err: crate::domain::persona::PersonaError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<crate::domain::project::ProjectError> for ApplicationError {
    fn from(err: crate::domain::project::ProjectError) -> Self {
        use crate::domain::project::ProjectError;
        match err {
            ProjectError::NotFound(id) => Self::not_found("Project", *id.as_uuid()),
            ProjectError::ChapterNotFound(id) => Self::not_found("Chapter", *id.as_uuid()),
            ProjectError::ChapterNumberMismatch { .. } => {
                Self::BusinessRuleViolation(err.to_string())
            }
            ProjectError::EmptyContent(_) => Self::ValidationError(err.to_string()),
            ProjectError::NotApprovable { .. } => Self::InvalidState(err.to_string()),
            ProjectError::ThemeRequired => Self::ValidationError(err.to_string()),
        }
    }
}

impl From<crate::domain::project::SelectionError> for ApplicationError {
    fn from(err: crate::domain::project::SelectionError) -> Self {
        use crate::domain::project::SelectionError;
        match err {
            SelectionError::StaleContent => Self::Conflict(err.to_string()),
            _ => Self::ValidationError(err.to_string()),
        }
    }
}
