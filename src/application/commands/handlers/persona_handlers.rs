//! Persona Command Handlers

use std::sync::Arc;

use crate::application::commands::{ResearchIdentity, UpdatePersona};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    GenerationEnginePort, IdentityResearchRequest, OperationGuard, OperationKind, OperationScope,
    OperationTrackerPort, PersonaRepositoryPort,
};
use crate::domain::persona::AuthorPersona;

// ============================================================================
// UpdatePersona
// ============================================================================

/// UpdatePersona Handler - 局部更新人设字段
pub struct UpdatePersonaHandler {
    persona_repo: Arc<dyn PersonaRepositoryPort>,
}

impl UpdatePersonaHandler {
    pub fn new(persona_repo: Arc<dyn PersonaRepositoryPort>) -> Self {
        Self { persona_repo }
    }

    /// 调研进行中也允许编辑；调研落盘只覆盖职业履历字段
    pub async fn handle(&self, command: UpdatePersona) -> Result<AuthorPersona, ApplicationError> {
        let mut persona = self.persona_repo.load().await?;
        persona.apply_patch(command.patch);
        self.persona_repo.store(&persona).await?;

        tracing::info!(name = %persona.name(), "Persona updated");
        Ok(persona)
    }
}

// ============================================================================
// ResearchIdentity
// ============================================================================

/// ResearchIdentity Handler - 委托引擎调研作者身份
pub struct ResearchIdentityHandler {
    persona_repo: Arc<dyn PersonaRepositoryPort>,
    engine: Arc<dyn GenerationEnginePort>,
    tracker: Arc<dyn OperationTrackerPort>,
}

impl ResearchIdentityHandler {
    pub fn new(
        persona_repo: Arc<dyn PersonaRepositoryPort>,
        engine: Arc<dyn GenerationEnginePort>,
        tracker: Arc<dyn OperationTrackerPort>,
    ) -> Self {
        Self {
            persona_repo,
            engine,
            tracker,
        }
    }

    pub async fn handle(
        &self,
        _command: ResearchIdentity,
    ) -> Result<AuthorPersona, ApplicationError> {
        let persona = self.persona_repo.load().await?;
        let query = persona.identity_query()?;

        let guard = OperationGuard::begin(
            self.tracker.clone(),
            OperationKind::IdentityResearch,
            OperationScope::Persona,
        )?;
        let operation_id = guard.id();
        let token = guard.token();

        let request = IdentityResearchRequest {
            name: query.name,
            handles: query.handles,
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.engine.research_identity(request) => Some(result),
        };
        let summary = match outcome {
            None => {
                guard.cancelled();
                return Err(ApplicationError::Cancelled(operation_id));
            }
            Some(Ok(summary)) => summary,
            Some(Err(e)) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        // 调用期间其它字段可能被编辑过，基于最新快照落盘
        let mut persona = self.persona_repo.load().await?;
        persona.record_research(summary);
        if let Err(e) = self.persona_repo.store(&persona).await {
            guard.fail(e.to_string());
            return Err(e.into());
        }

        guard.complete();
        tracing::info!(
            operation_id = %operation_id,
            name = %persona.name(),
            "Identity research completed"
        );
        Ok(persona)
    }
}
