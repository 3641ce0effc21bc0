//! Persona Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::PersonaRepositoryPort;
use crate::application::queries::GetPersona;
use crate::domain::persona::AuthorPersona;

// ============================================================================
// Response DTOs
// ============================================================================

/// 人设视图
#[derive(Debug, Clone)]
pub struct PersonaView {
    pub name: String,
    pub professional_history: String,
    pub writing_style: String,
    pub core_why: String,
    pub personal_stories: String,
    pub social_handles: String,
    pub updated_at: String,
}

impl From<&AuthorPersona> for PersonaView {
    fn from(persona: &AuthorPersona) -> Self {
        Self {
            name: persona.name().to_string(),
            professional_history: persona.professional_history().to_string(),
            writing_style: persona.writing_style().to_string(),
            core_why: persona.core_why().to_string(),
            personal_stories: persona.personal_stories().to_string(),
            social_handles: persona.social_handles().to_string(),
            updated_at: persona.updated_at().to_rfc3339(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetPersona Handler
pub struct GetPersonaHandler {
    persona_repo: Arc<dyn PersonaRepositoryPort>,
}

impl GetPersonaHandler {
    pub fn new(persona_repo: Arc<dyn PersonaRepositoryPort>) -> Self {
        Self { persona_repo }
    }

    pub async fn handle(&self, _query: GetPersona) -> Result<PersonaView, ApplicationError> {
        let persona = self.persona_repo.load().await?;
        Ok(PersonaView::from(&persona))
    }
}
