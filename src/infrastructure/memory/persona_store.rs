//! In-Memory Persona Store Implementation

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::application::ports::{PersonaRepositoryPort, RepositoryError};
use crate::domain::persona::AuthorPersona;

/// 内存人设存储
///
/// 工作区人设是单例，启动时为一份空人设，load 永远有值。
pub struct InMemoryPersonaStore {
    persona: RwLock<AuthorPersona>,
}

impl InMemoryPersonaStore {
    pub fn new() -> Self {
        Self {
            persona: RwLock::new(AuthorPersona::empty()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl PersonaRepositoryPort for InMemoryPersonaStore {
    async fn load(&self) -> Result<AuthorPersona, RepositoryError> {
        let guard = self
            .persona
            .read()
            .map_err(|_| RepositoryError::InvariantViolation("persona lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    async fn store(&self, persona: &AuthorPersona) -> Result<(), RepositoryError> {
        let mut guard = self
            .persona
            .write()
            .map_err(|_| RepositoryError::InvariantViolation("persona lock poisoned".to_string()))?;
        *guard = persona.clone();
        Ok(())
    }
}

impl Default for InMemoryPersonaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::persona::PersonaPatch;

    #[tokio::test]
    async fn test_load_starts_empty() {
        let store = InMemoryPersonaStore::new();
        let persona = store.load().await.unwrap();
        assert_eq!(persona.name(), "");
        assert_eq!(persona.professional_history(), "");
    }

    #[tokio::test]
    async fn test_store_round_trip() {
        let store = InMemoryPersonaStore::new();

        let mut persona = store.load().await.unwrap();
        persona.apply_patch(PersonaPatch {
            name: Some("林远".to_string()),
            writing_style: Some("克制、数据驱动".to_string()),
            ..Default::default()
        });
        store.store(&persona).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.name(), "林远");
        assert_eq!(loaded.writing_style(), "克制、数据驱动");
    }
}
