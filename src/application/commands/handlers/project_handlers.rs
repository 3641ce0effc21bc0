//! Project Command Handlers

use std::sync::Arc;

use crate::application::commands::{CreateProject, GeneratePlan};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    GenerationEnginePort, OperationGuard, OperationKind, OperationScope, OperationTrackerPort,
    OutlineRequest, PersonaRepositoryPort, ProjectRepositoryPort,
};
use crate::domain::project::{EbookProject, PlannedChapter, ProjectError, ProjectPlan};
use crate::infrastructure::events::EventPublisher;

// ============================================================================
// CreateProject
// ============================================================================

/// CreateProject Handler - 建立书籍项目
pub struct CreateProjectHandler {
    persona_repo: Arc<dyn PersonaRepositoryPort>,
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl CreateProjectHandler {
    pub fn new(
        persona_repo: Arc<dyn PersonaRepositoryPort>,
        project_repo: Arc<dyn ProjectRepositoryPort>,
    ) -> Self {
        Self {
            persona_repo,
            project_repo,
        }
    }

    /// 创建时对当前人设做快照（署名存档），生成过程仍读取实时人设
    pub async fn handle(&self, command: CreateProject) -> Result<EbookProject, ApplicationError> {
        let persona = self.persona_repo.load().await?;
        let project = EbookProject::new(command.theme.unwrap_or_default(), persona);
        self.project_repo.save(&project).await?;

        tracing::info!(project_id = %project.id(), theme = %project.theme(), "Project created");
        Ok(project)
    }
}

// ============================================================================
// GeneratePlan
// ============================================================================

/// GeneratePlan Handler - 委托引擎生成主控大纲并重建章节
pub struct GeneratePlanHandler {
    persona_repo: Arc<dyn PersonaRepositoryPort>,
    project_repo: Arc<dyn ProjectRepositoryPort>,
    engine: Arc<dyn GenerationEnginePort>,
    tracker: Arc<dyn OperationTrackerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl GeneratePlanHandler {
    pub fn new(
        persona_repo: Arc<dyn PersonaRepositoryPort>,
        project_repo: Arc<dyn ProjectRepositoryPort>,
        engine: Arc<dyn GenerationEnginePort>,
        tracker: Arc<dyn OperationTrackerPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            persona_repo,
            project_repo,
            engine,
            tracker,
            event_publisher,
        }
    }

    pub async fn handle(&self, command: GeneratePlan) -> Result<EbookProject, ApplicationError> {
        let theme = command.theme.trim().to_string();
        if theme.is_empty() {
            return Err(ProjectError::ThemeRequired.into());
        }

        self.project_repo
            .find_by_id(&command.project_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Project", *command.project_id.as_uuid()))?;
        let persona = self.persona_repo.load().await?;

        // 大纲作用域与该项目全部章节作用域冲突，重建期间章节不可变更
        let guard = OperationGuard::begin(
            self.tracker.clone(),
            OperationKind::OutlineGeneration,
            OperationScope::Outline {
                project_id: command.project_id,
            },
        )?;
        let operation_id = guard.id();
        let token = guard.token();

        let request = OutlineRequest {
            theme: theme.clone(),
            writing_style: persona.writing_style().to_string(),
            professional_history: persona.professional_history().to_string(),
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.engine.generate_outline(request) => Some(result),
        };
        let plan = match outcome {
            None => {
                guard.cancelled();
                return Err(ApplicationError::Cancelled(operation_id));
            }
            Some(Ok(plan)) => plan,
            Some(Err(e)) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        let plan = ProjectPlan {
            title: plan.title,
            subtitle: plan.subtitle,
            target_audience: plan.target_audience,
            chapters: plan
                .chapters
                .into_iter()
                .map(|c| PlannedChapter {
                    title: c.title,
                    overview: c.overview,
                })
                .collect(),
        };

        // 调用期间封面等项目级字段可能更新过，基于最新快照重建
        let mut project = match self.project_repo.find_by_id(&command.project_id).await {
            Ok(Some(project)) => project,
            Ok(None) => {
                guard.fail("project vanished during planning");
                return Err(ApplicationError::not_found(
                    "Project",
                    *command.project_id.as_uuid(),
                ));
            }
            Err(e) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        if let Err(e) = project.apply_plan(theme, plan) {
            guard.fail(e.to_string());
            return Err(e.into());
        }
        if let Err(e) = self.project_repo.save(&project).await {
            guard.fail(e.to_string());
            return Err(e.into());
        }

        guard.complete();
        self.event_publisher.publish_outline_ready(
            *project.id().as_uuid(),
            project.title(),
            project.chapters().len(),
        );
        tracing::info!(
            operation_id = %operation_id,
            project_id = %project.id(),
            title = %project.title(),
            chapter_count = project.chapters().len(),
            "Master plan applied"
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::OperationState;
    use crate::domain::persona::PersonaPatch;
    use crate::domain::project::{ChapterId, ChapterStatus, ProjectId};
    use crate::infrastructure::adapters::engine::{FakeEngine, FakeEngineConfig};
    use crate::infrastructure::memory::{
        InMemoryOperationTracker, InMemoryPersonaStore, InMemoryProjectStore,
    };

    struct Fixture {
        persona_repo: Arc<InMemoryPersonaStore>,
        project_repo: Arc<InMemoryProjectStore>,
        tracker: Arc<InMemoryOperationTracker>,
        events: Arc<EventPublisher>,
    }

    impl Fixture {
        fn new() -> Self {
            let events = EventPublisher::new().arc();
            Self {
                persona_repo: InMemoryPersonaStore::new().arc(),
                project_repo: InMemoryProjectStore::new().arc(),
                tracker: InMemoryOperationTracker::new(events.clone()).arc(),
                events,
            }
        }

        fn plan_handler(&self, engine: FakeEngine) -> GeneratePlanHandler {
            GeneratePlanHandler::new(
                self.persona_repo.clone(),
                self.project_repo.clone(),
                Arc::new(engine),
                self.tracker.clone(),
                self.events.clone(),
            )
        }

        async fn create_project(&self) -> EbookProject {
            CreateProjectHandler::new(self.persona_repo.clone(), self.project_repo.clone())
                .handle(CreateProject {
                    theme: Some("数字极简主义".to_string()),
                })
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_create_project_snapshots_persona() {
        let fixture = Fixture::new();

        let mut persona = fixture.persona_repo.load().await.unwrap();
        persona.apply_patch(PersonaPatch {
            name: Some("林远".to_string()),
            ..Default::default()
        });
        fixture.persona_repo.store(&persona).await.unwrap();

        let project = fixture.create_project().await;
        assert_eq!(project.theme(), "数字极简主义");
        assert_eq!(project.author_persona().name(), "林远");
        assert!(project.chapters().is_empty());

        let stored = fixture
            .project_repo
            .find_by_id(project.id())
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_generate_plan_rebuilds_chapters() {
        let fixture = Fixture::new();
        let project = fixture.create_project().await;

        let handler = fixture.plan_handler(FakeEngine::new(FakeEngineConfig {
            chapter_count: 4,
            ..Default::default()
        }));

        let planned = handler
            .handle(GeneratePlan {
                project_id: *project.id(),
                theme: "数字极简主义".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(planned.title(), "Notes on 数字极简主义");
        assert_eq!(planned.chapters().len(), 4);
        for (idx, chapter) in planned.chapters().iter().enumerate() {
            assert_eq!(chapter.number(), idx as u32 + 1);
            assert_eq!(chapter.status(), ChapterStatus::Drafting);
            assert_eq!(chapter.content(), "");
        }

        let recent = fixture.tracker.recent(1);
        assert_eq!(recent[0].state, OperationState::Completed);
    }

    #[tokio::test]
    async fn test_generate_plan_requires_theme() {
        let fixture = Fixture::new();
        let project = fixture.create_project().await;
        let handler = fixture.plan_handler(FakeEngine::with_defaults());

        let result = handler
            .handle(GeneratePlan {
                project_id: *project.id(),
                theme: "   ".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
        // 验证失败时不注册操作
        assert!(fixture.tracker.recent(1).is_empty());
    }

    #[tokio::test]
    async fn test_generate_plan_unknown_project() {
        let fixture = Fixture::new();
        let handler = fixture.plan_handler(FakeEngine::with_defaults());

        let result = handler
            .handle(GeneratePlan {
                project_id: ProjectId::new(),
                theme: "主题".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_generate_plan_is_destructive() {
        let fixture = Fixture::new();
        let project = fixture.create_project().await;
        let handler = fixture.plan_handler(FakeEngine::with_defaults());

        let planned = handler
            .handle(GeneratePlan {
                project_id: *project.id(),
                theme: "数字极简主义".to_string(),
            })
            .await
            .unwrap();
        let old_chapter_id = *planned.chapters()[0].id();

        // 起草一章后重新规划，全部章节回到空白 drafting 状态
        let drafted = planned.chapters()[0]
            .clone()
            .with_draft("正文".to_string(), "小结".to_string());
        fixture
            .project_repo
            .replace_chapter(planned.id(), drafted)
            .await
            .unwrap();

        let replanned = handler
            .handle(GeneratePlan {
                project_id: *project.id(),
                theme: "远程协作".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(replanned.theme(), "远程协作");
        assert!(replanned.chapter(&old_chapter_id).is_none());
        for chapter in replanned.chapters() {
            assert_eq!(chapter.status(), ChapterStatus::Drafting);
            assert_eq!(chapter.content(), "");
        }
    }

    #[tokio::test]
    async fn test_generate_plan_rejected_while_chapter_busy() {
        let fixture = Fixture::new();
        let project = fixture.create_project().await;

        let _running = fixture
            .tracker
            .start(
                OperationKind::ChapterDraft,
                OperationScope::Chapter {
                    project_id: *project.id(),
                    chapter_id: ChapterId::new(),
                },
            )
            .unwrap();

        let handler = fixture.plan_handler(FakeEngine::with_defaults());
        let result = handler
            .handle(GeneratePlan {
                project_id: *project.id(),
                theme: "主题".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_generate_plan_failure_marks_operation_failed() {
        let fixture = Fixture::new();
        let project = fixture.create_project().await;
        let handler = fixture.plan_handler(FakeEngine::failing());

        let result = handler
            .handle(GeneratePlan {
                project_id: *project.id(),
                theme: "主题".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::ExternalServiceError(_))
        ));
        assert_eq!(fixture.tracker.recent(1)[0].state, OperationState::Failed);
    }
}
