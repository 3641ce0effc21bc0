//! Asset Command Handlers
//!
//! 封面与朗读两类产物:
//! - 封面生成落盘到项目（只改 cover_ref，不整体回写项目）
//! - 朗读合成是瞬态产物，音频引用只随响应返回，不落盘

use std::sync::Arc;

use crate::application::commands::{GenerateCover, NarrateChapter, NarrationResult};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CoverRequest, GenerationEnginePort, NarrationRequest, OperationGuard, OperationKind,
    OperationScope, OperationTrackerPort, ProjectRepositoryPort,
};
use crate::domain::project::{EbookProject, ProjectError};
use crate::infrastructure::events::EventPublisher;

// ============================================================================
// GenerateCover
// ============================================================================

/// GenerateCover Handler - 委托引擎生成封面并写回项目
pub struct GenerateCoverHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    engine: Arc<dyn GenerationEnginePort>,
    tracker: Arc<dyn OperationTrackerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl GenerateCoverHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        engine: Arc<dyn GenerationEnginePort>,
        tracker: Arc<dyn OperationTrackerPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            project_repo,
            engine,
            tracker,
            event_publisher,
        }
    }

    pub async fn handle(&self, command: GenerateCover) -> Result<EbookProject, ApplicationError> {
        let project = self
            .project_repo
            .find_by_id(&command.project_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Project", *command.project_id.as_uuid()))?;

        let guard = OperationGuard::begin(
            self.tracker.clone(),
            OperationKind::CoverArt,
            OperationScope::Cover {
                project_id: command.project_id,
            },
        )?;
        let operation_id = guard.id();
        let token = guard.token();

        let request = CoverRequest {
            title: project.title().to_string(),
            theme: project.theme().to_string(),
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.engine.generate_cover(request) => Some(result),
        };
        let cover_ref = match outcome {
            None => {
                guard.cancelled();
                return Err(ApplicationError::Cancelled(operation_id));
            }
            Some(Ok(cover_ref)) => cover_ref,
            Some(Err(e)) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        // 封面作用域不阻塞章节操作，因此只写 cover_ref 一个字段，
        // 不能把调用前的项目快照整体存回去
        if let Err(e) = self
            .project_repo
            .set_cover(&command.project_id, cover_ref)
            .await
        {
            guard.fail(e.to_string());
            return Err(e.into());
        }
        let updated = match self.project_repo.find_by_id(&command.project_id).await {
            Ok(Some(project)) => project,
            Ok(None) => {
                guard.fail("project vanished");
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

        guard.complete();
        self.event_publisher
            .publish_cover_ready(*command.project_id.as_uuid());
        tracing::info!(
            operation_id = %operation_id,
            project_id = %command.project_id,
            "Cover art stored"
        );
        Ok(updated)
    }
}

// ============================================================================
// NarrateChapter
// ============================================================================

/// NarrateChapter Handler - 委托引擎合成章节朗读音频
pub struct NarrateChapterHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    engine: Arc<dyn GenerationEnginePort>,
    tracker: Arc<dyn OperationTrackerPort>,
    /// 送去合成的正文前缀长度（字符数）
    preview_chars: usize,
}

impl NarrateChapterHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        engine: Arc<dyn GenerationEnginePort>,
        tracker: Arc<dyn OperationTrackerPort>,
        preview_chars: usize,
    ) -> Self {
        Self {
            project_repo,
            engine,
            tracker,
            preview_chars,
        }
    }

    pub async fn handle(
        &self,
        command: NarrateChapter,
    ) -> Result<NarrationResult, ApplicationError> {
        let chapter = self
            .project_repo
            .get_chapter(&command.project_id, &command.chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", *command.chapter_id.as_uuid()))?;
        if chapter.content().is_empty() {
            return Err(ProjectError::EmptyContent(command.chapter_id).into());
        }

        let guard = OperationGuard::begin(
            self.tracker.clone(),
            OperationKind::Narration,
            OperationScope::Narration {
                project_id: command.project_id,
                chapter_id: command.chapter_id,
            },
        )?;
        let operation_id = guard.id();
        let token = guard.token();

        let request = NarrationRequest {
            content: chapter.content().chars().take(self.preview_chars).collect(),
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.engine.narrate(request) => Some(result),
        };
        let audio_ref = match outcome {
            None => {
                guard.cancelled();
                return Err(ApplicationError::Cancelled(operation_id));
            }
            Some(Ok(audio_ref)) => audio_ref,
            Some(Err(e)) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        guard.complete();
        tracing::info!(
            operation_id = %operation_id,
            project_id = %command.project_id,
            chapter_id = %command.chapter_id,
            audio_len = audio_ref.len(),
            "Chapter narration synthesized"
        );
        Ok(NarrationResult { audio_ref })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        DraftRequest, DraftResult, GenerationError, HumanizeRequest, IdentityResearchRequest,
        IntegrityRequest, IntegrityVerdict, OperationState, OutlinePlan, OutlineRequest,
        TweakRequest,
    };
    use crate::domain::persona::AuthorPersona;
    use crate::domain::project::{ChapterId, PlannedChapter, ProjectId, ProjectPlan};
    use crate::infrastructure::adapters::engine::FakeEngine;
    use crate::infrastructure::memory::{InMemoryOperationTracker, InMemoryProjectStore};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 转发到 FakeEngine 并记录封面/朗读入参的引擎
    struct RecordingEngine {
        inner: FakeEngine,
        covers: Mutex<Vec<CoverRequest>>,
        narrations: Mutex<Vec<NarrationRequest>>,
    }

    impl RecordingEngine {
        fn new(inner: FakeEngine) -> Self {
            Self {
                inner,
                covers: Mutex::new(Vec::new()),
                narrations: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerationEnginePort for RecordingEngine {
        async fn research_identity(
            &self,
            request: IdentityResearchRequest,
        ) -> Result<String, GenerationError> {
            self.inner.research_identity(request).await
        }

        async fn generate_outline(
            &self,
            request: OutlineRequest,
        ) -> Result<OutlinePlan, GenerationError> {
            self.inner.generate_outline(request).await
        }

        async fn draft_chapter(
            &self,
            request: DraftRequest,
        ) -> Result<DraftResult, GenerationError> {
            self.inner.draft_chapter(request).await
        }

        async fn check_integrity(
            &self,
            request: IntegrityRequest,
        ) -> Result<IntegrityVerdict, GenerationError> {
            self.inner.check_integrity(request).await
        }

        async fn humanize(&self, request: HumanizeRequest) -> Result<String, GenerationError> {
            self.inner.humanize(request).await
        }

        async fn tweak_selection(&self, request: TweakRequest) -> Result<String, GenerationError> {
            self.inner.tweak_selection(request).await
        }

        async fn generate_cover(&self, request: CoverRequest) -> Result<String, GenerationError> {
            self.covers.lock().unwrap().push(request.clone());
            self.inner.generate_cover(request).await
        }

        async fn narrate(&self, request: NarrationRequest) -> Result<String, GenerationError> {
            self.narrations.lock().unwrap().push(request.clone());
            self.inner.narrate(request).await
        }
    }

    struct Fixture {
        project_repo: Arc<InMemoryProjectStore>,
        tracker: Arc<InMemoryOperationTracker>,
        events: Arc<EventPublisher>,
    }

    impl Fixture {
        fn new() -> Self {
            let events = EventPublisher::new().arc();
            Self {
                project_repo: InMemoryProjectStore::new().arc(),
                tracker: InMemoryOperationTracker::new(events.clone()).arc(),
                events,
            }
        }

        /// 建一个已排章且第一章有正文的项目
        async fn seeded_project(&self) -> EbookProject {
            let mut project =
                EbookProject::new("数字极简主义".to_string(), AuthorPersona::empty());
            project
                .apply_plan(
                    "数字极简主义".to_string(),
                    ProjectPlan {
                        title: "少即是多".to_string(),
                        subtitle: String::new(),
                        target_audience: String::new(),
                        chapters: vec![
                            PlannedChapter {
                                title: "第一章".to_string(),
                                overview: "开篇".to_string(),
                            },
                            PlannedChapter {
                                title: "第二章".to_string(),
                                overview: "展开".to_string(),
                            },
                        ],
                    },
                )
                .unwrap();
            let with_content = project.chapters()[0]
                .clone()
                .with_content("零一二三四五六七".to_string());
            project.replace_chapter(with_content).unwrap();
            self.project_repo.save(&project).await.unwrap();
            project
        }

        fn cover_handler(&self, engine: Arc<dyn GenerationEnginePort>) -> GenerateCoverHandler {
            GenerateCoverHandler::new(
                self.project_repo.clone(),
                engine,
                self.tracker.clone(),
                self.events.clone(),
            )
        }

        fn narrate_handler(
            &self,
            engine: Arc<dyn GenerationEnginePort>,
            preview_chars: usize,
        ) -> NarrateChapterHandler {
            NarrateChapterHandler::new(
                self.project_repo.clone(),
                engine,
                self.tracker.clone(),
                preview_chars,
            )
        }
    }

    #[tokio::test]
    async fn test_generate_cover_stores_reference() {
        let fixture = Fixture::new();
        let project = fixture.seeded_project().await;
        let recording = Arc::new(RecordingEngine::new(FakeEngine::with_defaults()));

        let updated = fixture
            .cover_handler(recording.clone())
            .handle(GenerateCover {
                project_id: *project.id(),
            })
            .await
            .unwrap();

        assert_eq!(updated.cover_ref(), Some("data:image/png;base64,ZmFrZQ=="));

        let covers = recording.covers.lock().unwrap();
        assert_eq!(covers[0].title, "少即是多");
        assert_eq!(covers[0].theme, "数字极简主义");

        let recent = fixture.tracker.recent(1);
        assert_eq!(recent[0].kind, OperationKind::CoverArt);
        assert_eq!(recent[0].state, OperationState::Completed);
    }

    #[tokio::test]
    async fn test_cover_requires_existing_project() {
        let fixture = Fixture::new();

        let result = fixture
            .cover_handler(Arc::new(FakeEngine::with_defaults()))
            .handle(GenerateCover {
                project_id: ProjectId::new(),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
        assert!(fixture.tracker.recent(1).is_empty());
    }

    #[tokio::test]
    async fn test_second_cover_rejected_while_running() {
        let fixture = Fixture::new();
        let project = fixture.seeded_project().await;

        let _running = fixture
            .tracker
            .start(
                OperationKind::CoverArt,
                OperationScope::Cover {
                    project_id: *project.id(),
                },
            )
            .unwrap();

        let result = fixture
            .cover_handler(Arc::new(FakeEngine::with_defaults()))
            .handle(GenerateCover {
                project_id: *project.id(),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_cover_failure_marks_operation_failed() {
        let fixture = Fixture::new();
        let project = fixture.seeded_project().await;

        let result = fixture
            .cover_handler(Arc::new(FakeEngine::failing()))
            .handle(GenerateCover {
                project_id: *project.id(),
            })
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::ExternalServiceError(_))
        ));

        let recent = fixture.tracker.recent(1);
        assert_eq!(recent[0].state, OperationState::Failed);

        let stored = fixture
            .project_repo
            .find_by_id(project.id())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.cover_ref().is_none());
    }

    #[tokio::test]
    async fn test_narration_returns_audio_without_persisting() {
        let fixture = Fixture::new();
        let project = fixture.seeded_project().await;
        let chapter_id = *project.chapters()[0].id();

        let result = fixture
            .narrate_handler(Arc::new(FakeEngine::with_defaults()), 1000)
            .handle(NarrateChapter {
                project_id: *project.id(),
                chapter_id,
            })
            .await
            .unwrap();

        assert_eq!(result.audio_ref, "data:audio/pcm;base64,ZmFrZQ==");

        // 朗读不落盘，章节原样
        let chapter = fixture
            .project_repo
            .get_chapter(project.id(), &chapter_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(chapter.content(), "零一二三四五六七");

        let recent = fixture.tracker.recent(1);
        assert_eq!(recent[0].kind, OperationKind::Narration);
        assert_eq!(recent[0].state, OperationState::Completed);
    }

    #[tokio::test]
    async fn test_narration_requires_content() {
        let fixture = Fixture::new();
        let project = fixture.seeded_project().await;
        // 第二章尚无正文
        let empty_chapter = *project.chapters()[1].id();

        let result = fixture
            .narrate_handler(Arc::new(FakeEngine::with_defaults()), 1000)
            .handle(NarrateChapter {
                project_id: *project.id(),
                chapter_id: empty_chapter,
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
        assert!(fixture.tracker.recent(1).is_empty());
    }

    #[tokio::test]
    async fn test_narration_truncates_preview_by_chars() {
        let fixture = Fixture::new();
        let project = fixture.seeded_project().await;
        let recording = Arc::new(RecordingEngine::new(FakeEngine::with_defaults()));

        fixture
            .narrate_handler(recording.clone(), 5)
            .handle(NarrateChapter {
                project_id: *project.id(),
                chapter_id: *project.chapters()[0].id(),
            })
            .await
            .unwrap();

        let narrations = recording.narrations.lock().unwrap();
        assert_eq!(narrations[0].content, "零一二三四");
    }

    #[tokio::test]
    async fn test_narration_allowed_during_chapter_draft() {
        let fixture = Fixture::new();
        let project = fixture.seeded_project().await;
        let chapter_id = *project.chapters()[0].id();

        let _running = fixture
            .tracker
            .start(
                OperationKind::ChapterDraft,
                OperationScope::Chapter {
                    project_id: *project.id(),
                    chapter_id,
                },
            )
            .unwrap();

        // 朗读只读正文，不受章节作用域阻塞
        fixture
            .narrate_handler(Arc::new(FakeEngine::with_defaults()), 1000)
            .handle(NarrateChapter {
                project_id: *project.id(),
                chapter_id,
            })
            .await
            .unwrap();

        let duplicate = fixture
            .tracker
            .start(
                OperationKind::Narration,
                OperationScope::Narration {
                    project_id: *project.id(),
                    chapter_id,
                },
            )
            .unwrap();
        let second = fixture
            .narrate_handler(Arc::new(FakeEngine::with_defaults()), 1000)
            .handle(NarrateChapter {
                project_id: *project.id(),
                chapter_id,
            })
            .await;
        assert!(matches!(second, Err(ApplicationError::Conflict(_))));
        fixture.tracker.complete(duplicate.id);
    }
}
