//! Chapter Command Handlers
//!
//! 章节写路径分两类:
//! - 委托命令（起草/检测/润色/局部修改）: 注册操作、持有作用域、
//!   与取消令牌一起 select 引擎调用，落盘前在作用域内重读章节。
//! - 同步命令（编辑/要点/定稿）: 落盘前探测作用域空闲，直接走仓储。

use std::sync::Arc;

use crate::application::commands::{
    ApproveChapter, CheckIntegrity, DraftChapter, EditChapterContent, HumanizeChapter,
    TweakSelection, UpdatePointers,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    DraftRequest, GenerationEnginePort, HumanizeRequest, IntegrityRequest, OperationGuard,
    OperationKind, OperationScope, OperationTrackerPort, PersonaRepositoryPort,
    ProjectRepositoryPort, TweakRequest,
};
use crate::domain::project::{
    Chapter, ChapterId, IntegrityScore, ProjectError, ProjectId, Selection,
};
use crate::infrastructure::events::EventPublisher;

fn chapter_scope(project_id: ProjectId, chapter_id: ChapterId) -> OperationScope {
    OperationScope::Chapter {
        project_id,
        chapter_id,
    }
}

async fn load_chapter(
    project_repo: &Arc<dyn ProjectRepositoryPort>,
    project_id: &ProjectId,
    chapter_id: &ChapterId,
) -> Result<Chapter, ApplicationError> {
    project_repo
        .get_chapter(project_id, chapter_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Chapter", *chapter_id.as_uuid()))
}

fn publish_status(events: &EventPublisher, project_id: &ProjectId, chapter: &Chapter) {
    events.publish_chapter_status(
        *project_id.as_uuid(),
        *chapter.id().as_uuid(),
        chapter.number(),
        chapter.status().as_str(),
        chapter.integrity_score().map(|s| s.value()),
    );
}

// ============================================================================
// DraftChapter
// ============================================================================

/// DraftChapter Handler - 委托引擎起草章节全文
pub struct DraftChapterHandler {
    persona_repo: Arc<dyn PersonaRepositoryPort>,
    project_repo: Arc<dyn ProjectRepositoryPort>,
    engine: Arc<dyn GenerationEnginePort>,
    tracker: Arc<dyn OperationTrackerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl DraftChapterHandler {
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

    pub async fn handle(&self, command: DraftChapter) -> Result<Chapter, ApplicationError> {
        let project = self
            .project_repo
            .find_by_id(&command.project_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Project", *command.project_id.as_uuid()))?;
        project
            .chapter(&command.chapter_id)
            .ok_or_else(|| ApplicationError::not_found("Chapter", *command.chapter_id.as_uuid()))?;
        let persona = self.persona_repo.load().await?;

        let guard = OperationGuard::begin(
            self.tracker.clone(),
            OperationKind::ChapterDraft,
            chapter_scope(command.project_id, command.chapter_id),
        )?;
        let operation_id = guard.id();
        let token = guard.token();

        // 作用域已持有，重读章节拿最新的标题/概要/要点
        let chapter = match load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await
        {
            Ok(chapter) => chapter,
            Err(e) => {
                guard.fail(e.to_string());
                return Err(e);
            }
        };

        let request = DraftRequest {
            chapter_number: chapter.number(),
            chapter_title: chapter.title().to_string(),
            chapter_overview: chapter.overview().to_string(),
            pointers: chapter.pointers().to_string(),
            book_title: project.title().to_string(),
            theme: project.theme().to_string(),
            writing_style: persona.writing_style().to_string(),
            professional_history: persona.professional_history().to_string(),
            running_summary: project.running_summary_before(chapter.number()),
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.engine.draft_chapter(request) => Some(result),
        };
        let draft = match outcome {
            None => {
                guard.cancelled();
                return Err(ApplicationError::Cancelled(operation_id));
            }
            Some(Ok(draft)) => draft,
            Some(Err(e)) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        let next = chapter.with_draft(draft.content, draft.summary);
        if let Err(e) = self
            .project_repo
            .replace_chapter(&command.project_id, next.clone())
            .await
        {
            guard.fail(e.to_string());
            return Err(e.into());
        }

        guard.complete();
        publish_status(&self.event_publisher, &command.project_id, &next);
        tracing::info!(
            operation_id = %operation_id,
            project_id = %command.project_id,
            chapter_id = %command.chapter_id,
            number = next.number(),
            content_len = next.content().len(),
            "Chapter draft stored"
        );
        Ok(next)
    }
}

// ============================================================================
// CheckIntegrity
// ============================================================================

/// CheckIntegrity Handler - 委托引擎检测并依据阈值定状态
pub struct CheckIntegrityHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    engine: Arc<dyn GenerationEnginePort>,
    tracker: Arc<dyn OperationTrackerPort>,
    event_publisher: Arc<EventPublisher>,
    /// 超过该分数的章节被标记
    risk_threshold: u8,
    /// 送检正文的最大字符数
    max_chars: usize,
}

impl CheckIntegrityHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        engine: Arc<dyn GenerationEnginePort>,
        tracker: Arc<dyn OperationTrackerPort>,
        event_publisher: Arc<EventPublisher>,
        risk_threshold: u8,
        max_chars: usize,
    ) -> Self {
        Self {
            project_repo,
            engine,
            tracker,
            event_publisher,
            risk_threshold,
            max_chars,
        }
    }

    pub async fn handle(&self, command: CheckIntegrity) -> Result<Chapter, ApplicationError> {
        let chapter = load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await?;
        if chapter.content().is_empty() {
            return Err(ProjectError::EmptyContent(command.chapter_id).into());
        }

        let guard = OperationGuard::begin(
            self.tracker.clone(),
            OperationKind::IntegrityCheck,
            chapter_scope(command.project_id, command.chapter_id),
        )?;
        let operation_id = guard.id();
        let token = guard.token();

        // 送检与落盘基于同一份作用域内快照
        let chapter = match load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await
        {
            Ok(chapter) => chapter,
            Err(e) => {
                guard.fail(e.to_string());
                return Err(e);
            }
        };

        let request = IntegrityRequest {
            content: chapter.content().chars().take(self.max_chars).collect(),
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.engine.check_integrity(request) => Some(result),
        };
        let verdict = match outcome {
            None => {
                guard.cancelled();
                return Err(ApplicationError::Cancelled(operation_id));
            }
            Some(Ok(verdict)) => verdict,
            Some(Err(e)) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        let score = IntegrityScore::from_raw(verdict.score);
        let next = chapter.with_integrity(score, verdict.report, self.risk_threshold);
        if let Err(e) = self
            .project_repo
            .replace_chapter(&command.project_id, next.clone())
            .await
        {
            guard.fail(e.to_string());
            return Err(e.into());
        }

        guard.complete();
        publish_status(&self.event_publisher, &command.project_id, &next);
        tracing::info!(
            operation_id = %operation_id,
            project_id = %command.project_id,
            chapter_id = %command.chapter_id,
            score = score.value(),
            status = %next.status(),
            "Integrity verdict stored"
        );
        Ok(next)
    }
}

// ============================================================================
// HumanizeChapter
// ============================================================================

/// HumanizeChapter Handler - 委托引擎整章重写，清除既有检测结论
pub struct HumanizeChapterHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    engine: Arc<dyn GenerationEnginePort>,
    tracker: Arc<dyn OperationTrackerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl HumanizeChapterHandler {
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

    pub async fn handle(&self, command: HumanizeChapter) -> Result<Chapter, ApplicationError> {
        let chapter = load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await?;
        if chapter.content().is_empty() {
            return Err(ProjectError::EmptyContent(command.chapter_id).into());
        }

        let guard = OperationGuard::begin(
            self.tracker.clone(),
            OperationKind::HumanizeRewrite,
            chapter_scope(command.project_id, command.chapter_id),
        )?;
        let operation_id = guard.id();
        let token = guard.token();

        let chapter = match load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await
        {
            Ok(chapter) => chapter,
            Err(e) => {
                guard.fail(e.to_string());
                return Err(e);
            }
        };

        let request = HumanizeRequest {
            content: chapter.content().to_string(),
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.engine.humanize(request) => Some(result),
        };
        let rewritten = match outcome {
            None => {
                guard.cancelled();
                return Err(ApplicationError::Cancelled(operation_id));
            }
            Some(Ok(rewritten)) => rewritten,
            Some(Err(e)) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        let next = chapter.with_content(rewritten);
        if let Err(e) = self
            .project_repo
            .replace_chapter(&command.project_id, next.clone())
            .await
        {
            guard.fail(e.to_string());
            return Err(e.into());
        }

        guard.complete();
        publish_status(&self.event_publisher, &command.project_id, &next);
        tracing::info!(
            operation_id = %operation_id,
            project_id = %command.project_id,
            chapter_id = %command.chapter_id,
            "Chapter humanized"
        );
        Ok(next)
    }
}

// ============================================================================
// TweakSelection
// ============================================================================

/// TweakSelection Handler - 选区级改写
///
/// 指纹核对发生两次: 注册前预检（无效请求不产生操作记录），
/// 注册后在作用域内对最新正文复核，复核通过的正文同时是拼接基底。
pub struct TweakSelectionHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    engine: Arc<dyn GenerationEnginePort>,
    tracker: Arc<dyn OperationTrackerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl TweakSelectionHandler {
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

    pub async fn handle(&self, command: TweakSelection) -> Result<Chapter, ApplicationError> {
        if command.instruction.trim().is_empty() {
            return Err(ApplicationError::validation(
                "Tweak instruction must not be empty",
            ));
        }
        let selection = Selection::new(command.start, command.end, command.content_digest.clone())?;

        let chapter = load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await?;
        selection.verify(chapter.content())?;

        let guard = OperationGuard::begin(
            self.tracker.clone(),
            OperationKind::SelectionTweak,
            chapter_scope(command.project_id, command.chapter_id),
        )?;
        let operation_id = guard.id();
        let token = guard.token();

        let chapter = match load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await
        {
            Ok(chapter) => chapter,
            Err(e) => {
                guard.fail(e.to_string());
                return Err(e);
            }
        };
        let selected = match selection.verify(chapter.content()) {
            Ok(text) => text.to_string(),
            Err(e) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        let request = TweakRequest {
            selected_text: selected,
            instruction: command.instruction.clone(),
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.engine.tweak_selection(request) => Some(result),
        };
        let replacement = match outcome {
            None => {
                guard.cancelled();
                return Err(ApplicationError::Cancelled(operation_id));
            }
            Some(Ok(replacement)) => replacement,
            Some(Err(e)) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        let next_content = match selection.splice(chapter.content(), &replacement) {
            Ok(content) => content,
            Err(e) => {
                guard.fail(e.to_string());
                return Err(e.into());
            }
        };

        let next = chapter.with_content(next_content);
        if let Err(e) = self
            .project_repo
            .replace_chapter(&command.project_id, next.clone())
            .await
        {
            guard.fail(e.to_string());
            return Err(e.into());
        }

        guard.complete();
        publish_status(&self.event_publisher, &command.project_id, &next);
        tracing::info!(
            operation_id = %operation_id,
            project_id = %command.project_id,
            chapter_id = %command.chapter_id,
            range = ?(command.start..command.end),
            "Selection tweak applied"
        );
        Ok(next)
    }
}

// ============================================================================
// EditChapterContent (同步)
// ============================================================================

/// EditChapterContent Handler - 手工整体替换正文
pub struct EditChapterContentHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    tracker: Arc<dyn OperationTrackerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl EditChapterContentHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        tracker: Arc<dyn OperationTrackerPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            project_repo,
            tracker,
            event_publisher,
        }
    }

    pub async fn handle(&self, command: EditChapterContent) -> Result<Chapter, ApplicationError> {
        self.tracker
            .ensure_free(&chapter_scope(command.project_id, command.chapter_id))?;

        let chapter = load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await?;

        // 定稿章节也允许手工改动，改动后回到待审
        let next = chapter.with_content(command.content);
        self.project_repo
            .replace_chapter(&command.project_id, next.clone())
            .await?;

        publish_status(&self.event_publisher, &command.project_id, &next);
        tracing::info!(
            project_id = %command.project_id,
            chapter_id = %command.chapter_id,
            content_len = next.content().len(),
            "Chapter content edited"
        );
        Ok(next)
    }
}

// ============================================================================
// UpdatePointers (同步)
// ============================================================================

/// UpdatePointers Handler - 更新写作要点，状态保持不变
pub struct UpdatePointersHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    tracker: Arc<dyn OperationTrackerPort>,
}

impl UpdatePointersHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        tracker: Arc<dyn OperationTrackerPort>,
    ) -> Self {
        Self {
            project_repo,
            tracker,
        }
    }

    pub async fn handle(&self, command: UpdatePointers) -> Result<Chapter, ApplicationError> {
        self.tracker
            .ensure_free(&chapter_scope(command.project_id, command.chapter_id))?;

        let chapter = load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await?;

        let next = chapter.with_pointers(command.pointers);
        self.project_repo
            .replace_chapter(&command.project_id, next.clone())
            .await?;

        tracing::info!(
            project_id = %command.project_id,
            chapter_id = %command.chapter_id,
            "Chapter pointers updated"
        );
        Ok(next)
    }
}

// ============================================================================
// ApproveChapter (同步)
// ============================================================================

/// ApproveChapter Handler - 显式定稿
pub struct ApproveChapterHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    tracker: Arc<dyn OperationTrackerPort>,
    event_publisher: Arc<EventPublisher>,
}

impl ApproveChapterHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        tracker: Arc<dyn OperationTrackerPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            project_repo,
            tracker,
            event_publisher,
        }
    }

    pub async fn handle(&self, command: ApproveChapter) -> Result<Chapter, ApplicationError> {
        self.tracker
            .ensure_free(&chapter_scope(command.project_id, command.chapter_id))?;

        let chapter = load_chapter(
            &self.project_repo,
            &command.project_id,
            &command.chapter_id,
        )
        .await?;

        let next = chapter.approved()?;
        self.project_repo
            .replace_chapter(&command.project_id, next.clone())
            .await?;

        publish_status(&self.event_publisher, &command.project_id, &next);
        tracing::info!(
            project_id = %command.project_id,
            chapter_id = %command.chapter_id,
            number = next.number(),
            "Chapter approved"
        );
        Ok(next)
    }
}
