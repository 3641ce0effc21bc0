//! Project Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::Chapter;
use super::errors::ProjectError;
use super::value_objects::{ChapterId, ProjectId};
use crate::domain::persona::AuthorPersona;

/// 大纲中的章节条目（仅标题 + 概要）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChapter {
    pub title: String,
    pub overview: String,
}

/// 一次大纲生成的完整产出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPlan {
    pub title: String,
    pub subtitle: String,
    pub target_audience: String,
    pub chapters: Vec<PlannedChapter>,
}

/// 出版就绪度统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    /// 章节总数
    pub total: usize,
    /// 可出版章节数（有正文且未被标记）
    pub completed: usize,
    /// 完成百分比（无章节时为 0）
    pub percent: u8,
}

/// EbookProject 聚合根 - 电子书项目
///
/// 不变量:
/// - 章节顺序即叙事顺序，number 在重新规划时按 1..N 连续编号
/// - 章节变更只能通过 replace_chapter 以替换方式进行，
///   替换不允许变更章节的 id 与 number
/// - author_persona 是创建时的人设快照，此后不随工作区人设同步
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbookProject {
    id: ProjectId,
    theme: String,
    title: String,
    subtitle: String,
    target_audience: String,
    author_persona: AuthorPersona,
    chapters: Vec<Chapter>,
    cover_ref: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EbookProject {
    /// 创建新项目（持有当前工作区人设的快照）
    pub fn new(theme: String, persona: AuthorPersona) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            theme,
            title: String::new(),
            subtitle: String::new(),
            target_audience: String::new(),
            author_persona: persona,
            chapters: Vec::new(),
            cover_ref: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 应用大纲: 整体替换项目元信息与章节序列
    ///
    /// 破坏性重建: 不与既有大纲合并，旧章节的全部内容被丢弃。
    /// 新章节按返回顺序编号 1..N，状态为 drafting，正文/小结/指示为空。
    pub fn apply_plan(&mut self, theme: String, plan: ProjectPlan) -> Result<(), ProjectError> {
        if theme.trim().is_empty() {
            return Err(ProjectError::ThemeRequired);
        }

        self.theme = theme;
        self.title = plan.title;
        self.subtitle = plan.subtitle;
        self.target_audience = plan.target_audience;
        self.chapters = plan
            .chapters
            .into_iter()
            .enumerate()
            .map(|(idx, seed)| Chapter::planned(idx as u32 + 1, seed.title, seed.overview))
            .collect();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 按 id 查找章节
    pub fn chapter(&self, chapter_id: &ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id() == chapter_id)
    }

    /// 以替换方式更新章节
    ///
    /// 集中执行身份不变量: 目标章节必须存在，且替换不改变编号。
    pub fn replace_chapter(&mut self, next: Chapter) -> Result<(), ProjectError> {
        let position = self
            .chapters
            .iter()
            .position(|c| c.id() == next.id())
            .ok_or(ProjectError::ChapterNotFound(*next.id()))?;

        let current_number = self.chapters[position].number();
        if next.number() != current_number {
            return Err(ProjectError::ChapterNumberMismatch {
                expected: current_number,
                actual: next.number(),
            });
        }

        self.chapters[position] = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 构建目标章节之前的连载上下文
    ///
    /// 取 number 严格小于 target_number 的全部章节，按编号升序拼出
    /// `"Chapter {number}: {summary}"` 行，与章节在序列中的物理顺序无关。
    pub fn running_summary_before(&self, target_number: u32) -> String {
        let mut prior: Vec<&Chapter> = self
            .chapters
            .iter()
            .filter(|c| c.number() < target_number)
            .collect();
        prior.sort_by_key(|c| c.number());
        prior
            .iter()
            .map(|c| format!("Chapter {}: {}", c.number(), c.summary()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 设置封面引用
    pub fn set_cover(&mut self, cover_ref: String) {
        self.cover_ref = Some(cover_ref);
        self.updated_at = Utc::now();
    }

    /// 出版就绪度统计
    pub fn readiness(&self) -> ReadinessReport {
        let total = self.chapters.len();
        let completed = self
            .chapters
            .iter()
            .filter(|c| c.is_publication_ready())
            .count();
        let percent = if total == 0 {
            0
        } else {
            (completed * 100 / total) as u8
        };
        ReadinessReport {
            total,
            completed,
            percent,
        }
    }

    // Getters
    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn target_audience(&self) -> &str {
        &self.target_audience
    }

    pub fn author_persona(&self) -> &AuthorPersona {
        &self.author_persona
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn cover_ref(&self) -> Option<&str> {
        self.cover_ref.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::IntegrityScore;

    fn plan_of(count: usize) -> ProjectPlan {
        ProjectPlan {
            title: "数字倦怠".to_string(),
            subtitle: "重夺注意力".to_string(),
            target_audience: "长期过载的知识工作者".to_string(),
            chapters: (1..=count)
                .map(|i| PlannedChapter {
                    title: format!("第{}章", i),
                    overview: format!("第{}章概要", i),
                })
                .collect(),
        }
    }

    fn planned_project(count: usize) -> EbookProject {
        let mut project = EbookProject::new(String::new(), AuthorPersona::empty());
        project
            .apply_plan("数字倦怠".to_string(), plan_of(count))
            .unwrap();
        project
    }

    #[test]
    fn test_apply_plan_numbers_chapters_contiguously() {
        let project = planned_project(10);
        assert_eq!(project.title(), "数字倦怠");
        assert_eq!(project.chapters().len(), 10);
        for (idx, chapter) in project.chapters().iter().enumerate() {
            assert_eq!(chapter.number(), idx as u32 + 1);
            assert_eq!(
                chapter.status(),
                crate::domain::project::ChapterStatus::Drafting
            );
            assert!(chapter.content().is_empty());
            assert!(chapter.summary().is_empty());
        }
    }

    #[test]
    fn test_apply_plan_requires_theme() {
        let mut project = EbookProject::new(String::new(), AuthorPersona::empty());
        assert!(matches!(
            project.apply_plan("  ".to_string(), plan_of(3)),
            Err(ProjectError::ThemeRequired)
        ));
    }

    #[test]
    fn test_replan_discards_prior_content() {
        let mut project = planned_project(3);
        let chapter = project.chapters()[0].clone();
        project
            .replace_chapter(chapter.with_draft("旧正文".to_string(), "旧小结".to_string()))
            .unwrap();

        project
            .apply_plan("新的主题".to_string(), plan_of(5))
            .unwrap();

        assert_eq!(project.chapters().len(), 5);
        assert!(project.chapters().iter().all(|c| c.content().is_empty()));
        assert_eq!(project.theme(), "新的主题");
    }

    #[test]
    fn test_replace_chapter_enforces_identity() {
        let mut project = planned_project(3);
        let chapter = project.chapters()[1].clone();
        let id = *chapter.id();

        project
            .replace_chapter(chapter.with_draft("正文".to_string(), "小结".to_string()))
            .unwrap();
        assert_eq!(project.chapter(&id).unwrap().content(), "正文");

        // 不在项目里的章节不可替换
        let stranger = Chapter::planned(2, "外来章节".to_string(), "".to_string());
        assert!(matches!(
            project.replace_chapter(stranger),
            Err(ProjectError::ChapterNotFound(_))
        ));
    }

    #[test]
    fn test_running_summary_ignores_vec_order() {
        let mut project = planned_project(4);
        for i in 0..4 {
            let chapter = project.chapters()[i].clone();
            let number = chapter.number();
            project
                .replace_chapter(chapter.with_draft(
                    format!("第{}章正文", number),
                    format!("第{}章小结", number),
                ))
                .unwrap();
        }

        // 物理顺序打乱后上下文依然按编号升序
        project.chapters.reverse();

        let context = project.running_summary_before(4);
        assert_eq!(
            context,
            "Chapter 1: 第1章小结\nChapter 2: 第2章小结\nChapter 3: 第3章小结"
        );
        assert!(!context.contains("第4章"));
    }

    #[test]
    fn test_chapter_summary_feeds_forward_not_backward() {
        let mut project = planned_project(10);
        let third = project.chapters()[2].clone();
        project
            .replace_chapter(third.with_draft("第三章正文".to_string(), "第三章小结".to_string()))
            .unwrap();

        let for_fourth = project.running_summary_before(4);
        assert!(for_fourth.contains("Chapter 3: 第三章小结"));

        let for_second = project.running_summary_before(2);
        assert!(!for_second.contains("第三章小结"));
    }

    #[test]
    fn test_readiness_counts() {
        let mut project = planned_project(4);
        // 两章有正文，其中一章被标记
        let first = project.chapters()[0].clone();
        project
            .replace_chapter(first.with_draft("a".to_string(), "s".to_string()))
            .unwrap();
        let second = project.chapters()[1].clone();
        project
            .replace_chapter(
                second
                    .with_draft("b".to_string(), "s".to_string())
                    .with_integrity(IntegrityScore::new(90), "高风险".to_string(), 40),
            )
            .unwrap();

        let report = project.readiness();
        assert_eq!(report.total, 4);
        assert_eq!(report.completed, 1);
        assert_eq!(report.percent, 25);
    }

    #[test]
    fn test_readiness_on_empty_project() {
        let project = EbookProject::new("主题".to_string(), AuthorPersona::empty());
        let report = project.readiness();
        assert_eq!(report.total, 0);
        assert_eq!(report.percent, 0);
    }
}
