//! Project Context - Entities

use serde::{Deserialize, Serialize};

use super::errors::ProjectError;
use super::value_objects::{ChapterId, IntegrityScore};

/// 章节状态
///
/// 状态机:
/// - drafting -> review: 起草成功
/// - review <-> flagged: 每次内容检测按得分与阈值比较
/// - flagged -> review: 润色改写成功（同时清空检测结果）
/// - 任意状态 -> review: 正文被替换（手工编辑 / 局部修改）
/// - review -> final: 显式定稿（要求正文非空）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterStatus {
    /// 起草中（初始状态，尚无正文）
    Drafting,
    /// 待审阅
    Review,
    /// 检测超标被标记
    Flagged,
    /// 已定稿
    Final,
}

impl ChapterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterStatus::Drafting => "drafting",
            ChapterStatus::Review => "review",
            ChapterStatus::Flagged => "flagged",
            ChapterStatus::Final => "final",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "drafting" => Some(ChapterStatus::Drafting),
            "review" => Some(ChapterStatus::Review),
            "flagged" => Some(ChapterStatus::Flagged),
            "final" => Some(ChapterStatus::Final),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChapterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chapter 实体 - 章节
///
/// 不变量:
/// - number 在项目内从 1 开始连续编号，创建后不变
/// - 所有变更以替换整个实体的方式进行（replace, don't mutate）
/// - 正文被替换时检测结果一并清空，得分永远不会描述已变更的内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 章节标识
    id: ChapterId,
    /// 章节编号（从 1 开始）
    number: u32,
    /// 章节标题
    title: String,
    /// 大纲级概要
    overview: String,
    /// 正文（Markdown）
    content: String,
    /// 小结（仅作为后续章节的生成上下文，不对外展示）
    summary: String,
    /// 章节状态
    status: ChapterStatus,
    /// 作者的自由指示（生成时需要遵循）
    pointers: String,
    /// 内容检测得分
    integrity_score: Option<IntegrityScore>,
    /// 内容检测报告
    integrity_report: Option<String>,
}

impl Chapter {
    /// 从大纲条目创建章节（status = drafting，正文/小结/指示为空）
    pub fn planned(number: u32, title: String, overview: String) -> Self {
        Self {
            id: ChapterId::new(),
            number,
            title,
            overview,
            content: String::new(),
            summary: String::new(),
            status: ChapterStatus::Drafting,
            pointers: String::new(),
            integrity_score: None,
            integrity_report: None,
        }
    }

    /// 起草完成: 替换正文与小结，进入 review
    pub fn with_draft(self, content: String, summary: String) -> Self {
        Self {
            content,
            summary,
            status: ChapterStatus::Review,
            integrity_score: None,
            integrity_report: None,
            ..self
        }
    }

    /// 记录检测结果: score > threshold 进入 flagged，否则回到 review
    pub fn with_integrity(self, score: IntegrityScore, report: String, threshold: u8) -> Self {
        let status = if score.exceeds(threshold) {
            ChapterStatus::Flagged
        } else {
            ChapterStatus::Review
        };
        Self {
            status,
            integrity_score: Some(score),
            integrity_report: Some(report),
            ..self
        }
    }

    /// 替换正文（手工编辑 / 局部修改 / 润色改写共用）
    ///
    /// 任何正文替换都会清空检测结果并回到 review，
    /// 已定稿章节也会因此退回待审阅。
    pub fn with_content(self, content: String) -> Self {
        Self {
            content,
            status: ChapterStatus::Review,
            integrity_score: None,
            integrity_report: None,
            ..self
        }
    }

    /// 替换作者指示（不影响状态与检测结果）
    pub fn with_pointers(self, pointers: String) -> Self {
        Self { pointers, ..self }
    }

    /// 定稿: 仅允许 review 状态且正文非空的章节
    pub fn approved(self) -> Result<Self, ProjectError> {
        if self.content.is_empty() {
            return Err(ProjectError::EmptyContent(self.id));
        }
        if self.status != ChapterStatus::Review {
            return Err(ProjectError::NotApprovable {
                chapter_id: self.id,
                status: self.status,
            });
        }
        Ok(Self {
            status: ChapterStatus::Final,
            ..self
        })
    }

    /// 是否达到可出版状态（有正文且未被标记）
    pub fn is_publication_ready(&self) -> bool {
        !self.content.is_empty() && self.status != ChapterStatus::Flagged
    }

    // Getters
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn overview(&self) -> &str {
        &self.overview
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn status(&self) -> ChapterStatus {
        self.status
    }

    pub fn pointers(&self) -> &str {
        &self.pointers
    }

    pub fn integrity_score(&self) -> Option<IntegrityScore> {
        self.integrity_score
    }

    pub fn integrity_report(&self) -> Option<&str> {
        self.integrity_report.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drafted_chapter() -> Chapter {
        Chapter::planned(1, "初识倦怠".to_string(), "引出数字倦怠的概念".to_string())
            .with_draft("第一章正文。".to_string(), "介绍了倦怠的由来。".to_string())
    }

    #[test]
    fn test_planned_chapter_initial_state() {
        let chapter = Chapter::planned(3, "边界".to_string(), "划定注意力边界".to_string());
        assert_eq!(chapter.number(), 3);
        assert_eq!(chapter.status(), ChapterStatus::Drafting);
        assert!(chapter.content().is_empty());
        assert!(chapter.summary().is_empty());
        assert!(chapter.pointers().is_empty());
        assert!(chapter.integrity_score().is_none());
    }

    #[test]
    fn test_draft_moves_to_review() {
        let chapter = drafted_chapter();
        assert_eq!(chapter.status(), ChapterStatus::Review);
        assert_eq!(chapter.content(), "第一章正文。");
        assert_eq!(chapter.summary(), "介绍了倦怠的由来。");
    }

    #[test]
    fn test_integrity_flagging_over_full_score_range() {
        for raw in 0..=100u8 {
            let chapter = drafted_chapter().with_integrity(
                IntegrityScore::new(raw),
                "报告".to_string(),
                40,
            );
            if raw > 40 {
                assert_eq!(chapter.status(), ChapterStatus::Flagged, "score = {}", raw);
            } else {
                assert_eq!(chapter.status(), ChapterStatus::Review, "score = {}", raw);
            }
            assert_eq!(chapter.integrity_score().unwrap().value(), raw);
            assert_eq!(chapter.integrity_report(), Some("报告"));
        }
    }

    #[test]
    fn test_content_replacement_clears_findings() {
        let flagged = drafted_chapter().with_integrity(
            IntegrityScore::new(55),
            "AI 痕迹明显".to_string(),
            40,
        );
        assert_eq!(flagged.status(), ChapterStatus::Flagged);

        let humanized = flagged.with_content("改写后的正文。".to_string());
        assert_eq!(humanized.status(), ChapterStatus::Review);
        assert!(humanized.integrity_score().is_none());
        assert!(humanized.integrity_report().is_none());
    }

    #[test]
    fn test_redraft_clears_findings() {
        let rechecked = drafted_chapter()
            .with_integrity(IntegrityScore::new(30), "Clean".to_string(), 40)
            .with_draft("重写的正文。".to_string(), "重写小结。".to_string());
        assert!(rechecked.integrity_score().is_none());
        assert_eq!(rechecked.status(), ChapterStatus::Review);
    }

    #[test]
    fn test_approve_requires_review_and_content() {
        let chapter = drafted_chapter();
        let finalized = chapter.approved().unwrap();
        assert_eq!(finalized.status(), ChapterStatus::Final);

        // 定稿后再次手工编辑会退回 review
        let edited = finalized.with_content("定稿后的修改。".to_string());
        assert_eq!(edited.status(), ChapterStatus::Review);

        // 无正文不可定稿
        let empty = Chapter::planned(1, "空".to_string(), "".to_string());
        assert!(empty.approved().is_err());

        // flagged 不可定稿
        let flagged = drafted_chapter().with_integrity(
            IntegrityScore::new(90),
            "高风险".to_string(),
            40,
        );
        assert!(flagged.approved().is_err());
    }

    #[test]
    fn test_pointers_do_not_touch_status() {
        let chapter = drafted_chapter()
            .with_integrity(IntegrityScore::new(20), "Clean".to_string(), 40)
            .with_pointers("补充真实案例".to_string());
        assert_eq!(chapter.pointers(), "补充真实案例");
        assert_eq!(chapter.status(), ChapterStatus::Review);
        assert!(chapter.integrity_score().is_some());
    }

    #[test]
    fn test_publication_readiness() {
        assert!(!Chapter::planned(1, "t".to_string(), "o".to_string()).is_publication_ready());
        assert!(drafted_chapter().is_publication_ready());
        let flagged = drafted_chapter().with_integrity(
            IntegrityScore::new(80),
            "高风险".to_string(),
            40,
        );
        assert!(!flagged.is_publication_ready());
    }

    #[test]
    fn test_status_str_round_trip() {
        for status in [
            ChapterStatus::Drafting,
            ChapterStatus::Review,
            ChapterStatus::Flagged,
            ChapterStatus::Final,
        ] {
            assert_eq!(ChapterStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(ChapterStatus::from_str("unknown"), None);
    }
}
