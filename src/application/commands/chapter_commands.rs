//! Chapter Commands - 章节命令
//!
//! 分两类：委托引擎的长耗时命令（起草、检测、人声化、局部改写）
//! 与同步落盘的短命令（编辑正文、更新要点、定稿）。

use crate::domain::project::{ChapterId, ProjectId};

/// 起草章节命令 - 依据章节目标与前文摘要生成全文
#[derive(Debug, Clone)]
pub struct DraftChapter {
    pub project_id: ProjectId,
    pub chapter_id: ChapterId,
}

/// 原创性检测命令 - 检测结果决定章节进入待审还是被标记
#[derive(Debug, Clone)]
pub struct CheckIntegrity {
    pub project_id: ProjectId,
    pub chapter_id: ChapterId,
}

/// 人声化重写命令 - 整章重写并清除既有检测结论
#[derive(Debug, Clone)]
pub struct HumanizeChapter {
    pub project_id: ProjectId,
    pub chapter_id: ChapterId,
}

/// 选区改写命令
///
/// `content_digest` 是客户端取词时的正文指纹，改写落盘前会
/// 再次核对，正文已变更则拒绝，避免陈旧选区错位拼接。
#[derive(Debug, Clone)]
pub struct TweakSelection {
    pub project_id: ProjectId,
    pub chapter_id: ChapterId,
    /// 选区起始字节偏移（含）
    pub start: usize,
    /// 选区结束字节偏移（不含）
    pub end: usize,
    pub instruction: String,
    pub content_digest: String,
}

/// 手工编辑正文命令 - 整体替换正文并使既有检测结论失效
#[derive(Debug, Clone)]
pub struct EditChapterContent {
    pub project_id: ProjectId,
    pub chapter_id: ChapterId,
    pub content: String,
}

/// 更新写作要点命令 - 不影响章节状态
#[derive(Debug, Clone)]
pub struct UpdatePointers {
    pub project_id: ProjectId,
    pub chapter_id: ChapterId,
    pub pointers: String,
}

/// 章节定稿命令 - 仅待审且正文非空的章节可定稿
#[derive(Debug, Clone)]
pub struct ApproveChapter {
    pub project_id: ProjectId,
    pub chapter_id: ChapterId,
}
