//! Asset Commands - 封面与旁白命令

use serde::Serialize;

use crate::domain::project::{ChapterId, ProjectId};

/// 生成封面命令 - 以项目标题与主题为画面提示词
#[derive(Debug, Clone)]
pub struct GenerateCover {
    pub project_id: ProjectId,
}

/// 章节旁白试听命令 - 朗读正文开头片段，音频不落盘
#[derive(Debug, Clone)]
pub struct NarrateChapter {
    pub project_id: ProjectId,
    pub chapter_id: ChapterId,
}

/// 旁白结果
#[derive(Debug, Clone, Serialize)]
pub struct NarrationResult {
    /// data URL 形式的音频引用，仅随响应返回，不落盘
    pub audio_ref: String,
}
