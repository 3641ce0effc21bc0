//! Project Context - Errors

use thiserror::Error;

use super::entities::ChapterStatus;
use super::value_objects::{ChapterId, ProjectId};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("项目不存在: {0}")]
    NotFound(ProjectId),

    #[error("章节不存在: {0}")]
    ChapterNotFound(ChapterId),

    #[error("章节编号不可变更: 期望 {expected}, 实际 {actual}")]
    ChapterNumberMismatch { expected: u32, actual: u32 },

    #[error("章节正文为空: {0}")]
    EmptyContent(ChapterId),

    #[error("章节状态 {status} 不允许定稿: {chapter_id}")]
    NotApprovable {
        chapter_id: ChapterId,
        status: ChapterStatus,
    },

    #[error("书籍主题不能为空")]
    ThemeRequired,
}

/// 选区校验错误（局部修改）
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("选区起止位置无效: [{start}, {end})")]
    InvalidRange { start: usize, end: usize },

    #[error("选区超出正文范围: 结束位置 {end}, 正文长度 {len}")]
    OutOfBounds { end: usize, len: usize },

    #[error("选区未对齐字符边界")]
    NotCharBoundary,

    #[error("正文已变更, 选区失效")]
    StaleContent,
}
