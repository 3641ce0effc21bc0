//! Project Queries

use crate::domain::project::{ChapterId, ProjectId};

/// 获取项目详情查询（含全部章节）
#[derive(Debug, Clone)]
pub struct GetProject {
    pub project_id: ProjectId,
}

/// 列出所有项目查询
#[derive(Debug, Clone)]
pub struct ListProjects;

/// 获取单个章节查询
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub project_id: ProjectId,
    pub chapter_id: ChapterId,
}

/// 获取出版就绪度查询
#[derive(Debug, Clone)]
pub struct GetReadiness {
    pub project_id: ProjectId,
}
