//! Project Commands - 书籍项目命令

use crate::domain::project::ProjectId;

/// 创建书籍项目命令
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// 初始主题，可省略（后续生成大纲时再提供）
    pub theme: Option<String>,
}

/// 生成主控大纲命令 - 覆盖项目元信息并重建全部章节
#[derive(Debug, Clone)]
pub struct GeneratePlan {
    pub project_id: ProjectId,
    pub theme: String,
}
