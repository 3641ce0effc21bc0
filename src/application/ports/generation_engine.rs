//! Generation Engine Port - 生成引擎抽象
//!
//! 外部生成服务的窄接口: 每种委托意图一个方法，便于整体替换底层供应商
//! 而不触碰领域层的状态机。具体实现在 infrastructure/adapters 层。

use async_trait::async_trait;
use thiserror::Error;

/// 生成引擎错误
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 身份调研请求
#[derive(Debug, Clone)]
pub struct IdentityResearchRequest {
    /// 作者姓名
    pub name: String,
    /// 社交账号
    pub handles: String,
}

/// 大纲生成请求
#[derive(Debug, Clone)]
pub struct OutlineRequest {
    /// 书籍主题
    pub theme: String,
    /// 作者写作风格（语气上下文）
    pub writing_style: String,
    /// 作者职业履历（背景上下文）
    pub professional_history: String,
}

/// 大纲中的章节条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineChapter {
    pub title: String,
    pub overview: String,
}

/// 大纲生成结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlinePlan {
    pub title: String,
    pub subtitle: String,
    pub target_audience: String,
    pub chapters: Vec<OutlineChapter>,
}

/// 章节起草请求
#[derive(Debug, Clone)]
pub struct DraftRequest {
    /// 章节编号
    pub chapter_number: u32,
    /// 章节标题
    pub chapter_title: String,
    /// 章节概要（本章写作目标）
    pub chapter_overview: String,
    /// 作者的自由指示
    pub pointers: String,
    /// 书名
    pub book_title: String,
    /// 书籍主题
    pub theme: String,
    /// 作者写作风格
    pub writing_style: String,
    /// 作者职业履历
    pub professional_history: String,
    /// 前序章节的连载上下文
    pub running_summary: String,
}

/// 章节起草结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftResult {
    /// 章节正文（Markdown）
    pub content: String,
    /// 章节小结（供后续章节作上下文）
    pub summary: String,
}

/// 内容检测请求（调用方已按配置截断）
#[derive(Debug, Clone)]
pub struct IntegrityRequest {
    pub content: String,
}

/// 内容检测结果
///
/// score 为引擎原始返回值，越界值由领域层收敛。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityVerdict {
    pub score: i64,
    pub report: String,
}

/// 润色改写请求
#[derive(Debug, Clone)]
pub struct HumanizeRequest {
    pub content: String,
}

/// 局部修改请求
#[derive(Debug, Clone)]
pub struct TweakRequest {
    /// 选中的原文
    pub selected_text: String,
    /// 修改指示
    pub instruction: String,
}

/// 封面生成请求
#[derive(Debug, Clone)]
pub struct CoverRequest {
    pub title: String,
    pub theme: String,
}

/// 朗读合成请求（调用方已截断为预览片段）
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    pub content: String,
}

/// Generation Engine Port
///
/// 每个方法对应一种委托意图。结构化意图在适配器内做防御性默认值解析:
/// 字段缺失/无法解析时以安全默认值代替，而不是把解析失败上抛。
#[async_trait]
pub trait GenerationEnginePort: Send + Sync {
    /// 身份调研: 返回职业履历摘要（默认值 "No information found."）
    async fn research_identity(
        &self,
        request: IdentityResearchRequest,
    ) -> Result<String, GenerationError>;

    /// 大纲生成: 返回书籍元信息与章节列表（解析失败时为空大纲）
    async fn generate_outline(
        &self,
        request: OutlineRequest,
    ) -> Result<OutlinePlan, GenerationError>;

    /// 章节起草: 返回正文与小结
    /// （默认值 "Error generating content." / 空小结）
    async fn draft_chapter(&self, request: DraftRequest) -> Result<DraftResult, GenerationError>;

    /// 内容检测: 返回得分与报告（解析失败时 score 0 / "Error checking"）
    async fn check_integrity(
        &self,
        request: IntegrityRequest,
    ) -> Result<IntegrityVerdict, GenerationError>;

    /// 润色改写: 返回整章重写文本（空响应时原样返回输入）
    async fn humanize(&self, request: HumanizeRequest) -> Result<String, GenerationError>;

    /// 局部修改: 返回替换文本（空响应时原样返回选中文本）
    async fn tweak_selection(&self, request: TweakRequest) -> Result<String, GenerationError>;

    /// 封面生成: 返回图片 data URL（无图片时为空字符串）
    async fn generate_cover(&self, request: CoverRequest) -> Result<String, GenerationError>;

    /// 朗读合成: 返回音频 data URL（无音频时为空字符串）
    async fn narrate(&self, request: NarrationRequest) -> Result<String, GenerationError>;

    /// 检查引擎是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
