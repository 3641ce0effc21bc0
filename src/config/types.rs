//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 生成引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 大纲生成配置
    #[serde(default)]
    pub plan: PlanConfig,

    /// 章节起草配置
    #[serde(default)]
    pub draft: DraftConfig,

    /// 内容检测配置
    #[serde(default)]
    pub integrity: IntegrityConfig,

    /// 朗读预览配置
    #[serde(default)]
    pub narration: NarrationConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            plan: PlanConfig::default(),
            draft: DraftConfig::default(),
            integrity: IntegrityConfig::default(),
            narration: NarrationConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8996
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 生成引擎（Gemini API）配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// API 基础 URL
    #[serde(default = "default_engine_base_url")]
    pub base_url: String,

    /// API Key（通常通过环境变量 BOOKFORGE_ENGINE__API_KEY 注入）
    #[serde(default)]
    pub api_key: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,

    /// 最大重试次数
    #[serde(default)]
    pub max_retries: u32,

    /// 深度推理模型（大纲、章节起草、润色改写）
    #[serde(default = "default_pro_model")]
    pub pro_model: String,

    /// 快速模型（身份调研、内容检测、局部修改）
    #[serde(default = "default_flash_model")]
    pub flash_model: String,

    /// 封面生成模型
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// 朗读合成模型
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// 朗读音色
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,
}

fn default_engine_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_engine_timeout() -> u64 {
    120
}

fn default_pro_model() -> String {
    "gemini-3-pro-preview".to_string()
}

fn default_flash_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_tts_voice() -> String {
    "Kore".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_engine_base_url(),
            api_key: String::new(),
            timeout_secs: default_engine_timeout(),
            max_retries: 0,
            pro_model: default_pro_model(),
            flash_model: default_flash_model(),
            image_model: default_image_model(),
            tts_model: default_tts_model(),
            tts_voice: default_tts_voice(),
        }
    }
}

/// 大纲生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlanConfig {
    /// 请求生成的章节数
    #[serde(default = "default_chapter_count")]
    pub chapter_count: u32,

    /// 每章概要的目标词数
    #[serde(default = "default_overview_words")]
    pub overview_words: u32,
}

fn default_chapter_count() -> u32 {
    10
}

fn default_overview_words() -> u32 {
    50
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            chapter_count: default_chapter_count(),
            overview_words: default_overview_words(),
        }
    }
}

/// 章节起草配置
#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    /// 章节正文的最低词数
    #[serde(default = "default_min_words")]
    pub min_words: u32,

    /// 章节小结的目标词数（用于后续章节的上下文）
    #[serde(default = "default_summary_words")]
    pub summary_words: u32,
}

fn default_min_words() -> u32 {
    1500
}

fn default_summary_words() -> u32 {
    100
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
            summary_words: default_summary_words(),
        }
    }
}

/// 内容检测（AI 痕迹/抄袭风险）配置
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrityConfig {
    /// 风险阈值：score > threshold 时章节被标记为 flagged
    #[serde(default = "default_risk_threshold")]
    pub risk_threshold: u8,

    /// 送检内容的最大字符数（成本控制，超出部分截断）
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_risk_threshold() -> u8 {
    40
}

fn default_max_chars() -> usize {
    5000
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            risk_threshold: default_risk_threshold(),
            max_chars: default_max_chars(),
        }
    }
}

/// 朗读预览配置
#[derive(Debug, Clone, Deserialize)]
pub struct NarrationConfig {
    /// 预览朗读的最大字符数（只朗读章节开头）
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_preview_chars() -> usize {
    1000
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
