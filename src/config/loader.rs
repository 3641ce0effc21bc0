//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `BOOKFORGE_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `BOOKFORGE_SERVER__HOST=127.0.0.1`
/// - `BOOKFORGE_SERVER__PORT=8080`
/// - `BOOKFORGE_ENGINE__API_KEY=xxxx`
/// - `BOOKFORGE_INTEGRITY__RISK_THRESHOLD=60`
///
/// # 返回
/// - `Ok(AppConfig)` - 成功加载的配置
/// - `Err(ConfigError)` - 加载失败
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8996)?
        .set_default("engine.base_url", "https://generativelanguage.googleapis.com")?
        .set_default("engine.api_key", "")?
        .set_default("engine.timeout_secs", 120)?
        .set_default("engine.max_retries", 0)?
        .set_default("engine.pro_model", "gemini-3-pro-preview")?
        .set_default("engine.flash_model", "gemini-3-flash-preview")?
        .set_default("engine.image_model", "gemini-2.5-flash-image")?
        .set_default("engine.tts_model", "gemini-2.5-flash-preview-tts")?
        .set_default("engine.tts_voice", "Kore")?
        .set_default("plan.chapter_count", 10)?
        .set_default("plan.overview_words", 50)?
        .set_default("draft.min_words", 1500)?
        .set_default("draft.summary_words", 100)?
        .set_default("integrity.risk_threshold", 40)?
        .set_default("integrity.max_chars", 5000)?
        .set_default("narration.preview_chars", 1000)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: BOOKFORGE_
    // 层级分隔符: __ (双下划线)
    // 例如: BOOKFORGE_ENGINE__API_KEY=xxxx
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("BOOKFORGE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 验证引擎 URL
    if config.engine.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine base URL cannot be empty".to_string(),
        ));
    }

    // 验证模型配置
    if config.engine.pro_model.is_empty() || config.engine.flash_model.is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine model names cannot be empty".to_string(),
        ));
    }

    // 验证检测阈值（score 范围为 0-100）
    if config.integrity.risk_threshold > 100 {
        return Err(ConfigError::ValidationError(
            "Integrity risk threshold must be in 0..=100".to_string(),
        ));
    }

    // 验证大纲章节数
    if config.plan.chapter_count == 0 {
        return Err(ConfigError::ValidationError(
            "Plan chapter count cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
///
/// API key 不打印，只标注是否已配置。
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Engine URL: {}", config.engine.base_url);
    tracing::info!("Engine Timeout: {}s", config.engine.timeout_secs);
    tracing::info!("Engine API Key: {}", if config.engine.api_key.is_empty() { "(not set)" } else { "(set)" });
    tracing::info!("Pro Model: {}", config.engine.pro_model);
    tracing::info!("Flash Model: {}", config.engine.flash_model);
    tracing::info!("Image Model: {}", config.engine.image_model);
    tracing::info!("TTS Model: {} (voice: {})", config.engine.tts_model, config.engine.tts_voice);
    tracing::info!("Plan: {} chapters", config.plan.chapter_count);
    tracing::info!("Integrity Threshold: {}", config.integrity.risk_threshold);
    tracing::info!("Integrity Max Chars: {}", config.integrity.max_chars);
    tracing::info!("Narration Preview Chars: {}", config.narration.preview_chars);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8996);
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_engine_url() {
        let mut config = AppConfig::default();
        config.engine.base_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_threshold_out_of_range() {
        let mut config = AppConfig::default();
        config.integrity.risk_threshold = 101;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_chapter_count() {
        let mut config = AppConfig::default();
        config.plan.chapter_count = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_config_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9001\n\n[integrity]\nrisk_threshold = 60\n",
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.integrity.risk_threshold, 60);
        // 未覆写的键保持默认值
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.narration.preview_chars, 1000);
    }
}
