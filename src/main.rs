//! BookForge - AI 电子书创作工作台
//!
//! - Domain: persona/, project/ (Bounded Contexts)
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, adapters, events

use std::sync::Arc;

use bookforge::config::{load_config, print_config};
use bookforge::infrastructure::adapters::{GeminiClient, GeminiClientConfig};
// use bookforge::infrastructure::adapters::FakeEngine;
use bookforge::infrastructure::events::EventPublisher;
use bookforge::infrastructure::http::{AppState, HttpServer, ServerConfig};
use bookforge::infrastructure::memory::{
    InMemoryOperationTracker, InMemoryPersonaStore, InMemoryProjectStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},bookforge={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!("BookForge - AI 电子书创作工作台");
    print_config(&config);

    // 内存态：人设单例、项目聚合、操作登记簿
    let persona_repo = Arc::new(InMemoryPersonaStore::new());
    let project_repo = Arc::new(InMemoryProjectStore::new());

    // 事件发布器（操作登记簿的状态变更经由它广播）
    let event_publisher = Arc::new(EventPublisher::new());
    let tracker = Arc::new(InMemoryOperationTracker::new(event_publisher.clone()));

    // 创建 Gemini 引擎
    let engine_config = GeminiClientConfig {
        base_url: config.engine.base_url.clone(),
        api_key: config.engine.api_key.clone(),
        timeout_secs: config.engine.timeout_secs,
        max_retries: config.engine.max_retries,
        pro_model: config.engine.pro_model.clone(),
        flash_model: config.engine.flash_model.clone(),
        image_model: config.engine.image_model.clone(),
        tts_model: config.engine.tts_model.clone(),
        tts_voice: config.engine.tts_voice.clone(),
        plan_chapter_count: config.plan.chapter_count,
        plan_overview_words: config.plan.overview_words,
        draft_min_words: config.draft.min_words,
        draft_summary_words: config.draft.summary_words,
    };
    let engine = Arc::new(GeminiClient::new(engine_config)?);

    // // 创建 Fake 引擎（本地联调用，不访问外部服务）
    // let engine = Arc::new(FakeEngine::with_defaults());

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        persona_repo,
        project_repo,
        tracker,
        engine,
        event_publisher,
        &config,
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
