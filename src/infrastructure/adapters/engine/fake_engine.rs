//! Fake Generation Engine - 用于测试与离线开发
//!
//! 返回确定性的占位内容，不调用外部服务

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{
    CoverRequest, DraftRequest, DraftResult, GenerationEnginePort, GenerationError,
    HumanizeRequest, IdentityResearchRequest, IntegrityRequest, IntegrityVerdict,
    NarrationRequest, OutlineChapter, OutlinePlan, OutlineRequest, TweakRequest,
};

/// Fake Engine 配置
#[derive(Debug, Clone)]
pub struct FakeEngineConfig {
    /// 大纲返回的章节数
    pub chapter_count: usize,
    /// 检测返回的固定分数
    pub integrity_score: i64,
    /// 模拟的调用延迟（毫秒）
    pub latency_ms: u64,
    /// 所有调用直接失败
    pub fail: bool,
}

impl Default for FakeEngineConfig {
    fn default() -> Self {
        Self {
            chapter_count: 3,
            integrity_score: 12,
            latency_ms: 0,
            fail: false,
        }
    }
}

/// Fake Generation Engine
pub struct FakeEngine {
    config: FakeEngineConfig,
}

impl FakeEngine {
    pub fn new(config: FakeEngineConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeEngineConfig::default())
    }

    /// 返回固定分数的引擎（检测路径测试用）
    pub fn scoring(score: i64) -> Self {
        Self::new(FakeEngineConfig {
            integrity_score: score,
            ..Default::default()
        })
    }

    /// 所有调用都失败的引擎
    pub fn failing() -> Self {
        Self::new(FakeEngineConfig {
            fail: true,
            ..Default::default()
        })
    }

    /// 带固定延迟的引擎（取消路径测试用）
    pub fn slow(latency_ms: u64) -> Self {
        Self::new(FakeEngineConfig {
            latency_ms,
            ..Default::default()
        })
    }

    async fn simulate(&self) -> Result<(), GenerationError> {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
        if self.config.fail {
            return Err(GenerationError::ServiceError(
                "fake engine failure".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl GenerationEnginePort for FakeEngine {
    async fn research_identity(
        &self,
        request: IdentityResearchRequest,
    ) -> Result<String, GenerationError> {
        self.simulate().await?;
        Ok(format!(
            "Professional background for {} ({})",
            request.name, request.handles
        ))
    }

    async fn generate_outline(
        &self,
        request: OutlineRequest,
    ) -> Result<OutlinePlan, GenerationError> {
        self.simulate().await?;
        Ok(OutlinePlan {
            title: format!("Notes on {}", request.theme),
            subtitle: "A working draft".to_string(),
            target_audience: "General readers".to_string(),
            chapters: (1..=self.config.chapter_count)
                .map(|i| OutlineChapter {
                    title: format!("Part {}", i),
                    overview: format!("Covers part {} of {}", i, request.theme),
                })
                .collect(),
        })
    }

    async fn draft_chapter(&self, request: DraftRequest) -> Result<DraftResult, GenerationError> {
        self.simulate().await?;
        Ok(DraftResult {
            content: format!(
                "# {}\n\nDrafted content for chapter {}.",
                request.chapter_title, request.chapter_number
            ),
            summary: format!("Summary of chapter {}", request.chapter_number),
        })
    }

    async fn check_integrity(
        &self,
        _request: IntegrityRequest,
    ) -> Result<IntegrityVerdict, GenerationError> {
        self.simulate().await?;
        let report = if self.config.integrity_score >= 50 {
            "AI-like phrasing detected".to_string()
        } else {
            "Clean".to_string()
        };
        Ok(IntegrityVerdict {
            score: self.config.integrity_score,
            report,
        })
    }

    async fn humanize(&self, request: HumanizeRequest) -> Result<String, GenerationError> {
        self.simulate().await?;
        Ok(format!("{} [humanized]", request.content))
    }

    async fn tweak_selection(&self, request: TweakRequest) -> Result<String, GenerationError> {
        self.simulate().await?;
        Ok(format!("{} [tweaked]", request.selected_text))
    }

    async fn generate_cover(&self, _request: CoverRequest) -> Result<String, GenerationError> {
        self.simulate().await?;
        Ok("data:image/png;base64,ZmFrZQ==".to_string())
    }

    async fn narrate(&self, _request: NarrationRequest) -> Result<String, GenerationError> {
        self.simulate().await?;
        Ok("data:audio/pcm;base64,ZmFrZQ==".to_string())
    }

    async fn health_check(&self) -> bool {
        !self.config.fail
    }
}
