//! Gemini Client - 调用 Gemini generateContent REST API
//!
//! 实现 GenerationEnginePort trait，按意图路由到不同模型:
//! 结构化意图（大纲/起草/检测）走 JSON schema 输出，
//! 调研意图挂载 google_search 工具，封面/旁白取 inlineData。
//!
//! 外部 API:
//! POST {base_url}/v1beta/models/{model}:generateContent
//! Header: x-goog-api-key
//! Request/Response: JSON (camelCase)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::application::ports::{
    CoverRequest, DraftRequest, DraftResult, GenerationEnginePort, GenerationError,
    HumanizeRequest, IdentityResearchRequest, IntegrityRequest, IntegrityVerdict,
    NarrationRequest, OutlineChapter, OutlinePlan, OutlineRequest, TweakRequest,
};

use super::prompts;

// ============================================================================
// 请求体 (JSON, camelCase)
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    /// REST API 的搜索工具字段名是 snake_case
    google_search: EmptyObject,
}

#[derive(Debug, Serialize)]
struct EmptyObject {}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

impl GenerateContentRequest {
    fn text_only(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            tools: None,
            generation_config: None,
        }
    }

    fn with_search(prompt: String) -> Self {
        Self {
            tools: Some(vec![Tool {
                google_search: EmptyObject {},
            }]),
            ..Self::text_only(prompt)
        }
    }

    fn with_json_schema(prompt: String, schema: serde_json::Value) -> Self {
        Self {
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
                ..Default::default()
            }),
            ..Self::text_only(prompt)
        }
    }
}

// ============================================================================
// 响应体 (JSON, camelCase)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    data: String,
}

/// 拼接首个候选的全部文本分段，无文本时返回 None
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// 在首个候选的分段中查找 inlineData（封面路径，逐段扫描）
fn extract_inline_data(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    content
        .parts
        .iter()
        .find_map(|p| p.inline_data.as_ref().map(|d| d.data.clone()))
}

/// 取首个分段的 inlineData（旁白路径，只看第一段）
fn extract_first_part_inline_data(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    content
        .parts
        .first()?
        .inline_data
        .as_ref()
        .map(|d| d.data.clone())
}

// ============================================================================
// 结构化输出的 schema 与防御性解析
// ============================================================================

fn outline_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "subtitle": { "type": "STRING" },
            "targetAudience": { "type": "STRING" },
            "chapters": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "overview": { "type": "STRING" }
                    },
                    "required": ["title", "overview"]
                }
            }
        },
        "required": ["title", "subtitle", "targetAudience", "chapters"]
    })
}

fn draft_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "content": { "type": "STRING" },
            "summary": { "type": "STRING" }
        },
        "required": ["content", "summary"]
    })
}

fn verdict_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER" },
            "report": { "type": "STRING" }
        },
        "required": ["score", "report"]
    })
}

/// 解析大纲 JSON，格式不符时退化为空大纲
fn parse_outline(text: &str) -> OutlinePlan {
    #[derive(Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct OutlineWire {
        #[serde(default)]
        title: String,
        #[serde(default)]
        subtitle: String,
        #[serde(default)]
        target_audience: String,
        #[serde(default)]
        chapters: Vec<OutlineChapterWire>,
    }

    #[derive(Deserialize)]
    struct OutlineChapterWire {
        #[serde(default)]
        title: String,
        #[serde(default)]
        overview: String,
    }

    let wire: OutlineWire = serde_json::from_str(text).unwrap_or_default();
    OutlinePlan {
        title: wire.title,
        subtitle: wire.subtitle,
        target_audience: wire.target_audience,
        chapters: wire
            .chapters
            .into_iter()
            .map(|c| OutlineChapter {
                title: c.title,
                overview: c.overview,
            })
            .collect(),
    }
}

/// 解析起草 JSON，正文缺失时回落为错误占位文本
fn parse_draft(text: &str) -> DraftResult {
    #[derive(Default, Deserialize)]
    struct DraftWire {
        #[serde(default)]
        content: String,
        #[serde(default)]
        summary: String,
    }

    let wire: DraftWire = serde_json::from_str(text).unwrap_or_default();
    DraftResult {
        content: if wire.content.is_empty() {
            "Error generating content.".to_string()
        } else {
            wire.content
        },
        summary: wire.summary,
    }
}

/// 解析检测 JSON，格式不符时回落为 0 分 + 占位报告
fn parse_verdict(text: &str) -> IntegrityVerdict {
    #[derive(Deserialize)]
    struct VerdictWire {
        #[serde(default)]
        score: i64,
        #[serde(default)]
        report: String,
    }

    match serde_json::from_str::<VerdictWire>(text) {
        Ok(wire) => IntegrityVerdict {
            score: wire.score,
            report: wire.report,
        },
        Err(_) => IntegrityVerdict {
            score: 0,
            report: "Error checking".to_string(),
        },
    }
}

// ============================================================================
// 客户端
// ============================================================================

/// Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API Key（x-goog-api-key 头）
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 瞬时错误的重试次数
    pub max_retries: u32,
    /// 长文意图模型（大纲/起草/润色）
    pub pro_model: String,
    /// 快速意图模型（调研/检测/局部修改）
    pub flash_model: String,
    /// 封面生成模型
    pub image_model: String,
    /// 旁白合成模型
    pub tts_model: String,
    /// 旁白音色
    pub tts_voice: String,
    /// 大纲章节数
    pub plan_chapter_count: u32,
    /// 章节概要目标字数
    pub plan_overview_words: u32,
    /// 章节正文最低字数
    pub draft_min_words: u32,
    /// 章节小结目标字数
    pub draft_summary_words: u32,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            timeout_secs: 120,
            max_retries: 0,
            pro_model: "gemini-3-pro-preview".to_string(),
            flash_model: "gemini-3-flash-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            tts_voice: "Kore".to_string(),
            plan_chapter_count: 10,
            plan_overview_words: 50,
            draft_min_words: 1500,
            draft_summary_words: 100,
        }
    }
}

/// Gemini 客户端
pub struct GeminiClient {
    client: Client,
    config: GeminiClientConfig,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: GeminiClientConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        )
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.config.base_url)
    }

    /// 发送 generateContent 请求，对瞬时错误按配置重试
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let mut attempt = 0;
        loop {
            match self.try_generate(model, request).await {
                Ok(response) => return Ok(response),
                Err(e @ (GenerationError::NetworkError(_) | GenerationError::Timeout))
                    if attempt < self.config.max_retries =>
                {
                    attempt += 1;
                    tracing::warn!(
                        model = %model,
                        attempt = attempt,
                        error = %e,
                        "Transient engine error, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = self.generate_url(model);
        tracing::debug!(url = %url, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else if e.is_connect() {
                    GenerationError::NetworkError(format!(
                        "Cannot connect to generation service: {}",
                        e
                    ))
                } else {
                    GenerationError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenerationError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl GenerationEnginePort for GeminiClient {
    async fn research_identity(
        &self,
        request: IdentityResearchRequest,
    ) -> Result<String, GenerationError> {
        let prompt = prompts::identity_research(&request);
        let response = self
            .generate(
                &self.config.flash_model,
                &GenerateContentRequest::with_search(prompt),
            )
            .await?;

        let summary = extract_text(&response).unwrap_or_else(|| "No information found.".to_string());
        tracing::info!(name = %request.name, summary_len = summary.len(), "Identity research completed");
        Ok(summary)
    }

    async fn generate_outline(
        &self,
        request: OutlineRequest,
    ) -> Result<OutlinePlan, GenerationError> {
        let prompt = prompts::outline(
            &request,
            self.config.plan_chapter_count,
            self.config.plan_overview_words,
        );
        let response = self
            .generate(
                &self.config.pro_model,
                &GenerateContentRequest::with_json_schema(prompt, outline_schema()),
            )
            .await?;

        let text = extract_text(&response).unwrap_or_default();
        let plan = parse_outline(&text);
        tracing::info!(
            title = %plan.title,
            chapter_count = plan.chapters.len(),
            "Outline generated"
        );
        Ok(plan)
    }

    async fn draft_chapter(&self, request: DraftRequest) -> Result<DraftResult, GenerationError> {
        let chapter_number = request.chapter_number;
        let prompt = prompts::draft(
            &request,
            self.config.draft_min_words,
            self.config.draft_summary_words,
        );
        let response = self
            .generate(
                &self.config.pro_model,
                &GenerateContentRequest::with_json_schema(prompt, draft_schema()),
            )
            .await?;

        let text = extract_text(&response).unwrap_or_default();
        let draft = parse_draft(&text);
        tracing::info!(
            chapter_number = chapter_number,
            content_len = draft.content.len(),
            "Chapter drafted"
        );
        Ok(draft)
    }

    async fn check_integrity(
        &self,
        request: IntegrityRequest,
    ) -> Result<IntegrityVerdict, GenerationError> {
        let prompt = prompts::integrity(&request.content);
        let response = self
            .generate(
                &self.config.flash_model,
                &GenerateContentRequest::with_json_schema(prompt, verdict_schema()),
            )
            .await?;

        let text = extract_text(&response).unwrap_or_default();
        let verdict = parse_verdict(&text);
        tracing::info!(score = verdict.score, "Integrity check completed");
        Ok(verdict)
    }

    async fn humanize(&self, request: HumanizeRequest) -> Result<String, GenerationError> {
        let prompt = prompts::humanize(&request.content);
        let response = self
            .generate(&self.config.pro_model, &GenerateContentRequest::text_only(prompt))
            .await?;

        // 空响应时原样保留输入
        Ok(extract_text(&response).unwrap_or(request.content))
    }

    async fn tweak_selection(&self, request: TweakRequest) -> Result<String, GenerationError> {
        let prompt = prompts::tweak(&request.selected_text, &request.instruction);
        let response = self
            .generate(
                &self.config.flash_model,
                &GenerateContentRequest::text_only(prompt),
            )
            .await?;

        Ok(extract_text(&response).unwrap_or(request.selected_text))
    }

    async fn generate_cover(&self, request: CoverRequest) -> Result<String, GenerationError> {
        let prompt = prompts::cover(&request.title, &request.theme);
        let mut wire = GenerateContentRequest::text_only(prompt);
        wire.generation_config = Some(GenerationConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: "3:4".to_string(),
            }),
            ..Default::default()
        });

        let response = self.generate(&self.config.image_model, &wire).await?;

        let cover_ref = extract_inline_data(&response)
            .map(|data| format!("data:image/png;base64,{}", data))
            .unwrap_or_default();
        tracing::info!(
            title = %request.title,
            cover_len = cover_ref.len(),
            "Cover generated"
        );
        Ok(cover_ref)
    }

    async fn narrate(&self, request: NarrationRequest) -> Result<String, GenerationError> {
        let prompt = prompts::narration(&request.content);
        let mut wire = GenerateContentRequest::text_only(prompt);
        wire.generation_config = Some(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: self.config.tts_voice.clone(),
                    },
                },
            }),
            ..Default::default()
        });

        let response = self.generate(&self.config.tts_model, &wire).await?;

        let audio_ref = extract_first_part_inline_data(&response)
            .map(|data| format!("data:audio/pcm;base64,{}", data))
            .unwrap_or_default();
        tracing::info!(audio_len = audio_ref.len(), "Narration generated");
        Ok(audio_ref)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.models_url())
            .header("x-goog-api-key", &self.config.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
