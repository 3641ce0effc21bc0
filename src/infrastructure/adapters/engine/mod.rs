//! Generation Engine Adapters - 生成引擎适配器
//!
//! GenerationEnginePort 的两个实现: Gemini REST 客户端与测试用 Fake

mod fake_engine;
mod gemini_client;
mod prompts;

pub use fake_engine::{FakeEngine, FakeEngineConfig};
pub use gemini_client::{GeminiClient, GeminiClientConfig};
