//! BookForge - AI 电子书创作工作台
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Persona Context: 作者人设上下文
//! - Project Context: 书籍项目上下文（章节状态机、选区、就绪度）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（GenerationEngine, OperationTracker, Repositories）
//! - Commands: CQRS 命令处理器（委托操作的登记、取消与落盘）
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + WebSocket
//! - Memory: 人设/项目存储与操作登记簿的内存实现
//! - Adapters: Gemini 生成引擎客户端
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
