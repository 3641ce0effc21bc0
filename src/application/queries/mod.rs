//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod operation_queries;
mod persona_queries;
mod project_queries;

pub mod handlers;

pub use operation_queries::*;
pub use persona_queries::*;
pub use project_queries::*;
