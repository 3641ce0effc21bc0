//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod operation_handlers;
mod persona_handlers;
mod project_handlers;

pub use operation_handlers::*;
pub use persona_handlers::*;
pub use project_handlers::*;
