//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod asset_handlers;
mod chapter_handlers;
mod operation_handlers;
mod persona_handlers;
mod project_handlers;

pub use asset_handlers::*;
pub use chapter_handlers::*;
pub use operation_handlers::*;
pub use persona_handlers::*;
pub use project_handlers::*;
