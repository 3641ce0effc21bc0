//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod asset_commands;
mod chapter_commands;
mod operation_commands;
mod persona_commands;
mod project_commands;

pub mod handlers;

pub use asset_commands::*;
pub use chapter_commands::*;
pub use operation_commands::*;
pub use persona_commands::*;
pub use project_commands::*;
