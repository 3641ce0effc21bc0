//! Memory Layer - In-Memory State Management
//!
//! 工作台的全部状态都在内存中: 人设单例、项目聚合、操作登记簿

mod operation_tracker;
mod persona_store;
mod project_store;

pub use operation_tracker::InMemoryOperationTracker;
pub use persona_store::InMemoryPersonaStore;
pub use project_store::InMemoryProjectStore;
