//! Events Layer - WebSocket 事件广播
//!
//! 操作登记簿与章节状态变更的全局事件通道

mod publisher;

pub use publisher::{EventPublisher, WsEvent};
