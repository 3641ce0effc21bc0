//! Operation Commands - 操作登记簿命令

use uuid::Uuid;

/// 取消操作命令 - 触发取消令牌并将记录置为终态
#[derive(Debug, Clone)]
pub struct CancelOperation {
    pub operation_id: Uuid,
}
