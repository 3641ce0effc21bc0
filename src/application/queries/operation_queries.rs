//! Operation Queries

use uuid::Uuid;

/// 获取单个操作记录查询
#[derive(Debug, Clone)]
pub struct GetOperation {
    pub operation_id: Uuid,
}

/// 最近操作列表查询（按开始时间倒序）
#[derive(Debug, Clone)]
pub struct ListRecentOperations {
    pub limit: Option<usize>,
}
