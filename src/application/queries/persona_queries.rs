//! Persona Queries

/// 获取工作区人设查询
#[derive(Debug, Clone)]
pub struct GetPersona;
