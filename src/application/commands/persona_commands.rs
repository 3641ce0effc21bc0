//! Persona Commands - 人设相关命令

use crate::domain::persona::PersonaPatch;

/// 更新人设字段命令（局部更新，缺省字段不变）
#[derive(Debug, Clone)]
pub struct UpdatePersona {
    pub patch: PersonaPatch,
}

/// 身份调研命令 - 委托引擎调研作者身份并覆盖职业履历
///
/// 工作区人设是单例，无需参数。
#[derive(Debug, Clone)]
pub struct ResearchIdentity;
