//! Persona Context - 作者人设限界上下文
//!
//! 职责:
//! - 作者人设聚合管理（工作区内单例）
//! - 人设字段的局部更新
//! - 身份调研输入的前置校验

mod aggregate;
mod errors;

pub use aggregate::{AuthorPersona, IdentityQuery, PersonaPatch};
pub use errors::PersonaError;
