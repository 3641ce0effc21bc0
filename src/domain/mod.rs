//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Persona Context: 作者人设
//! - Project Context: 电子书项目与章节状态机

pub mod persona;
pub mod project;
