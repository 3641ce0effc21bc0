//! Project Context - 电子书项目限界上下文
//!
//! 职责:
//! - 项目聚合管理（元信息 + 有序章节）
//! - 章节状态机与替换式更新契约
//! - 局部修改选区的乐观并发校验

mod aggregate;
mod entities;
mod errors;
mod selection;
mod value_objects;

pub use aggregate::{EbookProject, PlannedChapter, ProjectPlan, ReadinessReport};
pub use entities::{Chapter, ChapterStatus};
pub use errors::{ProjectError, SelectionError};
pub use selection::{content_digest, Selection};
pub use value_objects::{ChapterId, IntegrityScore, ProjectId};
