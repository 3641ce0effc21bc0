//! Project Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 项目唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 章节唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterId(Uuid);

impl ChapterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ChapterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 内容检测得分 (0-100)
///
/// 100 表示高度疑似 AI 生成/抄袭。引擎返回的越界值在构造时收敛到边界，
/// 不会因此判定检测失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntegrityScore(u8);

impl IntegrityScore {
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// 从引擎的原始返回值构造（负数归零，超过 100 截断）
    pub fn from_raw(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// 是否超过风险阈值
    pub fn exceeds(&self, threshold: u8) -> bool {
        self.0 > threshold
    }
}

impl std::fmt::Display for IntegrityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_clamping() {
        assert_eq!(IntegrityScore::from_raw(-5).value(), 0);
        assert_eq!(IntegrityScore::from_raw(0).value(), 0);
        assert_eq!(IntegrityScore::from_raw(55).value(), 55);
        assert_eq!(IntegrityScore::from_raw(100).value(), 100);
        assert_eq!(IntegrityScore::from_raw(150).value(), 100);
    }

    #[test]
    fn test_score_threshold() {
        assert!(!IntegrityScore::new(40).exceeds(40));
        assert!(IntegrityScore::new(41).exceeds(40));
        assert!(IntegrityScore::new(100).exceeds(40));
        assert!(!IntegrityScore::new(0).exceeds(40));
    }
}
