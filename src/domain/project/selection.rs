//! Project Context - Selection
//!
//! 局部修改（tweak）的选区模型。选区在客户端划定，携带划定时正文的
//! MD5 指纹；服务端在调用引擎前与拼接前校验指纹与字节范围，
//! 指纹不符即判定选区失效，不做任何修改。

use serde::{Deserialize, Serialize};

use super::errors::SelectionError;

/// 计算正文的内容指纹（十六进制 MD5）
pub fn content_digest(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}

/// 正文选区 `[start, end)`（字节偏移）
///
/// 不变量:
/// - start < end（空选区无意义）
/// - digest 为划定选区时完整正文的指纹
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    start: usize,
    end: usize,
    digest: String,
}

impl Selection {
    pub fn new(start: usize, end: usize, digest: String) -> Result<Self, SelectionError> {
        if start >= end {
            return Err(SelectionError::InvalidRange { start, end });
        }
        Ok(Self { start, end, digest })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// 校验选区对当前正文仍然有效，返回选中的文本
    ///
    /// 校验顺序: 指纹 -> 范围 -> 字符边界。
    pub fn verify<'a>(&self, content: &'a str) -> Result<&'a str, SelectionError> {
        if content_digest(content) != self.digest {
            return Err(SelectionError::StaleContent);
        }
        if self.end > content.len() {
            return Err(SelectionError::OutOfBounds {
                end: self.end,
                len: content.len(),
            });
        }
        if !content.is_char_boundary(self.start) || !content.is_char_boundary(self.end) {
            return Err(SelectionError::NotCharBoundary);
        }
        Ok(&content[self.start..self.end])
    }

    /// 将替换文本拼接进选区，前后文保持原样
    pub fn splice(&self, content: &str, replacement: &str) -> Result<String, SelectionError> {
        self.verify(content)?;
        let mut next = String::with_capacity(
            content.len() - (self.end - self.start) + replacement.len(),
        );
        next.push_str(&content[..self.start]);
        next.push_str(replacement);
        next.push_str(&content[self.end..]);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection_over(content: &str, start: usize, end: usize) -> Selection {
        Selection::new(start, end, content_digest(content)).unwrap()
    }

    #[test]
    fn test_empty_selection_rejected() {
        assert_eq!(
            Selection::new(5, 5, "d".to_string()),
            Err(SelectionError::InvalidRange { start: 5, end: 5 })
        );
        assert!(Selection::new(7, 3, "d".to_string()).is_err());
    }

    #[test]
    fn test_verify_extracts_selected_text() {
        let content = "The quick brown fox jumps over the lazy dog.";
        let selection = selection_over(content, 4, 9);
        assert_eq!(selection.verify(content).unwrap(), "quick");
    }

    #[test]
    fn test_splice_replaces_exact_range() {
        let content = "The quick brown fox.";
        let selection = selection_over(content, 4, 15);
        let next = selection.splice(content, "slow gray").unwrap();
        assert_eq!(next, "The slow gray fox.");
        // 前后文逐字节保持不变
        assert_eq!(&next[..4], &content[..4]);
        assert!(next.ends_with(" fox."));
    }

    #[test]
    fn test_stale_digest_rejected_before_range_checks() {
        let content = "original content";
        let selection = selection_over(content, 0, 8);
        // 选区划定后正文被改动
        let changed = "original content, plus edits";
        assert_eq!(
            selection.verify(changed),
            Err(SelectionError::StaleContent)
        );
        assert_eq!(
            selection.splice(changed, "x"),
            Err(SelectionError::StaleContent)
        );
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let content = "short";
        let selection = Selection::new(0, 100, content_digest(content)).unwrap();
        assert_eq!(
            selection.verify(content),
            Err(SelectionError::OutOfBounds { end: 100, len: 5 })
        );
    }

    #[test]
    fn test_char_boundary_enforced() {
        let content = "数字倦怠";
        // "数" 占 3 字节，偏移 1 落在字符中间
        let selection = Selection::new(1, 6, content_digest(content)).unwrap();
        assert_eq!(
            selection.verify(content),
            Err(SelectionError::NotCharBoundary)
        );

        let aligned = Selection::new(0, 6, content_digest(content)).unwrap();
        assert_eq!(aligned.verify(content).unwrap(), "数字");
    }

    #[test]
    fn test_digest_changes_with_content() {
        assert_ne!(content_digest("a"), content_digest("b"));
        assert_eq!(content_digest("same"), content_digest("same"));
    }
}
