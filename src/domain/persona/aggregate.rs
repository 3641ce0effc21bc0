//! Persona Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PersonaError;

/// AuthorPersona 聚合根 - 作者人设
///
/// 不变量:
/// - 工作区内只有一个人设实例，创建后不会被销毁
/// - 所有字段均为自由文本，无字段级标识（相等性即字段相等）
/// - professional_history 可被身份调研整体覆盖（last write wins）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorPersona {
    /// 作者姓名
    name: String,
    /// 职业履历（可由身份调研自动填充）
    professional_history: String,
    /// 写作风格描述
    writing_style: String,
    /// 创作动机
    core_why: String,
    /// 个人故事素材
    personal_stories: String,
    /// 社交账号
    social_handles: String,
    /// 最后更新时间
    updated_at: DateTime<Utc>,
}

/// 人设字段的局部更新
///
/// 为 None 的字段保持不变。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaPatch {
    pub name: Option<String>,
    pub professional_history: Option<String>,
    pub writing_style: Option<String>,
    pub core_why: Option<String>,
    pub personal_stories: Option<String>,
    pub social_handles: Option<String>,
}

/// 身份调研的输入（姓名 + 社交账号）
#[derive(Debug, Clone)]
pub struct IdentityQuery {
    pub name: String,
    pub handles: String,
}

impl AuthorPersona {
    /// 创建空人设
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            professional_history: String::new(),
            writing_style: String::new(),
            core_why: String::new(),
            personal_stories: String::new(),
            social_handles: String::new(),
            updated_at: Utc::now(),
        }
    }

    /// 应用局部更新
    pub fn apply_patch(&mut self, patch: PersonaPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(history) = patch.professional_history {
            self.professional_history = history;
        }
        if let Some(style) = patch.writing_style {
            self.writing_style = style;
        }
        if let Some(why) = patch.core_why {
            self.core_why = why;
        }
        if let Some(stories) = patch.personal_stories {
            self.personal_stories = stories;
        }
        if let Some(handles) = patch.social_handles {
            self.social_handles = handles;
        }
        self.updated_at = Utc::now();
    }

    /// 构造身份调研输入
    ///
    /// 前置条件: 姓名非空。
    pub fn identity_query(&self) -> Result<IdentityQuery, PersonaError> {
        if self.name.trim().is_empty() {
            return Err(PersonaError::NameRequired);
        }
        Ok(IdentityQuery {
            name: self.name.clone(),
            handles: self.social_handles.clone(),
        })
    }

    /// 记录身份调研结果
    ///
    /// 整体覆盖 professional_history（保留原系统的 last-write-wins 语义，
    /// 此前的手工编辑会丢失）。
    pub fn record_research(&mut self, summary: String) {
        self.professional_history = summary;
        self.updated_at = Utc::now();
    }

    // Getters
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn professional_history(&self) -> &str {
        &self.professional_history
    }

    pub fn writing_style(&self) -> &str {
        &self.writing_style
    }

    pub fn core_why(&self) -> &str {
        &self.core_why
    }

    pub fn personal_stories(&self) -> &str {
        &self.personal_stories
    }

    pub fn social_handles(&self) -> &str {
        &self.social_handles
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Default for AuthorPersona {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_persona() {
        let persona = AuthorPersona::empty();
        assert!(persona.name().is_empty());
        assert!(persona.professional_history().is_empty());
    }

    #[test]
    fn test_apply_patch_only_touches_given_fields() {
        let mut persona = AuthorPersona::empty();
        persona.apply_patch(PersonaPatch {
            name: Some("林远".to_string()),
            writing_style: Some("冷静克制，长短句交错".to_string()),
            ..Default::default()
        });

        assert_eq!(persona.name(), "林远");
        assert_eq!(persona.writing_style(), "冷静克制，长短句交错");
        assert!(persona.social_handles().is_empty());
    }

    #[test]
    fn test_identity_query_requires_name() {
        let persona = AuthorPersona::empty();
        assert!(matches!(
            persona.identity_query(),
            Err(PersonaError::NameRequired)
        ));

        let mut persona = AuthorPersona::empty();
        persona.apply_patch(PersonaPatch {
            name: Some("林远".to_string()),
            social_handles: Some("@linyuan".to_string()),
            ..Default::default()
        });
        let query = persona.identity_query().unwrap();
        assert_eq!(query.name, "林远");
        assert_eq!(query.handles, "@linyuan");
    }

    #[test]
    fn test_record_research_overwrites_history() {
        let mut persona = AuthorPersona::empty();
        persona.apply_patch(PersonaPatch {
            professional_history: Some("手工填写的履历".to_string()),
            ..Default::default()
        });

        persona.record_research("调研得到的履历".to_string());
        assert_eq!(persona.professional_history(), "调研得到的履历");
    }
}
