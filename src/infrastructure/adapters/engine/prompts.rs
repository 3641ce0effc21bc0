//! Prompt Builders - 提示词模板
//!
//! 提示词集中在此模块，便于对照调优。字数与章节数来自配置，
//! 截断类处理（检测上限、旁白预览）由调用方完成，这里只拼接。

use crate::application::ports::{DraftRequest, IdentityResearchRequest, OutlineRequest};

/// 身份调研提示词
pub fn identity_research(request: &IdentityResearchRequest) -> String {
    format!(
        "Research and summarize the professional identity and writing style of an author \
         named \"{}\" with these social handles: \"{}\". \
         Use your internal knowledge and grounding tools.",
        request.name, request.handles
    )
}

/// 大纲生成提示词
pub fn outline(request: &OutlineRequest, chapter_count: u32, overview_words: u32) -> String {
    format!(
        "Act as a Master Ebook Architect. Create a master plan for an ebook about \"{theme}\".\n\
         Author Voice Context: {style}.\n\
         Author Background: {history}.\n\
         Return a JSON object containing: title, subtitle, targetAudience, and a list of \
         {count} chapters (each with title and a {words}-word overview).",
        theme = request.theme,
        style = request.writing_style,
        history = request.professional_history,
        count = chapter_count,
        words = overview_words,
    )
}

/// 章节起草提示词
pub fn draft(request: &DraftRequest, min_words: u32, summary_words: u32) -> String {
    format!(
        "Draft Chapter {number}: \"{title}\" for the book \"{book}\".\n\
         \n\
         CONTEXT:\n\
         - Author Voice: {style}\n\
         - Author Identity: {history}\n\
         - Book Theme: {theme}\n\
         - Chapter Goal: {overview}\n\
         - User Specific Pointers: {pointers}\n\
         - Context from previous chapters: {running}\n\
         \n\
         INSTRUCTIONS:\n\
         Write a full-length, engaging chapter (at least {min_words} words). \
         Use \"Chain of Thought\" to structure the arguments.\n\
         Maintain the author's consistent voice.\n\
         After the chapter, provide a {summary_words}-word summary of what occurred \
         in this chapter for future context.\n\
         Return as JSON with 'content' (Markdown) and 'summary'.",
        number = request.chapter_number,
        title = request.chapter_title,
        book = request.book_title,
        style = request.writing_style,
        history = request.professional_history,
        theme = request.theme,
        overview = request.chapter_overview,
        pointers = request.pointers,
        running = request.running_summary,
        min_words = min_words,
        summary_words = summary_words,
    )
}

/// 内容检测提示词（content 已按配置截断）
pub fn integrity(content: &str) -> String {
    format!(
        "Analyze the following text for plagiarism, AI-likeness, and common AI tropes \
         (e.g., \"In the rapidly evolving landscape...\").\n\
         Return a JSON object with:\n\
         - score: integer from 0 to 100 (where 100 is highly suspicious/AI-like)\n\
         - report: a brief summary of detected issues or \"Clean\" if no issues.\n\
         \n\
         Text: \"{}\"",
        content
    )
}

/// 润色改写提示词
pub fn humanize(content: &str) -> String {
    format!(
        "Rewrite the following text to sound more human-written.\n\
         - Vary sentence structure.\n\
         - Remove common AI cliches and filler.\n\
         - Maintain the original meaning and length.\n\
         - Ensure it bypasses common AI detectors.\n\
         \n\
         Text: \"{}\"",
        content
    )
}

/// 局部修改提示词
pub fn tweak(selected_text: &str, instruction: &str) -> String {
    format!(
        "Modify the following text based on this instruction: \"{instruction}\".\n\
         Text: \"{text}\"\n\
         Return only the modified text.",
        instruction = instruction,
        text = selected_text,
    )
}

/// 封面生成提示词
pub fn cover(title: &str, theme: &str) -> String {
    format!(
        "A professional ebook cover art for: {}: {}. \
         Minimalist, high-quality, professional typography style.",
        title, theme
    )
}

/// 旁白合成提示词（content 已截断为预览片段）
pub fn narration(content: &str) -> String {
    format!("Narrate the following chapter professionally: {}...", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_interpolates_configured_counts() {
        let request = OutlineRequest {
            theme: "数字极简主义".to_string(),
            writing_style: "克制".to_string(),
            professional_history: "产品经理十年".to_string(),
        };

        let prompt = outline(&request, 10, 50);
        assert!(prompt.contains("an ebook about \"数字极简主义\""));
        assert!(prompt.contains("a list of 10 chapters"));
        assert!(prompt.contains("a 50-word overview"));

        let prompt = outline(&request, 6, 30);
        assert!(prompt.contains("a list of 6 chapters"));
        assert!(prompt.contains("a 30-word overview"));
    }

    #[test]
    fn test_draft_carries_all_context_fields() {
        let request = DraftRequest {
            chapter_number: 3,
            chapter_title: "注意力经济".to_string(),
            chapter_overview: "平台如何争夺注意力".to_string(),
            pointers: "引用 2023 年的数据".to_string(),
            book_title: "少即是多".to_string(),
            theme: "数字极简主义".to_string(),
            writing_style: "克制".to_string(),
            professional_history: "产品经理十年".to_string(),
            running_summary: "Chapter 1: 开篇\nChapter 2: 承接".to_string(),
        };

        let prompt = draft(&request, 1500, 100);
        assert!(prompt.starts_with("Draft Chapter 3: \"注意力经济\" for the book \"少即是多\"."));
        assert!(prompt.contains("- User Specific Pointers: 引用 2023 年的数据"));
        assert!(prompt.contains("- Context from previous chapters: Chapter 1: 开篇"));
        assert!(prompt.contains("at least 1500 words"));
        assert!(prompt.contains("a 100-word summary"));
    }

    #[test]
    fn test_tweak_embeds_instruction_and_text() {
        let prompt = tweak("旧句子", "改得更口语化");
        assert!(prompt.contains("this instruction: \"改得更口语化\""));
        assert!(prompt.contains("Text: \"旧句子\""));
        assert!(prompt.ends_with("Return only the modified text."));
    }

    #[test]
    fn test_narration_appends_ellipsis() {
        let prompt = narration("第一段正文");
        assert_eq!(
            prompt,
            "Narrate the following chapter professionally: 第一段正文..."
        );
    }
}
