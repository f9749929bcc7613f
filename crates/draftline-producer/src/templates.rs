use std::path::Path;

use crate::error::ProducerError;

/// System prompt for draft extraction
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/draft_system.md");

/// User turn for draft extraction. Placeholders: `<summary>`, `<author>`,
/// `<text>`, `<image_findings>`.
pub const DEFAULT_USER_PROMPT_TEMPLATE: &str = include_str!("../prompts/draft_user.md");

/// System prompt for the image pass
pub const DEFAULT_VISION_PROMPT: &str = include_str!("../prompts/vision_system.md");

pub fn load_template(path: impl AsRef<Path>) -> Result<String, ProducerError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| ProducerError::Template {
        path: path.display().to_string(),
        source,
    })
}

pub fn render_user_prompt(
    template: &str,
    summary: &str,
    author: &str,
    text: &str,
    image_findings: &[String],
) -> String {
    let findings = if image_findings.is_empty() {
        "none".to_string()
    } else {
        image_findings.join("; ")
    };
    let summary = if summary.is_empty() { "(empty)" } else { summary };

    template
        .replace("<summary>", summary)
        .replace("<author>", author)
        .replace("<image_findings>", &findings)
        .replace("<text>", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_placeholders() {
        let rendered = render_user_prompt(
            DEFAULT_USER_PROMPT_TEMPLATE,
            "",
            "ana",
            "temp 21C",
            &["pale skin".to_string()],
        );
        assert!(rendered.contains("Current Summary: (empty)"));
        assert!(rendered.contains("New Message from ana: \"temp 21C\""));
        assert!(rendered.contains("Image findings: pale skin"));
        assert!(!rendered.contains('<'));
    }

    #[test]
    fn test_text_placeholders_are_not_expanded_twice() {
        let rendered = render_user_prompt("<text>", "s", "a", "<summary>", &[]);
        assert_eq!(rendered, "<summary>");
    }

    #[test]
    fn test_missing_template_file() {
        let err = load_template("/definitely/not/here.md").unwrap_err();
        assert!(matches!(err, ProducerError::Template { .. }));
    }

    #[test]
    fn test_default_prompts_request_json() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("JSON"));
        assert!(DEFAULT_VISION_PROMPT.contains("findings"));
    }
}
