//! Converts generated markdown into the HTML the Tistory editor takes in HTML mode.

use pulldown_cmark::{html, Options, Parser};
use tp_core::ArticleDraft;

const TITLE_MARKER: &str = "# ";

/// Title used when the article has no top-level heading.
pub fn fallback_title(video_title: &str) -> String {
    format!("{} - review and analysis", video_title)
}

/// Removes a single code fence wrapping the whole response.
///
/// Models often echo the output template together with its fence.
pub fn unwrap_code_fence(markup: &str) -> &str {
    let trimmed = markup.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return markup;
    };
    let Some((_info, body)) = rest.split_once('\n') else {
        return markup;
    };
    match body.trim_end().strip_suffix("```") {
        Some(inner) if !inner.contains("\n```") => inner.trim(),
        _ => markup,
    }
}

/// Text of the first `# ` heading line, if there is one with non-blank text.
pub fn extract_title(markup: &str) -> Option<String> {
    markup
        .trim()
        .lines()
        .find_map(|line| line.strip_prefix(TITLE_MARKER))
        .filter(|title| !title.trim().is_empty())
        .map(str::to_string)
}

/// Renders CommonMark (with tables and strikethrough) to HTML.
pub fn render_html(markup: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markup, options);
    let mut out = String::with_capacity(markup.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Splits a generated article into its title and editor-ready HTML.
pub fn convert(markup: &str, video_title: &str) -> ArticleDraft {
    let markup = unwrap_code_fence(markup);
    ArticleDraft {
        title: extract_title(markup).unwrap_or_else(|| fallback_title(video_title)),
        body_markup: render_html(markup),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn count(html: &str, selector: &str) -> usize {
        let document = Html::parse_fragment(html);
        document.select(&Selector::parse(selector).unwrap()).count()
    }

    #[test]
    fn test_title_and_headings() {
        let draft = convert("# My Title\n\nIntro...\n## Section\nBody", "ignored");
        assert_eq!(draft.title, "My Title");
        assert_eq!(count(&draft.body_markup, "h1"), 1);
        assert_eq!(count(&draft.body_markup, "h2"), 1);
        assert!(draft.body_markup.contains("<h1>My Title</h1>"));
        assert!(draft.body_markup.contains("<h2>Section</h2>"));
    }

    #[test]
    fn test_fallback_title_without_heading() {
        let draft = convert("## Only a section\n\nText", "Rust 강의");
        assert_eq!(draft.title, "Rust 강의 - review and analysis");
    }

    #[test]
    fn test_marker_is_stripped_exactly() {
        assert_eq!(extract_title("#  Spaced title").as_deref(), Some(" Spaced title"));
        assert_eq!(
            extract_title("intro\n# C# # tricks\n# Second").as_deref(),
            Some("C# # tricks")
        );
        assert_eq!(extract_title("#NoSpace\n## Sub"), None);
        assert_eq!(extract_title("# \n\nbody"), None);
    }

    #[test]
    fn test_lists_emphasis_and_tables() {
        let markup = "# T\n\n- one\n- **two**\n\n1. first\n2. *second*\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        let html = convert(markup, "x").body_markup;
        assert_eq!(count(&html, "ul > li"), 2);
        assert_eq!(count(&html, "ol > li"), 2);
        assert_eq!(count(&html, "strong"), 1);
        assert_eq!(count(&html, "em"), 1);
        assert_eq!(count(&html, "table td"), 2);
    }

    #[test]
    fn test_fenced_response_is_unwrapped() {
        let markup = "```markdown\n# 러스트 소유권 완벽 정리\n\n원본 영상: https://youtu.be/abc\n\n## 소유권이란\n내용\n```\n";
        let draft = convert(markup, "x");
        assert_eq!(draft.title, "러스트 소유권 완벽 정리");
        assert_eq!(count(&draft.body_markup, "pre"), 0);
        assert_eq!(count(&draft.body_markup, "h2"), 1);
    }

    #[test]
    fn test_inner_code_blocks_are_kept() {
        let markup = "# Title\n\n```rust\nfn main() {}\n```\n\nAfter";
        assert_eq!(unwrap_code_fence(markup), markup);
        let markup = "```\n# A\n```\ntext\n```\nmore\n```";
        assert_eq!(unwrap_code_fence(markup), markup);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let markup = "# Same\n\nParagraph with `code`.";
        assert_eq!(convert(markup, "v"), convert(markup, "v"));
    }
}
