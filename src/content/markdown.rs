//! Markdown rendering with syntax highlighting, heading anchors and TOC extraction

use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use regex::Regex;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use super::{RenderedPost, TocEntry};
use crate::helpers::escape_html;

/// Theme used when the configured one is unknown
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

lazy_static! {
    // Loading the bundled syntax and theme dumps is slow; do it once per process.
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();

    static ref TOC_HEADING: Regex = Regex::new(r"(?m)^(#{2,3})[ \t]+(.+)$").unwrap();
    static ref NON_ID_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Anchor id for a heading: lower-cased, punctuation dropped, spaces to hyphens
///
/// Shared by the HTML renderer and [`extract_toc`] so in-page links and TOC
/// entries agree.
pub fn heading_id(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = NON_ID_CHARS.replace_all(&lower, "");
    WHITESPACE.replace_all(&stripped, "-").into_owned()
}

/// Table of contents from the level 2 and 3 heading lines of a markdown body
pub fn extract_toc(markdown: &str) -> Vec<TocEntry> {
    TOC_HEADING
        .captures_iter(markdown)
        .map(|caps| {
            let text = caps[2].trim().to_string();
            TocEntry {
                id: heading_id(&text),
                level: caps[1].len() as u8,
                text,
            }
        })
        .collect()
}

/// Heading text as written in the source, without the `#` markers
fn heading_source_text(source: &str) -> &str {
    let first_line = source.lines().next().unwrap_or_default();
    first_line.trim().trim_start_matches('#').trim()
}

/// Markdown renderer with syntax highlighting
///
/// Cheap to construct; the syntect assets behind it are process-wide.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Create with a specific syntect theme
    pub fn with_theme(theme: &str) -> Self {
        if !THEME_SET.themes.contains_key(theme) {
            tracing::warn!("Unknown highlight theme {:?}, using {}", theme, DEFAULT_THEME);
            return Self {
                theme_name: DEFAULT_THEME.to_string(),
            };
        }
        Self {
            theme_name: theme.to_string(),
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Render a post body to HTML and extract its table of contents
    pub fn render(&self, markdown: &str) -> RenderedPost {
        RenderedPost {
            content_html: self.render_html(markdown),
            toc: extract_toc(markdown),
        }
    }

    /// Render markdown to HTML
    pub fn render_html(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options).into_offset_iter();

        let mut events: Vec<Event> = Vec::new();
        // Language of the fenced block being collected, "" when none was declared
        let mut code_block: Option<String> = None;
        let mut code_block_content = String::new();

        for (event, range) in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info).to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_block = Some(lang);
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().unwrap_or_default();
                    let highlighted = self.highlight_code(&code_block_content, &lang);
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if code_block.is_some() => {
                    code_block_content.push_str(&text);
                }
                Event::Start(Tag::Heading {
                    level,
                    id: _,
                    classes,
                    attrs,
                }) if matches!(level, HeadingLevel::H1 | HeadingLevel::H2 | HeadingLevel::H3) => {
                    let id = heading_id(heading_source_text(&markdown[range]));
                    events.push(Event::Start(Tag::Heading {
                        level,
                        id: (!id.is_empty()).then(|| CowStr::from(id)),
                        classes,
                        attrs,
                    }));
                }
                _ => {
                    if code_block.is_none() {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block, falling back to an unstyled block
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let lang = if lang.is_empty() { "text" } else { lang };

        let highlighted = find_syntax(lang).zip(self.theme()).and_then(|(syntax, theme)| {
            highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme)
                .map_err(|e| tracing::debug!("Highlighting {} failed: {}", lang, e))
                .ok()
        });

        match highlighted {
            Some(html) => format!(r#"<div class="code-block">{}</div>"#, html),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(code)
            ),
        }
    }

    fn theme(&self) -> Option<&'static Theme> {
        THEME_SET.themes.get(&self.theme_name)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Language token of a fence info string (`rust,ignore` -> `rust`)
fn fence_language(info: &str) -> &str {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .next()
        .unwrap_or_default()
}

fn find_syntax(lang: &str) -> Option<&'static SyntaxReference> {
    if matches!(lang, "text" | "txt" | "plain" | "plaintext") {
        return Some(SYNTAX_SET.find_syntax_plain_text());
    }
    SYNTAX_SET
        .find_syntax_by_token(lang)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn toc(id: &str, text: &str, level: u8) -> TocEntry {
        TocEntry {
            id: id.to_string(),
            text: text.to_string(),
            level,
        }
    }

    #[test]
    fn test_heading_id() {
        assert_eq!(heading_id("Hello World"), "hello-world");
        assert_eq!(heading_id("What's new in Rust 1.80?"), "whats-new-in-rust-180");
        assert_eq!(heading_id("snake_case and-dash"), "snake_case-and-dash");
        assert_eq!(heading_id("  padded  "), "-padded-");
    }

    #[test]
    fn test_extract_toc() {
        assert_eq!(
            extract_toc("## A\ntext\n### B"),
            vec![toc("a", "A", 2), toc("b", "B", 3)]
        );
    }

    #[test]
    fn test_toc_skips_other_levels() {
        let md = "# Title\n## Kept\n#### Too deep\n##NoSpace\n### Also kept \n";
        assert_eq!(
            extract_toc(md),
            vec![toc("kept", "Kept", 2), toc("also-kept", "Also kept", 3)]
        );
    }

    #[test]
    fn test_duplicate_headings_share_id() {
        let entries = extract_toc("## Notes\n## Notes\n");
        assert_eq!(entries[0].id, entries[1].id);
    }

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("This is a *test*.");
        assert!(html.contains("<p>This is a <em>test</em>.</p>"));
    }

    #[test]
    fn test_heading_anchors_levels_one_to_three() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("# Top\n\n## Second Part\n\n### Third\n\n#### Fourth\n");
        assert!(html.contains(r#"<h1 id="top">Top</h1>"#), "{}", html);
        assert!(html.contains(r#"<h2 id="second-part">Second Part</h2>"#));
        assert!(html.contains(r#"<h3 id="third">Third</h3>"#));
        assert!(html.contains("<h4>Fourth</h4>"));
    }

    #[test]
    fn test_anchor_ids_match_toc() {
        let renderer = MarkdownRenderer::new();
        let body = "## Why `unsafe` Matters!\n\ntext\n\n### Step 2: Profit\n";
        let rendered = renderer.render(body);

        assert_eq!(rendered.toc.len(), 2);
        for entry in &rendered.toc {
            let anchor = format!(r#"id="{}""#, entry.id);
            assert!(
                rendered.content_html.contains(&anchor),
                "missing {} in {}",
                anchor,
                rendered.content_html
            );
        }
        assert_eq!(rendered.toc[0].id, "why-unsafe-matters");
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("```rust\nfn main() {}\n```");
        assert!(html.starts_with(r#"<div class="code-block"><pre"#), "{}", html);
        assert!(html.contains("main"));
    }

    #[test]
    fn test_code_block_without_language_is_plain_text() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("```\n<b>raw</b>\n```");
        assert!(html.contains(r#"<div class="code-block">"#));
        assert!(html.contains("&lt;b&gt;raw&lt;/b&gt;"));
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("```klingon\nqapla' <x>\n```");
        assert!(
            html.contains("<pre><code class=\"language-klingon\">qapla&#39; &lt;x&gt;\n</code></pre>"),
            "{}",
            html
        );
        assert!(!html.contains("code-block"));
    }

    #[test]
    fn test_fence_info_string() {
        assert_eq!(fence_language("rust,ignore"), "rust");
        assert_eq!(fence_language("js title=app.js"), "js");
        assert_eq!(fence_language(""), "");
    }

    #[test]
    fn test_heading_inside_code_block_is_not_anchored() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("```\n## not a heading\n```");
        assert!(!html.contains("<h2"));
    }

    #[test]
    fn test_unknown_theme_uses_default() {
        let renderer = MarkdownRenderer::with_theme("no-such-theme");
        assert_eq!(renderer.theme_name(), DEFAULT_THEME);

        let renderer = MarkdownRenderer::with_theme("InspiredGitHub");
        assert_eq!(renderer.theme_name(), "InspiredGitHub");
    }
}
