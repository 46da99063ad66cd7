//! Markdown structure extraction.
//!
//! Derives the outline of a document (headings, fenced code snippets,
//! blockquotes, front matter) with `pulldown-cmark`. Nothing here renders
//! HTML; consumers get raw markdown plus this outline.
//!
//! [`unclosed_fence`] is a separate line scanner: the CommonMark parser
//! silently closes a dangling fence at end of input, so it cannot report one.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use sha2::{Digest, Sha256};

use crate::models::{CodeSnippet, FrontMatter, Heading};

/// Structure derived from one document body.
#[derive(Debug, Default)]
pub struct Outline {
    /// Text of the first heading, any level.
    pub title: Option<String>,
    pub headings: Vec<Heading>,
    pub snippets: Vec<CodeSnippet>,
    pub blockquotes: usize,
    pub front_matter: Option<FrontMatter>,
    /// Parse error of a `+++` block; the block is then treated as absent.
    pub front_matter_error: Option<String>,
}

impl Outline {
    pub fn has_top_level_heading(&self) -> bool {
        self.headings.iter().any(|h| h.level == 1)
    }
}

/// A leading metadata block split off the body.
struct FrontMatterBlock<'a> {
    delimiter: &'static str,
    raw: &'a str,
    /// Byte offset where markdown content starts.
    content_start: usize,
    /// Lines consumed by the block, delimiters included.
    lines: usize,
}

fn split_front_matter(text: &str) -> Option<FrontMatterBlock<'_>> {
    let delimiter = ["+++", "---"]
        .into_iter()
        .find(|d| first_line(text).trim_end() == *d)?;

    let mut offset = first_line_len(text);
    let raw_start = offset;
    let mut lines = 1;
    while offset < text.len() {
        let line = first_line(&text[offset..]);
        let len = first_line_len(&text[offset..]);
        lines += 1;
        if line.trim_end() == delimiter {
            return Some(FrontMatterBlock {
                delimiter,
                raw: &text[raw_start..offset],
                content_start: offset + len,
                lines,
            });
        }
        offset += len;
    }
    None
}

fn first_line(text: &str) -> &str {
    text.split('\n').next().unwrap_or("").trim_end_matches('\r')
}

fn first_line_len(text: &str) -> usize {
    text.find('\n').map(|i| i + 1).unwrap_or(text.len())
}

/// Maps byte offsets of a string to 1-based line numbers.
struct LineIndex {
    starts: Vec<usize>,
    base: usize,
}

impl LineIndex {
    fn new(text: &str, base: usize) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts, base }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset) + self.base
    }
}

/// Parse a document body into its [`Outline`].
pub fn parse(text: &str) -> Outline {
    let mut outline = Outline::default();

    let (content, line_base) = match split_front_matter(text) {
        Some(block) => {
            match block.delimiter {
                "+++" => match block.raw.parse::<toml::Table>() {
                    Ok(table) => outline.front_matter = Some(FrontMatter::Toml(table)),
                    Err(e) => outline.front_matter_error = Some(e.message().to_string()),
                },
                _ => outline.front_matter = Some(FrontMatter::Yaml(block.raw.to_string())),
            }
            (&text[block.content_start..], block.lines)
        }
        None => (text, 0),
    };

    let index = LineIndex::new(content, line_base);
    let mut heading: Option<Heading> = None;
    let mut snippet: Option<CodeSnippet> = None;
    let mut quote_depth = 0usize;

    for (event, range) in Parser::new_ext(content, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some(Heading {
                    level: level as u8,
                    text: String::new(),
                    line: index.line_of(range.start),
                });
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut h) = heading.take() {
                    h.text = h.text.trim().to_string();
                    if outline.title.is_none() && !h.text.is_empty() {
                        outline.title = Some(h.text.clone());
                    }
                    outline.headings.push(h);
                }
            }
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let language = info.split_whitespace().next().map(str::to_string);
                snippet = Some(CodeSnippet {
                    language,
                    content: String::new(),
                    line: index.line_of(range.start),
                });
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(s) = snippet.take() {
                    outline.snippets.push(s);
                }
            }
            Event::Start(Tag::BlockQuote(_)) => {
                if quote_depth == 0 {
                    outline.blockquotes += 1;
                }
                quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote(..)) => {
                quote_depth = quote_depth.saturating_sub(1);
            }
            Event::Text(t) => {
                if let Some(s) = snippet.as_mut() {
                    s.content.push_str(&t);
                } else if let Some(h) = heading.as_mut() {
                    h.text.push_str(&t);
                }
            }
            Event::Code(t) => {
                if let Some(h) = heading.as_mut() {
                    h.text.push_str(&t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(h) = heading.as_mut() {
                    h.text.push(' ');
                }
            }
            _ => {}
        }
    }

    outline
}

/// Line of a fenced code block that is opened and never closed.
///
/// A fence opened inside a blockquote only sees lines at the same quote
/// depth; lines at any other depth are fence content or unrelated quotes.
pub fn unclosed_fence(text: &str) -> Option<usize> {
    let mut open: Option<OpenFence> = None;

    for (i, raw_line) in text.lines().enumerate() {
        match open {
            Some(fence) => {
                let (depth, line) = strip_quote_markers(raw_line, fence.depth);
                if depth != fence.depth {
                    continue;
                }
                if let Some((ch, len, rest)) = fence_marker(line) {
                    if ch == fence.ch && len >= fence.len && rest.trim().is_empty() {
                        open = None;
                    }
                }
            }
            None => {
                let (depth, line) = strip_quote_markers(raw_line, usize::MAX);
                let Some((ch, len, rest)) = fence_marker(line) else {
                    continue;
                };
                if ch == '`' && rest.contains('`') {
                    continue;
                }
                open = Some(OpenFence {
                    ch,
                    len,
                    depth,
                    line: i + 1,
                });
            }
        }
    }

    open.map(|fence| fence.line)
}

#[derive(Clone, Copy)]
struct OpenFence {
    ch: char,
    len: usize,
    depth: usize,
    line: usize,
}

/// Strip up to `max` leading `>` markers; returns how many were stripped.
fn strip_quote_markers(mut line: &str, max: usize) -> (usize, &str) {
    let mut depth = 0;
    while depth < max {
        let trimmed = line.trim_start_matches(' ');
        if line.len() - trimmed.len() > 3 {
            break;
        }
        match trimmed.strip_prefix('>') {
            Some(rest) => {
                line = rest.strip_prefix(' ').unwrap_or(rest);
                depth += 1;
            }
            None => break,
        }
    }
    (depth, line)
}

/// `(fence char, run length, text after the run)` when `line` is a fence.
fn fence_marker(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == ch).count();
    if len < 3 {
        return None;
    }
    Some((ch, len, &trimmed[len..]))
}

/// SHA-256 hex digest of raw document bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "# Understanding the Event Loop\n\
\n\
> The event loop is what allows Node.js to perform non-blocking I/O.\n\
\n\
## Phases\n\
\n\
```js\n\
setTimeout(() => console.log('timeout'), 0);\n\
```\n\
\n\
### `process.nextTick`\n\
\n\
```\n\
plain block\n\
```\n";

    #[test]
    fn test_outline_of_article() {
        let outline = parse(ARTICLE);
        assert_eq!(outline.title.as_deref(), Some("Understanding the Event Loop"));
        assert_eq!(outline.blockquotes, 1);
        assert!(outline.has_top_level_heading());

        let levels: Vec<u8> = outline.headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
        assert_eq!(outline.headings[2].text, "process.nextTick");
        assert_eq!(outline.headings[1].line, 5);

        assert_eq!(outline.snippets.len(), 2);
        assert_eq!(outline.snippets[0].language.as_deref(), Some("js"));
        assert_eq!(outline.snippets[0].line, 7);
        assert_eq!(
            outline.snippets[0].content,
            "setTimeout(() => console.log('timeout'), 0);\n"
        );
        assert_eq!(outline.snippets[1].language, None);
        assert_eq!(outline.snippets[1].line, 13);
    }

    #[test]
    fn test_title_falls_back_to_first_heading_of_any_level() {
        let outline = parse("Intro text.\n\n## Launch Templates\n\nBody.");
        assert_eq!(outline.title.as_deref(), Some("Launch Templates"));
        assert!(!outline.has_top_level_heading());
    }

    #[test]
    fn test_no_heading_means_no_title() {
        let outline = parse("Just prose.\n");
        assert!(outline.title.is_none());
        assert!(outline.headings.is_empty());
    }

    #[test]
    fn test_setext_heading_is_top_level() {
        let outline = parse("Dedicated Hosts\n===============\n\nText.");
        assert_eq!(outline.title.as_deref(), Some("Dedicated Hosts"));
        assert!(outline.has_top_level_heading());
    }

    #[test]
    fn test_indented_code_is_not_a_snippet() {
        let outline = parse("# T\n\n    indented code\n");
        assert!(outline.snippets.is_empty());
    }

    #[test]
    fn test_toml_front_matter() {
        let text = "+++\nauthor = \"platform\"\ntags = [\"aws\"]\n+++\n# Lambda\n\nBody.\n";
        let outline = parse(text);
        match outline.front_matter {
            Some(FrontMatter::Toml(ref table)) => {
                assert_eq!(table["author"].as_str(), Some("platform"));
            }
            ref other => panic!("expected TOML front matter, got {:?}", other),
        }
        assert_eq!(outline.title.as_deref(), Some("Lambda"));
        assert_eq!(outline.headings[0].line, 5);
    }

    #[test]
    fn test_yaml_front_matter_is_not_a_heading() {
        let text = "---\ntitle: Sessions\n---\n# Session Stores\n";
        let outline = parse(text);
        assert_eq!(
            outline.front_matter,
            Some(FrontMatter::Yaml("title: Sessions\n".to_string()))
        );
        assert_eq!(outline.title.as_deref(), Some("Session Stores"));
        assert_eq!(outline.headings.len(), 1);
    }

    #[test]
    fn test_broken_toml_front_matter() {
        let outline = parse("+++\nnot toml at all\n+++\n# T\n");
        assert!(outline.front_matter.is_none());
        assert!(outline.front_matter_error.is_some());
    }

    #[test]
    fn test_unterminated_front_matter_is_plain_markdown() {
        let outline = parse("---\n# Heading\n");
        assert!(outline.front_matter.is_none());
        assert_eq!(outline.title.as_deref(), Some("Heading"));
    }

    #[test]
    fn test_balanced_fences() {
        assert_eq!(unclosed_fence(ARTICLE), None);
        assert_eq!(unclosed_fence("````md\n```js\n```\n````\n"), None);
        assert_eq!(unclosed_fence("~~~\ncode\n~~~\n"), None);
    }

    #[test]
    fn test_dangling_fence_reports_opening_line() {
        let text = "# T\n\n```bash\necho hi\n\nMore prose.\n";
        assert_eq!(unclosed_fence(text), Some(3));
    }

    #[test]
    fn test_closing_fence_must_match() {
        // a tilde line cannot close a backtick fence
        assert_eq!(unclosed_fence("```\ncode\n~~~\n"), Some(1));
        // a shorter run cannot close a longer one
        assert_eq!(unclosed_fence("````\ncode\n```\n"), Some(1));
        // a closing fence has no info string
        assert_eq!(unclosed_fence("```\ncode\n```js\n"), Some(1));
    }

    #[test]
    fn test_fences_inside_blockquotes() {
        assert_eq!(unclosed_fence("> ```json\n> {}\n> ```\n"), None);
        assert_eq!(unclosed_fence("> ```json\n> {}\n"), Some(1));
        assert_eq!(unclosed_fence("> > ```\n> > x\n> > ```\n"), None);
    }

    #[test]
    fn test_quoted_fence_inside_fenced_example() {
        let text = "# T\n\n```markdown\n> ```js\n> code\n> ```\n```\n";
        assert_eq!(parse(text).snippets.len(), 1);
        assert_eq!(unclosed_fence(text), None);
        // quote lines do not close a fence opened outside the quote
        assert_eq!(unclosed_fence("```\n> ```\n"), Some(1));
    }

    #[test]
    fn test_inline_backticks_are_not_fences() {
        assert_eq!(unclosed_fence("```inline``` code\n"), None);
        assert_eq!(unclosed_fence("    ```\n"), None);
    }

    #[test]
    fn test_content_hash_is_stable() {
        let a = content_hash(b"# Title\n");
        assert_eq!(a, content_hash(b"# Title\n"));
        assert_ne!(a, content_hash(b"# Title!\n"));
        assert_eq!(a.len(), 64);
    }
}
