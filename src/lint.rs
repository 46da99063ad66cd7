//! Structural checks over a content store.
//!
//! Each [`Rule`] inspects either a single document (title, fences, front
//! matter, file name) or the store as a whole (duplicate paths, read
//! stability). Results are collected into a [`LintReport`] whose
//! violations carry a stable rule code, a location, and a fix hint.
//!
//! # Rules
//!
//! | Code | Severity |
//! |------|----------|
//! | `invalid_utf8` | error |
//! | `missing_title` | error |
//! | `unbalanced_fence` | error |
//! | `duplicate_path` | error |
//! | `unstable_read` | error |
//! | `invalid_front_matter` | error |
//! | `filename_style` | warning |
//! | `empty_document` | warning |

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::LintConfig;
use crate::error::{StoreError, StoreResult};
use crate::markdown::{self, content_hash};
use crate::progress::{ProgressEvent, ProgressReporter};
use crate::store::ContentStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    InvalidUtf8,
    MissingTitle,
    UnbalancedFence,
    DuplicatePath,
    UnstableRead,
    InvalidFrontMatter,
    FilenameStyle,
    EmptyDocument,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Rule {
    pub const ALL: [Rule; 8] = [
        Rule::InvalidUtf8,
        Rule::MissingTitle,
        Rule::UnbalancedFence,
        Rule::DuplicatePath,
        Rule::UnstableRead,
        Rule::InvalidFrontMatter,
        Rule::FilenameStyle,
        Rule::EmptyDocument,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Rule::InvalidUtf8 => "invalid_utf8",
            Rule::MissingTitle => "missing_title",
            Rule::UnbalancedFence => "unbalanced_fence",
            Rule::DuplicatePath => "duplicate_path",
            Rule::UnstableRead => "unstable_read",
            Rule::InvalidFrontMatter => "invalid_front_matter",
            Rule::FilenameStyle => "filename_style",
            Rule::EmptyDocument => "empty_document",
        }
    }

    pub fn from_code(code: &str) -> Option<Rule> {
        Rule::ALL.into_iter().find(|r| r.code() == code)
    }

    pub fn severity(self) -> Severity {
        match self {
            Rule::FilenameStyle | Rule::EmptyDocument => Severity::Warning,
            _ => Severity::Error,
        }
    }

    fn hint(self) -> &'static str {
        match self {
            Rule::InvalidUtf8 => "re-save the file as UTF-8",
            Rule::MissingTitle => "start the document with a `# Title` heading",
            Rule::UnbalancedFence => "close the code block with a matching fence",
            Rule::DuplicatePath => "rename one of the files so paths are distinct",
            Rule::UnstableRead => "check for a process rewriting the file",
            Rule::InvalidFrontMatter => "fix the TOML between the `+++` lines",
            Rule::FilenameStyle => "rename the file to lower_snake_case.md",
            Rule::EmptyDocument => "add content or remove the file",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Violation {
    pub rule: Rule,
    pub severity: Severity,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
    pub hint: &'static str,
}

fn violation(rule: Rule, path: &str, line: Option<usize>, message: impl Into<String>) -> Violation {
    Violation {
        rule,
        severity: rule.severity(),
        path: path.to_string(),
        line,
        message: message.into(),
        hint: rule.hint(),
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct LintReport {
    pub documents_checked: usize,
    pub errors: usize,
    pub warnings: usize,
    pub violations: Vec<Violation>,
}

impl LintReport {
    fn from_violations(documents_checked: usize, mut violations: Vec<Violation>) -> Self {
        violations.sort_by(|a, b| {
            (&a.path, a.line, a.rule).cmp(&(&b.path, b.line, b.rule))
        });
        let errors = violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count();
        Self {
            documents_checked,
            errors,
            warnings: violations.len() - errors,
            violations,
        }
    }

    /// Whether the run should fail: any error, or any warning under `deny_warnings`.
    pub fn failed(&self, deny_warnings: bool) -> bool {
        self.errors > 0 || (deny_warnings && self.warnings > 0)
    }
}

/// Content rules for one document's text.
pub fn lint_text(path: &str, text: &str, config: &LintConfig) -> Vec<Violation> {
    let mut out = Vec::new();
    let outline = markdown::parse(text);

    if config.is_enabled(Rule::InvalidFrontMatter) {
        if let Some(ref err) = outline.front_matter_error {
            out.push(violation(
                Rule::InvalidFrontMatter,
                path,
                Some(1),
                format!("front matter is not valid TOML: {}", err.trim()),
            ));
        }
    }

    let blank = outline.headings.is_empty() && outline.snippets.is_empty() && {
        let start = text.trim_start();
        start.is_empty()
            || ((outline.front_matter.is_some() || outline.front_matter_error.is_some())
                && body_after_front_matter_is_blank(text))
    };

    if blank {
        if config.is_enabled(Rule::EmptyDocument) {
            out.push(violation(Rule::EmptyDocument, path, None, "document has no content"));
        }
    } else if config.is_enabled(Rule::MissingTitle) && !outline.has_top_level_heading() {
        let message = match outline.headings.first() {
            Some(h) => format!(
                "no level-1 heading; first heading is level {} ('{}')",
                h.level, h.text
            ),
            None => "document has no headings".to_string(),
        };
        out.push(violation(Rule::MissingTitle, path, None, message));
    }

    if config.is_enabled(Rule::UnbalancedFence) {
        if let Some(line) = markdown::unclosed_fence(text) {
            out.push(violation(
                Rule::UnbalancedFence,
                path,
                Some(line),
                "code fence is opened here and never closed",
            ));
        }
    }

    if config.is_enabled(Rule::FilenameStyle) {
        let name = crate::path::file_name(path);
        if !crate::path::is_snake_case_markdown(name) {
            out.push(violation(
                Rule::FilenameStyle,
                path,
                None,
                format!("file name '{}' is not lower_snake_case .md", name),
            ));
        }
    }

    out
}

fn body_after_front_matter_is_blank(text: &str) -> bool {
    // Skip the opening delimiter line, then everything up to the closing one.
    let mut lines = text.lines();
    let Some(delimiter) = lines.next().map(str::trim_end) else {
        return true;
    };
    lines
        .skip_while(|l| l.trim_end() != delimiter)
        .skip(1)
        .all(|l| l.trim().is_empty())
}

/// Store-level rules over the listed paths.
fn lint_paths(paths: &[String], config: &LintConfig) -> Vec<Violation> {
    let mut out = Vec::new();
    if !config.is_enabled(Rule::DuplicatePath) {
        return out;
    }

    let mut by_folded: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for p in paths {
        by_folded.entry(p.to_ascii_lowercase()).or_default().push(p);
    }

    for group in by_folded.values().filter(|g| g.len() > 1) {
        let first = group[0];
        for other in &group[1..] {
            let message = if *other == first {
                format!("path '{}' is listed more than once", other)
            } else {
                format!("path collides with '{}' when case is ignored", first)
            };
            out.push(violation(Rule::DuplicatePath, other, None, message));
        }
    }
    out
}

/// Run every enabled rule over `store`.
///
/// Unreadable documents (I/O errors) abort the run; non-UTF-8 documents are
/// reported as violations.
pub fn lint_store(
    store: &dyn ContentStore,
    config: &LintConfig,
    progress: &dyn ProgressReporter,
) -> StoreResult<LintReport> {
    progress.report(ProgressEvent::Listing);
    let paths = store.list_documents()?;
    let total = paths.len() as u64;

    let mut violations = lint_paths(&paths, config);

    for (i, p) in paths.iter().enumerate() {
        let text = match store.get_document(p) {
            Ok(text) => text,
            Err(StoreError::NotUtf8 { path }) => {
                if config.is_enabled(Rule::InvalidUtf8) {
                    violations.push(violation(
                        Rule::InvalidUtf8,
                        &path,
                        None,
                        "document bytes are not valid UTF-8",
                    ));
                }
                progress.report(ProgressEvent::Checking { n: i as u64 + 1, total });
                continue;
            }
            Err(e) => return Err(e),
        };

        if config.is_enabled(Rule::UnstableRead) {
            let again = store.get_document(p)?;
            if content_hash(text.as_bytes()) != content_hash(again.as_bytes()) {
                violations.push(violation(
                    Rule::UnstableRead,
                    p,
                    None,
                    "two reads of the document returned different content",
                ));
            }
        }

        let found = lint_text(p, &text, config);
        debug!(path = %p, violations = found.len(), "checked document");
        violations.extend(found);
        progress.report(ProgressEvent::Checking { n: i as u64 + 1, total });
    }

    let report = LintReport::from_violations(paths.len(), violations);
    info!(
        documents = report.documents_checked,
        errors = report.errors,
        warnings = report.warnings,
        "lint finished"
    );
    Ok(report)
}
