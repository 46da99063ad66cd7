//! Document path normalization and topic derivation.
//!
//! Document paths are store-relative, `/`-separated, and never escape the
//! store root. `aws/compute_services/batch.md` has topic area `aws` and
//! topic category `compute_services`.

use crate::error::{StoreError, StoreResult};

/// Normalize a caller-supplied path into the canonical store form.
///
/// Backslashes become `/`, `.` segments and repeated separators are
/// dropped. Empty, absolute, and `..`-containing paths are rejected.
pub fn normalize(raw: &str) -> StoreResult<String> {
    let invalid = |reason| StoreError::InvalidPath {
        path: raw.to_string(),
        reason,
    };

    let unified = raw.replace('\\', "/");
    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(invalid("path must be relative to the store root"));
    }

    let mut segments = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(invalid("path must not contain '..'")),
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return Err(invalid("path is empty"));
    }
    Ok(segments.join("/"))
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// First directory of the path, if the document is not at the root.
pub fn topic_area(path: &str) -> Option<&str> {
    let (dir, _) = path.rsplit_once('/')?;
    dir.split('/').next()
}

/// Directory directly containing the document, if any.
pub fn topic_category(path: &str) -> Option<&str> {
    let (dir, _) = path.rsplit_once('/')?;
    Some(dir.rsplit('/').next().unwrap_or(dir))
}

/// Final path segment.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// True for `lower_snake_case.md` names (digits allowed).
pub fn is_snake_case_markdown(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".md") else {
        return false;
    };
    !stem.is_empty()
        && !stem.starts_with('_')
        && !stem.ends_with('_')
        && !stem.contains("__")
        && stem
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cleans_separators() {
        assert_eq!(
            normalize("./aws//compute_services/batch.md").unwrap(),
            "aws/compute_services/batch.md"
        );
        assert_eq!(
            normalize("node_js\\node_js_fundamentals\\event_loop.md").unwrap(),
            "node_js/node_js_fundamentals/event_loop.md"
        );
    }

    #[test]
    fn test_normalize_rejects_escape() {
        let err = normalize("aws/../../etc/passwd").unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath { .. }));
        assert!(normalize("/etc/passwd").is_err());
        assert!(normalize("C:/docs/a.md").is_err());
        assert!(normalize("./").is_err());
        assert!(normalize("").is_err());
    }

    #[test]
    fn test_topics() {
        let p = "node_js/authentication_and_authorization/passport_strategies.md";
        assert_eq!(topic_area(p), Some("node_js"));
        assert_eq!(topic_category(p), Some("authentication_and_authorization"));
        assert_eq!(file_name(p), "passport_strategies.md");

        assert_eq!(topic_area("readme.md"), None);
        assert_eq!(topic_category("readme.md"), None);
        assert_eq!(topic_area("aws/lambda.md"), Some("aws"));
        assert_eq!(topic_category("aws/lambda.md"), Some("aws"));
    }

    #[test]
    fn test_snake_case_names() {
        assert!(is_snake_case_markdown("auto_scaling_groups.md"));
        assert!(is_snake_case_markdown("v8_engine.md"));
        assert!(!is_snake_case_markdown("AutoScaling.md"));
        assert!(!is_snake_case_markdown("event-loop.md"));
        assert!(!is_snake_case_markdown("notes.txt"));
        assert!(!is_snake_case_markdown("_draft.md"));
        assert!(!is_snake_case_markdown(".md"));
    }
}
