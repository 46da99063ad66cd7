//! Filesystem-backed content store.
//!
//! Walks `[store].root` and treats every file whose root-relative path
//! matches an include glob, and no exclude glob, as a document. VCS and
//! build directories are always excluded.

use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::path::normalize;

use super::ContentStore;

const DEFAULT_EXCLUDES: [&str; 3] = ["**/.git/**", "**/target/**", "**/node_modules/**"];

pub struct FsStore {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
    follow_symlinks: bool,
}

impl FsStore {
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let root = config.root.clone();
        if !root.is_dir() {
            return Err(StoreError::Io {
                path: root,
                source: std::io::Error::new(
                    ErrorKind::NotFound,
                    "content store root does not exist or is not a directory",
                ),
            });
        }

        let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        excludes.extend(config.exclude_globs.iter().cloned());

        Ok(Self {
            root,
            include: build_globset(&config.include_globs)?,
            exclude: build_globset(&excludes)?,
            follow_symlinks: config.follow_symlinks,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_document(&self, relative: &str) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }

    /// Resolve a normalized document path to its file, or `NotFound`.
    fn locate(&self, relative: &str) -> StoreResult<PathBuf> {
        if !self.is_document(relative) {
            debug!(path = relative, "path does not match store globs");
            return Err(StoreError::not_found(relative));
        }

        let mut full = self.root.clone();
        for segment in relative.split('/') {
            full.push(segment);
            let meta = match std::fs::symlink_metadata(&full) {
                Ok(meta) => meta,
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                    return Err(StoreError::not_found(relative))
                }
                Err(source) => return Err(StoreError::Io { path: full, source }),
            };
            // Any linked component, file or directory, is invisible to the walk.
            if meta.file_type().is_symlink() && !self.follow_symlinks {
                debug!(path = relative, link = %full.display(), "symlink not followed");
                return Err(StoreError::not_found(relative));
            }
        }

        if !full.is_file() {
            return Err(StoreError::not_found(relative));
        }
        Ok(full)
    }
}

impl ContentStore for FsStore {
    fn list_documents(&self) -> StoreResult<Vec<String>> {
        let mut paths = Vec::new();

        let walker = WalkDir::new(&self.root).follow_links(self.follow_symlinks);
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            let Some(rel_str) = relative_to_store_path(relative) else {
                warn!(path = %path.display(), "skipping file with non UTF-8 name");
                continue;
            };

            if self.is_document(&rel_str) {
                paths.push(rel_str);
            }
        }

        // Sort for deterministic ordering
        paths.sort();
        debug!(root = %self.root.display(), count = paths.len(), "listed documents");
        Ok(paths)
    }

    fn get_document(&self, path: &str) -> StoreResult<String> {
        let relative = normalize(path)?;
        let full = self.locate(&relative)?;

        let bytes = std::fs::read(&full).map_err(|source| StoreError::Io {
            path: full.clone(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| StoreError::NotUtf8 { path: relative })
    }

    fn modified_at(&self, path: &str) -> StoreResult<Option<DateTime<Utc>>> {
        let relative = normalize(path)?;
        let full = self.locate(&relative)?;
        let metadata = std::fs::metadata(&full).map_err(|source| StoreError::Io {
            path: full.clone(),
            source,
        })?;
        Ok(metadata.modified().ok().map(DateTime::<Utc>::from))
    }
}

fn relative_to_store_path(relative: &Path) -> Option<String> {
    let segments = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}

fn build_globset(patterns: &[String]) -> StoreResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
