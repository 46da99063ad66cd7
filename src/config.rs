//! TOML configuration.
//!
//! Every section has defaults, so a config file only needs `[store].root`.
//! Without any file, [`Config::minimal`] serves the given directory with the
//! default globs.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::lint::Rule;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "corpus.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub lint: LintConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.md".to_string()]
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LintConfig {
    #[serde(default)]
    pub disabled_rules: Vec<String>,
    #[serde(default)]
    pub deny_warnings: bool,
}

impl LintConfig {
    pub fn is_enabled(&self, rule: Rule) -> bool {
        !self.disabled_rules.iter().any(|r| r == rule.code())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

impl Config {
    /// Defaults for serving `root` without a config file.
    pub fn minimal(root: impl Into<PathBuf>) -> Self {
        Self {
            store: StoreConfig {
                root: root.into(),
                include_globs: default_include_globs(),
                exclude_globs: Vec::new(),
                follow_symlinks: false,
            },
            lint: LintConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // A relative root is relative to the config file, not the working directory.
    if config.store.root.is_relative() {
        if let Some(parent) = path.parent() {
            config.store.root = parent.join(&config.store.root);
        }
    }

    validate(&config)?;
    Ok(config)
}

/// Pick the configuration for a CLI invocation.
///
/// An explicit `--config` must load. Otherwise `./corpus.toml` is used when
/// present, falling back to [`Config::minimal`] over the working directory.
/// `--root` overrides the store root in every case.
pub fn resolve_config(config_path: Option<&Path>, root: Option<&Path>) -> Result<Config> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                load_config(default_path)?
            } else {
                Config::minimal(".")
            }
        }
    };

    if let Some(root) = root {
        config.store.root = root.to_path_buf();
    }
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.store.include_globs.is_empty() {
        bail!("store.include_globs must not be empty");
    }
    for pattern in config
        .store
        .include_globs
        .iter()
        .chain(&config.store.exclude_globs)
    {
        globset::Glob::new(pattern)
            .with_context(|| format!("Invalid glob in [store]: '{}'", pattern))?;
    }

    for code in &config.lint.disabled_rules {
        if Rule::from_code(code).is_none() {
            bail!(
                "Unknown lint rule in lint.disabled_rules: '{}'. Known rules: {}",
                code,
                Rule::ALL
                    .iter()
                    .map(|r| r.code())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    config
        .server
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("server.bind is not a socket address: '{}'", config.server.bind))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("corpus.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults_apply() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[store]\nroot = \"docs\"\n");
        let config = load_config(&path).unwrap();

        assert_eq!(config.store.root, tmp.path().join("docs"));
        assert_eq!(config.store.include_globs, vec!["**/*.md"]);
        assert!(!config.store.follow_symlinks);
        assert!(config.lint.disabled_rules.is_empty());
        assert_eq!(config.server.bind, "127.0.0.1:7340");
    }

    #[test]
    fn test_absolute_root_is_kept() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("abs");
        let path = write_config(
            &tmp,
            &format!("[store]\nroot = {:?}\n", root.display().to_string()),
        );
        assert_eq!(load_config(&path).unwrap().store.root, root);
    }

    #[test]
    fn test_rejects_unknown_rule() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(
            &tmp,
            "[store]\nroot = \".\"\n\n[lint]\ndisabled_rules = [\"no_such_rule\"]\n",
        );
        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("no_such_rule"));
    }

    #[test]
    fn test_rejects_bad_glob_and_bind() {
        let tmp = TempDir::new().unwrap();
        let path = write_config(&tmp, "[store]\nroot = \".\"\nexclude_globs = [\"a[\"]\n");
        assert!(load_config(&path).is_err());

        let path = write_config(&tmp, "[store]\nroot = \".\"\n\n[server]\nbind = \"nowhere\"\n");
        assert!(load_config(&path).is_err());

        let path = write_config(&tmp, "[store]\nroot = \".\"\ninclude_globs = []\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_disabled_rule_lookup() {
        let lint = LintConfig {
            disabled_rules: vec!["filename_style".to_string()],
            deny_warnings: false,
        };
        assert!(!lint.is_enabled(Rule::FilenameStyle));
        assert!(lint.is_enabled(Rule::MissingTitle));
    }

    #[test]
    fn test_root_override() {
        let config = resolve_config(None, Some(Path::new("/srv/docs"))).unwrap();
        assert_eq!(config.store.root, PathBuf::from("/srv/docs"));
    }
}
