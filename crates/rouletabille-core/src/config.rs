/*
 * config.rs
 * Copyright (c) 2025 The rouletabille.fr authors
 *
 * Site configuration and build-start information.
 */

//! Site configuration.
//!
//! Configuration comes from an optional `rouletabille.yml` at the project
//! root:
//!
//! ```yaml
//! input: templates
//! output: _site
//! static: static
//! includes: _includes       # relative to input
//! path_prefix: /rouletabille.fr/
//! css_bundle: bundle.css
//! commit_env: COMMIT_SHA
//! ```
//!
//! Every key is optional. [`SiteConfig`] is the parsed file; [`BuildConfig`]
//! is the resolved form handed to the build, carrying absolute directories
//! and the [`BuildInfo`] captured once at build start.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteError};

/// Configuration file looked up at the project root.
pub const CONFIG_FILE: &str = "rouletabille.yml";

/// Environment variable supplying the commit identifier by default.
pub const DEFAULT_COMMIT_ENV: &str = "COMMIT_SHA";

/// Stand-in used when no commit identifier is available.
pub const COMMIT_PLACEHOLDER: &str = "deadbeefc0ffee";

/// Number of characters of the commit identifier exposed to templates.
const COMMIT_SHA_LEN: usize = 7;

/// Parsed `rouletabille.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Input directory, relative to the project root
    pub input: PathBuf,

    /// Output directory, relative to the project root
    pub output: PathBuf,

    /// Directory copied verbatim to the output root
    #[serde(rename = "static")]
    pub static_dir: PathBuf,

    /// Shared include directory, relative to the input directory.
    /// Second load path for style compilation.
    pub includes: PathBuf,

    /// Prefix for deployment under a sub-path
    pub path_prefix: String,

    /// File name of the minified CSS bundle in the output root
    pub css_bundle: String,

    /// Environment variable holding the commit identifier
    pub commit_env: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("templates"),
            output: PathBuf::from("_site"),
            static_dir: PathBuf::from("static"),
            includes: PathBuf::from("_includes"),
            path_prefix: "/".to_string(),
            css_bundle: "bundle.css".to_string(),
            commit_env: DEFAULT_COMMIT_ENV.to_string(),
        }
    }
}

impl SiteConfig {
    /// Load `rouletabille.yml` from `root`, or defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SiteError::io_at(path, e))?;
        Self::from_yaml_str(&content, path)
    }

    /// Parse configuration YAML; `origin` is only used in error messages.
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| SiteError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Global values exposed to every page, captured once at build start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    /// Build date, `YYYY-MM-DD`
    pub deployed_at: String,

    /// Short commit identifier
    pub commit_sha: String,
}

impl BuildInfo {
    /// Capture today's UTC date and the commit identifier from `commit_env`.
    pub fn capture(commit_env: &str) -> Self {
        let commit = std::env::var(commit_env).ok();
        Self::new(commit.as_deref(), Utc::now().date_naive())
    }

    pub fn new(commit: Option<&str>, date: NaiveDate) -> Self {
        Self {
            deployed_at: date.format("%Y-%m-%d").to_string(),
            commit_sha: short_commit(commit),
        }
    }
}

/// First characters of the commit identifier, falling back to the
/// placeholder when the value is missing or empty.
pub fn short_commit(value: Option<&str>) -> String {
    let value = value
        .filter(|v| !v.is_empty())
        .unwrap_or(COMMIT_PLACEHOLDER);
    value.chars().take(COMMIT_SHA_LEN).collect()
}

/// Normalize a deployment prefix to start and end with `/`.
///
/// `""`, `"/"` and `"//"` all mean "served from the root".
pub fn normalize_path_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}

/// Resolved build configuration.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root (canonical)
    pub root: PathBuf,

    /// Input directory (absolute)
    pub input_dir: PathBuf,

    /// Output directory (absolute)
    pub output_dir: PathBuf,

    /// Static passthrough directory (absolute)
    pub static_dir: PathBuf,

    /// Shared include directory (absolute)
    pub includes_dir: PathBuf,

    /// Normalized deployment prefix, e.g. `/` or `/rouletabille.fr/`
    pub path_prefix: String,

    /// File name of the CSS bundle
    pub css_bundle: String,

    /// Build-start globals
    pub info: BuildInfo,
}

impl BuildConfig {
    /// Resolve `config` against the project `root`.
    pub fn resolve(root: &Path, config: &SiteConfig, info: BuildInfo) -> Result<Self> {
        let root = root.canonicalize().map_err(|e| SiteError::io_at(root, e))?;
        let input_dir = root.join(&config.input);

        if config.css_bundle.is_empty() || config.css_bundle.contains(['/', '\\']) {
            return Err(SiteError::Config {
                path: root.join(CONFIG_FILE),
                message: format!("css_bundle must be a plain file name, got '{}'", config.css_bundle),
            });
        }

        Ok(Self {
            output_dir: root.join(&config.output),
            static_dir: root.join(&config.static_dir),
            includes_dir: input_dir.join(&config.includes),
            input_dir,
            path_prefix: normalize_path_prefix(&config.path_prefix),
            css_bundle: config.css_bundle.clone(),
            info,
            root,
        })
    }

    /// Path of the CSS bundle in the output tree.
    pub fn bundle_path(&self) -> PathBuf {
        self.output_dir.join(&self.css_bundle)
    }

    /// URL of the CSS bundle, including the deployment prefix.
    pub fn bundle_url(&self) -> String {
        format!("{}{}", self.path_prefix, self.css_bundle)
    }

    /// Whether the site is deployed under a sub-path.
    pub fn has_path_prefix(&self) -> bool {
        self.path_prefix != "/"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    #[test]
    fn test_short_commit() {
        assert_eq!(short_commit(Some("abcdef1234567")), "abcdef1");
        assert_eq!(short_commit(None), "deadbee");
        assert_eq!(short_commit(Some("")), "deadbee");
        assert_eq!(short_commit(Some("abc")), "abc");
    }

    #[test]
    fn test_build_info() {
        let info = BuildInfo::new(Some("abcdef1234567"), date());
        assert_eq!(info.deployed_at, "2025-03-09");
        assert_eq!(info.commit_sha, "abcdef1");

        let info = BuildInfo::new(None, date());
        assert_eq!(info.commit_sha, &COMMIT_PLACEHOLDER[..7]);
    }

    #[test]
    fn test_normalize_path_prefix() {
        assert_eq!(normalize_path_prefix(""), "/");
        assert_eq!(normalize_path_prefix("/"), "/");
        assert_eq!(normalize_path_prefix("rouletabille.fr"), "/rouletabille.fr/");
        assert_eq!(normalize_path_prefix("/rouletabille.fr/"), "/rouletabille.fr/");
        assert_eq!(normalize_path_prefix("/a/b"), "/a/b/");
    }

    #[test]
    fn test_site_config_defaults() {
        let config = SiteConfig::from_yaml_str("", Path::new("rouletabille.yml")).unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.input, PathBuf::from("templates"));
        assert_eq!(config.commit_env, "COMMIT_SHA");
    }

    #[test]
    fn test_site_config_partial_override() {
        let yaml = "input: src\nstatic: public\npath_prefix: /rouletabille.fr/\n";
        let config = SiteConfig::from_yaml_str(yaml, Path::new("rouletabille.yml")).unwrap();
        assert_eq!(config.input, PathBuf::from("src"));
        assert_eq!(config.static_dir, PathBuf::from("public"));
        assert_eq!(config.path_prefix, "/rouletabille.fr/");
        assert_eq!(config.output, PathBuf::from("_site"));
    }

    #[test]
    fn test_site_config_rejects_unknown_keys() {
        let err = SiteConfig::from_yaml_str("inptu: src\n", Path::new("rouletabille.yml"))
            .unwrap_err();
        assert!(matches!(err, SiteError::Config { .. }));
    }

    #[test]
    fn test_build_config_resolve() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = SiteConfig {
            path_prefix: "blog".to_string(),
            ..SiteConfig::default()
        };
        let build = BuildConfig::resolve(temp.path(), &config, BuildInfo::new(None, date())).unwrap();

        let root = temp.path().canonicalize().unwrap();
        assert_eq!(build.input_dir, root.join("templates"));
        assert_eq!(build.includes_dir, root.join("templates/_includes"));
        assert_eq!(build.static_dir, root.join("static"));
        assert_eq!(build.bundle_path(), root.join("_site/bundle.css"));
        assert_eq!(build.bundle_url(), "/blog/bundle.css");
        assert!(build.has_path_prefix());
    }

    #[test]
    fn test_build_config_rejects_nested_bundle_name() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = SiteConfig {
            css_bundle: "css/bundle.css".to_string(),
            ..SiteConfig::default()
        };
        let err = BuildConfig::resolve(temp.path(), &config, BuildInfo::new(None, date()))
            .unwrap_err();
        assert!(matches!(err, SiteError::Config { .. }));
    }
}
