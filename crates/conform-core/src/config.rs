//! Repository configuration
//!
//! Loaded from `conform.toml`, `conform.json` or `conform.yaml` at the
//! repository root. Every key has a default, so the file is optional.

use conform_fs::{ConfigStore, NormalizedPath};
use serde::Deserialize;

use crate::Result;
use crate::rules::{DEFAULT_RESOLUTION_LIMIT, Resolver, RuleEntry, RuleSet};
use crate::skeleton::{ChecksumTreeSync, RsyncTreeSync, TreeSync};

/// File names probed for configuration, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["conform.toml", "conform.json", "conform.yaml", "conform.yml"];

/// Which [`TreeSync`] implementation reconciles skeletons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncBackend {
    /// Shell out to `rsync`
    #[default]
    Rsync,
    /// Compare and copy in-process
    Native,
}

/// The `[skeleton]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SkeletonConfig {
    /// Directory holding the reference trees, relative to the repository root
    pub root: String,
    /// Reference tree applied to every package
    pub universal: String,
    /// Placeholder names never compared or copied
    pub exclude: Vec<String>,
    pub backend: SyncBackend,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            root: "tooling/skeleton".to_string(),
            universal: "shared".to_string(),
            exclude: vec![".gitkeep".to_string()],
            backend: SyncBackend::default(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConformConfig {
    pub manifest_name: String,
    pub categories: Vec<String>,
    /// npm scope of library packages, e.g. `@myrepo`
    pub scope: String,
    pub resolution_limit: usize,
    pub skeleton: SkeletonConfig,
    /// Replaces the built-in rule set when present
    pub rules: Option<Vec<RuleEntry>>,
}

impl Default for ConformConfig {
    fn default() -> Self {
        Self {
            manifest_name: "package.json".to_string(),
            categories: vec!["packages".to_string(), "servers".to_string()],
            scope: "@myrepo".to_string(),
            resolution_limit: DEFAULT_RESOLUTION_LIMIT,
            skeleton: SkeletonConfig::default(),
            rules: None,
        }
    }
}

impl ConformConfig {
    /// Load the first configuration file found under `root`, or the defaults
    /// when there is none.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let store = ConfigStore::new();
        for name in CONFIG_FILE_NAMES {
            let path = root.join(name);
            if path.is_file() {
                tracing::debug!(path = %path, "loading configuration");
                return Ok(store.load(&path)?);
            }
        }
        tracing::debug!(root = %root, "no configuration file, using defaults");
        Ok(Self::default())
    }

    /// The configured rules, or the built-in set.
    pub fn rule_set(&self) -> Result<RuleSet> {
        match &self.rules {
            Some(entries) => RuleSet::from_entries(entries, &self.scope),
            None => Ok(RuleSet::builtin(&self.scope)),
        }
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.resolution_limit)
    }

    pub fn skeleton_root(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(&self.skeleton.root)
    }

    /// Reference roots for a package: the universal tree, then the tree named
    /// after its category.
    pub fn reference_roots(&self, root: &NormalizedPath, category: &str) -> Vec<NormalizedPath> {
        let skeleton = self.skeleton_root(root);
        vec![skeleton.join(&self.skeleton.universal), skeleton.join(category)]
    }

    pub fn tree_sync(&self) -> Box<dyn TreeSync> {
        let excludes = self.skeleton.exclude.clone();
        match self.skeleton.backend {
            SyncBackend::Rsync => Box::new(RsyncTreeSync::new(excludes)),
            SyncBackend::Native => Box::new(ChecksumTreeSync::new(excludes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConformConfig::load(&NormalizedPath::new(temp.path())).unwrap();
        assert_eq!(config, ConformConfig::default());
        assert_eq!(config.rule_set().unwrap().len(), 12);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("conform.toml"),
            "scope = \"@acme\"\n\n[skeleton]\nbackend = \"native\"\n",
        )
        .unwrap();

        let config = ConformConfig::load(&NormalizedPath::new(temp.path())).unwrap();
        assert_eq!(config.scope, "@acme");
        assert_eq!(config.skeleton.backend, SyncBackend::Native);
        assert_eq!(config.skeleton.universal, "shared");
        assert_eq!(config.categories, vec!["packages", "servers"]);
    }

    #[test]
    fn json_config_is_supported() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("conform.json"),
            r#"{"categories": ["libs"], "rules": [{"path": "version", "value": "1.0.0"}]}"#,
        )
        .unwrap();

        let config = ConformConfig::load(&NormalizedPath::new(temp.path())).unwrap();
        assert_eq!(config.categories, vec!["libs"]);
        assert_eq!(config.rule_set().unwrap().len(), 1);
    }

    #[test]
    fn reference_roots_are_universal_then_category() {
        let config = ConformConfig::default();
        let roots = config.reference_roots(&NormalizedPath::new("/repo"), "servers");
        let rendered: Vec<&str> = roots.iter().map(|r| r.as_str()).collect();
        assert_eq!(
            rendered,
            vec!["/repo/tooling/skeleton/shared", "/repo/tooling/skeleton/servers"]
        );
    }
}
