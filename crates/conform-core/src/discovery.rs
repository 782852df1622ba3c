//! Package discovery
//!
//! Packages live exactly two levels below the repository root:
//! `<root>/<category>/<slug>/<manifest>`.

use std::fs;

use conform_fs::NormalizedPath;
use globset::{GlobBuilder, GlobMatcher};

use crate::{Error, Result};

/// Glob filter over repository-relative manifest paths.
///
/// `*` does not cross `/`; use `**` for that.
#[derive(Debug, Clone)]
pub struct PackageFilter {
    glob: String,
    matcher: GlobMatcher,
}

impl PackageFilter {
    pub fn new(glob: &str) -> Result<Self> {
        let matcher = GlobBuilder::new(glob)
            .literal_separator(true)
            .build()
            .map_err(|e| Error::InvalidGlob {
                glob: glob.to_string(),
                message: e.to_string(),
            })?
            .compile_matcher();
        Ok(Self {
            glob: glob.to_string(),
            matcher,
        })
    }

    /// A filter accepting every package.
    pub fn all() -> Self {
        Self::new("**").unwrap_or_else(|_| unreachable!("`**` is a valid glob"))
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        self.matcher.is_match(relative_path)
    }
}

/// Find every manifest under the category directories of `root`, sorted.
///
/// The manifest file name is matched case-insensitively. Category
/// directories that do not exist are ignored.
pub fn discover_manifests(
    root: &NormalizedPath,
    categories: &[String],
    manifest_name: &str,
) -> Result<Vec<NormalizedPath>> {
    let mut manifests = Vec::new();

    for category in categories {
        let category_dir = root.join(category);
        if !category_dir.is_dir() {
            tracing::debug!(dir = %category_dir, "category directory missing");
            continue;
        }

        for package_dir in sorted_children(&category_dir)? {
            if !package_dir.is_dir() {
                continue;
            }
            if let Some(manifest) = find_manifest(&package_dir, manifest_name)? {
                manifests.push(manifest);
            }
        }
    }

    manifests.sort();
    Ok(manifests)
}

/// Discover manifests and keep those whose repository-relative path matches
/// `filter`.
///
/// # Errors
///
/// Returns [`Error::NoPackagesFound`] when the repository contains no
/// packages at all, before any filtering.
pub fn select_manifests(
    root: &NormalizedPath,
    categories: &[String],
    manifest_name: &str,
    filter: &PackageFilter,
) -> Result<Vec<NormalizedPath>> {
    let manifests = discover_manifests(root, categories, manifest_name)?;
    if manifests.is_empty() {
        return Err(Error::NoPackagesFound {
            root: root.to_native(),
        });
    }

    let selected: Vec<NormalizedPath> = manifests
        .into_iter()
        .filter(|manifest| {
            manifest
                .strip_prefix(root)
                .is_some_and(|relative| filter.matches(&relative))
        })
        .collect();

    tracing::debug!(glob = filter.glob(), count = selected.len(), "selected packages");
    Ok(selected)
}

fn sorted_children(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native = dir.to_native();
    let mut children = Vec::new();
    for entry in fs::read_dir(&native).map_err(|e| conform_fs::Error::io(&native, e))? {
        let entry = entry.map_err(|e| conform_fs::Error::io(&native, e))?;
        children.push(dir.join(&entry.file_name().to_string_lossy()));
    }
    children.sort();
    Ok(children)
}

fn find_manifest(package_dir: &NormalizedPath, manifest_name: &str) -> Result<Option<NormalizedPath>> {
    Ok(sorted_children(package_dir)?.into_iter().find(|child| {
        child.is_file()
            && child
                .file_name()
                .is_some_and(|name| name.eq_ignore_ascii_case(manifest_name))
    }))
}
