//! Subtree-level issue detection

use std::fs;

use conform_fs::NormalizedPath;

use super::TreeSync;
use crate::Result;

/// A reference entry that the package does not fully contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonIssue {
    pub reference_path: NormalizedPath,
    pub package_path: NormalizedPath,
    /// Itemized differences as reported by the tree sync backend
    pub message: String,
}

impl SkeletonIssue {
    /// Copy the missing or differing reference content into the package.
    pub fn fix(&self, sync: &dyn TreeSync) -> Result<()> {
        sync.apply(&self.reference_path, &self.package_path)
    }
}

/// List the issues of the package at `package_dir` against each reference
/// root in turn.
///
/// The iterator is lazy: each `next` runs at most one comparison per entry,
/// and a root's entries are only listed once the previous root is exhausted.
/// Roots missing on disk are skipped.
pub fn list_skeleton_issues<'s>(
    sync: &'s dyn TreeSync,
    package_dir: NormalizedPath,
    reference_roots: Vec<NormalizedPath>,
) -> SkeletonIssues<'s> {
    SkeletonIssues {
        sync,
        package_dir,
        roots: reference_roots.into_iter(),
        current_root: None,
        entries: Vec::new().into_iter(),
    }
}

/// Iterator over the skeleton issues of one package.
pub struct SkeletonIssues<'s> {
    sync: &'s dyn TreeSync,
    package_dir: NormalizedPath,
    roots: std::vec::IntoIter<NormalizedPath>,
    current_root: Option<NormalizedPath>,
    entries: std::vec::IntoIter<String>,
}

impl SkeletonIssues<'_> {
    /// Move to the next reference root that exists, listing its entries.
    fn advance_root(&mut self) -> Option<Result<()>> {
        loop {
            let root = self.roots.next()?;
            if !root.is_dir() {
                tracing::warn!(root = %root, "skeleton root does not exist, skipping");
                continue;
            }
            return Some(list_entries(&root).map(|names| {
                tracing::debug!(root = %root, entries = names.len(), "checking skeleton root");
                self.entries = names.into_iter();
                self.current_root = Some(root);
            }));
        }
    }
}

impl Iterator for SkeletonIssues<'_> {
    type Item = Result<SkeletonIssue>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(name) = self.entries.next() else {
                if let Err(e) = self.advance_root()? {
                    return Some(Err(e));
                }
                continue;
            };
            let Some(root) = &self.current_root else {
                continue;
            };

            let reference_path = root.join(&name);
            let package_path = self.package_dir.join(&name);
            match self.sync.compare(&reference_path, &package_path) {
                Ok(message) if message.trim().is_empty() => continue,
                Ok(message) => {
                    return Some(Ok(SkeletonIssue {
                        reference_path,
                        package_path,
                        message,
                    }));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Immediate entry names of `root`, sorted.
fn list_entries(root: &NormalizedPath) -> Result<Vec<String>> {
    let native = root.to_native();
    let mut names = Vec::new();
    for entry in fs::read_dir(&native).map_err(|e| conform_fs::Error::io(&native, e))? {
        let entry = entry.map_err(|e| conform_fs::Error::io(&native, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
