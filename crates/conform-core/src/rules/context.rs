//! Package context passed to computed rules

use conform_fs::NormalizedPath;
use serde_json::Value;

use crate::manifest::PackageManifest;
use crate::{Error, Result};

/// What a computed rule may look at: where the package lives and what its
/// manifest currently says.
///
/// Category and slug come from the manifest path
/// `<root>/<category>/<slug>/<manifest>`.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub manifest_path: &'a NormalizedPath,
    pub category: &'a str,
    pub slug: &'a str,
    pub document: &'a Value,
}

impl<'a> RuleContext<'a> {
    /// Derive the context for `manifest`, requiring its parent folder to be
    /// one of `categories`.
    pub fn from_manifest(manifest: &'a PackageManifest, categories: &[String]) -> Result<Self> {
        let path = manifest.path();
        let segments: Vec<&'a str> = path.segments().collect();
        let (category, slug) = match segments.as_slice() {
            [.., category, slug, _manifest] => (*category, *slug),
            _ => {
                return Err(Error::InvalidPackagePath {
                    path: path.to_native(),
                });
            }
        };

        if !categories.iter().any(|known| known == category) {
            return Err(Error::UnknownCategory {
                category: category.to_string(),
                path: path.to_native(),
            });
        }

        Ok(Self {
            manifest_path: path,
            category,
            slug,
            document: manifest.document(),
        })
    }

    /// The current `name` field, if it is a string.
    pub fn package_name(&self) -> Option<&'a str> {
        self.document.get("name").and_then(Value::as_str)
    }

    /// Names of in-repo packages this one depends on.
    ///
    /// Collects `dependencies` and `peerDependencies` keys of the form
    /// `<scope>/<name>` and returns the unscoped names, in declaration order.
    pub fn upstream_names(&self, scope: &str) -> Vec<&'a str> {
        let mut names = Vec::new();
        for section in ["dependencies", "peerDependencies"] {
            let Some(deps) = self.document.get(section).and_then(Value::as_object) else {
                continue;
            };
            for scoped in deps.keys() {
                if let Some((dep_scope, name)) = scoped.split_once('/')
                    && dep_scope == scope
                    && !names.contains(&name)
                {
                    names.push(name);
                }
            }
        }
        names
    }
}
