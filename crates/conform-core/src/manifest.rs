//! Package manifests and field paths
//!
//! A [`PackageManifest`] pairs a manifest file location with its parsed JSON
//! document. A [`FieldPath`] addresses one location inside that document.

use std::fmt;

use conform_fs::{NormalizedPath, io};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Ordered sequence of keys identifying a location inside a manifest.
///
/// The dotted form (`exports.import`) is used in configuration and in
/// console output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Build a path from individual keys. Keys may contain dots.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Parse the dotted form, skipping empty segments.
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.').filter(|segment| !segment.is_empty()))
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    /// Read the value at this path. A numeric key indexes into arrays.
    pub fn get<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(document, |current, key| match current {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Assign `value` at this path, replacing whatever was there.
    ///
    /// A numeric key indexes into an existing array, padding it with nulls
    /// when the index is past the end. Missing or scalar intermediate values
    /// become arrays when the key below them is an index and objects
    /// otherwise. An array is only replaced when addressed by a non-numeric
    /// key. Afterwards [`get`](Self::get) returns `value`.
    pub fn set(&self, document: &mut Value, value: Value) {
        let mut current = document;
        for key in &self.0 {
            current = child_mut(current, key);
        }
        *current = value;
    }

    /// Remove the value at this path, returning it if it existed.
    ///
    /// Removing an array element truncates the array at that index, so the
    /// index stays empty afterwards instead of taking the next element.
    pub fn remove(&self, document: &mut Value) -> Option<Value> {
        let (last, parents) = self.0.split_last()?;

        let mut current = document;
        for key in parents {
            current = match current {
                Value::Object(map) => map.get_mut(key)?,
                Value::Array(items) => items.get_mut(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        match current {
            Value::Object(map) => map.shift_remove(last),
            Value::Array(items) => {
                let index = last.parse::<usize>().ok().filter(|&i| i < items.len())?;
                items.split_off(index).into_iter().next()
            }
            _ => None,
        }
    }
}

/// The slot for `key` under `parent`, making `parent` a container that can
/// hold it first.
fn child_mut<'v>(parent: &'v mut Value, key: &str) -> &'v mut Value {
    let index = key.parse::<usize>().ok();
    let fits = match (&*parent, index) {
        (Value::Object(_), _) => true,
        (Value::Array(_), Some(_)) => true,
        _ => false,
    };
    if !fits {
        *parent = match index {
            Some(_) => Value::Array(Vec::new()),
            None => Value::Object(Map::new()),
        };
    }

    match (parent, index) {
        (Value::Object(map), _) => map.entry(key.to_string()).or_insert(Value::Null),
        (Value::Array(items), Some(i)) => {
            if items.len() <= i {
                items.resize(i + 1, Value::Null);
            }
            &mut items[i]
        }
        _ => unreachable!("parent was replaced with a matching container above"),
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}

/// A package manifest file and its parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    path: NormalizedPath,
    document: Value,
}

impl PackageManifest {
    pub fn new(path: impl Into<NormalizedPath>, document: Value) -> Self {
        Self {
            path: path.into(),
            document,
        }
    }

    /// Read and parse the manifest at `path`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let content = io::read_text(path)?;
        let document = serde_json::from_str(&content).map_err(|e| Error::ManifestParse {
            path: path.to_native(),
            message: e.to_string(),
        })?;
        Ok(Self::new(path.clone(), document))
    }

    /// Rewrite the whole manifest to its file.
    pub fn save(&self) -> Result<()> {
        io::write_json_pretty(&self.path, &self.document)?;
        tracing::info!(path = %self.path, "persisted manifest");
        Ok(())
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Value {
        &mut self.document
    }

    /// The directory containing the manifest.
    pub fn package_dir(&self) -> Option<NormalizedPath> {
        self.path.parent()
    }

    /// The declared package name, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        path.get(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parse_splits_dots_and_skips_empty_segments() {
        let path = FieldPath::parse("exports..import.");
        assert_eq!(path.keys(), &["exports".to_string(), "import".to_string()]);
        assert_eq!(path.to_string(), "exports.import");
    }

    #[test]
    fn get_reads_nested_objects_and_arrays() {
        let doc = json!({"exports": {"import": {"types": "./dist/index.d.ts"}}, "files": ["dist", "src"]});
        assert_eq!(
            FieldPath::parse("exports.import.types").get(&doc),
            Some(&json!("./dist/index.d.ts"))
        );
        assert_eq!(FieldPath::parse("files.1").get(&doc), Some(&json!("src")));
        assert_eq!(FieldPath::parse("exports.require").get(&doc), None);
        assert_eq!(FieldPath::parse("files.x").get(&doc), None);
    }

    #[test]
    fn get_keeps_dotted_keys_built_with_new() {
        let doc = json!({"exports": {"./package.json": "./package.json"}});
        let path = FieldPath::new(["exports", "./package.json"]);
        assert_eq!(path.get(&doc), Some(&json!("./package.json")));
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let mut doc = json!({"name": "@myrepo/add"});
        FieldPath::parse("exports.import.default").set(&mut doc, json!("./dist/index.js"));
        assert_eq!(
            doc,
            json!({"name": "@myrepo/add", "exports": {"import": {"default": "./dist/index.js"}}})
        );
    }

    #[test]
    fn set_replaces_scalar_intermediate() {
        let mut doc = json!({"exports": "./index.js"});
        FieldPath::parse("exports.import").set(&mut doc, json!("./src/index.ts"));
        assert_eq!(doc, json!({"exports": {"import": "./src/index.ts"}}));
    }

    #[test]
    fn set_is_full_assignment_not_merge() {
        let mut doc = json!({"exports": {"a": 1, "b": 2}});
        FieldPath::parse("exports").set(&mut doc, json!({"c": 3}));
        assert_eq!(doc, json!({"exports": {"c": 3}}));
    }

    #[test]
    fn remove_keeps_sibling_order() {
        let mut doc: Value =
            serde_json::from_str(r#"{"name":"a","main":"index.js","version":"0.0.0"}"#).unwrap();
        assert_eq!(FieldPath::parse("main").remove(&mut doc), Some(json!("index.js")));
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "version"]);
    }

    #[test]
    fn set_writes_array_element_in_place() {
        let mut doc = json!({"files": ["dist", "lib"]});
        FieldPath::parse("files.1").set(&mut doc, json!("src"));
        assert_eq!(doc, json!({"files": ["dist", "src"]}));
    }

    #[test]
    fn set_pads_array_past_the_end() {
        let mut doc = json!({"files": ["dist"]});
        FieldPath::parse("files.2").set(&mut doc, json!("src"));
        assert_eq!(doc, json!({"files": ["dist", null, "src"]}));
    }

    #[test]
    fn set_creates_arrays_for_index_keys() {
        let mut doc = json!({});
        let path = FieldPath::parse("workspaces.0.name");
        path.set(&mut doc, json!("core"));
        assert_eq!(doc, json!({"workspaces": [{"name": "core"}]}));
        assert_eq!(path.get(&doc), Some(&json!("core")));
    }

    #[test]
    fn set_on_object_with_numeric_key_keeps_object() {
        let mut doc = json!({"engines": {"0": "a"}});
        FieldPath::parse("engines.0").set(&mut doc, json!("b"));
        assert_eq!(doc, json!({"engines": {"0": "b"}}));
    }

    #[test]
    fn remove_truncates_array_at_index() {
        let mut doc = json!({"files": ["dist", "lib", "src"]});
        let path = FieldPath::parse("files.1");
        assert_eq!(path.remove(&mut doc), Some(json!("lib")));
        assert_eq!(doc, json!({"files": ["dist"]}));
        assert_eq!(path.get(&doc), None);
    }

    #[test]
    fn remove_inside_array_element() {
        let mut doc = json!({"contributors": [{"name": "a", "email": "b"}]});
        assert_eq!(
            FieldPath::parse("contributors.0.email").remove(&mut doc),
            Some(json!("b"))
        );
        assert_eq!(doc, json!({"contributors": [{"name": "a"}]}));
    }

    #[test]
    fn remove_out_of_range_index_is_noop() {
        let mut doc = json!({"files": ["dist"]});
        assert_eq!(FieldPath::parse("files.3").remove(&mut doc), None);
        assert_eq!(FieldPath::parse("files.x").remove(&mut doc), None);
        assert_eq!(doc, json!({"files": ["dist"]}));
    }

    #[test]
    fn remove_missing_path_is_noop() {
        let mut doc = json!({"name": "a"});
        assert_eq!(FieldPath::parse("exports.import").remove(&mut doc), None);
        assert_eq!(doc, json!({"name": "a"}));
    }

    #[test]
    fn manifest_name_and_package_dir() {
        let manifest = PackageManifest::new(
            "/repo/packages/add/package.json",
            json!({"name": "@myrepo/add"}),
        );
        assert_eq!(manifest.name(), Some("@myrepo/add"));
        assert_eq!(manifest.package_dir().unwrap().as_str(), "/repo/packages/add");
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = NormalizedPath::new(dir.path().join("package.json"));
        std::fs::write(path.to_native(), "{ not json").unwrap();
        assert!(matches!(
            PackageManifest::load(&path),
            Err(Error::ManifestParse { .. })
        ));
    }
}
