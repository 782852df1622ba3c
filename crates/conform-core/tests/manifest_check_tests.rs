//! Manifest checks against hand-built rule sets

use conform_core::{
    Error, FieldPath, ManifestChecker, ManifestFix, ManifestIssue, PackageManifest, Resolver,
    RuleSet, ValueRule,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn categories() -> Vec<String> {
    vec!["packages".to_string(), "servers".to_string()]
}

fn manifest(document: Value) -> PackageManifest {
    PackageManifest::new("/repo/packages/add/package.json", document)
}

fn issues(rules: &RuleSet, manifest: &PackageManifest) -> Vec<ManifestIssue> {
    let categories = categories();
    ManifestChecker::new(rules, Resolver::default(), &categories)
        .issues(manifest)
        .unwrap()
        .collect::<conform_core::Result<Vec<_>>>()
        .unwrap()
}

fn apply_all(manifest: &mut PackageManifest, issues: &[ManifestIssue]) {
    for issue in issues {
        if let Some(fix) = &issue.fix {
            fix.apply(manifest);
        }
    }
}

#[test]
fn version_mismatch_is_fixed_and_skip_is_ignored() {
    let rules = RuleSet::new()
        .with_rule("version", "0.0.0")
        .with_rule("private", ValueRule::Skip);
    let mut manifest = manifest(json!({"version": "1.0.0"}));

    let found = issues(&rules, &manifest);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, FieldPath::parse("version"));
    assert_eq!(found[0].message, "DIFFERS FROM RULE:\n-\"1.0.0\"\n+\"0.0.0\"");
    assert_eq!(
        found[0].fix,
        Some(ManifestFix::Set {
            path: FieldPath::parse("version"),
            value: json!("0.0.0"),
        })
    );

    apply_all(&mut manifest, &found);
    assert_eq!(manifest.document(), &json!({"version": "0.0.0"}));
    assert!(issues(&rules, &manifest).is_empty());
}

#[test]
fn absent_yields_one_removable_issue() {
    let rules = RuleSet::new().with_rule("main", ValueRule::Absent);
    let mut manifest = manifest(json!({"main": "dist/index.js", "type": "module"}));

    let found = issues(&rules, &manifest);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "EXPECTED absent FOUND \"dist/index.js\"");

    apply_all(&mut manifest, &found);
    assert_eq!(manifest.document(), &json!({"type": "module"}));
    assert!(issues(&rules, &manifest).is_empty());
}

#[test]
fn absent_field_missing_is_clean() {
    let rules = RuleSet::new().with_rule("main", ValueRule::Absent);
    assert!(issues(&rules, &manifest(json!({}))).is_empty());
}

#[test]
fn skip_never_yields_an_issue() {
    let rules = RuleSet::new()
        .with_rule("private", ValueRule::Skip)
        .with_rule("scripts", ValueRule::Skip);
    let manifest = manifest(json!({"private": "surprising", "scripts": [1, 2, 3]}));
    assert!(issues(&rules, &manifest).is_empty());
}

#[test]
fn nested_objects_compare_structurally() {
    let expected = json!({".": {"import": "./src/index.ts", "types": "./dist/index.d.ts"}});
    let rules = RuleSet::new().with_rule("exports", ValueRule::Value(expected));

    let reordered = manifest(json!({
        "exports": {".": {"types": "./dist/index.d.ts", "import": "./src/index.ts"}}
    }));
    assert!(issues(&rules, &reordered).is_empty());

    let changed = manifest(json!({
        "exports": {".": {"types": "./dist/index.d.ts", "import": "./src/main.ts"}}
    }));
    let found = issues(&rules, &changed);
    assert_eq!(found.len(), 1);
    assert!(found[0].message.contains("-    \"import\": \"./src/main.ts\""));
    assert!(found[0].message.contains("+    \"import\": \"./src/index.ts\""));
}

#[test]
fn arrays_compare_by_order() {
    let rules = RuleSet::new().with_rule("files", json!(["dist", "src"]));
    let found = issues(&rules, &manifest(json!({"files": ["src", "dist"]})));
    assert_eq!(found.len(), 1);
}

#[test]
fn missing_field_is_created_with_parents() {
    let rules = RuleSet::new().with_rule("publishConfig.access", "public");
    let mut manifest = manifest(json!({"name": "@myrepo/add"}));

    let found = issues(&rules, &manifest);
    assert_eq!(found.len(), 1);
    assert!(found[0].message.contains("(absent)"));

    apply_all(&mut manifest, &found);
    assert_eq!(
        manifest.document(),
        &json!({"name": "@myrepo/add", "publishConfig": {"access": "public"}})
    );
}

#[test]
fn absent_rule_on_array_element_removes_it() {
    let rules = RuleSet::new().with_rule("files.0", ValueRule::Absent);
    let mut manifest = manifest(json!({"files": ["dist"]}));

    let found = issues(&rules, &manifest);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "EXPECTED absent FOUND \"dist\"");

    let fix = found[0].fix.as_ref().unwrap();
    assert!(fix.apply(&mut manifest));
    assert_eq!(manifest.document(), &json!({"files": []}));
    assert!(issues(&rules, &manifest).is_empty());
    assert!(!fix.apply(&mut manifest));
}

#[test]
fn value_rule_on_array_element_keeps_the_array() {
    let rules = RuleSet::new().with_rule("files.1", "src");
    let mut manifest = manifest(json!({"files": ["dist", "lib"]}));

    let found = issues(&rules, &manifest);
    assert_eq!(found.len(), 1);

    apply_all(&mut manifest, &found);
    assert_eq!(manifest.document(), &json!({"files": ["dist", "src"]}));
    assert!(issues(&rules, &manifest).is_empty());
}

#[test]
fn value_rule_past_array_end_pads_with_null() {
    let rules = RuleSet::new().with_rule("files.2", "src");
    let mut manifest = manifest(json!({"files": ["dist"]}));

    let found = issues(&rules, &manifest);
    apply_all(&mut manifest, &found);
    assert_eq!(manifest.document(), &json!({"files": ["dist", null, "src"]}));
    assert!(issues(&rules, &manifest).is_empty());
}

#[test]
fn value_rule_inside_array_element_object() {
    let rules = RuleSet::new().with_rule("contributors.0.email", "team@myrepo.dev");
    let mut manifest = manifest(json!({"contributors": [{"name": "team"}]}));

    let found = issues(&rules, &manifest);
    apply_all(&mut manifest, &found);
    assert_eq!(
        manifest.document(),
        &json!({"contributors": [{"name": "team", "email": "team@myrepo.dev"}]})
    );
    assert!(issues(&rules, &manifest).is_empty());
}

#[test]
fn pattern_mismatch_has_no_fix() {
    let rules = RuleSet::new().with_rule("description", ValueRule::pattern("^[A-Z]").unwrap());
    let found = issues(&rules, &manifest(json!({"description": "adds numbers"})));

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, "Value adds numbers doesn't match /^[A-Z]/");
    assert_eq!(found[0].fix, None);
}

#[test]
fn pattern_ignores_non_string_and_missing_values() {
    let rules = RuleSet::new().with_rule("description", ValueRule::pattern("^[A-Z]").unwrap());
    assert!(issues(&rules, &manifest(json!({"description": 42}))).is_empty());
    assert!(issues(&rules, &manifest(json!({}))).is_empty());
    assert!(issues(&rules, &manifest(json!({"description": "Adds numbers"}))).is_empty());
}

#[test]
fn issues_follow_rule_declaration_order() {
    let rules = RuleSet::new()
        .with_rule("license", "MIT")
        .with_rule("author", ValueRule::Absent)
        .with_rule("version", "0.0.0");
    let found = issues(
        &rules,
        &manifest(json!({"version": "2.0.0", "author": "me", "license": "ISC"})),
    );
    let paths: Vec<String> = found.iter().map(|i| i.path.to_string()).collect();
    assert_eq!(paths, vec!["license", "author", "version"]);
}

#[test]
fn computed_rules_see_the_package_context() {
    let rules = RuleSet::new().with_rule(
        "name",
        ValueRule::computed(|ctx| ValueRule::value(format!("@myrepo/{}", ctx.slug))),
    );
    let found = issues(&rules, &manifest(json!({"name": "add"})));
    assert_eq!(
        found[0].fix,
        Some(ManifestFix::Set {
            path: FieldPath::parse("name"),
            value: json!("@myrepo/add"),
        })
    );
}

#[test]
fn endless_computed_rule_is_an_error() {
    fn endless() -> ValueRule {
        ValueRule::computed(|_| endless())
    }
    let rules = RuleSet::new().with_rule("version", endless());
    let categories = categories();
    let manifest = manifest(json!({}));

    let mut iter = ManifestChecker::new(&rules, Resolver::new(3), &categories)
        .issues(&manifest)
        .unwrap();
    let err = iter.next().unwrap().unwrap_err();
    assert!(matches!(err, Error::UnresolvedRule { ref path, limit: 3 } if path == "version"));
}

#[test]
fn unknown_category_fails_before_checking() {
    let rules = RuleSet::builtin("@myrepo");
    let categories = categories();
    let manifest = PackageManifest::new("/repo/apps/web/package.json", json!({}));

    let result = ManifestChecker::new(&rules, Resolver::default(), &categories).issues(&manifest);
    assert!(matches!(result, Err(Error::UnknownCategory { ref category, .. }) if category == "apps"));
}

#[test]
fn builtin_rules_accept_a_conforming_server() {
    let rules = RuleSet::builtin("@myrepo");
    let categories = categories();
    let manifest = PackageManifest::new(
        "/repo/servers/api/package.json",
        json!({
            "name": "api",
            "version": "0.0.0",
            "private": true,
            "type": "module",
            "license": "MIT",
            "dependencies": {"@myrepo/add": "workspace:*"}
        }),
    );

    let found: Vec<_> = ManifestChecker::new(&rules, Resolver::default(), &categories)
        .issues(&manifest)
        .unwrap()
        .collect::<conform_core::Result<_>>()
        .unwrap();
    assert!(found.is_empty(), "unexpected issues: {found:#?}");
}
