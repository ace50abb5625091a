//! Validation pipeline tests

use super::*;
use manifest_expr::LintRule;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TASK_MANIFEST: &str = r#"---
id: todo
name: Todo
tags: [tasks]
operations:
  task.list:
    description: List tasks
    returns: task[]
mappings:
  task:
    id: .data.id
    title: .data.title
---

# Todo

Prose after the frontmatter is ignored.
"#;

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.insert("task", Some(["id", "title"].into_iter().map(String::from).collect()));
    registry
}

fn write_plugin(dir: &Path, manifest: &str, test_source: Option<&str>, icon: bool) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("readme.md"), manifest).unwrap();
    if icon {
        fs::write(dir.join("icon.svg"), "<svg/>").unwrap();
    }
    if let Some(source) = test_source {
        fs::create_dir_all(dir.join("tests")).unwrap();
        fs::write(dir.join("tests/todo.test.ts"), source).unwrap();
    }
}

fn validate(dir: &Path, options: CheckOptions) -> PluginReport {
    let schema = SchemaValidator::bundled().unwrap();
    let registry = registry();
    let plugins = PluginsConfig::default();
    let validator = PluginValidator::new(&schema, &registry, &plugins).unwrap();

    let plugin = PluginRef::at(dir.to_path_buf(), "todo");
    validator.validate(&plugin, "plugins/todo", options)
}

fn categories(report: &PluginReport) -> Vec<FindingCategory> {
    report.findings.iter().map(|f| f.category).collect()
}

#[test]
fn test_valid_plugin_passes() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("todo");
    write_plugin(&dir, TASK_MANIFEST, Some(r#"{ tool: "task.list" }"#), true);

    let report = validate(&dir, CheckOptions::full());
    assert!(report.passed(), "{:?}", report.findings);
    assert_eq!(report.tools, 1);
    assert!(report.coverage_checked);
}

#[test]
fn test_missing_descriptor() {
    let temp_dir = TempDir::new().unwrap();
    let report = validate(&temp_dir.path().join("absent"), CheckOptions::full());

    assert_eq!(categories(&report), vec![FindingCategory::Parse]);
    assert!(report.findings[0].message.contains("readme.md"));
}

#[test]
fn test_missing_frontmatter() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("todo");
    write_plugin(&dir, "# Todo\n\nNo frontmatter here.\n", None, true);

    let report = validate(&dir, CheckOptions::full());
    assert_eq!(categories(&report), vec![FindingCategory::Parse]);
}

#[test]
fn test_schema_failure_skips_references_but_still_lints() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("todo");
    let manifest = r#"---
id: todo
operations:
  task.list:
    description: List tasks
    returns: Foo
mappings:
  task:
    bogus: .state == 'done'
---
"#;
    write_plugin(&dir, manifest, Some(r#"{ tool: "task.list" }"#), true);

    let report = validate(&dir, CheckOptions::full());
    let found = categories(&report);

    assert!(found.contains(&FindingCategory::Schema));
    assert!(found.contains(&FindingCategory::Expression(LintRule::Quoting)));
    assert!(!found.contains(&FindingCategory::UnknownEntity));
    assert!(!found.contains(&FindingCategory::UnknownProperty));
}

#[test]
fn test_unknown_return_does_not_cascade() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("todo");
    let manifest = r#"---
id: todo
name: Todo
tags: [misc]
operations:
  foo.list:
    description: List foos
    returns: Foo[]
mappings:
  Foo:
    whatever: .x
---
"#;
    write_plugin(&dir, manifest, Some(r#"{ tool: "foo.list" }"#), true);

    let report = validate(&dir, CheckOptions::full());
    assert_eq!(categories(&report), vec![FindingCategory::UnknownEntity]);
    assert!(report.findings[0].message.contains("'Foo'"));
}

#[test]
fn test_icon_and_coverage_findings() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("todo");
    write_plugin(&dir, TASK_MANIFEST, None, false);

    let report = validate(&dir, CheckOptions::full());
    assert_eq!(
        categories(&report),
        vec![FindingCategory::IconMissing, FindingCategory::MissingCoverage]
    );
    assert_eq!(report.findings[1].path, "/operations/task.list");
}

#[test]
fn test_pre_commit_skips_icon_and_coverage() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("todo");
    write_plugin(&dir, TASK_MANIFEST, None, false);

    let report = validate(&dir, CheckOptions::pre_commit());
    assert!(report.passed());
    assert!(!report.coverage_checked);
}

#[test]
fn test_references_switch() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("todo");
    let manifest = TASK_MANIFEST.replace("returns: task[]", "returns: nothing");
    write_plugin(&dir, &manifest, Some(r#"{ tool: "task.list" }"#), true);

    let options = CheckOptions {
        references: false,
        ..CheckOptions::full()
    };
    assert!(validate(&dir, options).passed());
    assert_eq!(
        categories(&validate(&dir, CheckOptions::full())),
        vec![FindingCategory::UnknownEntity]
    );
}

#[test]
fn test_non_utf8_test_source_still_counts() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("todo");
    write_plugin(&dir, TASK_MANIFEST, None, true);
    fs::create_dir_all(dir.join("tests")).unwrap();
    fs::write(
        dir.join("tests/a.test.ts"),
        b"// caf\xe9\nrun({ tool: \"task.list\" })\n",
    )
    .unwrap();

    let report = validate(&dir, CheckOptions::full());
    assert!(report.passed(), "{:?}", report.findings);
    assert!(report.coverage_checked);
}
