use manifest_lint::cli::CliApp;
use manifest_lint::report::{render_json, render_text};
use manifest_lint::{
    CheckOptions, Config, FindingCategory, ManifestLint, PluginRef, QuarantineOutcome, RunOptions,
    Selection,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ENTITIES: &str = r#"id: task
name: Task
properties:
  id: { type: string }
  title: { type: string }
---
id: person
properties:
  id: { type: string }
  name: { type: string }
"#;

const TODO_MANIFEST: &str = r#"---
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
    bogus_field: .data.x
---

# Todo
"#;

const TESTED: &str = r#"test('lists tasks', async () => {
  await aos.call({ tool: "task.list", params: {} });
});
"#;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn write_plugin(root: &Path, rel: &str, manifest: &str, test_source: Option<&str>) -> PathBuf {
    let dir = root.join("plugins").join(rel);
    write(&dir.join("readme.md"), manifest);
    write(&dir.join("icon.svg"), "<svg/>");
    if let Some(source) = test_source {
        write(&dir.join("tests/todo.test.ts"), source);
    }
    dir
}

fn repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write(&temp_dir.path().join("entities/tasks/task.yaml"), ENTITIES);
    fs::create_dir_all(temp_dir.path().join("plugins")).unwrap();
    temp_dir
}

fn app(root: &Path) -> ManifestLint {
    let config = Config {
        root: root.to_path_buf(),
        ..Config::default()
    };
    ManifestLint::new(config).unwrap()
}

fn no_move() -> RunOptions {
    RunOptions {
        quarantine: false,
        ..RunOptions::default()
    }
}

#[test]
fn test_mapping_error_lists_valid_properties() {
    let temp_dir = repo();
    write_plugin(temp_dir.path(), "tasks/todo", TODO_MANIFEST, Some(TESTED));

    let report = app(temp_dir.path()).run(&Selection::all(), &no_move()).unwrap();
    assert_eq!(report.plugins.len(), 1);

    let plugin = &report.plugins[0];
    assert_eq!(plugin.path, "plugins/tasks/todo");
    assert_eq!(plugin.findings_in(FindingCategory::UnknownEntity).count(), 0);
    assert_eq!(plugin.findings.len(), 1);

    let finding = &plugin.findings[0];
    assert_eq!(finding.category, FindingCategory::UnknownProperty);
    assert_eq!(finding.path, "/mappings/task/bogus_field");
    assert!(finding.message.contains("bogus_field"));
    assert!(finding.message.ends_with("Valid: id, title"));
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_missing_coverage_is_quarantined_with_identical_findings() {
    let temp_dir = repo();
    write_plugin(temp_dir.path(), "tasks/todo", TODO_MANIFEST, None);
    let app = app(temp_dir.path());

    let report = app.run(&Selection::all(), &RunOptions::default()).unwrap();
    let plugin = &report.plugins[0];

    let missing: Vec<_> = plugin.findings_in(FindingCategory::MissingCoverage).collect();
    assert_eq!(missing.len(), 1);
    assert!(missing[0].message.contains("task.list"));

    assert_eq!(
        plugin.quarantine,
        Some(QuarantineOutcome::Moved {
            destination: "plugins/.needs-work/tasks/todo".to_string()
        })
    );

    let moved = temp_dir.path().join("plugins/.needs-work/tasks/todo");
    assert!(moved.join("readme.md").is_file());
    assert!(!temp_dir.path().join("plugins/tasks/todo").exists());

    let revalidated = app
        .validate_plugin(&PluginRef::at(moved, "tasks/todo"), CheckOptions::full())
        .unwrap();
    assert_eq!(revalidated.findings, plugin.findings);

    // Quarantined plugins are not rediscovered
    let rerun = app.run(&Selection::all(), &no_move()).unwrap();
    assert!(rerun.plugins.is_empty());
}

#[test]
fn test_unknown_return_entity_reports_once() {
    let temp_dir = repo();
    let manifest = r#"---
id: foo
name: Foo
tags: [misc]
operations:
  foo.list:
    description: List foos
    returns: Foo[]
mappings:
  Foo:
    anything: .x
---
"#;
    write_plugin(
        temp_dir.path(),
        "foo",
        manifest,
        Some(r#"{ tool: "foo.list" }"#),
    );

    let report = app(temp_dir.path()).run(&Selection::all(), &no_move()).unwrap();
    let findings = &report.plugins[0].findings;

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].category, FindingCategory::UnknownEntity);
    assert!(findings[0].message.contains("'Foo'"));
    assert!(findings[0].message.ends_with("Valid entities: person, task"));
}

#[test]
fn test_nested_reference_is_not_a_property() {
    let temp_dir = repo();
    let manifest = TODO_MANIFEST.replace(
        "    bogus_field: .data.x\n",
        "    assigned_to:\n      person:\n        id: .data.owner.id\n        name: .data.owner.name\n",
    );
    write_plugin(temp_dir.path(), "tasks/todo", &manifest, Some(TESTED));

    let report = app(temp_dir.path()).run(&Selection::all(), &no_move()).unwrap();
    assert!(report.passed(), "{:?}", report.plugins[0].findings);
}

#[test]
fn test_no_move_runs_are_deterministic() {
    let temp_dir = repo();
    write_plugin(temp_dir.path(), "tasks/todo", TODO_MANIFEST, None);
    write_plugin(
        temp_dir.path(),
        "tasks/linear",
        &TODO_MANIFEST.replace("id: todo", "id: linear"),
        Some(TESTED),
    );
    write_plugin(temp_dir.path(), "exa", "no frontmatter", None);

    let app = app(temp_dir.path());
    let first = app.run(&Selection::all(), &no_move()).unwrap();
    let second = app.run(&Selection::all(), &no_move()).unwrap();

    assert_eq!(render_text(&first), render_text(&second));
    assert_eq!(render_json(&first).unwrap(), render_json(&second).unwrap());

    let paths: Vec<&str> = first.plugins.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["plugins/exa", "plugins/tasks/linear", "plugins/tasks/todo"]);
}

#[test]
fn test_quarantine_conflict_leaves_plugin_in_place() {
    let temp_dir = repo();
    write_plugin(temp_dir.path(), "tasks/todo", TODO_MANIFEST, None);
    fs::create_dir_all(temp_dir.path().join("plugins/.needs-work/tasks/todo")).unwrap();

    let report = app(temp_dir.path())
        .run(&Selection::all(), &RunOptions::default())
        .unwrap();

    assert!(matches!(
        report.plugins[0].quarantine,
        Some(QuarantineOutcome::Conflict { .. })
    ));
    assert!(temp_dir.path().join("plugins/tasks/todo/readme.md").is_file());
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_pre_commit_never_moves() {
    let temp_dir = repo();
    write_plugin(temp_dir.path(), "tasks/todo", TODO_MANIFEST, None);

    let report = app(temp_dir.path())
        .run(&Selection::all(), &RunOptions::pre_commit())
        .unwrap();

    let plugin = &report.plugins[0];
    assert_eq!(plugin.findings.len(), 1);
    assert_eq!(plugin.findings[0].category, FindingCategory::UnknownProperty);
    assert!(plugin.quarantine.is_none());
    assert!(temp_dir.path().join("plugins/tasks/todo").is_dir());
}

#[test]
fn test_selection_by_name_and_filter() {
    let temp_dir = repo();
    write_plugin(temp_dir.path(), "tasks/todo", TODO_MANIFEST, Some(TESTED));
    write_plugin(temp_dir.path(), "search/exa", TODO_MANIFEST, Some(TESTED));

    let app = app(temp_dir.path());

    let named = app.run(&Selection::named(["search/exa", "missing"]), &no_move()).unwrap();
    assert_eq!(named.plugins.len(), 2);
    assert_eq!(named.plugins[1].findings[0].category, FindingCategory::Parse);

    let filtered = app.run(&Selection::all().with_filter("todo"), &no_move()).unwrap();
    assert_eq!(filtered.plugins.len(), 1);
    assert_eq!(filtered.plugins[0].name, "todo");
}

#[test]
fn test_fatal_startup_conditions() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("plugins")).unwrap();

    let missing_registry = Config {
        root: temp_dir.path().to_path_buf(),
        ..Config::default()
    };
    assert!(ManifestLint::new(missing_registry).is_err());

    let temp_dir = repo();
    let missing_schema = Config {
        root: temp_dir.path().to_path_buf(),
        schema_path: Some(PathBuf::from("schema/plugin.schema.json")),
        ..Config::default()
    };
    assert!(ManifestLint::new(missing_schema).is_err());

    fs::remove_dir_all(temp_dir.path().join("plugins")).unwrap();
    let missing_plugins = Config {
        root: temp_dir.path().to_path_buf(),
        ..Config::default()
    };
    assert!(ManifestLint::new(missing_plugins).is_err());
}

#[test]
fn test_cli_exit_codes() {
    let temp_dir = repo();
    write_plugin(temp_dir.path(), "tasks/todo", TODO_MANIFEST, Some(TESTED));
    let root = temp_dir.path().to_string_lossy().into_owned();

    let failing = CliApp::app()
        .try_get_matches_from(["manifest-lint", "validate", "--no-move", "--root", root.as_str()])
        .unwrap();
    assert_eq!(CliApp::run(&failing).unwrap(), 1);

    let fixed = TODO_MANIFEST.replace("    bogus_field: .data.x\n", "");
    write(&temp_dir.path().join("plugins/tasks/todo/readme.md"), &fixed);

    let passing = CliApp::app()
        .try_get_matches_from(["manifest-lint", "validate", "--root", root.as_str(), "--format", "json"])
        .unwrap();
    assert_eq!(CliApp::run(&passing).unwrap(), 0);
    assert!(temp_dir.path().join("plugins/tasks/todo").is_dir());
}

#[test]
fn test_top_level_invocation_validates() {
    let temp_dir = repo();
    write_plugin(temp_dir.path(), "tasks/todo", TODO_MANIFEST, Some(TESTED));
    let root = temp_dir.path().to_string_lossy().into_owned();

    let all = CliApp::app()
        .try_get_matches_from(["manifest-lint", "--all", "--no-move", "--root", root.as_str()])
        .unwrap();
    assert_eq!(CliApp::run(&all).unwrap(), 1);
    assert!(temp_dir.path().join("plugins/tasks/todo").is_dir());

    let named = CliApp::app()
        .try_get_matches_from(["manifest-lint", "tasks/todo", "--pre-commit", "--root", root.as_str()])
        .unwrap();
    assert_eq!(CliApp::run(&named).unwrap(), 1);

    let fixed = TODO_MANIFEST.replace("    bogus_field: .data.x\n", "");
    write(&temp_dir.path().join("plugins/tasks/todo/readme.md"), &fixed);

    let bare = CliApp::app()
        .try_get_matches_from(["manifest-lint", "--root", root.as_str()])
        .unwrap();
    assert_eq!(CliApp::run(&bare).unwrap(), 0);
}

#[test]
fn test_top_level_args_conflict_with_subcommands() {
    let result = CliApp::app().try_get_matches_from(["manifest-lint", "--all", "registry"]);
    assert!(result.is_err());

    let registry = CliApp::app()
        .try_get_matches_from(["manifest-lint", "registry", "--format", "json"])
        .unwrap();
    assert_eq!(registry.subcommand_name(), Some("registry"));
}
