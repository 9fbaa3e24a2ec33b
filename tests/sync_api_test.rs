//! Integration tests for the sync engine public API.

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tsync::manifest::{parse_consumer_manifest, parse_provider_catalog};
use tsync::policy::FileAction;
use tsync::repository::LocalRepository;
use tsync::sync::{sync_project, SyncEngine, SyncOptions, Workspace};
use tsync::TsyncError;

struct Project {
    _temp: TempDir,
    toolkit: PathBuf,
    root: PathBuf,
}

impl Project {
    fn new(catalog: &str, manifest: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let toolkit = temp.path().join("toolkit");
        let root = temp.path().join("project");
        fs::create_dir_all(&toolkit).unwrap();
        fs::create_dir_all(&root).unwrap();
        fs::write(toolkit.join(".toolkit.yml"), catalog).unwrap();
        fs::write(root.join(".project.toolkit.yml"), manifest).unwrap();
        Self {
            _temp: temp,
            toolkit,
            root,
        }
    }

    fn toolkit_file(&self, path: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.toolkit.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    fn project_file(&self, path: &str, content: &str) -> &Self {
        let path = self.root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        self
    }

    fn sync(&self) -> tsync::Result<tsync::sync::SyncReport> {
        self.sync_with(SyncOptions::default())
    }

    fn sync_with(&self, options: SyncOptions) -> tsync::Result<tsync::sync::SyncReport> {
        sync_project(&self.root, &LocalRepository::new(&self.toolkit), options)
    }

    fn read(&self, path: &str) -> String {
        fs::read_to_string(self.root.join(path)).unwrap()
    }

    fn exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }
}

const MANIFEST: &str = r#"
provider: { url: "https://example.com/toolkit.git", version: v1 }
sync:
  - bundle: app
"#;

#[test]
fn sync_strict_copies_bytes_exactly() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: assets
        files:
          - { source: logo.bin, destination: assets/logo.bin, policy: sync-strict }
"#,
        MANIFEST,
    );
    project.toolkit_file("logo.bin", [0u8, 255, 10, 13, 0]);
    project.project_file("assets/logo.bin", "stale");

    let report = project.sync().unwrap();

    assert_eq!(
        fs::read(project.root.join("assets/logo.bin")).unwrap(),
        vec![0u8, 255, 10, 13, 0]
    );
    assert_eq!(report.file("logo.bin").unwrap().action, FileAction::Copied);
}

#[test]
fn template_renders_with_bundle_vars() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    vars: { name: World }
    components:
      - id: docs
        files:
          - { source: greeting.txt.j2, destination: greeting.txt, policy: template }
"#,
        MANIFEST,
    );
    project.toolkit_file("greeting.txt.j2", "Hello, {{ name }}!");

    project.sync().unwrap();

    assert_eq!(project.read("greeting.txt"), "Hello, World!");
}

#[test]
fn init_never_overwrites() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: env
        files:
          - { source: env.example, destination: .env, policy: init }
"#,
        MANIFEST,
    );
    project.toolkit_file("env.example", "DEBUG=1\n");
    project.project_file(".env", "DEBUG=0\nSECRET=x\n");

    let report = project.sync().unwrap();

    assert_eq!(project.read(".env"), "DEBUG=0\nSECRET=x\n");
    assert_eq!(report.file("env.example").unwrap().action, FileAction::Preserved);
}

#[test]
fn skipped_component_writes_nothing() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: one
        files:
          - { source: file1.txt, destination: file1.txt, policy: sync-strict }
      - id: two
        files:
          - { source: file2.txt, destination: file2.txt, policy: sync-strict }
"#,
        r#"
provider: { url: u, version: v }
sync:
  - bundle: app
    overrides:
      - { id: two, skip: true }
"#,
    );
    project.toolkit_file("file1.txt", "1").toolkit_file("file2.txt", "2");

    let report = project.sync().unwrap();

    assert!(project.exists("file1.txt"));
    assert!(!project.exists("file2.txt"));
    assert!(report.file("file2.txt").is_none());
}

#[test]
fn json_merge_with_toolkit_priority() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: config
        files:
          - { source: settings.json, destination: settings.json, policy: merge }
"#,
        MANIFEST,
    );
    project.toolkit_file("settings.json", r#"{"name": "toolkit", "new": "y"}"#);
    project.project_file("settings.json", r#"{"name": "project", "local": "x"}"#);

    let report = project.sync().unwrap();

    let merged: serde_json::Value = serde_json::from_str(&project.read("settings.json")).unwrap();
    assert_eq!(merged, json!({"name": "toolkit", "local": "x", "new": "y"}));
    assert_eq!(report.file("settings.json").unwrap().action, FileAction::Merged);

    // A second run has nothing left to add.
    let report = project.sync().unwrap();
    assert_eq!(report.file("settings.json").unwrap().action, FileAction::Unchanged);
}

#[test]
fn yaml_merge_with_project_priority_keeps_local_values() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: lint
        files:
          - source: lint.yml
            destination: .lint.yml
            policy: merge
            merge_priority: project
"#,
        MANIFEST,
    );
    project.toolkit_file("lint.yml", "line_length: 100\nrules:\n  strict: true\n  docs: true\n");
    project.project_file(".lint.yml", "line_length: 120\nrules:\n  strict: false\n");

    project.sync().unwrap();

    let merged: serde_yaml::Value = serde_yaml::from_str(&project.read(".lint.yml")).unwrap();
    assert_eq!(merged["line_length"], serde_yaml::Value::from(120));
    assert_eq!(merged["rules"]["strict"], serde_yaml::Value::from(false));
    assert_eq!(merged["rules"]["docs"], serde_yaml::Value::from(true));
}

#[test]
fn text_merge_appends_missing_lines() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: git
        files:
          - { source: gitignore, destination: .gitignore, policy: merge }
"#,
        MANIFEST,
    );
    project.toolkit_file("gitignore", "target/\n*.log\n");
    project.project_file(".gitignore", "node_modules/\n*.log\n");

    project.sync().unwrap();

    assert_eq!(project.read(".gitignore"), "node_modules/\n*.log\n\ntarget/\n");
}

#[test]
fn invalid_merge_document_fails_before_writing() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: config
        files:
          - { source: settings.json, destination: settings.json, policy: merge }
"#,
        MANIFEST,
    );
    project.toolkit_file("settings.json", r#"{"a": 1}"#);
    project.project_file("settings.json", "{ not json");

    let err = project.sync().unwrap_err();

    assert!(matches!(err, TsyncError::InvalidDocument { .. }));
    assert_eq!(project.read("settings.json"), "{ not json");
}

#[test]
fn missing_required_variable_aborts() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  python:
    components:
      - id: docker
        var_schema:
          python_version: { description: Python version to install, required: true }
        files:
          - { source: Dockerfile.j2, destination: Dockerfile, policy: template }
"#,
        r#"
provider: { url: u, version: v }
sync:
  - bundle: python
"#,
    );
    project.toolkit_file("Dockerfile.j2", "FROM python:{{ python_version }}\n");

    let err = project.sync().unwrap_err();

    match &err {
        TsyncError::MissingRequiredVariables { component, missing } => {
            assert_eq!(component, "docker");
            assert_eq!(missing[0].name, "python_version");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("Python version to install"));
    assert!(!project.exists("Dockerfile"));
}

const PRECEDENCE_CATALOG: &str = r#"
version: "1"
bundles:
  app:
    vars: { key: bundle }
    variants:
      strict:
        defaults: { key: variant }
    components:
      - id: base
        vars: { key: component }
        files:
          - source: key.txt.j2
            destination: key.txt
            policy: template
            vars: { key: file }
"#;

#[test]
fn file_override_vars_win_over_every_level() {
    let project = Project::new(
        PRECEDENCE_CATALOG,
        r#"
provider: { url: u, version: v }
vars: { key: global }
sync:
  - bundle: app
    variant: strict
    overrides:
      - id: base
        vars: { key: component-override }
        files:
          - source: key.txt.j2
            vars: { key: file-override }
"#,
    );
    project.toolkit_file("key.txt.j2", "{{ key }}");

    let report = project.sync().unwrap();

    assert_eq!(project.read("key.txt"), "file-override");
    assert_eq!(report.file("key.txt.j2").unwrap().vars["key"], json!("file-override"));
}

#[test]
fn component_override_vars_beat_component_but_not_file() {
    let project = Project::new(
        PRECEDENCE_CATALOG,
        r#"
provider: { url: u, version: v }
vars: { key: global }
sync:
  - bundle: app
    variant: strict
    overrides:
      - id: base
        vars: { key: component-override }
"#,
    );
    project.toolkit_file("key.txt.j2", "{{ key }}");

    project.sync().unwrap();

    assert_eq!(project.read("key.txt"), "file");
}

#[test]
fn file_override_destination_beats_destination_root() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: ci
        files:
          - { source: a.yml, destination: workflows/a.yml, policy: sync-strict }
          - { source: b.yml, destination: workflows/b.yml, policy: sync-strict }
"#,
        r#"
provider: { url: u, version: v }
sync:
  - bundle: app
    overrides:
      - id: ci
        destination_root: .github
        files:
          - { source: b.yml, destination: custom/b.yml }
"#,
    );
    project.toolkit_file("a.yml", "a").toolkit_file("b.yml", "b");

    project.sync().unwrap();

    assert_eq!(project.read(".github/workflows/a.yml"), "a");
    assert_eq!(project.read("custom/b.yml"), "b");
    assert!(!project.exists(".github/workflows/b.yml"));
}

#[test]
fn destination_escaping_project_is_rejected() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: evil
        files:
          - { source: x.txt, destination: ../escaped.txt, policy: sync-strict }
"#,
        MANIFEST,
    );
    project.toolkit_file("x.txt", "x");

    let err = project.sync().unwrap_err();

    assert!(matches!(err, TsyncError::PathTraversal { .. }));
    assert!(!project.root.parent().unwrap().join("escaped.txt").exists());
}

#[test]
fn dry_run_reports_resolution_without_writing() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    vars: { name: svc }
    components:
      - id: docs
        files:
          - { source: README.md.j2, destination: README.md, policy: template }
"#,
        MANIFEST,
    );
    project.toolkit_file("README.md.j2", "# {{ name }}\n");

    let report = project.sync_with(SyncOptions { dry_run: true }).unwrap();

    assert!(report.dry_run);
    let outcome = report.file("README.md.j2").unwrap();
    assert_eq!(outcome.action, FileAction::Rendered);
    assert_eq!(outcome.vars["name"], json!("svc"));
    assert!(outcome.destination.ends_with("README.md"));
    assert!(!project.exists("README.md"));
}

#[test]
fn dry_run_fails_on_undefined_variable() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: docs
        files:
          - { source: hello.j2, destination: hello.txt, policy: template }
"#,
        MANIFEST,
    );
    project.toolkit_file("hello.j2", "Hello {{ missing }}");

    let err = project.sync_with(SyncOptions { dry_run: true }).unwrap_err();

    assert!(matches!(err, TsyncError::UndefinedVariable { name } if name == "missing"));
    assert!(!project.exists("hello.txt"));
}

#[test]
fn dry_run_predicts_unchanged_merge() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: ignore
        files:
          - { source: gitignore, destination: .gitignore, policy: merge }
"#,
        MANIFEST,
    );
    project.toolkit_file("gitignore", "target/\n");
    project.project_file(".gitignore", "target/\n.env\n");

    let report = project.sync_with(SyncOptions { dry_run: true }).unwrap();

    assert_eq!(report.file("gitignore").unwrap().action, FileAction::Unchanged);
    assert_eq!(project.read(".gitignore"), "target/\n.env\n");
}

#[test]
fn missing_required_variable_stops_later_work() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  python:
    components:
      - id: first
        files:
          - { source: ok.txt, destination: ok.txt, policy: sync-strict }
      - id: second
        var_schema:
          python_version: { description: Python version, required: true }
        files:
          - { source: Dockerfile.j2, destination: Dockerfile, policy: template }
  extras:
    components:
      - id: later
        files:
          - { source: later.txt, destination: later.txt, policy: sync-strict }
"#,
        r#"
provider: { url: u, version: v }
sync:
  - bundle: python
  - bundle: extras
"#,
    );
    project
        .toolkit_file("ok.txt", "ok")
        .toolkit_file("Dockerfile.j2", "FROM python:{{ python_version }}\n")
        .toolkit_file("later.txt", "later");

    let err = project.sync().unwrap_err();

    assert!(matches!(err, TsyncError::MissingRequiredVariables { component, .. } if component == "second"));
    assert_eq!(project.read("ok.txt"), "ok");
    assert!(!project.exists("Dockerfile"));
    assert!(!project.exists("later.txt"));
}

#[cfg(unix)]
#[test]
fn dangling_symlink_destination_is_rejected() {
    let project = Project::new(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: evil
        files:
          - { source: x.txt, destination: evil, policy: sync-strict }
"#,
        MANIFEST,
    );
    project.toolkit_file("x.txt", "x");
    let outside = project.root.parent().unwrap().join("outside");
    fs::create_dir_all(&outside).unwrap();
    std::os::unix::fs::symlink("../outside/new.txt", project.root.join("evil")).unwrap();

    let err = project.sync().unwrap_err();

    assert!(matches!(err, TsyncError::PathTraversal { .. }));
    assert!(!outside.join("new.txt").exists());
}

#[test]
fn engine_runs_on_parsed_manifests() {
    let temp = TempDir::new().unwrap();
    let toolkit = temp.path().join("toolkit");
    fs::create_dir_all(&toolkit).unwrap();
    fs::write(toolkit.join("a.txt"), "A").unwrap();

    let catalog = parse_provider_catalog(
        r#"
version: "1"
bundles:
  app:
    components:
      - id: base
        files:
          - { source: a.txt, destination: out/a.txt, policy: sync-strict }
"#,
        Path::new(".toolkit.yml"),
    )
    .unwrap();
    let manifest = parse_consumer_manifest(MANIFEST, Path::new(".project.toolkit.yml")).unwrap();

    let report = SyncEngine::default()
        .run(&catalog, &toolkit, &manifest, temp.path())
        .unwrap();

    assert_eq!(report.written(), 1);
    assert_eq!(fs::read_to_string(temp.path().join("out/a.txt")).unwrap(), "A");
}

#[test]
fn workspace_load_reads_both_manifests() {
    let project = Project::new(
        r#"
version: "3.0"
bundles:
  app:
    components: []
"#,
        MANIFEST,
    );

    let workspace = Workspace::load(&project.root, &LocalRepository::new(&project.toolkit)).unwrap();

    assert_eq!(workspace.catalog.version, "3.0");
    assert_eq!(workspace.manifest.provider.version, "v1");
    assert_eq!(workspace.catalog_root, project.toolkit);
}

#[test]
fn missing_consumer_manifest_is_reported() {
    let project = Project::new("version: '1'\nbundles: {}\n", MANIFEST);
    fs::remove_file(project.root.join(".project.toolkit.yml")).unwrap();

    let err = project.sync().unwrap_err();

    assert!(matches!(err, TsyncError::ManifestNotFound { .. }));
}
