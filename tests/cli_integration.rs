//! CLI integration tests for c4
//!
//! These tests drive the binary through complete workflows: initialization,
//! authoring a model, declaring views, exporting and syncing with a remote.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the c4 binary
fn c4_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("c4"));
    cmd.env_remove("C4_FORMAT").env_remove("RUST_LOG");
    cmd
}

/// Create a temporary directory and initialize a c4 project
fn setup_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    c4_cmd()
        .arg("init")
        .arg(dir.path())
        .args(["--name", "Bank"])
        .assert()
        .success();
    dir
}

/// Runs a command in `dir` with JSON output and parses stdout
fn json_output(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = c4_cmd()
        .current_dir(dir)
        .args(args)
        .args(["--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    serde_json::from_str(stdout.trim()).unwrap()
}

/// Customer uses Internet Banking, with explicit ids
fn setup_bank_model() -> TempDir {
    let dir = setup_project();
    c4_cmd()
        .current_dir(dir.path())
        .args(["element", "add", "person", "Customer", "--id", "customer", "--external"])
        .assert()
        .success();
    c4_cmd()
        .current_dir(dir.path())
        .args(["element", "add", "software-system", "Internet Banking", "--id", "bank"])
        .assert()
        .success();
    c4_cmd()
        .current_dir(dir.path())
        .args(["rel", "add", "customer", "bank", "Views account balances using", "--id", "r1"])
        .assert()
        .success();
    dir
}

// =============================================================================
// Initialization Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    c4_cmd()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized c4 project"));

    assert!(dir.path().join(".c4").is_dir());
    assert!(dir.path().join(".c4/plugins").is_dir());
    assert!(dir.path().join(".c4/sync").is_dir());
    assert!(dir.path().join(".c4/config.toml").is_file());
    assert!(dir.path().join(".c4/.gitignore").is_file());
    assert!(dir.path().join(".c4/workspace.json").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = setup_bank_model();

    c4_cmd().arg("init").arg(dir.path()).assert().success();

    // The existing workspace is kept
    c4_cmd()
        .current_dir(dir.path())
        .args(["element", "show", "customer"])
        .assert()
        .success();
}

#[test]
fn test_init_sample_workspace() {
    let dir = TempDir::new().unwrap();

    c4_cmd()
        .arg("init")
        .arg(dir.path())
        .arg("--sample")
        .assert()
        .success();

    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SystemContext"))
        .stdout(predicate::str::contains("LiveDeployment"));

    c4_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .assert()
        .success();
}

#[test]
fn test_command_outside_project_fails() {
    let dir = TempDir::new().unwrap();

    c4_cmd()
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in a c4 project"));
}

// =============================================================================
// Model Tests
// =============================================================================

#[test]
fn test_element_add_and_list() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .args(["element", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("customer"))
        .stdout(predicate::str::contains("Internet Banking"));

    let people = json_output(dir.path(), &["element", "list", "--kind", "person"]);
    assert_eq!(people.as_array().unwrap().len(), 1);
    assert_eq!(people[0]["id"], "customer");
}

#[test]
fn test_generated_ids_are_returned() {
    let dir = setup_project();

    let system = json_output(dir.path(), &["element", "add", "software-system", "Shop"]);
    let system_id = system["id"].as_str().unwrap().to_string();

    let container = json_output(
        dir.path(),
        &["element", "add", "container", "API", "--parent", &system_id, "-t", "Rust"],
    );
    assert_eq!(container["parent"], system_id.as_str());
    assert_eq!(container["technology"], "Rust");
}

#[test]
fn test_container_requires_parent() {
    let dir = setup_project();

    c4_cmd()
        .current_dir(dir.path())
        .args(["element", "add", "container", "API"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--parent"));
}

#[test]
fn test_duplicate_id_is_rejected() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .args(["element", "add", "person", "Clerk", "--id", "customer"])
        .assert()
        .failure();
}

#[test]
fn test_relationship_to_missing_element_fails() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .args(["rel", "add", "customer", "nowhere", "Uses"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_element_show_lists_relationships() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .args(["element", "show", "bank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Used by:"))
        .stdout(predicate::str::contains("Views account balances using"));
}

#[test]
fn test_deployment_elements() {
    let dir = setup_bank_model();
    c4_cmd()
        .current_dir(dir.path())
        .args(["element", "add", "container", "API", "--id", "api", "--parent", "bank"])
        .assert()
        .success();

    let node = json_output(
        dir.path(),
        &["element", "add", "deployment-node", "Server", "--environment", "Live"],
    );
    let node_id = node["id"].as_str().unwrap().to_string();
    assert_eq!(node["environment"], "Live");

    let instance = json_output(
        dir.path(),
        &["element", "add", "container-instance", "api", "--parent", &node_id],
    );
    assert_eq!(instance["kind"], "container-instance");
    assert_eq!(instance["name"], "API");
    assert_eq!(instance["environment"], "Live");
}

// =============================================================================
// View Tests
// =============================================================================

#[test]
fn test_context_view_with_nearest_neighbours() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "create", "system-context", "--key", "Context", "--anchor", "bank"])
        .assert()
        .success();

    let result = json_output(dir.path(), &["view", "neighbours", "Context", "bank"]);
    assert_eq!(result["elements"], 2);
    assert_eq!(result["relationships"], 1);

    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "show", "Context"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer -> Internet Banking"));
}

#[test]
fn test_duplicate_view_key_fails() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "create", "system-landscape", "--key", "Landscape"])
        .assert()
        .success();

    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "create", "system-landscape", "--key", "Landscape"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_blank_view_key_fails() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "create", "system-landscape", "--key", " "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("A key must be specified"));
}

#[test]
fn test_filtered_view_needs_existing_base() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "create", "filtered", "--key", "F", "--base", "Missing", "--tag", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("View not found"));
}

#[test]
fn test_dynamic_view_interactions_are_numbered() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "create", "dynamic", "--key", "Flow"])
        .assert()
        .success();
    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "interaction", "Flow", "customer", "bank", "Signs in"])
        .assert()
        .success();

    let view = json_output(dir.path(), &["view", "show", "Flow"]);
    assert_eq!(view["relationships"][0]["order"], "1");
    assert_eq!(view["relationships"][0]["description"], "Signs in");

    // No relationship between an element and itself
    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "interaction", "Flow", "bank", "bank"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No relationship"));
}

// =============================================================================
// Document Tests
// =============================================================================

#[test]
fn test_export_import_round_trip() {
    let dir = setup_bank_model();
    let exported = dir.path().join("bank.json");

    c4_cmd()
        .current_dir(dir.path())
        .args(["export", "--output"])
        .arg(&exported)
        .assert()
        .success();

    let other = setup_project();
    c4_cmd()
        .current_dir(other.path())
        .arg("import")
        .arg(&exported)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 elements, 1 relationships"));

    c4_cmd()
        .current_dir(other.path())
        .args(["element", "show", "customer"])
        .assert()
        .success();
}

#[test]
fn test_export_to_stdout_uses_wire_names() {
    let dir = setup_bank_model();

    c4_cmd()
        .current_dir(dir.path())
        .arg("export")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"softwareSystems\""))
        .stdout(predicate::str::contains("\"destinationId\": \"bank\""));
}

#[test]
fn test_validate_reports_dangling_reference() {
    let dir = setup_project();
    let broken = dir.path().join("broken.json");
    fs::write(
        &broken,
        r#"{
  "name": "Broken",
  "model": {
    "people": [
      {"id": "1", "name": "User", "relationships": [{"id": "2", "destinationId": "99"}]}
    ]
  }
}"#,
    )
    .unwrap();

    c4_cmd()
        .current_dir(dir.path())
        .arg("validate")
        .arg(&broken)
        .assert()
        .failure()
        .stderr(predicate::str::contains("99"));
}

#[test]
fn test_layout_copy_from_document() {
    let dir = setup_bank_model();
    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "create", "system-landscape", "--key", "Landscape"])
        .assert()
        .success();
    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "add-all", "Landscape"])
        .assert()
        .success();

    let exported = dir.path().join("laid-out.json");
    c4_cmd()
        .current_dir(dir.path())
        .args(["export", "--output"])
        .arg(&exported)
        .assert()
        .success();

    // Place the customer in the exported copy
    let mut doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&exported).unwrap()).unwrap();
    for element in doc["views"]["systemLandscapeViews"][0]["elements"]
        .as_array_mut()
        .unwrap()
    {
        element["x"] = serde_json::json!(120);
        element["y"] = serde_json::json!(40);
    }
    fs::write(&exported, serde_json::to_string(&doc).unwrap()).unwrap();

    let result = json_output(dir.path(), &["layout", "copy", exported.to_str().unwrap()]);
    assert_eq!(result["views"], 1);

    c4_cmd()
        .current_dir(dir.path())
        .args(["view", "show", "Landscape"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@ 120,40"));
}

// =============================================================================
// Remote Tests
// =============================================================================

#[test]
fn test_remote_push_pull_with_directory() {
    let dir = setup_bank_model();
    let shared = TempDir::new().unwrap();

    c4_cmd()
        .current_dir(dir.path())
        .args(["remote", "add", "shared", "--workspace-id", "7", "--dir"])
        .arg(shared.path())
        .assert()
        .success();

    let pushed = json_output(dir.path(), &["remote", "push", "shared"]);
    assert_eq!(pushed["pushed"], true);
    assert!(shared.path().join("workspace-7.json").is_file());

    let again = json_output(dir.path(), &["remote", "push", "shared"]);
    assert_eq!(again["pushed"], false);

    let forced = json_output(dir.path(), &["remote", "push", "shared", "--force"]);
    assert_eq!(forced["pushed"], true);

    // A second project pulls the same workspace
    let other = setup_project();
    c4_cmd()
        .current_dir(other.path())
        .args(["remote", "add", "shared", "--workspace-id", "7", "--dir"])
        .arg(shared.path())
        .assert()
        .success();
    c4_cmd()
        .current_dir(other.path())
        .args(["remote", "pull", "shared"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pulled 'Bank'"));
    c4_cmd()
        .current_dir(other.path())
        .args(["element", "show", "bank"])
        .assert()
        .success();

    c4_cmd()
        .current_dir(other.path())
        .args(["remote", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shared (workspace 7)"));
}

#[test]
fn test_pull_from_empty_remote_fails() {
    let dir = setup_project();
    let shared = TempDir::new().unwrap();

    c4_cmd()
        .current_dir(dir.path())
        .args(["remote", "add", "shared", "--dir"])
        .arg(shared.path())
        .assert()
        .success();

    c4_cmd()
        .current_dir(dir.path())
        .args(["remote", "pull", "shared"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no workspace 1"));
}

#[test]
fn test_unknown_remote_lists_configured() {
    let dir = setup_project();

    c4_cmd()
        .current_dir(dir.path())
        .args(["remote", "push", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown remote 'nowhere'"));
}

#[test]
fn test_remote_list() {
    let dir = setup_project();

    c4_cmd()
        .current_dir(dir.path())
        .args(["remote", "add", "cloud", "--plugin", "structurizr", "--workspace-id", "42"])
        .assert()
        .success();

    let remotes = json_output(dir.path(), &["remote", "list"]);
    assert_eq!(remotes[0]["name"], "cloud");
    assert_eq!(remotes[0]["type"], "plugin");
    assert_eq!(remotes[0]["workspaceId"], 42);
}

#[cfg(unix)]
#[test]
fn test_remote_plugins_lists_project_plugins() {
    use std::os::unix::fs::PermissionsExt;

    let dir = setup_project();
    let plugin = dir.path().join(".c4/plugins/c4-remote-echo");
    fs::write(
        &plugin,
        "#!/bin/sh\nif [ \"$1\" = \"--manifest\" ]; then\n  echo '{\"name\":\"c4-remote-echo\",\"version\":\"0.2.0\",\"description\":\"Echo\",\"operations\":[\"test\"]}'\n  exit 0\nfi\nread line\necho '{\"success\":true}'\n",
    )
    .unwrap();
    fs::set_permissions(&plugin, fs::Permissions::from_mode(0o755)).unwrap();

    c4_cmd()
        .current_dir(dir.path())
        .args(["remote", "plugins"])
        .assert()
        .success()
        .stdout(predicate::str::contains("c4-remote-echo 0.2.0"));
}
