//! Keeps every workspace member on the shared workspace version.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .unwrap()
        .to_path_buf()
}

fn root_manifest() -> toml::Value {
    let text = std::fs::read_to_string(workspace_root().join("Cargo.toml")).unwrap();
    text.parse().unwrap()
}

fn workspace_version() -> String {
    root_manifest()["workspace"]["package"]["version"]
        .as_str()
        .unwrap()
        .to_string()
}

#[test]
fn members_inherit_workspace_version() {
    let manifest = root_manifest();
    let members = manifest["workspace"]["members"].as_array().unwrap();
    assert!(!members.is_empty());

    for member in members {
        let member = member.as_str().unwrap();
        let text =
            std::fs::read_to_string(workspace_root().join(member).join("Cargo.toml")).unwrap();
        let doc: toml::Value = text.parse().unwrap();
        let inherits = doc["package"]["version"]
            .get("workspace")
            .and_then(|v| v.as_bool())
            == Some(true);
        assert!(inherits, "{member} should use version.workspace = true");
    }
}

#[test]
fn internal_dependency_pins_workspace_version() {
    let manifest = root_manifest();
    let pinned = manifest["workspace"]["dependencies"]["relcheck-core"]["version"]
        .as_str()
        .unwrap();
    assert_eq!(pinned, workspace_version());
}

#[test]
fn exported_version_matches_workspace() {
    assert_eq!(relcheck_core::VERSION, workspace_version());
}
