use std::{
    env,
    path::{Path, PathBuf},
    process::Command,
};

use vergen_gix::{Emitter, GixBuilder, RustcBuilder};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    emit_toolchain();

    // Packagers building from a tarball can pin the revision explicitly.
    println!("cargo:rerun-if-env-changed=RELCHECK_BUILD_REVISION");

    if let Some(revision) = env::var("RELCHECK_BUILD_REVISION")
        .ok()
        .and_then(|s| normalize_revision(&s))
    {
        println!("cargo:rustc-env=VERGEN_GIT_SHA={revision}");
        println!("cargo:rustc-env=VERGEN_GIT_DIRTY=false");
        return;
    }

    // Git probing is best-effort. Outside a checkout the crate reads the
    // variables with `option_env!`, so nothing has to be emitted.
    let Some(repo_root) = find_repo_root(Path::new(
        &env::var("CARGO_MANIFEST_DIR").unwrap_or_default(),
    )) else {
        return;
    };

    let git = match GixBuilder::default()
        .repo_path(Some(repo_root))
        .sha(false)
        .dirty(false)
        .commit_timestamp(true)
        .build()
    {
        Ok(git) => git,
        Err(err) => {
            println!("cargo:warning=relcheck-core: vergen-gix config failed: {err}");
            return;
        }
    };

    if let Err(err) = Emitter::default()
        .add_instructions(&git)
        .and_then(|e| e.emit())
    {
        println!("cargo:warning=relcheck-core: vergen-gix emit failed: {err}");
    }
}

/// Emit `VERGEN_RUSTC_SEMVER` / `VERGEN_RUSTC_CHANNEL`, falling back to
/// parsing `rustc --version` when vergen cannot.
fn emit_toolchain() {
    let emitted = RustcBuilder::default()
        .semver(true)
        .channel(true)
        .build()
        .map_err(|err| err.to_string())
        .and_then(|rustc| {
            Emitter::default()
                .add_instructions(&rustc)
                .and_then(|e| e.emit())
                .map_err(|err| err.to_string())
        });

    if let Err(err) = emitted {
        println!("cargo:warning=relcheck-core: vergen rustc probe failed: {err}");
        if let Some((semver, channel)) = probe_rustc() {
            println!("cargo:rustc-env=VERGEN_RUSTC_SEMVER={semver}");
            println!("cargo:rustc-env=VERGEN_RUSTC_CHANNEL={channel}");
        }
    }
}

/// Parse `rustc 1.82.0 (f6e511eec 2024-10-15)` into `("1.82.0", "stable")`.
fn probe_rustc() -> Option<(String, String)> {
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let output = Command::new(rustc).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let semver = stdout.split_whitespace().nth(1)?.to_string();
    let channel = if semver.contains("nightly") {
        "nightly"
    } else if semver.contains("beta") {
        "beta"
    } else {
        "stable"
    };
    Some((semver, channel.to_string()))
}

fn normalize_revision(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
