use std::cmp::Ordering;

use relcheck_core::{
    CheckOutcome, ConditionSet, DeploymentEnvironment, FixedEnvironment, Introspector,
    ReleaseError, ReleasePolicy, VcsInfo,
};

fn linux_host() -> Introspector {
    Introspector::new(
        FixedEnvironment::new()
            .with_runtime_version("1.82.0")
            .with_platform("linux", "x86_64")
            .with_cpu_count(8),
    )
}

// ---- ConditionSet ----

#[test]
fn results_follow_insertion_order() {
    let names = ["first", "second", "third", "fourth", "fifth"];
    let mut set = ConditionSet::new();
    for name in names {
        set.add(name, format!("{name} condition"), || true);
    }

    let results = set.test_all();
    assert_eq!(results.len(), names.len());
    for (result, name) in results.iter().zip(names) {
        assert_eq!(result.name, name);
        assert_eq!(result.description, format!("{name} condition"));
    }
    assert!(results.all_passed());
}

#[test]
fn single_failure_fails_the_set() {
    let mut set = ConditionSet::new();
    set.add("ok", "passes", || true);
    set.add("nope", "fails", || false);
    set.add("ok-again", "passes", || true);

    let results = set.test_all();
    assert!(!results.all_passed());
    assert_eq!(results.passed_count(), 2);
}

#[test]
fn single_error_fails_the_set_even_when_passed() {
    let mut set = ConditionSet::new();
    set.add("ok", "passes", || true);
    set.add("warned", "passes with error", || {
        CheckOutcome::pass().with_error(anyhow::anyhow!("probe timed out"))
    });

    let results = set.test_all();
    assert!(!results.all_passed());
    assert!(results[1].passed);
    assert!(results[1].error.is_some());
}

#[test]
fn failed_and_errored_keeps_both_signals() {
    let mut set = ConditionSet::new();
    set.add("double", "fails with error", || {
        CheckOutcome::new(false, Some(anyhow::anyhow!("could not evaluate")))
    });

    let results = set.test_all();
    assert!(!results[0].passed);
    assert_eq!(
        results[0].error.as_ref().map(|e| e.to_string()).as_deref(),
        Some("could not evaluate")
    );
}

#[test]
fn version_checks_compose_into_conditions() {
    let host = linux_host();
    let mut set = ConditionSet::new();
    for min in ["1.56", "1.70", "1.82", "1.90"] {
        let host = host.clone();
        set.add(format!("rust>={min}"), "toolchain floor", move || {
            host.is_version_at_least(min)
        });
    }

    let passed: Vec<bool> = set.test_all().iter().map(|r| r.passed).collect();
    assert_eq!(passed, [true, true, true, false]);
}

// ---- Introspector ----

#[test]
fn at_least_agrees_with_compare() {
    let host = linux_host();
    for target in ["1.0", "1.81.9", "1.82", "1.82.0", "1.82.1", "2.0", "v1.82.0-rc.1"] {
        let cmp = host.compare_version(target).unwrap();
        let at_least = host.is_version_at_least(target).unwrap();
        assert_eq!(at_least, cmp != Ordering::Less, "target {target}");
    }
}

#[test]
fn compare_errors_on_garbage() {
    let host = linux_host();
    assert!(matches!(
        host.compare_version("not-a-version"),
        Err(ReleaseError::InvalidVersion { .. })
    ));
    assert!(host.compare_version("").is_err());
    assert!(host.is_version_at_least("latest").is_err());
}

#[test]
fn platform_is_conjunction_of_os_and_arch() {
    let host = linux_host();
    for os in ["linux", "macos", "windows", "fakeos"] {
        for arch in ["x86_64", "aarch64", "fakearch"] {
            assert_eq!(
                host.is_platform(os, arch),
                host.is_os(os) && host.is_arch(arch),
                "{os}/{arch}"
            );
        }
    }
    assert!(!host.is_platform("fakeos", "fakearch"));
}

#[test]
fn build_info_reflects_environment() {
    let host = Introspector::new(
        FixedEnvironment::new()
            .with_runtime_version("1.84.0-nightly")
            .with_channel("nightly")
            .with_platform("macos", "aarch64")
            .with_vcs(VcsInfo {
                revision: "9f1c2ab3d4e5f60718293a4b5c6d7e8f90a1b2c3".to_string(),
                modified: false,
                time: "2025-01-02T03:04:05Z".to_string(),
            }),
    );

    let info = host.build_info();
    assert_eq!(info.platform, "macos/aarch64");
    assert_eq!(info.channel, "nightly");
    assert!(info.has_vcs_info());
    assert!(info.commit_time().is_some());
    assert_eq!(host.major_minor().unwrap(), (1, 84));
}

// ---- ReleasePolicy ----

#[test]
fn unsupported_platform_fails_standard_policy() {
    let host = Introspector::new(FixedEnvironment::new().with_platform("freebsd", "riscv64"));
    let results = ReleasePolicy::standard().condition_set(&host).test_all();

    let failed: Vec<&str> = results.failed().map(|r| r.name.as_str()).collect();
    assert_eq!(failed, ["supported-os", "supported-arch"]);
}

#[test]
fn staging_needs_vcs_but_not_clean_tree() {
    let host = Introspector::new(FixedEnvironment::new().with_vcs(VcsInfo {
        revision: "abc1234".to_string(),
        modified: true,
        time: String::new(),
    }));

    let staging = ReleasePolicy::for_environment(DeploymentEnvironment::Staging)
        .condition_set(&host)
        .test_all();
    assert!(staging.all_passed());

    let production = ReleasePolicy::for_environment(DeploymentEnvironment::Production)
        .condition_set(&host)
        .test_all();
    assert!(!production.all_passed());
}
