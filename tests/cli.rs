//! CLI tests for osiris-buildcfg.
//!
//! These run the binary against the demo descriptors and temporary
//! descriptors, and verify output and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn buildcfg_cmd() -> Command {
    let mut cmd = Command::cargo_bin("osiris-buildcfg").unwrap();
    cmd.env_remove("OSIRIS_BUILD_DESCRIPTOR").env_remove("RUST_LOG");
    cmd
}

fn demo(name: &str) -> String {
    format!("{}/demos/{}/osiris-build.toml", env!("CARGO_MANIFEST_DIR"), name)
}

/// Create a temp directory with a descriptor file.
fn temp_descriptor(content: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("osiris-build.toml"), content).unwrap();
    temp
}

#[test]
fn help_flag_works() {
    buildcfg_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    buildcfg_cmd().assert().code(2);
}

#[test]
fn check_demos() {
    for name in ["chat-app", "demo-app", "hello-test"] {
        buildcfg_cmd()
            .args(["--descriptor", &demo(name), "check"])
            .assert()
            .success()
            .stdout(predicate::str::contains("valid"));
    }
}

#[test]
fn check_uses_environment() {
    buildcfg_cmd()
        .env("OSIRIS_BUILD_DESCRIPTOR", demo("chat-app"))
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("com.chatp2p.app: valid"));
}

#[test]
fn check_verbose_logs_resolution() {
    buildcfg_cmd()
        .args(["--descriptor", &demo("chat-app"), "--verbose", "check"])
        .assert()
        .success()
        .stderr(predicate::str::contains("resolved android configuration"));

    buildcfg_cmd()
        .args(["--descriptor", &demo("chat-app"), "check"])
        .assert()
        .success()
        .stderr(predicate::str::contains("resolved android configuration").not());
}

#[test]
fn check_missing_descriptor() {
    let temp = TempDir::new().unwrap();

    buildcfg_cmd()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot resolve build descriptor"));
}

#[test]
fn check_sdk_ordering() {
    let temp = temp_descriptor(
        "version = 1\nplugins = [\"com.android.application\"]\n\
         [android]\nnamespace = \"a.b\"\nversion-name = \"1\"\ncompile-sdk = 34\nmin-sdk = 21\ntarget-sdk = 19\n",
    );

    buildcfg_cmd()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sdk-ordering"));
}

#[test]
fn check_unresolved_signing_config() {
    let temp = temp_descriptor(
        "version = 1\nplugins = [\"com.android.application\"]\n\
         [android]\nnamespace = \"a.b\"\nversion-name = \"1\"\ncompile-sdk = 34\nmin-sdk = 21\n\
         [build-type.release]\nsigning-config = \"release-key\"\n",
    );

    buildcfg_cmd()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unresolved-signing-config"));
}

#[test]
fn resolve_json() {
    let output = buildcfg_cmd()
        .args(["--descriptor", &demo("demo-app"), "resolve"])
        .output()
        .unwrap();

    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["namespace"], "com.chatp2p.demo");
    assert_eq!(v["ndk-version"]["mode"], "disabled");
    assert_eq!(v["build-types"]["debug"]["application-id-suffix"], ".debug");
    assert_eq!(v["packaging"], serde_json::json!(["/META-INF/AL2.0", "/META-INF/LGPL2.1"]));
}

#[test]
fn resolve_properties() {
    buildcfg_cmd()
        .args(["--descriptor", &demo("hello-test"), "resolve", "--format", "properties"])
        .assert()
        .success()
        .stdout(predicate::str::contains("osiris.android.namespace=com.chatp2p.hello\n"))
        .stdout(predicate::str::contains("osiris.android.targetSdk=21\n"));
}

#[test]
fn resolve_unknown_format() {
    buildcfg_cmd()
        .args(["--descriptor", &demo("chat-app"), "resolve", "--format", "yaml"])
        .assert()
        .code(2);
}

#[test]
fn emerge_build_file() {
    let temp = TempDir::new().unwrap();
    let module = temp.path().join("app");

    buildcfg_cmd()
        .args(["--descriptor", &demo("demo-app"), "emerge", "--output"])
        .arg(&module)
        .assert()
        .success();

    let content = std::fs::read_to_string(module.join("build.gradle.kts")).unwrap();
    assert!(content.contains("namespace = \"com.chatp2p.demo\""));
    assert!(content.contains("ndkVersion = null"));
    assert!(content.contains("excludes += \"/META-INF/LGPL2.1\""));

    // A second run refuses to overwrite unless updates are allowed.
    buildcfg_cmd()
        .args(["--descriptor", &demo("demo-app"), "emerge", "--output"])
        .arg(&module)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already present"));

    buildcfg_cmd()
        .args(["--descriptor", &demo("demo-app"), "emerge", "--update", "true", "--output"])
        .arg(&module)
        .assert()
        .success();
}
