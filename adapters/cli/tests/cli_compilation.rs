use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "train-match"])
        .status()
        .expect("failed to invoke cargo check for train-match CLI binary");

    assert!(status.success(), "cargo check --bin train-match should succeed");
}

#[test]
fn play_round_persists_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let profile = dir.path().join("profile.bin");

    let output = Command::new(env!("CARGO_BIN_EXE_train-match"))
        .arg("--profile")
        .arg(&profile)
        .args(["play", "--mode", "number-range", "--seed", "3", "--json"])
        .output()
        .expect("failed to run train-match");
    assert!(output.status.success(), "play failed: {output:?}");

    let stdout = String::from_utf8(output.stdout).expect("utf8 output");
    let report: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json report");
    assert_eq!(report["mode"], "NumberRange");
    assert_eq!(report["games"], 1);
    assert!(profile.exists(), "profile was not saved");

    let reset = Command::new(env!("CARGO_BIN_EXE_train-match"))
        .arg("--profile")
        .arg(&profile)
        .arg("reset")
        .status()
        .expect("failed to run train-match");
    assert!(reset.success());
    assert!(!profile.exists(), "profile survived reset");
}
