use std::process::Command;

use serde_json::Value;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_al-probe"))
}

#[test]
fn candidates_outputs_json() {
    let output = cli()
        .args([
            "candidates",
            "--platform",
            "linux",
            "--prefer-system",
            "--bundle-dir",
            "/opt/natives",
            "--format",
            "json",
        ])
        .output()
        .expect("candidates command");

    assert!(
        output.status.success(),
        "candidates exited with {:?}",
        output.status.code()
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    let report: Value = serde_json::from_str(&stdout).expect("candidates JSON");

    assert_eq!(report["platform"], "linux");
    assert_eq!(report["prefer_system"], true);

    let tools: Vec<&str> = report["tool_libraries"]
        .as_array()
        .expect("tool_libraries array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(tools.first(), Some(&"libopenal.so.1"));
    assert_eq!(tools.last(), Some(&"OpenAL"));
    assert!(tools.contains(&"/opt/natives/libopenal.so"));

    let glue = report["glue_libraries"][0]
        .as_array()
        .expect("glue alternatives");
    assert_eq!(glue[0], "/opt/natives/libopenal_bridge.so");
    assert_eq!(glue[1], "openal_bridge");
}

#[test]
fn candidates_bundled_first_by_default() {
    let output = cli()
        .args([
            "candidates",
            "--platform",
            "windows",
            "--bundle-dir",
            "/opt/natives",
            "--format",
            "json",
        ])
        .output()
        .expect("candidates command");

    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).expect("candidates JSON");
    let first = report["tool_libraries"][0].as_str().expect("first candidate");
    assert!(first.starts_with("/opt/natives"), "got {first}");
    assert!(first.ends_with("openal.dll"), "got {first}");
}

#[test]
fn candidates_table_lists_every_name() {
    let output = cli()
        .args(["candidates", "--platform", "macos", "--prefer-system"])
        .output()
        .expect("candidates command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("/System/Library/Frameworks/OpenAL.framework/OpenAL"));
    assert!(stdout.contains("Glue libraries:"));
}

#[test]
fn invalid_platform_is_rejected() {
    let output = cli()
        .args(["candidates", "--platform", "beos"])
        .output()
        .expect("candidates command");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(stderr.contains("beos"), "unexpected stderr: {stderr}");
}

#[test]
fn unknown_string_param_is_rejected_before_loading() {
    let output = cli()
        .args(["string", "ALC_NOT_A_PARAM", "--format", "json"])
        .output()
        .expect("string command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("stderr utf8");
    assert!(
        stderr.contains("unknown ALC string parameter ALC_NOT_A_PARAM"),
        "unexpected stderr: {stderr}"
    );
    assert!(!stderr.contains("loading OpenAL"), "unexpected stderr: {stderr}");
}
