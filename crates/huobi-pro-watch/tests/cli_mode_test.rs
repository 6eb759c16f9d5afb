/*
[INPUT]:  Built binary, example and temporary YAML configs
[OUTPUT]: Exit status checks for dry-run mode
[POS]:    Integration test layer - CLI surface
[UPDATE]: When changing CLI flags or config validation
*/

use std::io::Write;
use std::process::{Command, Output};

fn run_dry(config_path: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_huobi-pro-watch"))
        .arg("--config")
        .arg(config_path)
        .arg("--dry-run")
        .arg("--log-level")
        .arg("error")
        .output()
        .expect("Failed to start huobi-pro-watch binary")
}

#[test]
fn cli_mode_with_config_and_dry_run_works() {
    let config_path = format!("{}/examples/watch.yaml", env!("CARGO_MANIFEST_DIR"));
    let output = run_dry(&config_path);

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn cli_mode_rejects_invalid_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "symbols: []").unwrap();

    let output = run_dry(file.path().to_str().unwrap());
    assert!(!output.status.success());
}

#[test]
fn cli_mode_rejects_missing_config() {
    let output = run_dry("/nonexistent/watch.yaml");
    assert!(!output.status.success());
}
