#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

pub const EMAIL: &str = "jane@example.com";
pub const PASSWORD: &str = "test-password";

/// Run the CLI with an isolated home directory.
pub fn run_cli(args: &[&str], home: &Path) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_crm"));
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env("XDG_DATA_HOME", home.join("data"));
    cmd.env("CRM_HOME", home.join("crm"));
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("CRM_STORE");
    cmd.env_remove("CRM_API_KEY");
    cmd.env_remove("CRM_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(args: &[&str], home: &Path) -> String {
    let output = run_cli(args, home);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_failure(args: &[&str], home: &Path) -> String {
    let output = run_cli(args, home);
    assert!(
        !output.status.success(),
        "CLI command unexpectedly succeeded: {:?}\nstdout: {}",
        args,
        String::from_utf8_lossy(&output.stdout)
    );
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Register the default account, leaving it signed in.
pub fn sign_up(home: &Path) {
    run_cli_success(
        &["auth", "sign-up", "--email", EMAIL, "--password", PASSWORD],
        home,
    );
}

/// Create a record and return its id.
pub fn create(home: &Path, collection: &str, data: &str) -> String {
    let stdout = run_cli_success(&["records", "create", collection, "--data", data], home);
    stdout
        .lines()
        .next()
        .expect("create printed no id")
        .trim()
        .to_string()
}

/// Parse each stdout line as a JSON record.
pub fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("stdout line is not JSON"))
        .collect()
}

/// Pull the `Next cursor:` token out of stderr.
pub fn next_cursor(stderr: &str) -> Option<String> {
    stderr
        .lines()
        .find_map(|line| line.trim().strip_prefix("Next cursor: "))
        .map(str::to_string)
}
