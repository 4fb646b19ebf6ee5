// SPDX-License-Identifier: MIT
//
// Startup precondition checks, driven through the real binary.

use std::process::Command;

#[test]
fn refuses_to_run_without_a_tty() {
    // Spawned with piped std streams, so neither fd is a terminal.
    let output = Command::new(env!("CARGO_BIN_EXE_tilde"))
        .output()
        .expect("failed to spawn tilde");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("must be a terminal"),
        "diagnostic should go to stdout, got: {stdout:?}"
    );
}

#[test]
fn rejects_extra_arguments() {
    let output = Command::new(env!("CARGO_BIN_EXE_tilde"))
        .args(["one.txt", "two.txt"])
        .output()
        .expect("failed to spawn tilde");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage:"));
}
