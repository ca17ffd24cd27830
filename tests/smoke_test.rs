/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

fn treeglow() -> Command {
    Command::new(env!("CARGO_BIN_EXE_treeglow"))
}

#[test]
fn binary_shows_help() {
    let output = treeglow()
        .arg("--help")
        .output()
        .expect("Failed to execute treeglow");

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("treeglow"), "Help output should mention treeglow");
    assert!(stdout.contains("--palette"), "Help output should list --palette");
}

#[test]
fn binary_shows_version() {
    let output = treeglow()
        .arg("--version")
        .output()
        .expect("Failed to execute treeglow");

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_argument_fails_gracefully() {
    let output = treeglow()
        .arg("--nonexistent-flag")
        .output()
        .expect("Failed to execute treeglow");

    assert!(
        !output.status.success(),
        "Invalid argument should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid argument should not cause panic"
    );
}

#[test]
fn invalid_palette_reports_error() {
    let output = treeglow()
        .args(["--print", "--palette", "zzzzzz"])
        .output()
        .expect("Failed to execute treeglow");

    assert!(!output.status.success(), "Bad palette should return error status");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid colour"), "Unexpected stderr: {}", stderr);
    assert!(!stderr.contains("panicked at"));
}
