use assert_cmd::Command;

/// Creates a `Command` for the `diary` binary with a clean, non-interactive environment.
/// Additional environment variables or arguments can be configured by the caller.
pub fn base_diary_command() -> Command {
    let mut cmd = Command::cargo_bin("diary").expect("diary binary not built");
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd
}
