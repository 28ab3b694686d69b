//! `security(1)` subprocess adapter.

use crate::core::engine::KeychainEngine;
use crate::error::{KeychainError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs the engine binary, one blocking invocation per operation.
#[derive(Debug, Clone)]
pub struct SecurityTool {
    program: PathBuf,
    leading_args: Vec<String>,
    domain: String,
}

impl SecurityTool {
    pub fn new(program: PathBuf, leading_args: Vec<String>, domain: String) -> Self {
        Self {
            program,
            leading_args,
            domain,
        }
    }

    fn command(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .arg(subcommand)
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, action: &'static str, mut cmd: Command) -> Result<String> {
        let output = cmd.output().map_err(|source| KeychainError::Launch {
            program: self.program.display().to_string(),
            source,
        })?;
        if output.status.success() {
            debug!(action, "engine call succeeded");
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(KeychainError::ExternalTool {
            action,
            status: output.status.code(),
            output: format!("{}{}", stdout, stderr).trim_end().to_string(),
        })
    }
}

impl KeychainEngine for SecurityTool {
    fn list_active(&self) -> Result<Vec<String>> {
        debug!(domain = %self.domain, "listing search list");
        let mut cmd = self.command("list-keychains");
        cmd.arg("-d").arg(&self.domain);
        let stdout = self.run("list-keychains", cmd)?;
        Ok(stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    fn create(&self, path: &Path, password: &str) -> Result<()> {
        debug!(path = %path.display(), "creating keychain");
        let mut cmd = self.command("create-keychain");
        cmd.arg("-p").arg(password).arg(path);
        self.run("create-keychain", cmd).map(drop)
    }

    fn set_lock_timeout(&self, path: &Path, seconds: u32) -> Result<()> {
        debug!(path = %path.display(), seconds, "setting lock timeout");
        let mut cmd = self.command("set-keychain-settings");
        cmd.arg("-lut").arg(seconds.to_string()).arg(path);
        self.run("set-keychain-settings", cmd).map(drop)
    }

    fn set_active(&self, paths: &[PathBuf]) -> Result<()> {
        debug!(domain = %self.domain, count = paths.len(), "replacing search list");
        let mut cmd = self.command("list-keychains");
        cmd.arg("-d").arg(&self.domain).arg("-s");
        cmd.args(paths);
        self.run("list-keychains -s", cmd).map(drop)
    }

    fn unlock(&self, path: &Path, password: &str) -> Result<()> {
        debug!(path = %path.display(), "unlocking keychain");
        let mut cmd = self.command("unlock-keychain");
        cmd.arg("-p").arg(password).arg(path);
        self.run("unlock-keychain", cmd).map(drop)
    }

    fn delete(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "deleting keychain");
        let mut cmd = self.command("delete-keychain");
        cmd.arg(path);
        self.run("delete-keychain", cmd).map(drop)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> SecurityTool {
        SecurityTool::new(
            PathBuf::from("/bin/sh"),
            vec!["-c".into(), script.into(), "fake-security".into()],
            "user".into(),
        )
    }

    #[test]
    fn test_list_active_returns_nonempty_lines() {
        let tool = shell(r#"printf '    "/a/login.keychain-db"\n\n    "/tmp/ci.keychain"\n'"#);
        let lines = tool.list_active().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("/tmp/ci.keychain"));
    }

    #[test]
    fn test_arguments_follow_engine_layout() {
        // Echo the full argument vector to stderr and fail so it is captured.
        let tool = shell(r#"echo "$@" >&2; exit 7"#);
        let err = tool
            .set_active(&[PathBuf::from("/a"), PathBuf::from("/b")])
            .unwrap_err();
        match err {
            KeychainError::ExternalTool {
                action,
                status,
                output,
            } => {
                assert_eq!(action, "list-keychains -s");
                assert_eq!(status, Some(7));
                assert_eq!(output, "list-keychains -d user -s /a /b");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failure_captures_stdout_and_stderr() {
        let tool = shell("echo out; echo err >&2; exit 50");
        let err = tool.delete(Path::new("/tmp/missing.keychain")).unwrap_err();
        assert_eq!(err.exit_status(), 50);
        let msg = err.to_string();
        assert!(msg.contains("out"));
        assert!(msg.contains("err"));
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let tool = SecurityTool::new(
            PathBuf::from("/nonexistent/security"),
            Vec::new(),
            "user".into(),
        );
        assert!(matches!(
            tool.list_active(),
            Err(KeychainError::Launch { .. })
        ));
    }
}
