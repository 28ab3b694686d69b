//! Error taxonomy shared by the core modules.

use thiserror::Error;

pub type Result<T, E = KeychainError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum KeychainError {
    /// Malformed or missing command-line input.
    #[error("usage: {0}")]
    Usage(String),

    /// The engine ran and exited unsuccessfully.
    #[error("{action} failed ({}): {output}", describe_status(.status))]
    ExternalTool {
        action: &'static str,
        status: Option<i32>,
        output: String,
    },

    /// The engine could not be started at all.
    #[error("cannot run {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine produced output this tool cannot interpret.
    #[error("unexpected output from {action}: {line:?}")]
    UnexpectedOutput { action: &'static str, line: String },

    /// Reading or validating the supplied secret failed.
    #[error("input: {0}")]
    Input(String),
}

impl KeychainError {
    /// Process exit status this error should map to.
    pub fn exit_status(&self) -> u8 {
        match self {
            KeychainError::Usage(_) => 2,
            KeychainError::ExternalTool {
                status: Some(code), ..
            } if (1..=255).contains(code) => *code as u8,
            _ => 1,
        }
    }
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_propagates_engine_code() {
        let err = KeychainError::ExternalTool {
            action: "delete-keychain",
            status: Some(50),
            output: "not found".into(),
        };
        assert_eq!(err.exit_status(), 50);
    }

    #[test]
    fn test_exit_status_out_of_range_falls_back() {
        let err = KeychainError::ExternalTool {
            action: "delete-keychain",
            status: Some(300),
            output: String::new(),
        };
        assert_eq!(err.exit_status(), 1);
        let err = KeychainError::ExternalTool {
            action: "delete-keychain",
            status: None,
            output: String::new(),
        };
        assert_eq!(err.exit_status(), 1);
    }

    #[test]
    fn test_exit_status_usage_and_input() {
        assert_eq!(KeychainError::Usage("x".into()).exit_status(), 2);
        assert_eq!(KeychainError::Input("x".into()).exit_status(), 1);
    }

    #[test]
    fn test_external_tool_message_keeps_output() {
        let err = KeychainError::ExternalTool {
            action: "unlock-keychain",
            status: Some(51),
            output: "bad password".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("unlock-keychain"));
        assert!(msg.contains("exit status 51"));
        assert!(msg.contains("bad password"));
    }
}
