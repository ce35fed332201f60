//! Error types for onappctl

use colored::Colorize;
use onapp_core::{ConfigError, OnAppError, TransportError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: Profile 'lab' not found
///
///   tip: List available profiles: onappctl profile list
/// ```
pub struct CliDiagnostic {
    message: String,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            tips: Vec::new(),
        }
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[&str]) -> Self {
        self.tips.push((
            description.to_string(),
            commands.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum OnAppCtlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("No profile configured. Use 'onappctl profile set' to configure a profile.")]
    NoProfileConfigured,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("File error for '{path}': {message}")]
    FileError { path: String, message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

pub type Result<T> = std::result::Result<T, OnAppCtlError>;

impl OnAppCtlError {
    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            OnAppCtlError::ProfileNotFound { name } => vec![
                "List available profiles: onappctl profile list".to_string(),
                format!(
                    "Create profile '{}': onappctl profile set {} --url <url> --username <user>",
                    name, name
                ),
            ],
            OnAppCtlError::NoProfileConfigured => vec![
                "Create a profile: onappctl profile set <name> --url <url> --username <user>"
                    .to_string(),
                "Or export ONAPP_URL, ONAPP_USERNAME and ONAPP_API_KEY".to_string(),
            ],
            OnAppCtlError::AuthenticationFailed { .. } => vec![
                "Check your credentials: onappctl profile show <profile>".to_string(),
                "The API key is generated per user in the control panel".to_string(),
            ],
            OnAppCtlError::ConnectionError { message }
                if message.contains("certificate") || message.contains("SSL") =>
            {
                vec![
                    "For self-signed certificates: onappctl profile set <name> --insecure"
                        .to_string(),
                    "Check that the control panel URL is correct and reachable".to_string(),
                ]
            }
            OnAppCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify the control panel URL: onappctl profile show <profile>".to_string(),
            ],
            OnAppCtlError::ApiError { message } if message.contains("404") => vec![
                "Verify the resource ID is correct".to_string(),
                "List available resources to find the correct ID".to_string(),
            ],
            OnAppCtlError::NotFound { .. } => vec![
                "List recent transactions: onappctl transaction list".to_string(),
            ],
            OnAppCtlError::Timeout { .. } => vec![
                "Raise the limit with --wait-timeout".to_string(),
                "Check progress later: onappctl transaction get <id>".to_string(),
            ],
            OnAppCtlError::InvalidInput { .. } => vec![
                "Check the command syntax: onappctl <command> --help".to_string(),
            ],
            OnAppCtlError::FileError { path, .. } => vec![
                format!("Check that file exists: {}", path),
                "Verify file permissions are correct".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&self.to_string());

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion, &[]);
        }

        diag.print();
    }
}

impl From<OnAppError> for OnAppCtlError {
    fn from(err: OnAppError) -> Self {
        match err {
            OnAppError::InvalidArgument { argument, reason } => OnAppCtlError::InvalidInput {
                message: format!("{}: {}", argument, reason),
            },
            OnAppError::Transport(TransportError::Status { status, body })
                if status == 401 || status == 403 =>
            {
                OnAppCtlError::AuthenticationFailed {
                    message: format!("HTTP {}: {}", status, body),
                }
            }
            OnAppError::Transport(TransportError::Status { status, body }) => {
                OnAppCtlError::ApiError {
                    message: format!("HTTP {}: {}", status, body),
                }
            }
            OnAppError::Transport(TransportError::Request(e)) => OnAppCtlError::ConnectionError {
                message: e.to_string(),
            },
            OnAppError::Transport(other) => OnAppCtlError::ApiError {
                message: other.to_string(),
            },
            err @ OnAppError::NotFound { .. } => OnAppCtlError::NotFound {
                message: err.to_string(),
            },
            OnAppError::TransactionFailed(message) => OnAppCtlError::ApiError { message },
            OnAppError::TransactionTimeout(duration) => OnAppCtlError::Timeout {
                message: format!(
                    "transaction did not finish within {} seconds",
                    duration.as_secs()
                ),
            },
            OnAppError::Config(err) => err.into(),
        }
    }
}

impl From<ConfigError> for OnAppCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name } => OnAppCtlError::ProfileNotFound { name },
            ConfigError::NoProfiles { .. } => OnAppCtlError::NoProfileConfigured,
            other => OnAppCtlError::Config(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for OnAppCtlError {
    fn from(err: serde_json::Error) -> Self {
        OnAppCtlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<std::io::Error> for OnAppCtlError {
    fn from(err: std::io::Error) -> Self {
        OnAppCtlError::OutputError {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<anyhow::Error> for OnAppCtlError {
    fn from(err: anyhow::Error) -> Self {
        OnAppCtlError::OutputError {
            message: format!("{:#}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_authentication() {
        let err: OnAppCtlError = OnAppError::Transport(TransportError::Status {
            status: 401,
            body: "denied".to_string(),
        })
        .into();
        assert!(matches!(err, OnAppCtlError::AuthenticationFailed { .. }));
        assert!(!err.suggestions().is_empty());
    }

    #[test]
    fn test_invalid_argument_maps_to_invalid_input() {
        let err: OnAppCtlError = OnAppError::invalid_argument("id", "must be positive").into();
        assert_eq!(err.to_string(), "Invalid input: id: must be positive");
    }

    #[test]
    fn test_missing_transaction_maps_to_not_found() {
        let err: OnAppCtlError = OnAppError::NotFound {
            parent_id: 5,
            parent_type: "Disk".to_string(),
        }
        .into();
        assert!(matches!(err, OnAppCtlError::NotFound { .. }));
        assert!(err.to_string().contains("Disk 5"));
    }

    #[test]
    fn test_config_errors_keep_profile_name() {
        let err: OnAppCtlError = OnAppError::Config(ConfigError::ProfileNotFound {
            name: "lab".to_string(),
        })
        .into();
        assert!(matches!(err, OnAppCtlError::ProfileNotFound { ref name } if name == "lab"));
    }
}
