use thiserror::Error;

#[derive(Debug, Error)]
pub enum LagoonError {
    #[error("invalid branch name '{0}': only letters, digits, '_', '.', '/' and '-' are allowed")]
    InvalidBranchName(String),

    #[error("cannot delete protected environment: {0}")]
    DeletionProtected(String),

    #[error("login links are not generated for protected environment: {0}")]
    LoginLinkProtected(String),

    #[error("invalid remote url '{0}'")]
    InvalidRemoteUrl(String),

    #[error("no {0} selected")]
    MissingSelection(&'static str),

    #[error("lagoon instance not found in config: {0}")]
    InstanceNotFound(String),

    #[error("ssh key not found: {0}")]
    SshKeyNotFound(String),

    #[error("failed to run '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    #[error("'{command}' exited with {}: {stderr}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{operation} reported an error\n  response: {raw}")]
    OperationRejected { operation: String, raw: String },

    #[error("unexpected response from {operation}: {message}\n  response: {raw}")]
    UnexpectedResponse {
        operation: String,
        message: String,
        raw: String,
    },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "a signal".to_string(),
    }
}

/// Coarse classification used by callers to tell "command did not run" apart
/// from "command ran but the answer was unintelligible".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Lookup,
    Execution,
    Parse,
    Io,
}

impl LagoonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LagoonError::InvalidBranchName(_)
            | LagoonError::DeletionProtected(_)
            | LagoonError::LoginLinkProtected(_)
            | LagoonError::InvalidRemoteUrl(_)
            | LagoonError::MissingSelection(_)
            | LagoonError::SshKeyNotFound(_) => ErrorKind::Validation,
            LagoonError::InstanceNotFound(_) => ErrorKind::Lookup,
            LagoonError::SpawnFailed { .. }
            | LagoonError::CommandFailed { .. }
            | LagoonError::OperationRejected { .. } => ErrorKind::Execution,
            LagoonError::UnexpectedResponse { .. } => ErrorKind::Parse,
            LagoonError::HomeNotFound
            | LagoonError::Io(_)
            | LagoonError::Yaml(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn unexpected(
        operation: &str,
        message: impl Into<String>,
        raw: &str,
    ) -> Self {
        LagoonError::UnexpectedResponse {
            operation: operation.to_string(),
            message: message.into(),
            raw: raw.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LagoonError>;
