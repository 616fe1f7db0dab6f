use std::io;
use std::process::ExitStatus;

/// Error type for pushdeploy operations
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("authentication failed: {0}")]
    Unauthorized(&'static str),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("unsupported event type '{0}'")]
    UnsupportedEvent(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("command `{command}` failed with {status}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },

    #[error("command `{command}` failed to start: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("command `{command}` timed out after {timeout_secs}s")]
    CommandTimeout { command: String, timeout_secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Helper type for Results that use DeployError
pub type Result<T> = std::result::Result<T, DeployError>;
