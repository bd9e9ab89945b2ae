use thiserror::Error;
use tontine_core::Action;
use tontine_types::TontineError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error(transparent)]
    Tontine(#[from] TontineError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus { status: u16, url: String, body: String },

    #[error("Resource {resource} not found at {address}")]
    ResourceNotFound { address: String, resource: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("{action} is not available: {reason}")]
    ActionDisabled { action: Action, reason: String },

    #[error("{action} failed: {cause}")]
    TransactionFailed { action: String, cause: String },

    #[error("Transaction {hash} failed: {vm_status}")]
    VmFailure { hash: String, vm_status: String },
}

impl SdkError {
    /// Errors that are worth retrying by re-issuing the same fetch
    pub fn is_transient(&self) -> bool {
        matches!(self, SdkError::Network(_))
            || matches!(self, SdkError::HttpStatus { status, .. } if *status >= 500 || *status == 429)
    }
}

impl From<ureq::Error> for SdkError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let url = response.get_url().to_string();
                let body = response.into_string().unwrap_or_default();
                SdkError::HttpStatus { status, url, body }
            }
            ureq::Error::Transport(transport) => SdkError::Network(transport.to_string()),
        }
    }
}

/// ureq reports a body that fails to decode as `InvalidData`; everything
/// else is a failed read.
impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::InvalidData => SdkError::Serialization(err.to_string()),
            _ => SdkError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}

impl From<tokio::task::JoinError> for SdkError {
    fn from(err: tokio::task::JoinError) -> Self {
        SdkError::Network(format!("request task failed: {}", err))
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_undecodable_body_is_not_transient() {
        let err: SdkError = io::Error::new(io::ErrorKind::InvalidData, "expected value").into();
        assert!(matches!(err, SdkError::Serialization(_)));
        assert!(!err.is_transient());

        let err: SdkError = io::Error::new(io::ErrorKind::ConnectionReset, "reset").into();
        assert!(err.is_transient());
    }

    #[test]
    fn test_server_errors_are_transient() {
        let status = |status| SdkError::HttpStatus {
            status,
            url: "http://node/v1/view".to_string(),
            body: String::new(),
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
    }
}
