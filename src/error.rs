//! Error types for generative media operations

use thiserror::Error;

/// Result type alias for generative media operations
pub type Result<T> = std::result::Result<T, GenMediaError>;

/// Cause classification for remote-call failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// The remote side rejected the caller's credentials or permissions
    AccessDenied,
    /// The addressed resource does not exist
    NotFound,
    /// The response body could not be parsed into the expected shape
    MalformedResponse,
    /// The remote side is throttling (quota or rate limit)
    Throttled,
    /// Any other transport-level failure (DNS, TLS, connection reset, 5xx)
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AccessDenied => "access denied",
            Self::NotFound => "not found",
            Self::MalformedResponse => "malformed response",
            Self::Throttled => "throttled",
            Self::Other => "transport failure",
        };
        f.write_str(name)
    }
}

/// Comprehensive error types for generative media operations
#[derive(Error, Debug)]
pub enum GenMediaError {
    /// Storage locator string could not be parsed into scheme/container/key
    #[error("Invalid storage locator: {0}")]
    InvalidLocator(String),

    /// Transport-encoded payload was not valid base64
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Remote-call failure, classified by cause
    #[error("Transport error ({kind}): {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// The remote model reported a semantic failure (e.g. content policy)
    #[error("Generation error: {0}")]
    Generation(String),

    /// The response carried no output payload
    #[error("The model returned an empty result")]
    EmptyResult,

    /// Asynchronous job submission failed
    #[error("Job submission failed: {0}")]
    Submission(String),

    /// A status poll for an asynchronous job failed
    #[error("Job status poll failed: {0}")]
    Poll(String),

    /// The polling deadline elapsed before the job reached a terminal state
    #[error("Job did not finish within {waited_secs}s; the job may still complete remotely")]
    DeadlineExceeded { waited_secs: u64 },

    /// Storage object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage access was denied
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Any other storage transfer failure
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image format or processing errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),
}

impl GenMediaError {
    /// Create a new invalid locator error
    pub fn invalid_locator<S: Into<String>>(msg: S) -> Self {
        Self::InvalidLocator(msg.into())
    }

    /// Create a new malformed payload error
    pub fn malformed_payload<S: Into<String>>(msg: S) -> Self {
        Self::MalformedPayload(msg.into())
    }

    /// Create a new transport error with cause classification
    pub fn transport<S: Into<String>>(kind: TransportErrorKind, msg: S) -> Self {
        Self::Transport {
            kind,
            message: msg.into(),
        }
    }

    /// Create a new generation error carrying the remote model's detail
    pub fn generation<S: Into<String>>(msg: S) -> Self {
        Self::Generation(msg.into())
    }

    /// Create a new submission error
    pub fn submission<S: Into<String>>(msg: S) -> Self {
        Self::Submission(msg.into())
    }

    /// Create a new poll error
    pub fn poll<S: Into<String>>(msg: S) -> Self {
        Self::Poll(msg.into())
    }

    /// Create a new transfer error
    pub fn transfer<S: Into<String>>(msg: S) -> Self {
        Self::Transfer(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Classify an HTTP status code into a transport error for `url`
    pub fn from_http_status(status: u16, url: &str, body_hint: &str) -> Self {
        let kind = match status {
            401 | 403 => TransportErrorKind::AccessDenied,
            404 => TransportErrorKind::NotFound,
            429 => TransportErrorKind::Throttled,
            _ => TransportErrorKind::Other,
        };
        Self::transport(kind, format!("HTTP {status} from {url}: {body_hint}"))
    }

    /// Whether this error represents an expected business outcome rather
    /// than a program defect (used by the CLI to pick the message style)
    pub fn is_expected_outcome(&self) -> bool {
        matches!(
            self,
            Self::Generation(_) | Self::EmptyResult | Self::DeadlineExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = GenMediaError::invalid_locator("no scheme");
        assert!(matches!(err, GenMediaError::InvalidLocator(_)));

        let err = GenMediaError::generation("content policy");
        assert!(matches!(err, GenMediaError::Generation(_)));
    }

    #[test]
    fn test_error_display() {
        let err = GenMediaError::invalid_locator("ftp://x/y");
        assert_eq!(err.to_string(), "Invalid storage locator: ftp://x/y");

        let err = GenMediaError::transport(TransportErrorKind::Throttled, "slow down");
        assert_eq!(err.to_string(), "Transport error (throttled): slow down");
    }

    #[test]
    fn test_http_status_classification() {
        let err = GenMediaError::from_http_status(403, "https://x/y", "denied");
        assert!(matches!(
            err,
            GenMediaError::Transport {
                kind: TransportErrorKind::AccessDenied,
                ..
            }
        ));

        let err = GenMediaError::from_http_status(404, "https://x/y", "");
        assert!(matches!(
            err,
            GenMediaError::Transport {
                kind: TransportErrorKind::NotFound,
                ..
            }
        ));

        let err = GenMediaError::from_http_status(429, "https://x/y", "");
        assert!(matches!(
            err,
            GenMediaError::Transport {
                kind: TransportErrorKind::Throttled,
                ..
            }
        ));

        let err = GenMediaError::from_http_status(500, "https://x/y", "boom");
        assert!(matches!(
            err,
            GenMediaError::Transport {
                kind: TransportErrorKind::Other,
                ..
            }
        ));
    }

    #[test]
    fn test_expected_outcomes() {
        assert!(GenMediaError::EmptyResult.is_expected_outcome());
        assert!(GenMediaError::generation("policy").is_expected_outcome());
        assert!(!GenMediaError::poll("reset").is_expected_outcome());
    }
}
