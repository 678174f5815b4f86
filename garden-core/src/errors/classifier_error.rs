/// Failures talking to, or interpreting, the external completion service.
///
/// None of these are retried within a single classification call; every
/// variant degrades to the heuristic verdict.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("completion credential is not configured")]
    MissingCredential,

    #[error("authentication rejected ({status})")]
    AuthRejected { status: u16 },

    #[error("model not found: {model}")]
    ModelNotFound { model: String },

    #[error("completion service returned {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("completion request timed out")]
    Timeout,

    #[error("transport failure: {reason}")]
    Transport { reason: String },

    #[error("malformed completion: {reason}")]
    MalformedResponse { reason: String },
}

/// Coarse grouping used for logging and degradation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Config,
    Auth,
    NotFound,
    Transient,
    Parse,
}

impl ClassifierError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingCredential => FailureKind::Config,
            Self::AuthRejected { .. } => FailureKind::Auth,
            Self::ModelNotFound { .. } => FailureKind::NotFound,
            Self::HttpStatus { .. } | Self::Timeout | Self::Transport { .. } => {
                FailureKind::Transient
            }
            Self::MalformedResponse { .. } => FailureKind::Parse,
        }
    }

    /// Whether the same call may be retried. Always false: a failed call
    /// falls back instead.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Map an HTTP status from the completion service to an error.
    pub fn from_status(status: u16, model: &str, body: String) -> Self {
        match status {
            401 | 403 => Self::AuthRejected { status },
            404 => Self::ModelNotFound {
                model: model.to_string(),
            },
            _ => Self::HttpStatus { status, body },
        }
    }
}
