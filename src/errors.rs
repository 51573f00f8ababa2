use thiserror::Error;

/// Failures surfaced by the admin client.
///
/// Every variant is returned to the immediate caller as-is: nothing in this
/// crate retries, recovers or downgrades an error.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Non-2xx response with no more specific meaning.
    #[error("remote rejected request: status={status}, body={body}")]
    RemoteRejected { status: u16, body: String },

    /// The remote reports the entity does not exist (HTTP 404).
    #[error("not found: {body}")]
    NotFound { body: String },

    /// The response body does not match the expected wrapper shape.
    #[error("malformed envelope ({envelope}): {reason}")]
    MalformedEnvelope { envelope: String, reason: String },

    /// The remote broke its own multiplicity contract for a response.
    #[error("remote invariant violated: expected exactly one element under '{key}', found {found}")]
    RemoteInvariantViolation { key: &'static str, found: usize },

    /// A link target kind outside {group, role, datastore}.
    #[error("unsupported target kind: '{0}'")]
    UnsupportedTargetKind(String),

    /// No response was received (connect failure, timeout, broken body).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to encode request payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// Caller input rejected before any request was made.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AdminError {
    pub fn malformed(envelope: impl ToString, reason: impl Into<String>) -> Self {
        AdminError::MalformedEnvelope {
            envelope: envelope.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for the failure kind.
    pub fn code(&self) -> &'static str {
        match self {
            AdminError::RemoteRejected { .. } => "remote_rejected",
            AdminError::NotFound { .. } => "not_found",
            AdminError::MalformedEnvelope { .. } => "malformed_envelope",
            AdminError::RemoteInvariantViolation { .. } => "remote_invariant_violation",
            AdminError::UnsupportedTargetKind(_) => "unsupported_target_kind",
            AdminError::Transport(_) => "transport_error",
            AdminError::Encode(_) => "encode_error",
            AdminError::InvalidRequest(_) => "invalid_request",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AdminError::NotFound { .. })
    }

    /// Whether a retry by the caller could plausibly succeed.
    ///
    /// An empty multiplicity response may be a lagging remote; two or more
    /// elements means the remote is inconsistent and retrying will not help.
    pub fn is_transient(&self) -> bool {
        match self {
            AdminError::Transport(_) => true,
            AdminError::RemoteInvariantViolation { found, .. } => *found == 0,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AdminError {
    fn from(e: reqwest::Error) -> Self {
        AdminError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;
