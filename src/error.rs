use thiserror::Error;

/// Failure of a single call to the upstream data gateway.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Transport failure, timeout or non-success status.
    #[error("upstream unavailable ({endpoint}): {reason}")]
    Unavailable { endpoint: String, reason: String },

    /// The body arrived but lacks fields the caller cannot default.
    #[error("malformed upstream response ({endpoint}): {reason}")]
    Malformed { endpoint: String, reason: String },
}

impl GatewayError {
    pub fn unavailable(endpoint: &str, reason: impl ToString) -> Self {
        GatewayError::Unavailable {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(endpoint: &str, reason: impl ToString) -> Self {
        GatewayError::Malformed {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            GatewayError::Unavailable { endpoint, .. } | GatewayError::Malformed { endpoint, .. } => {
                endpoint
            }
        }
    }
}

/// Failure to turn a team name into a resolved record.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("team not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ResolveError {
    /// Stable machine-readable tag used in batch error entries.
    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::NotFound(_) => "not_found",
            ResolveError::Gateway(GatewayError::Unavailable { .. }) => "upstream_unavailable",
            ResolveError::Gateway(GatewayError::Malformed { .. }) => "malformed_upstream_response",
        }
    }
}
