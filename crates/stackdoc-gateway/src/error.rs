use thiserror::Error;

/// Convenience alias for gateway call results.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Coarse classification of a `GatewayError`.
pub enum GatewayErrorKind {
    MissingCredentials,
    Authentication,
    Timeout,
    Transport,
    Status,
    Decode,
    ClientBuild,
}

impl GatewayErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::Authentication => "authentication",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
            Self::Status => "status",
            Self::Decode => "decode",
            Self::ClientBuild => "client_build",
        }
    }
}

#[derive(Debug, Error)]
/// Every failure surfaced by the management API client.
pub enum GatewayError {
    #[error("host '{host}' has no credentials: configure an api token or username/password")]
    MissingCredentials { host: String },
    #[error("authentication via {endpoint} failed: {reason}")]
    Authentication { endpoint: String, reason: String },
    #[error("GET {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },
    #[error("GET {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {endpoint} returned status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl GatewayError {
    pub fn kind(&self) -> GatewayErrorKind {
        match self {
            Self::MissingCredentials { .. } => GatewayErrorKind::MissingCredentials,
            Self::Authentication { .. } => GatewayErrorKind::Authentication,
            Self::Timeout { .. } => GatewayErrorKind::Timeout,
            Self::Transport { .. } => GatewayErrorKind::Transport,
            Self::Status { .. } => GatewayErrorKind::Status,
            Self::Decode { .. } => GatewayErrorKind::Decode,
            Self::ClientBuild(_) => GatewayErrorKind::ClientBuild,
        }
    }

    /// API path the failing call targeted, when there was one.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Authentication { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(endpoint.as_str()),
            Self::MissingCredentials { .. } | Self::ClientBuild(_) => None,
        }
    }

    pub fn status(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    pub fn timeout(endpoint: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            endpoint: endpoint.into(),
            timeout_ms,
        }
    }
}
