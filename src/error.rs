use reqwest::header::HeaderMap;

/// Error type returned by this crate.
///
/// Terminal variants carry `request` (`"{METHOD} {path}: {payload}"`) and
/// `at_ms`, the epoch milliseconds at which the failure was observed.
#[derive(Debug, thiserror::Error)]
pub enum AbfinanceError {
    /// An authenticated endpoint was called on a client without credentials.
    #[error("authenticated endpoints require keys")]
    AuthenticationUnavailable,
    /// Timeout, TLS or connection failure from `reqwest`.
    #[error("transport error on {request}: {source}")]
    Network {
        request: String,
        #[source]
        source: reqwest::Error,
        at_ms: u64,
    },
    /// The response body could not be decoded as JSON.
    #[error("{message} (status {status}) on {request}")]
    DecodeConflict {
        request: String,
        status: u16,
        message: String,
        at_ms: u64,
    },
    /// Non-200 HTTP status. Never retried.
    #[error("{message} (status {status}) on {request}")]
    Http {
        request: String,
        status: u16,
        message: String,
        headers: HeaderMap,
        at_ms: u64,
    },
    /// Non-zero `retCode` that is neither retryable nor ignorable.
    #[error("{message} (ErrCode: {code}) on {request}")]
    InvalidRequest {
        request: String,
        code: i64,
        message: String,
        headers: HeaderMap,
        at_ms: u64,
    },
    /// Every attempt was consumed without a successful response.
    #[error("{message} (status {status}) on {request}")]
    RetriesExhausted {
        request: String,
        status: u16,
        message: String,
        at_ms: u64,
    },
    /// The secret could not be used to produce a signature.
    #[error("signing error: {0}")]
    Signing(String),
    /// A parameter value cannot be represented on the wire.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A required parameter of the endpoint was not supplied.
    #[error("missing required parameter '{key}' for {path}")]
    MissingParameter { path: &'static str, key: &'static str },
    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AbfinanceError {
    /// HTTP status or exchange return code attached to the failure, if any.
    pub fn status_code(&self) -> Option<i64> {
        match self {
            Self::DecodeConflict { status, .. }
            | Self::Http { status, .. }
            | Self::RetriesExhausted { status, .. } => Some(i64::from(*status)),
            Self::InvalidRequest { code, .. } => Some(*code),
            Self::Network { source, .. } => source.status().map(|s| i64::from(s.as_u16())),
            _ => None,
        }
    }

    /// Response headers of the failed request, when a response was received.
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Self::Http { headers, .. } | Self::InvalidRequest { headers, .. } => Some(headers),
            _ => None,
        }
    }
}
