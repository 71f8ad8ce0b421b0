use thiserror::Error;

/// Substring the login endpoint puts in a 400 body when it rejects our
/// protocol version. Matched case-sensitively, as the service returns it.
const VERSION_OUT_OF_DATE_MARKER: &str = "version out of date";

/// Failure below the API contract: a non-2xx response or no response at all.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Non-2xx response, carrying the raw body text.
    #[error("request failed ({status}): {body}")]
    Status { status: u16, body: String },

    /// Connection-level failure (DNS, TLS, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// A session-required call was made while logged out. Detected locally;
    /// no request is sent.
    #[error("not logged in")]
    NotLoggedIn,

    /// The service already holds an active session for these credentials
    /// (HTTP 409 from the login endpoint).
    #[error("already logged in")]
    AlreadyLoggedIn,

    /// The service rejected our protocol version (HTTP 400 with a
    /// "version out of date" body).
    #[error("client version out of date")]
    VersionOutOfDate,

    /// Any other login rejection, carrying the unmodified response body.
    #[error("login failed ({status}): {message}")]
    LoginFailed { message: String, status: u16 },

    /// Unclassified failure on a non-login endpoint, or a network-level
    /// failure on any endpoint.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx response whose body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Classify a failed login call.
    ///
    /// The service overloads HTTP status codes as business signals (409
    /// means "a session is already active", not a REST conflict), so the
    /// login path gets its own mapping. Only login has documented,
    /// recoverable failure modes; every other endpoint propagates the raw
    /// transport error.
    pub fn classify_login(err: TransportError) -> Self {
        match err {
            TransportError::Status { status: 409, .. } => ApiError::AlreadyLoggedIn,
            TransportError::Status { status: 400, ref body }
                if body.contains(VERSION_OUT_OF_DATE_MARKER) =>
            {
                ApiError::VersionOutOfDate
            }
            TransportError::Status { status, body } => ApiError::LoginFailed {
                message: body,
                status,
            },
            network => ApiError::Transport(network),
        }
    }

    /// HTTP status that produced this error, where one exists.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::AlreadyLoggedIn => Some(409),
            ApiError::VersionOutOfDate => Some(400),
            ApiError::LoginFailed { status, .. } => Some(*status),
            ApiError::Transport(TransportError::Status { status, .. }) => Some(*status),
            ApiError::NotLoggedIn
            | ApiError::Transport(TransportError::Network(_))
            | ApiError::InvalidResponse(_) => None,
        }
    }
}
