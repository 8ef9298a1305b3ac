//! Error taxonomy for the YouTube Data API client.
//!
//! Every fallible operation in this crate returns [`Error`]. The variants are grouped into a
//! small number of [`ErrorKind`]s so callers can react to a class of failure (say, "any
//! authorization problem") without matching on every concrete variant.

use http::StatusCode;
use std::fmt;

/// Result type used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by the YouTube client.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The per-request deadline expired before the API answered.
    #[error("timeout occurred while connecting to the YouTube API")]
    Timeout,

    /// The request could not be sent or its body could not be read.
    #[error("error occurred while communicating with the YouTube API")]
    Connection(#[source] reqwest::Error),

    /// The token endpoint rejected the refresh token (HTTP 400).
    #[error("invalid refresh token: {0}")]
    InvalidRefreshToken(String),

    /// The credentials in use are not (or no longer) valid (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The user credential does not carry a scope the operation requires.
    #[error("missing scope: {0}")]
    MissingScope(String),

    /// App authentication was requested but no app secret was configured.
    #[error("an app secret is required for app authentication")]
    MissingAppSecret,

    /// Any other failure while obtaining or refreshing credentials.
    #[error("authorization failed: {0}")]
    Authorization(String),

    /// The requested resource does not exist (HTTP 404).
    #[error("requested resource was not found")]
    ResourceNotFound,

    /// The caller is not allowed to access the resource (HTTP 403).
    #[error("access to the requested resource is forbidden")]
    Forbidden,

    /// The YouTube API itself failed (HTTP 5xx).
    #[error("YouTube backend error (status {0})")]
    Backend(StatusCode),

    /// The API rejected the request as malformed (HTTP 400).
    #[error("bad request{}", .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default())]
    BadRequest {
        /// The `message` the API put in the error body, if any.
        message: Option<String>,
    },

    /// Any other API-level failure, including unexpected success bodies.
    #[error("YouTube API error: {0}")]
    Api(String),

    /// A response body or an item in it did not match the expected schema.
    #[error("failed to decode YouTube API response")]
    Decode(#[source] serde_json::Error),

    /// The caller read an optional part that was not requested or not returned.
    #[error("part `{0}` was not requested or not returned by the API")]
    PartMissing(&'static str),

    /// The caller supplied invalid arguments.
    #[error("invalid argument: {0}")]
    Validation(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Timeouts and transport-level failures.
    Connection,
    /// Bad, invalid or expired credentials, and missing scopes.
    Authorization,
    /// The resource does not exist.
    ResourceNotFound,
    /// The caller may not access the resource.
    Forbidden,
    /// Provider-side failure.
    Backend,
    /// Generic API failures and malformed success responses.
    Api,
    /// An optional resource part was accessed but is absent.
    PartMissing,
    /// Invalid caller-supplied arguments.
    Validation,
}

impl Error {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout | Self::Connection(_) => ErrorKind::Connection,
            Self::InvalidRefreshToken(_)
            | Self::Unauthorized(_)
            | Self::MissingScope(_)
            | Self::MissingAppSecret
            | Self::Authorization(_) => ErrorKind::Authorization,
            Self::ResourceNotFound => ErrorKind::ResourceNotFound,
            Self::Forbidden => ErrorKind::Forbidden,
            Self::Backend(_) => ErrorKind::Backend,
            Self::BadRequest { .. } | Self::Api(_) | Self::Decode(_) => ErrorKind::Api,
            Self::PartMissing(_) => ErrorKind::PartMissing,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection => write!(f, "connection"),
            Self::Authorization => write!(f, "authorization"),
            Self::ResourceNotFound => write!(f, "resource not found"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Backend => write!(f, "backend"),
            Self::Api => write!(f, "api"),
            Self::PartMissing => write!(f, "part missing"),
            Self::Validation => write!(f, "validation"),
        }
    }
}
