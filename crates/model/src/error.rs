use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// The kind of error that occurred while completing a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The credential was missing, expired or rejected.
    Authentication,
    /// The endpoint or the deployment does not exist.
    EndpointNotFound,
    /// The provider is rate limited, or the quota is exhausted.
    RateLimited,
    /// The model refused to answer, or returned no content.
    Refused,
    /// The connection failed or timed out before a reply arrived.
    TransientNetwork,
    /// Any other errors, e.g. a malformed request or an undecodable body.
    Other,
}

impl ErrorKind {
    /// Returns `true` if sending the same request again later may succeed.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::RateLimited | ErrorKind::TransientNetwork)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Authentication => write!(f, "Authentication failed"),
            ErrorKind::EndpointNotFound => write!(f, "Endpoint not found"),
            ErrorKind::RateLimited => write!(f, "Rate limited"),
            ErrorKind::Refused => write!(f, "Model refused"),
            ErrorKind::TransientNetwork => write!(f, "Network error"),
            ErrorKind::Other => write!(f, "Other error"),
        }
    }
}
