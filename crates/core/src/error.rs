use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use recall_model::{CompletionServiceError, ErrorKind};

/// Errors returned by the agent and the skill router.
#[derive(Debug)]
pub enum Error {
    /// The user input is empty or contains only whitespace. Nothing was
    /// sent and the transcript is unchanged.
    InvalidInput,
    /// A skill with this label has already been registered.
    DuplicateSkill(String),
    /// There is no unanswered user turn to retry.
    NothingToRetry,
    /// The completion service failed. The user turn stays in the
    /// transcript, no assistant turn was added.
    CompletionFailed(Box<dyn CompletionServiceError>),
}

impl Error {
    /// Returns the category of the underlying service failure, if any.
    #[inline]
    pub fn cause_kind(&self) -> Option<ErrorKind> {
        match self {
            Error::CompletionFailed(err) => Some(err.kind()),
            _ => None,
        }
    }

    /// Returns `true` if the caller may retry the same call later.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        self.cause_kind().is_some_and(|kind| kind.is_retryable())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidInput => write!(f, "Input is empty"),
            Error::DuplicateSkill(label) => {
                write!(f, "Skill `{label}` is already registered")
            }
            Error::NothingToRetry => write!(f, "No unanswered input to retry"),
            Error::CompletionFailed(err) => {
                write!(f, "Completion failed: {} ({err})", err.kind())
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::CompletionFailed(err) => {
                let err: &(dyn StdError + 'static) = &**err;
                Some(err)
            }
            _ => None,
        }
    }
}
