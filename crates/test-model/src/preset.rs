use recall_model::{CompletionResult, ErrorKind, TokenUsage};
use serde::{Deserialize, Serialize};

/// How a preset reply fails before it succeeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetFailure {
    /// The error kind returned by the failing attempts.
    pub kind: ErrorKind,
    /// Number of failing attempts. `0` means the step always fails.
    pub times: u64,
}

/// The preset reply for one completion step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetReply {
    /// The reply text.
    pub text: String,
    /// Token counts attached to the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    /// If set, the step will fail in the first attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<PresetFailure>,
}

impl PresetReply {
    /// Creates a `PresetReply` with the specified text.
    #[inline]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
            failure: None,
        }
    }

    /// Attaches token counts to the reply.
    #[inline]
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Makes the first `times` attempts fail with `kind`. `0` means the
    /// step will always be a failure.
    #[inline]
    pub fn with_failures(mut self, kind: ErrorKind, times: u64) -> Self {
        self.failure = Some(PresetFailure { kind, times });
        self
    }

    pub(crate) fn to_result(&self) -> CompletionResult {
        CompletionResult {
            text: self.text.clone(),
            usage: self.usage,
        }
    }
}
