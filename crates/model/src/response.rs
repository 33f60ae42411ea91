use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Token counts reported by the provider for one call.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt: u64,
    /// Tokens in the reply.
    pub completion: u64,
    /// Tokens billed in total.
    pub total: u64,
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt += rhs.prompt;
        self.completion += rhs.completion;
        self.total += rhs.total;
    }
}

/// A complete reply from the completion service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionResult {
    /// The reply text. May be empty if the model produced nothing.
    pub text: String,
    /// Token counts, if the provider reports them.
    pub usage: Option<TokenUsage>,
}

impl CompletionResult {
    /// Creates a result with the reply text and no usage information.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Attaches token counts.
    #[inline]
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Returns `true` if the model produced no usable text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
