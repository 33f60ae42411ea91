use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Who produced a [`Turn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The instructions that steer the model.
    System,
    /// The human side of the conversation.
    User,
    /// The model.
    Assistant,
}

impl Speaker {
    /// Returns the lowercase role name, as used by chat APIs.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::System => "system",
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
        }
    }
}

impl Display for Speaker {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One utterance in a conversation.
///
/// A turn never changes after it has been created.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    /// Creates a turn.
    #[inline]
    pub fn new<S: Into<String>>(speaker: Speaker, text: S) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    /// Creates a system turn.
    #[inline]
    pub fn system<S: Into<String>>(text: S) -> Self {
        Self::new(Speaker::System, text)
    }

    /// Creates a user turn.
    #[inline]
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::new(Speaker::User, text)
    }

    /// Creates an assistant turn.
    #[inline]
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self::new(Speaker::Assistant, text)
    }

    /// Returns who produced this turn.
    #[inline]
    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    /// Returns the text of this turn.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}
