//! Conversation-related types.

use std::io::{self, Write};
use std::num::NonZeroUsize;

use recall_model::{Speaker, Turn};

/// Represents a conversation, i.e. the transcript of one session.
///
/// The conversation is append-only. The optional system turn is always the
/// first one, and it is never counted or exported.
#[derive(Clone, Default, Debug)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Creates a conversation seeded with the system instructions.
    pub(crate) fn with_instructions(instructions: &str) -> Self {
        Self {
            turns: vec![Turn::system(instructions)],
        }
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        debug_assert_ne!(turn.speaker(), Speaker::System);
        self.turns.push(turn);
    }

    /// Returns the system instructions this conversation was seeded with.
    #[inline]
    pub fn instructions(&self) -> Option<&str> {
        self.turns
            .first()
            .filter(|t| t.speaker() == Speaker::System)
            .map(Turn::text)
    }

    /// Iterates over the user and assistant turns, oldest first.
    #[inline]
    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.exchanged().iter()
    }

    /// Returns the number of turns, not counting the system turn.
    #[inline]
    pub fn len(&self) -> usize {
        self.exchanged().len()
    }

    /// Returns `true` if nothing has been exchanged yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the last user input if it has not been answered yet.
    pub fn pending_input(&self) -> Option<&str> {
        self.turns
            .last()
            .filter(|t| t.speaker() == Speaker::User)
            .map(Turn::text)
    }

    /// Returns the exchanged turns that come before the pending input.
    pub(crate) fn prior_turns(&self) -> &[Turn] {
        let exchanged = self.exchanged();
        match self.pending_input() {
            Some(_) => &exchanged[..exchanged.len() - 1],
            None => exchanged,
        }
    }

    /// Writes every user and assistant turn to `sink`, in order.
    ///
    /// Each turn becomes a block of `[SPEAKER]`, the text, and a blank
    /// line. Exporting doesn't change the conversation, so exporting twice
    /// produces identical output.
    pub fn export<W: Write>(&self, mut sink: W) -> io::Result<()> {
        for turn in self.turns() {
            let speaker = turn.speaker().as_str().to_uppercase();
            write!(sink, "[{speaker}]\n{}\n\n", turn.text())?;
        }
        sink.flush()
    }

    fn exchanged(&self) -> &[Turn] {
        match self.turns.first() {
            Some(t) if t.speaker() == Speaker::System => &self.turns[1..],
            _ => &self.turns,
        }
    }
}

/// How much of the earlier conversation a routed skill gets to see.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContextWindow {
    /// Every earlier turn.
    #[default]
    Full,
    /// Only the most recent turns.
    Recent(NonZeroUsize),
}

impl ContextWindow {
    /// Returns the tail of `turns` that falls inside the window.
    pub fn apply<'a>(&self, turns: &'a [Turn]) -> &'a [Turn] {
        match self {
            ContextWindow::Full => turns,
            ContextWindow::Recent(n) => {
                let start = turns.len().saturating_sub(n.get());
                &turns[start..]
            }
        }
    }
}
