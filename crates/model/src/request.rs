use crate::turn::{Speaker, Turn};

/// A request to be sent to the completion service.
///
/// Requests are built fresh for every call and are never stored.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompletionRequest {
    /// The system instructions for this call.
    pub instruction: String,
    /// Earlier user and assistant turns, oldest first.
    ///
    /// This never contains a system turn, the instructions travel in
    /// [`instruction`](Self::instruction) instead.
    pub history: Vec<Turn>,
    /// The new user input to respond to.
    pub input: String,
}

impl CompletionRequest {
    /// Iterates over the full message list in the order most chat APIs
    /// expect it: the instructions, the history, then the new input.
    ///
    /// An empty instruction is left out.
    pub fn messages(&self) -> impl Iterator<Item = (Speaker, &str)> {
        let system = Some((Speaker::System, self.instruction.as_str()))
            .filter(|(_, text)| !text.is_empty());
        let history = self.history.iter().map(|t| (t.speaker(), t.text()));
        let input = (Speaker::User, self.input.as_str());
        system
            .into_iter()
            .chain(history)
            .chain(std::iter::once(input))
    }
}
