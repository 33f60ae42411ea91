use std::sync::Arc;

/// A named set of instructions describing a persona or a skill, e.g. an
/// agenda creator or a risk analyzer.
///
/// Profiles are immutable and cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstructionProfile {
    name: Arc<str>,
    instructions: Arc<str>,
}

impl InstructionProfile {
    /// Creates a profile.
    #[inline]
    pub fn new(name: impl Into<Arc<str>>, instructions: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
        }
    }

    /// Returns the name of the profile.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the instruction text sent as the system message.
    #[inline]
    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}

impl Default for InstructionProfile {
    fn default() -> Self {
        Self::new("assistant", "You are a helpful assistant.")
    }
}
