mod builder;

use std::collections::HashSet;
use std::io::{self, Write};

use recall_model::{
    CompletionRequest, CompletionResult, CompletionService, ErrorKind, Speaker,
    TokenUsage, Turn,
};

use crate::Error;
use crate::completion_client::CompletionClient;
use crate::conversation::{ContextWindow, Conversation};
use crate::profile::InstructionProfile;
use crate::router::SkillRouter;
pub use builder::AgentBuilder;

/// The reply recorded when the model comes back with nothing to say.
pub const DEFAULT_REFUSAL_PLACEHOLDER: &str =
    "(The model returned no content. Try rephrasing or a simpler question.)";

/// A conversational agent, which owns the transcript of one session and
/// mediates every exchange with the completion service.
///
/// Every call resends the whole conversation (or, for routed skills, the
/// configured window of it), so the model can resolve references to
/// earlier messages.
///
/// The agent is driven through `&mut self`, so there can only be one call
/// in flight per agent. Independent agents share nothing and can be used
/// concurrently.
pub struct Agent {
    client: CompletionClient,
    profile: InstructionProfile,
    router: SkillRouter,
    context_window: ContextWindow,
    refusal_placeholder: String,
    conversation: Conversation,
    skills_used: Vec<String>,
    usage: TokenUsage,
}

/// A snapshot of what an [`Agent`] has done so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentStats {
    /// Name of the agent's default profile.
    pub label: String,
    /// Turns in the transcript, not counting the system turn.
    pub turns: usize,
    /// User turns in the transcript.
    pub questions: usize,
    /// Labels of the routed skills that produced a reply, in order.
    pub skills_used: Vec<String>,
    /// Number of distinct labels in `skills_used`.
    pub unique_skills: usize,
    /// Token usage accumulated over all successful calls.
    pub usage: TokenUsage,
}

impl Agent {
    /// Creates an agent with the given service and default profile, and
    /// no skill routing.
    #[inline]
    pub fn new<S: CompletionService + 'static>(
        service: S,
        profile: InstructionProfile,
    ) -> Self {
        AgentBuilder::with_completion_service(service)
            .with_profile(profile)
            .build()
    }

    /// Sends a user message and returns the model's reply.
    ///
    /// The message is rejected with [`Error::InvalidInput`] if it's blank,
    /// in which case nothing is recorded. Otherwise it is appended to the
    /// transcript before the service is called, and stays there even if the
    /// call fails. Use [`retry`](Self::retry) to ask again for a reply
    /// without repeating the message.
    ///
    /// No retry happens here. Check [`Error::is_retryable`] to tell
    /// transient failures from permanent ones.
    pub async fn send(&mut self, user_text: &str) -> Result<String, Error> {
        if user_text.trim().is_empty() {
            debug!("rejected a blank input");
            return Err(Error::InvalidInput);
        }
        self.conversation.push(Turn::user(user_text));
        self.complete_pending().await
    }

    /// Asks the service again for a reply to the last, unanswered user
    /// message.
    ///
    /// Fails with [`Error::NothingToRetry`] if the last turn already has a
    /// reply.
    pub async fn retry(&mut self) -> Result<String, Error> {
        if self.conversation.pending_input().is_none() {
            return Err(Error::NothingToRetry);
        }
        self.complete_pending().await
    }

    /// Sends a one-off request that is not part of the conversation.
    ///
    /// The transcript, routing and skill records are left alone, only the
    /// token usage is accumulated. An empty reply is returned as is.
    pub async fn complete_detached(
        &mut self,
        request: CompletionRequest,
    ) -> Result<CompletionResult, Error> {
        let result = self
            .client
            .complete(request)
            .await
            .map_err(Error::CompletionFailed)?;
        if let Some(usage) = result.usage {
            self.usage += usage;
        }
        Ok(result)
    }

    async fn complete_pending(&mut self) -> Result<String, Error> {
        let Some((request, skill)) = self.build_request() else {
            return Err(Error::NothingToRetry);
        };

        let result = self.client.complete(request).await;
        let reply = match result {
            Ok(result) => {
                if let Some(usage) = result.usage {
                    self.usage += usage;
                }
                if result.is_empty() {
                    warn!("got an empty reply, recording the placeholder");
                    self.refusal_placeholder.clone()
                } else {
                    result.text
                }
            }
            Err(err) if err.kind() == ErrorKind::Refused => {
                warn!("the model refused ({err}), recording the placeholder");
                self.refusal_placeholder.clone()
            }
            Err(err) => return Err(Error::CompletionFailed(err)),
        };

        self.conversation.push(Turn::assistant(reply.clone()));
        if let Some(label) = skill {
            self.skills_used.push(label);
        }
        Ok(reply)
    }

    /// Builds the request for the pending input, along with the label of
    /// the routed skill if any.
    fn build_request(&self) -> Option<(CompletionRequest, Option<String>)> {
        let input = self.conversation.pending_input()?;
        let prior = self.conversation.prior_turns();

        let built = match self.router.route_skill(input) {
            Some(skill) => {
                debug!("routed to skill `{}`", skill.label());
                let request = CompletionRequest {
                    instruction: skill.profile().instructions().to_owned(),
                    history: self.context_window.apply(prior).to_vec(),
                    input: input.to_owned(),
                };
                (request, Some(skill.label().to_owned()))
            }
            None => {
                let request = CompletionRequest {
                    instruction: self.profile.instructions().to_owned(),
                    history: prior.to_vec(),
                    input: input.to_owned(),
                };
                (request, None)
            }
        };
        Some(built)
    }

    /// Returns the number of turns, not counting the system turn.
    #[inline]
    pub fn turn_count(&self) -> usize {
        self.conversation.len()
    }

    /// Returns the number of user turns.
    pub fn question_count(&self) -> usize {
        self.conversation
            .turns()
            .filter(|t| t.speaker() == Speaker::User)
            .count()
    }

    /// Returns the conversation held by this agent.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the name of the default profile.
    #[inline]
    pub fn label(&self) -> &str {
        self.profile.name()
    }

    /// Returns the default profile.
    #[inline]
    pub fn profile(&self) -> &InstructionProfile {
        &self.profile
    }

    /// Returns the skill router. It's empty if routing is not used.
    #[inline]
    pub fn router(&self) -> &SkillRouter {
        &self.router
    }

    /// Returns the labels of the routed skills that produced a reply.
    #[inline]
    pub fn skills_used(&self) -> &[String] {
        &self.skills_used
    }

    /// Returns the token usage accumulated over all successful calls.
    #[inline]
    pub fn usage(&self) -> TokenUsage {
        self.usage
    }

    /// Takes a snapshot of the statistics.
    pub fn stats(&self) -> AgentStats {
        let unique_skills = self
            .skills_used
            .iter()
            .collect::<HashSet<_>>()
            .len();
        AgentStats {
            label: self.label().to_owned(),
            turns: self.turn_count(),
            questions: self.question_count(),
            skills_used: self.skills_used.clone(),
            unique_skills,
            usage: self.usage,
        }
    }

    /// Writes the transcript to `sink`. See [`Conversation::export`].
    #[inline]
    pub fn export<W: Write>(&self, sink: W) -> io::Result<()> {
        self.conversation.export(sink)
    }
}

impl Agent {
    fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            client,
            profile,
            router,
            context_window,
            refusal_placeholder,
        } = builder;

        let conversation =
            Conversation::with_instructions(profile.instructions());
        Self {
            client,
            profile,
            router,
            context_window,
            refusal_placeholder: refusal_placeholder
                .unwrap_or_else(|| DEFAULT_REFUSAL_PLACEHOLDER.to_owned()),
            conversation,
            skills_used: Default::default(),
            usage: Default::default(),
        }
    }
}
