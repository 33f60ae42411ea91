use std::io::{self, Write};
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use recall_core::{
    Agent, AgentBuilder, AgentStats, ContextWindow, Error, InstructionProfile,
    SkillRouter,
};
use recall_model::CompletionService;
use tokio::time::sleep;

use crate::presets;

const DEFAULT_MAX_RETRIES: u32 = 3;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
    max_retries: u32,
    backoff: ExponentialBackoff,
}

impl SessionBuilder {
    /// Creates a session builder with a specified completion service.
    pub fn with_completion_service<S: CompletionService + 'static>(
        service: S,
    ) -> Self {
        let agent_builder = AgentBuilder::with_completion_service(service);
        Self {
            agent_builder,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: ExponentialBackoff {
                initial_interval: Duration::from_millis(500),
                max_interval: Duration::from_secs(8),
                max_elapsed_time: Some(Duration::from_secs(30)),
                ..Default::default()
            },
        }
    }

    /// Sets the default profile of the agent.
    #[inline]
    pub fn with_profile(mut self, profile: InstructionProfile) -> Self {
        self.agent_builder = self.agent_builder.with_profile(profile);
        self
    }

    /// Enables skill routing with the given router.
    #[inline]
    pub fn with_router(mut self, router: SkillRouter) -> Self {
        self.agent_builder = self.agent_builder.with_router(router);
        self
    }

    /// Sets how much of the earlier conversation routed skills get.
    #[inline]
    pub fn with_context_window(mut self, window: ContextWindow) -> Self {
        self.agent_builder = self.agent_builder.with_context_window(window);
        self
    }

    /// Sets the reply recorded when the model returns no content.
    #[inline]
    pub fn with_refusal_placeholder<S: Into<String>>(
        mut self,
        placeholder: S,
    ) -> Self {
        self.agent_builder =
            self.agent_builder.with_refusal_placeholder(placeholder);
        self
    }

    /// Sets how many times a retryable failure is retried. Zero disables
    /// retrying. Defaults to 3.
    #[inline]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff policy between retries.
    #[inline]
    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            agent: self.agent_builder.build(),
            max_retries: self.max_retries,
            backoff: self.backoff,
        }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session holds a fully configured agent, and it is basically a
/// wrapper around [`Agent`] that retries rate limits and network failures
/// with exponential backoff.
pub struct Session {
    agent: Agent,
    max_retries: u32,
    backoff: ExponentialBackoff,
}

impl Session {
    /// Sends a message and waits for the reply.
    ///
    /// Retryable failures are retried without repeating the message in the
    /// transcript. Other failures are returned as is.
    pub async fn send_message(&mut self, message: &str) -> Result<String, Error> {
        let mut result = self.agent.send(message).await;

        self.backoff.reset();
        let mut attempts = 0;
        loop {
            let err = match result {
                Err(err) if err.is_retryable() && attempts < self.max_retries => err,
                result => return result,
            };
            let Some(delay) = self.backoff.next_backoff() else {
                warn!("giving up after {attempts} retries");
                return Err(err);
            };
            attempts += 1;
            warn!("{err}, retrying in {delay:?} ({attempts}/{})", self.max_retries);
            sleep(delay).await;
            result = self.agent.retry().await;
        }
    }

    /// Asks for a closing message about `topic`, based on how many
    /// questions were asked. The transcript is left untouched.
    pub async fn farewell(&mut self, topic: &str) -> Result<String, Error> {
        let request =
            presets::farewell_request(topic, self.agent.question_count());
        let result = self.agent.complete_detached(request).await?;
        Ok(result.text)
    }

    /// Returns the underlying agent.
    #[inline]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Takes a snapshot of the agent's statistics.
    #[inline]
    pub fn stats(&self) -> AgentStats {
        self.agent.stats()
    }

    /// Writes the transcript to `sink`.
    #[inline]
    pub fn export<W: Write>(&self, sink: W) -> io::Result<()> {
        self.agent.export(sink)
    }
}
