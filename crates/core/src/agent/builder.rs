use recall_model::CompletionService;

use super::Agent;
use crate::completion_client::CompletionClient;
use crate::conversation::ContextWindow;
use crate::profile::InstructionProfile;
use crate::router::SkillRouter;

/// [`Agent`] builder.
pub struct AgentBuilder {
    pub(crate) client: CompletionClient,
    pub(crate) profile: InstructionProfile,
    pub(crate) router: SkillRouter,
    pub(crate) context_window: ContextWindow,
    pub(crate) refusal_placeholder: Option<String>,
}

impl AgentBuilder {
    /// Creates a new builder with the specified completion service.
    ///
    /// The service is owned by the agent for its whole lifetime.
    #[inline]
    pub fn with_completion_service<S: CompletionService + 'static>(
        service: S,
    ) -> Self {
        Self {
            client: CompletionClient::new(service),
            profile: InstructionProfile::default(),
            router: SkillRouter::default(),
            context_window: ContextWindow::default(),
            refusal_placeholder: None,
        }
    }

    /// Sets the default profile, used whenever no skill is routed.
    #[inline]
    pub fn with_profile(mut self, profile: InstructionProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Enables skill routing with the given router.
    #[inline]
    pub fn with_router(mut self, router: SkillRouter) -> Self {
        self.router = router;
        self
    }

    /// Sets how much of the earlier conversation routed skills get.
    /// Defaults to [`ContextWindow::Full`].
    #[inline]
    pub fn with_context_window(mut self, window: ContextWindow) -> Self {
        self.context_window = window;
        self
    }

    /// Sets the reply recorded when the model returns no content.
    #[inline]
    pub fn with_refusal_placeholder<S: Into<String>>(
        mut self,
        placeholder: S,
    ) -> Self {
        self.refusal_placeholder = Some(placeholder.into());
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent::from_builder(self)
    }
}
