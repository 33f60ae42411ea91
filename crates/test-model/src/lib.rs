//! A local fake completion service for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use recall_model::{
    CompletionRequest, CompletionResult, CompletionService,
    CompletionServiceError, ErrorKind,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    #[inline]
    pub fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl CompletionServiceError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

type Responder =
    Arc<dyn Fn(&CompletionRequest) -> Result<CompletionResult, Error> + Send + Sync>;

#[derive(Clone)]
enum ScriptStep {
    Reply(PresetReply),
    Fail(ErrorKind),
    Respond(Responder),
}

#[derive(Default)]
struct ScriptState {
    steps: Vec<ScriptStep>,
    cursor: usize,
    failed_attempts: u64,
    requests: Vec<CompletionRequest>,
}

/// A local fake completion service for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should respond to each call. Steps are consumed in order, one per
/// successful call. A step with preset failures fails that many times
/// before it succeeds and the script moves on. If there are no enough
/// steps in the script, an error will be returned.
///
/// Every request is recorded, so tests can check what context the model
/// was given. Clones share the same script and records.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestCompletionService {
    state: Arc<Mutex<ScriptState>>,
    delay: Option<Duration>,
}

impl TestCompletionService {
    /// Appends a step that replies with a preset.
    #[inline]
    pub fn add_reply_step(&mut self, preset: PresetReply) {
        self.lock().steps.push(ScriptStep::Reply(preset));
    }

    /// Appends a step that fails with the given kind. The next call moves
    /// on to the following step.
    #[inline]
    pub fn add_failure_step(&mut self, kind: ErrorKind) {
        self.lock().steps.push(ScriptStep::Fail(kind));
    }

    /// Appends a step whose reply is computed from the request.
    #[inline]
    pub fn add_responder_step<F>(&mut self, responder: F)
    where
        F: Fn(&CompletionRequest) -> Result<CompletionResult, Error>
            + Send
            + Sync
            + 'static,
    {
        self.lock()
            .steps
            .push(ScriptStep::Respond(Arc::new(responder)));
    }

    /// Delays every reply. Defaults to 1ms.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns a copy of every request received so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().requests.clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_result(&self, req: &CompletionRequest) -> Result<CompletionResult, Error> {
        let mut state = self.lock();
        state.requests.push(req.clone());

        let Some(step) = state.steps.get(state.cursor).cloned() else {
            return Err(Error::new("no enough steps", ErrorKind::Other));
        };
        match step {
            ScriptStep::Reply(preset) => {
                if let Some(failure) = preset.failure {
                    if failure.times == 0 || state.failed_attempts < failure.times {
                        state.failed_attempts += 1;
                        return Err(Error::new("preset failure", failure.kind));
                    }
                }
                state.cursor += 1;
                state.failed_attempts = 0;
                Ok(preset.to_result())
            }
            ScriptStep::Fail(kind) => {
                state.cursor += 1;
                Err(Error::new("scripted failure", kind))
            }
            ScriptStep::Respond(responder) => {
                state.cursor += 1;
                // The responder may be slow, don't hold the lock.
                drop(state);
                responder(req)
            }
        }
    }
}

impl CompletionService for TestCompletionService {
    type Error = crate::Error;

    fn complete(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResult, Self::Error>> + Send + 'static
    {
        let result = self.next_result(req);
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        async move {
            sleep(delay).await;
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use recall_model::{TokenUsage, Turn};

    use super::*;

    fn request(input: &str) -> CompletionRequest {
        CompletionRequest {
            instruction: "You are concise.".to_owned(),
            history: vec![],
            input: input.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_scripted_replies() {
        let mut service = TestCompletionService::default();
        service.add_reply_step(PresetReply::with_text("Hello!").with_usage(
            TokenUsage {
                prompt: 3,
                completion: 1,
                total: 4,
            },
        ));
        service.add_responder_step(|req| {
            Ok(CompletionResult::with_text(format!(
                "You told me {} things",
                req.history.len()
            )))
        });

        let resp = service.complete(&request("Hi")).await.unwrap();
        assert_eq!(resp.text, "Hello!");
        assert_eq!(resp.usage.unwrap().total, 4);

        let mut req = request("How many?");
        req.history = vec![Turn::user("Hi"), Turn::assistant("Hello!")];
        let resp = service.complete(&req).await.unwrap();
        assert_eq!(resp.text, "You told me 2 things");

        let err = service.complete(&request("More")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(service.request_count(), 3);
        assert_eq!(service.requests()[1], req);
    }

    #[tokio::test]
    async fn test_preset_failures() {
        let mut service = TestCompletionService::default();
        service.add_reply_step(
            PresetReply::with_text("Finally").with_failures(ErrorKind::RateLimited, 2),
        );

        for _ in 0..2 {
            let err = service.complete(&request("Hi")).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::RateLimited);
        }
        let resp = service.complete(&request("Hi")).await.unwrap();
        assert_eq!(resp.text, "Finally");
    }

    #[tokio::test]
    async fn test_failure_step_is_consumed() {
        let mut service = TestCompletionService::default();
        service.add_failure_step(ErrorKind::TransientNetwork);
        service.add_reply_step(PresetReply::with_text("Back online"));

        let err = service.complete(&request("Hi")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransientNetwork);
        let resp = service.complete(&request("Hi")).await.unwrap();
        assert_eq!(resp.text, "Back online");
    }

    #[tokio::test]
    async fn test_permanent_failure() {
        let mut service = TestCompletionService::default();
        service.add_reply_step(
            PresetReply::with_text("never").with_failures(ErrorKind::Authentication, 0),
        );
        for _ in 0..5 {
            let err = service.complete(&request("Hi")).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Authentication);
        }
    }
}
