use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use recall_model::{
    CompletionRequest, CompletionResult, CompletionService,
    CompletionServiceError, ErrorKind, Speaker, TokenUsage, Turn,
};
use tokio::time::sleep;

#[derive(Debug)]
struct EchoServiceError(ErrorKind);

impl Display for EchoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for EchoServiceError {}

impl CompletionServiceError for EchoServiceError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Replies with the input and the number of messages it has seen.
struct EchoService;

impl CompletionService for EchoService {
    type Error = EchoServiceError;

    fn complete(
        &self,
        req: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResult, Self::Error>> + Send + 'static
    {
        let result = if req.input.is_empty() {
            Err(EchoServiceError(ErrorKind::Other))
        } else {
            let seen = req.messages().count() as u64;
            Ok(CompletionResult::with_text(format!("You said {}", req.input))
                .with_usage(TokenUsage {
                    prompt: seen,
                    completion: 1,
                    total: seen + 1,
                }))
        };
        async move {
            sleep(Duration::from_millis(1)).await;
            result
        }
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completion() {
        let service = EchoService;
        let req = CompletionRequest {
            instruction: "Repeat after me.".to_owned(),
            history: vec![Turn::user("Hi"), Turn::assistant("You said Hi")],
            input: "Good morning".to_owned(),
        };
        let resp = service.complete(&req).await.unwrap();
        assert_eq!(resp.text, "You said Good morning");
        assert_eq!(resp.usage.unwrap().total, 5);
        assert_eq!(req.messages().last(), Some((Speaker::User, "Good morning")));
    }

    #[tokio::test]
    async fn test_error() {
        let service = EchoService;
        let req = CompletionRequest {
            instruction: String::new(),
            history: vec![],
            input: String::new(),
        };
        let err = service.complete(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(!err.kind().is_retryable());
    }
}
